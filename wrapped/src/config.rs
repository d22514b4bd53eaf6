use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use wrapped_core::{FontConfig, LayoutConfig, ResolverConfig};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub resolver: ResolverConfig,
    pub fonts: FontConfig,
}
impl Config {
    pub const FILENAME: &str = "wrapped.toml";

    /// Load the config at `path`. A missing file means the defaults; a file that exists
    /// but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file at {}, using defaults", path.display());
                Config::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        config
            .layout
            .validate()
            .with_context(|| format!("Invalid layout in {}", path.display()))?;
        config
            .resolver
            .validate()
            .with_context(|| format!("Invalid resolver settings in {}", path.display()))?;
        Ok(config)
    }
}
