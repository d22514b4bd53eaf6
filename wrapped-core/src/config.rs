use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Grid geometry, title and colors of the composite image. All sizes are in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub cell_width: u32,
    pub cell_height: u32,
    pub padding: u32,
    pub columns: u32,
    /// Height reserved above the grid for the title.
    pub title_band: u32,
    /// Height reserved under each thumbnail for its two caption lines.
    pub caption_band: u32,
    /// Distance from the top of the canvas to the title.
    pub title_offset: u32,
    /// Distance from the bottom of a thumbnail to its first caption line.
    pub caption_offset: u32,
    /// Distance between the tops of the two caption lines.
    pub caption_line_gap: u32,
    pub title: String,
    pub background: Color,
    pub foreground: Color,
}
impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 200,
            cell_height: 200,
            padding: 20,
            columns: 5,
            title_band: 120,
            caption_band: 40,
            title_offset: 30,
            caption_offset: 5,
            caption_line_gap: 20,
            title: "My Year in Review".to_string(),
            background: Color([0x19, 0x14, 0x14]),
            foreground: Color([0xFF, 0xFF, 0xFF]),
        }
    }
}
impl LayoutConfig {
    /// Reject geometry that cannot produce a grid, or whose single-row canvas does
    /// not fit in drawing coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(Error::InvalidLayout("columns must be at least 1".into()));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(Error::InvalidLayout(format!(
                "cell size must be non-zero, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        for (name, value) in [
            ("title_offset", self.title_offset),
            ("caption_offset", self.caption_offset),
            ("caption_line_gap", self.caption_line_gap),
        ] {
            if i32::try_from(value).is_err() {
                return Err(Error::InvalidLayout(format!("{name} {value} is too large")));
            }
        }
        self.canvas_size(1).map(|_| ())
    }

    /// Canvas width and height for `rows` rows of cells. Both must fit in an `i32`,
    /// the coordinate type text is drawn with.
    pub(crate) fn canvas_size(&self, rows: u32) -> Result<(u32, u32)> {
        let too_large = || {
            Error::InvalidLayout(format!(
                "a {}-column grid of {}x{} cells with {} rows does not fit on a canvas",
                self.columns, self.cell_width, self.cell_height, rows
            ))
        };
        let fits = |value: u32| i32::try_from(value).is_ok().then_some(value);

        let width = self
            .columns
            .checked_mul(self.cell_width)
            .zip(self.columns.checked_add(1))
            .and_then(|(cells, gaps)| cells.checked_add(gaps.checked_mul(self.padding)?))
            .and_then(fits)
            .ok_or_else(too_large)?;

        let height = self
            .cell_height
            .checked_add(self.caption_band)
            .and_then(|row| rows.checked_mul(row))
            .zip(rows.checked_add(1).and_then(|gaps| gaps.checked_mul(self.padding)))
            .and_then(|(cells, gaps)| cells.checked_add(gaps)?.checked_add(self.title_band))
            .and_then(fits)
            .ok_or_else(too_large)?;

        Ok((width, height))
    }
}

/// How hard the resolver tries before settling for the placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Number of catalog lookups for albums without a cover URL.
    pub retries: u32,
    /// Timeout applied to every catalog request and direct fetch.
    pub timeout_secs: f64,
    /// Unit of the exponential backoff between transient catalog failures.
    pub backoff_unit_secs: f64,
    pub placeholder_url: String,
    /// Number of candidate releases requested per catalog search.
    pub search_limit: u32,
    pub user_agent: String,
}
impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout_secs: 10.0,
            backoff_unit_secs: 1.0,
            placeholder_url: "https://via.placeholder.com/1200x1200?text=No+Cover".to_string(),
            search_limit: 1,
            user_agent: concat!(
                "wrapped/",
                env!("CARGO_PKG_VERSION"),
                " ( https://github.com/wrapped-rs/wrapped )"
            )
            .to_string(),
        }
    }
}
impl ResolverConfig {
    /// Reject timings that cannot be represented as a [`Duration`].
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs <= 0.0 || Duration::try_from_secs_f64(self.timeout_secs).is_err() {
            return Err(Error::InvalidResolver(format!(
                "timeout_secs must be a positive number of seconds, got {}",
                self.timeout_secs
            )));
        }
        if Duration::try_from_secs_f64(self.backoff_unit_secs).is_err() {
            return Err(Error::InvalidResolver(format!(
                "backoff_unit_secs must be a non-negative number of seconds, got {}",
                self.backoff_unit_secs
            )));
        }
        Ok(())
    }

    /// Out-of-range values that slipped past [`ResolverConfig::validate`] saturate.
    pub fn timeout(&self) -> Duration {
        secs_to_duration(self.timeout_secs)
    }

    pub fn backoff_unit(&self) -> Duration {
        secs_to_duration(self.backoff_unit_secs)
    }

    /// The wait after the zero-indexed catalog `attempt` failed transiently: `2^attempt` units.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_unit()
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Which fonts to try for the title and the captions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// A font file path, or a file name to look up in the system font directories.
    pub preferred: String,
    pub title_size: f32,
    pub caption_size: f32,
}
impl Default for FontConfig {
    fn default() -> Self {
        Self {
            preferred: "tahoma.ttf".to_string(),
            title_size: 50.0,
            caption_size: 18.0,
        }
    }
}

/// An opaque RGB color, written as `#RRGGBB` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);
impl std::str::FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Color(rgb))
    }
}
impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
impl From<Color> for String {
    fn from(color: Color) -> Self {
        let [r, g, b] = color.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}
impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb(color.0)
    }
}
