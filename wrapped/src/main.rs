use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use wrapped_core::{
    AlbumCollection, Compositor, Fonts, MusicBrainz, Resolver, wrapped_musicbrainz as mb,
};

mod config;
mod display;

use config::Config;

const DEFAULT_INPUT: &str = "album.json";
const OUTPUT_FILENAME: &str = "year_in_review.png";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON object mapping "Artist|Album" keys to a cover URL or null
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the PNG [default: year_in_review.png next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Layout, resolver and font settings
    #[arg(short, long, default_value = Config::FILENAME)]
    config: PathBuf,

    /// Write the image without opening it
    #[arg(long)]
    no_show: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "wrapped=info,wrapped_core=info,wrapped_musicbrainz=info",
                )
            }),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let albums = load_albums(&args.input)?;
    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    let client = mb::Client::new(config.resolver.user_agent.clone())
        .context("Failed to create HTTP client")?;
    let source = MusicBrainz::new(client, config.resolver.search_limit);
    let fonts = Fonts::load(&config.fonts);
    if !fonts.title.is_scalable() {
        tracing::info!(
            "Font {} not available, using the built-in font",
            config.fonts.preferred
        );
    }

    let compositor = Compositor::new(
        config.layout,
        Resolver::new(source, config.resolver),
        fonts,
    );
    let canvas = compositor
        .compose(&albums)
        .context("Failed to compose the year in review")?;

    save_png(&canvas, &output_path)?;
    tracing::info!("Wrote {}", output_path.display());

    if !args.no_show {
        display::show(&output_path);
    }

    Ok(())
}

fn load_albums(path: &Path) -> anyhow::Result<AlbumCollection> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// The output lives alongside the input.
fn default_output_path(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(OUTPUT_FILENAME)
}

fn save_png(canvas: &image::RgbImage, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    canvas
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/2024/album.json")),
            Path::new("data/2024/year_in_review.png")
        );
        assert_eq!(
            default_output_path(Path::new("album.json")),
            Path::new("year_in_review.png")
        );
    }

    #[test]
    fn test_load_albums_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_INPUT);
        std::fs::write(
            &path,
            r#"{
                "Radiohead|OK Computer": null,
                "Björk|Homogenic": "https://example.com/homogenic.jpg",
                "Aphex Twin|Selected Ambient Works 85-92": null
            }"#,
        )
        .unwrap();

        let albums = load_albums(&path).unwrap();
        let artists: Vec<String> = albums
            .entries()
            .unwrap()
            .into_iter()
            .map(|entry| entry.key.artist)
            .collect();
        assert_eq!(artists, ["Radiohead", "Björk", "Aphex Twin"]);
    }

    #[test]
    fn test_load_albums_rejects_non_object_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_INPUT);
        std::fs::write(&path, r#"["Radiohead|OK Computer"]"#).unwrap();
        assert!(load_albums(&path).is_err());
        assert!(load_albums(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_save_png_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(OUTPUT_FILENAME);
        let canvas = image::RgbImage::from_pixel(12, 7, image::Rgb([0x19, 0x14, 0x14]));

        save_png(&canvas, &path).unwrap();

        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (12, 7));
        assert_eq!(*written.get_pixel(3, 3), image::Rgb([0x19, 0x14, 0x14]));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["wrapped"]).unwrap();
        assert_eq!(args.input, Path::new(DEFAULT_INPUT));
        assert_eq!(args.config, Path::new(Config::FILENAME));
        assert!(args.output.is_none());
        assert!(!args.no_show);

        let args =
            Args::try_parse_from(["wrapped", "in.json", "-o", "out.png", "--no-show"]).unwrap();
        assert_eq!(args.input, Path::new("in.json"));
        assert_eq!(args.output.as_deref(), Some(Path::new("out.png")));
        assert!(args.no_show);
    }
}
