use std::path::{Path, PathBuf};

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts as _};
use image::{Rgb, RgbImage};
use rusttype::{Scale, point};

use crate::FontConfig;

/// Directories searched, recursively, for a preferred font given by file name.
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Glyph cell size of the built-in bitmap font.
const BITMAP_GLYPH_SIZE: u32 = 8;

/// A font that can measure and draw a single line of text onto the canvas.
pub enum Font {
    /// A TrueType/OpenType font rendered at `size` pixels.
    Scalable {
        font: rusttype::Font<'static>,
        size: f32,
    },
    /// The built-in 8x8 bitmap font, each dot drawn as a `scale`x`scale` square.
    Bitmap { scale: u32 },
}
impl Font {
    /// The built-in font, scaled to roughly match a scalable font at `size` pixels.
    pub fn builtin(size: f32) -> Self {
        Font::Bitmap {
            scale: ((size / 16.0).round() as u32).max(1),
        }
    }

    fn sized(font: Option<rusttype::Font<'static>>, size: f32) -> Self {
        match font {
            Some(font) => Font::Scalable { font, size },
            None => Font::builtin(size),
        }
    }

    pub fn is_scalable(&self) -> bool {
        matches!(self, Font::Scalable { .. })
    }

    /// The width and height `text` occupies when drawn.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            Font::Scalable { font, size } => {
                let scale = Scale::uniform(*size);
                let v_metrics = font.v_metrics(scale);
                let height = (v_metrics.ascent - v_metrics.descent).ceil().max(0.0) as u32;

                let mut width: i32 = 0;
                for glyph in font.layout(text, scale, point(0.0, v_metrics.ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        width = width.max(bb.max.x);
                    }
                }
                (width.max(0) as u32, height)
            }
            Font::Bitmap { scale } => (
                text.chars().count() as u32 * BITMAP_GLYPH_SIZE * scale,
                BITMAP_GLYPH_SIZE * scale,
            ),
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Anything outside the canvas
    /// is clipped.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        match self {
            Font::Scalable { font, size } => {
                let scale = Scale::uniform(*size);
                let v_metrics = font.v_metrics(scale);
                let origin = point(x as f32, y as f32 + v_metrics.ascent);

                for glyph in font.layout(text, scale, origin) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        blend(
                            canvas,
                            bb.min.x + gx as i32,
                            bb.min.y + gy as i32,
                            color,
                            coverage,
                        );
                    });
                }
            }
            Font::Bitmap { scale } => {
                let scale = *scale as i32;
                let advance = BITMAP_GLYPH_SIZE as i32 * scale;
                let mut cursor_x = x;

                for ch in text.chars() {
                    let glyph = BASIC_FONTS
                        .get(ch)
                        .or_else(|| LATIN_FONTS.get(ch))
                        .or_else(|| BASIC_FONTS.get('?'))
                        .unwrap_or_default();

                    for (row, bits) in glyph.iter().enumerate() {
                        for column in 0..BITMAP_GLYPH_SIZE as i32 {
                            if (bits >> column) & 1 == 0 {
                                continue;
                            }
                            let px = cursor_x + column * scale;
                            let py = y + row as i32 * scale;
                            for dy in 0..scale {
                                for dx in 0..scale {
                                    blend(canvas, px + dx, py + dy, color, 1.0);
                                }
                            }
                        }
                    }
                    cursor_x += advance;
                }
            }
        }
    }

    /// Draw `text` horizontally centred on `center_x`, with its top at `y`.
    pub fn draw_centered(
        &self,
        canvas: &mut RgbImage,
        center_x: i32,
        y: i32,
        color: Rgb<u8>,
        text: &str,
    ) {
        let (width, _) = self.measure(text);
        self.draw(canvas, center_x - width as i32 / 2, y, color, text);
    }
}

fn blend(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha == 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for (d, s) in dst.0.iter_mut().zip(color.0) {
        *d = (s as f32 * alpha + *d as f32 * (1.0 - alpha)).round() as u8;
    }
}

/// The title and caption fonts used by the compositor.
pub struct Fonts {
    pub title: Font,
    pub caption: Font,
}
impl Fonts {
    /// Load the preferred font once and use it at both sizes, falling back to the
    /// built-in font.
    pub fn load(config: &FontConfig) -> Self {
        let font = read_font_file(&config.preferred);
        Self {
            title: Font::sized(font.clone(), config.title_size),
            caption: Font::sized(font, config.caption_size),
        }
    }

    /// The built-in font at both sizes, without touching the filesystem.
    pub fn builtin(config: &FontConfig) -> Self {
        Self {
            title: Font::builtin(config.title_size),
            caption: Font::builtin(config.caption_size),
        }
    }
}

/// Load `preferred` at `size` pixels, or the built-in font if it cannot be found or
/// parsed. Never fails: a missing font only degrades typography.
pub fn load_preferred_font_or_default(preferred: &str, size: f32) -> Font {
    Font::sized(read_font_file(preferred), size)
}

fn read_font_file(preferred: &str) -> Option<rusttype::Font<'static>> {
    let Some(path) = find_font_file(preferred) else {
        tracing::debug!("font {preferred} not found, using built-in font");
        return None;
    };

    match std::fs::read(&path) {
        Ok(bytes) => match rusttype::Font::try_from_vec(bytes) {
            Some(font) => {
                tracing::debug!("loaded font {}", path.display());
                Some(font)
            }
            None => {
                tracing::debug!("{} is not a usable font, using built-in font", path.display());
                None
            }
        },
        Err(e) => {
            tracing::debug!("failed to read font {}: {e}, using built-in font", path.display());
            None
        }
    }
}

/// Resolve `preferred` as a path first, then by case-insensitive file name under the
/// platform font directories.
fn find_font_file(preferred: &str) -> Option<PathBuf> {
    let path = Path::new(preferred);
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let file_name = path.file_name()?.to_str()?.to_lowercase();
    FONT_DIRS
        .iter()
        .map(Path::new)
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| {
            walkdir::WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
        })
        .find(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.to_lowercase() == file_name)
        })
        .map(|entry| entry.into_path())
}
