//! Resolves album covers and lays them out as a single year-in-review image.

mod album;
pub use album::{AlbumCollection, AlbumEntry, AlbumKey};

mod compositor;
pub use compositor::Compositor;

mod config;
pub use config::{Color, FontConfig, LayoutConfig, ResolverConfig};

mod error;
pub use error::{Error, FetchError, Result};

pub mod font;
pub use font::{Font, Fonts, load_preferred_font_or_default};

mod layout;
pub use layout::{CellPlacement, Cells, Layout};

mod resolver;
pub use resolver::{Provenance, ResolvedCover, Resolver};

mod source;
pub use source::{CoverSource, MusicBrainz, Sleeper, ThreadSleeper};

pub use wrapped_musicbrainz;
