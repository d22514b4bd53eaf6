use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An album's identity, parsed from an `Artist|Album` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumKey {
    /// The artist name
    pub artist: String,
    /// The album name
    pub album: String,
}
impl AlbumKey {
    /// The separator between the artist and album halves of a key.
    pub const SEPARATOR: char = '|';

    /// Parse an `Artist|Album` key. Both halves must be non-empty and the key must
    /// contain exactly one separator.
    pub fn parse(key: &str) -> Result<Self> {
        let malformed = || Error::MalformedAlbumKey {
            key: key.to_string(),
        };

        let mut parts = key.split(Self::SEPARATOR);
        let (Some(artist), Some(album), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        if artist.is_empty() || album.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            artist: artist.to_string(),
            album: album.to_string(),
        })
    }
}
impl std::fmt::Display for AlbumKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.artist, Self::SEPARATOR, self.album)
    }
}

/// An album to place on the canvas, with the cover URL from the input, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    /// The album's identity
    pub key: AlbumKey,
    /// A direct link to the cover art
    pub cover_url: Option<String>,
}

/// The input collection: `Artist|Album` keys mapped to optional cover URLs, in the
/// order they should be laid out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumCollection(pub IndexMap<String, Option<String>>);
impl AlbumCollection {
    /// Parse every key, in collection order. Fails on the first malformed key.
    pub fn entries(&self) -> Result<Vec<AlbumEntry>> {
        self.0
            .iter()
            .map(|(key, cover_url)| {
                Ok(AlbumEntry {
                    key: AlbumKey::parse(key)?,
                    cover_url: cover_url.clone(),
                })
            })
            .collect()
    }
}
impl FromIterator<(String, Option<String>)> for AlbumCollection {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        AlbumCollection(iter.into_iter().collect())
    }
}
