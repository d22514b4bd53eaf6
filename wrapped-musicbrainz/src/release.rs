use serde::{Deserialize, Serialize};

/// A release as returned by the MusicBrainz search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// The release MBID
    pub id: String,
    /// The release title
    #[serde(default)]
    pub title: String,
    /// How well the release matched the query, from 0 to 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}
