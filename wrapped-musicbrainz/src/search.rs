use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult, Release};

/// A request to the `release` search endpoint.
#[derive(Debug, Clone, Default)]
pub struct ReleaseSearchRequest {
    /// The artist credit to match.
    pub artist: String,
    /// The release title to match.
    pub release: String,
    /// The maximum number of releases to return.
    pub limit: Option<u32>,
}
impl ReleaseSearchRequest {
    /// The Lucene query matching `artist` and `release` as exact phrases.
    pub fn query(&self) -> String {
        format!(
            "artist:\"{}\" AND release:\"{}\"",
            escape_phrase(&self.artist),
            escape_phrase(&self.release)
        )
    }
}

/// Escape the characters that would terminate or corrupt a quoted Lucene phrase.
fn escape_phrase(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A response from the `release` search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSearchResponse {
    /// The releases found, best match first.
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Search-related functionality.
impl Client {
    /// Search for releases by artist and title.
    pub fn search_releases(
        &self,
        request: &ReleaseSearchRequest,
        timeout: Duration,
    ) -> ClientResult<ReleaseSearchResponse> {
        let mut parameters = vec![("query", request.query())];
        if let Some(limit) = request.limit {
            parameters.push(("limit", limit.to_string()));
        }

        self.request::<ReleaseSearchResponse>("release/", &parameters, timeout)
    }
}
