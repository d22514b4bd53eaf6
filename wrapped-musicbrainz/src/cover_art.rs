use std::time::Duration;

use crate::{Client, ClientResult};

/// Cover Art Archive endpoints.
impl Client {
    /// The URL of the front cover for a release MBID.
    pub fn front_cover_url(&self, release_id: &str) -> String {
        format!("{}/release/{release_id}/front", self.cover_art_base_url)
    }

    /// Get the front cover image bytes for a release MBID.
    ///
    /// The archive answers with a redirect to the image itself, which is followed.
    pub fn get_front_cover(&self, release_id: &str, timeout: Duration) -> ClientResult<Vec<u8>> {
        self.get_bytes(&self.front_cover_url(release_id), Some(timeout))
    }
}
