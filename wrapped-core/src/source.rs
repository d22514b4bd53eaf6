use std::time::Duration;

use wrapped_musicbrainz as mb;

use crate::FetchError;

/// Where cover art bytes come from. Implemented by [`MusicBrainz`] for real use.
pub trait CoverSource {
    /// Search the catalog for an exact artist and album match, returning the
    /// identifier of the first candidate release, if any.
    fn find_release(
        &self,
        artist: &str,
        album: &str,
        timeout: Duration,
    ) -> Result<Option<String>, FetchError>;

    /// Fetch the front cover of a release found by [`CoverSource::find_release`].
    fn fetch_release_cover(
        &self,
        release_id: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, FetchError>;

    /// Fetch an arbitrary URL. `None` leaves the transport's default timeout in place.
    fn fetch_url(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError>;
}
impl<T: CoverSource + ?Sized> CoverSource for &T {
    fn find_release(
        &self,
        artist: &str,
        album: &str,
        timeout: Duration,
    ) -> Result<Option<String>, FetchError> {
        (**self).find_release(artist, album, timeout)
    }

    fn fetch_release_cover(
        &self,
        release_id: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_release_cover(release_id, timeout)
    }

    fn fetch_url(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_url(url, timeout)
    }
}

/// Blocks the calling thread between catalog attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Sleeps on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;
impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// MusicBrainz for release search, the Cover Art Archive for covers.
pub struct MusicBrainz {
    client: mb::Client,
    search_limit: u32,
}
impl MusicBrainz {
    pub fn new(client: mb::Client, search_limit: u32) -> Self {
        Self {
            client,
            search_limit: search_limit.max(1),
        }
    }
}
impl CoverSource for MusicBrainz {
    fn find_release(
        &self,
        artist: &str,
        album: &str,
        timeout: Duration,
    ) -> Result<Option<String>, FetchError> {
        let response = self.client.search_releases(
            &mb::ReleaseSearchRequest {
                artist: artist.to_string(),
                release: album.to_string(),
                limit: Some(self.search_limit),
            },
            timeout,
        )?;

        let Some(release) = response.releases.into_iter().next() else {
            return Ok(None);
        };
        tracing::debug!(
            "Best MusicBrainz match for {artist} - {album}: {} ({}, score {})",
            release.title,
            release.id,
            release.score.map_or_else(|| "n/a".to_string(), |s| s.to_string())
        );
        Ok(Some(release.id))
    }

    fn fetch_release_cover(
        &self,
        release_id: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, FetchError> {
        Ok(self.client.get_front_cover(release_id, timeout)?)
    }

    fn fetch_url(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
        Ok(self.client.get_bytes(url, timeout)?)
    }
}
