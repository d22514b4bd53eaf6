use std::time::Duration;

use image::DynamicImage;

use crate::{
    AlbumEntry, AlbumKey, CoverSource, Error, FetchError, ResolverConfig, Result, Sleeper,
    ThreadSleeper,
};

/// Which path produced a cover. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    DirectUrl,
    CatalogLookup,
    Placeholder,
}
impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Provenance::DirectUrl => "direct-url",
            Provenance::CatalogLookup => "catalog-lookup",
            Provenance::Placeholder => "placeholder",
        })
    }
}

/// A decoded cover and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedCover {
    pub image: DynamicImage,
    pub provenance: Provenance,
}

/// Turns an album entry into a cover image, falling back through the direct URL, a
/// catalog lookup, and finally the placeholder image.
pub struct Resolver<S, Z = ThreadSleeper> {
    source: S,
    sleeper: Z,
    config: ResolverConfig,
}
impl<S: CoverSource> Resolver<S> {
    pub fn new(source: S, config: ResolverConfig) -> Self {
        Self::with_sleeper(source, ThreadSleeper, config)
    }
}
impl<S: CoverSource, Z: Sleeper> Resolver<S, Z> {
    pub fn with_sleeper(source: S, sleeper: Z, config: ResolverConfig) -> Self {
        Self {
            source,
            sleeper,
            config,
        }
    }

    /// Resolve the cover for an `Artist|Album` key.
    ///
    /// Only two conditions escape as errors: a key that does not parse, and a
    /// placeholder that cannot be fetched. Every other failure is logged and
    /// replaced by the placeholder image.
    pub fn resolve(&self, cover_url: Option<&str>, album_key: &str) -> Result<ResolvedCover> {
        let key = AlbumKey::parse(album_key)?;
        self.resolve_key(cover_url, &key)
    }

    /// Resolve the cover for an entry whose key has already been parsed.
    pub fn resolve_entry(&self, entry: &AlbumEntry) -> Result<ResolvedCover> {
        self.resolve_key(entry.cover_url.as_deref(), &entry.key)
    }

    fn resolve_key(&self, cover_url: Option<&str>, key: &AlbumKey) -> Result<ResolvedCover> {
        let AlbumKey { artist, album } = key;

        if cover_url.is_none()
            && let Some(image) = self.lookup_catalog(key)
        {
            return Ok(ResolvedCover {
                image,
                provenance: Provenance::CatalogLookup,
            });
        }

        let placeholder_url = self.config.placeholder_url.as_str();
        let url = cover_url.unwrap_or(placeholder_url);
        let provenance = if url == placeholder_url {
            Provenance::Placeholder
        } else {
            Provenance::DirectUrl
        };

        match self.fetch_image(url, Some(self.config.timeout())) {
            Ok(image) => {
                match provenance {
                    Provenance::Placeholder => tracing::info!(
                        "Couldn't find cover for: {artist} - {album}. Defaulting to placeholder."
                    ),
                    _ => tracing::info!("Found cover (URL) inside the JSON for: {artist} - {album}."),
                }
                Ok(ResolvedCover { image, provenance })
            }
            Err(e) => {
                tracing::warn!("Error fetching image from {url}: {e}");
                tracing::warn!("Defaulting to placeholder for: {artist} - {album}.");

                let image = self.fetch_image(placeholder_url, None).map_err(|source| {
                    Error::PlaceholderUnreachable {
                        url: placeholder_url.to_string(),
                        source,
                    }
                })?;
                Ok(ResolvedCover {
                    image,
                    provenance: Provenance::Placeholder,
                })
            }
        }
    }

    /// Try the catalog up to `retries` times, backing off only after transient failures.
    fn lookup_catalog(&self, key: &AlbumKey) -> Option<DynamicImage> {
        let AlbumKey { artist, album } = key;
        let retries = self.config.retries;

        for attempt in 0..retries {
            let attempt_number = attempt + 1;
            match self.catalog_attempt(key) {
                Ok(Some(image)) => {
                    tracing::info!(
                        "Found cover for: {artist} - {album} on MusicBrainz after {attempt_number} attempts."
                    );
                    return Some(image);
                }
                Ok(None) => {
                    tracing::info!(
                        "No MusicBrainz release for: {artist} - {album} (attempt {attempt_number}/{retries})"
                    );
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(
                        "Error fetching MusicBrainz cover art (attempt {attempt_number}/{retries}): {e}"
                    );
                    if attempt_number < retries {
                        self.sleeper.sleep(self.config.backoff_delay(attempt));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Non-HTTP error fetching MusicBrainz cover art (attempt {attempt_number}/{retries}): {e}"
                    );
                }
            }
        }

        None
    }

    /// One search-then-fetch round. `Ok(None)` means the catalog had no candidate.
    fn catalog_attempt(
        &self,
        key: &AlbumKey,
    ) -> std::result::Result<Option<DynamicImage>, FetchError> {
        let timeout = self.config.timeout();
        let Some(release_id) = self.source.find_release(&key.artist, &key.album, timeout)? else {
            return Ok(None);
        };

        let bytes = self.source.fetch_release_cover(&release_id, timeout)?;
        decode(&bytes).map(Some)
    }

    fn fetch_image(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> std::result::Result<DynamicImage, FetchError> {
        decode(&self.source.fetch_url(url, timeout)?)
    }
}

fn decode(bytes: &[u8]) -> std::result::Result<DynamicImage, FetchError> {
    if bytes.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(image::load_from_memory(bytes)?)
}
