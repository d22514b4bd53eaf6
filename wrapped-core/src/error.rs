use wrapped_musicbrainz as mb;

#[derive(Debug)]
/// An error that stops an album, or the whole render, from being produced.
pub enum Error {
    /// An album key did not split into exactly one artist and one album.
    MalformedAlbumKey {
        /// The key as it appeared in the input.
        key: String,
    },
    /// The placeholder image, the last resort for every cover, could not be fetched.
    PlaceholderUnreachable {
        /// The placeholder URL that was tried.
        url: String,
        /// Why the fetch failed.
        source: FetchError,
    },
    /// The layout configuration cannot produce a canvas.
    InvalidLayout(String),
    /// A resolver timing setting cannot be turned into a duration.
    InvalidResolver(String),
    /// A color was not of the form `#RRGGBB`.
    InvalidColor(String),
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedAlbumKey { key } => {
                write!(f, "malformed album key {key:?}: expected \"Artist|Album\"")
            }
            Error::PlaceholderUnreachable { url, source } => {
                write!(f, "placeholder image {url} is unreachable: {source}")
            }
            Error::InvalidLayout(message) => write!(f, "invalid layout: {message}"),
            Error::InvalidResolver(message) => write!(f, "invalid resolver settings: {message}"),
            Error::InvalidColor(color) => {
                write!(f, "invalid color {color:?}: expected \"#RRGGBB\"")
            }
        }
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::PlaceholderUnreachable { source, .. } => Some(source),
            _ => None,
        }
    }
}
/// A result type for the core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
/// Why a single fetch of cover art bytes, or their decoding, failed.
pub enum FetchError {
    /// The network or HTTP layer failed; trying again later may help.
    Transient(String),
    /// The service answered with something that could not be understood.
    Malformed(String),
    /// The service answered successfully with no bytes.
    Empty,
    /// The bytes were not an image.
    Decode(image::ImageError),
}
impl FetchError {
    /// Whether the catalog phase should back off before its next attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}
impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transient(message) => write!(f, "transient fetch error: {message}"),
            FetchError::Malformed(message) => write!(f, "malformed response: {message}"),
            FetchError::Empty => write!(f, "empty response body"),
            FetchError::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}
impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Decode(e) => Some(e),
            _ => None,
        }
    }
}
impl From<mb::ClientError> for FetchError {
    fn from(e: mb::ClientError) -> Self {
        if e.is_transient() {
            FetchError::Transient(e.to_string())
        } else {
            FetchError::Malformed(e.to_string())
        }
    }
}
impl From<image::ImageError> for FetchError {
    fn from(e: image::ImageError) -> Self {
        FetchError::Decode(e)
    }
}
