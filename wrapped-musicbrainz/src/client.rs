#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request, including non-success HTTP statuses.
    ReqwestError(reqwest::Error),
    /// An error that occurred when deserializing a response.
    DeserializationError(serde_json::Error),
}
impl ClientError {
    /// Whether the error came from the network or HTTP layer, and so might go away
    /// if the request is made again.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::ReqwestError(_))
    }
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::ReqwestError(e) => Some(e),
            ClientError::DeserializationError(e) => Some(e),
        }
    }
}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// A blocking client for the MusicBrainz web service and the Cover Art Archive.
pub struct Client {
    pub(crate) musicbrainz_base_url: String,
    pub(crate) cover_art_base_url: String,
    pub(crate) client: reqwest::blocking::Client,
}
impl Client {
    /// The default MusicBrainz web service root.
    pub const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
    /// The default Cover Art Archive root.
    pub const COVER_ART_BASE_URL: &str = "https://coverartarchive.org";

    /// Create a new client against the public services.
    ///
    /// MusicBrainz rejects anonymous clients, so `user_agent` should identify the
    /// application and a contact address.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(user_agent: impl Into<String>) -> ClientResult<Self> {
        Self::with_base_urls(
            user_agent,
            Self::MUSICBRAINZ_BASE_URL,
            Self::COVER_ART_BASE_URL,
        )
    }

    /// Create a new client against custom service roots, e.g. a mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn with_base_urls(
        user_agent: impl Into<String>,
        musicbrainz_base_url: impl Into<String>,
        cover_art_base_url: impl Into<String>,
    ) -> ClientResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.into())
            .build()?;

        Ok(Self {
            musicbrainz_base_url: trim_trailing_slash(musicbrainz_base_url.into()),
            cover_art_base_url: trim_trailing_slash(cover_art_base_url.into()),
            client,
        })
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
