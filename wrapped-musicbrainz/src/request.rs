use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{Client, ClientResult};

/// Making requests to the MusicBrainz web service.
impl Client {
    /// Make a JSON request to the MusicBrainz web service. `endpoint` is relative to
    /// the web service root, e.g. `release/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server responds with a non-success
    /// status, or the response is not valid.
    pub fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        parameters: &[(&str, String)],
        timeout: Duration,
    ) -> ClientResult<T> {
        let bytes = self.request_raw(endpoint, parameters, timeout)?;
        Self::parse_response::<T>(&bytes)
    }

    pub(crate) fn request_raw(
        &self,
        endpoint: &str,
        parameters: &[(&str, String)],
        timeout: Duration,
    ) -> ClientResult<Vec<u8>> {
        let request = self
            .client
            .get(format!("{}/{endpoint}", self.musicbrainz_base_url))
            .query(&[("fmt", "json")])
            .query(parameters)
            .timeout(timeout);

        Ok(request.send()?.error_for_status()?.bytes()?.into())
    }

    /// Fetch the raw body of an arbitrary URL.
    ///
    /// With `timeout` set to `None`, the HTTP client's default timeout applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server responds with a
    /// non-success status.
    pub fn get_bytes(&self, url: &str, timeout: Option<Duration>) -> ClientResult<Vec<u8>> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        Ok(request.send()?.error_for_status()?.bytes()?.into())
    }

    fn parse_response<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
