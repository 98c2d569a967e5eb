use thiserror::Error;

/// Errors that can be returned by [`crate::TaskClient`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response, or the body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid server URL: {0}")]
    Url(String),

    /// The server answered with a non-success status.
    ///
    /// `message` is the server's `error` field when the body carries one.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// `true` for a 404 answer from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}
