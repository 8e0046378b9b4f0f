use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can happen while processing requests
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't reach the server or read what it sent back.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request (4xx). Contains the server's message
    /// when it sent one.
    #[error("request rejected: {0}")]
    Client(String),

    /// The server failed to handle the request (5xx).
    #[error("server error")]
    Server,

    /// The server responded with a status we don't know how to handle, like a
    /// redirect.
    #[error("unexpected status: {0}")]
    Unexpected(StatusCode),

    /// The call needs a session and we don't have one.
    #[error("not logged in")]
    Unauthorized,
}

impl Error {
    /// Did the server look at the request and say no?
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Client(_) | Self::Unauthorized)
    }
}

/// The body the backend sends along with a 4xx. Different endpoints use
/// different keys, so we accept either.
#[derive(Debug, Deserialize)]
pub struct ErrorResp {
    /// Human-readable problem description
    #[serde(alias = "error")]
    pub message: Option<String>,
}
