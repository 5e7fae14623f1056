//! Error types for remote writes.

use thiserror::Error;

/// Errors from pushing one chunk to the remote write endpoint.
#[derive(Debug, Error)]
pub enum RemoteWriteError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status.
    #[error("endpoint rejected chunk: HTTP {0}")]
    Rejected(u16),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the endpoint.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for RemoteWriteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteWriteError::Timeout
        } else if err.is_connect() {
            RemoteWriteError::Connection(err.to_string())
        } else {
            RemoteWriteError::Http(err.to_string())
        }
    }
}
