//! Error types for the controller client.

use thiserror::Error;

/// Errors that can occur when talking to the controller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not obtain an auth token. Fatal for the session.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The controller answered with a non-success status.
    #[error("HTTP {status}: {path}")]
    Status { status: u16, path: String },

    /// A response body could not be decoded into the expected shape.
    #[error("malformed response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The inventory listing came back empty; nothing to run commands on.
    #[error("no managed devices found; discover network devices first")]
    NoDevices,
}

impl ClientError {
    /// Shorthand for a body-shape error on a given endpoint.
    pub(crate) fn decode(path: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_owned(),
            reason: reason.into(),
        }
    }
}
