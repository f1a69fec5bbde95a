//! Core domain errors.

use thiserror::Error;

/// Core domain errors for dnacrun.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Command string was empty after trimming.
    #[error("command cannot be empty")]
    EmptyCommand,

    /// Progress payload looked structured but could not be decoded into a map.
    #[error("malformed task progress: {0}")]
    Progress(String),
}
