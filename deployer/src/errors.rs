//! Error types for the NetPad deployer

use thiserror::Error;

/// Main error type for the NetPad deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Malformed or incomplete input to an orchestration step.
    /// Recoverable by the user correcting input; never retried automatically.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Remote resource name collision (e.g. app name already taken).
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Referenced deployment no longer exists server-side. Hard stop.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The hosting provider rejected or failed an operation.
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DeployerError {
    fn from(err: anyhow::Error) -> Self {
        DeployerError::Internal(err.to_string())
    }
}

impl DeployerError {
    /// Whether a poll tick hitting this error should keep the poller alive.
    ///
    /// Transport and upstream hiccups are transient per tick; a missing
    /// deployment id means the resource was deleted and polling must stop.
    pub fn is_transient_for_polling(&self) -> bool {
        !matches!(self, DeployerError::NotFound(_))
    }
}
