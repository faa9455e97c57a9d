//! Error types for track generation and rendering.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced to the caller of the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested identifier is not in the catalog.
    #[error("unknown track: '{id}'")]
    UnknownTrack {
        /// The identifier that was looked up.
        id: String,
    },

    /// Track parameters violate a contract (empty pattern, non-positive tempo, ...).
    #[error("invalid track parameter '{field}': {reason}")]
    InvalidParameters {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Render configuration is out of range.
    #[error("invalid render config '{field}': {reason}")]
    InvalidConfig {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The sample buffer for the render could not be reserved.
    #[error("failed to allocate a buffer of {frames} frames")]
    Allocation {
        /// Requested frame count.
        frames: usize,
    },

    /// Configuration JSON could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// A background render task panicked or was cancelled.
    #[cfg(feature = "async")]
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl EngineError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            field,
            reason: reason.into(),
        }
    }

    /// Creates an invalid config error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
