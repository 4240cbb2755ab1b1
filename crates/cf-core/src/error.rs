//! # AppError
//!
//! Centralized error handling for the Clipforge crates.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all cf-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Selected input is not acceptable (e.g., not a video by declared MIME type)
    #[error("validation error: {0}")]
    Validation(String),

    /// Persisted project data exists but cannot be decoded
    #[error("persisted data unreadable: {0}")]
    PersistenceLoad(String),

    /// Storage backend failed to read or write
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A record is missing data a consumer requires (e.g., a Short without media)
    #[error("data integrity: {0}")]
    DataIntegrity(String),

    /// Resource not found (e.g., Project, Short)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// The session gate refused the call
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Anything else (task join failures, template rendering)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_video(mime_type: &str) -> Self {
        AppError::Validation(format!("not a video: {mime_type:?}"))
    }
}

/// A specialized Result type for Clipforge logic.
pub type Result<T> = std::result::Result<T, AppError>;
