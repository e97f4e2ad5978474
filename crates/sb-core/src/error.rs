//! # AppError
//!
//! Centralized error handling for the sphere-board ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all sb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Post)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty content, post too long)
    #[error("validation error: {0}")]
    Validation(String),

    /// Snapshot archive failure (e.g., file unwritable, database down)
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Infrastructure failure outside the categories above
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for sphere-board logic.
pub type Result<T> = std::result::Result<T, AppError>;
