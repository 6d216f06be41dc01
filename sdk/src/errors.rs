//! Error types and handling
//!
//! This module provides the error type used throughout the Edithra service.
//! All errors implement the `EdithraErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Security
//!
//! Error messages never echo configuration secrets or upstream response bodies,
//! so they are safe to return to HTTP clients.

use thiserror::Error;

/// Trait for Edithra error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information.
pub trait EdithraErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or fixed by the caller. Non-recoverable
    /// errors typically require a configuration change or a restart.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Validation**: a request field is missing or has the wrong type
/// - **NotFound**: a referenced entity (e.g. an execution id) does not exist
/// - **Upstream**: the external web-search collaborator failed
/// - **Configuration / Network / IO**: startup failures
///
/// # Examples
///
/// ```
/// use sdk::errors::{EdithraErrorExt, EngineError};
///
/// let error = EngineError::missing_field("task");
/// assert_eq!(error.to_string(), "Validation error: Missing field 'task'");
/// assert!(error.is_recoverable());
///
/// let fatal = EngineError::Config("bad port".to_string());
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Request errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // External collaborator errors
    #[error("Upstream error: {0}")]
    Upstream(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Validation error for a field that is absent from the request body
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("Missing field '{}'", field))
    }

    /// Validation error for a field that is present with the wrong type
    pub fn invalid_field(field: &str, expected: &str) -> Self {
        Self::Validation(format!("Field '{}' must be {}", field, expected))
    }
}

impl EdithraErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Validation(_) => "Check the request body and required fields",
            Self::NotFound(_) => "The requested item does not exist",
            Self::Upstream(_) => "External service unavailable. Try again later",
            Self::Network(_) => "Network operation failed. Check the bind address",
            Self::Internal(_) => "Unexpected internal failure",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Network(_) | Self::Internal(_) => false,
            _ => true,
        }
    }
}
