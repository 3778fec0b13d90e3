//! Error types for promote-gate
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API and
//! convert to HTTP responses at the webhook boundary.
//!
//! Note that [`SkipError`] is deliberately not part of [`AppError`]: an
//! authorization denial is a normal outcome that tells Drone to skip the
//! build, and must stay distinguishable from an evaluation failure.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Signature verification error: {0}")]
    Auth(#[from] AuthError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Webhook signature verification errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing {header} header")]
    MissingHeader { header: String },

    #[error("Malformed {header} header: {reason}")]
    MalformedHeader { header: String, reason: String },

    #[error("Request body does not match its digest")]
    DigestMismatch,

    #[error("Invalid request signature")]
    InvalidSignature,
}

/// The distinguished "skip the build" outcome.
///
/// Returned when a restricted event is denied; Drone's validation protocol
/// surfaces this as HTTP 498 so the build is skipped rather than errored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("user '{trigger}' is not allowed to {event}: {reason}")]
pub struct SkipError {
    pub trigger: String,
    pub event: String,
    pub reason: String,
}

impl SkipError {
    pub fn new(
        trigger: impl Into<String>,
        event: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            event: event.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_error_message() {
        let err = SkipError::new("intruder", "promote", "user 'intruder' has no grants");
        let msg = err.to_string();
        assert!(msg.contains("intruder"));
        assert!(msg.contains("promote"));
    }

    #[test]
    fn test_config_error_wraps_into_app_error() {
        let err: AppError = ConfigError::Missing {
            field: "server.port".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Config(_)));
    }
}
