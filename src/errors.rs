//! # Application Error Types
//!
//! This module defines the error types reported by the ingredient detection engine.
//! All of them are local, recoverable conditions handed back to the caller.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Empty or malformed group definition (empty name, empty phrase, ...)
    InvalidInput(String),
    /// A group id that is not (or no longer) in the store
    NotFound(String),
    /// A word index outside the group's current word count
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of words the group holds
        len: usize,
    },
    /// Configuration validation errors
    Config(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "[INVALID_INPUT] {}", msg),
            AppError::NotFound(id) => write!(f, "[NOT_FOUND] No group with id '{}'", id),
            AppError::OutOfRange { index, len } => write!(
                f,
                "[OUT_OF_RANGE] Word index {} is out of range for a group of {} words",
                index, len
            ),
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting
pub mod error_logging {
    use tracing::{error, warn};

    /// Log a rejected group store mutation
    pub fn log_store_error(
        error: &impl std::fmt::Display,
        operation: &str,
        group_id: Option<&str>,
        word_index: Option<usize>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            group_id = ?group_id,
            word_index = ?word_index,
            "Group store operation rejected"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 {
                format!("{}...", v.chars().take(100).collect::<String>())
            } else {
                v.to_string()
            }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(
        error: &impl std::fmt::Display,
        config_key: &str,
        operation: &str,
    ) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_tags() {
        assert_eq!(
            AppError::InvalidInput("empty phrase".to_string()).to_string(),
            "[INVALID_INPUT] empty phrase"
        );
        assert_eq!(
            AppError::NotFound("custom-3".to_string()).to_string(),
            "[NOT_FOUND] No group with id 'custom-3'"
        );
        assert_eq!(
            AppError::OutOfRange { index: 5, len: 2 }.to_string(),
            "[OUT_OF_RANGE] Word index 5 is out of range for a group of 2 words"
        );
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err, AppError::Internal("boom".to_string()));
    }
}
