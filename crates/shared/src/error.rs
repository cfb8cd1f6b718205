//! Application-wide error types.
//!
//! Domain crates keep their own error enums; every one of them classifies
//! itself with an [`ErrorKind`] and converts into [`AppError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Error taxonomy shared by every domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller-fixable input or an illegal state transition.
    Validation,
    /// Referenced record does not exist.
    NotFound,
    /// Uniqueness or duplicate-operation conflict.
    Conflict,
    /// An invariant would be broken; the surrounding transaction is aborted.
    Consistency,
    /// The backing store failed.
    Storage,
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invariant violation detected while applying a change.
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an application error from a domain error classification.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Consistency => Self::Consistency(message),
            ErrorKind::Storage => Self::Storage(message),
        }
    }

    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Consistency(_) => "CONSISTENCY_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the caller can fix the request and retry.
    #[must_use]
    pub const fn is_caller_fixable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::Conflict(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Validation, "VALIDATION_ERROR")]
    #[case(ErrorKind::NotFound, "NOT_FOUND")]
    #[case(ErrorKind::Conflict, "CONFLICT")]
    #[case(ErrorKind::Consistency, "CONSISTENCY_ERROR")]
    #[case(ErrorKind::Storage, "STORAGE_ERROR")]
    fn test_from_kind_error_codes(#[case] kind: ErrorKind, #[case] code: &str) {
        assert_eq!(AppError::from_kind(kind, "msg").error_code(), code);
    }

    #[test]
    fn test_caller_fixable() {
        assert!(AppError::Validation(String::new()).is_caller_fixable());
        assert!(AppError::NotFound(String::new()).is_caller_fixable());
        assert!(AppError::Conflict(String::new()).is_caller_fixable());
        assert!(!AppError::Consistency(String::new()).is_caller_fixable());
        assert!(!AppError::Storage(String::new()).is_caller_fixable());
        assert!(!AppError::Internal(String::new()).is_caller_fixable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Consistency("msg".into()).to_string(),
            "Consistency error: msg"
        );
    }
}
