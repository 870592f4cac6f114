//! Shared Error Types
//!
//! Error types used by the entity model and by every layer that builds on it.
//! They cover the failures that can happen before any network or storage
//! work is attempted.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Malformed or missing required fields
//! - `NotFound` - A referenced record is not present in local state
//!
//! # Usage
//!
//! ```rust
//! use tripmate::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Trip name cannot be empty");
//! assert!(error.to_string().contains("name"));
//! ```
use thiserror::Error;

/// Shared error types raised by the entity model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Referenced record does not exist
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Entity kind, e.g. "trip"
        entity: String,
        /// Identifier that was looked up
        id: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Reject blank text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Reject negative or non-finite amounts.
pub(crate) fn require_amount(field: &str, value: f64) -> Result<(), SharedError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SharedError::validation(field, "must be a non-negative amount"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("endDate", "must not precede startDate");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "endDate");
                assert_eq!(message, "must not precede startDate");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_not_found_display() {
        let error = SharedError::not_found("trip", "abc");
        assert_eq!(error.to_string(), "trip 'abc' not found");
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();
        assert!(matches!(shared_error, SharedError::SerializationError { .. }));
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("title", "   ").is_err());
        assert!(require_text("title", "Louvre").is_ok());
    }

    #[test]
    fn test_require_amount() {
        assert!(require_amount("amount", -1.0).is_err());
        assert!(require_amount("amount", f64::NAN).is_err());
        assert!(require_amount("amount", 0.0).is_ok());
    }
}
