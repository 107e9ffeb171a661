//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    InvalidArgument,

    // Not found errors
    MacrocycleNotFound,
    MesocycleNotFound,
    MicrocycleNotFound,
    SetNotFound,

    // State errors
    InvalidStateTransition,
    InvariantViolation,
    DanglingReference,

    // Authorization errors
    Forbidden,

    // Infrastructure errors
    PersistenceFailure,
    CacheError,
    InternalError,
}

impl ErrorCode {
    /// Returns true for the "referenced entity does not resolve" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::MacrocycleNotFound
                | ErrorCode::MesocycleNotFound
                | ErrorCode::MicrocycleNotFound
                | ErrorCode::SetNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::MacrocycleNotFound => "MACROCYCLE_NOT_FOUND",
            ErrorCode::MesocycleNotFound => "MESOCYCLE_NOT_FOUND",
            ErrorCode::MicrocycleNotFound => "MICROCYCLE_NOT_FOUND",
            ErrorCode::SetNotFound => "SET_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::InvariantViolation => "INVARIANT_VIOLATION",
            ErrorCode::DanglingReference => "DANGLING_REFERENCE",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::PersistenceFailure => "PERSISTENCE_FAILURE",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates an invalid-argument error for a specific field.
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message).with_detail("field", field.into())
    }

    /// Creates a persistence failure carrying the storage layer's message.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceFailure, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::invalid_argument(err.field().to_string(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("days_per_week", 1, 7, 0);
        assert_eq!(
            format!("{}", err),
            "Field 'days_per_week' must be between 1 and 7, got 0"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::MesocycleNotFound, "Mesocycle not found");
        assert_eq!(format!("{}", err), "[MESOCYCLE_NOT_FOUND] Mesocycle not found");
    }

    #[test]
    fn validation_error_converts_to_invalid_argument() {
        let err: DomainError = ValidationError::empty_field("name").into();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.details.get("field"), Some(&"name".to_string()));
    }

    #[test]
    fn not_found_family_is_recognized() {
        assert!(ErrorCode::MicrocycleNotFound.is_not_found());
        assert!(!ErrorCode::PersistenceFailure.is_not_found());
    }
}
