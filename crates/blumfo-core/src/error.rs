//! # Error Types
//!
//! Domain-specific error types for blumfo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  blumfo-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  blumfo-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → Frontend                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (invoice number, client ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message
//!
//! ## Coercion over rejection
//! Stored *configuration* (numbering, reminder schedules) is never rejected
//! when malformed: the reading code coerces it to a usable value (see the
//! `numbering` module). Errors here are reserved for user actions that
//! cannot proceed.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Raised by the pure guards (`totals::check_lines`, payment amount checks)
/// and surfaced through `blumfo_db::DbError` when a repository runs them.
/// Lookup and state-transition failures are reported by the db layer itself
/// (`DbError::NotFound` / `DbError::InvalidState`), not duplicated here.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Document has exceeded maximum allowed line items.
    #[error("Document cannot have more than {max} line items")]
    TooManyLineItems { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Payment amount is invalid.
    ///
    /// ## When This Occurs
    /// - Recording a zero or negative payment
    /// - Recording a payment larger than the outstanding amount
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product reference).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A field required by another field's value is missing.
    ///
    /// ## When This Occurs
    /// - Subscription interval is `custom` but `custom_days` is unset
    #[error("{field} is required when {condition}")]
    ConditionallyRequired { field: String, condition: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 10000,
            max: 9999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 10000 exceeds maximum allowed (9999)"
        );

        let err = CoreError::InvalidPaymentAmount {
            reason: "amount must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid payment amount: amount must be positive");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "client name".to_string(),
        };
        assert_eq!(err.to_string(), "client name is required");

        let err = ValidationError::ConditionallyRequired {
            field: "custom_days".to_string(),
            condition: "interval is custom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "custom_days is required when interval is custom"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
