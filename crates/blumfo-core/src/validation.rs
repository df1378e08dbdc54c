//! # Validation Module
//!
//! Input validation utilities for blumfo.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository call (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use blumfo_core::validation::{validate_client_name, validate_quantity};
//!
//! // Validate before database insert
//! validate_client_name("Acme Corp").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::RecurringInterval;
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS, MAX_REMINDER_OFFSET_DAYS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a client name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product reference.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use blumfo_core::validation::validate_product_reference;
///
/// assert!(validate_product_reference("CONSULT-DAY").is_ok());
/// assert!(validate_product_reference("").is_err());
/// ```
pub fn validate_product_reference(reference: &str) -> ValidationResult<()> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(ValidationError::Required {
            field: "reference".to_string(),
        });
    }

    if reference.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "reference".to_string(),
            max: 50,
        });
    }

    if !reference
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "reference".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product or line-item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Empty is allowed here; use [`validate_client_name`]-style required
///   checks at the call site when the field is mandatory
/// - Must contain exactly one `@` with text on both sides
/// - The domain part must contain a dot
///
/// Deliberately loose: the real proof of a deliverable address is the
/// send itself, this only catches obvious typos.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Ok(());
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (9999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free lines, discounts handled separately)
///
/// ## Example
/// ```rust
/// use blumfo_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // 10.99
/// assert!(validate_price_cents(0).is_ok());     // free line
/// assert!(validate_price_cents(-100).is_err()); // invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Cannot pay zero or negative amounts
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Typical rates are 0, 550, 1000, 2000 (French VAT bands)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of line items on a document.
///
/// ## Rules
/// - Must not exceed MAX_LINE_ITEMS (100)
pub fn validate_line_item_count(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line items".to_string(),
            min: 0,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Subscription Validators
// =============================================================================

/// Validates a subscription cadence configuration as entered in the form.
///
/// ## Rules
/// - `interval_count` must be positive for all calendar intervals
/// - A `custom` interval requires `custom_days` to be set and positive
///
/// This is the user-facing gate. The cadence calculator itself never
/// errors on a stored subscription (see `cadence::next_invoice_date`);
/// this function is what keeps unusable configurations out of storage.
pub fn validate_cadence(
    interval: RecurringInterval,
    interval_count: u32,
    custom_days: Option<i64>,
) -> ValidationResult<()> {
    match interval {
        RecurringInterval::Custom => match custom_days {
            None => Err(ValidationError::ConditionallyRequired {
                field: "custom_days".to_string(),
                condition: "interval is custom".to_string(),
            }),
            Some(days) if days <= 0 => Err(ValidationError::MustBePositive {
                field: "custom_days".to_string(),
            }),
            Some(_) => Ok(()),
        },
        _ => {
            if interval_count == 0 {
                return Err(ValidationError::MustBePositive {
                    field: "interval_count".to_string(),
                });
            }
            Ok(())
        }
    }
}

// =============================================================================
// Reminder Validators
// =============================================================================

/// Validates a reminder trigger's day offset as entered in the form.
///
/// ## Rules
/// - Must be between 0 and MAX_REMINDER_OFFSET_DAYS (365)
/// - Zero is allowed: "on the due date" is a valid first reminder
///
/// The evaluator itself never errors on a stored trigger (negative offsets
/// are read as 0); this function is what keeps them out of storage.
pub fn validate_trigger_offset(offset_days: i64) -> ValidationResult<()> {
    if !(0..=MAX_REMINDER_OFFSET_DAYS).contains(&offset_days) {
        return Err(ValidationError::OutOfRange {
            field: "offset_days".to_string(),
            min: 0,
            max: MAX_REMINDER_OFFSET_DAYS,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID v4 format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
///
/// ## Example
/// ```rust
/// use blumfo_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Acme Corp").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_product_reference() {
        // Valid references
        assert!(validate_product_reference("CONSULT-DAY").is_ok());
        assert!(validate_product_reference("ABC123").is_ok());
        assert!(validate_product_reference("hosting_1").is_ok());

        // Invalid references
        assert!(validate_product_reference("").is_err());
        assert!(validate_product_reference("has space").is_err());
        assert!(validate_product_reference(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("billing@acme.fr").is_ok());
        assert!(validate_email("").is_ok()); // optional field
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("name@nodot").is_err());
        assert!(validate_email("@acme.fr").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(9999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_cadence() {
        use RecurringInterval::*;

        assert!(validate_cadence(Month, 1, None).is_ok());
        assert!(validate_cadence(Week, 3, None).is_ok());
        assert!(validate_cadence(Month, 0, None).is_err());

        // Custom requires custom_days
        assert!(validate_cadence(Custom, 1, Some(45)).is_ok());
        assert!(validate_cadence(Custom, 1, None).is_err());
        assert!(validate_cadence(Custom, 1, Some(0)).is_err());
        assert!(validate_cadence(Custom, 1, Some(-5)).is_err());

        // interval_count is ignored for Custom
        assert!(validate_cadence(Custom, 0, Some(10)).is_ok());
    }

    #[test]
    fn test_validate_trigger_offset() {
        assert!(validate_trigger_offset(0).is_ok()); // on the due date
        assert!(validate_trigger_offset(3).is_ok());
        assert!(validate_trigger_offset(365).is_ok());

        assert!(validate_trigger_offset(-1).is_err());
        assert!(validate_trigger_offset(366).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
        assert!(validate_uuid("123").is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(550).is_ok());
        assert!(validate_tax_rate_bps(2000).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
