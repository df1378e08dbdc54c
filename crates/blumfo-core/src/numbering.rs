//! # Invoice Numbering
//!
//! Renders and advances the tenant's document number sequence.
//!
//! ## Number Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    "INV-2024-007-FR"                                    │
//! │                                                                         │
//! │     INV-2024-        007           -FR                                  │
//! │     ────────     ─────────────   ──────                                 │
//! │      prefix      sequence_number  suffix                                │
//! │                  zero-padded to                                         │
//! │                  `padding` digits                                       │
//! │                                                                         │
//! │  padding never truncates: sequence 1500 with padding 3 → "1500"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coercion over rejection
//! Numbering is a display-formatting concern. A malformed stored config
//! (zero padding, zero sequence) must never block issuing an invoice, so
//! every function here coerces bad values to safe defaults instead of
//! returning errors.
//!
//! ## Issue flow
//! The functions are pure. [`peek`] shows the number the next invoice will
//! get; [`issue`] returns that number together with the advanced config the
//! caller persists right after the invoice update succeeds.

use chrono::{Datelike, NaiveDate};

use crate::types::{NumberingConfig, SequenceReset};
use crate::DEFAULT_NUMBER_PADDING;

// =============================================================================
// Formatting
// =============================================================================

/// Renders a sequence number under the given config.
///
/// `prefix + zeroPad(sequence, padding) + suffix`. Numbers wider than the
/// padding are rendered in full, never truncated.
///
/// ## Example
/// ```rust
/// use blumfo_core::numbering::format;
/// use blumfo_core::types::NumberingConfig;
///
/// let config = NumberingConfig {
///     prefix: "INV-".to_string(),
///     padding: 3,
///     ..Default::default()
/// };
/// assert_eq!(format(&config, 7), "INV-007");
/// assert_eq!(format(&config, 1500), "INV-1500");
/// ```
pub fn format(config: &NumberingConfig, sequence_number: u64) -> String {
    let padding = effective_padding(config) as usize;
    // Zero is not a valid invoice number; coerce rather than error
    let sequence_number = sequence_number.max(1);

    std::format!(
        "{}{:0>width$}{}",
        config.prefix,
        sequence_number,
        config.suffix,
        width = padding
    )
}

/// Padding with invalid values coerced to the default width.
#[inline]
fn effective_padding(config: &NumberingConfig) -> u32 {
    if config.padding == 0 {
        DEFAULT_NUMBER_PADDING
    } else {
        config.padding
    }
}

// =============================================================================
// Sequence management
// =============================================================================

/// Applies the reset policy for an issue on `issue_date`, returning the
/// config state the issue should happen under.
///
/// With `SequenceReset::Yearly`, the first issue of a new calendar year
/// restarts the sequence at 1. The check is lazy: nothing resets until an
/// invoice is actually issued in the new year.
pub fn rolled_over(config: &NumberingConfig, issue_date: NaiveDate) -> NumberingConfig {
    let year = issue_date.year();
    let mut config = config.clone();

    if config.reset == SequenceReset::Yearly && config.year != year {
        config.sequence_number = 1;
    }
    config.year = year;
    config.sequence_number = config.sequence_number.max(1);
    config
}

/// The number the next issued invoice will receive, without advancing
/// anything. Used by forms to show "next number: INV-008".
pub fn peek(config: &NumberingConfig, issue_date: NaiveDate) -> String {
    let config = rolled_over(config, issue_date);
    format(&config, config.sequence_number)
}

/// Issues the next number: returns the rendered string together with the
/// advanced config the caller must persist alongside the invoice.
///
/// ## Example
/// ```rust
/// use blumfo_core::numbering::issue;
/// use blumfo_core::types::NumberingConfig;
/// use chrono::NaiveDate;
///
/// let config = NumberingConfig {
///     prefix: "INV-".to_string(),
///     sequence_number: 7,
///     ..Default::default()
/// };
/// let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
/// let (number, next) = issue(&config, today);
/// assert_eq!(number, "INV-007");
/// assert_eq!(next.sequence_number, 8);
/// ```
pub fn issue(config: &NumberingConfig, issue_date: NaiveDate) -> (String, NumberingConfig) {
    let mut config = rolled_over(config, issue_date);
    let number = format(&config, config.sequence_number);
    config.sequence_number = config.sequence_number.saturating_add(1);
    (number, config)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: &str, suffix: &str, padding: u32, sequence: u64) -> NumberingConfig {
        NumberingConfig {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            padding,
            sequence_number: sequence,
            reset: SequenceReset::Never,
            year: 2024,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_pads_to_width() {
        let c = config("INV-", "", 3, 1);
        assert_eq!(format(&c, 7), "INV-007");
        assert_eq!(format(&c, 42), "INV-042");
        assert_eq!(format(&c, 999), "INV-999");
    }

    #[test]
    fn test_format_never_truncates() {
        let c = config("INV-", "", 3, 1);
        assert_eq!(format(&c, 1500), "INV-1500");
        assert_eq!(format(&c, 1000000), "INV-1000000");
    }

    #[test]
    fn test_format_padding_one_is_natural() {
        let c = config("", "", 1, 1);
        assert_eq!(format(&c, 7), "7");
        assert_eq!(format(&c, 70), "70");
    }

    #[test]
    fn test_format_prefix_and_suffix() {
        let c = config("2024/", "-FR", 4, 1);
        assert_eq!(format(&c, 12), "2024/0012-FR");
    }

    #[test]
    fn test_format_coerces_invalid_inputs() {
        // Zero padding falls back to the default width
        let c = config("INV-", "", 0, 1);
        assert_eq!(format(&c, 7), "INV-007");

        // Zero sequence renders as 1
        let c = config("INV-", "", 3, 1);
        assert_eq!(format(&c, 0), "INV-001");
    }

    #[test]
    fn test_format_length_property() {
        // len = prefix + max(padding, digits) + suffix for a range of inputs
        for padding in 1..6u32 {
            for sequence in [1u64, 9, 10, 99, 100, 12345] {
                let c = config("INV-", "-A", padding, 1);
                let digits = sequence.to_string().len();
                let expected = "INV-".len() + (padding as usize).max(digits) + "-A".len();
                assert_eq!(format(&c, sequence).len(), expected);
            }
        }
    }

    #[test]
    fn test_issue_advances_sequence() {
        let c = config("INV-", "", 3, 7);
        let (number, next) = issue(&c, date(2024, 5, 2));
        assert_eq!(number, "INV-007");
        assert_eq!(next.sequence_number, 8);

        let (number, next) = issue(&next, date(2024, 5, 3));
        assert_eq!(number, "INV-008");
        assert_eq!(next.sequence_number, 9);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let c = config("INV-", "", 3, 7);
        assert_eq!(peek(&c, date(2024, 5, 2)), "INV-007");
        assert_eq!(peek(&c, date(2024, 5, 2)), "INV-007");
    }

    #[test]
    fn test_yearly_reset_on_new_year() {
        let mut c = config("INV-", "", 3, 42);
        c.reset = SequenceReset::Yearly;
        c.year = 2024;

        // Same year: no reset
        let (number, next) = issue(&c, date(2024, 12, 31));
        assert_eq!(number, "INV-042");
        assert_eq!(next.sequence_number, 43);

        // First issue of the new year restarts at 1
        let (number, next) = issue(&next, date(2025, 1, 2));
        assert_eq!(number, "INV-001");
        assert_eq!(next.year, 2025);
        assert_eq!(next.sequence_number, 2);
    }

    #[test]
    fn test_never_reset_crosses_years() {
        let c = config("INV-", "", 3, 42);
        let (number, next) = issue(&c, date(2025, 1, 2));
        assert_eq!(number, "INV-042");
        assert_eq!(next.sequence_number, 43);
    }

    #[test]
    fn test_unique_within_stable_config() {
        // Consecutive issues under a stable config never repeat a string
        let mut c = config("INV-", "", 3, 1);
        let mut seen = std::collections::HashSet::new();
        for day in 1..=20 {
            let (number, next) = issue(&c, date(2024, 6, day));
            assert!(seen.insert(number));
            c = next;
        }
    }
}
