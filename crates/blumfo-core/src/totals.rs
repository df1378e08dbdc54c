//! # Document Totals
//!
//! Computes subtotal, discount, tax and grand total for invoices and quotes.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines                                                                  │
//! │    │  line_total = unit_price × quantity                               │
//! │    ▼                                                                    │
//! │  subtotal = Σ line_total                                               │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  discount (document level, clamped to subtotal)                        │
//! │  distributed pro-rata across lines, remainder on the last line         │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  tax = Σ taxable_line × line tax rate   (per-line rates, half-up)      │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  total = subtotal - discount + tax                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is integer cents. The pro-rata split is exact: the line
//! shares always sum to the discount, so the taxable base equals
//! `subtotal - discount` to the cent.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{InvoiceItem, QuoteItem, TaxRate};
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

// =============================================================================
// Inputs and outputs
// =============================================================================

/// The fields of a document line that totals depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLine {
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub tax_rate_bps: u32,
}

impl From<&InvoiceItem> for DocumentLine {
    fn from(item: &InvoiceItem) -> Self {
        DocumentLine {
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            tax_rate_bps: item.tax_rate_bps,
        }
    }
}

impl From<&QuoteItem> for DocumentLine {
    fn from(item: &QuoteItem) -> Self {
        DocumentLine {
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            tax_rate_bps: item.tax_rate_bps,
        }
    }
}

/// Document-level discount as entered in the wizard.
///
/// Percentages are basis points (1000 = 10%) so the arithmetic stays in
/// integers; the resulting amount is computed against the subtotal with
/// half-up rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum Discount {
    #[default]
    None,
    /// Fixed amount in cents.
    Fixed(i64),
    /// Percentage of the subtotal, in basis points.
    Percent(u32),
}

/// Computed totals for one document, ready to persist on the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Calculation
// =============================================================================

/// Line total before tax: unit price × quantity.
#[inline]
pub fn line_total(unit_price_cents: i64, quantity: i64) -> i64 {
    unit_price_cents.saturating_mul(quantity)
}

/// Checks document lines against the hard limits before persisting.
///
/// Run by the repositories on draft create/update; the limits exist to
/// keep documents printable and to catch obvious typos (quantity 10000
/// instead of 10).
pub fn check_lines(lines: &[DocumentLine]) -> CoreResult<()> {
    if lines.len() > MAX_LINE_ITEMS {
        return Err(CoreError::TooManyLineItems {
            max: MAX_LINE_ITEMS,
        });
    }

    for line in lines {
        if line.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: line.quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
    }

    Ok(())
}

/// Computes document totals from its lines and a document-level discount.
///
/// The discount amount (fixed, or a percentage of the subtotal) is clamped
/// into `[0, subtotal]`. Tax is computed per line on the discounted base so
/// mixed-rate documents (20% services next to 5.5% books) stay correct.
///
/// ## Example
/// ```rust
/// use blumfo_core::totals::{calculate_totals, Discount, DocumentLine};
///
/// let lines = [DocumentLine {
///     unit_price_cents: 10000,
///     quantity: 2,
///     tax_rate_bps: 2000,
/// }];
/// let totals = calculate_totals(&lines, Discount::None);
/// assert_eq!(totals.subtotal_cents, 20000);
/// assert_eq!(totals.tax_cents, 4000);
/// assert_eq!(totals.total_cents, 24000);
///
/// // 10% off: tax follows the discounted base
/// let totals = calculate_totals(&lines, Discount::Percent(1000));
/// assert_eq!(totals.discount_cents, 2000);
/// assert_eq!(totals.total_cents, 21600);
/// ```
pub fn calculate_totals(lines: &[DocumentLine], discount: Discount) -> DocumentTotals {
    let line_totals: Vec<i64> = lines
        .iter()
        .map(|l| line_total(l.unit_price_cents, l.quantity))
        .collect();
    let subtotal: i64 = line_totals.iter().sum();

    let discount_cents = match discount {
        Discount::None => 0,
        Discount::Fixed(cents) => cents,
        Discount::Percent(bps) => Money::from_cents(subtotal)
            .percentage_discount_amount(bps)
            .cents(),
    };
    let discount = discount_cents.clamp(0, subtotal);

    // Pro-rata discount shares, floor division with the remainder assigned
    // to the last line so shares sum exactly to the discount
    let mut tax: i64 = 0;
    let mut distributed: i64 = 0;
    for (i, (line, &line_cents)) in lines.iter().zip(&line_totals).enumerate() {
        let share = if subtotal == 0 {
            0
        } else if i == lines.len() - 1 {
            discount - distributed
        } else {
            ((discount as i128 * line_cents as i128) / subtotal as i128) as i64
        };
        distributed += share;

        let taxable = Money::from_cents(line_cents - share);
        tax += taxable.calculate_tax(TaxRate::from_bps(line.tax_rate_bps)).cents();
    }

    DocumentTotals {
        subtotal_cents: subtotal,
        discount_cents: discount,
        tax_cents: tax,
        total_cents: subtotal - discount + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price_cents: i64, quantity: i64, tax_rate_bps: u32) -> DocumentLine {
        DocumentLine {
            unit_price_cents,
            quantity,
            tax_rate_bps,
        }
    }

    #[test]
    fn test_single_line_no_discount() {
        let totals = calculate_totals(&[line(10000, 2, 2000)], Discount::None);
        assert_eq!(totals.subtotal_cents, 20000);
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.tax_cents, 4000);
        assert_eq!(totals.total_cents, 24000);
    }

    #[test]
    fn test_mixed_tax_rates() {
        // 100.00 at 20% + 50.00 at 5.5%
        let totals = calculate_totals(&[line(10000, 1, 2000), line(5000, 1, 550)], Discount::None);
        assert_eq!(totals.subtotal_cents, 15000);
        assert_eq!(totals.tax_cents, 2000 + 275);
        assert_eq!(totals.total_cents, 17275);
    }

    #[test]
    fn test_fixed_discount_reduces_tax_base() {
        // 200.00 at 20% with 50.00 discount: tax on 150.00
        let totals = calculate_totals(&[line(20000, 1, 2000)], Discount::Fixed(5000));
        assert_eq!(totals.subtotal_cents, 20000);
        assert_eq!(totals.discount_cents, 5000);
        assert_eq!(totals.tax_cents, 3000);
        assert_eq!(totals.total_cents, 18000);
    }

    #[test]
    fn test_percent_discount() {
        // 10% of 200.00 = 20.00, tax on 180.00
        let totals = calculate_totals(&[line(20000, 1, 2000)], Discount::Percent(1000));
        assert_eq!(totals.discount_cents, 2000);
        assert_eq!(totals.tax_cents, 3600);
        assert_eq!(totals.total_cents, 21600);

        // Half-up rounding of the percentage amount: 5.5% of 99.99 = 5.4995
        let totals = calculate_totals(&[line(9999, 1, 0)], Discount::Percent(550));
        assert_eq!(totals.discount_cents, 550);
    }

    #[test]
    fn test_discount_clamped() {
        let totals = calculate_totals(&[line(10000, 1, 2000)], Discount::Fixed(99999));
        assert_eq!(totals.discount_cents, 10000);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.total_cents, 0);

        // Negative fixed discounts are ignored
        let totals = calculate_totals(&[line(10000, 1, 2000)], Discount::Fixed(-500));
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.total_cents, 12000);

        // Percentages over 100% clamp to the subtotal
        let totals = calculate_totals(&[line(10000, 1, 2000)], Discount::Percent(15000));
        assert_eq!(totals.discount_cents, 10000);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_pro_rata_shares_sum_exactly() {
        // 3 equal lines, discount 100 does not divide by 3:
        // floor shares 33+33 and the last line absorbs 34
        let lines = [line(1000, 1, 0), line(1000, 1, 0), line(1000, 1, 0)];
        let totals = calculate_totals(&lines, Discount::Fixed(100));
        assert_eq!(totals.discount_cents, 100);
        assert_eq!(totals.total_cents, 3000 - 100);
    }

    #[test]
    fn test_empty_document() {
        let totals = calculate_totals(&[], Discount::None);
        assert_eq!(totals, DocumentTotals::default());

        // Discount on an empty document is clamped to zero
        let totals = calculate_totals(&[], Discount::Fixed(5000));
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_zero_rate_lines() {
        let totals = calculate_totals(&[line(12345, 3, 0)], Discount::None);
        assert_eq!(totals.subtotal_cents, 37035);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.total_cents, 37035);
    }

    #[test]
    fn test_check_lines() {
        assert!(check_lines(&[line(1000, 1, 2000)]).is_ok());
        assert!(check_lines(&[]).is_ok());

        let too_many: Vec<DocumentLine> = (0..MAX_LINE_ITEMS + 1).map(|_| line(100, 1, 0)).collect();
        assert!(matches!(
            check_lines(&too_many).unwrap_err(),
            CoreError::TooManyLineItems { .. }
        ));

        assert!(check_lines(&[line(100, MAX_ITEM_QUANTITY, 0)]).is_ok());
        assert!(matches!(
            check_lines(&[line(100, MAX_ITEM_QUANTITY + 1, 0)]).unwrap_err(),
            CoreError::QuantityTooLarge { .. }
        ));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(1099, 3), 3297);
        assert_eq!(line_total(0, 100), 0);
    }
}
