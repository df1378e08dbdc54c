//! # Billing Cadence Calculator
//!
//! Computes the next date a recurring subscription should be invoiced.
//!
//! ## Cadence Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Unit       Arithmetic                                                  │
//! │  ────────   ──────────────────────────────────────────────────────      │
//! │  day        anchor + count × 1 day                                      │
//! │  week       anchor + count × 7 days                                     │
//! │  month      anchor + count × 1 calendar month   (clamped)               │
//! │  quarter    anchor + count × 3 calendar months  (clamped)               │
//! │  semester   anchor + count × 6 calendar months  (clamped)               │
//! │  year       anchor + count × 12 calendar months (clamped)               │
//! │  custom     anchor + custom_days days                                   │
//! │                                                                         │
//! │  "clamped": day-of-month is preserved, pulled back to the last valid   │
//! │  day of the target month when needed.                                   │
//! │       Jan 31 + 1 month → Feb 29 (leap) / Feb 28, never Mar 2-3          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Anchor discipline
//! Two call patterns keep the cadence drift-free:
//! - **Schedule edited**: recompute from `start_date`, never from the
//!   previous `next_invoice_date`, so repeated edits don't compound.
//! - **Invoice issued**: advance from the current `next_invoice_date`, so
//!   the cadence continues forward from where it was.
//!
//! Both are pure functions of their inputs; "today" never enters the math.

use chrono::{Days, Months, NaiveDate};

use crate::types::{RecurringInterval, Subscription};

// =============================================================================
// Core calculation
// =============================================================================

/// Computes the date one cadence step after `anchor`.
///
/// `interval_count` multiplies the unit for calendar intervals and is
/// ignored for `Custom`. A `Custom` interval uses `custom_days`; if that is
/// absent or non-positive (a malformed stored row), the calculation falls
/// back to `interval_count` days rather than failing. The user-facing gate
/// for that case is `validation::validate_cadence`.
///
/// The result is always strictly after `anchor` for any positive step.
///
/// ## Example
/// ```rust
/// use blumfo_core::cadence::next_invoice_date;
/// use blumfo_core::types::RecurringInterval;
/// use chrono::NaiveDate;
///
/// let jan31 = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
/// let next = next_invoice_date(jan31, RecurringInterval::Month, 1, None);
/// assert_eq!(next, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn next_invoice_date(
    anchor: NaiveDate,
    interval: RecurringInterval,
    interval_count: u32,
    custom_days: Option<i64>,
) -> NaiveDate {
    // Zero would stall the cadence on the anchor forever
    let count = interval_count.max(1);

    match interval {
        RecurringInterval::Day => add_days(anchor, count as u64),
        RecurringInterval::Week => add_days(anchor, 7 * count as u64),
        RecurringInterval::Month => add_months(anchor, count),
        RecurringInterval::Quarter => add_months(anchor, 3 * count),
        RecurringInterval::Semester => add_months(anchor, 6 * count),
        RecurringInterval::Year => add_months(anchor, 12 * count),
        RecurringInterval::Custom => {
            let days = match custom_days {
                Some(d) if d > 0 => d as u64,
                _ => count as u64,
            };
            add_days(anchor, days)
        }
    }
}

/// Calendar-month addition with end-of-month clamping.
/// Chrono's `checked_add_months` clamps for us (Jan 31 + 1 → Feb 28/29).
fn add_months(anchor: NaiveDate, months: u32) -> NaiveDate {
    anchor
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn add_days(anchor: NaiveDate, days: u64) -> NaiveDate {
    anchor
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

// =============================================================================
// Subscription helpers
// =============================================================================

/// Next invoice date after a schedule edit: always re-anchored on
/// `start_date` so edits never compound drift.
pub fn recompute(subscription: &Subscription) -> NaiveDate {
    next_invoice_date(
        subscription.start_date,
        subscription.interval,
        subscription.interval_count,
        subscription.custom_days,
    )
}

/// Next invoice date after an invoice was issued: advances from the
/// current `next_invoice_date`, keeping the cadence moving forward.
pub fn advance(subscription: &Subscription) -> NaiveDate {
    next_invoice_date(
        subscription.next_invoice_date,
        subscription.interval,
        subscription.interval_count,
        subscription.custom_days,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_and_week() {
        let anchor = date(2024, 3, 10);
        assert_eq!(
            next_invoice_date(anchor, RecurringInterval::Day, 1, None),
            date(2024, 3, 11)
        );
        assert_eq!(
            next_invoice_date(anchor, RecurringInterval::Day, 10, None),
            date(2024, 3, 20)
        );
        assert_eq!(
            next_invoice_date(anchor, RecurringInterval::Week, 1, None),
            date(2024, 3, 17)
        );
        assert_eq!(
            next_invoice_date(anchor, RecurringInterval::Week, 2, None),
            date(2024, 3, 24)
        );
    }

    #[test]
    fn test_month_preserves_day() {
        assert_eq!(
            next_invoice_date(date(2024, 1, 15), RecurringInterval::Month, 1, None),
            date(2024, 2, 15)
        );
        assert_eq!(
            next_invoice_date(date(2024, 2, 15), RecurringInterval::Month, 1, None),
            date(2024, 3, 15)
        );
    }

    #[test]
    fn test_month_clamps_to_end_of_month() {
        // Leap year: Jan 31 → Feb 29
        assert_eq!(
            next_invoice_date(date(2024, 1, 31), RecurringInterval::Month, 1, None),
            date(2024, 2, 29)
        );
        // Non-leap: Jan 31 → Feb 28
        assert_eq!(
            next_invoice_date(date(2023, 1, 31), RecurringInterval::Month, 1, None),
            date(2023, 2, 28)
        );
        // May 31 → Jun 30
        assert_eq!(
            next_invoice_date(date(2024, 5, 31), RecurringInterval::Month, 1, None),
            date(2024, 6, 30)
        );
    }

    #[test]
    fn test_quarter_semester_year() {
        let anchor = date(2024, 1, 31);
        assert_eq!(
            next_invoice_date(anchor, RecurringInterval::Quarter, 1, None),
            date(2024, 4, 30)
        );
        assert_eq!(
            next_invoice_date(anchor, RecurringInterval::Semester, 1, None),
            date(2024, 7, 31)
        );
        // Feb 29 + 1 year clamps to Feb 28
        assert_eq!(
            next_invoice_date(date(2024, 2, 29), RecurringInterval::Year, 1, None),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_interval_count_multiplies() {
        assert_eq!(
            next_invoice_date(date(2024, 1, 31), RecurringInterval::Month, 2, None),
            date(2024, 3, 31)
        );
        assert_eq!(
            next_invoice_date(date(2024, 1, 15), RecurringInterval::Year, 2, None),
            date(2026, 1, 15)
        );
    }

    #[test]
    fn test_custom_days_exact() {
        assert_eq!(
            next_invoice_date(date(2024, 3, 1), RecurringInterval::Custom, 1, Some(30)),
            date(2024, 3, 31)
        );
        assert_eq!(
            next_invoice_date(date(2024, 12, 20), RecurringInterval::Custom, 1, Some(45)),
            date(2025, 2, 3)
        );
    }

    #[test]
    fn test_custom_falls_back_to_interval_count() {
        // Malformed stored rows: missing or non-positive custom_days
        assert_eq!(
            next_invoice_date(date(2024, 3, 1), RecurringInterval::Custom, 14, None),
            date(2024, 3, 15)
        );
        assert_eq!(
            next_invoice_date(date(2024, 3, 1), RecurringInterval::Custom, 14, Some(0)),
            date(2024, 3, 15)
        );
        assert_eq!(
            next_invoice_date(date(2024, 3, 1), RecurringInterval::Custom, 14, Some(-3)),
            date(2024, 3, 15)
        );
    }

    #[test]
    fn test_zero_count_coerced() {
        // A zero multiplier would freeze the cadence; treat it as 1
        assert_eq!(
            next_invoice_date(date(2024, 1, 15), RecurringInterval::Month, 0, None),
            date(2024, 2, 15)
        );
    }

    #[test]
    fn test_monotonic_over_repeated_application() {
        for interval in [
            RecurringInterval::Day,
            RecurringInterval::Week,
            RecurringInterval::Month,
            RecurringInterval::Quarter,
            RecurringInterval::Semester,
            RecurringInterval::Year,
        ] {
            let mut anchor = date(2024, 1, 31);
            for _ in 0..24 {
                let next = next_invoice_date(anchor, interval, 1, None);
                assert!(next > anchor, "{interval:?} stalled at {anchor}");
                anchor = next;
            }
        }
    }

    #[test]
    fn test_monthly_cycle_scenario() {
        // start 2024-01-15, monthly → first invoice 2024-02-15,
        // then the issued cycle re-anchors on its own output
        let first = next_invoice_date(date(2024, 1, 15), RecurringInterval::Month, 1, None);
        assert_eq!(first, date(2024, 2, 15));
        let second = next_invoice_date(first, RecurringInterval::Month, 1, None);
        assert_eq!(second, date(2024, 3, 15));
    }

    #[test]
    fn test_end_of_month_cadence_stays_clamped() {
        // A cadence anchored on the 31st re-anchors on clamped outputs:
        // Jan 31 → Feb 29 → Mar 29 (the day floats down, never overflows)
        let feb = next_invoice_date(date(2024, 1, 31), RecurringInterval::Month, 1, None);
        assert_eq!(feb, date(2024, 2, 29));
        let mar = next_invoice_date(feb, RecurringInterval::Month, 1, None);
        assert_eq!(mar, date(2024, 3, 29));
    }

    #[test]
    fn test_subscription_helpers() {
        use chrono::Utc;

        let mut sub = Subscription {
            id: "s1".into(),
            tenant_id: crate::DEFAULT_TENANT_ID.into(),
            client_id: "c1".into(),
            title: "Hosting".into(),
            description: None,
            unit_price_cents: 2900,
            quantity: 1,
            tax_rate_bps: 2000,
            start_date: date(2024, 1, 15),
            interval: RecurringInterval::Month,
            interval_count: 1,
            custom_days: None,
            next_invoice_date: date(2024, 4, 15),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // Edits re-anchor on start_date, discarding accumulated state
        assert_eq!(recompute(&sub), date(2024, 2, 15));

        // Issue advances from the current next date
        assert_eq!(advance(&sub), date(2024, 5, 15));

        sub.interval = RecurringInterval::Custom;
        sub.custom_days = Some(10);
        assert_eq!(recompute(&sub), date(2024, 1, 25));
    }
}
