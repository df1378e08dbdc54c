//! # Reminder Trigger Evaluator
//!
//! Decides which payment-reminder triggers are due to fire for an invoice.
//!
//! ## Evaluation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice (sent, unpaid)        Schedule                                 │
//! │  due_date: 2024-05-01          ├── T1 days_before_due, 3               │
//! │                                ├── T2 days_after_due,  3               │
//! │  History (per invoice)         └── T3 days_after_previous, 7           │
//! │  T1 sent 2024-04-28                                                     │
//! │                                                                         │
//! │  today = 2024-05-04                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  T1: already sent ─────────────────────────► skip                       │
//! │  T2: due 05-01 + 3 = 05-04, today >= ──────► FIRE                       │
//! │  T3: last sent 04-28 + 7 = 05-05, today < ─► not yet                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Idempotence contract
//! The evaluator is pure. Firing is recorded by the caller (the reminder
//! log repository) by inserting into the history *before* the next
//! evaluation; a trigger present in the history never fires again for the
//! same invoice. Evaluating twice without recording returns the same set.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::types::{Invoice, ReminderSchedule, ReminderTrigger, TriggerKind};

// =============================================================================
// Sent-reminder history
// =============================================================================

/// The reminders already sent for one invoice: trigger id → date sent.
///
/// Owned by the persistence layer (reminder log table); built per invoice
/// and handed to [`due_triggers`] as a read-only capability.
#[derive(Debug, Clone, Default)]
pub struct ReminderHistory {
    sent: HashMap<String, NaiveDate>,
}

impl ReminderHistory {
    /// Empty history (no reminder ever sent for the invoice).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from (trigger_id, sent_date) pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, NaiveDate)>,
    {
        ReminderHistory {
            sent: pairs.into_iter().collect(),
        }
    }

    /// Records a sent reminder. Re-recording a trigger keeps the later date.
    pub fn record(&mut self, trigger_id: &str, sent_on: NaiveDate) {
        let entry = self.sent.entry(trigger_id.to_string()).or_insert(sent_on);
        if sent_on > *entry {
            *entry = sent_on;
        }
    }

    /// Whether this trigger has already fired for the invoice.
    pub fn has_fired(&self, trigger_id: &str) -> bool {
        self.sent.contains_key(trigger_id)
    }

    /// Date of the most recently sent reminder, across all triggers.
    pub fn last_sent(&self) -> Option<NaiveDate> {
        self.sent.values().max().copied()
    }

    /// Number of reminders sent so far.
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Returns the triggers due to fire for `invoice` on `today`, in schedule
/// order.
///
/// Rules:
/// - Paid, cancelled and draft invoices are never evaluated.
/// - A disabled schedule (or one with zero triggers) produces nothing.
/// - A trigger already in `history` never fires again.
/// - `days_before_due` fires once today reaches `due_date - offset`;
///   `days_after_due` once today reaches `due_date + offset`.
/// - `days_after_previous_reminder` fires once today reaches
///   `last_sent + offset`. With an empty history it never fires, so it can
///   never be the first reminder; a schedule containing only this kind
///   sends nothing at all.
pub fn due_triggers<'a>(
    invoice: &Invoice,
    schedule: &'a ReminderSchedule,
    history: &ReminderHistory,
    today: NaiveDate,
) -> Vec<&'a ReminderTrigger> {
    if !invoice.reminders_apply() || !schedule.enabled {
        return Vec::new();
    }

    schedule
        .triggers
        .iter()
        .filter(|trigger| !history.has_fired(&trigger.id))
        .filter(|trigger| {
            fire_date(trigger, invoice.due_date, history)
                .map(|fires_on| today >= fires_on)
                .unwrap_or(false)
        })
        .collect()
}

/// The earliest date a trigger fires on, or None when it can't fire yet
/// (no due date for due-relative kinds, no prior reminder for the
/// previous-reminder kind).
fn fire_date(
    trigger: &ReminderTrigger,
    due_date: Option<NaiveDate>,
    history: &ReminderHistory,
) -> Option<NaiveDate> {
    // Negative stored offsets are treated as 0 (fire on the reference date)
    let offset = Days::new(trigger.offset_days.max(0) as u64);

    match trigger.kind {
        TriggerKind::DaysBeforeDue => due_date?.checked_sub_days(offset),
        TriggerKind::DaysAfterDue => due_date?.checked_add_days(offset),
        TriggerKind::DaysAfterPreviousReminder => history.last_sent()?.checked_add_days(offset),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InvoiceStatus, InvoiceTemplate};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sent_invoice(due: NaiveDate) -> Invoice {
        Invoice {
            id: "i1".into(),
            tenant_id: crate::DEFAULT_TENANT_ID.into(),
            number: Some("INV-001".into()),
            status: InvoiceStatus::Sent,
            client_id: "c1".into(),
            client_name: "Acme".into(),
            client_address: None,
            issue_date: Some(date(2024, 4, 1)),
            due_date: Some(due),
            subtotal_cents: 10000,
            discount_cents: 0,
            tax_cents: 2000,
            total_cents: 12000,
            amount_paid_cents: 0,
            notes: None,
            payment_link: None,
            template: InvoiceTemplate::Classic,
            subscription_id: None,
            quote_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            paid_at: None,
        }
    }

    fn trigger(id: &str, kind: TriggerKind, offset_days: i64) -> ReminderTrigger {
        ReminderTrigger {
            id: id.to_string(),
            kind,
            offset_days,
        }
    }

    fn schedule(triggers: Vec<ReminderTrigger>) -> ReminderSchedule {
        ReminderSchedule {
            id: "sch1".into(),
            name: "Standard".into(),
            enabled: true,
            is_default: true,
            triggers,
        }
    }

    #[test]
    fn test_days_after_due_fires_on_threshold() {
        let invoice = sent_invoice(date(2024, 5, 1));
        let sch = schedule(vec![trigger("t1", TriggerKind::DaysAfterDue, 3)]);
        let history = ReminderHistory::new();

        // Before threshold: nothing
        assert!(due_triggers(&invoice, &sch, &history, date(2024, 5, 3)).is_empty());
        // On threshold: fires
        let due = due_triggers(&invoice, &sch, &history, date(2024, 5, 4));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "t1");
        // After threshold, still unsent: fires
        assert_eq!(due_triggers(&invoice, &sch, &history, date(2024, 5, 10)).len(), 1);
    }

    #[test]
    fn test_fired_trigger_never_fires_again() {
        let invoice = sent_invoice(date(2024, 5, 1));
        let sch = schedule(vec![trigger("t1", TriggerKind::DaysAfterDue, 3)]);

        let mut history = ReminderHistory::new();
        assert_eq!(due_triggers(&invoice, &sch, &history, date(2024, 5, 4)).len(), 1);

        history.record("t1", date(2024, 5, 4));
        assert!(due_triggers(&invoice, &sch, &history, date(2024, 5, 10)).is_empty());
    }

    #[test]
    fn test_days_before_due() {
        let invoice = sent_invoice(date(2024, 5, 10));
        let sch = schedule(vec![trigger("t1", TriggerKind::DaysBeforeDue, 3)]);
        let history = ReminderHistory::new();

        assert!(due_triggers(&invoice, &sch, &history, date(2024, 5, 6)).is_empty());
        assert_eq!(due_triggers(&invoice, &sch, &history, date(2024, 5, 7)).len(), 1);
    }

    #[test]
    fn test_previous_reminder_chain() {
        let invoice = sent_invoice(date(2024, 5, 1));
        let sch = schedule(vec![
            trigger("t1", TriggerKind::DaysAfterDue, 3),
            trigger("t2", TriggerKind::DaysAfterPreviousReminder, 7),
        ]);

        // Nothing sent yet: the chained trigger stays silent even far past due
        let history = ReminderHistory::new();
        let due = due_triggers(&invoice, &sch, &history, date(2024, 6, 1));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "t1");

        // After t1 was sent on 05-04, t2 fires from 05-11
        let mut history = ReminderHistory::new();
        history.record("t1", date(2024, 5, 4));
        assert!(due_triggers(&invoice, &sch, &history, date(2024, 5, 10)).is_empty());
        let due = due_triggers(&invoice, &sch, &history, date(2024, 5, 11));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "t2");
    }

    #[test]
    fn test_previous_reminder_alone_never_fires() {
        let invoice = sent_invoice(date(2024, 5, 1));
        let sch = schedule(vec![trigger("t1", TriggerKind::DaysAfterPreviousReminder, 2)]);
        let history = ReminderHistory::new();

        assert!(due_triggers(&invoice, &sch, &history, date(2024, 12, 31)).is_empty());
    }

    #[test]
    fn test_paid_and_draft_invoices_skipped() {
        let sch = schedule(vec![trigger("t1", TriggerKind::DaysAfterDue, 0)]);
        let history = ReminderHistory::new();
        let today = date(2024, 6, 1);

        let mut invoice = sent_invoice(date(2024, 5, 1));
        invoice.status = InvoiceStatus::Paid;
        assert!(due_triggers(&invoice, &sch, &history, today).is_empty());

        invoice.status = InvoiceStatus::Cancelled;
        assert!(due_triggers(&invoice, &sch, &history, today).is_empty());

        invoice.status = InvoiceStatus::Draft;
        assert!(due_triggers(&invoice, &sch, &history, today).is_empty());
    }

    #[test]
    fn test_disabled_or_empty_schedule() {
        let invoice = sent_invoice(date(2024, 5, 1));
        let history = ReminderHistory::new();
        let today = date(2024, 6, 1);

        let mut sch = schedule(vec![trigger("t1", TriggerKind::DaysAfterDue, 0)]);
        sch.enabled = false;
        assert!(due_triggers(&invoice, &sch, &history, today).is_empty());

        let empty = schedule(vec![]);
        assert!(due_triggers(&invoice, &empty, &history, today).is_empty());
    }

    #[test]
    fn test_schedule_order_preserved() {
        let invoice = sent_invoice(date(2024, 5, 1));
        let sch = schedule(vec![
            trigger("late", TriggerKind::DaysAfterDue, 5),
            trigger("early", TriggerKind::DaysAfterDue, 1),
        ]);
        let history = ReminderHistory::new();

        let due = due_triggers(&invoice, &sch, &history, date(2024, 6, 1));
        let ids: Vec<&str> = due.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn test_history_last_sent_takes_max() {
        let mut history = ReminderHistory::new();
        assert_eq!(history.last_sent(), None);

        history.record("t1", date(2024, 5, 4));
        history.record("t2", date(2024, 5, 11));
        assert_eq!(history.last_sent(), Some(date(2024, 5, 11)));

        // Re-recording an older date keeps the later one
        history.record("t2", date(2024, 5, 1));
        assert_eq!(history.last_sent(), Some(date(2024, 5, 11)));
    }
}
