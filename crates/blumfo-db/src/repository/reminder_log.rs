//! # Reminder Log Repository
//!
//! Persistent record of which reminder triggers have fired for which
//! invoices. The log is what makes reminder evaluation idempotent: a
//! trigger that is in the log never fires again for that invoice, no
//! matter how many times the evaluation runs.
//!
//! `UNIQUE(invoice_id, trigger_id)` backs this at the schema level, so
//! `record` uses `INSERT OR IGNORE` and concurrent runs cannot double-log.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::generate_id;
use blumfo_core::reminders::ReminderHistory;
use blumfo_core::{reminders, Invoice, ReminderSchedule, ReminderTrigger, DEFAULT_TENANT_ID};

/// Repository for the reminder log.
#[derive(Debug, Clone)]
pub struct ReminderLogRepository {
    pool: SqlitePool,
}

impl ReminderLogRepository {
    /// Creates a new ReminderLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReminderLogRepository { pool }
    }

    /// Records that a trigger fired for an invoice.
    ///
    /// Idempotent: recording the same (invoice, trigger) pair again is a
    /// no-op and keeps the original sent date.
    ///
    /// ## Returns
    /// `true` if a new entry was written, `false` if it already existed.
    pub async fn record(
        &self,
        invoice_id: &str,
        schedule_id: &str,
        trigger_id: &str,
        sent_on: NaiveDate,
    ) -> DbResult<bool> {
        debug!(invoice_id = %invoice_id, trigger_id = %trigger_id, "Recording reminder");

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO reminder_log (
                id, tenant_id, invoice_id, schedule_id, trigger_id, sent_on, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
            "#,
        )
        .bind(generate_id())
        .bind(DEFAULT_TENANT_ID)
        .bind(invoice_id)
        .bind(schedule_id)
        .bind(trigger_id)
        .bind(sent_on)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Loads the reminder history for an invoice.
    pub async fn history(&self, invoice_id: &str) -> DbResult<ReminderHistory> {
        let rows: Vec<(String, NaiveDate)> = sqlx::query_as(
            "SELECT trigger_id, sent_on FROM reminder_log WHERE invoice_id = ?1",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ReminderHistory::from_pairs(rows))
    }

    /// Evaluates which triggers are due for an invoice today.
    ///
    /// Loads the persisted history and delegates to the pure evaluator;
    /// the caller sends the reminders and calls `record` for each.
    pub async fn due_for_invoice<'a>(
        &self,
        invoice: &Invoice,
        schedule: &'a ReminderSchedule,
        today: NaiveDate,
    ) -> DbResult<Vec<&'a ReminderTrigger>> {
        let history = self.history(&invoice.id).await?;
        Ok(reminders::due_triggers(invoice, schedule, &history, today))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;
    use blumfo_core::{
        Client, InvoiceItem, InvoiceStatus, TriggerKind, DEFAULT_TENANT_ID,
    };
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule() -> ReminderSchedule {
        ReminderSchedule {
            id: "default".to_string(),
            name: "Relances standard".to_string(),
            enabled: true,
            is_default: true,
            triggers: vec![
                ReminderTrigger {
                    id: "t-after-3".to_string(),
                    kind: TriggerKind::DaysAfterDue,
                    offset_days: 3,
                },
                ReminderTrigger {
                    id: "t-chain-7".to_string(),
                    kind: TriggerKind::DaysAfterPreviousReminder,
                    offset_days: 7,
                },
            ],
        }
    }

    /// Creates and issues an invoice due 2024-03-31.
    async fn issued_invoice(db: &Database) -> Invoice {
        let client = Client {
            id: generate_id(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: "Acme Corp".to_string(),
            email: None,
            phone: None,
            address: None,
            vat_number: None,
            notes: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        db.clients().insert(&client).await.unwrap();

        let invoice_id = generate_id();
        let invoice = Invoice {
            id: invoice_id.clone(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            number: None,
            status: InvoiceStatus::Draft,
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            client_address: None,
            issue_date: None,
            due_date: None,
            subtotal_cents: 10000,
            discount_cents: 0,
            tax_cents: 2000,
            total_cents: 12000,
            amount_paid_cents: 0,
            notes: None,
            payment_link: None,
            template: Default::default(),
            subscription_id: None,
            quote_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            paid_at: None,
        };
        let items = vec![InvoiceItem {
            id: generate_id(),
            invoice_id: invoice_id.clone(),
            product_id: None,
            description: "Prestation".to_string(),
            unit_price_cents: 10000,
            quantity: 1,
            tax_rate_bps: 2000,
            line_total_cents: 10000,
            created_at: Utc::now(),
        }];
        db.invoices().create_draft(&invoice, &items).await.unwrap();
        db.invoices()
            .issue(&invoice_id, "FACT-001", date(2024, 3, 1), date(2024, 3, 31))
            .await
            .unwrap();
        db.invoices().get_by_id(&invoice_id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_record_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let invoice = issued_invoice(&db).await;
        let repo = db.reminder_log();

        let first = repo
            .record(&invoice.id, "default", "t-after-3", date(2024, 4, 3))
            .await
            .unwrap();
        let second = repo
            .record(&invoice.id, "default", "t-after-3", date(2024, 4, 4))
            .await
            .unwrap();
        assert!(first);
        assert!(!second);

        let history = repo.history(&invoice.id).await.unwrap();
        assert_eq!(history.len(), 1);
        // The original date survives the ignored duplicate
        assert_eq!(history.last_sent(), Some(date(2024, 4, 3)));
    }

    #[tokio::test]
    async fn test_evaluate_record_reevaluate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let invoice = issued_invoice(&db).await;
        let repo = db.reminder_log();
        let schedule = schedule();

        // Due date 03-31, offset 3: first trigger fires on 04-03
        let due = repo
            .due_for_invoice(&invoice, &schedule, date(2024, 4, 3))
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "t-after-3");

        repo.record(&invoice.id, &schedule.id, "t-after-3", date(2024, 4, 3))
            .await
            .unwrap();

        // Same day again: nothing due, the chained trigger waits 7 days
        assert!(repo
            .due_for_invoice(&invoice, &schedule, date(2024, 4, 3))
            .await
            .unwrap()
            .is_empty());

        let due = repo
            .due_for_invoice(&invoice, &schedule, date(2024, 4, 10))
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "t-chain-7");
    }

    #[tokio::test]
    async fn test_paid_invoice_gets_no_reminders() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let invoice = issued_invoice(&db).await;
        let repo = db.reminder_log();

        let paid = db
            .invoices()
            .record_payment(&invoice.id, 12000)
            .await
            .unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);

        assert!(repo
            .due_for_invoice(&paid, &schedule(), date(2024, 5, 1))
            .await
            .unwrap()
            .is_empty());
    }
}
