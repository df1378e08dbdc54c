//! # Settings Repository
//!
//! Key-value settings storage, one JSON blob per (tenant, key).
//!
//! ## Known Keys
//! | Key                  | Type                    | Default                 |
//! |----------------------|-------------------------|-------------------------|
//! | `numbering.invoice`  | `NumberingConfig`       | padding 3, sequence 1   |
//! | `numbering.quote`    | `NumberingConfig`       | padding 3, sequence 1   |
//! | `payment_terms`      | `PaymentTerms`          | net 30                  |
//! | `reminder_schedules` | `Vec<ReminderSchedule>` | empty                   |
//!
//! ## Read Semantics
//! Reads never fail on bad data: a missing row or a blob that no longer
//! deserializes (schema drift from an older version) coerces to the
//! default, and the next save overwrites it. Writes still surface
//! serialization errors.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use blumfo_core::{NumberingConfig, PaymentTerms, ReminderSchedule};

const KEY_NUMBERING_INVOICE: &str = "numbering.invoice";
const KEY_NUMBERING_QUOTE: &str = "numbering.quote";
const KEY_PAYMENT_TERMS: &str = "payment_terms";
const KEY_REMINDER_SCHEDULES: &str = "reminder_schedules";

/// Repository for settings storage.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Gets the raw JSON value for a key.
    pub async fn get_raw(&self, tenant_id: &str, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar(
            "SELECT value FROM settings WHERE tenant_id = ?1 AND key = ?2",
        )
        .bind(tenant_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Sets the raw JSON value for a key (upsert).
    pub async fn set_raw(&self, tenant_id: &str, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Saving setting");

        sqlx::query(
            r#"
            INSERT INTO settings (tenant_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(tenant_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deserializes a stored blob, falling back to the default on any
    /// missing or malformed value.
    async fn get_or_default<T>(&self, tenant_id: &str, key: &str) -> DbResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let raw = self.get_raw(tenant_id, key).await?;

        Ok(match raw {
            None => T::default(),
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Unreadable setting, using default");
                T::default()
            }),
        })
    }

    async fn set_json<T: serde::Serialize>(
        &self,
        tenant_id: &str,
        key: &str,
        value: &T,
    ) -> DbResult<()> {
        let blob = serde_json::to_string(value)?;
        self.set_raw(tenant_id, key, &blob).await
    }

    // =========================================================================
    // Typed Accessors
    // =========================================================================

    /// Gets the invoice numbering configuration.
    pub async fn invoice_numbering(&self, tenant_id: &str) -> DbResult<NumberingConfig> {
        self.get_or_default(tenant_id, KEY_NUMBERING_INVOICE).await
    }

    /// Saves the invoice numbering configuration.
    ///
    /// Called by the user from the settings screen, and by the issue flow
    /// after every successful issue to persist the advanced sequence.
    pub async fn set_invoice_numbering(
        &self,
        tenant_id: &str,
        config: &NumberingConfig,
    ) -> DbResult<()> {
        self.set_json(tenant_id, KEY_NUMBERING_INVOICE, config).await
    }

    /// Gets the quote numbering configuration.
    pub async fn quote_numbering(&self, tenant_id: &str) -> DbResult<NumberingConfig> {
        self.get_or_default(tenant_id, KEY_NUMBERING_QUOTE).await
    }

    /// Saves the quote numbering configuration.
    pub async fn set_quote_numbering(
        &self,
        tenant_id: &str,
        config: &NumberingConfig,
    ) -> DbResult<()> {
        self.set_json(tenant_id, KEY_NUMBERING_QUOTE, config).await
    }

    /// Gets the default payment terms.
    pub async fn payment_terms(&self, tenant_id: &str) -> DbResult<PaymentTerms> {
        self.get_or_default(tenant_id, KEY_PAYMENT_TERMS).await
    }

    /// Saves the default payment terms.
    pub async fn set_payment_terms(&self, tenant_id: &str, terms: &PaymentTerms) -> DbResult<()> {
        self.set_json(tenant_id, KEY_PAYMENT_TERMS, terms).await
    }

    /// Gets the configured reminder schedules.
    pub async fn reminder_schedules(&self, tenant_id: &str) -> DbResult<Vec<ReminderSchedule>> {
        self.get_or_default(tenant_id, KEY_REMINDER_SCHEDULES).await
    }

    /// Saves the reminder schedules, keeping at most one marked default.
    ///
    /// If several schedules claim the default flag, only the first keeps it.
    pub async fn set_reminder_schedules(
        &self,
        tenant_id: &str,
        schedules: &[ReminderSchedule],
    ) -> DbResult<()> {
        let mut schedules = schedules.to_vec();
        let mut seen_default = false;
        for schedule in &mut schedules {
            if schedule.is_default {
                if seen_default {
                    schedule.is_default = false;
                } else {
                    seen_default = true;
                }
            }
        }

        self.set_json(tenant_id, KEY_REMINDER_SCHEDULES, &schedules).await
    }

    /// Gets the default reminder schedule, if one is configured and enabled.
    pub async fn default_reminder_schedule(
        &self,
        tenant_id: &str,
    ) -> DbResult<Option<ReminderSchedule>> {
        let schedules = self.reminder_schedules(tenant_id).await?;
        Ok(schedules.into_iter().find(|s| s.is_default && s.enabled))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use blumfo_core::{ReminderTrigger, SequenceReset, TriggerKind, DEFAULT_TENANT_ID};

    #[tokio::test]
    async fn test_numbering_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        // Unset key yields the default
        let config = repo.invoice_numbering(DEFAULT_TENANT_ID).await.unwrap();
        assert_eq!(config.padding, 3);
        assert_eq!(config.sequence_number, 1);

        let config = NumberingConfig {
            prefix: "FACT-2024-".to_string(),
            suffix: String::new(),
            padding: 4,
            sequence_number: 42,
            reset: SequenceReset::Yearly,
            year: 2024,
        };
        repo.set_invoice_numbering(DEFAULT_TENANT_ID, &config)
            .await
            .unwrap();

        let found = repo.invoice_numbering(DEFAULT_TENANT_ID).await.unwrap();
        assert_eq!(found.prefix, "FACT-2024-");
        assert_eq!(found.sequence_number, 42);
        assert_eq!(found.reset, SequenceReset::Yearly);

        // Quote numbering is a separate key
        let quote = repo.quote_numbering(DEFAULT_TENANT_ID).await.unwrap();
        assert_eq!(quote.sequence_number, 1);
    }

    #[tokio::test]
    async fn test_malformed_blob_coerces_to_default() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        repo.set_raw(DEFAULT_TENANT_ID, "payment_terms", "{not json")
            .await
            .unwrap();

        let terms = repo.payment_terms(DEFAULT_TENANT_ID).await.unwrap();
        assert_eq!(terms.due_days, 30);
    }

    #[tokio::test]
    async fn test_single_default_schedule_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        let schedule = |name: &str| ReminderSchedule {
            id: name.to_string(),
            name: name.to_string(),
            enabled: true,
            is_default: true,
            triggers: vec![ReminderTrigger {
                id: format!("{name}-t1"),
                kind: TriggerKind::DaysAfterDue,
                offset_days: 7,
            }],
        };

        repo.set_reminder_schedules(DEFAULT_TENANT_ID, &[schedule("soft"), schedule("firm")])
            .await
            .unwrap();

        let schedules = repo.reminder_schedules(DEFAULT_TENANT_ID).await.unwrap();
        assert_eq!(schedules.len(), 2);
        assert!(schedules[0].is_default);
        assert!(!schedules[1].is_default);

        let default = repo
            .default_reminder_schedule(DEFAULT_TENANT_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(default.name, "soft");
    }
}
