//! # Subscription Repository
//!
//! Database operations for recurring billing subscriptions.
//!
//! ## Billing Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   list_due(today) ──► for each subscription:                            │
//! │       │                   1. build a draft invoice from the line       │
//! │       │                   2. issue it (numbering flow)                 │
//! │       │                   3. advance(id) ──► next_invoice_date moves   │
//! │       ▼                      one interval forward                       │
//! │   next run sees nothing due until the date catches up again            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Date arithmetic lives in `blumfo_core::cadence`; this repository only
//! persists the computed dates.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use blumfo_core::cadence;
use blumfo_core::Subscription;

const COLUMNS: &str = "id, tenant_id, client_id, title, description, \
                       unit_price_cents, quantity, tax_rate_bps, start_date, \
                       interval, interval_count, custom_days, \
                       next_invoice_date, is_active, created_at, updated_at";

/// Repository for subscription database operations.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: SqlitePool,
}

impl SubscriptionRepository {
    /// Creates a new SubscriptionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SubscriptionRepository { pool }
    }

    /// Inserts a new subscription.
    pub async fn insert(&self, subscription: &Subscription) -> DbResult<()> {
        debug!(id = %subscription.id, title = %subscription.title, "Inserting subscription");

        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, tenant_id, client_id, title, description,
                unit_price_cents, quantity, tax_rate_bps, start_date,
                interval, interval_count, custom_days,
                next_invoice_date, is_active, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16
            )
            "#,
        )
        .bind(&subscription.id)
        .bind(&subscription.tenant_id)
        .bind(&subscription.client_id)
        .bind(&subscription.title)
        .bind(&subscription.description)
        .bind(subscription.unit_price_cents)
        .bind(subscription.quantity)
        .bind(subscription.tax_rate_bps)
        .bind(subscription.start_date)
        .bind(subscription.interval)
        .bind(subscription.interval_count)
        .bind(subscription.custom_days)
        .bind(subscription.next_invoice_date)
        .bind(subscription.is_active)
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a subscription by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    /// Lists active subscriptions sorted by next invoice date.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM subscriptions
            WHERE is_active = 1
            ORDER BY next_invoice_date
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    /// Lists active subscriptions whose next invoice date has been reached.
    pub async fn list_due(&self, as_of: NaiveDate) -> DbResult<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM subscriptions
            WHERE is_active = 1 AND next_invoice_date <= ?1
            ORDER BY next_invoice_date
            "#
        ))
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        debug!(as_of = %as_of, count = subscriptions.len(), "Subscriptions due");
        Ok(subscriptions)
    }

    /// Updates a subscription's billing terms and recomputes the next
    /// invoice date from its start date.
    pub async fn update(&self, subscription: &Subscription) -> DbResult<()> {
        debug!(id = %subscription.id, "Updating subscription");

        let next = cadence::recompute(subscription);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                title = ?2,
                description = ?3,
                unit_price_cents = ?4,
                quantity = ?5,
                tax_rate_bps = ?6,
                start_date = ?7,
                interval = ?8,
                interval_count = ?9,
                custom_days = ?10,
                next_invoice_date = ?11,
                is_active = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&subscription.id)
        .bind(&subscription.title)
        .bind(&subscription.description)
        .bind(subscription.unit_price_cents)
        .bind(subscription.quantity)
        .bind(subscription.tax_rate_bps)
        .bind(subscription.start_date)
        .bind(subscription.interval)
        .bind(subscription.interval_count)
        .bind(subscription.custom_days)
        .bind(next)
        .bind(subscription.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Subscription", &subscription.id));
        }

        Ok(())
    }

    /// Advances a subscription one interval after its invoice was issued.
    ///
    /// ## Returns
    /// The new next invoice date.
    pub async fn advance(&self, id: &str) -> DbResult<NaiveDate> {
        let subscription = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Subscription", id))?;

        let next = cadence::advance(&subscription);
        let now = Utc::now();

        sqlx::query(
            "UPDATE subscriptions SET next_invoice_date = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(next)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(id = %id, next_invoice_date = %next, "Advanced subscription");
        Ok(next)
    }

    /// Deactivates a subscription. It stops appearing in `list_due` but its
    /// past invoices keep their back-reference.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating subscription");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE subscriptions SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Subscription", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
