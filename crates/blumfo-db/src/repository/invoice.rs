//! # Invoice Repository
//!
//! Database operations for invoices and their line items.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create_draft           issue                 record_payment          │
//! │        │                   │                        │                   │
//! │        ▼                   ▼                        ▼                   │
//! │   ┌─────────┐        ┌─────────┐              ┌─────────┐              │
//! │   │  DRAFT  │───────►│  SENT   │─────────────►│  PAID   │              │
//! │   │ no num  │        │ INV-007 │  paid ≥ total│         │              │
//! │   └────┬────┘        └────┬────┘              └─────────┘              │
//! │        │                  │                                             │
//! │        │ delete_draft     │ cancel                                      │
//! │        ▼                  ▼                                             │
//! │     (gone)           ┌───────────┐                                      │
//! │                      │ CANCELLED │  number kept for the audit trail     │
//! │                      └───────────┘                                      │
//! │                                                                         │
//! │   "overdue" is never stored: it is SENT + past due date, derived at    │
//! │   read time (list_overdue) and by Invoice::is_overdue.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Line items freeze description/price/tax at creation; the client name and
//! address are frozen on the invoice row. Issued invoices are immutable
//! apart from status transitions.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use blumfo_core::totals::{check_lines, DocumentLine};
use blumfo_core::{CoreError, Invoice, InvoiceItem, InvoiceStatus};

const COLUMNS: &str = "id, tenant_id, number, status, client_id, client_name, \
                       client_address, issue_date, due_date, subtotal_cents, \
                       discount_cents, tax_cents, total_cents, amount_paid_cents, \
                       notes, payment_link, template, subscription_id, quote_id, \
                       created_at, updated_at, paid_at";

const ITEM_COLUMNS: &str = "id, invoice_id, product_id, description, \
                            unit_price_cents, quantity, tax_rate_bps, \
                            line_total_cents, created_at";

/// Repository for invoice database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InvoiceRepository::new(pool);
/// repo.create_draft(&invoice, &items).await?;
/// repo.issue(&invoice.id, "INV-007", issue_date, due_date).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Creates a draft invoice with its line items in one transaction.
    ///
    /// The invoice must carry status Draft and no number; totals are
    /// expected to be precomputed (see `blumfo_core::totals`).
    pub async fn create_draft(&self, invoice: &Invoice, items: &[InvoiceItem]) -> DbResult<()> {
        debug!(id = %invoice.id, items = items.len(), "Creating draft invoice");

        let lines: Vec<DocumentLine> = items.iter().map(DocumentLine::from).collect();
        check_lines(&lines)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, tenant_id, number, status, client_id, client_name,
                client_address, issue_date, due_date, subtotal_cents,
                discount_cents, tax_cents, total_cents, amount_paid_cents,
                notes, payment_link, template, subscription_id, quote_id,
                created_at, updated_at, paid_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22
            )
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.tenant_id)
        .bind(&invoice.number)
        .bind(invoice.status)
        .bind(&invoice.client_id)
        .bind(&invoice.client_name)
        .bind(&invoice.client_address)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.subtotal_cents)
        .bind(invoice.discount_cents)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(invoice.amount_paid_cents)
        .bind(&invoice.notes)
        .bind(&invoice.payment_link)
        .bind(invoice.template)
        .bind(&invoice.subscription_id)
        .bind(&invoice.quote_id)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .bind(invoice.paid_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, product_id, description,
                    unit_price_cents, quantity, tax_rate_bps,
                    line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.product_id)
            .bind(&item.description)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.tax_rate_bps)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets an invoice by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets all line items for an invoice, in creation order.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ?1 ORDER BY created_at"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists invoices with a given status, most recent first.
    pub async fn list_by_status(
        &self,
        status: InvoiceStatus,
        limit: u32,
    ) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {COLUMNS} FROM invoices
            WHERE status = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#
        ))
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lists issued, unpaid invoices. This is the set the reminder
    /// evaluation walks on each check.
    pub async fn list_open(&self) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE status = 'sent' ORDER BY due_date"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lists open invoices whose due date has passed as of `today`.
    pub async fn list_overdue(&self, today: NaiveDate) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {COLUMNS} FROM invoices
            WHERE status = 'sent' AND due_date IS NOT NULL AND due_date < ?1
            ORDER BY due_date
            "#
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Issues a draft: assigns the formatted number and dates, moves it to
    /// Sent. Only drafts can be issued; the number comes from
    /// `blumfo_core::numbering::issue` and the advanced numbering config
    /// must be persisted by the caller right after this succeeds.
    pub async fn issue(
        &self,
        id: &str,
        number: &str,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> DbResult<()> {
        info!(id = %id, number = %number, "Issuing invoice");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                number = ?2,
                status = 'sent',
                issue_date = ?3,
                due_date = ?4,
                updated_at = ?5
            WHERE id = ?1 AND status = 'draft'
            "#,
        )
        .bind(id)
        .bind(number)
        .bind(issue_date)
        .bind(due_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::invalid_state("Invoice", id));
        }

        Ok(())
    }

    /// Records a payment against an issued invoice. When the cumulative
    /// amount reaches the total, the invoice flips to Paid.
    ///
    /// ## Returns
    /// The updated invoice.
    pub async fn record_payment(&self, id: &str, amount_cents: i64) -> DbResult<Invoice> {
        debug!(id = %id, amount = amount_cents, "Recording payment");

        if amount_cents <= 0 {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!("amount must be positive, got {amount_cents}"),
            }
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", id))?;

        if invoice.status != InvoiceStatus::Sent {
            return Err(DbError::invalid_state("Invoice", id));
        }

        let outstanding = invoice.total_cents - invoice.amount_paid_cents;
        if amount_cents > outstanding {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!("amount {amount_cents} exceeds outstanding {outstanding}"),
            }
            .into());
        }

        let now = Utc::now();
        let new_paid = invoice.amount_paid_cents + amount_cents;
        let fully_paid = new_paid >= invoice.total_cents;

        if fully_paid {
            sqlx::query(
                r#"
                UPDATE invoices SET
                    amount_paid_cents = ?2, status = 'paid',
                    paid_at = ?3, updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .bind(new_paid)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                "UPDATE invoices SET amount_paid_cents = ?2, updated_at = ?3 WHERE id = ?1",
            )
            .bind(id)
            .bind(new_paid)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))
    }

    /// Cancels a draft or issued invoice. The number (if any) is kept so
    /// the numbering trail stays explainable.
    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        info!(id = %id, "Cancelling invoice");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE invoices SET status = 'cancelled', updated_at = ?2
            WHERE id = ?1 AND status IN ('draft', 'sent')
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::invalid_state("Invoice", id));
        }

        Ok(())
    }

    /// Replaces the line items of a draft and updates its totals in one
    /// transaction. Rejected for issued invoices.
    pub async fn update_draft(
        &self,
        id: &str,
        items: &[InvoiceItem],
        totals: blumfo_core::totals::DocumentTotals,
    ) -> DbResult<()> {
        debug!(id = %id, items = items.len(), "Updating draft invoice");

        let lines: Vec<DocumentLine> = items.iter().map(DocumentLine::from).collect();
        check_lines(&lines)?;

        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                subtotal_cents = ?2, discount_cents = ?3,
                tax_cents = ?4, total_cents = ?5, updated_at = ?6
            WHERE id = ?1 AND status = 'draft'
            "#,
        )
        .bind(id)
        .bind(totals.subtotal_cents)
        .bind(totals.discount_cents)
        .bind(totals.tax_cents)
        .bind(totals.total_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::invalid_state("Invoice", id));
        }

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, product_id, description,
                    unit_price_cents, quantity, tax_rate_bps,
                    line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.product_id)
            .bind(&item.description)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.tax_rate_bps)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Hard-deletes a draft (cascades to its items). Issued invoices are
    /// never deleted, only cancelled.
    pub async fn delete_draft(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting draft invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1 AND status = 'draft'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::invalid_state("Invoice", id));
        }

        Ok(())
    }

    /// Stores the checkout URL returned by the payment processor. The URL
    /// is opaque to us.
    pub async fn set_payment_link(&self, id: &str, link: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE invoices SET payment_link = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(link)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
