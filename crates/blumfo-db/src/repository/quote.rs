//! # Quote Repository
//!
//! Database operations for quotes (devis) and their line items.
//!
//! ## Quote Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   DRAFT ──issue──► SENT ──accept──► ACCEPTED ──convert──► INVOICED     │
//! │                     │ │                                                 │
//! │                     │ └──decline──► DECLINED                            │
//! │                     └─(valid_until passes)─► EXPIRED                    │
//! │                                                                         │
//! │   Conversion creates a draft invoice carrying the quote's snapshot     │
//! │   lines; the invoice then goes through the normal numbering/issue      │
//! │   flow with its own sequence.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use blumfo_core::totals::{check_lines, DocumentLine};
use blumfo_core::{Invoice, InvoiceItem, InvoiceStatus, InvoiceTemplate, Quote, QuoteItem, QuoteStatus};

const COLUMNS: &str = "id, tenant_id, number, status, client_id, client_name, \
                       client_address, issue_date, valid_until, subtotal_cents, \
                       discount_cents, tax_cents, total_cents, notes, invoice_id, \
                       created_at, updated_at";

const ITEM_COLUMNS: &str = "id, quote_id, product_id, description, \
                            unit_price_cents, quantity, tax_rate_bps, \
                            line_total_cents, created_at";

/// Repository for quote database operations.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    /// Creates a draft quote with its line items in one transaction.
    pub async fn create_draft(&self, quote: &Quote, items: &[QuoteItem]) -> DbResult<()> {
        debug!(id = %quote.id, items = items.len(), "Creating draft quote");

        let lines: Vec<DocumentLine> = items.iter().map(DocumentLine::from).collect();
        check_lines(&lines)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, tenant_id, number, status, client_id, client_name,
                client_address, issue_date, valid_until, subtotal_cents,
                discount_cents, tax_cents, total_cents, notes, invoice_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17
            )
            "#,
        )
        .bind(&quote.id)
        .bind(&quote.tenant_id)
        .bind(&quote.number)
        .bind(quote.status)
        .bind(&quote.client_id)
        .bind(&quote.client_name)
        .bind(&quote.client_address)
        .bind(quote.issue_date)
        .bind(quote.valid_until)
        .bind(quote.subtotal_cents)
        .bind(quote.discount_cents)
        .bind(quote.tax_cents)
        .bind(quote.total_cents)
        .bind(&quote.notes)
        .bind(&quote.invoice_id)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO quote_items (
                    id, quote_id, product_id, description,
                    unit_price_cents, quantity, tax_rate_bps,
                    line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.quote_id)
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

    /// Gets a quote by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {COLUMNS} FROM quotes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    /// Gets all line items for a quote, in creation order.
    pub async fn get_items(&self, quote_id: &str) -> DbResult<Vec<QuoteItem>> {
        let items = sqlx::query_as::<_, QuoteItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM quote_items WHERE quote_id = ?1 ORDER BY created_at"
        ))
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists quotes with a given status, most recent first.
    pub async fn list_by_status(&self, status: QuoteStatus, limit: u32) -> DbResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(&format!(
            r#"
            SELECT {COLUMNS} FROM quotes
            WHERE status = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#
        ))
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// Issues a draft quote: assigns the formatted number, the issue date
    /// and the validity window, moves it to Sent.
    pub async fn issue(
        &self,
        id: &str,
        number: &str,
        issue_date: NaiveDate,
        valid_until: NaiveDate,
    ) -> DbResult<()> {
        info!(id = %id, number = %number, "Issuing quote");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE quotes SET
                number = ?2,
                status = 'sent',
                issue_date = ?3,
                valid_until = ?4,
                updated_at = ?5
            WHERE id = ?1 AND status = 'draft'
            "#,
        )
        .bind(id)
        .bind(number)
        .bind(issue_date)
        .bind(valid_until)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::invalid_state("Quote", id));
        }

        Ok(())
    }

    /// Marks a sent quote accepted.
    pub async fn accept(&self, id: &str) -> DbResult<()> {
        self.transition(id, "accepted", &["sent"]).await
    }

    /// Marks a sent quote declined.
    pub async fn decline(&self, id: &str) -> DbResult<()> {
        self.transition(id, "declined", &["sent"]).await
    }

    async fn transition(&self, id: &str, to: &str, from: &[&str]) -> DbResult<()> {
        let now = Utc::now();
        let placeholders = from
            .iter()
            .map(|s| format!("'{s}'"))
            .collect::<Vec<_>>()
            .join(", ");

        let result = sqlx::query(&format!(
            "UPDATE quotes SET status = ?2, updated_at = ?3 \
             WHERE id = ?1 AND status IN ({placeholders})"
        ))
        .bind(id)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::invalid_state("Quote", id));
        }

        Ok(())
    }

    /// Expires unanswered quotes whose validity window has passed.
    ///
    /// ## Returns
    /// Number of quotes expired.
    pub async fn expire_stale(&self, today: NaiveDate) -> DbResult<u64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE quotes SET status = 'expired', updated_at = ?2
            WHERE status IN ('draft', 'sent')
            AND valid_until IS NOT NULL AND valid_until < ?1
            "#,
        )
        .bind(today)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let expired = result.rows_affected();
        if expired > 0 {
            info!(count = expired, "Expired stale quotes");
        }
        Ok(expired)
    }

    /// Converts an accepted quote into a draft invoice.
    ///
    /// One transaction: the invoice and its lines are created from the
    /// quote's snapshot data, the quote moves to Invoiced and records the
    /// invoice id. The caller then issues the invoice through the normal
    /// numbering flow.
    ///
    /// ## Returns
    /// The created draft invoice.
    pub async fn convert_to_invoice(&self, id: &str) -> DbResult<Invoice> {
        info!(quote_id = %id, "Converting quote to invoice");

        let mut tx = self.pool.begin().await?;

        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {COLUMNS} FROM quotes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Quote", id))?;

        if quote.status != QuoteStatus::Accepted {
            return Err(DbError::invalid_state("Quote", id));
        }

        let items = sqlx::query_as::<_, QuoteItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM quote_items WHERE quote_id = ?1 ORDER BY created_at"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let now = Utc::now();
        let invoice = Invoice {
            id: generate_id(),
            tenant_id: quote.tenant_id.clone(),
            number: None,
            status: InvoiceStatus::Draft,
            client_id: quote.client_id.clone(),
            client_name: quote.client_name.clone(),
            client_address: quote.client_address.clone(),
            issue_date: None,
            due_date: None,
            subtotal_cents: quote.subtotal_cents,
            discount_cents: quote.discount_cents,
            tax_cents: quote.tax_cents,
            total_cents: quote.total_cents,
            amount_paid_cents: 0,
            notes: quote.notes.clone(),
            payment_link: None,
            template: InvoiceTemplate::default(),
            subscription_id: None,
            quote_id: Some(quote.id.clone()),
            created_at: now,
            updated_at: now,
            paid_at: None,
        };

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

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id, product_id, description,
                    unit_price_cents, quantity, tax_rate_bps,
                    line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(generate_id())
            .bind(&invoice.id)
            .bind(&item.product_id)
            .bind(&item.description)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.tax_rate_bps)
            .bind(item.line_total_cents)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE quotes SET status = 'invoiced', invoice_id = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(&invoice.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(invoice)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
