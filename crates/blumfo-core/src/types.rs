//! # Domain Types
//!
//! Core domain types used throughout blumfo.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │     Invoice     │   │  Subscription   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  number         │   │  start_date     │       │
//! │  │  email          │   │  status         │   │  interval       │       │
//! │  │  address        │   │  total_cents    │   │  next_invoice   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  InvoiceStatus  │   │RecurringInterval│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Draft          │   │  Day..Year      │       │
//! │  │  2000 = 20%     │   │  Sent/Paid/..   │   │  Custom(days)   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (invoice number, product reference, etc.) - human-readable,
//!   assigned by the numbering module when the document is issued

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20.00% (standard French VAT), 550 bps = 5.5% (reduced rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate (exempt tenants, e.g. auto-entrepreneurs).
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client (customer) invoices and quotes are addressed to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant (company) this client belongs to.
    pub tenant_id: String,

    /// Display name (person or business name).
    pub name: String,

    /// Billing email, used for sending invoices and reminders.
    pub email: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Postal address, free-form (printed on documents as-is).
    pub address: Option<String>,

    /// Client VAT number (intra-community invoicing).
    pub vat_number: Option<String>,

    /// Free-form notes, never printed on documents.
    pub notes: Option<String>,

    /// Whether the client is active (soft delete).
    pub is_active: bool,

    /// When the client was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the client was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product or service that can be placed on invoices and quotes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub tenant_id: String,

    /// Short business reference shown in pickers (e.g. "CONSULT-DAY").
    pub reference: String,

    /// Display name shown on documents.
    pub name: String,

    /// Optional description for document line items.
    pub description: Option<String>,

    /// Unit price in cents (smallest currency unit).
    pub unit_price_cents: i64,

    /// Tax rate in basis points (2000 = 20%).
    pub tax_rate_bps: u32,

    /// Billing unit label ("h", "day", "unit"), display only.
    pub unit: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Company (tenant profile)
// =============================================================================

/// The tenant's own company profile, printed in the header of every document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Company {
    /// Unique identifier, equal to the tenant_id it describes.
    pub id: String,

    /// Legal or trade name.
    pub name: String,

    /// Postal address, free-form.
    pub address: Option<String>,

    /// Contact email printed on documents.
    pub email: Option<String>,

    /// Contact phone printed on documents.
    pub phone: Option<String>,

    /// Company registration number (SIRET or equivalent).
    pub registration_number: Option<String>,

    /// Company VAT number.
    pub vat_number: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The status of an invoice.
///
/// ## Note on "overdue"
/// Overdue is derived (unpaid + past due date), never stored, so listings
/// and reminder evaluation can't disagree with the persisted state.
/// See [`Invoice::is_overdue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being edited; has no number yet.
    Draft,
    /// Invoice has been issued and sent to the client.
    Sent,
    /// Invoice has been paid in full.
    Paid,
    /// Invoice was cancelled; kept for the numbering trail.
    Cancelled,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice document.
///
/// ## Snapshot Pattern
/// Client name/address are frozen onto the invoice when it is created, so a
/// later edit to the client record never rewrites an issued document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub tenant_id: String,

    /// Formatted invoice number (e.g. "INV-007"). Assigned at issue time by
    /// the numbering module; None while the invoice is a draft.
    pub number: Option<String>,

    pub status: InvoiceStatus,
    pub client_id: String,

    /// Client name at time of creation (frozen).
    pub client_name: String,

    /// Client address at time of creation (frozen).
    pub client_address: Option<String>,

    /// Date the invoice was issued (None for drafts).
    #[ts(as = "Option<String>")]
    pub issue_date: Option<NaiveDate>,

    /// Date payment is due (issue date + payment terms).
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,

    /// Sum of line totals before discount and tax.
    pub subtotal_cents: i64,
    /// Document-level discount amount.
    pub discount_cents: i64,
    /// Total tax across all lines (after discount).
    pub tax_cents: i64,
    /// Grand total: subtotal - discount + tax.
    pub total_cents: i64,
    /// Amount received so far.
    pub amount_paid_cents: i64,

    /// Free-form note printed at the bottom of the document.
    pub notes: Option<String>,

    /// Checkout URL handed back by the payment processor (opaque).
    pub payment_link: Option<String>,

    /// Which HTML template renders this invoice.
    pub template: InvoiceTemplate,

    /// Subscription that generated this invoice, if any.
    pub subscription_id: Option<String>,

    /// Quote this invoice was converted from, if any.
    pub quote_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the outstanding amount (total - paid), floored at zero.
    pub fn amount_due(&self) -> Money {
        Money::from_cents((self.total_cents - self.amount_paid_cents).max(0))
    }

    /// An invoice is overdue when it is issued, unpaid, and past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Sent
            && self.due_date.map(|due| today > due).unwrap_or(false)
    }

    /// Whether payment reminders may be evaluated for this invoice.
    /// Paid and cancelled invoices are never evaluated.
    pub fn reminders_apply(&self) -> bool {
        matches!(self.status, InvoiceStatus::Sent)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item on an invoice.
/// Uses snapshot pattern to freeze product data at time of billing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,

    /// Source product, if the line was picked from the catalog.
    pub product_id: Option<String>,

    /// Line description at time of billing (frozen).
    pub description: String,

    /// Unit price in cents at time of billing (frozen).
    pub unit_price_cents: i64,

    /// Quantity billed.
    pub quantity: i64,

    /// Tax rate for this line in basis points (frozen).
    pub tax_rate_bps: u32,

    /// Line total before tax (unit_price × quantity).
    pub line_total_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl InvoiceItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Quote (devis)
// =============================================================================

/// The status of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
    /// Quote was converted into an invoice.
    Invoiced,
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Draft
    }
}

/// A quote (devis) document. Same shape as an invoice but with a validity
/// window instead of a due date, and convertible into a draft invoice.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Quote {
    pub id: String,
    pub tenant_id: String,
    pub number: Option<String>,
    pub status: QuoteStatus,
    pub client_id: String,
    pub client_name: String,
    pub client_address: Option<String>,
    #[ts(as = "Option<String>")]
    pub issue_date: Option<NaiveDate>,
    /// Last day the quoted prices are honored.
    #[ts(as = "Option<String>")]
    pub valid_until: Option<NaiveDate>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub notes: Option<String>,
    /// Invoice the quote was converted into, if any.
    pub invoice_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// A quote is expired when unanswered past its validity date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.status, QuoteStatus::Draft | QuoteStatus::Sent)
            && self.valid_until.map(|v| today > v).unwrap_or(false)
    }
}

/// A line item on a quote. Mirrors [`InvoiceItem`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct QuoteItem {
    pub id: String,
    pub quote_id: String,
    pub product_id: Option<String>,
    pub description: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub tax_rate_bps: u32,
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Recurring Subscriptions
// =============================================================================

/// The cadence unit a subscription is re-invoiced on.
///
/// All units except `Custom` are calendar-aware: `Month`, `Quarter`,
/// `Semester` and `Year` preserve the day-of-month with end-of-month
/// clamping (see the `cadence` module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecurringInterval {
    Day,
    Week,
    Month,
    Quarter,
    Semester,
    Year,
    /// A fixed number of days carried in `Subscription::custom_days`.
    Custom,
}

impl Default for RecurringInterval {
    fn default() -> Self {
        RecurringInterval::Month
    }
}

/// A recurring subscription that periodically generates invoices.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Subscription {
    pub id: String,
    pub tenant_id: String,
    pub client_id: String,

    /// Label shown in lists and on generated invoice lines.
    pub title: String,

    /// Billed line: description/price/quantity frozen per cycle.
    pub description: Option<String>,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub tax_rate_bps: u32,

    /// First billing anchor. Immutable once billing has begun.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Cadence unit.
    pub interval: RecurringInterval,

    /// Multiplier applied to the unit (every 2 months, every 3 weeks...).
    /// Ignored when `interval` is `Custom`.
    pub interval_count: u32,

    /// Day count for `Custom` cadence; ignored otherwise.
    pub custom_days: Option<i64>,

    /// Next date an invoice should be generated. Derived: recomputed from
    /// `start_date` on schedule edits, advanced from itself after each issue.
    /// Invariant: never before `start_date`.
    #[ts(as = "String")]
    pub next_invoice_date: NaiveDate,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether an invoice is due for this subscription on `as_of`.
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.is_active && self.next_invoice_date <= as_of
    }
}

// =============================================================================
// Numbering Configuration
// =============================================================================

/// When the invoice number sequence resets to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SequenceReset {
    /// The sequence grows forever.
    Never,
    /// The sequence restarts at 1 on the first issue of a new year.
    Yearly,
}

impl Default for SequenceReset {
    fn default() -> Self {
        SequenceReset::Never
    }
}

/// Tenant configuration for invoice numbering.
///
/// Persisted as a JSON blob in the settings store; the rendered number is
/// always `prefix + zeroPad(sequence_number, padding) + suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumberingConfig {
    /// Arbitrary prefix, default "".
    pub prefix: String,
    /// Arbitrary suffix, default "".
    pub suffix: String,
    /// Zero-padding width for the sequence number. Numbers longer than this
    /// are shown in full, never truncated.
    pub padding: u32,
    /// The next number to render. Monotonically increasing within a period.
    pub sequence_number: u64,
    /// Reset policy.
    pub reset: SequenceReset,
    /// Year the sequence currently belongs to (drives the yearly reset).
    pub year: i32,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        NumberingConfig {
            prefix: String::new(),
            suffix: String::new(),
            padding: crate::DEFAULT_NUMBER_PADDING,
            sequence_number: 1,
            reset: SequenceReset::Never,
            year: 1970,
        }
    }
}

// =============================================================================
// Payment Terms
// =============================================================================

/// Default payment terms applied when an invoice is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTerms {
    /// Days between issue date and due date.
    pub due_days: i64,
}

impl Default for PaymentTerms {
    fn default() -> Self {
        PaymentTerms {
            due_days: crate::DEFAULT_DUE_DAYS,
        }
    }
}

// =============================================================================
// Reminder Schedules
// =============================================================================

/// What a reminder trigger's day offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fires `offset_days` before the invoice due date.
    DaysBeforeDue,
    /// Fires `offset_days` after the invoice due date.
    DaysAfterDue,
    /// Fires `offset_days` after the most recently sent reminder for the
    /// invoice. Requires a prior reminder; never the first to fire.
    DaysAfterPreviousReminder,
}

/// One configured reminder rule inside a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReminderTrigger {
    /// Stable identifier for sent-tracking (UUID v4).
    pub id: String,
    pub kind: TriggerKind,
    /// Day offset, interpreted per `kind`.
    pub offset_days: i64,
}

/// A named, ordered set of reminder triggers.
///
/// At most one schedule per tenant may be the default; the settings
/// repository enforces that when schedules are saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReminderSchedule {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub is_default: bool,
    /// Evaluated in order; order is preserved in the fired result.
    pub triggers: Vec<ReminderTrigger>,
}

// =============================================================================
// Invoice Templates
// =============================================================================

/// Which HTML template renders a document for preview/printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceTemplate {
    Classic,
    Modern,
    Minimal,
}

impl Default for InvoiceTemplate {
    fn default() -> Self {
        InvoiceTemplate::Classic
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
