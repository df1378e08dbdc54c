//! # blumfo-core: Pure Business Logic for blumfo
//!
//! This crate is the **heart** of the blumfo invoicing product. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        blumfo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (TypeScript)                        │   │
//! │  │   Client list ──► Invoice wizard ──► Preview ──► Send/Collect  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ blumfo-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │  │  types  │ │  money  │ │ cadence  │ │numbering │ │reminder│ │   │
//! │  │  │ Invoice │ │  Money  │ │ next     │ │ format   │ │ due    │ │   │
//! │  │  │  Quote  │ │ TaxCalc │ │ invoice  │ │ sequence │ │triggers│ │   │
//! │  │  │  Subscr │ │         │ │ date     │ │          │ │        │ │   │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    blumfo-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Invoice, Quote, Subscription, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`numbering`] - Invoice number formatting and sequence management
//! - [`cadence`] - Recurring-subscription billing date calculator
//! - [`reminders`] - Payment reminder trigger evaluation
//! - [`totals`] - Document totals (subtotal, discount, tax, grand total)
//! - [`templates`] - Invoice HTML rendering for preview/printing
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **No clock access**: "today" is always a parameter, never `Utc::now()`,
//!    so the cadence and reminder calculators stay replayable
//!
//! ## Example Usage
//!
//! ```rust
//! use blumfo_core::cadence::next_invoice_date;
//! use blumfo_core::types::RecurringInterval;
//! use chrono::NaiveDate;
//!
//! // Monthly cadence clamps to the end of shorter months
//! let anchor = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let next = next_invoice_date(anchor, RecurringInterval::Month, 1, None);
//!
//! // Jan 31 + 1 month = Feb 29 (2024 is a leap year)
//! assert_eq!(next, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cadence;
pub mod error;
pub mod money;
pub mod numbering;
pub mod reminders;
pub mod templates;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use blumfo_core::Money` instead of
// `use blumfo_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID for v0.1 (single-tenant runtime with multi-tenant schema)
///
/// ## Why a constant?
/// v0.1 runs for one company, but the database schema includes tenant_id for
/// future multi-tenancy. This constant is used throughout the codebase and
/// will be replaced with dynamic tenant resolution once accounts can own
/// several companies.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Maximum line items allowed on a single invoice or quote
///
/// ## Business Reason
/// Prevents runaway documents and keeps the generated PDF to a sane number
/// of pages. Can be made configurable per-tenant in future versions.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-billing (e.g., typing 1000 instead of 10)
/// Configurable per-tenant in future versions.
pub const MAX_ITEM_QUANTITY: i64 = 9999;

/// Maximum day offset a reminder trigger may carry
///
/// ## Business Reason
/// A reminder a year out is a configuration mistake, not a dunning policy.
pub const MAX_REMINDER_OFFSET_DAYS: i64 = 365;

/// Default zero-padding width for invoice numbers when the stored
/// configuration is missing or invalid ("007" style).
pub const DEFAULT_NUMBER_PADDING: u32 = 3;

/// Default payment terms when the tenant never configured any:
/// invoices fall due 30 days after issue.
pub const DEFAULT_DUE_DAYS: i64 = 30;
