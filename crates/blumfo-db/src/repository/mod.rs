//! # Repository Module
//!
//! Database repository implementations for blumfo.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  App call                                                              │
//! │       │                                                                 │
//! │       │  db.invoices().issue(id, "INV-007", issue, due)                │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── create_draft(&self, invoice, items)                               │
//! │  ├── issue(&self, id, number, issue_date, due_date)                    │
//! │  ├── record_payment(&self, id, amount_cents, paid_at)                  │
//! │  └── list_open(&self)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Pure calculators (numbering, cadence, reminders) stay storage-free  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`client::ClientRepository`] - Client CRUD and search
//! - [`product::ProductRepository`] - Catalog CRUD and search
//! - [`company::CompanyRepository`] - Tenant company profile
//! - [`invoice::InvoiceRepository`] - Invoice lifecycle and line items
//! - [`quote::QuoteRepository`] - Quote lifecycle and conversion
//! - [`subscription::SubscriptionRepository`] - Recurring billing state
//! - [`settings::SettingsRepository`] - Numbering config, payment terms,
//!   reminder schedules (JSON blobs)
//! - [`reminder_log::ReminderLogRepository`] - Per-invoice sent reminders

pub mod client;
pub mod company;
pub mod invoice;
pub mod product;
pub mod quote;
pub mod reminder_log;
pub mod settings;
pub mod subscription;

use uuid::Uuid;

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
