//! # blumfo-db: Database Layer for blumfo
//!
//! This crate provides database access for blumfo.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        blumfo Data Flow                                 │
//! │                                                                         │
//! │  App call (issue_invoice, list_clients, evaluate_reminders)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     blumfo-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (invoice.rs,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  client.rs,   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  settings.rs  │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │  ...)         │    │ 002_fts.sql  │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (blumfo.db)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (client, invoice, quote, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blumfo_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/blumfo.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let clients = db.clients().search("acme", 20).await?;
//! let config = db.settings().invoice_numbering(DEFAULT_TENANT_ID).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::company::CompanyRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
pub use repository::quote::QuoteRepository;
pub use repository::reminder_log::ReminderLogRepository;
pub use repository::settings::SettingsRepository;
pub use repository::subscription::SubscriptionRepository;
