//! # Client Repository
//!
//! Database operations for clients.
//!
//! ## Key Operations
//! - Full-text search using FTS5 (name, email)
//! - CRUD operations with soft delete
//!
//! ## FTS5 Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How FTS5 Search Works                                │
//! │                                                                         │
//! │  User types: "acme"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FTS5 searches across: name, email                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ clients_fts (virtual table)             │                           │
//! │  │                                         │                           │
//! │  │ Acme Corp      | billing@acme.fr       │ ← MATCH!                  │
//! │  │ Acme Studio    | hello@acme-studio.fr  │ ← MATCH!                  │
//! │  │ Dupont SARL    | contact@dupont.fr     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [Acme Corp, Acme Studio]                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use blumfo_core::Client;

const COLUMNS: &str = "id, tenant_id, name, email, phone, address, vat_number, \
                       notes, is_active, created_at, updated_at";

/// Repository for client database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ClientRepository::new(pool);
/// let results = repo.search("acme", 20).await?;
/// let client = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Searches clients using full-text search.
    ///
    /// Searches across name and email via the FTS5 index; an empty query
    /// falls back to listing active clients sorted by name.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Client>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching clients");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        // Wildcard suffix for prefix matching: "acm" matches "Acme".
        // Strip FTS5 syntax characters so user input can't break the query.
        let fts_query = format!("{}*", sanitize_fts_query(query));

        // Qualify every column: the FTS table exposes name/email too
        let cols = qualify_columns("c", COLUMNS);

        let clients = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {cols}
            FROM clients c
            INNER JOIN clients_fts ON clients_fts.rowid = c.rowid
            WHERE clients_fts MATCH ?1
            AND c.is_active = 1
            ORDER BY rank
            LIMIT ?2
            "#
        ))
        .bind(fts_query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = clients.len(), "Search returned clients");
        Ok(clients)
    }

    /// Lists active clients sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM clients
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Gets a client by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Client))` - Client found
    /// * `Ok(None)` - Client not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {COLUMNS} FROM clients WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Inserts a new client.
    pub async fn insert(&self, client: &Client) -> DbResult<Client> {
        debug!(name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, tenant_id, name, email, phone, address,
                vat_number, notes, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&client.id)
        .bind(&client.tenant_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.vat_number)
        .bind(&client.notes)
        .bind(client.is_active)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(client.clone())
    }

    /// Updates an existing client.
    ///
    /// Note: issued documents keep their snapshot of the client name and
    /// address; this update only affects future documents.
    pub async fn update(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "Updating client");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2,
                email = ?3,
                phone = ?4,
                address = ?5,
                vat_number = ?6,
                notes = ?7,
                is_active = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.vat_number)
        .bind(&client.notes)
        .bind(client.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", &client.id));
        }

        Ok(())
    }

    /// Soft-deletes a client by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// - Historical invoices still reference this client
    /// - Can be restored if deleted by mistake
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting client");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE clients SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Counts active clients (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Prefixes every column in a comma-separated list with a table alias,
/// for joins where unqualified names would be ambiguous.
pub(crate) fn qualify_columns(alias: &str, columns: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strips FTS5 query syntax from user input, keeping word characters and
/// spaces. Prevents `"`, `*`, `-` etc. from being parsed as operators.
pub(crate) fn sanitize_fts_query(query: &str) -> String {
    query
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '@' || c == '.' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
