//! # Product Repository
//!
//! Database operations for the product/service catalog.
//!
//! ## Key Operations
//! - Full-text search using FTS5 (reference, name)
//! - CRUD operations with soft delete
//!
//! Line items snapshot the product at billing time, so catalog edits never
//! rewrite issued documents. That makes soft delete safe: a deactivated
//! product disappears from pickers but its past lines stay intact.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::client::{qualify_columns, sanitize_fts_query};
use blumfo_core::{Product, DEFAULT_TENANT_ID};

const COLUMNS: &str = "id, tenant_id, reference, name, description, \
                       unit_price_cents, tax_rate_bps, unit, is_active, \
                       created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let results = repo.search("consult", 20).await?;
/// let product = repo.get_by_reference("CONSULT-DAY").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches products using full-text search across reference and name.
    ///
    /// An empty query falls back to listing active products sorted by name.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        // "consult" becomes "consult*" to match "CONSULT-DAY" etc.
        let fts_query = format!("{}*", sanitize_fts_query(query));

        // Qualify every column: the FTS table exposes reference/name too
        let cols = qualify_columns("p", COLUMNS);

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {cols}
            FROM products p
            INNER JOIN products_fts ON products_fts.rowid = p.rowid
            WHERE products_fts MATCH ?1
            AND p.is_active = 1
            ORDER BY rank
            LIMIT ?2
            "#
        ))
        .bind(fts_query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its business reference (e.g., "CONSULT-DAY").
    pub async fn get_by_reference(&self, reference: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE reference = ?1 AND tenant_id = ?2"
        ))
        .bind(reference)
        .bind(DEFAULT_TENANT_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Reference already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(reference = %product.reference, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, tenant_id, reference, name, description,
                unit_price_cents, tax_rate_bps, unit,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.reference)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price_cents)
        .bind(product.tax_rate_bps)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                reference = ?2,
                name = ?3,
                description = ?4,
                unit_price_cents = ?5,
                tax_rate_bps = ?6,
                unit = ?7,
                is_active = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.reference)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price_cents)
        .bind(product.tax_rate_bps)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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

    fn sample_product(reference: &str, name: &str, price_cents: i64) -> Product {
        Product {
            id: generate_id(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            reference: reference.to_string(),
            name: name.to_string(),
            description: None,
            unit_price_cents: price_cents,
            tax_rate_bps: 2000,
            unit: Some("day".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_reference() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("CONSULT-DAY", "Journée de conseil", 60000);
        repo.insert(&product).await.unwrap();

        let found = repo.get_by_reference("CONSULT-DAY").await.unwrap().unwrap();
        assert_eq!(found.id, product.id);
        assert_eq!(found.unit_price_cents, 60000);
        assert_eq!(found.tax_rate_bps, 2000);
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("HOSTING", "Hébergement", 2900))
            .await
            .unwrap();
        let err = repo
            .insert(&sample_product("HOSTING", "Autre hébergement", 3900))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_matches_reference_and_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&sample_product("CONSULT-DAY", "Journée de conseil", 60000))
            .await
            .unwrap();
        repo.insert(&sample_product("HOSTING", "Hébergement mensuel", 2900))
            .await
            .unwrap();

        let by_ref = repo.search("consult", 20).await.unwrap();
        assert_eq!(by_ref.len(), 1);

        let by_name = repo.search("hébergement", 20).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].reference, "HOSTING");
    }

    #[tokio::test]
    async fn test_update_reflected_in_search() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut product = sample_product("SUPPORT", "Support", 15000);
        repo.insert(&product).await.unwrap();

        product.name = "Maintenance".to_string();
        repo.update(&product).await.unwrap();

        assert!(repo.search("support", 20).await.unwrap().len() == 1); // reference still matches
        assert_eq!(repo.search("mainten", 20).await.unwrap().len(), 1);
    }
}
