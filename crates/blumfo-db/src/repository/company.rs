//! # Company Repository
//!
//! Database operations for the tenant's own company profile, the block
//! printed in the header of every invoice and quote. One row per tenant,
//! keyed by the tenant id itself, written with an upsert.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use blumfo_core::Company;

const COLUMNS: &str = "id, name, address, email, phone, registration_number, \
                       vat_number, created_at, updated_at";

/// Repository for the company profile.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Gets the company profile for a tenant.
    ///
    /// ## Returns
    /// * `Ok(None)` - Profile never saved (first-run wizard not completed)
    pub async fn get(&self, tenant_id: &str) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COLUMNS} FROM companies WHERE id = ?1"
        ))
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Creates or replaces the company profile.
    ///
    /// Upsert keeps the original created_at on conflict.
    pub async fn upsert(&self, company: &Company) -> DbResult<()> {
        debug!(id = %company.id, name = %company.name, "Saving company profile");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO companies (
                id, name, address, email, phone,
                registration_number, vat_number, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                email = excluded.email,
                phone = excluded.phone,
                registration_number = excluded.registration_number,
                vat_number = excluded.vat_number,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.email)
        .bind(&company.phone)
        .bind(&company.registration_number)
        .bind(&company.vat_number)
        .bind(company.created_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use blumfo_core::DEFAULT_TENANT_ID;

    fn sample_company() -> Company {
        Company {
            id: DEFAULT_TENANT_ID.to_string(),
            name: "Atelier Dupont".to_string(),
            address: Some("12 rue de la Paix, 75002 Paris".to_string()),
            email: Some("contact@atelier-dupont.fr".to_string()),
            phone: None,
            registration_number: Some("123 456 789 00012".to_string()),
            vat_number: Some("FR12345678901".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_before_save_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.companies().get(DEFAULT_TENANT_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();

        let mut company = sample_company();
        repo.upsert(&company).await.unwrap();

        let found = repo.get(DEFAULT_TENANT_ID).await.unwrap().unwrap();
        assert_eq!(found.name, "Atelier Dupont");

        // Second save replaces fields, same row
        company.name = "Atelier Dupont & Fils".to_string();
        repo.upsert(&company).await.unwrap();

        let found = repo.get(DEFAULT_TENANT_ID).await.unwrap().unwrap();
        assert_eq!(found.name, "Atelier Dupont & Fils");
    }
}
