//! Postgres-backed brand store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | BrandStoreError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `DuplicateName` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / Io / other | N/A | `Unavailable` |
//!
//! Uniqueness of `name` is enforced by the database, so two concurrent saves of
//! the same name resolve to exactly one success.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use catalog_brands::{Brand, BrandDetails, BrandId, BrandName, BrandStore, BrandStoreError, WebLink};
use catalog_core::EntityId;

/// Schema applied by [`PostgresBrandStore::ensure_schema`].
pub const BRANDS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS brands (
    id          UUID PRIMARY KEY,
    name        VARCHAR(100) NOT NULL UNIQUE,
    description TEXT,
    website     VARCHAR(255),
    logo_url    VARCHAR(255),
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresBrandStore {
    pool: Arc<PgPool>,
}

impl PostgresBrandStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, BrandStoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", None, e))?;
        Ok(Self::new(pool))
    }

    /// Create the `brands` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), BrandStoreError> {
        sqlx::query(BRANDS_SCHEMA)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", None, e))?;
        Ok(())
    }

    async fn insert(&self, brand: Brand) -> Result<Brand, BrandStoreError> {
        let id = BrandId::generate();
        let details = brand.details();

        let row = sqlx::query(
            r#"
            INSERT INTO brands (id, name, description, website, logo_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING created_at, updated_at
            "#,
        )
        .bind(*id.0.as_uuid())
        .bind(details.name.as_str())
        .bind(details.description.as_deref())
        .bind(details.website.as_ref().map(WebLink::as_str))
        .bind(details.logo_url.as_ref().map(WebLink::as_str))
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("insert_brand", Some(details.name.as_str()), e))?;

        restore_from_timestamps(id, details.clone(), &row)
    }

    async fn update(&self, id: BrandId, brand: Brand) -> Result<Brand, BrandStoreError> {
        let details = brand.details();

        // updated_at never moves backwards.
        let row = sqlx::query(
            r#"
            UPDATE brands
            SET name = $2,
                description = $3,
                website = $4,
                logo_url = $5,
                updated_at = GREATEST(updated_at, $6)
            WHERE id = $1
            RETURNING created_at, updated_at
            "#,
        )
        .bind(*id.0.as_uuid())
        .bind(details.name.as_str())
        .bind(details.description.as_deref())
        .bind(details.website.as_ref().map(WebLink::as_str))
        .bind(details.logo_url.as_ref().map(WebLink::as_str))
        .bind(Utc::now())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("update_brand", Some(details.name.as_str()), e))?
        .ok_or_else(|| BrandStoreError::InvalidState(format!("unknown brand {id}")))?;

        restore_from_timestamps(id, details.clone(), &row)
    }
}

#[async_trait]
impl BrandStore for PostgresBrandStore {
    #[instrument(skip(self, brand), fields(brand.name = %brand.name()), err)]
    async fn save(&self, brand: Brand) -> Result<Brand, BrandStoreError> {
        match brand.brand_id() {
            None => self.insert(brand).await,
            Some(id) => self.update(id, brand).await,
        }
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: BrandId) -> Result<Option<Brand>, BrandStoreError> {
        let row: Option<BrandRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, website, logo_url, created_at, updated_at
            FROM brands
            WHERE id = $1
            "#,
        )
        .bind(*id.0.as_uuid())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("find_brand_by_id", None, e))?;

        row.map(BrandRow::into_brand).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> Result<Option<Brand>, BrandStoreError> {
        let row: Option<BrandRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, website, logo_url, created_at, updated_at
            FROM brands
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("find_brand_by_name", None, e))?;

        row.map(BrandRow::into_brand).transpose()
    }
}

fn restore_from_timestamps(
    id: BrandId,
    details: BrandDetails,
    row: &PgRow,
) -> Result<Brand, BrandStoreError> {
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| map_sqlx_error("decode_timestamps", None, e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| map_sqlx_error("decode_timestamps", None, e))?;

    Brand::restore(id, details, created_at, updated_at)
        .map_err(|e| BrandStoreError::InvalidState(e.to_string()))
}

/// Map SQLx errors to `BrandStoreError`. `name` is reported on unique violations.
fn map_sqlx_error(operation: &str, name: Option<&str>, err: sqlx::Error) -> BrandStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                return BrandStoreError::DuplicateName(name.unwrap_or_default().to_string());
            }
            BrandStoreError::Unavailable(format!(
                "database error in {}: {}",
                operation,
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            BrandStoreError::Unavailable(format!("connection pool closed during {}", operation))
        }
        other => BrandStoreError::Unavailable(format!("error in {}: {}", operation, other)),
    }
}

/// Row shape of the `brands` table.
#[derive(Debug, Clone)]
struct BrandRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    website: Option<String>,
    logo_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for BrandRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            website: row.try_get("website")?,
            logo_url: row.try_get("logo_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl BrandRow {
    /// Rows are re-validated on the way out; a row that no longer satisfies
    /// the brand rules is reported as `InvalidState`.
    fn into_brand(self) -> Result<Brand, BrandStoreError> {
        let invalid = |e: &dyn std::fmt::Display| {
            BrandStoreError::InvalidState(format!("stored brand {}: {}", self.id, e))
        };

        let name = BrandName::parse(self.name.clone()).map_err(|e| invalid(&e))?;
        let website = self
            .website
            .clone()
            .map(|w| WebLink::parse("website", w))
            .transpose()
            .map_err(|e| invalid(&e))?;
        let logo_url = self
            .logo_url
            .clone()
            .map(|l| WebLink::parse("logoUrl", l))
            .transpose()
            .map_err(|e| invalid(&e))?;

        let details = BrandDetails {
            name,
            description: self.description.clone(),
            website,
            logo_url,
        };

        Brand::restore(
            BrandId::new(EntityId::from_uuid(self.id)),
            details,
            self.created_at,
            self.updated_at,
        )
        .map_err(|e| invalid(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, website: Option<&str>) -> BrandRow {
        let now = Utc::now();
        BrandRow {
            id: Uuid::now_v7(),
            name: name.to_string(),
            description: None,
            website: website.map(str::to_string),
            logo_url: Some("sportmaster-logo.png".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn valid_row_restores_a_persisted_brand() {
        let row = row("SportMaster", Some("https://sportmaster.com"));
        let id = row.id;

        let brand = row.into_brand().unwrap();

        assert_eq!(brand.brand_id().unwrap().0.as_uuid(), &id);
        assert_eq!(brand.name().as_str(), "SportMaster");
        assert_eq!(brand.logo_url().unwrap().as_str(), "sportmaster-logo.png");
    }

    #[test]
    fn corrupt_row_is_invalid_state() {
        let err = row("   ", None).into_brand().unwrap_err();
        assert!(matches!(err, BrandStoreError::InvalidState(_)));

        let err = row("SportMaster", Some("bad link")).into_brand().unwrap_err();
        assert!(matches!(err, BrandStoreError::InvalidState(_)));
    }

    #[test]
    fn non_database_errors_are_unavailable() {
        let err = map_sqlx_error("insert_brand", Some("SportMaster"), sqlx::Error::PoolClosed);
        assert!(matches!(err, BrandStoreError::Unavailable(_)));

        let err = map_sqlx_error("find_brand_by_id", None, sqlx::Error::RowNotFound);
        assert!(matches!(err, BrandStoreError::Unavailable(_)));
    }

    #[test]
    fn schema_enforces_unique_names() {
        assert!(BRANDS_SCHEMA.contains("name        VARCHAR(100) NOT NULL UNIQUE"));
    }
}
