//! Postgres-backed price observation log

use super::{ensure_selection, PriceHistoryStore, TableNames};
use crate::error::RepositoryError;
use crate::models::{PriceObservation, ProductId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Repository for price observation data access
#[derive(Clone)]
pub struct PriceHistoryRepository {
    pool: PgPool,
    table: String,
}

impl PriceHistoryRepository {
    /// Create a new PriceHistoryRepository on the unprefixed table
    pub fn new(pool: PgPool) -> Self {
        Self::with_tables(pool, &TableNames::default())
    }

    /// Create a repository using the given (prefixed) table names
    pub fn with_tables(pool: PgPool, tables: &TableNames) -> Self {
        Self {
            pool,
            table: tables.history().to_string(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Total observations across all products
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl PriceHistoryStore for PriceHistoryRepository {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                product_id BIGINT NOT NULL,
                price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
                change_date TIMESTAMP NOT NULL DEFAULT (now() AT TIME ZONE 'utc')
            )
            "#,
            table = self.table
        );
        sqlx::query(&create_table).execute(&self.pool).await?;

        // Tables created with a session-local default are moved to UTC
        let utc_default = format!(
            "ALTER TABLE {table} ALTER COLUMN change_date SET DEFAULT (now() AT TIME ZONE 'utc')",
            table = self.table
        );
        sqlx::query(&utc_default).execute(&self.pool).await?;

        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_product_date_idx ON {table} (product_id, change_date)",
            table = self.table
        );
        sqlx::query(&create_index).execute(&self.pool).await?;

        info!("Price history table {} ready", self.table);
        Ok(())
    }

    async fn append(
        &self,
        product_id: ProductId,
        price: Decimal,
    ) -> Result<PriceObservation, RepositoryError> {
        let price = PriceObservation::normalize_price(price).map_err(RepositoryError::InvalidInput)?;

        let sql = format!(
            r#"
            INSERT INTO {} (product_id, price)
            VALUES ($1, $2)
            RETURNING id, product_id, price, change_date
            "#,
            self.table
        );
        let observation = sqlx::query_as::<_, PriceObservation>(&sql)
            .bind(product_id)
            .bind(price)
            .fetch_one(&self.pool)
            .await?;

        debug!(
            "Recorded price {} for product {} (observation {})",
            observation.price, observation.product_id, observation.id
        );
        Ok(observation)
    }

    async fn query_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PriceObservation>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT id, product_id, price, change_date
            FROM {}
            WHERE product_id = $1
            ORDER BY change_date ASC, id ASC
            "#,
            self.table
        );
        let observations = sqlx::query_as::<_, PriceObservation>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(observations)
    }

    async fn latest_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<PriceObservation>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT id, product_id, price, change_date
            FROM {}
            WHERE product_id = $1
            ORDER BY change_date DESC, id DESC
            LIMIT 1
            "#,
            self.table
        );
        let observation = sqlx::query_as::<_, PriceObservation>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(observation)
    }

    async fn purge_all(&self) -> Result<(), RepositoryError> {
        let sql = format!("TRUNCATE TABLE {} RESTART IDENTITY", self.table);
        sqlx::query(&sql).execute(&self.pool).await?;
        info!("Purged all price history from {}", self.table);
        Ok(())
    }

    async fn purge_products(
        &self,
        product_ids: &BTreeSet<ProductId>,
    ) -> Result<u64, RepositoryError> {
        ensure_selection(product_ids)?;

        let ids: Vec<ProductId> = product_ids.iter().copied().collect();
        let sql = format!("DELETE FROM {} WHERE product_id = ANY($1)", self.table);
        let result = sqlx::query(&sql).bind(&ids).execute(&self.pool).await?;

        info!(
            "Purged {} price observations for {} products",
            result.rows_affected(),
            ids.len()
        );
        Ok(result.rows_affected())
    }
}
