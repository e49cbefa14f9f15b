use super::{SettingsStore, TableNames};
use crate::error::RepositoryError;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

/// Key-value options stored as JSONB rows
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
    table: String,
}

impl SettingsRepository {
    /// Create a new SettingsRepository on the unprefixed table
    pub fn new(pool: PgPool) -> Self {
        Self::with_tables(pool, &TableNames::default())
    }

    pub fn with_tables(pool: PgPool, tables: &TableNames) -> Self {
        Self {
            pool,
            table: tables.options().to_string(),
        }
    }

    /// Create the options table if missing
    pub async fn initialize(&self) -> Result<(), RepositoryError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                option_key TEXT PRIMARY KEY,
                option_value JSONB NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT (now() AT TIME ZONE 'utc')
            )
            "#,
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
        let sql = format!(
            "SELECT option_value FROM {} WHERE option_key = $1",
            self.table
        );
        let value = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value.map(|Json(v)| v))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO {} (option_key, option_value)
            VALUES ($1, $2)
            ON CONFLICT (option_key) DO UPDATE
            SET option_value = EXCLUDED.option_value, updated_at = NOW()
            "#,
            self.table
        );
        sqlx::query(&sql)
            .bind(key)
            .bind(Json(value))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
