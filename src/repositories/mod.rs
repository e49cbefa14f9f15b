//! Storage seams for price observations and settings.
//!
//! The traits are what services depend on; Postgres backs them in production
//! and the in-memory versions back tests and database-less hosts.

pub mod memory;
pub mod price_history_repository;
pub mod settings_repository;

// Re-export all repositories for convenient access
pub use memory::{InMemoryPriceHistoryStore, InMemorySettingsStore};
pub use price_history_repository::PriceHistoryRepository;
pub use settings_repository::SettingsRepository;

use crate::config::validate_table_prefix;
use crate::error::RepositoryError;
use crate::models::{PriceObservation, ProductId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeSet;

/// Base name of the observation table
pub const HISTORY_TABLE: &str = "price_change_history";

/// Base name of the key-value options table
pub const OPTIONS_TABLE: &str = "price_history_options";

/// Append-only log of price observations
#[async_trait]
pub trait PriceHistoryStore: Send + Sync {
    /// Create backing storage if it does not exist yet; safe to repeat
    async fn initialize(&self) -> Result<(), RepositoryError>;

    /// Record `price` for `product_id` at the current time
    async fn append(
        &self,
        product_id: ProductId,
        price: Decimal,
    ) -> Result<PriceObservation, RepositoryError>;

    /// All observations for a product, oldest first
    async fn query_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PriceObservation>, RepositoryError>;

    /// Most recent observation for a product
    async fn latest_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<PriceObservation>, RepositoryError>;

    /// Delete every observation of every product
    async fn purge_all(&self) -> Result<(), RepositoryError>;

    /// Delete every observation of the given products, returning rows removed
    async fn purge_products(
        &self,
        product_ids: &BTreeSet<ProductId>,
    ) -> Result<u64, RepositoryError>;
}

/// Generic key-value option storage
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), RepositoryError>;

    /// Value for `key`, or `default` when unset
    async fn get_or(&self, key: &str, default: Value) -> Result<Value, RepositoryError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }
}

/// Resolved table names for a given prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    history: String,
    options: String,
}

impl TableNames {
    pub fn new(prefix: &str) -> Result<Self, RepositoryError> {
        validate_table_prefix(prefix).map_err(RepositoryError::InvalidInput)?;
        Ok(Self {
            history: format!("{}{}", prefix, HISTORY_TABLE),
            options: format!("{}{}", prefix, OPTIONS_TABLE),
        })
    }

    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn options(&self) -> &str {
        &self.options
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            history: HISTORY_TABLE.to_string(),
            options: OPTIONS_TABLE.to_string(),
        }
    }
}

/// Purging nothing is a caller mistake, not a no-op success
pub(crate) fn ensure_selection(product_ids: &BTreeSet<ProductId>) -> Result<(), RepositoryError> {
    if product_ids.is_empty() {
        return Err(RepositoryError::InvalidInput(
            "No products selected".to_string(),
        ));
    }
    Ok(())
}
