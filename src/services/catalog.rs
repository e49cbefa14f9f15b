//! Product price lookup, owned by the host catalog.

use crate::error::{AppError, AppResult};
use crate::models::ProductId;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;

/// Resolves a product's current price
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// `Ok(None)` when the product does not exist or has no price set
    async fn current_price(&self, product_id: ProductId) -> AppResult<Option<Decimal>>;
}

/// Catalog backed by a fixed price table
#[derive(Default)]
pub struct StaticCatalog {
    prices: RwLock<HashMap<ProductId, Decimal>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Owning the catalog means no other guard exists,
    /// so the table is written even if an earlier panic poisoned the lock.
    pub fn with_price(mut self, product_id: ProductId, price: Decimal) -> Self {
        let prices = match self.prices.get_mut() {
            Ok(prices) => prices,
            Err(poisoned) => poisoned.into_inner(),
        };
        prices.insert(product_id, price);
        self
    }

    /// Set or replace a product's price
    pub fn set_price(&self, product_id: ProductId, price: Decimal) -> AppResult<()> {
        let mut prices = self
            .prices
            .write()
            .map_err(|_| AppError::Message("catalog lock poisoned".to_string()))?;
        prices.insert(product_id, price);
        Ok(())
    }

    /// Drop a product, as if it had been deleted from the catalog
    pub fn remove(&self, product_id: ProductId) -> AppResult<()> {
        let mut prices = self
            .prices
            .write()
            .map_err(|_| AppError::Message("catalog lock poisoned".to_string()))?;
        prices.remove(&product_id);
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn current_price(&self, product_id: ProductId) -> AppResult<Option<Decimal>> {
        let prices = self
            .prices
            .read()
            .map_err(|_| AppError::Message("catalog lock poisoned".to_string()))?;
        Ok(prices.get(&product_id).copied())
    }
}
