//! In-process stores with the same contracts as the Postgres repositories

use super::{ensure_selection, PriceHistoryStore, SettingsStore};
use crate::error::RepositoryError;
use crate::models::{PriceObservation, ProductId};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

#[derive(Default)]
struct HistoryLog {
    next_id: i64,
    rows: Vec<PriceObservation>,
}

/// Price observation log held in memory
#[derive(Default)]
pub struct InMemoryPriceHistoryStore {
    log: RwLock<HistoryLog>,
}

impl InMemoryPriceHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total observations across all products
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HistoryLog>, RepositoryError> {
        self.log.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HistoryLog>, RepositoryError> {
        self.log.write().map_err(|_| poisoned())
    }
}

#[async_trait]
impl PriceHistoryStore for InMemoryPriceHistoryStore {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn append(
        &self,
        product_id: ProductId,
        price: Decimal,
    ) -> Result<PriceObservation, RepositoryError> {
        let price = PriceObservation::normalize_price(price).map_err(RepositoryError::InvalidInput)?;

        let mut log = self.write()?;
        log.next_id += 1;
        let observation = PriceObservation {
            id: log.next_id,
            product_id,
            price,
            change_date: Utc::now().naive_utc(),
        };
        log.rows.push(observation.clone());
        Ok(observation)
    }

    async fn query_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PriceObservation>, RepositoryError> {
        let log = self.read()?;
        let mut observations: Vec<PriceObservation> = log
            .rows
            .iter()
            .filter(|o| o.product_id == product_id)
            .cloned()
            .collect();
        observations.sort_by(|a, b| a.change_date.cmp(&b.change_date).then(a.id.cmp(&b.id)));
        Ok(observations)
    }

    async fn latest_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<PriceObservation>, RepositoryError> {
        let log = self.read()?;
        Ok(log
            .rows
            .iter()
            .filter(|o| o.product_id == product_id)
            .max_by(|a, b| a.change_date.cmp(&b.change_date).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn purge_all(&self) -> Result<(), RepositoryError> {
        let mut log = self.write()?;
        // Mirrors TRUNCATE ... RESTART IDENTITY
        *log = HistoryLog::default();
        Ok(())
    }

    async fn purge_products(
        &self,
        product_ids: &BTreeSet<ProductId>,
    ) -> Result<u64, RepositoryError> {
        ensure_selection(product_ids)?;

        let mut log = self.write()?;
        let before = log.rows.len();
        log.rows.retain(|o| !product_ids.contains(&o.product_id));
        Ok((before - log.rows.len()) as u64)
    }
}

/// Option map held in memory
#[derive(Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), RepositoryError> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}
