use async_trait::async_trait;
use price_history::error::RepositoryError;
use price_history::models::{PriceObservation, ProductId};
use price_history::repositories::*;
use price_history::services::ProductCatalog;
use price_history::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

/// Test database configuration
pub struct TestDatabase {
    pub pool: PgPool,
    pub history_repo: Arc<PriceHistoryRepository>,
    pub settings_repo: Arc<SettingsRepository>,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (useful with sqlx::test)
    pub async fn from_pool(pool: PgPool) -> Self {
        let tables = TableNames::default();
        let db = Self {
            pool: pool.clone(),
            history_repo: Arc::new(PriceHistoryRepository::with_tables(pool.clone(), &tables)),
            settings_repo: Arc::new(SettingsRepository::with_tables(pool, &tables)),
        };

        db.history_repo
            .initialize()
            .await
            .expect("Failed to create history table");
        db.settings_repo
            .initialize()
            .await
            .expect("Failed to create options table");

        db
    }

    /// Clean up all test data
    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE TABLE price_change_history, price_history_options RESTART IDENTITY")
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup test data");
    }
}

/// Parse a decimal literal
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

/// Catalog whose lookups always fail
pub struct BrokenCatalog;

#[async_trait]
impl ProductCatalog for BrokenCatalog {
    async fn current_price(&self, _product_id: ProductId) -> AppResult<Option<Decimal>> {
        Err(AppError::Message("catalog offline".to_string()))
    }
}

/// Store whose every operation reports the backend as unreachable
pub struct UnavailableStore;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl PriceHistoryStore for UnavailableStore {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        Err(offline())
    }

    async fn append(
        &self,
        _product_id: ProductId,
        _price: Decimal,
    ) -> Result<PriceObservation, RepositoryError> {
        Err(offline())
    }

    async fn query_by_product(
        &self,
        _product_id: ProductId,
    ) -> Result<Vec<PriceObservation>, RepositoryError> {
        Err(offline())
    }

    async fn latest_for_product(
        &self,
        _product_id: ProductId,
    ) -> Result<Option<PriceObservation>, RepositoryError> {
        Err(offline())
    }

    async fn purge_all(&self) -> Result<(), RepositoryError> {
        Err(offline())
    }

    async fn purge_products(
        &self,
        _product_ids: &BTreeSet<ProductId>,
    ) -> Result<u64, RepositoryError> {
        Err(offline())
    }
}

// ============================================================================
// Store contract checks, shared by every PriceHistoryStore implementation
// ============================================================================

pub async fn check_append_then_query(store: &dyn PriceHistoryStore) {
    let stored = store
        .append(5, dec("19.99"))
        .await
        .expect("Failed to append");

    let history = store.query_by_product(5).await.expect("Failed to query");
    assert!(history.iter().any(|o| o.id == stored.id));
    assert!(history.iter().all(|o| o.product_id == 5));
    assert_eq!(history.last().unwrap().price, dec("19.99"));
}

pub async fn check_query_isolation(store: &dyn PriceHistoryStore) {
    store.append(1, dec("10.00")).await.unwrap();
    store.append(2, dec("20.00")).await.unwrap();
    store.append(1, dec("11.00")).await.unwrap();

    let history = store.query_by_product(1).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|o| o.product_id == 1));

    assert!(store.query_by_product(3).await.unwrap().is_empty());
}

pub async fn check_ordered_scenario(store: &dyn PriceHistoryStore) {
    store.append(42, dec("100.00")).await.unwrap();
    store.append(42, dec("120.50")).await.unwrap();

    let history = store.query_by_product(42).await.unwrap();
    let prices: Vec<Decimal> = history.iter().map(|o| o.price).collect();
    assert_eq!(prices, vec![dec("100.00"), dec("120.50")]);
    assert!(history[0].change_date <= history[1].change_date);
    assert!(history[0].id < history[1].id);
}

pub async fn check_purge_all(store: &dyn PriceHistoryStore) {
    store.append(1, dec("1.00")).await.unwrap();
    store.append(2, dec("2.00")).await.unwrap();

    store.purge_all().await.unwrap();

    for id in [1, 2, 3] {
        assert!(store.query_by_product(id).await.unwrap().is_empty());
    }
}

pub async fn check_purge_products(store: &dyn PriceHistoryStore) {
    store.append(10, dec("1.00")).await.unwrap();
    store.append(11, dec("2.00")).await.unwrap();
    store.append(11, dec("2.50")).await.unwrap();
    store.append(12, dec("3.00")).await.unwrap();

    let removed = store
        .purge_products(&BTreeSet::from([10, 11]))
        .await
        .unwrap();
    assert_eq!(removed, 3);

    assert!(store.query_by_product(10).await.unwrap().is_empty());
    assert!(store.query_by_product(11).await.unwrap().is_empty());
    assert_eq!(store.query_by_product(12).await.unwrap().len(), 1);
}

pub async fn check_purge_empty_selection(store: &dyn PriceHistoryStore) {
    store.append(7, dec("7.00")).await.unwrap();

    let err = store.purge_products(&BTreeSet::new()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));

    assert_eq!(store.query_by_product(7).await.unwrap().len(), 1);
}

pub async fn check_append_rejects_out_of_range(store: &dyn PriceHistoryStore) {
    store.append(8, dec("99999999.99")).await.unwrap();

    for raw in ["123456789012.00", "100000000.00", "-0.01"] {
        let err = store.append(8, dec(raw)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidInput(_)), "{}", raw);
    }

    let history = store.query_by_product(8).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, dec("99999999.99"));
}

pub async fn check_initialize_twice(store: &dyn PriceHistoryStore) {
    store.initialize().await.unwrap();
    store.append(3, dec("3.30")).await.unwrap();

    store.initialize().await.unwrap();
    store.initialize().await.unwrap();

    let history = store.query_by_product(3).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, dec("3.30"));
}
