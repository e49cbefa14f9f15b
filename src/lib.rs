//! Price History Library
//!
//! Records product price observations on catalog lifecycle events and serves
//! them back as chart data, with admin actions to configure labels and purge.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use models::RecordMode;
use repositories::{PriceHistoryRepository, PriceHistoryStore, SettingsRepository, TableNames};
use services::{
    AdminService, ChartRenderer, LifecycleHooks, PriceChangeRecorder, ProductCatalog,
    SettingsService,
};
use std::sync::Arc;

/// Application state containing the repositories and the services built on them
pub struct AppState {
    pub history_repo: Arc<PriceHistoryRepository>,
    pub settings_repo: Arc<SettingsRepository>,
}

impl AppState {
    /// Create a new AppState with repositories on the given tables
    pub fn new(pool: sqlx::PgPool, tables: &TableNames) -> Self {
        Self {
            history_repo: Arc::new(PriceHistoryRepository::with_tables(pool.clone(), tables)),
            settings_repo: Arc::new(SettingsRepository::with_tables(pool, tables)),
        }
    }

    /// Create both tables if missing
    pub async fn initialize(&self) -> AppResult<()> {
        self.history_repo.initialize().await?;
        self.settings_repo.initialize().await?;
        Ok(())
    }

    pub fn settings_service(&self) -> SettingsService {
        SettingsService::new(self.settings_repo.clone())
    }

    pub fn admin_service(&self) -> AdminService {
        AdminService::new(self.history_repo.clone(), self.settings_service())
    }

    /// Renderer with settings loaded now; reload by building a new one
    pub async fn chart_renderer(&self) -> AppResult<ChartRenderer> {
        let settings = self.settings_service().load().await?;
        Ok(ChartRenderer::new(self.history_repo.clone(), settings))
    }

    pub fn recorder(
        &self,
        catalog: Arc<dyn ProductCatalog>,
        mode: RecordMode,
    ) -> PriceChangeRecorder {
        PriceChangeRecorder::new(self.history_repo.clone(), catalog).with_mode(mode)
    }

    /// Hooks with the price recorder registered
    pub fn lifecycle_hooks(
        &self,
        catalog: Arc<dyn ProductCatalog>,
        mode: RecordMode,
    ) -> LifecycleHooks {
        let mut hooks = LifecycleHooks::new();
        hooks.register(Arc::new(self.recorder(catalog, mode)));
        hooks
    }
}
