use crate::error::AppResult;
use crate::models::{ChartData, HistorySettings, ProductId};
use crate::repositories::PriceHistoryStore;
use std::sync::Arc;
use tracing::debug;

/// Builds the chart payload for a product page
pub struct ChartRenderer {
    store: Arc<dyn PriceHistoryStore>,
    settings: HistorySettings,
}

impl ChartRenderer {
    pub fn new(store: Arc<dyn PriceHistoryStore>, settings: HistorySettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Chart data for `product_id`, or `None` when the chart is switched off
    pub async fn chart_for(&self, product_id: ProductId) -> AppResult<Option<ChartData>> {
        if !self.settings.hook_active {
            return Ok(None);
        }

        let observations = self.store.query_by_product(product_id).await?;
        debug!(
            "Rendering {} price points for product {}",
            observations.len(),
            product_id
        );

        Ok(Some(ChartData::from_observations(
            self.settings.labels.clone(),
            &observations,
        )))
    }
}
