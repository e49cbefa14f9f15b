use crate::models::{EntityEvent, PriceObservation, RecordMode};
use crate::repositories::PriceHistoryStore;
use crate::services::{LifecycleListener, ProductCatalog};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Appends the current product price to the history on save and delete
pub struct PriceChangeRecorder {
    store: Arc<dyn PriceHistoryStore>,
    catalog: Arc<dyn ProductCatalog>,
    mode: RecordMode,
}

impl PriceChangeRecorder {
    /// Create a recorder that appends on every qualifying event
    pub fn new(store: Arc<dyn PriceHistoryStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            store,
            catalog,
            mode: RecordMode::Always,
        }
    }

    /// Set record mode
    pub fn with_mode(mut self, mode: RecordMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> RecordMode {
        self.mode
    }

    /// Record the product's current price.
    ///
    /// Returns the stored observation, or `None` when the event was skipped or
    /// the append failed. Failures are logged and never returned.
    pub async fn record(&self, event: &EntityEvent) -> Option<PriceObservation> {
        if !event.is_product() {
            return None;
        }
        let product_id = event.entity_id;

        let price = match self.catalog.current_price(product_id).await {
            Ok(Some(price)) => price,
            Ok(None) => {
                debug!("Product {} not found or has no price, skipping", product_id);
                return None;
            }
            Err(e) => {
                warn!("Price lookup for product {} failed: {}", product_id, e);
                return None;
            }
        };

        if self.mode == RecordMode::OnChange {
            match self.store.latest_for_product(product_id).await {
                Ok(Some(latest)) if PriceObservation::normalize_price(price) == Ok(latest.price) => {
                    debug!("Price of product {} unchanged at {}", product_id, latest.price);
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Could not read latest price for product {}: {}",
                        product_id, e
                    );
                    return None;
                }
            }
        }

        match self.store.append(product_id, price).await {
            Ok(observation) => {
                info!(
                    "Recorded price {} for product {}",
                    observation.price, product_id
                );
                Some(observation)
            }
            Err(e) => {
                warn!(
                    "Failed to record price {} for product {}: {}",
                    price, product_id, e
                );
                None
            }
        }
    }
}

#[async_trait]
impl LifecycleListener for PriceChangeRecorder {
    async fn on_saved(&self, event: &EntityEvent) {
        self.record(event).await;
    }

    /// Leaves a tail record with the price the product had when it was deleted
    async fn on_deleting(&self, event: &EntityEvent) {
        self.record(event).await;
    }
}
