use crate::error::AppResult;
use crate::models::{HistorySettings, HOOK_ACTIVE_KEY, LABELS_KEY};
use crate::repositories::SettingsStore;
use std::sync::Arc;
use tracing::info;

/// Typed access to the display settings in the option store
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Load settings, using defaults for anything unset or unreadable
    pub async fn load(&self) -> AppResult<HistorySettings> {
        let hook_active = self.store.get(HOOK_ACTIVE_KEY).await?;
        let labels = self.store.get(LABELS_KEY).await?;
        Ok(HistorySettings::from_values(
            hook_active.as_ref(),
            labels.as_ref(),
        ))
    }

    /// Persist both settings keys
    pub async fn save(&self, settings: &HistorySettings) -> AppResult<()> {
        for (key, value) in settings.to_values()? {
            self.store.set(key, value).await?;
        }
        info!(
            "Saved price history settings (chart {})",
            if settings.hook_active { "enabled" } else { "disabled" }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartLabels;
    use crate::repositories::InMemorySettingsStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_defaults_when_empty() {
        let service = SettingsService::new(Arc::new(InMemorySettingsStore::new()));
        assert_eq!(service.load().await.unwrap(), HistorySettings::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let service = SettingsService::new(Arc::new(InMemorySettingsStore::new()));
        let settings = HistorySettings {
            hook_active: false,
            labels: ChartLabels::new("Price", "Date", "USD"),
        };

        service.save(&settings).await.unwrap();
        assert_eq!(service.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_load_legacy_integer_flag() {
        let store = Arc::new(InMemorySettingsStore::new());
        store.set(HOOK_ACTIVE_KEY, json!(0)).await.unwrap();

        let service = SettingsService::new(store);
        let settings = service.load().await.unwrap();
        assert!(!settings.hook_active);
        assert_eq!(settings.labels, ChartLabels::default());
    }
}
