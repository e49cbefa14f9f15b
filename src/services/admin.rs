//! Administrative actions: saving display settings and clearing history.

use crate::error::{AppError, AppResult};
use crate::models::{ChartLabels, HistorySettings, ProductId};
use crate::repositories::PriceHistoryStore;
use crate::services::SettingsService;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub const SETTINGS_SAVED: &str = "Settings saved!";
pub const ALL_CLEARED: &str = "Price change history for all products cleared!";
pub const SELECTED_CLEARED: &str = "Price change history for selected products cleared!";
pub const NO_PRODUCTS_SELECTED: &str = "No products selected!";

/// Message shown to the operator after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum AdminNotice {
    Updated(String),
    Error(String),
}

impl AdminNotice {
    pub fn updated(message: impl Into<String>) -> Self {
        AdminNotice::Updated(message.into())
    }

    /// Operator-facing rendering of a failed action
    pub fn from_error(err: &AppError) -> Self {
        match err {
            AppError::Validation(msg) => AdminNotice::Error(msg.clone()),
            other => AdminNotice::Error(other.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AdminNotice::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            AdminNotice::Updated(msg) | AdminNotice::Error(msg) => msg,
        }
    }
}

impl fmt::Display for AdminNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Submitted settings form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub hook_active: bool,
    pub y_axis_title: String,
    pub x_axis_title: String,
    pub legend_label: String,
}

impl From<&HistorySettings> for SettingsForm {
    fn from(settings: &HistorySettings) -> Self {
        Self {
            hook_active: settings.hook_active,
            y_axis_title: settings.labels.y_axis_title.clone(),
            x_axis_title: settings.labels.x_axis_title.clone(),
            legend_label: settings.labels.legend_label.clone(),
        }
    }
}

impl SettingsForm {
    /// Sanitize the labels and reject blanks
    pub fn validate(&self) -> AppResult<HistorySettings> {
        let labels = ChartLabels::new(
            self.y_axis_title.as_str(),
            self.x_axis_title.as_str(),
            self.legend_label.as_str(),
        )
        .sanitized();

        let missing = labels.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Required fields are empty: {}",
                missing.join(", ")
            )));
        }

        Ok(HistorySettings {
            hook_active: self.hook_active,
            labels,
        })
    }
}

/// What a "clear history" request targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearTarget {
    AllProducts,
    Products(BTreeSet<ProductId>),
}

impl ClearTarget {
    /// Parse the form's selection mode and its comma-joined product ids
    pub fn parse(mode: &str, raw_ids: &str) -> AppResult<Self> {
        match mode.trim() {
            "all_products" => Ok(ClearTarget::AllProducts),
            "single_product" => Ok(ClearTarget::Products(parse_product_ids(raw_ids)?)),
            other => Err(AppError::Validation(format!(
                "Unknown clear type: {:?}",
                other
            ))),
        }
    }
}

/// Parse "12, 15,,19" style input; blanks are skipped and duplicates collapse
pub fn parse_product_ids(raw: &str) -> AppResult<BTreeSet<ProductId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<ProductId>()
                .map_err(|_| AppError::Validation(format!("Invalid product id: {:?}", token)))
        })
        .collect()
}

/// Backs the admin screen's two actions
pub struct AdminService {
    store: Arc<dyn PriceHistoryStore>,
    settings: SettingsService,
}

impl AdminService {
    pub fn new(store: Arc<dyn PriceHistoryStore>, settings: SettingsService) -> Self {
        Self { store, settings }
    }

    /// Current settings, for pre-filling the form
    pub async fn current_settings(&self) -> AppResult<HistorySettings> {
        self.settings.load().await
    }

    /// Validate and persist the settings form
    pub async fn save_settings(&self, form: &SettingsForm) -> AppResult<AdminNotice> {
        let settings = form.validate()?;
        self.settings.save(&settings).await?;
        Ok(AdminNotice::updated(SETTINGS_SAVED))
    }

    /// Purge history for every product or for a selection
    pub async fn clear_history(&self, target: &ClearTarget) -> AppResult<AdminNotice> {
        match target {
            ClearTarget::AllProducts => {
                self.store.purge_all().await?;
                info!("Cleared price history for all products");
                Ok(AdminNotice::updated(ALL_CLEARED))
            }
            ClearTarget::Products(ids) if ids.is_empty() => {
                Err(AppError::Validation(NO_PRODUCTS_SELECTED.to_string()))
            }
            ClearTarget::Products(ids) => {
                let removed = self.store.purge_products(ids).await?;
                info!(
                    "Cleared {} price observations for products {:?}",
                    removed, ids
                );
                Ok(AdminNotice::updated(SELECTED_CLEARED))
            }
        }
    }

    /// Run a form submission end to end, always producing a notice
    pub async fn handle_clear_form(&self, mode: &str, raw_ids: &str) -> AdminNotice {
        let result = match ClearTarget::parse(mode, raw_ids) {
            Ok(target) => self.clear_history(&target).await,
            Err(e) => Err(e),
        };
        notice_from(result)
    }

    /// Settings form counterpart of [`AdminService::handle_clear_form`]
    pub async fn handle_settings_form(&self, form: &SettingsForm) -> AdminNotice {
        notice_from(self.save_settings(form).await)
    }
}

fn notice_from(result: AppResult<AdminNotice>) -> AdminNotice {
    match result {
        Ok(notice) => notice,
        Err(e) => {
            warn!("Admin action failed: {}", e);
            AdminNotice::from_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryPriceHistoryStore, InMemorySettingsStore};
    use rust_decimal::Decimal;

    fn service() -> (Arc<InMemoryPriceHistoryStore>, AdminService) {
        let store = Arc::new(InMemoryPriceHistoryStore::new());
        let settings = SettingsService::new(Arc::new(InMemorySettingsStore::new()));
        (store.clone(), AdminService::new(store, settings))
    }

    fn form(y: &str, x: &str, legend: &str) -> SettingsForm {
        SettingsForm {
            hook_active: true,
            y_axis_title: y.to_string(),
            x_axis_title: x.to_string(),
            legend_label: legend.to_string(),
        }
    }

    #[test]
    fn test_parse_product_ids() {
        let ids = parse_product_ids(" 12, 15,,19 ,12").unwrap();
        assert_eq!(ids, BTreeSet::from([12, 15, 19]));
        assert!(parse_product_ids("").unwrap().is_empty());
        assert!(parse_product_ids("12,abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_clear_target_parse() {
        assert_eq!(
            ClearTarget::parse("all_products", "1,2").unwrap(),
            ClearTarget::AllProducts
        );
        assert_eq!(
            ClearTarget::parse("single_product", "3,4").unwrap(),
            ClearTarget::Products(BTreeSet::from([3, 4]))
        );
        assert!(ClearTarget::parse("everything", "").is_err());
    }

    #[test]
    fn test_settings_form_sanitizes() {
        let settings = form("  <b>Price</b> ", "Date", "USD").validate().unwrap();
        assert_eq!(settings.labels.y_axis_title, "Price");

        let err = form("Price", "   ", "USD").validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_save_settings_persists() {
        let (_store, admin) = service();
        let mut submitted = form("Price", "Date", "USD");
        submitted.hook_active = false;

        let notice = admin.save_settings(&submitted).await.unwrap();
        assert_eq!(notice, AdminNotice::updated(SETTINGS_SAVED));

        let current = admin.current_settings().await.unwrap();
        assert!(!current.hook_active);
        assert_eq!(SettingsForm::from(&current), submitted);
    }

    #[tokio::test]
    async fn test_invalid_settings_write_nothing() {
        let (_store, admin) = service();
        let notice = admin.handle_settings_form(&form("", "Date", "USD")).await;
        assert!(notice.is_error());
        assert_eq!(
            admin.current_settings().await.unwrap(),
            HistorySettings::default()
        );
    }

    #[tokio::test]
    async fn test_clear_selected_products() {
        let (store, admin) = service();
        store.append(1, Decimal::ONE).await.unwrap();
        store.append(2, Decimal::ONE).await.unwrap();
        store.append(3, Decimal::ONE).await.unwrap();

        let notice = admin.handle_clear_form("single_product", "1,2").await;
        assert_eq!(notice.message(), SELECTED_CLEARED);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.query_by_product(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empty_selection_rejected() {
        let (store, admin) = service();
        store.append(1, Decimal::ONE).await.unwrap();

        let notice = admin.handle_clear_form("single_product", " , ").await;
        assert_eq!(notice, AdminNotice::Error(NO_PRODUCTS_SELECTED.to_string()));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let (store, admin) = service();
        store.append(1, Decimal::ONE).await.unwrap();
        store.append(2, Decimal::ONE).await.unwrap();

        let notice = admin.clear_history(&ClearTarget::AllProducts).await.unwrap();
        assert_eq!(notice.to_string(), ALL_CLEARED);
        assert!(store.is_empty().unwrap());
    }
}
