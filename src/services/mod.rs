pub mod admin;
pub mod catalog;
pub mod chart;
pub mod lifecycle;
pub mod recorder;
pub mod settings;

pub use admin::{AdminNotice, AdminService, ClearTarget, SettingsForm};
pub use catalog::{ProductCatalog, StaticCatalog};
pub use chart::ChartRenderer;
pub use lifecycle::{LifecycleHooks, LifecycleListener};
pub use recorder::PriceChangeRecorder;
pub use settings::SettingsService;
