//! Domain models for price history.
//!
//! This module contains the stored observation row plus the value types
//! exchanged with the host catalog, the chart view and the admin screen.

pub mod chart;
pub mod lifecycle;
pub mod price_observation;
pub mod settings;

// Re-export all models for convenient access
pub use chart::{ChartData, ChartPoint};
pub use lifecycle::{EntityEvent, EntityType, RecordMode};
pub use price_observation::{PriceObservation, ProductId};
pub use settings::{ChartLabels, HistorySettings, HOOK_ACTIVE_KEY, LABELS_KEY};
