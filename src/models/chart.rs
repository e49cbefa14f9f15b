//! Data handed to the client-side chart.

use super::{ChartLabels, PriceObservation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date layout passed to the client, which formats it for the viewer's locale
pub const CHART_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single `{change_date, price}` point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub change_date: String,
    pub price: Decimal,
}

impl From<&PriceObservation> for ChartPoint {
    fn from(observation: &PriceObservation) -> Self {
        Self {
            change_date: observation.change_date.format(CHART_DATE_FORMAT).to_string(),
            price: observation.price,
        }
    }
}

/// Labels plus the series for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: ChartLabels,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    /// Project observations into chart points, keeping their order
    pub fn from_observations(labels: ChartLabels, observations: &[PriceObservation]) -> Self {
        Self {
            labels,
            points: observations.iter().map(ChartPoint::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X-axis values
    pub fn dates(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.change_date.as_str()).collect()
    }

    /// Y-axis values
    pub fn prices(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// JSON payload embedded by the host view
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
