use super::ProductId;
use serde::{Deserialize, Serialize};

/// Type tag carried by a host lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Product,
    Other(String),
}

impl EntityType {
    /// Convert from the host's type tag; other tags keep their casing
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("product") {
            EntityType::Product
        } else {
            EntityType::Other(tag.to_string())
        }
    }

    /// Convert back to the host's type tag
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Product => "product",
            EntityType::Other(tag) => tag,
        }
    }
}

impl From<&str> for EntityType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// "Entity saved" / "entity about to be deleted" payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEvent {
    pub entity_id: ProductId,
    pub entity_type: EntityType,
}

impl EntityEvent {
    pub fn new(entity_id: ProductId, entity_type: impl Into<EntityType>) -> Self {
        Self {
            entity_id,
            entity_type: entity_type.into(),
        }
    }

    /// Shorthand for a product event
    pub fn product(entity_id: ProductId) -> Self {
        Self::new(entity_id, EntityType::Product)
    }

    pub fn is_product(&self) -> bool {
        self.entity_type == EntityType::Product
    }
}

/// When the recorder appends a new observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordMode {
    /// Every qualifying save or delete, even with an unchanged price
    #[default]
    Always,
    /// Only when the price differs from the latest stored observation
    OnChange,
}

impl RecordMode {
    /// Convert from a config string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "always" => Ok(RecordMode::Always),
            "on_change" | "on-change" => Ok(RecordMode::OnChange),
            _ => Err(format!(
                "Invalid PRICE_HISTORY_RECORD_MODE: {}. Must be one of: always, on_change",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordMode::Always => "always",
            RecordMode::OnChange => "on_change",
        }
    }
}
