//! Explicit registration of product lifecycle listeners.

use crate::models::EntityEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Consumer of host "entity saved" / "entity about to be deleted" notifications.
///
/// Implementations must not fail the host's save or delete; they return nothing
/// and deal with their own errors.
#[async_trait]
pub trait LifecycleListener: Send + Sync {
    async fn on_saved(&self, event: &EntityEvent);

    async fn on_deleting(&self, event: &EntityEvent);
}

/// Listeners registered by the composition root, notified in registration order
#[derive(Default, Clone)]
pub struct LifecycleHooks {
    listeners: Vec<Arc<dyn LifecycleListener>>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener that an entity was saved
    pub async fn entity_saved(&self, event: &EntityEvent) {
        debug!(
            "entity saved: {} ({})",
            event.entity_id,
            event.entity_type.as_str()
        );
        for listener in &self.listeners {
            listener.on_saved(event).await;
        }
    }

    /// Notify every listener that an entity is about to be deleted
    pub async fn entity_deleting(&self, event: &EntityEvent) {
        debug!(
            "entity deleting: {} ({})",
            event.entity_id,
            event.entity_type.as_str()
        );
        for listener in &self.listeners {
            listener.on_deleting(event).await;
        }
    }
}
