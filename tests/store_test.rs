mod helpers;

use helpers::*;
use price_history::repositories::InMemoryPriceHistoryStore;

// ============================================================================
// In-memory store against the shared store contract
// ============================================================================

#[tokio::test]
async fn test_memory_append_then_query() {
    check_append_then_query(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_query_isolation() {
    check_query_isolation(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_ordered_scenario() {
    check_ordered_scenario(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_purge_all() {
    check_purge_all(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_purge_products() {
    check_purge_products(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_purge_empty_selection() {
    check_purge_empty_selection(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_initialize_twice() {
    check_initialize_twice(&InMemoryPriceHistoryStore::new()).await;
}

#[tokio::test]
async fn test_memory_append_rejects_out_of_range() {
    check_append_rejects_out_of_range(&InMemoryPriceHistoryStore::new()).await;
}
