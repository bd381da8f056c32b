//! In-memory cache for catalog report listings.
//!
//! Keyed by the fully qualified folder path, invalidated wholesale on any
//! catalog mutation. Entries never expire on their own; staleness is
//! bounded only by those invalidations and explicit clears.

use std::sync::Arc;

use moka::future::Cache;

use crate::models::CatalogItem;

#[derive(Clone)]
pub(crate) struct CatalogCache {
    inner: Cache<String, Arc<Vec<CatalogItem>>>,
}

impl CatalogCache {
    pub(crate) fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub(crate) async fn get(&self, folder: &str) -> Option<Arc<Vec<CatalogItem>>> {
        self.inner.get(folder).await
    }

    pub(crate) async fn insert(&self, folder: String, items: Vec<CatalogItem>) -> Arc<Vec<CatalogItem>> {
        let items = Arc::new(items);
        self.inner.insert(folder, items.clone()).await;
        items
    }

    pub(crate) fn clear(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;

    fn item(path: &str) -> CatalogItem {
        CatalogItem {
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            path: path.to_string(),
            item_type: ItemType::Report,
            hidden: false,
        }
    }

    #[tokio::test]
    async fn test_cache_round_trip_and_clear() {
        let cache = CatalogCache::new(16);
        assert!(cache.get("/Reports").await.is_none());

        cache
            .insert("/Reports".to_string(), vec![item("/Reports/Revenue")])
            .await;
        let cached = cache.get("/Reports").await.unwrap();
        assert_eq!(cached.len(), 1);

        cache.clear();
        // Invalidation is applied lazily; run pending maintenance first.
        cache.inner.run_pending_tasks().await;
        assert!(cache.get("/Reports").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_never_expire_on_a_timer() {
        let cache = CatalogCache::new(16);
        assert!(cache.inner.policy().time_to_live().is_none());
        assert!(cache.inner.policy().time_to_idle().is_none());
    }

    #[tokio::test]
    async fn test_cache_keys_by_full_folder_path() {
        let cache = CatalogCache::new(16);
        cache
            .insert("/A/Reports".to_string(), vec![item("/A/Reports/One")])
            .await;
        assert!(cache.get("/B/Reports").await.is_none());
        assert!(cache.get("/Reports").await.is_none());
    }
}
