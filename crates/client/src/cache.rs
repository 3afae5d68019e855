//! Explicit query cache for client-side reads.

use std::sync::Arc;

use crm_core::customer::Customer;
use moka::future::Cache;

/// Cache slot identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full customer list.
    Customers,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Customers => "customers",
        }
    }
}

/// In-process cache of query results, owned by whoever creates it.
///
/// Entries live until invalidated; there is no TTL.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<QueryKey, Arc<Vec<Customer>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().max_capacity(16).build(),
        }
    }

    pub async fn get(&self, key: QueryKey) -> Option<Arc<Vec<Customer>>> {
        let hit = self.inner.get(&key).await;
        if hit.is_some() {
            tracing::debug!(key = key.as_str(), "Cache hit");
        } else {
            tracing::debug!(key = key.as_str(), "Cache miss");
        }
        hit
    }

    pub async fn set(&self, key: QueryKey, value: Arc<Vec<Customer>>) {
        self.inner.insert(key, value).await;
    }

    pub async fn invalidate(&self, key: QueryKey) {
        tracing::debug!(key = key.as_str(), "Cache invalidated");
        self.inner.invalidate(&key).await;
    }

    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_set_invalidate() {
        let cache = QueryCache::new();
        assert!(cache.get(QueryKey::Customers).await.is_none());

        cache.set(QueryKey::Customers, Arc::new(Vec::new())).await;
        let hit = cache.get(QueryKey::Customers).await.unwrap();
        assert!(hit.is_empty());

        cache.invalidate(QueryKey::Customers).await;
        assert!(cache.get(QueryKey::Customers).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_all_clears_entries() {
        let cache = QueryCache::new();
        cache.set(QueryKey::Customers, Arc::new(Vec::new())).await;

        cache.invalidate_all().await;
        assert!(cache.get(QueryKey::Customers).await.is_none());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = QueryCache::new();
        let other = cache.clone();
        cache.set(QueryKey::Customers, Arc::new(Vec::new())).await;
        assert!(other.get(QueryKey::Customers).await.is_some());
    }

    #[test]
    fn key_names() {
        assert_eq!(QueryKey::Customers.as_str(), "customers");
    }
}
