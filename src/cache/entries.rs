//! JSON-encoded cache entries with a fixed TTL.

use std::sync::Arc;
use std::time::Duration;

use metrics::{Unit, counter, describe_counter};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::coordination::store::{KeyValueStore, StoreError};

const TARGET: &str = "catalog::cache::entries";
const HIT_TOTAL: &str = "catalog_cache_hit_total";
const MISS_TOTAL: &str = "catalog_cache_miss_total";

pub(crate) fn describe_metrics() {
    describe_counter!(HIT_TOTAL, Unit::Count, "Product reads served from the cache.");
    describe_counter!(MISS_TOTAL, Unit::Count, "Product reads that found no cache entry.");
}

#[derive(Clone)]
pub struct EntryCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl EntryCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up `key`.
    ///
    /// A value that does not decode is reported as [`StoreError::Encoding`] and left in place:
    /// cache entries share their key space with lock tokens, so it may belong to a lock holder.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key).await? else {
            counter!(MISS_TOTAL).increment(1);
            debug!(target = TARGET, key, "cache miss");
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                counter!(HIT_TOTAL).increment(1);
                debug!(target = TARGET, key, "cache hit");
                Ok(Some(value))
            }
            Err(err) => {
                warn!(
                    target = TARGET,
                    key,
                    error = %err,
                    "value at cache key does not decode"
                );
                Err(StoreError::encoding(format!(
                    "value at `{key}` is not a cache entry: {err}"
                )))
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded =
            serde_json::to_string(value).map_err(|err| StoreError::encoding(err.to_string()))?;
        self.store.set(key, &encoded, self.ttl).await?;
        debug!(
            target = TARGET,
            key,
            ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX),
            "cache populated"
        );
        Ok(())
    }

    pub async fn evict(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self.store.delete(key).await?;
        debug!(target = TARGET, key, removed, "cache evicted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::kv::InMemoryStore;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let store = Arc::new(InMemoryStore::new());
        let cache = EntryCache::new(store, Duration::from_secs(60));

        cache.put("product:1", &vec![1, 2, 3]).await.unwrap();
        assert_eq!(
            cache.get::<Vec<i32>>("product:1").await.unwrap(),
            Some(vec![1, 2, 3])
        );

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get::<Vec<i32>>("product:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn undecodable_values_are_reported_and_kept() {
        let store = Arc::new(InMemoryStore::new());
        store
            .set("product:1", "not json", Duration::from_secs(60))
            .await
            .unwrap();
        let cache = EntryCache::new(store.clone(), Duration::from_secs(60));

        let err = cache.get::<Vec<i32>>("product:1").await.unwrap_err();
        assert!(matches!(err, StoreError::Encoding { .. }));
        assert_eq!(
            store.get("product:1").await.unwrap().as_deref(),
            Some("not json")
        );
    }
}
