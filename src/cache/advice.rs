//! Caching expressed as advice around an operation body.
//!
//! The body never sees the cache. [`CacheAdvice::cacheable`] serves hits and populates on
//! miss, [`CacheAdvice::evict_before`] drops the entry before the body runs (whatever its
//! outcome), and [`CacheAdvice::evict_after`] drops it only once the body has succeeded.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};

use crate::coordination::store::StoreError;

use super::entries::EntryCache;

#[derive(Clone)]
pub struct CacheAdvice {
    entries: EntryCache,
}

impl CacheAdvice {
    pub fn new(entries: EntryCache) -> Self {
        Self { entries }
    }

    pub async fn cacheable<T, E, F, Fut>(&self, key: &str, body: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.entries.get::<T>(key).await? {
            return Ok(cached);
        }
        let value = body().await?;
        self.entries.put(key, &value).await?;
        Ok(value)
    }

    pub async fn evict_before<T, E, F, Fut>(&self, key: &str, body: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.entries.evict(key).await?;
        body().await
    }

    pub async fn evict_after<T, E, F, Fut>(&self, key: &str, body: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let value = body().await?;
        self.entries.evict(key).await?;
        Ok(value)
    }
}
