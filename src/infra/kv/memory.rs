//! In-process key-value store with the same per-key atomicity as the remote one.
//!
//! Expiry is evaluated lazily against the tokio clock, so paused-time tests can drive leases
//! and windows deterministically.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use tokio::time::Instant;

use crate::coordination::store::{KeyValueStore, StoreError};

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: impl Into<String>, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value: value.into(),
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<String, StoredValue>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(&self, key: &str, now: Instant) {
        self.entries.remove_if(key, |_, stored| stored.is_expired(now));
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(StoredValue::new(value, Some(ttl), now));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::new(value, Some(ttl), now));
                Ok(true)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        self.entries
            .insert(key.to_string(), StoredValue::new(value, Some(ttl), now));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        self.purge_expired(key, now);
        Ok(self.entries.get(key).map(|stored| stored.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, stored)| !stored.is_expired(now)))
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        self.purge_expired(key, now);
        Ok(self
            .entries
            .remove_if(key, |_, stored| stored.value == expected)
            .is_some())
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let now = Instant::now();
        self.purge_expired(key, now);
        let mut stored = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| StoredValue::new("0", None, now));
        let current: i64 = stored
            .value
            .parse()
            .map_err(|_| StoreError::command(format!("value at `{key}` is not an integer")))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::command(format!("increment at `{key}` would overflow")))?;
        stored.value = next.to_string();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let now = Instant::now();
        self.purge_expired(key, now);
        match self.entries.get_mut(key) {
            Some(mut stored) => {
                stored.expires_at = Some(now + ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        let now = Instant::now();
        self.purge_expired(key, now);
        Ok(self
            .entries
            .get(key)
            .and_then(|stored| stored.expires_at)
            .map(|deadline| deadline.saturating_duration_since(now)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
