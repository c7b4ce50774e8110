//! Leased, token-owned mutual exclusion on top of the shared store.
//!
//! A lock is a key holding a random token with a lease. Acquisition is a single
//! set-if-absent; release is a single compare-and-delete, so a holder whose lease already
//! expired can never remove a lock that a later caller now owns. Locks are not reentrant and
//! are never renewed.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::store::{KeyValueStore, StoreError};

const TARGET: &str = "catalog::coordination::lock";

#[derive(Clone)]
pub struct LockManager {
    store: Arc<dyn KeyValueStore>,
}

impl LockManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Try once to take `key` for `lease`. Returns the ownership token, or `None` when the key
    /// is already held. Never waits.
    pub async fn try_lock(&self, key: &str, lease: Duration) -> Result<Option<String>, StoreError> {
        let token = Uuid::new_v4().to_string();
        let acquired = self.store.set_if_absent(key, &token, lease).await?;
        if acquired {
            debug!(
                target = TARGET,
                key,
                lease_ms = u64::try_from(lease.as_millis()).unwrap_or(u64::MAX),
                "lock acquired"
            );
            Ok(Some(token))
        } else {
            debug!(target = TARGET, key, "lock already held");
            Ok(None)
        }
    }

    /// Release `key` if and only if it is still held under `token`. Returns `false` when the
    /// key is gone or belongs to someone else; in that case nothing is touched.
    pub async fn unlock(&self, key: &str, token: &str) -> Result<bool, StoreError> {
        release(self.store.as_ref(), key, token).await
    }

    /// Like [`try_lock`](Self::try_lock), but hands back a guard that releases the lock when
    /// the critical section ends.
    pub async fn acquire(
        &self,
        key: &str,
        lease: Duration,
    ) -> Result<Option<LockGuard>, StoreError> {
        Ok(self.try_lock(key, lease).await?.map(|token| LockGuard {
            store: self.store.clone(),
            key: key.to_string(),
            token,
            released: false,
        }))
    }
}

async fn release(store: &dyn KeyValueStore, key: &str, token: &str) -> Result<bool, StoreError> {
    let released = store.delete_if_equals(key, token).await?;
    if released {
        debug!(target = TARGET, key, "lock released");
    } else {
        warn!(
            target = TARGET,
            key, "lock was no longer owned at release; lease expired before unlock"
        );
    }
    Ok(released)
}

/// Ownership of an acquired lock.
///
/// Call [`release`](Self::release) on every path out of the critical section. A guard that is
/// dropped unreleased (early return, panic, cancelled task) schedules the release on the
/// current tokio runtime; outside a runtime the lease is left to expire.
#[must_use = "dropping the guard releases the lock"]
pub struct LockGuard {
    store: Arc<dyn KeyValueStore>,
    key: String,
    token: String,
    released: bool,
}

impl LockGuard {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn release(mut self) -> Result<bool, StoreError> {
        self.released = true;
        release(self.store.as_ref(), &self.key, &self.token).await
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let key = std::mem::take(&mut self.key);
        let token = std::mem::take(&mut self.token);
        match Handle::try_current() {
            Ok(handle) => {
                let store = self.store.clone();
                handle.spawn(async move {
                    if let Err(err) = release(store.as_ref(), &key, &token).await {
                        warn!(
                            target = TARGET,
                            key = %key,
                            error = %err,
                            "deferred lock release failed; lease will reclaim it"
                        );
                    }
                });
            }
            Err(_) => {
                warn!(
                    target = TARGET,
                    key = %key,
                    "lock guard dropped outside a runtime; lease will reclaim it"
                );
            }
        }
    }
}
