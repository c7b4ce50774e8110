use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::application::products::{LockedProductUpdater, ProductServices};
use crate::application::repos::ProductsRepo;
use crate::config::Settings;
use crate::coordination::{FixedWindowRateLimiter, KeyValueStore, LockManager};

/// Tunables the HTTP surface applies on every request.
#[derive(Debug, Clone)]
pub struct ApiPolicy {
    pub cache_ttl: Duration,
    pub lock_lease: Duration,
    pub default_delay: Duration,
    pub rate_limit: RateLimitPolicy,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_requests: NonZeroU32,
    pub window: Duration,
}

impl From<&Settings> for ApiPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            cache_ttl: settings.cache.ttl,
            lock_lease: settings.locking.lease,
            default_delay: settings.locking.default_delay,
            rate_limit: RateLimitPolicy {
                max_requests: settings.rate_limit.max_requests,
                window: settings.rate_limit.window(),
            },
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub products: ProductServices,
    pub locked_updates: LockedProductUpdater,
    pub rate_limiter: FixedWindowRateLimiter,
    pub repo: Arc<dyn ProductsRepo>,
    pub store: Arc<dyn KeyValueStore>,
    pub policy: ApiPolicy,
}

impl ApiState {
    pub fn new(
        repo: Arc<dyn ProductsRepo>,
        store: Arc<dyn KeyValueStore>,
        policy: ApiPolicy,
    ) -> Self {
        let products = ProductServices::new(repo.clone(), store.clone(), policy.cache_ttl);
        let locked_updates = LockedProductUpdater::new(
            LockManager::new(store.clone()),
            products.direct(),
            policy.lock_lease,
        );
        Self {
            products,
            locked_updates,
            rate_limiter: FixedWindowRateLimiter::new(store.clone()),
            repo,
            store,
            policy,
        }
    }
}
