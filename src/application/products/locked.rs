use std::sync::Arc;
use std::time::Duration;

use metrics::{Unit, counter, describe_counter};
use tracing::{info, warn};

use crate::cache::product_key;
use crate::coordination::LockManager;
use crate::domain::error::DomainError;
use crate::domain::products::{ProductPatch, ProductRecord};

use super::{DirectProductService, ProductError, ProductService};

const TARGET: &str = "catalog::application::products::locked";
const CONTENDED_TOTAL: &str = "catalog_lock_contended_total";

pub(crate) fn describe_metrics() {
    describe_counter!(
        CONTENDED_TOTAL,
        Unit::Count,
        "Guarded updates refused because the product key was held."
    );
}

/// Serializes updates of one product behind a leased lock.
///
/// Contenders fail fast with [`ProductError::LockUnavailable`]; nobody waits. The lock shares
/// the `product:{id}` key with cache entries, so a cached product also reads as locked.
#[derive(Clone)]
pub struct LockedProductUpdater {
    locks: LockManager,
    products: Arc<DirectProductService>,
    lease: Duration,
}

impl LockedProductUpdater {
    pub fn new(locks: LockManager, products: Arc<DirectProductService>, lease: Duration) -> Self {
        Self {
            locks,
            products,
            lease,
        }
    }

    /// Take the lock, hold it for `delay`, then apply `patch` through the uncached path.
    ///
    /// `delay` must be shorter than the lease, otherwise the lock could expire mid-update.
    pub async fn update(
        &self,
        id: i64,
        patch: ProductPatch,
        delay: Duration,
    ) -> Result<ProductRecord, ProductError> {
        patch.validate()?;
        if delay >= self.lease {
            return Err(DomainError::validation(format!(
                "delay of {} ms must be shorter than the {} ms lock lease",
                delay.as_millis(),
                self.lease.as_millis()
            ))
            .into());
        }
        let key = product_key(id);

        let Some(guard) = self.locks.acquire(&key, self.lease).await? else {
            counter!(CONTENDED_TOTAL).increment(1);
            info!(target = TARGET, id, "product is locked by another caller");
            return Err(ProductError::LockUnavailable { key });
        };

        tokio::time::sleep(delay).await;
        let outcome = self.products.update(id, patch).await;

        if let Err(err) = guard.release().await {
            warn!(
                target = TARGET,
                id,
                error = %err,
                "failed to release product lock; lease will reclaim it"
            );
        }
        outcome
    }
}
