//! Key-value store adapters.

mod memory;
mod remote;

pub use memory::InMemoryStore;
pub use remote::RedisStore;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::StoreSettings;
use crate::coordination::store::KeyValueStore;

use super::error::InfraError;

const MEMORY_SCHEME: &str = "memory://";

/// Open the store named by `settings.url`.
///
/// `memory://` selects the in-process store; anything else is handed to the Redis client.
pub async fn connect(settings: &StoreSettings) -> Result<Arc<dyn KeyValueStore>, InfraError> {
    if settings.url.starts_with(MEMORY_SCHEME) {
        warn!(
            target = "catalog::infra::kv",
            "using in-process key-value store; locks and rate windows are not shared across instances"
        );
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let store = RedisStore::connect(&settings.url)
        .await
        .map_err(|err| InfraError::store(err.to_string()))?;
    store
        .ping()
        .await
        .map_err(|err| InfraError::store(err.to_string()))?;
    info!(target = "catalog::infra::kv", "connected to redis");
    Ok(Arc::new(store))
}
