use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::repos::ProductsRepo;
use crate::cache::{EntryCache, product_key};
use crate::domain::products::{CacheMode, CreateProductCommand, ProductPatch, ProductRecord};

use super::{ProductError, ProductService};

const TARGET: &str = "catalog::application::products::manual";

/// Cache-aside with invalidate-on-write, driven explicitly.
///
/// Writes never repopulate. Update and delete evict before touching the record store, which
/// leaves a window where a concurrent reader can reload the old row and cache it again until
/// the entry expires.
#[derive(Clone)]
pub struct ManualCacheProductService {
    repo: Arc<dyn ProductsRepo>,
    cache: EntryCache,
}

impl ManualCacheProductService {
    pub fn new(repo: Arc<dyn ProductsRepo>, cache: EntryCache) -> Self {
        Self { repo, cache }
    }
}

#[async_trait]
impl ProductService for ManualCacheProductService {
    fn mode(&self) -> CacheMode {
        CacheMode::Manual
    }

    async fn create(&self, command: CreateProductCommand) -> Result<ProductRecord, ProductError> {
        super::insert(self.repo.as_ref(), command).await
    }

    async fn get(&self, id: i64) -> Result<ProductRecord, ProductError> {
        let key = product_key(id);
        if let Some(product) = self.cache.get::<ProductRecord>(&key).await? {
            return Ok(product);
        }

        let product = super::load(self.repo.as_ref(), id).await?;
        self.cache.put(&key, &product).await?;
        Ok(product)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<ProductRecord, ProductError> {
        patch.validate()?;
        let key = product_key(id);
        self.cache.evict(&key).await?;
        super::patch(self.repo.as_ref(), id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<(), ProductError> {
        if !self.repo.exists_by_id(id).await? {
            return Err(ProductError::NotFound { id });
        }

        let key = product_key(id);
        self.cache.evict(&key).await?;
        super::remove(self.repo.as_ref(), id).await?;
        debug!(target = TARGET, id, "product deleted");
        Ok(())
    }
}
