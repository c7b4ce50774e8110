use std::sync::Arc;

use async_trait::async_trait;

use crate::application::repos::ProductsRepo;
use crate::domain::products::{CacheMode, CreateProductCommand, ProductPatch, ProductRecord};

use super::{ProductError, ProductService};

/// No caching: every call hits the record store.
#[derive(Clone)]
pub struct DirectProductService {
    repo: Arc<dyn ProductsRepo>,
}

impl DirectProductService {
    pub fn new(repo: Arc<dyn ProductsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<ProductRecord>, ProductError> {
        Ok(self.repo.find_all().await?)
    }
}

#[async_trait]
impl ProductService for DirectProductService {
    fn mode(&self) -> CacheMode {
        CacheMode::None
    }

    async fn create(&self, command: CreateProductCommand) -> Result<ProductRecord, ProductError> {
        super::insert(self.repo.as_ref(), command).await
    }

    async fn get(&self, id: i64) -> Result<ProductRecord, ProductError> {
        super::load(self.repo.as_ref(), id).await
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<ProductRecord, ProductError> {
        patch.validate()?;
        super::patch(self.repo.as_ref(), id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<(), ProductError> {
        super::remove(self.repo.as_ref(), id).await
    }
}
