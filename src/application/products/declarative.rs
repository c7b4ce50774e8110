use std::sync::Arc;

use async_trait::async_trait;

use crate::application::repos::ProductsRepo;
use crate::cache::{CacheAdvice, product_key};
use crate::domain::products::{CacheMode, CreateProductCommand, ProductPatch, ProductRecord};

use super::{ProductError, ProductService};

/// Plain record-store bodies wrapped in cache advice.
#[derive(Clone)]
pub struct DeclarativeProductService {
    repo: Arc<dyn ProductsRepo>,
    advice: CacheAdvice,
}

impl DeclarativeProductService {
    pub fn new(repo: Arc<dyn ProductsRepo>, advice: CacheAdvice) -> Self {
        Self { repo, advice }
    }
}

#[async_trait]
impl ProductService for DeclarativeProductService {
    fn mode(&self) -> CacheMode {
        CacheMode::Declarative
    }

    async fn create(&self, command: CreateProductCommand) -> Result<ProductRecord, ProductError> {
        super::insert(self.repo.as_ref(), command).await
    }

    async fn get(&self, id: i64) -> Result<ProductRecord, ProductError> {
        let repo = self.repo.as_ref();
        self.advice
            .cacheable(&product_key(id), || super::load(repo, id))
            .await
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<ProductRecord, ProductError> {
        patch.validate()?;
        let repo = self.repo.as_ref();
        self.advice
            .evict_before(&product_key(id), || super::patch(repo, id, patch))
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), ProductError> {
        let repo = self.repo.as_ref();
        self.advice
            .evict_after(&product_key(id), || super::remove(repo, id))
            .await
    }
}
