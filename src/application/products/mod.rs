//! Product CRUD under the three consistency strategies.
//!
//! [`DirectProductService`] talks to the record store only. [`ManualCacheProductService`] runs
//! cache-aside by hand and [`DeclarativeProductService`] expresses the same protocol through
//! [`CacheAdvice`](crate::cache::CacheAdvice). They share the cache key space, so switching
//! strategy between calls observes the same entries.
//!
//! The two caching variants differ on delete: the manual one evicts before the store write,
//! the declarative one only after a successful write.

mod declarative;
mod direct;
mod locked;
mod manual;

pub use declarative::DeclarativeProductService;
pub use direct::DirectProductService;
pub use locked::LockedProductUpdater;
pub(crate) use locked::describe_metrics;
pub use manual::ManualCacheProductService;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::application::repos::{CreateProductParams, ProductsRepo, RepoError};
use crate::cache::{CacheAdvice, EntryCache};
use crate::coordination::{KeyValueStore, StoreError};
use crate::domain::error::DomainError;
use crate::domain::products::{CacheMode, CreateProductCommand, ProductPatch, ProductRecord};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product {id} not found")]
    NotFound { id: i64 },
    #[error("lock `{key}` is held by another caller")]
    LockUnavailable { key: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[async_trait]
pub trait ProductService: Send + Sync {
    fn mode(&self) -> CacheMode;

    async fn create(&self, command: CreateProductCommand) -> Result<ProductRecord, ProductError>;

    async fn get(&self, id: i64) -> Result<ProductRecord, ProductError>;

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<ProductRecord, ProductError>;

    async fn delete(&self, id: i64) -> Result<(), ProductError>;
}

/// One instance of each strategy over a shared repository and store.
#[derive(Clone)]
pub struct ProductServices {
    direct: Arc<DirectProductService>,
    manual: Arc<ManualCacheProductService>,
    declarative: Arc<DeclarativeProductService>,
}

impl ProductServices {
    pub fn new(
        repo: Arc<dyn ProductsRepo>,
        store: Arc<dyn KeyValueStore>,
        cache_ttl: Duration,
    ) -> Self {
        let entries = EntryCache::new(store, cache_ttl);
        Self {
            direct: Arc::new(DirectProductService::new(repo.clone())),
            manual: Arc::new(ManualCacheProductService::new(repo.clone(), entries.clone())),
            declarative: Arc::new(DeclarativeProductService::new(
                repo,
                CacheAdvice::new(entries),
            )),
        }
    }

    pub fn resolve(&self, mode: CacheMode) -> Arc<dyn ProductService> {
        match mode {
            CacheMode::None => self.direct.clone(),
            CacheMode::Manual => self.manual.clone(),
            CacheMode::Declarative => self.declarative.clone(),
        }
    }

    pub fn direct(&self) -> Arc<DirectProductService> {
        self.direct.clone()
    }

    pub async fn list(&self) -> Result<Vec<ProductRecord>, ProductError> {
        self.direct.list().await
    }
}

async fn insert(
    repo: &dyn ProductsRepo,
    command: CreateProductCommand,
) -> Result<ProductRecord, ProductError> {
    command.validate()?;
    let CreateProductCommand {
        name,
        price_cents,
        description,
    } = command;
    let params = CreateProductParams {
        name: name.trim().to_string(),
        price_cents,
        description,
    };
    Ok(repo.insert(params).await?)
}

async fn load(repo: &dyn ProductsRepo, id: i64) -> Result<ProductRecord, ProductError> {
    repo.find_by_id(id)
        .await?
        .ok_or(ProductError::NotFound { id })
}

async fn patch(
    repo: &dyn ProductsRepo,
    id: i64,
    patch: ProductPatch,
) -> Result<ProductRecord, ProductError> {
    let mut product = load(repo, id).await?;
    patch.apply_to(&mut product);
    repo.update(&product).await.map_err(|err| match err {
        RepoError::NotFound => ProductError::NotFound { id },
        other => ProductError::Repo(other),
    })
}

async fn remove(repo: &dyn ProductsRepo, id: i64) -> Result<(), ProductError> {
    if repo.delete_by_id(id).await? {
        Ok(())
    } else {
        Err(ProductError::NotFound { id })
    }
}
