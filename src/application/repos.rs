//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::products::ProductRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateProductParams {
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
}

/// Authoritative product storage.
#[async_trait]
pub trait ProductsRepo: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ProductRecord>, RepoError>;

    async fn find_all(&self) -> Result<Vec<ProductRecord>, RepoError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError>;

    async fn insert(&self, params: CreateProductParams) -> Result<ProductRecord, RepoError>;

    /// Persist the mutable fields of `product`. Fails with [`RepoError::NotFound`] when the row
    /// is gone.
    async fn update(&self, product: &ProductRecord) -> Result<ProductRecord, RepoError>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, RepoError>;

    async fn ping(&self) -> Result<(), RepoError>;
}
