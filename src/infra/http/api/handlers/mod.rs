//! API handlers organized by resource type.
//!
//! Error conversion helpers shared across the handlers live here.

mod health;
mod products;

pub use health::*;
pub use products::*;

// ----- Shared query structs -----

use axum::http::StatusCode;
use serde::Deserialize;

use crate::application::products::ProductError;
use crate::application::repos::RepoError;
use crate::coordination::StoreError;
use crate::domain::error::DomainError;
use crate::domain::products::CacheMode;

use super::error::{ApiError, codes};

#[derive(Debug, Default, Deserialize)]
pub struct CacheModeQuery {
    #[serde(rename = "cacheMode")]
    pub cache_mode: Option<String>,
}

impl CacheModeQuery {
    pub fn resolve(&self) -> Result<CacheMode, ApiError> {
        match self.cache_mode.as_deref() {
            None | Some("") => Ok(CacheMode::default()),
            Some(raw) => raw.parse().map_err(domain_to_api),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LockedUpdateQuery {
    #[serde(rename = "delayMs", alias = "timeout")]
    pub delay_ms: Option<u64>,
}

// ----- Error conversion helpers -----

pub(crate) fn domain_to_api(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
    }
}

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn store_to_api(err: StoreError) -> ApiError {
    match err {
        StoreError::Unavailable { message } => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::STORE_UNAVAILABLE,
            "Key-value store unavailable",
            Some(message),
        ),
        StoreError::Command { message } | StoreError::Encoding { message } => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::STORE,
            "Key-value store error",
            Some(message),
        ),
    }
}

pub(crate) fn product_to_api(err: ProductError) -> ApiError {
    match err {
        ProductError::NotFound { .. } => ApiError::not_found("product not found"),
        ProductError::LockUnavailable { key } => ApiError::locked("Product is locked", Some(key)),
        ProductError::Domain(domain) => domain_to_api(domain),
        ProductError::Store(store) => store_to_api(store),
        ProductError::Repo(repo) => repo_to_api(repo),
    }
}
