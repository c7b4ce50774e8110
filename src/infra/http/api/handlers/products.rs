//! Product handlers

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::{CacheModeQuery, LockedUpdateQuery, product_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn list_products(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.products.list().await.map_err(product_to_api)?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<ApiState>,
    Query(query): Query<CacheModeQuery>,
    Json(payload): Json<ProductCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state.products.resolve(query.resolve()?);
    let product = service
        .create(payload.into())
        .await
        .map_err(product_to_api)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Query(query): Query<CacheModeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state.products.resolve(query.resolve()?);
    let product = service.get(id).await.map_err(product_to_api)?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Query(query): Query<CacheModeQuery>,
    Json(payload): Json<ProductUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state.products.resolve(query.resolve()?);
    let product = service
        .update(id, payload.into())
        .await
        .map_err(product_to_api)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Query(query): Query<CacheModeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state.products.resolve(query.resolve()?);
    service.delete(id).await.map_err(product_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_product_locked(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Query(query): Query<LockedUpdateQuery>,
    Json(payload): Json<ProductUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let delay = query
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(state.policy.default_delay);

    let product = state
        .locked_updates
        .update(id, payload.into(), delay)
        .await
        .map_err(product_to_api)?;
    Ok(Json(product))
}
