pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::{ApiPolicy, ApiState, RateLimitPolicy};

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, put},
};

use crate::infra::http::middleware::log_responses;

pub fn build_api_router(state: ApiState) -> Router<ApiState> {
    Router::new()
        .route(
            "/api/v1/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/v1/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/api/v1/products/lock/{id}",
            put(handlers::update_product_locked),
        )
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::api_rate_limit,
        ))
        .layer(axum_middleware::from_fn(log_responses))
}
