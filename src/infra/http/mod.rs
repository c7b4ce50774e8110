pub mod api;
mod middleware;

pub use api::{ApiPolicy, ApiState, RateLimitPolicy, build_api_router};
pub use middleware::{CLIENT_ID_HEADER, RequestContext};

use axum::{Router, middleware as axum_middleware, routing::get};

/// Full HTTP surface: the product API plus the unthrottled health probe.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(api::handlers::health))
        .merge(build_api_router(state.clone()))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
