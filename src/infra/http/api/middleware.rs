use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use time::OffsetDateTime;

use crate::coordination::rate_limit::window_remaining;
use crate::infra::http::middleware::client_id;

use super::error::ApiError;
use super::handlers::store_to_api;
use super::state::ApiState;

pub async fn api_rate_limit(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client_id = client_id(&request);
    let policy = state.policy.rate_limit;
    let now = OffsetDateTime::now_utc();

    match state
        .rate_limiter
        .allow_at(&client_id, policy.max_requests.get(), policy.window, now)
        .await
    {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            let remaining = window_remaining(now, policy.window);
            let retry_after = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            ApiError::rate_limited(retry_after)
        }
        Err(err) => store_to_api(err).into_response(),
    }
}
