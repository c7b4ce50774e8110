//! Health probe

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::infra::http::api::state::ApiState;

const SOURCE: &str = "infra::http::api::handlers::health";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub database: &'static str,
    pub store: &'static str,
}

fn label<E>(result: &Result<(), E>) -> &'static str {
    if result.is_ok() { "ok" } else { "unavailable" }
}

pub async fn health(State(state): State<ApiState>) -> Response {
    let database = state.repo.ping().await;
    let store = state.store.ping().await;

    let status = if database.is_ok() && store.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthReport {
        database: label(&database),
        store: label(&store),
    };
    let mut response = (status, Json(body)).into_response();

    if let Err(err) = &database {
        ErrorReport::from_error(SOURCE, status, err).attach(&mut response);
    } else if let Err(err) = &store {
        ErrorReport::from_error(SOURCE, status, err).attach(&mut response);
    }
    response
}
