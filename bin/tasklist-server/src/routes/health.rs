//! Liveness endpoint that also pings the task store.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::warn;
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// `{"status": "ok", "version": "...", "tasks": n}` while the store answers,
/// 503 with `status = "unavailable"` once it does not.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and task store are up", body = Value),
        (status = 503, description = "Task store is not answering", body = Value)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let version = env!("CARGO_PKG_VERSION");
    match state.tasks.count().await {
        Ok(tasks) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "version": version, "tasks": tasks })),
        ),
        Err(e) => {
            warn!(error = %e, "health check could not reach the task store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "version": version })),
            )
        }
    }
}
