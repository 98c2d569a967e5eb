//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (body size limit, CORS, per-request trace-ID injection)
//! - Optional OpenAPI document endpoint (disable with `TASKLIST_ENABLE_OPENAPI=false`)
//! - Health / heartbeat route
//! - Task CRUD routes under `/tasks`

pub mod doc;
mod health;
mod tasks;

use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(tasks::router());

    if state.config.enable_openapi {
        app = app.route("/api-docs/openapi.json", get(doc::openapi_json));
    }

    app
        // The layer added last is outermost and sees the request first.
        .layer(DefaultBodyLimit::max(trace::MAX_REQUEST_BODY))
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
