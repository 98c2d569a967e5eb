use axum::Json;
use utoipa::OpenApi;

use crate::routes::{health, tasks};

#[derive(OpenApi)]
#[openapi(info(
    title = "tasklist-server",
    description = "To-do list REST API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(tasks::TasksApi::openapi());
    root
}

/// Serve the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(get_docs())
}
