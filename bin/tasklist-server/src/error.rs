//! Unified server error type.
//!
//! Every handler and service call returns `Result<T, ServerError>`, which
//! implements [`axum::response::IntoResponse`] so errors are automatically
//! converted to a JSON-body HTTP response with an appropriate status code.
//!
//! Store failures are logged with full detail but only a generic message is
//! returned to the caller, so SQL and file paths never leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the tasklist-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Input violated the task field constraints.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The caller sent a malformed request (bad JSON, unknown fields, wrong types).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body is larger than the server accepts (limit in bytes).
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// The caller referenced a task that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Propagated from the SQLite store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn task_not_found(id: &str) -> Self {
        ServerError::NotFound(format!("Task with ID {id} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Database(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let client_message = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::Validation(e) => e.to_string(),
            ServerError::BadRequest(m) | ServerError::NotFound(m) => m.clone(),
            ServerError::PayloadTooLarge(_) => self.to_string(),

            // Internal errors: log the full detail, return a generic message.
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                "internal server error".to_owned()
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                "internal server error".to_owned()
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ServerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_is_404_with_message() {
        let (status, body) = body_json(ServerError::task_not_found("abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task with ID abc not found");
    }

    #[tokio::test]
    async fn database_errors_are_masked() {
        let (status, body) = body_json(ServerError::Database(sqlx::Error::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn oversized_body_is_413_with_limit() {
        let (status, body) = body_json(ServerError::PayloadTooLarge(1024)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "request body exceeds 1024 bytes");
    }

    #[tokio::test]
    async fn anyhow_becomes_internal() {
        let err: ServerError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
