//! Task CRUD endpoints.
//!
//! Handlers only translate HTTP into [`crate::services::TaskService`] calls.
//! Bodies go through [`ValidatedJson`], so malformed or out-of-constraint
//! payloads are rejected before the service is reached.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use utoipa::OpenApi;

use tasklist_types::{CreateTaskRequest, Priority, Task, UpdateTaskRequest};

use crate::error::ServerError;
use crate::extract::{QueryParams, ValidatedJson};
use crate::schemas::task::TaskListQuery;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_task, list_tasks, get_task, update_task, toggle_task, delete_task),
    components(schemas(Task, Priority, CreateTaskRequest, UpdateTaskRequest))
)]
pub struct TasksApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/toggle", patch(toggle_task))
}

#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid payload"),
        (status = 413, description = "Body too large"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    let task = state.tasks.create(req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Tasks listed, newest first", body = [Task]),
        (status = 400, description = "Malformed query string"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<TaskListQuery>,
) -> Result<Json<Vec<Task>>, ServerError> {
    let tasks = state
        .tasks
        .list(q.category.as_deref(), q.priority.as_deref())
        .await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to retrieve")
    ),
    responses(
        (status = 200, description = "Task retrieved", body = Task),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(state.tasks.find_one(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to update")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(state.tasks.update(&id, req).await?))
}

#[utoipa::path(
    patch,
    path = "/tasks/{id}/toggle",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to toggle")
    ),
    responses(
        (status = 200, description = "Completion flag flipped", body = Task),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ServerError> {
    Ok(Json(state.tasks.toggle_complete(&id).await?))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to delete")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.tasks.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
