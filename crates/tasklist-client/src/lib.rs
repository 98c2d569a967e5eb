//! Typed client for the tasklist HTTP API.
//!
//! One method per server operation; each call is a single future that
//! resolves to the decoded value or a [`ClientError`]. The client keeps no
//! state besides the connection pool and never retries.
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), tasklist_client::ClientError> {
//! use tasklist_client::TaskClient;
//! use tasklist_types::CreateTaskRequest;
//!
//! let client = TaskClient::new("http://localhost:3000")?;
//! let task = client
//!     .create_task(&CreateTaskRequest::new("Buy milk", "2%"))
//!     .await?;
//! client.toggle_complete(&task.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::ClientError;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use tasklist_types::{CreateTaskRequest, Task, UpdateTaskRequest};

/// Default server address, matching the server's default bind port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TaskClient {
    /// Build a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    /// Build a client that reuses an existing [`reqwest::Client`].
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Url(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(format!("{base_url} cannot be a base URL")));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Operations ────────────────────────────────────────────────────────────

    /// `GET /tasks`
    pub async fn get_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = self.tasks_url(&[])?;
        self.send_json(self.http.request(Method::GET, url)).await
    }

    /// `GET /tasks?category={category}`
    pub async fn get_tasks_by_category(&self, category: &str) -> Result<Vec<Task>, ClientError> {
        let mut url = self.tasks_url(&[])?;
        url.query_pairs_mut().append_pair("category", category);
        self.send_json(self.http.request(Method::GET, url)).await
    }

    /// `GET /tasks?priority={priority}`
    pub async fn get_tasks_by_priority(&self, priority: &str) -> Result<Vec<Task>, ClientError> {
        let mut url = self.tasks_url(&[])?;
        url.query_pairs_mut().append_pair("priority", priority);
        self.send_json(self.http.request(Method::GET, url)).await
    }

    /// `GET /tasks/{id}`
    pub async fn get_task(&self, id: &str) -> Result<Task, ClientError> {
        let url = self.tasks_url(&[id])?;
        self.send_json(self.http.request(Method::GET, url)).await
    }

    /// `POST /tasks`
    pub async fn create_task(&self, task: &CreateTaskRequest) -> Result<Task, ClientError> {
        let url = self.tasks_url(&[])?;
        self.send_json(self.http.request(Method::POST, url).json(task))
            .await
    }

    /// `PATCH /tasks/{id}`
    pub async fn update_task(&self, id: &str, task: &UpdateTaskRequest) -> Result<Task, ClientError> {
        let url = self.tasks_url(&[id])?;
        self.send_json(self.http.request(Method::PATCH, url).json(task))
            .await
    }

    /// `DELETE /tasks/{id}`
    pub async fn delete_task(&self, id: &str) -> Result<(), ClientError> {
        let url = self.tasks_url(&[id])?;
        let response = self.send(self.http.request(Method::DELETE, url)).await?;
        check_status(response).await.map(|_| ())
    }

    /// `PATCH /tasks/{id}/toggle`
    pub async fn toggle_complete(&self, id: &str) -> Result<Task, ClientError> {
        let url = self.tasks_url(&[id, "toggle"])?;
        let body = serde_json::json!({});
        self.send_json(self.http.request(Method::PATCH, url).json(&body))
            .await
    }

    // ── private helpers ───────────────────────────────────────────────────────

    /// `{base}/tasks/{segments...}` with each segment percent-encoded.
    fn tasks_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("tasks")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        debug!(url = %response.url(), status = response.status().as_u16(), "tasklist response");
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = check_status(self.send(request).await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Pass successful responses through; turn anything else into [`ClientError::Api`].
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or(body);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
