//! Task business logic.
//!
//! Validates input against the field constraint table, applies defaults,
//! turns missing rows into [`ServerError::NotFound`], and converts store
//! records into wire [`Task`]s. Holds no state besides the store handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use validator::Validate;

use tasklist_types::{CreateTaskRequest, DEFAULT_CATEGORY, Task, UpdateTaskRequest, parse_due_date};

use crate::entities::{NewTask, SqliteStore, TaskFilter, TaskPatch, TaskStore};
use crate::error::ServerError;

#[derive(Debug)]
pub struct TaskService<S = SqliteStore> {
    store: Arc<S>,
}

impl<S> Clone for TaskService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a new task. Omitted fields default to
    /// `completed = false`, `priority = medium`, `category = personal`.
    pub async fn create(&self, input: CreateTaskRequest) -> Result<Task, ServerError> {
        input.validate()?;
        let due_date = due_date(input.due_date.as_deref())?;
        let record = self
            .store
            .insert_task(NewTask {
                title: input.title,
                description: input.description,
                priority: input.priority.unwrap_or_default(),
                due_date,
                category: input.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            })
            .await?;
        info!(task_id = %record.id, sequence = record.sequence, "task created");
        Ok(record.to_response())
    }

    pub async fn find_all(&self) -> Result<Vec<Task>, ServerError> {
        self.list_by(TaskFilter::All).await
    }

    pub async fn find_one(&self, id: &str) -> Result<Task, ServerError> {
        self.store
            .get_task(id)
            .await?
            .map(|record| record.to_response())
            .ok_or_else(|| ServerError::task_not_found(id))
    }

    /// Apply a partial update. An empty patch changes nothing and returns the
    /// task as stored.
    pub async fn update(&self, id: &str, input: UpdateTaskRequest) -> Result<Task, ServerError> {
        input.validate()?;
        if input.is_empty() {
            debug!(task_id = %id, "empty update; returning stored task");
            return self.find_one(id).await;
        }
        let patch = TaskPatch {
            due_date: due_date(input.due_date.as_deref())?,
            title: input.title,
            description: input.description,
            completed: input.completed,
            priority: input.priority,
            category: input.category,
        };
        let record = self
            .store
            .update_task(id, patch)
            .await?
            .ok_or_else(|| ServerError::task_not_found(id))?;
        info!(task_id = %id, "task updated");
        Ok(record.to_response())
    }

    pub async fn remove(&self, id: &str) -> Result<(), ServerError> {
        if !self.store.delete_task(id).await? {
            return Err(ServerError::task_not_found(id));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    pub async fn toggle_complete(&self, id: &str) -> Result<Task, ServerError> {
        let record = self
            .store
            .toggle_task(id)
            .await?
            .ok_or_else(|| ServerError::task_not_found(id))?;
        info!(task_id = %id, completed = record.completed, "task toggled");
        Ok(record.to_response())
    }

    /// Exact match on category; unknown categories yield an empty list.
    pub async fn find_by_category(&self, category: &str) -> Result<Vec<Task>, ServerError> {
        self.list_by(TaskFilter::Category(category.to_owned())).await
    }

    /// Exact match on the priority text; the value is not checked against
    /// the enum, so unknown priorities yield an empty list.
    pub async fn find_by_priority(&self, priority: &str) -> Result<Vec<Task>, ServerError> {
        self.list_by(TaskFilter::Priority(priority.to_owned())).await
    }

    /// List dispatch used by `GET /tasks`: a non-empty category wins, then a
    /// non-empty priority, else everything. Filters are never combined.
    pub async fn list(
        &self,
        category: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Vec<Task>, ServerError> {
        let category = category.filter(|c| !c.is_empty());
        let priority = priority.filter(|p| !p.is_empty());
        match (category, priority) {
            (Some(category), _) => self.find_by_category(category).await,
            (None, Some(priority)) => self.find_by_priority(priority).await,
            (None, None) => self.find_all().await,
        }
    }

    pub async fn count(&self) -> Result<i64, ServerError> {
        Ok(self.store.count_tasks().await?)
    }

    async fn list_by(&self, filter: TaskFilter) -> Result<Vec<Task>, ServerError> {
        let records = self.store.list_tasks(filter).await?;
        Ok(records.into_iter().map(|r| r.to_response()).collect())
    }
}

fn due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ServerError> {
    raw.map(|s| {
        parse_due_date(s).ok_or_else(|| ServerError::BadRequest(format!("invalid dueDate '{s}'")))
    })
    .transpose()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use tasklist_types::Priority;

    async fn service() -> TaskService {
        let store = SqliteStore::in_memory().await.expect("in-memory store");
        TaskService::new(Arc::new(store))
    }

    fn buy_milk() -> CreateTaskRequest {
        CreateTaskRequest::new("Buy milk", "2%")
            .with_priority(Priority::High)
            .with_category("shopping")
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let svc = service().await;
        let task = svc.create(CreateTaskRequest::new("t", "d")).await.unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, "personal");
        assert!(task.due_date.is_none());
    }

    #[tokio::test]
    async fn create_normalises_due_date() {
        let svc = service().await;
        let task = svc
            .create(CreateTaskRequest::new("t", "d").with_due_date("2030-01-02"))
            .await
            .unwrap();
        assert_eq!(
            task.due_date.map(|d| d.to_rfc3339()),
            Some("2030-01-02T00:00:00+00:00".to_owned())
        );
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let svc = service().await;
        for bad in [
            CreateTaskRequest::new("", "d"),
            CreateTaskRequest::new("t", ""),
            CreateTaskRequest::new("x".repeat(256), "d"),
            CreateTaskRequest::new("t", "d").with_due_date("soon"),
        ] {
            let err = svc.create(bad).await.unwrap_err();
            assert!(matches!(err, ServerError::Validation(_)), "got {err:?}");
        }
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sequence_is_prior_count_plus_one() {
        let svc = service().await;
        svc.create(CreateTaskRequest::new("a", "d")).await.unwrap();
        svc.create(CreateTaskRequest::new("b", "d")).await.unwrap();
        let before = svc.count().await.unwrap();
        let task = svc.create(buy_milk()).await.unwrap();
        assert_eq!(task.sequence, before + 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_everywhere() {
        let svc = service().await;
        let patch = UpdateTaskRequest {
            completed: Some(true),
            ..Default::default()
        };
        assert!(matches!(svc.find_one("ghost").await, Err(ServerError::NotFound(_))));
        assert!(matches!(svc.update("ghost", patch).await, Err(ServerError::NotFound(_))));
        assert!(matches!(
            svc.update("ghost", UpdateTaskRequest::default()).await,
            Err(ServerError::NotFound(_))
        ));
        assert!(matches!(svc.remove("ghost").await, Err(ServerError::NotFound(_))));
        assert!(matches!(svc.toggle_complete("ghost").await, Err(ServerError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_twice_fails_the_second_time() {
        let svc = service().await;
        let task = svc.create(buy_milk()).await.unwrap();
        svc.remove(&task.id).await.unwrap();
        assert!(matches!(svc.remove(&task.id).await, Err(ServerError::NotFound(_))));
    }

    #[tokio::test]
    async fn toggle_twice_restores_completed() {
        let svc = service().await;
        let task = svc.create(buy_milk()).await.unwrap();
        let once = svc.toggle_complete(&task.id).await.unwrap();
        assert!(once.completed);
        let twice = svc.toggle_complete(&task.id).await.unwrap();
        assert_eq!(twice.completed, task.completed);
        assert!(twice.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn update_keeps_unspecified_fields() {
        let svc = service().await;
        let task = svc.create(buy_milk()).await.unwrap();
        let patch = UpdateTaskRequest {
            description: Some("skimmed".into()),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let updated = svc.update(&task.id, patch).await.unwrap();
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.description, "skimmed");
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.category, "shopping");
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.sequence, task.sequence);
    }

    #[tokio::test]
    async fn update_validates_present_fields() {
        let svc = service().await;
        let task = svc.create(buy_milk()).await.unwrap();
        let patch = UpdateTaskRequest {
            title: Some("y".repeat(300)),
            ..Default::default()
        };
        assert!(matches!(svc.update(&task.id, patch).await, Err(ServerError::Validation(_))));
        assert_eq!(svc.find_one(&task.id).await.unwrap().title, "Buy milk");
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let svc = service().await;
        let task = svc.create(buy_milk()).await.unwrap();
        let same = svc.update(&task.id, UpdateTaskRequest::default()).await.unwrap();
        assert_eq!(same, task);
    }

    #[tokio::test]
    async fn list_prefers_category_over_priority() {
        let svc = service().await;
        let milk = svc.create(buy_milk()).await.unwrap();
        let report = svc
            .create(
                CreateTaskRequest::new("Report", "Q3")
                    .with_priority(Priority::High)
                    .with_category("work"),
            )
            .await
            .unwrap();

        let by_category = svc.list(Some("shopping"), Some("high")).await.unwrap();
        assert_eq!(by_category, vec![milk.clone()]);

        let by_priority = svc.list(Some(""), Some("high")).await.unwrap();
        assert_eq!(by_priority, vec![report.clone(), milk.clone()]);

        let everything = svc.list(None, None).await.unwrap();
        assert_eq!(everything.len(), 2);
        assert!(everything[0].created_at >= everything[1].created_at);

        assert!(svc.find_by_priority("urgent").await.unwrap().is_empty());
        assert!(svc.find_by_category("garden").await.unwrap().is_empty());
    }
}
