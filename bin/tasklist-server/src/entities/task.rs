use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{QueryBuilder, Sqlite};
use std::future::Future;
use tasklist_types::Priority;
use tracing::warn;
use uuid::Uuid;

use crate::entities::SqliteStore;
use crate::entities::dao::{NewTask, TaskFilter, TaskPatch, TaskRecord};

/// What the task service needs from persistence.
///
/// Lookups by an unknown id resolve to `None` / `false`; turning that into a
/// NotFound error is the service's job.
pub trait TaskStore: Send + Sync + 'static {
    /// Persist a new task. The store assigns the id, the sequence number
    /// (current record count + 1, computed in the same statement as the
    /// insert) and both timestamps.
    fn insert_task(
        &self,
        task: NewTask,
    ) -> impl Future<Output = Result<TaskRecord, sqlx::Error>> + Send;
    fn get_task(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<TaskRecord>, sqlx::Error>> + Send;
    /// Matching tasks, newest `created_at` first.
    fn list_tasks(
        &self,
        filter: TaskFilter,
    ) -> impl Future<Output = Result<Vec<TaskRecord>, sqlx::Error>> + Send;
    /// Apply the non-`None` fields of `patch` and refresh `updated_at`.
    fn update_task(
        &self,
        id: &str,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Option<TaskRecord>, sqlx::Error>> + Send;
    /// Flip `completed` in a single statement so concurrent toggles never
    /// overwrite each other.
    fn toggle_task(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<TaskRecord>, sqlx::Error>> + Send;
    /// Returns `true` if a row was removed.
    fn delete_task(&self, id: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    fn count_tasks(&self) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;
}

macro_rules! task_columns {
    () => {
        "id, seq, title, description, completed, priority, due_date, category, created_at, updated_at"
    };
}

type TaskRow = (
    String,
    i64,
    String,
    String,
    bool,
    String,
    Option<String>,
    String,
    String,
    String,
);

impl TaskStore for SqliteStore {
    async fn insert_task(&self, task: NewTask) -> Result<TaskRecord, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = db_timestamp(&Utc::now());
        let row: TaskRow = sqlx::query_as(concat!(
            "INSERT INTO tasks (id, seq, title, description, completed, priority, due_date, category, created_at, updated_at) \
             VALUES (?1, (SELECT COUNT(*) FROM tasks) + 1, ?2, ?3, 0, ?4, ?5, ?6, ?7, ?7) \
             RETURNING ",
            task_columns!()
        ))
        .bind(&id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.due_date.as_ref().map(db_timestamp))
        .bind(&task.category)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;
        into_record(row)
    }

    async fn get_task(&self, id: &str) -> Result<Option<TaskRecord>, sqlx::Error> {
        let row: Option<TaskRow> =
            sqlx::query_as(concat!("SELECT ", task_columns!(), " FROM tasks WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(into_record).transpose()
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<TaskRecord>, sqlx::Error> {
        // rowid breaks ties between rows created within the same microsecond.
        let rows: Vec<TaskRow> = match filter {
            TaskFilter::All => {
                sqlx::query_as(concat!(
                    "SELECT ",
                    task_columns!(),
                    " FROM tasks ORDER BY created_at DESC, rowid DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
            TaskFilter::Category(category) => {
                sqlx::query_as(concat!(
                    "SELECT ",
                    task_columns!(),
                    " FROM tasks WHERE category = ?1 ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            TaskFilter::Priority(priority) => {
                sqlx::query_as(concat!(
                    "SELECT ",
                    task_columns!(),
                    " FROM tasks WHERE priority = ?1 ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(priority)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(into_record).collect()
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<TaskRecord>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE tasks SET updated_at = ");
        query.push_bind(db_timestamp(&Utc::now()));
        if let Some(title) = patch.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(completed) = patch.completed {
            query.push(", completed = ").push_bind(completed);
        }
        if let Some(priority) = patch.priority {
            query.push(", priority = ").push_bind(priority.as_str());
        }
        if let Some(due_date) = patch.due_date {
            query.push(", due_date = ").push_bind(db_timestamp(&due_date));
        }
        if let Some(category) = patch.category {
            query.push(", category = ").push_bind(category);
        }
        query
            .push(" WHERE id = ")
            .push_bind(id.to_owned())
            .push(concat!(" RETURNING ", task_columns!()));

        let row: Option<TaskRow> = query.build_query_as().fetch_optional(&self.pool).await?;
        row.map(into_record).transpose()
    }

    async fn toggle_task(&self, id: &str) -> Result<Option<TaskRecord>, sqlx::Error> {
        let row: Option<TaskRow> = sqlx::query_as(concat!(
            "UPDATE tasks SET completed = NOT completed, updated_at = ?1 WHERE id = ?2 RETURNING ",
            task_columns!()
        ))
        .bind(db_timestamp(&Utc::now()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(into_record).transpose()
    }

    async fn delete_task(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_tasks(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// ── row mapping ──────────────────────────────────────────────────────────────

/// Fixed-width RFC 3339 (microseconds, `Z`) so text order equals time order.
fn db_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A row that fails to parse is reported as a decode error, never repaired.
fn into_record(row: TaskRow) -> Result<TaskRecord, sqlx::Error> {
    let (id, sequence, title, description, completed, priority, due_date, category, created_at, updated_at) =
        row;
    let priority: Priority = priority
        .parse()
        .map_err(|_| decode_error(&id, "priority", &priority))?;
    let due_date = due_date
        .map(|raw| parse_timestamp(&id, "due_date", &raw))
        .transpose()?;
    let created_at = parse_timestamp(&id, "created_at", &created_at)?;
    let updated_at = parse_timestamp(&id, "updated_at", &updated_at)?;
    Ok(TaskRecord {
        id,
        sequence,
        title,
        description,
        completed,
        priority,
        due_date,
        category,
        created_at,
        updated_at,
    })
}

fn parse_timestamp(id: &str, column: &str, raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    raw.parse().map_err(|_| decode_error(id, column, raw))
}

fn decode_error(id: &str, column: &str, raw: &str) -> sqlx::Error {
    warn!(task_id = %id, column, raw, "unreadable task column");
    sqlx::Error::Decode(format!("task {id}: invalid {column} value '{raw}'").into())
}
