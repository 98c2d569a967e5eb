use chrono::{DateTime, Utc};
use tasklist_types::Priority;

/// A row in the `tasks` table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: String,
    /// Advisory creation ordinal (`seq` column).
    pub sequence: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when inserting a task; the store assigns the rest.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub category: String,
}

/// Column changes for a partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

/// Row selection for listing queries. Results are always newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Category(String),
    /// Raw priority text; values outside the enum simply match nothing.
    Priority(String),
}
