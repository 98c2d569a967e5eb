use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use tasklist_types::Task;

use crate::entities::TaskRecord;

/// Query string accepted by `GET /tasks`.
///
/// `category` takes precedence over `priority`; the two are never combined.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Exact category to match.
    pub category: Option<String>,
    /// Exact priority to match (`low`, `medium` or `high`).
    pub priority: Option<String>,
}

impl TaskRecord {
    pub fn to_response(&self) -> Task {
        Task {
            id: self.id.clone(),
            sequence: self.sequence,
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            priority: self.priority,
            due_date: self.due_date,
            category: self.category.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
