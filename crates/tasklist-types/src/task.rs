use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters allowed in a task title.
pub const TITLE_MAX_CHARS: u64 = 255;

/// Category assigned to tasks created without one.
pub const DEFAULT_CATEGORY: &str = "personal";

/// Task priority. Anything other than these three values is rejected on input.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// A to-do item as stored and returned by the server.
///
/// `id` on the wire is the store-assigned opaque identifier (`_id`), while the
/// JSON `id` field carries the creation-time [`Task::sequence`] number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier assigned by the store. Never changes.
    #[serde(rename = "_id")]
    pub id: String,
    /// Advisory ordinal assigned once at creation (record count + 1).
    /// Not unique: a number freed by a delete can be handed out again.
    #[serde(rename = "id")]
    pub sequence: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
