//! Request payloads and the field constraint table.
//!
//! Each payload lists exactly the keys its operation accepts
//! (`deny_unknown_fields`); anything else is rejected during decoding. Value
//! constraints are declared with `validator` and checked with
//! [`validator::Validate::validate`] before the payload reaches the store.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::task::{Priority, TITLE_MAX_CHARS};

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = TITLE_MAX_CHARS, message = "title must be 1 to 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// ISO-8601 date (`2025-01-31`) or date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_due_date"))]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Body of `PATCH /tasks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = TITLE_MAX_CHARS, message = "title must be 1 to 255 characters"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_due_date"))]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl UpdateTaskRequest {
    /// `true` when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.category.is_none()
    }
}

/// Parse a due date the way the API accepts it.
///
/// Accepted forms, all normalised to UTC:
/// - RFC 3339 with offset: `2025-01-31T09:30:00+02:00`
/// - naive date-time, read as UTC: `2025-01-31T09:30:00` (fraction optional)
/// - plain date, read as midnight UTC: `2025-01-31`
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_due_date(raw: &str) -> Result<(), ValidationError> {
    if parse_due_date(raw).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("due_date")
        .with_message(Cow::Borrowed("dueDate must be an ISO-8601 date or date-time")))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn minimal_create_is_valid() {
        let req = CreateTaskRequest::new("Buy milk", "2%");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let req = CreateTaskRequest::new("", "2%");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));
    }

    #[test]
    fn empty_description_is_rejected() {
        let req = CreateTaskRequest::new("Buy milk", "");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("description"));
    }

    #[test]
    fn title_limit_counts_characters() {
        assert!(CreateTaskRequest::new("a".repeat(TITLE_MAX_CHARS as usize), "d").validate().is_ok());
        assert!(CreateTaskRequest::new("a".repeat(TITLE_MAX_CHARS as usize + 1), "d").validate().is_err());
        // 255 multi-byte characters are still within the limit.
        assert!(CreateTaskRequest::new("é".repeat(255), "d").validate().is_ok());
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let req = CreateTaskRequest::new("t", "d").with_due_date("next tuesday");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("due_date"));

        let req = CreateTaskRequest::new("t", "d").with_due_date("2025-02-30");
        assert!(req.validate().is_err());
    }

    #[test]
    fn unknown_create_field_is_rejected() {
        let body = r#"{"title":"t","description":"d","completed":true}"#;
        assert!(serde_json::from_str::<CreateTaskRequest>(body).is_err());
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let body = r#"{"title":"t","description":"d","priority":"urgent"}"#;
        assert!(serde_json::from_str::<CreateTaskRequest>(body).is_err());
    }

    #[test]
    fn update_accepts_subset_and_rejects_unknown_keys() {
        let patch: UpdateTaskRequest = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert_eq!(patch.completed, Some(true));
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());

        let body = r#"{"title":"fine","owner":"bob"}"#;
        assert!(serde_json::from_str::<UpdateTaskRequest>(body).is_err());
    }

    #[test]
    fn update_validates_present_fields_only() {
        let patch = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(UpdateTaskRequest::default().validate().is_ok());
        assert!(UpdateTaskRequest::default().is_empty());
    }

    #[test]
    fn due_date_forms() {
        let d = parse_due_date("2025-01-31").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2025, 1, 31, 0));

        let d = parse_due_date("2025-01-31T09:30:00+02:00").unwrap();
        assert_eq!(d.hour(), 7);

        let d = parse_due_date("2025-01-31T09:30:00.250").unwrap();
        assert_eq!(d.minute(), 30);

        assert!(parse_due_date("31/01/2025").is_none());
    }
}
