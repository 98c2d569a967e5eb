//! Shared data model for tasklist.
//!
//! Both the server and the client speak in terms of these types, so the wire
//! format (field names, enum spelling, timestamp encoding) is defined once
//! here. Request payloads also carry the field constraint table used to
//! validate input before any store operation runs.

pub mod request;
pub mod task;

pub use request::{CreateTaskRequest, UpdateTaskRequest, parse_due_date};
pub use task::{DEFAULT_CATEGORY, Priority, Task, TITLE_MAX_CHARS};
