pub mod task;

pub use task::{NewTask, TaskFilter, TaskPatch, TaskRecord};
