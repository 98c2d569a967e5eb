use clap::{ArgAction, Args, Parser, Subcommand};

use tasklist_client::DEFAULT_BASE_URL;
use tasklist_types::{CreateTaskRequest, DEFAULT_CATEGORY, Priority, UpdateTaskRequest};

/// Top-level CLI parser for the `tasklist` binary.
#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Manage to-do items on a tasklist server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the tasklist server
    #[arg(long, global = true, env = "TASKLIST_SERVER", default_value = DEFAULT_BASE_URL)]
    pub server: String,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List tasks, newest first
    List(ListArgs),
    /// Show every field of one task
    Show {
        /// Task identifier (`_id`)
        id: String,
    },
    /// Create a task
    Add(AddArgs),
    /// Change fields of an existing task
    Edit(EditArgs),
    /// Flip a task between done and not done
    Toggle {
        /// Task identifier (`_id`)
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task identifier (`_id`)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Filter flags. When both are given the category filter is used, matching
/// the server's own precedence.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only tasks in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only tasks with this priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<Priority>,
}

/// Which listing call the filter flags select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Category(String),
    Priority(Priority),
}

impl ListArgs {
    pub fn filter(&self) -> ListFilter {
        match (self.category.as_deref(), self.priority) {
            (Some(category), _) if !category.is_empty() => ListFilter::Category(category.to_owned()),
            (_, Some(priority)) => ListFilter::Priority(priority),
            _ => ListFilter::All,
        }
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Short summary, 1 to 255 characters
    #[arg(long)]
    pub title: String,

    /// Longer free-form text
    #[arg(long)]
    pub description: String,

    #[arg(long, default_value = "medium")]
    pub priority: Priority,

    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Due date, e.g. 2025-01-31 or 2025-01-31T09:30:00Z
    #[arg(long)]
    pub due: Option<String>,
}

impl AddArgs {
    pub fn into_request(self) -> CreateTaskRequest {
        let mut req = CreateTaskRequest::new(self.title.trim(), self.description.trim())
            .with_priority(self.priority)
            .with_category(self.category);
        if let Some(due) = self.due {
            req = req.with_due_date(due);
        }
        req
    }
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task identifier (`_id`)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub due: Option<String>,

    /// Set the completion flag explicitly (true or false)
    #[arg(long)]
    pub completed: Option<bool>,
}

impl EditArgs {
    pub fn into_request(self) -> (String, UpdateTaskRequest) {
        let req = UpdateTaskRequest {
            title: self.title.map(|t| t.trim().to_owned()),
            description: self.description.map(|d| d.trim().to_owned()),
            completed: self.completed,
            priority: self.priority,
            due_date: self.due,
            category: self.category,
        };
        (self.id, req)
    }
}
