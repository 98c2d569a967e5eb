//! Plain-text rendering of tasks.

use std::fmt::Write as _;

use tasklist_types::Task;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One line per task: completion box, sequence number, priority, category,
/// title and, when set, the due date.
pub fn task_line(task: &Task) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{check} #{:<4} {:<6} {:<12} {}",
        task.sequence,
        task.priority.as_str(),
        task.category,
        task.title
    );
    if let Some(due) = task.due_date {
        let _ = write!(line, "  (due {})", due.format(DATE_FORMAT));
    }
    line
}

pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_owned();
    }
    tasks.iter().map(task_line).collect::<Vec<_>>().join("\n")
}

/// Every field of a task, one per line.
pub fn task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", task_line(task));
    let _ = writeln!(out, "  id:          {}", task.id);
    let _ = writeln!(out, "  description: {}", task.description);
    let _ = writeln!(out, "  status:      {}", if task.completed { "done" } else { "open" });
    if let Some(due) = task.due_date {
        let _ = writeln!(out, "  due:         {}", due.format(DATE_TIME_FORMAT));
    }
    let _ = writeln!(out, "  created:     {}", task.created_at.format(DATE_TIME_FORMAT));
    let _ = write!(out, "  updated:     {}", task.updated_at.format(DATE_TIME_FORMAT));
    out
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use tasklist_types::Priority;

    use super::*;

    fn task() -> Task {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        Task {
            id: "0b7f6c1e-8f5a-4d62-9a43-3f2c5e9d1a10".into(),
            sequence: 3,
            title: "Buy milk".into(),
            description: "2%".into(),
            completed: false,
            priority: Priority::High,
            due_date: None,
            category: "shopping".into(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn open_task_line() {
        assert_eq!(task_line(&task()), "[ ] #3    high   shopping     Buy milk");
    }

    #[test]
    fn completed_task_with_due_date() {
        let mut t = task();
        t.completed = true;
        t.due_date = Some(Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap());
        let line = task_line(&t);
        assert!(line.starts_with("[x] #3"));
        assert!(line.ends_with("Buy milk  (due 2025-03-04)"));
    }

    #[test]
    fn empty_list_has_a_message() {
        assert_eq!(task_list(&[]), "No tasks found.");
    }

    #[test]
    fn list_keeps_order() {
        let mut older = task();
        older.title = "Older".into();
        let out = task_list(&[task(), older]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Buy milk"));
        assert!(lines[1].ends_with("Older"));
    }

    #[test]
    fn detail_shows_identifier_and_timestamps() {
        let out = task_detail(&task());
        assert!(out.contains("id:          0b7f6c1e-8f5a-4d62-9a43-3f2c5e9d1a10"));
        assert!(out.contains("status:      open"));
        assert!(out.contains("created:     2025-03-01 08:00:00 UTC"));
        assert!(!out.contains("due:"));
    }
}
