// Text rendering of the task list

use crate::filter::TaskFilter;
use crate::models::Task;
use colored::Colorize;

/// One line per task: id, description, status
pub fn render_task(task: &Task) -> String {
    let status = if task.is_completed {
        task.status_label().green()
    } else {
        task.status_label().yellow()
    };
    format!("{:>4}  {}  [{}]", task.id, task.description, status)
}

/// Render the completed or pending view of a snapshot
///
/// The snapshot is the controller's unfiltered list; the view picks its own rows.
pub fn render_view(tasks: &[Task], show_completed: bool) -> String {
    let filter = TaskFilter::for_view(show_completed);
    render_filtered(tasks, filter)
}

pub fn render_filtered(tasks: &[Task], filter: TaskFilter) -> String {
    let rows: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    let title = match filter {
        TaskFilter::All => "All tasks",
        TaskFilter::Completed => "Completed tasks",
        TaskFilter::Pending => "Pending tasks",
    };

    let mut out = format!("{} ({})\n", title.bold(), rows.len());
    if rows.is_empty() {
        out.push_str(&format!("  {}\n", format!("no {} tasks", filter).dimmed()));
    }
    for task in rows {
        out.push_str(&render_task(task));
        out.push('\n');
    }
    out
}

pub fn render_json(tasks: &[Task], filter: TaskFilter) -> serde_json::Result<String> {
    let rows: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    serde_json::to_string_pretty(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task {
                id: 1,
                description: "Buy milk".to_string(),
                is_completed: true,
            },
            Task {
                id: 2,
                description: "Walk dog".to_string(),
                is_completed: false,
            },
        ]
    }

    #[test]
    fn test_render_view_pending() {
        colored::control::set_override(false);
        let out = render_view(&tasks(), false);

        assert_eq!(out, "Pending tasks (1)\n   2  Walk dog  [Pending]\n");
    }

    #[test]
    fn test_render_view_completed() {
        colored::control::set_override(false);
        let out = render_view(&tasks(), true);

        assert_eq!(out, "Completed tasks (1)\n   1  Buy milk  [Completed]\n");
    }

    #[test]
    fn test_render_empty_view() {
        colored::control::set_override(false);
        let out = render_view(&[], true);

        assert_eq!(out, "Completed tasks (0)\n  no completed tasks\n");
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&tasks(), TaskFilter::All).unwrap();
        let parsed: Vec<Task> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tasks());

        let json = render_json(&tasks(), TaskFilter::Pending).unwrap();
        let parsed: Vec<Task> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, 2);
    }
}
