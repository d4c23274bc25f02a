// Query filtering for tasks

use crate::models::Task;

/// Which tasks a read should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Completed, // is_completed = 1
    Pending,   // is_completed = 0
}

impl TaskFilter {
    /// Filter for the completed/pending view selected in the UI
    pub fn for_view(show_completed: bool) -> Self {
        if show_completed {
            TaskFilter::Completed
        } else {
            TaskFilter::Pending
        }
    }

    pub(crate) fn to_sql(self) -> &'static str {
        match self {
            TaskFilter::All => "",
            TaskFilter::Completed => " WHERE is_completed = 1",
            TaskFilter::Pending => " WHERE is_completed = 0",
        }
    }

    /// Same predicate as `to_sql`, evaluated in memory
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.is_completed,
            TaskFilter::Pending => !task.is_completed,
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Completed => write!(f, "completed"),
            TaskFilter::Pending => write!(f, "pending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(is_completed: bool) -> Task {
        Task {
            id: 1,
            description: "t".to_string(),
            is_completed,
        }
    }

    #[test]
    fn test_filter_to_sql() {
        assert_eq!(TaskFilter::All.to_sql(), "");
        assert_eq!(TaskFilter::Completed.to_sql(), " WHERE is_completed = 1");
        assert_eq!(TaskFilter::Pending.to_sql(), " WHERE is_completed = 0");
    }

    #[test]
    fn test_filter_matches() {
        assert!(TaskFilter::All.matches(&task(true)));
        assert!(TaskFilter::All.matches(&task(false)));
        assert!(TaskFilter::Completed.matches(&task(true)));
        assert!(!TaskFilter::Completed.matches(&task(false)));
        assert!(TaskFilter::Pending.matches(&task(false)));
        assert!(!TaskFilter::Pending.matches(&task(true)));
    }

    #[test]
    fn test_for_view() {
        assert_eq!(TaskFilter::for_view(true), TaskFilter::Completed);
        assert_eq!(TaskFilter::for_view(false), TaskFilter::Pending);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(TaskFilter::All.to_string(), "all");
        assert_eq!(TaskFilter::Pending.to_string(), "pending");
    }
}
