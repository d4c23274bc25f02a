// Data models for the task list

use serde::{Deserialize, Serialize};

/// A single to-do item
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Copy of this task with completion flipped
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }

    /// Copy of this task with a new description
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_completed { "Completed" } else { "Pending" }
    }
}
