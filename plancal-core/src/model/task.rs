//! Tracked tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Priority;
use crate::bucket::Dated;
use crate::local_date::{date_key, format_local_date};
use crate::store::Record;

string_enum!(
    TaskStatus {
        Todo => "todo",
        InProgress => "in_progress",
        Review => "review",
        Done => "done",
    }
);

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD`, sometimes with a `THH:MM:SS` suffix
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(name: &str, due: Option<NaiveDate>) -> Self {
        Task {
            id: String::new(),
            project_id: None,
            name: name.trim().to_string(),
            description: None,
            due_date: due.map(format_local_date),
            priority: Priority::default(),
            status: TaskStatus::default(),
        }
    }
}

impl Record for Task {
    const TABLE: &'static str = "tasks";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Dated for Task {
    fn date_key(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(date_key)
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn is_important(&self) -> bool {
        self.priority.is_important()
    }
}
