use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{id_or_new, non_empty, now_timestamp, new_id, timestamp_or_now, Identified};
use crate::error::ValidationError;

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// The status that follows this one in the todo → in_progress → done cycle.
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ValidationError::InvalidStatus(s.to_string())),
        }
    }
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: String,
    title: String,
    status: TaskStatus,
    assigned_to: Option<String>,
    created_at: String,
}

/// Stored shape of a task, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Absent means `todo`; an explicit `null` is rejected.
    #[serde(default = "default_status")]
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub created_at: Option<String>,
}

fn default_status() -> Option<String> {
    Some(TaskStatus::Todo.as_str().to_string())
}

impl Task {
    /// Creates a `todo` task with a fresh id.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Task {
            id: new_id(),
            title: non_empty(title, "Task", "title")?,
            status: TaskStatus::Todo,
            assigned_to: None,
            created_at: now_timestamp(),
        })
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = non_empty(title, "Task", "title")?;
        Ok(())
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Parses `value` and assigns it, leaving the task untouched on failure.
    pub fn set_status_str(&mut self, value: &str) -> Result<(), ValidationError> {
        self.status = value.parse()?;
        Ok(())
    }

    /// Derived from `status`; there is no separate flag.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn mark_complete(&mut self) {
        self.status = TaskStatus::Done;
    }

    pub fn mark_incomplete(&mut self) {
        self.status = TaskStatus::Todo;
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Sets or clears the assignee. The user id is not checked here.
    pub fn assign(&mut self, user_id: Option<String>) {
        self.assigned_to = user_id;
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let status = match record.status {
            Some(s) => s.parse()?,
            None => return Err(ValidationError::InvalidStatus("null".to_string())),
        };
        Ok(Task {
            title: non_empty(&record.title, "Task", "title")?,
            id: id_or_new(record.id),
            status,
            assigned_to: record.assigned_to,
            created_at: timestamp_or_now(record.created_at),
        })
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let badge = if self.is_completed() { "✓" } else { "○" };
        write!(f, "{} {} [{}]", badge, self.title, self.status)
    }
}
