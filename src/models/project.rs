use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskRecord};
use super::{
    id_or_new, non_empty, now_timestamp, new_id, parse_due_date, timestamp_or_now, Identified,
};
use crate::error::ValidationError;

/// A user-owned project holding an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    id: String,
    title: String,
    user_id: String,
    description: String,
    /// Serialized as `YYYY-MM-DD` or `null`.
    due_date: Option<NaiveDate>,
    tasks: Vec<Task>,
    created_at: String,
}

/// Stored shape of a project, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRecord {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user_id: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    pub created_at: Option<String>,
}

impl Project {
    /// Creates an empty project owned by `user_id`.
    ///
    /// The owner is not looked up; callers check that the user exists.
    pub fn new(title: &str, user_id: &str) -> Result<Self, ValidationError> {
        Ok(Project {
            id: new_id(),
            title: non_empty(title, "Project", "title")?,
            user_id: user_id.to_string(),
            description: String::new(),
            due_date: None,
            tasks: Vec::new(),
            created_at: now_timestamp(),
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_due_date(mut self, due: &str) -> Result<Self, ValidationError> {
        self.set_due_date(Some(due))?;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = non_empty(title, "Project", "title")?;
        Ok(())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// `None` or a blank string clears the due date.
    pub fn set_due_date(&mut self, due: Option<&str>) -> Result<(), ValidationError> {
        self.due_date = match due {
            Some(d) if !d.trim().is_empty() => Some(parse_due_date(d)?),
            _ => None,
        };
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Appends a task; insertion order is preserved.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == task_id)
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Identified for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<ProjectRecord> for Project {
    type Error = ValidationError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let title = non_empty(&record.title, "Project", "title")?;
        let due_date = match record.due_date.as_deref() {
            Some(d) if !d.trim().is_empty() => Some(parse_due_date(d)?),
            _ => None,
        };
        let tasks = record
            .tasks
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Project {
            id: id_or_new(record.id),
            title,
            user_id: record.user_id,
            description: record.description.unwrap_or_default(),
            due_date,
            tasks,
            created_at: timestamp_or_now(record.created_at),
        })
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(f, "{} (due {}, {} tasks)", self.title, due, self.tasks.len())
    }
}
