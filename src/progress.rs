use chrono::NaiveDate;
use crate::models::{Project, TaskStatus};

/// Task counts of a project broken down by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectProgress {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl ProjectProgress {
    pub fn of(project: &Project) -> Self {
        let mut progress = ProjectProgress::default();
        for t in project.tasks() {
            match t.status() {
                TaskStatus::Todo => progress.todo += 1,
                TaskStatus::InProgress => progress.in_progress += 1,
                TaskStatus::Done => progress.done += 1,
            }
        }
        progress
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }

    /// Share of done tasks, 0–100. An empty project is 0% complete.
    pub fn percent_done(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.done as f64 * 100.0 / self.total() as f64
    }
}

/// Days from `today` until the project's due date; negative when overdue.
pub fn days_until_due(project: &Project, today: NaiveDate) -> Option<i64> {
    project.due_date().map(|d| (d - today).num_days())
}

/// Human label for a day count: `3d`, `Today`, `2d overdue`.
pub fn due_label(days_left: i64) -> String {
    if days_left < 0 {
        format!("{}d overdue", days_left.abs())
    } else if days_left == 0 {
        "Today".to_string()
    } else {
        format!("{}d", days_left)
    }
}
