//! Console rendering for the command layer: colored status lines and tables.

use std::collections::HashMap;

use chrono::Local;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::models::{Project, Task, TaskStatus, User};
use crate::progress::{days_until_due, due_label, ProjectProgress};

pub fn info(msg: &str) {
    println!("{}", msg.green());
}

pub fn warn(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(titles));
    table
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Done => Color::Green,
    }
}

pub fn users_table(users: &[User]) -> Table {
    let mut table = new_table(&["ID", "Name", "Email", "Created At"]);
    for u in users {
        table.add_row(vec![
            Cell::new(u.id()),
            Cell::new(u.name()),
            Cell::new(u.email().unwrap_or("-")),
            Cell::new(u.created_at()),
        ]);
    }
    table
}

/// Projects with owner name, task progress and time left until the due date.
pub fn projects_table(projects: &[Project], users_by_id: &HashMap<&str, &User>) -> Table {
    let mut table = new_table(&[
        "ID", "Title", "Owner", "Tasks", "Progress", "Due", "Time Left", "Created At",
    ]);
    let today = Local::now().date_naive();

    for p in projects {
        let owner = users_by_id
            .get(p.user_id())
            .map(|u| u.name())
            .unwrap_or("-");
        let progress = ProjectProgress::of(p);
        let (time_left, overdue) = match days_until_due(p, today) {
            Some(days) => (due_label(days), days < 0 && progress.done < progress.total()),
            None => ("-".to_string(), false),
        };
        table.add_row(vec![
            Cell::new(p.id()),
            Cell::new(p.title()),
            Cell::new(owner),
            Cell::new(p.tasks().len()),
            Cell::new(format!("{:.0}%", progress.percent_done())),
            Cell::new(p.due_date().map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(time_left).fg(if overdue { Color::Red } else { Color::Reset }),
            Cell::new(p.created_at()),
        ]);
    }
    table
}

/// Tasks paired with the project that owns them.
pub fn tasks_table(rows: &[(&Task, &Project)], users_by_id: &HashMap<&str, &User>) -> Table {
    let mut table = new_table(&["ID", "Title", "Project", "Status", "Assignee", "Created At"]);
    for (t, p) in rows {
        let assignee = t
            .assigned_to()
            .map(|id| users_by_id.get(id).map(|u| u.name()).unwrap_or(id))
            .unwrap_or("-");
        table.add_row(vec![
            Cell::new(t.id()),
            Cell::new(t.title()),
            Cell::new(p.title()),
            Cell::new(t.status()).fg(status_color(t.status())),
            Cell::new(assignee),
            Cell::new(t.created_at()),
        ]);
    }
    table
}
