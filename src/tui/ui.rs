use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use chrono::Local;
use crate::models::TaskStatus;
use crate::progress::{days_until_due, due_label, ProjectProgress};
use crate::storage::index_by_id;
use super::app::{App, InputMode, ViewMode};

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Todo => Style::default().fg(Color::Yellow),
        TaskStatus::InProgress => Style::default().fg(Color::Cyan),
        TaskStatus::Done => Style::default().fg(Color::Green),
    }
}

fn styled_table<'a>(rows: Vec<Row<'a>>, widths: &[Constraint], header: Vec<&'a str>, title: String) -> Table<'a> {
    Table::new(rows, widths.to_vec())
        .header(Row::new(header)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ")
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Status
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let title = format!("project-tracker - {}", app.view_mode.title());
    let users_by_id = index_by_id(&app.users);

    match app.view_mode {
        ViewMode::Users => {
            let rows: Vec<Row> = app
                .users
                .iter()
                .map(|u| {
                    Row::new(vec![
                        Cell::from(u.name().to_string()),
                        Cell::from(u.email().unwrap_or("-").to_string()),
                        Cell::from(u.id().to_string()),
                    ])
                })
                .collect();
            let widths = [Constraint::Min(20), Constraint::Length(30), Constraint::Length(38)];
            let table = styled_table(rows, &widths, vec!["Name", "Email", "ID"], title);
            f.render_stateful_widget(table, chunks[0], &mut app.user_state);
        }
        ViewMode::Projects => {
            let today = Local::now().date_naive();
            let rows: Vec<Row> = app
                .projects
                .iter()
                .map(|p| {
                    let progress = ProjectProgress::of(p);
                    let days = days_until_due(p, today);
                    let style = match days {
                        Some(d) if d < 0 && progress.done < progress.total() => Style::default().fg(Color::Red),
                        _ => Style::default(),
                    };
                    Row::new(vec![
                        Cell::from(p.title().to_string()),
                        Cell::from(users_by_id.get(p.user_id()).map(|u| u.name()).unwrap_or("-").to_string()),
                        Cell::from(format!("{}/{}", progress.done, progress.total())),
                        Cell::from(p.due_date().map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
                        Cell::from(days.map(due_label).unwrap_or_else(|| "-".into())),
                    ]).style(style)
                })
                .collect();
            let widths = [
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(12),
            ];
            let table = styled_table(rows, &widths, vec!["Title", "Owner", "Done", "Due", "Time Left"], title);
            f.render_stateful_widget(table, chunks[0], &mut app.project_state);
        }
        ViewMode::Tasks => {
            let rows: Vec<Row> = app
                .task_rows
                .iter()
                .filter_map(|&(pi, ti)| {
                    let p = app.projects.get(pi)?;
                    let t = p.tasks().get(ti)?;
                    let assignee = t
                        .assigned_to()
                        .map(|id| users_by_id.get(id).map(|u| u.name()).unwrap_or(id))
                        .unwrap_or("-");
                    Some(Row::new(vec![
                        Cell::from(t.title().to_string()),
                        Cell::from(p.title().to_string()),
                        Cell::from(t.status().to_string()),
                        Cell::from(assignee.to_string()),
                    ]).style(status_style(t.status())))
                })
                .collect();
            let widths = [
                Constraint::Min(20),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(16),
            ];
            let title = if app.show_done { title } else { format!("{} (hiding done)", title) };
            let table = styled_table(rows, &widths, vec!["Title", "Project", "Status", "Assignee"], title);
            f.render_stateful_widget(table, chunks[0], &mut app.task_state);
        }
    }

    let status = Paragraph::new(app.message.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(status, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | a: Add | Space: Done/Undo | s: Next Status | c: Toggle Done | v/Tab: Next View",
            _ => "q: Quit | a: Add | v/Tab: Next View",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area);

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(app.prompt()));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
