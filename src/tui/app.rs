use ratatui::widgets::TableState;

use crate::commands::{
    cmd_add_project, cmd_add_task, cmd_add_user, cmd_complete_task, cmd_reopen_task, cmd_set_status, Added,
};
use crate::error::CommandError;
use crate::models::{Project, Task, User};
use crate::storage::Store;

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Users,
    Projects,
    Tasks,
}

impl ViewMode {
    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Users => "Users",
            ViewMode::Projects => "Projects",
            ViewMode::Tasks => "Tasks",
        }
    }
}

/// State for the two-step "Add" wizard.
#[derive(Default)]
pub struct AddState {
    /// 0: first field, 1: second field
    pub step: usize,
    pub first: String,
}

pub struct App {
    store: Store,
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    /// (project index, task index) of every visible task, in display order.
    pub task_rows: Vec<(usize, usize)>,
    pub user_state: TableState,
    pub project_state: TableState,
    pub task_state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub show_done: bool,
    /// Last outcome or error, shown in the status line.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(store: Store) -> App {
        let mut app = App {
            store,
            users: Vec::new(),
            projects: Vec::new(),
            task_rows: Vec::new(),
            user_state: TableState::default(),
            project_state: TableState::default(),
            task_state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            show_done: false,
            message: None,
        };
        app.reload();
        app
    }

    /// Reloads users and projects from storage and refreshes the task rows.
    pub fn reload(&mut self) {
        match self.store.load_users() {
            Ok(users) => self.users = users,
            Err(e) => self.message = Some(e.to_string()),
        }
        match self.store.load_projects() {
            Ok(projects) => self.projects = projects,
            Err(e) => self.message = Some(e.to_string()),
        }

        self.task_rows = self
            .projects
            .iter()
            .enumerate()
            .flat_map(|(pi, p)| p.tasks().iter().enumerate().map(move |(ti, t)| (pi, ti, t)))
            .filter(|(_, _, t)| self.show_done || !t.is_completed())
            .map(|(pi, ti, _)| (pi, ti))
            .collect();

        clamp_selection(&mut self.user_state, self.users.len());
        clamp_selection(&mut self.project_state, self.projects.len());
        clamp_selection(&mut self.task_state, self.task_rows.len());
    }

    fn current(&mut self) -> (&mut TableState, usize) {
        match self.view_mode {
            ViewMode::Users => (&mut self.user_state, self.users.len()),
            ViewMode::Projects => (&mut self.project_state, self.projects.len()),
            ViewMode::Tasks => (&mut self.task_state, self.task_rows.len()),
        }
    }

    /// Selects the next item in the current list.
    pub fn next(&mut self) {
        let (state, len) = self.current();
        if len == 0 { return; }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    /// Selects the previous item in the current list.
    pub fn previous(&mut self) {
        let (state, len) = self.current();
        if len == 0 { return; }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Cycles Users → Projects → Tasks.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Users => ViewMode::Projects,
            ViewMode::Projects => ViewMode::Tasks,
            ViewMode::Tasks => ViewMode::Users,
        };
    }

    /// Toggles the visibility of done tasks.
    pub fn toggle_done_visible(&mut self) {
        self.show_done = !self.show_done;
        self.reload();
    }

    pub fn selected_task(&self) -> Option<(&Task, &Project)> {
        let (pi, ti) = *self.task_rows.get(self.task_state.selected()?)?;
        let project = self.projects.get(pi)?;
        Some((project.tasks().get(ti)?, project))
    }

    fn selected_task_id(&self) -> Option<String> {
        if self.view_mode != ViewMode::Tasks { return None; }
        self.selected_task().map(|(t, _)| t.id().to_string())
    }

    /// Flips the selected task between done and todo.
    pub fn toggle_selected_task(&mut self) {
        let Some(id) = self.selected_task_id() else { return };
        let done = self.selected_task().map(|(t, _)| t.is_completed()).unwrap_or(false);
        let result = if done {
            cmd_reopen_task(&self.store, &id, true)
        } else {
            cmd_complete_task(&self.store, &id, true)
        };
        self.finish(result.map(|()| Added::Created), if done { "Task reopened." } else { "Task completed." });
    }

    /// Advances the selected task to its next status.
    pub fn cycle_selected_status(&mut self) {
        let Some(id) = self.selected_task_id() else { return };
        let Some(next) = self.selected_task().map(|(t, _)| t.status().next()) else { return };
        let result = cmd_set_status(&self.store, &id, next.as_str(), true);
        self.finish(result.map(|()| Added::Created), &format!("Status set to {}.", next));
    }

    /// Initiates the "Add" wizard for the current view.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Prompt for the current wizard step.
    pub fn prompt(&self) -> &'static str {
        match (self.view_mode, self.add_state.step) {
            (ViewMode::Users, 0) => "Add User: Enter Name",
            (ViewMode::Users, _) => "Add User: Enter Email (Optional)",
            (ViewMode::Projects, 0) => "Add Project: Enter Owner Name",
            (ViewMode::Projects, _) => "Add Project: Enter Title",
            (ViewMode::Tasks, 0) => "Add Task: Enter Project Title",
            (ViewMode::Tasks, _) => "Add Task: Enter Title",
        }
    }

    /// Handles Enter while the wizard is open.
    pub fn handle_input(&mut self) {
        let value = self.input_buffer.trim().to_string();
        if self.add_state.step == 0 {
            if value.is_empty() { return; }
            self.add_state.first = value;
            self.add_state.step = 1;
            self.input_buffer.clear();
            return;
        }

        let first = std::mem::take(&mut self.add_state.first);
        let result = match self.view_mode {
            ViewMode::Users => {
                let email = (!value.is_empty()).then_some(value.as_str());
                cmd_add_user(&self.store, &first, email, true)
            }
            ViewMode::Projects => {
                cmd_add_project(&self.store, &first, &value, None, None, true).map(|()| Added::Created)
            }
            ViewMode::Tasks => cmd_add_task(&self.store, &first, &value, None, true).map(|()| Added::Created),
        };
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.finish(result, "Saved.");
    }

    fn finish(&mut self, result: Result<Added, CommandError>, ok_message: &str) {
        self.message = Some(match result {
            Ok(Added::Created) => ok_message.to_string(),
            Ok(Added::Skipped(reason)) => reason,
            Err(e) => e.to_string(),
        });
        self.reload();
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}
