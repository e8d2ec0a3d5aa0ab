use log::info;

use crate::error::CommandError;
use crate::models::{Project, Task, TaskStatus, User};
use crate::output::{self, projects_table, tasks_table, users_table};
use crate::storage::{
    get_project_by_title, get_project_by_title_mut, get_user_by_name, index_by_id,
    project_with_task, project_with_task_mut, Store,
};

/// Whether an add command wrote anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Added {
    Created,
    /// Nothing was written; holds the warning shown to the user.
    Skipped(String),
}

/// Adds a new user.
///
/// Names are unique case-insensitively, and so are emails when given. A
/// duplicate is reported as a warning and nothing is written.
pub fn cmd_add_user(store: &Store, name: &str, email: Option<&str>, silent: bool) -> Result<Added, CommandError> {
    let mut users = store.load_users()?;
    let user = User::new(name, email)?;

    let duplicate = if get_user_by_name(&users, user.name()).is_some() {
        Some(format!("User with name '{}' already exists.", user.name()))
    } else {
        user.email()
            .filter(|email| users.iter().any(|u| u.email() == Some(*email)))
            .map(|email| format!("User with email '{}' already exists.", email))
    };
    if let Some(reason) = duplicate {
        if !silent { output::warn(&reason); }
        return Ok(Added::Skipped(reason));
    }

    info!("creating user {}", user.id());
    let summary = user.to_string();
    users.push(user);
    store.save_users(&users)?;
    if !silent {
        output::info(&format!("User created: {}", summary));
        println!("{}", users_table(&users));
    }
    Ok(Added::Created)
}

/// Lists all users.
pub fn cmd_list_users(store: &Store) -> Result<(), CommandError> {
    let users = store.load_users()?;
    if users.is_empty() {
        output::warn("No users found.");
        return Ok(());
    }
    println!("{}", users_table(&users));
    Ok(())
}

/// Creates a project owned by the user called `owner`.
///
/// A project with the same title for the same owner only triggers a warning.
pub fn cmd_add_project(
    store: &Store,
    owner: &str,
    title: &str,
    description: Option<&str>,
    due: Option<&str>,
    silent: bool,
) -> Result<(), CommandError> {
    let users = store.load_users()?;
    let mut projects = store.load_projects()?;

    let owner = get_user_by_name(&users, owner).ok_or_else(|| CommandError::not_found("user", owner))?;

    let mut project = Project::new(title, owner.id())?;
    if let Some(d) = description {
        project.set_description(d);
    }
    project.set_due_date(due)?;

    let lowered = project.title().to_lowercase();
    if projects.iter().any(|p| p.user_id() == owner.id() && p.title().to_lowercase() == lowered) {
        if !silent { output::warn(&format!("Project '{}' already exists for user '{}'.", project.title(), owner.name())); }
    }

    info!("creating project {} for user {}", project.id(), owner.id());
    let summary = project.to_string();
    projects.push(project);
    store.save_projects(&projects)?;
    if !silent {
        output::info(&format!("Project created: {}", summary));
        println!("{}", projects_table(&projects, &index_by_id(&users)));
    }
    Ok(())
}

/// Lists projects, optionally only those owned by `owner`.
pub fn cmd_list_projects(store: &Store, owner: Option<&str>) -> Result<(), CommandError> {
    let users = store.load_users()?;
    let mut projects = store.load_projects()?;

    if let Some(name) = owner {
        let owner = get_user_by_name(&users, name).ok_or_else(|| CommandError::not_found("user", name))?;
        let owner_id = owner.id().to_string();
        projects.retain(|p| p.user_id() == owner_id);
    }

    if projects.is_empty() {
        output::warn("No projects found.");
        return Ok(());
    }
    println!("{}", projects_table(&projects, &index_by_id(&users)));
    Ok(())
}

/// Appends a new task to the project titled `project`.
///
/// When `assignee` is given it must name an existing user.
pub fn cmd_add_task(
    store: &Store,
    project: &str,
    title: &str,
    assignee: Option<&str>,
    silent: bool,
) -> Result<(), CommandError> {
    let users = store.load_users()?;
    let mut projects = store.load_projects()?;

    let mut task = Task::new(title)?;
    if let Some(name) = assignee {
        let user = get_user_by_name(&users, name).ok_or_else(|| CommandError::not_found("user", name))?;
        task = task.with_assignee(user.id());
    }

    let proj = get_project_by_title_mut(&mut projects, project)
        .ok_or_else(|| CommandError::not_found("project", project))?;
    let summary = format!("Task created: {} in project '{}'", task, proj.title());
    let project_id = proj.id().to_string();
    info!("adding task {} to project {}", task.id(), project_id);
    proj.add_task(task);

    store.save_projects(&projects)?;
    if !silent {
        output::info(&summary);
        if let Some(p) = projects.iter().find(|p| p.id() == project_id) {
            print_project_tasks(p, &users);
        }
    }
    Ok(())
}

/// Lists tasks across all projects, or only those of `project`.
pub fn cmd_list_tasks(store: &Store, project: Option<&str>) -> Result<(), CommandError> {
    let users = store.load_users()?;
    let projects = store.load_projects()?;

    if let Some(title) = project {
        let proj = get_project_by_title(&projects, title).ok_or_else(|| CommandError::not_found("project", title))?;
        if proj.tasks().is_empty() {
            output::warn(&format!("No tasks found for project '{}'.", proj.title()));
            return Ok(());
        }
        print_project_tasks(proj, &users);
        return Ok(());
    }

    let rows: Vec<(&Task, &Project)> = projects
        .iter()
        .flat_map(|p| p.tasks().iter().map(move |t| (t, p)))
        .collect();
    if rows.is_empty() {
        output::warn("No tasks found.");
        return Ok(());
    }
    println!("{}", tasks_table(&rows, &index_by_id(&users)));
    Ok(())
}

/// Marks a task as done by its id.
pub fn cmd_complete_task(store: &Store, id: &str, silent: bool) -> Result<(), CommandError> {
    update_task(store, id, silent, |task| {
        if task.is_completed() {
            return Ok(Change::Unchanged(format!("Task '{}' is already completed.", task.title())));
        }
        task.mark_complete();
        Ok(Change::Applied(format!("Task completed: {} (id={})", task.title(), task.id())))
    })
}

/// Moves a task back to `todo` by its id.
pub fn cmd_reopen_task(store: &Store, id: &str, silent: bool) -> Result<(), CommandError> {
    update_task(store, id, silent, |task| {
        if task.status() == TaskStatus::Todo {
            return Ok(Change::Unchanged(format!("Task '{}' is already todo.", task.title())));
        }
        task.mark_incomplete();
        Ok(Change::Applied(format!("Task reopened: {} (id={})", task.title(), task.id())))
    })
}

/// Sets the status of a task from its textual form.
pub fn cmd_set_status(store: &Store, id: &str, status: &str, silent: bool) -> Result<(), CommandError> {
    let status: TaskStatus = status.parse()?;
    update_task(store, id, silent, |task| {
        task.set_status(status);
        Ok(Change::Applied(format!("Task '{}' is now {}.", task.title(), status)))
    })
}

/// Assigns a task to the user called `user`, or clears the assignee.
pub fn cmd_assign_task(store: &Store, id: &str, user: Option<&str>, silent: bool) -> Result<(), CommandError> {
    let assignee = match user {
        Some(name) => {
            let users = store.load_users()?;
            let u = get_user_by_name(&users, name).ok_or_else(|| CommandError::not_found("user", name))?;
            Some((u.id().to_string(), u.name().to_string()))
        }
        None => None,
    };
    update_task(store, id, silent, |task| {
        let msg = match &assignee {
            Some((_, name)) => format!("Task '{}' assigned to {}.", task.title(), name),
            None => format!("Task '{}' is now unassigned.", task.title()),
        };
        task.assign(assignee.as_ref().map(|(id, _)| id.clone()));
        Ok(Change::Applied(msg))
    })
}

/// Outcome of a task mutation, with the message to show.
enum Change {
    Applied(String),
    /// Nothing to do; reported as a warning and not saved.
    Unchanged(String),
}

/// Loads projects, applies `change` to the task with `id` and saves.
fn update_task<F>(store: &Store, id: &str, silent: bool, change: F) -> Result<(), CommandError>
where
    F: FnOnce(&mut Task) -> Result<Change, CommandError>,
{
    let tid = id.trim();
    let mut projects = store.load_projects()?;

    let proj = project_with_task_mut(&mut projects, tid).ok_or_else(|| CommandError::not_found("task id", tid))?;
    let project_title = proj.title().to_string();
    let Some(task) = proj.find_task_mut(tid) else {
        return Err(CommandError::not_found("task id", tid));
    };

    match change(task)? {
        Change::Applied(msg) => {
            store.save_projects(&projects)?;
            info!("updated task {}", tid);
            if !silent { output::info(&format!("{} in project '{}'", msg, project_title)); }
        }
        Change::Unchanged(msg) => {
            if !silent { output::warn(&msg); }
        }
    }

    if !silent {
        let users = store.load_users()?;
        if let Some(p) = project_with_task(&projects, tid) {
            print_project_tasks(p, &users);
        }
    }
    Ok(())
}

fn print_project_tasks(project: &Project, users: &[User]) {
    let rows: Vec<(&Task, &Project)> = project.tasks().iter().map(|t| (t, project)).collect();
    println!("{}", tasks_table(&rows, &index_by_id(users)));
}
