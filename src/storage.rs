use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{StorageError, ValidationError};
use crate::models::{Identified, Project, ProjectRecord, User, UserRecord};

/// JSON-file backed store for the user and project collections.
///
/// Every save rewrites the whole file; writes are not atomic and nothing
/// guards against two processes writing at once.
#[derive(Debug, Clone)]
pub struct Store {
    users_path: PathBuf,
    projects_path: PathBuf,
}

impl Store {
    pub fn new(config: &Config) -> Self {
        Store {
            users_path: config.users_path(),
            projects_path: config.projects_path(),
        }
    }

    /// Store rooted at `dir`, using the default file names.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Store::new(&Config::new(dir))
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn projects_path(&self) -> &Path {
        &self.projects_path
    }

    /// Loads all users, creating an empty users file first if needed.
    ///
    /// A file that is not valid JSON loads as an empty collection.
    pub fn load_users(&self) -> Result<Vec<User>, StorageError> {
        load_collection::<UserRecord, User>(&self.users_path)
    }

    /// Overwrites the users file with `users`, in order.
    pub fn save_users(&self, users: &[User]) -> Result<(), StorageError> {
        save_collection(&self.users_path, users)
    }

    /// Loads all projects with their tasks, creating an empty projects file
    /// first if needed.
    ///
    /// A file that is not valid JSON loads as an empty collection.
    pub fn load_projects(&self) -> Result<Vec<Project>, StorageError> {
        load_collection::<ProjectRecord, Project>(&self.projects_path)
    }

    /// Overwrites the projects file with `projects`, in order.
    pub fn save_projects(&self, projects: &[Project]) -> Result<(), StorageError> {
        save_collection(&self.projects_path, projects)
    }
}

/// Creates `path` containing an empty JSON array if it does not exist yet.
fn ensure_file(path: &Path) -> Result<(), StorageError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    fs::write(path, "[]").map_err(|source| io_error(path, source))?;
    info!("created empty store file {}", path.display());
    Ok(())
}

fn load_collection<R, E>(path: &Path) -> Result<Vec<E>, StorageError>
where
    R: DeserializeOwned,
    E: TryFrom<R, Error = ValidationError>,
{
    ensure_file(path)?;

    let mut f = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|source| io_error(path, source))?;
    let mut s = String::new();
    f.read_to_string(&mut s)
        .map_err(|source| io_error(path, source))?;

    let document: Value = match serde_json::from_str(&s) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "{} is not valid JSON ({}); treating it as empty",
                path.display(),
                e
            );
            return Ok(Vec::new());
        }
    };
    let Value::Array(items) = document else {
        return Err(StorageError::NotAnArray { path: path.to_path_buf() });
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record: R = serde_json::from_value(item).map_err(|source| StorageError::Record {
            path: path.to_path_buf(),
            index,
            source,
        })?;
        out.push(E::try_from(record)?);
    }
    debug!("loaded {} records from {}", out.len(), path.display());
    Ok(out)
}

fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StorageError> {
    let s = serde_json::to_string_pretty(items).map_err(StorageError::Encode)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| io_error(path, source))?;
    f.write_all(s.as_bytes())
        .map_err(|source| io_error(path, source))?;
    debug!("saved {} records to {}", items.len(), path.display());
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Maps each item's id to the item. With duplicate ids the later item wins.
pub fn index_by_id<T: Identified>(items: &[T]) -> HashMap<&str, &T> {
    items.iter().map(|i| (i.id(), i)).collect()
}

fn same_key(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Case-insensitive, whitespace-trimmed user name lookup. First match wins.
pub fn get_user_by_name<'a>(users: &'a [User], name: &str) -> Option<&'a User> {
    users.iter().find(|u| same_key(u.name(), name))
}

/// Case-insensitive, whitespace-trimmed project title lookup. First match wins.
pub fn get_project_by_title<'a>(projects: &'a [Project], title: &str) -> Option<&'a Project> {
    projects.iter().find(|p| same_key(p.title(), title))
}

pub fn get_project_by_title_mut<'a>(
    projects: &'a mut [Project],
    title: &str,
) -> Option<&'a mut Project> {
    projects.iter_mut().find(|p| same_key(p.title(), title))
}

/// The project owning the task with `task_id`, if any.
pub fn project_with_task<'a>(projects: &'a [Project], task_id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.find_task(task_id).is_some())
}

pub fn project_with_task_mut<'a>(
    projects: &'a mut [Project],
    task_id: &str,
) -> Option<&'a mut Project> {
    projects.iter_mut().find(|p| p.find_task(task_id).is_some())
}
