use project_tracker::commands::*;
use project_tracker::config::{Config, DATA_DIR_ENV};
use project_tracker::error::{CommandError, ValidationError};
use project_tracker::models::TaskStatus;
use project_tracker::storage::Store;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn with_test_db<F>(f: F)
where
    F: FnOnce(&Store),
{
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path());
    f(&store);
}

fn seed_project(store: &Store) -> String {
    cmd_add_user(store, "Alex", Some("alex@example.com"), true).unwrap();
    cmd_add_project(store, "Alex", "CLI Tool", None, None, true).unwrap();
    cmd_add_task(store, "CLI Tool", "Implement add-task", None, true).unwrap();
    store.load_projects().unwrap()[0].tasks()[0].id().to_string()
}

#[test]
fn test_add_user_project_task_complete() {
    with_test_db(|store| {
        cmd_add_user(store, "Alex", Some("alex@example.com"), true).unwrap();
        let users = store.load_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name(), "Alex");
        assert_eq!(users[0].email(), Some("alex@example.com"));

        cmd_add_project(store, "Alex", "CLI Tool", None, None, true).unwrap();
        let projects = store.load_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title(), "CLI Tool");
        assert_eq!(projects[0].user_id(), users[0].id());
        assert!(projects[0].tasks().is_empty());

        cmd_add_task(store, "cli tool", "Implement add-task", None, true).unwrap();
        let projects = store.load_projects().unwrap();
        assert_eq!(projects[0].tasks().len(), 1);
        let task = &projects[0].tasks()[0];
        assert_eq!(task.title(), "Implement add-task");
        assert_eq!(task.status(), TaskStatus::Todo);

        cmd_complete_task(store, task.id(), true).unwrap();
        let projects = store.load_projects().unwrap();
        assert_eq!(projects[0].tasks()[0].status(), TaskStatus::Done);
    });
}

#[test]
fn test_list_commands_with_empty_store() {
    with_test_db(|store| {
        cmd_list_users(store).unwrap();
        cmd_list_projects(store, None).unwrap();
        cmd_list_tasks(store, None).unwrap();
    });
}

#[test]
fn test_list_commands_with_data() {
    with_test_db(|store| {
        seed_project(store);
        cmd_list_users(store).unwrap();
        cmd_list_projects(store, Some("alex")).unwrap();
        cmd_list_tasks(store, Some("CLI Tool")).unwrap();
        cmd_list_tasks(store, None).unwrap();
    });
}

#[test]
fn test_duplicate_user_is_not_added() {
    with_test_db(|store| {
        let added = cmd_add_user(store, "Alex", Some("alex@example.com"), true).unwrap();
        assert_eq!(added, Added::Created);

        let added = cmd_add_user(store, "ALEX", None, true).unwrap();
        assert_eq!(added, Added::Skipped("User with name 'ALEX' already exists.".to_string()));

        let added = cmd_add_user(store, "Other", Some("Alex@Example.com"), true).unwrap();
        assert_eq!(added, Added::Skipped("User with email 'alex@example.com' already exists.".to_string()));

        assert_eq!(store.load_users().unwrap().len(), 1);
    });
}

#[test]
fn test_invalid_input_is_rejected() {
    with_test_db(|store| {
        let err = cmd_add_user(store, "Nope", Some("not-an-email"), true).unwrap_err();
        assert!(matches!(err, CommandError::Validation(ValidationError::InvalidEmail(_))));
        assert!(cmd_add_user(store, "   ", None, true).is_err());
        assert!(store.load_users().unwrap().is_empty());

        cmd_add_user(store, "Alex", None, true).unwrap();
        let err = cmd_add_project(store, "Alex", "Dated", None, Some("next week"), true).unwrap_err();
        assert!(matches!(err, CommandError::Validation(ValidationError::InvalidDate(_))));
        assert!(store.load_projects().unwrap().is_empty());
    });
}

#[test]
fn test_missing_references_are_not_found() {
    with_test_db(|store| {
        let err = cmd_add_project(store, "Ghost", "CLI Tool", None, None, true).unwrap_err();
        assert!(matches!(err, CommandError::NotFound { kind: "user", .. }));

        let err = cmd_add_task(store, "Nowhere", "Task", None, true).unwrap_err();
        assert!(matches!(err, CommandError::NotFound { kind: "project", .. }));

        let err = cmd_complete_task(store, "no-such-id", true).unwrap_err();
        assert!(matches!(err, CommandError::NotFound { kind: "task id", .. }));

        assert!(cmd_list_projects(store, Some("Ghost")).is_err());
        assert!(cmd_list_tasks(store, Some("Nowhere")).is_err());
    });
}

#[test]
fn test_project_with_description_and_due_date() {
    with_test_db(|store| {
        cmd_add_user(store, "Alex", None, true).unwrap();
        cmd_add_project(store, "Alex", "Launch", Some("Ship it"), Some("2025-06-30T09:00:00"), true).unwrap();
        let projects = store.load_projects().unwrap();
        assert_eq!(projects[0].description(), "Ship it");
        assert_eq!(projects[0].due_date().unwrap().to_string(), "2025-06-30");
    });
}

#[test]
fn test_duplicate_project_title_still_created() {
    with_test_db(|store| {
        cmd_add_user(store, "Alex", None, true).unwrap();
        cmd_add_project(store, "Alex", "CLI Tool", None, None, true).unwrap();
        cmd_add_project(store, "Alex", "cli tool", None, None, true).unwrap();
        assert_eq!(store.load_projects().unwrap().len(), 2);
    });
}

#[test]
fn test_complete_twice_is_a_no_op() {
    with_test_db(|store| {
        let id = seed_project(store);
        cmd_complete_task(store, &id, true).unwrap();
        cmd_complete_task(store, &id, true).unwrap();
        let projects = store.load_projects().unwrap();
        assert_eq!(projects[0].tasks()[0].status(), TaskStatus::Done);
    });
}

#[test]
fn test_reopen_and_set_status() {
    with_test_db(|store| {
        let id = seed_project(store);

        cmd_set_status(store, &id, "In_Progress", true).unwrap();
        assert_eq!(store.load_projects().unwrap()[0].tasks()[0].status(), TaskStatus::InProgress);

        cmd_complete_task(store, &format!("  {}  ", id), true).unwrap();
        cmd_reopen_task(store, &id, true).unwrap();
        let task_status = store.load_projects().unwrap()[0].tasks()[0].status();
        assert_eq!(task_status, TaskStatus::Todo);

        let err = cmd_set_status(store, &id, "blocked", true).unwrap_err();
        assert!(matches!(err, CommandError::Validation(ValidationError::InvalidStatus(_))));
    });
}

#[test]
fn test_assign_and_unassign_task() {
    with_test_db(|store| {
        let id = seed_project(store);
        let alex_id = store.load_users().unwrap()[0].id().to_string();

        cmd_assign_task(store, &id, Some("alex"), true).unwrap();
        assert_eq!(store.load_projects().unwrap()[0].tasks()[0].assigned_to(), Some(alex_id.as_str()));

        cmd_assign_task(store, &id, None, true).unwrap();
        assert_eq!(store.load_projects().unwrap()[0].tasks()[0].assigned_to(), None);

        assert!(cmd_assign_task(store, &id, Some("Ghost"), true).is_err());
    });
}

#[test]
fn test_add_task_with_assignee() {
    with_test_db(|store| {
        seed_project(store);
        cmd_add_task(store, "CLI Tool", "Write tests", Some("Alex"), true).unwrap();
        let projects = store.load_projects().unwrap();
        let tasks = projects[0].tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title(), "Write tests");
        assert_eq!(tasks[1].assigned_to(), Some(store.load_users().unwrap()[0].id()));

        assert!(cmd_add_task(store, "CLI Tool", "Orphan", Some("Ghost"), true).is_err());
        assert_eq!(store.load_projects().unwrap()[0].tasks().len(), 2);
    });
}

#[test]
fn test_data_dir_from_env() {
    let dir = TempDir::new().unwrap();

    env::set_var(DATA_DIR_ENV, dir.path());
    let cfg = Config::resolve(None);
    assert_eq!(cfg.data_dir, dir.path());

    let explicit = PathBuf::from("/explicit/dir");
    assert_eq!(Config::resolve(Some(explicit.clone())).data_dir, explicit);
    env::remove_var(DATA_DIR_ENV);

    let store = Store::new(&Config::new(dir.path()));
    cmd_add_user(&store, "Alex", None, true).unwrap();
    assert!(dir.path().join("users.json").exists());
}
