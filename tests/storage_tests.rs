use std::fs;

use project_tracker::error::StorageError;
use project_tracker::models::{Project, Task, TaskStatus, User};
use project_tracker::storage::{
    get_project_by_title, get_user_by_name, index_by_id, project_with_task, Store,
};
use tempfile::TempDir;

fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("data"));
    (dir, store)
}

fn project_with_tasks(title: &str, user_id: &str, count: usize) -> Project {
    let mut p = Project::new(title, user_id).unwrap();
    for i in 0..count {
        p.add_task(Task::new(&format!("{} task {}", title, i)).unwrap());
    }
    p
}

#[test]
fn test_missing_files_are_created_empty() {
    let (_dir, store) = temp_store();
    assert!(!store.users_path().exists());

    assert!(store.load_users().unwrap().is_empty());
    assert!(store.load_projects().unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.users_path()).unwrap(), "[]");
    assert_eq!(fs::read_to_string(store.projects_path()).unwrap(), "[]");
}

#[test]
fn test_save_and_load_users() {
    let (_dir, store) = temp_store();
    let users = vec![
        User::new("Alex", Some("alex@example.com")).unwrap(),
        User::new("Bri", Some("bri@example.com")).unwrap(),
    ];
    store.save_users(&users).unwrap();

    let loaded = store.load_users().unwrap();
    assert_eq!(loaded, users);
    assert_eq!(loaded[0].email(), Some("alex@example.com"));
    assert_eq!(loaded[1].email(), Some("bri@example.com"));
}

#[test]
fn test_save_and_load_projects() {
    let (_dir, store) = temp_store();
    let p1 = project_with_tasks("CLI Tool", "u1", 2);
    let p2 = project_with_tasks("Web App", "u1", 0);
    store.save_projects(&[p1.clone(), p2.clone()]).unwrap();

    let loaded = store.load_projects().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id(), p1.id());
    assert_eq!(loaded[1].id(), p2.id());
    assert_eq!(loaded[0].tasks().len(), 2);
    assert_eq!(loaded[1].tasks().len(), 0);
    assert_eq!(loaded, vec![p1, p2]);
}

#[test]
fn test_saved_file_is_pretty_json_array() {
    let (_dir, store) = temp_store();
    let mut p = project_with_tasks("CLI Tool", "u1", 1);
    p.set_due_date(Some("2024-01-15T10:00:00")).unwrap();
    store.save_projects(&[p]).unwrap();

    let text = fs::read_to_string(store.projects_path()).unwrap();
    assert!(text.starts_with("[\n  {"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let first = &value[0];
    assert_eq!(first["title"], "CLI Tool");
    assert_eq!(first["due_date"], "2024-01-15");
    assert_eq!(first["tasks"][0]["status"], "todo");
    assert!(first["tasks"][0]["assigned_to"].is_null());
}

#[test]
fn test_save_overwrites_previous_contents() {
    let (_dir, store) = temp_store();
    store
        .save_users(&[User::new("Alex", None).unwrap(), User::new("Bri", None).unwrap()])
        .unwrap();
    store.save_users(&[User::new("Cam", None).unwrap()]).unwrap();

    let loaded = store.load_users().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name(), "Cam");
}

#[test]
fn test_malformed_file_loads_empty() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.users_path().parent().unwrap()).unwrap();
    fs::write(store.users_path(), "not json").unwrap();
    fs::write(store.projects_path(), "[{\"title\": ").unwrap();

    assert!(store.load_users().unwrap().is_empty());
    assert!(store.load_projects().unwrap().is_empty());
}

#[test]
fn test_invalid_record_propagates_validation_error() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.users_path().parent().unwrap()).unwrap();
    fs::write(
        store.users_path(),
        r#"[{"id": "u1", "name": "Alex", "email": "not-an-email", "created_at": "2024-01-01T00:00:00+00:00"}]"#,
    )
    .unwrap();

    assert!(matches!(store.load_users(), Err(StorageError::Validation(_))));
}

#[test]
fn test_non_array_document_is_an_error() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.projects_path().parent().unwrap()).unwrap();
    fs::write(store.projects_path(), r#"{"title": "CLI Tool"}"#).unwrap();

    assert!(matches!(store.load_projects(), Err(StorageError::NotAnArray { .. })));
}

#[test]
fn test_wrongly_typed_record_is_an_error() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.users_path().parent().unwrap()).unwrap();
    fs::write(store.users_path(), r#"[{"name": "Alex"}, {"name": 42}]"#).unwrap();

    match store.load_users() {
        Err(StorageError::Record { index, .. }) => assert_eq!(index, 1),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_stored_identity_is_kept() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.projects_path().parent().unwrap()).unwrap();
    fs::write(
        store.projects_path(),
        r#"[{
            "id": "p-1",
            "title": "Legacy",
            "user_id": "u-1",
            "description": null,
            "due_date": "2023-05-01T08:00:00",
            "tasks": [{"id": "t-1", "title": "Old", "status": "in_progress", "created_at": "2023-01-01T00:00:00+00:00"}],
            "created_at": "2023-01-01T00:00:00+00:00"
        }]"#,
    )
    .unwrap();

    let projects = store.load_projects().unwrap();
    let p = &projects[0];
    assert_eq!(p.id(), "p-1");
    assert_eq!(p.created_at(), "2023-01-01T00:00:00+00:00");
    assert_eq!(p.description(), "");
    assert_eq!(p.due_date().unwrap().to_string(), "2023-05-01");
    assert_eq!(p.tasks()[0].id(), "t-1");
    assert_eq!(p.tasks()[0].status(), TaskStatus::InProgress);
    assert_eq!(p.tasks()[0].assigned_to(), None);
}

#[test]
fn test_blank_created_at_survives_save() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.users_path().parent().unwrap()).unwrap();
    fs::write(
        store.users_path(),
        r#"[{"id": "u1", "name": "Alex", "email": null, "created_at": ""}]"#,
    )
    .unwrap();

    let users = store.load_users().unwrap();
    assert_eq!(users[0].created_at(), "");
    store.save_users(&users).unwrap();

    let reloaded = store.load_users().unwrap();
    assert_eq!(reloaded[0].id(), "u1");
    assert_eq!(reloaded[0].created_at(), "");
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.users_path()).unwrap()).unwrap();
    assert_eq!(raw[0]["created_at"], "");
}

#[test]
fn test_lookup_helpers() {
    let (_dir, store) = temp_store();
    let users = vec![
        User::new("Alex", Some("alex@example.com")).unwrap(),
        User::new("Bri", Some("bri@example.com")).unwrap(),
    ];
    store.save_users(&users).unwrap();
    let projects = vec![
        Project::new("Alpha", users[0].id()).unwrap(),
        Project::new("Bravo", users[1].id()).unwrap(),
    ];
    store.save_projects(&projects).unwrap();

    let loaded_users = store.load_users().unwrap();
    let u = get_user_by_name(&loaded_users, "ALEX").unwrap();
    assert_eq!(u.email(), Some("alex@example.com"));
    assert!(get_user_by_name(&loaded_users, "  bri ").is_some());
    assert!(get_user_by_name(&loaded_users, "Cam").is_none());
    assert!(get_user_by_name(&loaded_users, "").is_none());

    let loaded_projects = store.load_projects().unwrap();
    let p = get_project_by_title(&loaded_projects, "bravo").unwrap();
    assert_eq!(p.title(), "Bravo");
    assert!(get_project_by_title(&loaded_projects, "Charlie").is_none());

    let idx = index_by_id(&loaded_projects);
    assert!(idx.contains_key(projects[0].id()));
    assert!(idx.contains_key(projects[1].id()));
}

#[test]
fn test_lookup_returns_first_match() {
    let first = User::new("Alex", Some("first@example.com")).unwrap();
    let second = User::new("alex", Some("second@example.com")).unwrap();
    let users = vec![first.clone(), second];
    assert_eq!(get_user_by_name(&users, "ALEX").unwrap().id(), first.id());
}

#[test]
fn test_index_by_id_later_duplicate_wins() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.users_path().parent().unwrap()).unwrap();
    fs::write(
        store.users_path(),
        r#"[{"id": "dup", "name": "First"}, {"id": "dup", "name": "Second"}]"#,
    )
    .unwrap();

    let users = store.load_users().unwrap();
    let idx = index_by_id(&users);
    assert_eq!(idx.len(), 1);
    assert_eq!(idx["dup"].name(), "Second");
}

#[test]
fn test_project_with_task() {
    let p1 = project_with_tasks("One", "u", 1);
    let p2 = project_with_tasks("Two", "u", 2);
    let target = p2.tasks()[1].id().to_string();
    let projects = vec![p1, p2];

    assert_eq!(project_with_task(&projects, &target).unwrap().title(), "Two");
    assert!(project_with_task(&projects, "nope").is_none());
}
