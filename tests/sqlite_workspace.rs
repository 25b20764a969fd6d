use planboard::models::{DARK_MODE_KEY, NOTES_KEY, TASKS_KEY};
use planboard::{Priority, SqliteStore, Store, Workspace};
use std::rc::Rc;

fn open(path: &std::path::Path, namespace: &str) -> Workspace {
    Workspace::open(Rc::new(SqliteStore::open(path, namespace).unwrap()))
}

#[test]
fn data_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("board.db");

    let id = {
        let mut workspace = open(&path, "default");
        let id = workspace.tasks.add("Write report", Priority::High).unwrap().unwrap();
        workspace.tasks.add("Review", Priority::Low).unwrap();
        workspace.tasks.move_task(1, Some(0)).unwrap();
        workspace.notes.add("remember milk").unwrap();
        id
    };

    let workspace = open(&path, "default");
    let texts: Vec<&str> = workspace.tasks.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Review", "Write report"]);
    assert_eq!(workspace.tasks.tasks()[1].id, id);
    assert_eq!(workspace.notes.notes().len(), 1);

    let keys = workspace.store().keys().unwrap();
    assert!(keys.contains(&TASKS_KEY.to_string()));
    assert!(keys.contains(&NOTES_KEY.to_string()));
}

#[test]
fn namespaces_keep_boards_apart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");

    let mut work = open(&path, "work");
    work.tasks.add("quarterly plan", Priority::High).unwrap();

    let home = open(&path, "home");
    assert!(home.tasks.tasks().is_empty());
    assert_eq!(open(&path, "work").tasks.tasks().len(), 1);
}

#[test]
fn dark_mode_defaults_off_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");

    let workspace = open(&path, "default");
    assert!(!workspace.dark_mode());
    assert!(workspace.toggle_dark_mode().unwrap());
    assert_eq!(workspace.store().get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));

    let reopened = open(&path, "default");
    assert!(reopened.dark_mode());
    reopened.store().set(DARK_MODE_KEY, "\"maybe\"").unwrap();
    assert!(!reopened.dark_mode());
}

#[test]
fn foreign_value_in_sqlite_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");
    {
        let store = SqliteStore::open(&path, "default").unwrap();
        store.set(TASKS_KEY, "{\"tasks\": []}").unwrap();
    }
    let mut workspace = open(&path, "default");
    assert!(workspace.tasks.tasks().is_empty());
    workspace.tasks.add("recovered", Priority::Medium).unwrap();
    assert_eq!(open(&path, "default").tasks.tasks().len(), 1);
}
