// Integration tests for list/task persistence and cascade behavior

use maeltodo::{Board, DEFAULT_LIST_NAME, EntityKind, Store, StoreError, Task};
use tempfile::TempDir;

fn task_ids(store: &Store, list_id: i64) -> Vec<i64> {
    store.list_tasks(list_id).unwrap().iter().map(|t| t.id).collect()
}

fn total_tasks(store: &Store) -> i64 {
    store
        .db()
        .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_created_lists_remain_until_deleted() {
    let mut store = Store::open_in_memory().unwrap();

    let ids: Vec<i64> = ["Home", "Work", "Groceries"]
        .iter()
        .map(|name| store.create_list(name).unwrap())
        .collect();

    let listed: Vec<i64> = store.list_all_lists().unwrap().iter().map(|l| l.id).collect();
    assert_eq!(listed, ids);

    store.delete_list(ids[1]).unwrap();
    let listed: Vec<i64> = store.list_all_lists().unwrap().iter().map(|l| l.id).collect();
    assert_eq!(listed, vec![ids[0], ids[2]]);
}

#[test]
fn test_delete_list_removes_only_its_tasks() {
    let mut store = Store::open_in_memory().unwrap();
    let a = store.create_list("A").unwrap();
    let b = store.create_list("B").unwrap();

    let a1 = store.create_task(a, "a1").unwrap();
    let a2 = store.create_task(a, "a2").unwrap();
    let b1 = store.create_task(b, "b1").unwrap();

    store.delete_list(a).unwrap();

    assert!(store.get_list(a).unwrap().is_none());
    assert!(store.list_tasks(a).unwrap().is_empty());
    assert!(store.get_task(a1).unwrap().is_none());
    assert!(store.get_task(a2).unwrap().is_none());
    assert_eq!(task_ids(&store, b), vec![b1]);
    assert_eq!(total_tasks(&store), 1);
}

#[test]
fn test_update_task_round_trip() {
    let mut store = Store::open_in_memory().unwrap();
    let list = store.create_list("Groceries").unwrap();
    let id = store.create_task(list, "buy milk").unwrap();

    store.update_task(id, "buy oat milk", true).unwrap();

    assert_eq!(
        store.list_tasks(list).unwrap(),
        vec![Task {
            id,
            list_id: list,
            text: "buy oat milk".to_string(),
            is_checked: true,
        }]
    );
}

#[test]
fn test_rename_preserves_id_and_tasks() {
    let mut store = Store::open_in_memory().unwrap();
    let list = store.create_list("Before").unwrap();
    store.create_task(list, "one").unwrap();
    store.create_task(list, "two").unwrap();
    let before = store.list_tasks(list).unwrap();

    store.rename_list(list, "After").unwrap();

    let renamed = store.get_list(list).unwrap().unwrap();
    assert_eq!(renamed.id, list);
    assert_eq!(renamed.name, "After");
    assert_eq!(store.list_tasks(list).unwrap(), before);
}

#[test]
fn test_create_task_on_missing_list() {
    let mut store = Store::open_in_memory().unwrap();
    let list = store.create_list("Real").unwrap();
    store.create_task(list, "existing").unwrap();

    let err = store.create_task(list + 100, "orphan").unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            kind: EntityKind::List,
            ..
        }
    ));
    assert_eq!(total_tasks(&store), 1);
}

#[test]
fn test_delete_task_twice_leaves_state_intact() {
    let mut store = Store::open_in_memory().unwrap();
    let list = store.create_list("List").unwrap();
    let gone = store.create_task(list, "gone").unwrap();
    let kept = store.create_task(list, "kept").unwrap();

    store.delete_task(gone).unwrap();
    let err = store.delete_task(gone).unwrap_err();
    assert!(err.is_recoverable());

    assert_eq!(task_ids(&store, list), vec![kept]);
}

#[test]
fn test_state_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("maeltodo.db");

    let (list, task) = {
        let mut store = Store::open(&db_path).unwrap();
        let list = store.create_list("Persistent").unwrap();
        let task = store.create_task(list, "survive restart").unwrap();
        store.update_task(task, "survive restart", true).unwrap();
        (list, task)
    };

    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.get_list(list).unwrap().unwrap().name, "Persistent");
    let tasks = store.list_tasks(list).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task);
    assert!(tasks[0].is_checked);
}

#[test]
fn test_default_list_created_once_across_sessions() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("maeltodo.db");

    let first_id = {
        let board = Board::new(Store::open(&db_path).unwrap()).unwrap();
        assert_eq!(board.current().name, DEFAULT_LIST_NAME);
        board.current().id
    };

    let board = Board::new(Store::open(&db_path).unwrap()).unwrap();
    assert_eq!(board.current().id, first_id);
    assert_eq!(board.lists().unwrap().len(), 1);
}

#[test]
fn test_cascade_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("maeltodo.db");

    let list = {
        let mut store = Store::open(&db_path).unwrap();
        let list = store.create_list("Doomed").unwrap();
        store.create_task(list, "t").unwrap();
        list
    };

    // Foreign keys are per-connection in SQLite, so a reopened store must cascade too
    let mut store = Store::open(&db_path).unwrap();
    store.delete_list(list).unwrap();
    assert_eq!(total_tasks(&store), 0);
}
