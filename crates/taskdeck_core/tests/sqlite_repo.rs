use rusqlite::Connection;
use std::sync::Arc;
use taskdeck_core::db::migrations::latest_version;
use taskdeck_core::db::{open_db, open_db_in_memory, DbError};
use taskdeck_core::{
    seed_tasks, MockSessionGateway, NewTask, RepoError, Session, SqliteTaskRepository,
    StoreError, Task, TaskPatch, TaskRepository, TaskStore, SEED_TASK_IDS,
};
use uuid::Uuid;

const NOW: i64 = 1_760_000_000_000;

fn memory_repo() -> SqliteTaskRepository {
    SqliteTaskRepository::new(open_db_in_memory().unwrap())
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
}

#[test]
fn open_db_creates_parent_directory_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("taskdeck.db");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn opening_database_with_newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn create_then_fetch_returns_most_recent_first() {
    let repo = memory_repo();
    let older = Task::from_new(NewTask::new("older").category("Work"), 1_000);
    let newer = Task::from_new(NewTask::new("newer").due_date(9_000), 2_000);

    repo.create_task(&older).await.unwrap();
    repo.create_task(&newer).await.unwrap();

    let fetched = repo.fetch_tasks().await.unwrap();
    assert_eq!(fetched, vec![newer, older]);
}

#[tokio::test]
async fn update_round_trips_optional_fields() {
    let repo = memory_repo();
    let mut task = Task::from_new(NewTask::new("draft").description("body"), 1_000);
    repo.create_task(&task).await.unwrap();

    task.apply_patch(&TaskPatch {
        description: Some(None),
        completed: Some(true),
        due_date: Some(Some(5_000)),
        ..TaskPatch::default()
    });
    let stored = repo.update_task(&task).await.unwrap();

    assert_eq!(stored, task);
    assert_eq!(stored.description, None);
    assert_eq!(stored.due_date, Some(5_000));
}

#[tokio::test]
async fn update_and_delete_unknown_id_return_not_found() {
    let repo = memory_repo();
    let ghost = Task::from_new(NewTask::new("ghost"), 0);

    let err = repo.update_task(&ghost).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));

    let err = repo.delete_task(ghost.id).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn malformed_row_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (id, title, completed, created_at) VALUES ('not-a-uuid', 't', 0, 1);",
        [],
    )
    .unwrap();
    let repo = SqliteTaskRepository::new(conn);

    let err = repo.fetch_tasks().await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("not-a-uuid")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn writes_from_parallel_tasks_share_one_connection() {
    let repo = Arc::new(memory_repo());
    let mut handles = Vec::new();
    for index in 0..8_i64 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let task = Task::from_new(NewTask::new(format!("task {index}")), index);
            repo.create_task(&task).await.unwrap();
            repo.update_task(&task).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let fetched = repo.fetch_tasks().await.unwrap();
    assert_eq!(fetched.len(), 8);
    assert_eq!(fetched[0].title, "task 7");
}

#[test]
fn seed_if_empty_only_seeds_once() {
    let repo = memory_repo();
    assert_eq!(repo.seed_if_empty(&seed_tasks(NOW)).unwrap(), 4);
    assert_eq!(repo.seed_if_empty(&seed_tasks(NOW)).unwrap(), 0);
}

#[tokio::test]
async fn store_over_sqlite_keeps_local_writes_across_fetch() {
    let repo = memory_repo();
    repo.seed_if_empty(&seed_tasks(NOW)).unwrap();
    let store = TaskStore::new(
        repo,
        MockSessionGateway::default(),
        Some(Session::demo()),
        Vec::new(),
    );

    assert_eq!(store.fetch_tasks().await.unwrap(), 4);
    let created = store.add_task(NewTask::new("persisted")).await.unwrap();
    store.delete_task(SEED_TASK_IDS[0]).await.unwrap();

    assert_eq!(store.fetch_tasks().await.unwrap(), 4);
    let tasks = store.tasks();
    assert_eq!(tasks[0].id, created.id);
    assert!(tasks.iter().all(|task| task.id != SEED_TASK_IDS[0]));

    let missing = Uuid::new_v4();
    let err = store.delete_task(missing).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
