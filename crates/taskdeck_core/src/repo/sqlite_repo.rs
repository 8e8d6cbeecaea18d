//! SQLite-backed task repository.
//!
//! # Responsibility
//! - Persist tasks locally behind the same contract as the mock source.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `fetch_tasks` orders by `created_at DESC, id ASC` (most recent first).
//! - Update/delete of an unknown ID returns `RepoError::NotFound`.
//! - Read paths reject malformed rows instead of masking them.
//! - Statements are short single-row or small-table queries and run inline on
//!   the calling task; no call blocks on anything but the connection mutex.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at,
    due_date,
    category
FROM tasks";

/// Task repository over one SQLite connection.
///
/// The connection sits behind a mutex; statements are short and never held
/// across an await point.
pub struct SqliteTaskRepository {
    conn: Mutex<Connection>,
}

impl SqliteTaskRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Inserts `tasks` when the table is empty. Returns the inserted count.
    pub fn seed_if_empty(&self, tasks: &[Task]) -> RepoResult<usize> {
        let mut conn = self.lock()?;
        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let tx = conn.transaction()?;
        for task in tasks {
            insert_task(&tx, task)?;
        }
        tx.commit()?;
        Ok(tasks.len())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn fetch_tasks(&self) -> RepoResult<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    async fn create_task(&self, task: &Task) -> RepoResult<Task> {
        let conn = self.lock()?;
        insert_task(&conn, task)?;
        Ok(task.clone())
    }

    async fn update_task(&self, task: &Task) -> RepoResult<Task> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                completed = ?3,
                due_date = ?4,
                category = ?5
             WHERE id = ?6;",
            params![
                task.title.as_str(),
                task.description.as_deref(),
                bool_to_int(task.completed),
                task.due_date,
                task.category.as_deref(),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([task.id.to_string()])?;
        let updated = match rows.next()? {
            Some(row) => parse_task_row(row)?,
            None => return Err(RepoError::NotFound(task.id)),
        };
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn insert_task(conn: &Connection, task: &Task) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO tasks (
            id,
            title,
            description,
            completed,
            created_at,
            due_date,
            category
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            task.id.to_string(),
            task.title.as_str(),
            task.description.as_deref(),
            bool_to_int(task.completed),
            task.created_at,
            task.due_date,
            task.category.as_deref(),
        ],
    )?;
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in tasks.id")))?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
        created_at: row.get("created_at")?,
        due_date: row.get("due_date")?,
        category: row.get("category")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
