//! Repository contracts for tasks and sessions.

use crate::db::DbError;
use crate::model::session::Session;
use crate::model::task::{Task, TaskId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Data source failure.
#[derive(Debug)]
pub enum RepoError {
    NotFound(TaskId),
    Db(DbError),
    InvalidData(String),
    /// Source could not serve the request (offline, lock poisoned, ...).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored task data: {message}"),
            Self::Unavailable(message) => write!(f, "data source unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Async task storage capability.
///
/// `create_task`/`update_task` return the record as stored. Callers take
/// the stored values for the fields they wrote; fields they did not touch
/// keep whatever the local copy holds at completion.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Full snapshot in source order.
    async fn fetch_tasks(&self) -> RepoResult<Vec<Task>>;
    async fn create_task(&self, task: &Task) -> RepoResult<Task>;
    async fn update_task(&self, task: &Task) -> RepoResult<Task>;
    async fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// Async session capability. Only sign-out exists; there is no login path.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn sign_out(&self, session: Option<&Session>) -> RepoResult<()>;
}

#[async_trait]
impl<T: TaskRepository + ?Sized> TaskRepository for Arc<T> {
    async fn fetch_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).fetch_tasks().await
    }

    async fn create_task(&self, task: &Task) -> RepoResult<Task> {
        (**self).create_task(task).await
    }

    async fn update_task(&self, task: &Task) -> RepoResult<Task> {
        (**self).update_task(task).await
    }

    async fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        (**self).delete_task(id).await
    }
}

#[async_trait]
impl<T: SessionGateway + ?Sized> SessionGateway for Arc<T> {
    async fn sign_out(&self, session: Option<&Session>) -> RepoResult<()> {
        (**self).sign_out(session).await
    }
}
