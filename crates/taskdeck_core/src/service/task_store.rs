//! Shared application state container.
//!
//! # Responsibility
//! - Own the session and the task collection for one app instance.
//! - Run every mutation through the data source and record the outcome
//!   (busy flag, last-error) in observable state.
//!
//! # Invariants
//! - Only `TaskStore` mutates its state; readers get clones or watch updates.
//! - Every operation leaves `busy()` cleared on exit, whatever the outcome,
//!   including when the returned future is dropped mid-flight.
//! - Success clears `last_error`; a data source failure sets it and leaves
//!   state untouched. Unknown IDs are reported as `StoreError::NotFound`
//!   without counting as a failure.
//! - New tasks are prepended (most recent first).
//! - Operations never panic and never hold state borrowed across an await;
//!   concurrent operations apply their effects in completion order.

use crate::config::LatencyConfig;
use crate::model::now_epoch_ms;
use crate::model::session::Session;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::repo::mock_repo::{MockSessionGateway, MockTaskSource};
use crate::repo::task_repo::{RepoError, SessionGateway, TaskRepository};
use crate::service::stats::TaskStats;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use tokio::sync::watch;

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a store operation that did not complete.
#[derive(Debug)]
pub enum StoreError {
    /// No task with this ID is in the collection.
    NotFound(TaskId),
    /// The data source failed.
    Source(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Source(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Source(other),
        }
    }
}

/// Point-in-time copy of the store state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub session: Option<Session>,
    /// Ordered most recent first after local adds; fetch keeps source order.
    pub tasks: Vec<Task>,
    /// Number of operations currently awaiting the data source.
    pub in_flight: usize,
    pub last_error: Option<String>,
}

impl StoreSnapshot {
    pub fn busy(&self) -> bool {
        self.in_flight > 0
    }
}

/// Receiver that yields a fresh snapshot after every state change.
pub type StoreWatcher = watch::Receiver<StoreSnapshot>;

/// Store wired to the mock data source.
pub type MockTaskStore = TaskStore<MockTaskSource, MockSessionGateway>;

/// Single source of truth for session and task data.
///
/// Built once at the composition root and shared by reference (typically
/// behind an `Arc`); all operations take `&self`.
pub struct TaskStore<R: TaskRepository, G: SessionGateway> {
    repo: R,
    gateway: G,
    state: watch::Sender<StoreSnapshot>,
}

impl MockTaskStore {
    /// Demo session plus the mock source's seed, as at app startup.
    pub fn with_mock_data(latency: LatencyConfig) -> Self {
        let source = MockTaskSource::new(latency);
        let tasks = source.seed().to_vec();
        Self::new(
            source,
            MockSessionGateway::new(latency),
            Some(Session::demo()),
            tasks,
        )
    }
}

impl<R: TaskRepository, G: SessionGateway> TaskStore<R, G> {
    pub fn new(repo: R, gateway: G, session: Option<Session>, tasks: Vec<Task>) -> Self {
        let (state, _initial_rx) = watch::channel(StoreSnapshot {
            session,
            tasks,
            in_flight: 0,
            last_error: None,
        });
        Self {
            repo,
            gateway,
            state,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StoreWatcher {
        self.state.subscribe()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    /// Advisory in-flight indicator; not a lock.
    pub fn busy(&self) -> bool {
        self.state.borrow().busy()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    /// Stats over the current collection at the current time.
    pub fn stats(&self) -> TaskStats {
        self.stats_at(now_epoch_ms())
    }

    pub fn stats_at(&self, now_ms: i64) -> TaskStats {
        TaskStats::compute(&self.state.borrow().tasks, now_ms)
    }

    /// Ends the session and drops all tasks.
    ///
    /// On failure the session and tasks are left as they were.
    pub async fn sign_out(&self) -> StoreResult<()> {
        let _busy = self.enter();
        let started_at = Instant::now();
        let session = self.session();

        let result = match self.gateway.sign_out(session.as_ref()).await {
            Ok(()) => {
                self.commit(|state| {
                    state.session = None;
                    state.tasks.clear();
                });
                Ok(())
            }
            Err(err) => Err(err.into()),
        };
        self.settle("sign_out", "logout failed", started_at, result)
    }

    /// Replaces the collection with the data source snapshot.
    ///
    /// Not gated on a session: this works after sign-out too.
    pub async fn fetch_tasks(&self) -> StoreResult<usize> {
        let _busy = self.enter();
        let started_at = Instant::now();

        let result = match self.repo.fetch_tasks().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.commit(|state| state.tasks = tasks);
                Ok(count)
            }
            Err(err) => Err(err.into()),
        };
        self.settle("task_fetch", "failed to fetch tasks", started_at, result)
    }

    /// Creates a task and prepends it to the collection.
    ///
    /// ID and creation time are assigned here. Title emptiness is not
    /// checked; callers validate with `NewTask::validate()` first.
    pub async fn add_task(&self, input: NewTask) -> StoreResult<Task> {
        let _busy = self.enter();
        let started_at = Instant::now();
        let task = Task::from_new(input, now_epoch_ms());

        let result = match self.repo.create_task(&task).await {
            Ok(stored) => {
                self.commit(|state| state.tasks.insert(0, stored.clone()));
                Ok(stored)
            }
            Err(err) => Err(err.into()),
        };
        self.settle("task_add", "failed to add task", started_at, result)
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// The written fields are re-applied to the latest local copy, with the
    /// values the data source stored, when it answers. A concurrent update to
    /// other fields is not lost.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let _busy = self.enter();
        let started_at = Instant::now();
        let result = self.update_inner(id, patch).await;
        self.settle("task_update", "failed to update task", started_at, result)
    }

    /// Flips the completion flag of the task with `id`.
    pub async fn toggle_complete(&self, id: TaskId) -> StoreResult<Task> {
        let completed = self.task(id).map_or(true, |task| !task.completed);
        self.update_task(id, TaskPatch::completed(completed)).await
    }

    /// Removes the task with `id`. A repeated delete reports `NotFound` and
    /// leaves the collection as the first call did.
    pub async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        let _busy = self.enter();
        let started_at = Instant::now();
        let result = self.delete_inner(id).await;
        self.settle("task_delete", "failed to delete task", started_at, result)
    }

    async fn update_inner(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let mut merged = self.task(id).ok_or(StoreError::NotFound(id))?;
        merged.apply_patch(&patch);
        let stored = self.repo.update_task(&merged).await?;
        let reconciled = patch.reconciled_with(&stored);

        let mut updated = None;
        self.commit(|state| {
            if let Some(slot) = state.tasks.iter_mut().find(|task| task.id == id) {
                slot.apply_patch(&reconciled);
                updated = Some(slot.clone());
            }
        });
        updated.ok_or(StoreError::NotFound(id))
    }

    async fn delete_inner(&self, id: TaskId) -> StoreResult<()> {
        if self.task(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.repo.delete_task(id).await?;
        self.commit(|state| state.tasks.retain(|task| task.id != id));
        Ok(())
    }

    fn enter(&self) -> BusyGuard<'_> {
        self.state.send_modify(|state| state.in_flight += 1);
        BusyGuard { state: &self.state }
    }

    /// Applies a successful mutation and clears `last_error` in one update.
    fn commit(&self, mutate: impl FnOnce(&mut StoreSnapshot)) {
        self.state.send_modify(|state| {
            mutate(state);
            state.last_error = None;
        });
    }

    fn settle<T>(
        &self,
        event: &str,
        failure: &str,
        started_at: Instant,
        result: StoreResult<T>,
    ) -> StoreResult<T> {
        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => info!("event={event} module=store status=ok duration_ms={duration_ms}"),
            Err(StoreError::NotFound(id)) => {
                warn!(
                    "event={event} module=store status=not_found duration_ms={duration_ms} task_id={id}"
                );
                self.state.send_modify(|state| state.last_error = None);
            }
            Err(err) => {
                error!(
                    "event={event} module=store status=error duration_ms={duration_ms} error={err}"
                );
                let message = format!("{failure}: {err}");
                self.state
                    .send_modify(|state| state.last_error = Some(message));
            }
        }
        result
    }
}

/// Decrements the in-flight count when an operation ends or is dropped.
struct BusyGuard<'a> {
    state: &'a watch::Sender<StoreSnapshot>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|state| state.in_flight = state.in_flight.saturating_sub(1));
    }
}
