//! Mock data source with simulated latency.
//!
//! # Responsibility
//! - Stand in for the remote task API until a backend is configured.
//! - Hold the canonical seed set that every fetch returns.
//!
//! # Invariants
//! - `fetch_tasks` always returns the seed captured at construction; local
//!   mutations are never reflected back (fetch is a reset, not a merge).
//! - Writes echo their input after the configured delay and never fail.

use crate::config::LatencyConfig;
use crate::model::now_epoch_ms;
use crate::model::session::Session;
use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::{RepoResult, SessionGateway, TaskRepository};
use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Stable IDs for seed tasks so repeated fetches keep identity.
pub const SEED_TASK_IDS: [TaskId; 4] = [
    Uuid::from_u128(0x7a5c_0001_0000_4000_8000_0000_0000_0001),
    Uuid::from_u128(0x7a5c_0001_0000_4000_8000_0000_0000_0002),
    Uuid::from_u128(0x7a5c_0001_0000_4000_8000_0000_0000_0003),
    Uuid::from_u128(0x7a5c_0001_0000_4000_8000_0000_0000_0004),
];

/// Builds the canonical seed set relative to `now_ms`.
///
/// One completed task, two incomplete tasks due in the future and one
/// incomplete task without a due date.
pub fn seed_tasks(now_ms: i64) -> Vec<Task> {
    vec![
        Task::with_id(
            SEED_TASK_IDS[0],
            NewTask::new("Complete project setup")
                .description("Set up the mobile project with navigation")
                .completed(true)
                .due_date(now_ms - 5 * DAY_MS)
                .category("Work"),
            now_ms - 7 * DAY_MS,
        ),
        Task::with_id(
            SEED_TASK_IDS[1],
            NewTask::new("Design UI mockups")
                .description("Create mockups for home and task screens")
                .due_date(now_ms + 2 * DAY_MS)
                .category("Design"),
            now_ms - 3 * DAY_MS,
        ),
        Task::with_id(
            SEED_TASK_IDS[2],
            NewTask::new("Implement task list")
                .description("Build task list component with sorting")
                .due_date(now_ms + 5 * DAY_MS)
                .category("Development"),
            now_ms - DAY_MS,
        ),
        Task::with_id(
            SEED_TASK_IDS[3],
            NewTask::new("Buy groceries")
                .description("Milk, eggs, bread, vegetables")
                .category("Personal"),
            now_ms,
        ),
    ]
}

/// Seeded in-process task source.
#[derive(Debug, Clone)]
pub struct MockTaskSource {
    seed: Vec<Task>,
    latency: LatencyConfig,
}

impl MockTaskSource {
    /// Seeds relative to the current wall clock.
    pub fn new(latency: LatencyConfig) -> Self {
        Self::with_seed(seed_tasks(now_epoch_ms()), latency)
    }

    pub fn with_seed(seed: Vec<Task>, latency: LatencyConfig) -> Self {
        Self { seed, latency }
    }

    /// The snapshot every fetch returns.
    pub fn seed(&self) -> &[Task] {
        &self.seed
    }
}

#[async_trait]
impl TaskRepository for MockTaskSource {
    async fn fetch_tasks(&self) -> RepoResult<Vec<Task>> {
        tokio::time::sleep(self.latency.fetch()).await;
        debug!(
            "event=mock_fetch module=repo status=ok count={}",
            self.seed.len()
        );
        Ok(self.seed.clone())
    }

    async fn create_task(&self, task: &Task) -> RepoResult<Task> {
        tokio::time::sleep(self.latency.mutate()).await;
        debug!("event=mock_create module=repo status=ok task_id={}", task.id);
        Ok(task.clone())
    }

    async fn update_task(&self, task: &Task) -> RepoResult<Task> {
        tokio::time::sleep(self.latency.mutate()).await;
        debug!("event=mock_update module=repo status=ok task_id={}", task.id);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        tokio::time::sleep(self.latency.mutate()).await;
        debug!("event=mock_delete module=repo status=ok task_id={id}");
        Ok(())
    }
}

/// Sign-out stand-in: waits, then reports success.
#[derive(Debug, Clone, Default)]
pub struct MockSessionGateway {
    latency: LatencyConfig,
}

impl MockSessionGateway {
    pub fn new(latency: LatencyConfig) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SessionGateway for MockSessionGateway {
    async fn sign_out(&self, session: Option<&Session>) -> RepoResult<()> {
        tokio::time::sleep(self.latency.sign_out()).await;
        debug!(
            "event=mock_sign_out module=repo status=ok had_session={}",
            session.is_some()
        );
        Ok(())
    }
}
