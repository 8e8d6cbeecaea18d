//! Core application logic for TaskDeck.
//! This crate is the single source of truth for task and session state.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, LatencyConfig, LoggingConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::now_epoch_ms;
pub use model::session::Session;
pub use model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
pub use repo::mock_repo::{seed_tasks, MockSessionGateway, MockTaskSource, SEED_TASK_IDS};
pub use repo::sqlite_repo::SqliteTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, SessionGateway, TaskRepository};
pub use service::stats::TaskStats;
pub use service::task_store::{
    MockTaskStore, StoreError, StoreResult, StoreSnapshot, StoreWatcher, TaskStore,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
