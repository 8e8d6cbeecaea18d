//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task store to Dart through one opaque `TaskDeck` handle.
//! - Translate core results into flat, string-friendly envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The UI composition root creates one `TaskDeck` and shares it; there is
//!   no process-global store.
//! - Blank titles are rejected here, before the store is called.

use log::warn;
use std::sync::Arc;
use taskdeck_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, MockTaskStore, NewTask, StoreError, Task, TaskId, TaskPatch, TaskStats,
};
use uuid::Uuid;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Stable task ID in string form.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub due_date: Option<i64>,
    pub category: Option<String>,
}

/// Home screen stat cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total: u32,
    pub completed: u32,
    pub upcoming: u32,
    pub overdue: u32,
    pub progress_percent: u8,
}

/// Read-only copy of store state for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckState {
    pub username: Option<String>,
    pub email: Option<String>,
    pub tasks: Vec<TaskItem>,
    pub busy: bool,
    pub last_error: Option<String>,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Task created or updated by the operation, if any.
    pub task: Option<TaskItem>,
    /// Human-readable message for dialogs and diagnostics.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: Option<&Task>) -> Self {
        Self {
            ok: true,
            task: task.map(to_task_item),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
        }
    }
}

/// Handle to one app instance's task store.
#[flutter_rust_bridge::frb(opaque)]
pub struct TaskDeck {
    store: Arc<MockTaskStore>,
}

impl TaskDeck {
    /// Builds a store seeded with mock data, using env-configured latency.
    #[flutter_rust_bridge::frb(sync)]
    pub fn new() -> Self {
        Self::with_config(&AppConfig::from_env())
    }

    #[flutter_rust_bridge::frb(ignore)]
    pub fn with_config(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(MockTaskStore::with_mock_data(config.latency)),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn state(&self) -> DeckState {
        let snapshot = self.store.snapshot();
        DeckState {
            username: snapshot.session.as_ref().map(|s| s.username.clone()),
            email: snapshot.session.as_ref().map(|s| s.email.clone()),
            tasks: snapshot.tasks.iter().map(to_task_item).collect(),
            busy: snapshot.busy(),
            last_error: snapshot.last_error,
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn stats(&self) -> StatsView {
        to_stats_view(self.store.stats())
    }

    pub async fn fetch_tasks(&self) -> TaskActionResponse {
        match self.store.fetch_tasks().await {
            Ok(count) => TaskActionResponse::success(format!("Loaded {count} task(s)."), None),
            Err(err) => failure("fetch_tasks", &err),
        }
    }

    /// Creates a task; `title` must contain non-whitespace characters.
    pub async fn add_task(
        &self,
        title: String,
        description: Option<String>,
        category: Option<String>,
        due_date: Option<i64>,
    ) -> TaskActionResponse {
        let input = NewTask {
            title: title.trim().to_string(),
            description: description.filter(|text| !text.trim().is_empty()),
            completed: Some(false),
            due_date,
            category,
        };
        if let Err(err) = input.validate() {
            return TaskActionResponse::failure(format!("add_task rejected: {err}"));
        }

        match self.store.add_task(input).await {
            Ok(task) => TaskActionResponse::success("Task created.", Some(&task)),
            Err(err) => failure("add_task", &err),
        }
    }

    /// Edits title and description of an existing task.
    ///
    /// `description: None` keeps the stored description; a blank string
    /// clears it.
    pub async fn edit_task(
        &self,
        id: String,
        title: String,
        description: Option<String>,
    ) -> TaskActionResponse {
        let id = match parse_task_id(&id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        let title = title.trim().to_string();
        if title.is_empty() {
            return TaskActionResponse::failure("edit_task rejected: task title cannot be empty");
        }
        let patch = TaskPatch {
            title: Some(title),
            description: description
                .map(|text| Some(text).filter(|text| !text.trim().is_empty())),
            ..TaskPatch::default()
        };

        match self.store.update_task(id, patch).await {
            Ok(task) => TaskActionResponse::success("Task updated.", Some(&task)),
            Err(err) => failure("edit_task", &err),
        }
    }

    pub async fn toggle_complete(&self, id: String) -> TaskActionResponse {
        let id = match parse_task_id(&id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        match self.store.toggle_complete(id).await {
            Ok(task) => TaskActionResponse::success("Task updated.", Some(&task)),
            Err(err) => failure("toggle_complete", &err),
        }
    }

    pub async fn delete_task(&self, id: String) -> TaskActionResponse {
        let id = match parse_task_id(&id) {
            Ok(id) => id,
            Err(response) => return response,
        };
        match self.store.delete_task(id).await {
            Ok(()) => TaskActionResponse::success("Task deleted.", None),
            Err(err) => failure("delete_task", &err),
        }
    }

    pub async fn sign_out(&self) -> TaskActionResponse {
        match self.store.sign_out().await {
            Ok(()) => TaskActionResponse::success("Signed out.", None),
            Err(err) => failure("sign_out", &err),
        }
    }
}

impl Default for TaskDeck {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(operation: &str, err: &StoreError) -> TaskActionResponse {
    if let StoreError::NotFound(id) = err {
        warn!("event=ffi_call module=ffi status=not_found op={operation} task_id={id}");
    }
    TaskActionResponse::failure(format!("{operation} failed: {err}"))
}

fn parse_task_id(raw: &str) -> Result<TaskId, TaskActionResponse> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| TaskActionResponse::failure(format!("invalid task id `{}`", raw.trim())))
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        completed: task.completed,
        created_at: task.created_at,
        due_date: task.due_date,
        category: task.category.clone(),
    }
}

fn to_stats_view(stats: TaskStats) -> StatsView {
    StatsView {
        total: saturating_u32(stats.total),
        completed: saturating_u32(stats.completed),
        upcoming: saturating_u32(stats.upcoming),
        overdue: saturating_u32(stats.overdue),
        progress_percent: stats.progress,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
