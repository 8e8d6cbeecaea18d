//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record and its create/update inputs.
//! - Provide the partial-merge rule used by updates.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once and never touched by a patch.
//! - `completed` defaults to `false` when the create input omits it.
//! - Title emptiness is checked by callers through `NewTask::validate()`;
//!   constructors do not reject empty titles.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// One user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub due_date: Option<i64>,
    pub category: Option<String>,
}

/// Input for creating a task. Identity and creation time are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<i64>,
    pub category: Option<String>,
}

/// Sparse set of fields to overwrite on an existing task.
///
/// Optional attributes use a nested `Option`: `None` keeps the current
/// value, `Some(None)` clears it, `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<i64>>,
    pub category: Option<Option<String>>,
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Builds a task from create input with a freshly generated ID.
    pub fn from_new(input: NewTask, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), input, created_at)
    }

    /// Builds a task with a caller-provided ID.
    ///
    /// Used by seed data and storage read paths where identity already exists.
    pub fn with_id(id: TaskId, input: NewTask, created_at: i64) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            completed: input.completed.unwrap_or(false),
            created_at,
            due_date: input.due_date,
            category: input.category,
        }
    }

    /// Merges `patch` into this task. Fields absent from the patch are kept.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
    }

    /// Incomplete with a due date strictly after `now_ms`.
    pub fn is_upcoming(&self, now_ms: i64) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due > now_ms)
    }

    /// Incomplete with a due date at or before `now_ms`.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due <= now_ms)
    }
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn due_date(mut self, due_epoch_ms: i64) -> Self {
        self.due_date = Some(due_epoch_ms);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Rejects blank titles. Presentation callers run this before `add_task`.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

impl TaskPatch {
    /// Patch that only flips the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Same field set as `self`, with values taken from `stored`.
    pub fn reconciled_with(&self, stored: &Task) -> Self {
        Self {
            title: self.title.as_ref().map(|_| stored.title.clone()),
            description: self.description.as_ref().map(|_| stored.description.clone()),
            completed: self.completed.map(|_| stored.completed),
            due_date: self.due_date.map(|_| stored.due_date),
            category: self.category.as_ref().map(|_| stored.category.clone()),
        }
    }
}
