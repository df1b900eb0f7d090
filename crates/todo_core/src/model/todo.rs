//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical Todo record and its status enumeration.
//! - Provide validation helpers shared by every gateway implementation.
//!
//! # Invariants
//! - `id` is assigned by the persistence layer and never changes.
//! - `task` is never blank once persisted.
//! - New records always start with `TodoStatus::Init`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned record identifier.
pub type TodoId = i64;

/// Flat status label for a Todo.
///
/// Any value may replace any other through an update; there is no
/// transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    /// Created but not started.
    #[default]
    Init,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [Self::Init, Self::InProgress, Self::Done];

    /// Returns the wire/storage label, e.g. `IN_PROGRESS`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Parses an externally supplied status label.
    ///
    /// Matching is exact; `done` or ` DONE` are rejected.
    pub fn parse(value: &str) -> Result<Self, TodoValidationError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| TodoValidationError::UnknownStatus(value.to_string()))
    }
}

impl Display for TodoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = TodoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Input-shape failures detected before anything touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyTask,
    UnknownStatus(String),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTask => write!(f, "task must not be empty"),
            Self::UnknownStatus(value) => write!(
                f,
                "unknown status `{value}`; expected INIT|IN_PROGRESS|DONE"
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Rejects blank task text.
pub fn validate_task(task: &str) -> Result<(), TodoValidationError> {
    if task.trim().is_empty() {
        return Err(TodoValidationError::EmptyTask);
    }
    Ok(())
}

/// Persisted Todo record as returned by a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub task: String,
    pub description: String,
    pub status: TodoStatus,
    /// Unix epoch milliseconds, applied by the store.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

impl Todo {
    /// Checks invariants of a record read back from storage.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_task(&self.task)
    }
}

/// Insert draft. Carries no id; the gateway assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub task: String,
    pub description: String,
    pub status: TodoStatus,
}

impl NewTodo {
    /// Builds a draft with status forced to `INIT`.
    pub fn new(task: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            description: description.into(),
            status: TodoStatus::Init,
        }
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_task(&self.task)
    }
}

/// Partial field change applied by `TodoRepository::update`.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn status(status: TodoStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.description.is_none() && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        match self.task.as_deref() {
            Some(task) => validate_task(task),
            None => Ok(()),
        }
    }

    /// Applies this patch onto an in-memory copy.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(task) = &self.task {
            todo.task = task.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
    }
}
