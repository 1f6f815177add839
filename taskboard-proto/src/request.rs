//! Request payloads accepted by the ordering engine.
//!
//! The payloads carry raw caller input; trimming and limit checks happen in
//! the engine through [`crate::validation`], so every entry point gets the
//! same rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{TaskPriority, TaskStatus};

/// Payload for creating a task. New tasks always land at the tail of `TODO`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Required title, 1 to 140 characters after trimming.
    pub title: String,
    /// Optional description; blank is treated as absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Priority; `Medium` when absent.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
}

impl NewTask {
    /// Creates a payload with only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Partial update of a task. Absent fields are left untouched.
///
/// `remove_due_date` clears the due date and takes precedence over
/// `due_date`. A `status` different from the current one relocates the task
/// to the tail of the new column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title, re-validated when present.
    #[serde(default)]
    pub title: Option<String>,
    /// New description; a blank string clears it.
    #[serde(default)]
    pub description: Option<String>,
    /// New due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Clears the due date.
    #[serde(default)]
    pub remove_due_date: bool,
    /// New priority.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// New status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Requests the due date be cleared.
    #[must_use]
    pub const fn remove_due_date(mut self) -> Self {
        self.remove_due_date = true;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Relocation request.
///
/// `status` is required by the engine; it is optional here so a missing
/// value surfaces as a validation error rather than a decode failure.
/// `new_position` may be any integer: the engine clamps (or, in strict
/// mode, rejects) values outside the target column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTask {
    /// Target column.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Requested index in the target column; tail when absent.
    #[serde(default)]
    pub new_position: Option<i64>,
}

impl MoveTask {
    /// Moves to the tail of `status`.
    #[must_use]
    pub const fn to(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            new_position: None,
        }
    }

    /// Sets the requested index.
    #[must_use]
    pub const fn at(mut self, position: i64) -> Self {
        self.new_position = Some(position);
        self
    }
}
