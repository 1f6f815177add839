//! Read model: the externally visible shape of a task.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId, TaskPriority, TaskStatus};

/// Canonical view of a task's persisted state.
///
/// The owner is omitted; callers only ever see their own tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Description, absent when blank.
    pub description: Option<String>,
    /// Column the task sits in.
    pub status: TaskStatus,
    /// Priority label.
    pub priority: TaskPriority,
    /// Zero-based index within the status column.
    pub position: u32,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the stored row last changed, including position shifts.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            position: task.position,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            position: task.position,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
