//! The ordering engine.
//!
//! [`Board`] exposes create, update, move and delete plus two read queries.
//! Each call runs inside a single store transaction scoped to the caller's
//! owner: it either commits in full or leaves the store untouched. After
//! every committed call each `(owner, status)` column is numbered `0..n`
//! with no gaps or duplicates.

pub mod ordering;

use chrono::Utc;
use taskboard_proto::validation::{normalize_description, normalize_title};
use taskboard_proto::{
    MoveTask, NewTask, OwnerId, Task, TaskId, TaskPatch, TaskStatus, TaskView, ValidationError,
};

use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::store::{StoreError, StoreTx, TaskStore};

/// Kanban ordering engine over a [`TaskStore`].
#[derive(Debug)]
pub struct Board<S> {
    store: S,
    config: BoardConfig,
}

impl<S: TaskStore> Board<S> {
    /// Creates an engine with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, BoardConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub const fn with_config(store: S, config: BoardConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Lists every task of `owner`, ordered by status then position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store cannot be read.
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<TaskView>, BoardError> {
        let tx = self.store.begin(owner).await?;
        Ok(tx.all().into_iter().map(TaskView::from).collect())
    }

    /// Lists one column of `owner`, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store cannot be read.
    pub async fn list_by_status(
        &self,
        owner: &OwnerId,
        status: TaskStatus,
    ) -> Result<Vec<TaskView>, BoardError> {
        let tx = self.store.begin(owner).await?;
        Ok(tx.column(status).into_iter().map(TaskView::from).collect())
    }

    /// Creates a task at the tail of `owner`'s `TODO` column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] for a blank or over-long title or
    /// an over-long description, or [`BoardError::Store`] if the write fails.
    pub async fn create(&self, owner: &OwnerId, request: NewTask) -> Result<TaskView, BoardError> {
        let title = normalize_title(&request.title)?;
        let description = normalize_description(request.description.as_deref())?;

        let mut tx = self.store.begin(owner).await?;
        let now = Utc::now();
        let position = u32::try_from(tx.count(TaskStatus::Todo))
            .map_err(|_| StoreError::Constraint("TODO column is full".to_string()))?;
        let task = Task {
            id: TaskId::new(),
            owner: owner.clone(),
            title,
            description,
            status: TaskStatus::Todo,
            priority: request.priority.unwrap_or_default(),
            position,
            due_date: request.due_date,
            created_at: now,
            updated_at: now,
        };
        tx.save_all(vec![task.clone()])?;
        tx.commit().await?;

        tracing::debug!(owner = %owner, task_id = %task.id, position, "task created");
        Ok(TaskView::from(task))
    }

    /// Applies a partial update.
    ///
    /// A status different from the current one relocates the task to the
    /// tail of the new column in the same transaction as the field edits.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if `owner` has no such task,
    /// [`BoardError::Validation`] for invalid field values, or
    /// [`BoardError::Store`] if a write fails.
    pub async fn update(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<TaskView, BoardError> {
        let mut tx = self.store.begin(owner).await?;
        let original = tx.find(id).ok_or(BoardError::NotFound(*id))?;
        let mut task = original.clone();

        if let Some(title) = patch.title.as_deref() {
            task.title = normalize_title(title)?;
        }
        if let Some(description) = patch.description.as_deref() {
            task.description = normalize_description(Some(description))?;
        }
        if patch.remove_due_date {
            task.due_date = None;
        } else if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }

        let now = Utc::now();
        let task = match patch.status {
            Some(target) if target != task.status => {
                tracing::debug!(
                    owner = %owner,
                    task_id = %id,
                    from = %task.status,
                    to = %target,
                    "status change via update"
                );
                ordering::relocate(&mut tx, task, target, None, self.config.position_policy, now)?
            }
            _ if task == original => task,
            _ => {
                task.updated_at = now;
                tx.save_all(vec![task.clone()])?;
                task
            }
        };
        tx.commit().await?;

        Ok(TaskView::from(task))
    }

    /// Moves a task to `request.status` at `request.new_position`.
    ///
    /// Both the column the task leaves and the column it joins are
    /// renumbered. With the default policy out-of-range positions clamp to
    /// the nearest end; an absent position means the tail.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if `owner` has no such task,
    /// [`BoardError::Validation`] if no target status was given (or, under
    /// the strict policy, the position is out of range), or
    /// [`BoardError::Store`] if a write fails.
    pub async fn move_task(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        request: MoveTask,
    ) -> Result<TaskView, BoardError> {
        let mut tx = self.store.begin(owner).await?;
        let task = tx.find(id).ok_or(BoardError::NotFound(*id))?;
        let target = request.status.ok_or(ValidationError::MissingStatus)?;

        let from = task.status;
        let moved = ordering::relocate(
            &mut tx,
            task,
            target,
            request.new_position,
            self.config.position_policy,
            Utc::now(),
        )?;
        tx.commit().await?;

        tracing::debug!(
            owner = %owner,
            task_id = %id,
            from = %from,
            to = %moved.status,
            position = moved.position,
            "task moved"
        );
        Ok(TaskView::from(moved))
    }

    /// Deletes a task and closes the gap in its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if `owner` has no such task, or
    /// [`BoardError::Store`] if a write fails.
    pub async fn delete(&self, owner: &OwnerId, id: &TaskId) -> Result<(), BoardError> {
        let mut tx = self.store.begin(owner).await?;
        let task = tx.find(id).ok_or(BoardError::NotFound(*id))?;
        tx.delete(id)?;
        let shifted = ordering::compact(&mut tx, task.status, Utc::now())?;
        tx.commit().await?;

        tracing::debug!(owner = %owner, task_id = %id, status = %task.status, shifted, "task deleted");
        Ok(())
    }
}
