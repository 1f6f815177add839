//! Column arithmetic: index resolution, renumbering and relocation.
//!
//! Every function here works on columns already loaded from a [`StoreTx`]
//! and writes back only the rows whose status or position changed.

use chrono::{DateTime, Utc};
use taskboard_proto::{Task, TaskStatus, ValidationError};

use crate::config::PositionPolicy;
use crate::error::BoardError;
use crate::store::StoreTx;

/// Resolves a requested insertion index into `0..=len`.
///
/// `None` means the tail. Under [`PositionPolicy::Clamp`] negative requests
/// land at the head and requests past the end land at the tail.
///
/// # Errors
///
/// Under [`PositionPolicy::Strict`], returns
/// [`ValidationError::PositionOutOfRange`] for requests outside `0..=len`.
pub fn resolve_index(
    requested: Option<i64>,
    len: usize,
    policy: PositionPolicy,
) -> Result<usize, ValidationError> {
    let Some(requested) = requested else {
        return Ok(len);
    };
    let in_range = usize::try_from(requested).ok().filter(|&index| index <= len);
    match (in_range, policy) {
        (Some(index), _) => Ok(index),
        (None, PositionPolicy::Clamp) if requested < 0 => Ok(0),
        (None, PositionPolicy::Clamp) => Ok(len),
        (None, PositionPolicy::Strict) => Err(ValidationError::PositionOutOfRange { requested, len }),
    }
}

/// Converts a column index into a stored position.
fn slot(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Renumbers `column` as `status` with positions `0..n` in sequence order.
///
/// Returns copies of the rows that changed, with `updated_at` bumped.
pub fn renumber(column: &mut [Task], status: TaskStatus, now: DateTime<Utc>) -> Vec<Task> {
    column
        .iter_mut()
        .enumerate()
        .filter_map(|(index, task)| {
            let position = slot(index);
            if task.position == position && task.status == status {
                return None;
            }
            task.position = position;
            task.status = status;
            task.updated_at = now;
            Some(task.clone())
        })
        .collect()
}

/// Reloads the `status` column and closes any gap left by a removed row.
///
/// # Errors
///
/// Propagates store write failures.
pub fn compact<T: StoreTx>(
    tx: &mut T,
    status: TaskStatus,
    now: DateTime<Utc>,
) -> Result<usize, BoardError> {
    let mut column = tx.column(status);
    let changed = renumber(&mut column, status, now);
    let count = changed.len();
    tx.save_all(changed)?;
    Ok(count)
}

/// Moves `task` to `target` at the requested index and renumbers both the
/// column it left and the column it joined.
///
/// `task` may carry unsaved field edits; it is always written back. When
/// `target` equals the task's current status this is a pure reorder.
///
/// # Errors
///
/// Returns a validation error for an out-of-range index under the strict
/// policy (before anything is written), or propagates store write failures.
pub fn relocate<T: StoreTx>(
    tx: &mut T,
    mut task: Task,
    target: TaskStatus,
    requested: Option<i64>,
    policy: PositionPolicy,
    now: DateTime<Utc>,
) -> Result<Task, BoardError> {
    let current = task.status;
    let mut source: Vec<Task> = tx
        .column(current)
        .into_iter()
        .filter(|other| other.id != task.id)
        .collect();

    let mut destination = if current == target {
        std::mem::take(&mut source)
    } else {
        tx.column(target)
            .into_iter()
            .filter(|other| other.id != task.id)
            .collect()
    };

    let index = resolve_index(requested, destination.len(), policy)?;

    let mut changed = if current == target {
        Vec::new()
    } else {
        renumber(&mut source, current, now)
    };

    task.status = target;
    task.updated_at = now;
    destination.insert(index, task);
    changed.extend(renumber(&mut destination, target, now));

    let moved = destination[index].clone();
    if !changed.iter().any(|row| row.id == moved.id) {
        changed.push(moved.clone());
    }
    tx.save_all(changed)?;
    Ok(moved)
}
