//! Per-owner row sets and the transaction type shared by both stores.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use taskboard_proto::codec::{BoardSnapshot, SnapshotRow};
use taskboard_proto::{OwnerId, Task, TaskId, TaskStatus};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{StoreError, StoreTx, file};

/// A stored task plus the sequence number it was first inserted with.
#[derive(Debug, Clone)]
struct Row {
    seq: u64,
    task: Task,
}

/// All rows of one owner.
#[derive(Debug, Clone, Default)]
pub(crate) struct Shard {
    rows: HashMap<TaskId, Row>,
    next_seq: u64,
}

impl Shard {
    fn find(&self, id: &TaskId) -> Option<&Task> {
        self.rows.get(id).map(|row| &row.task)
    }

    fn column(&self, status: TaskStatus) -> Vec<Task> {
        let mut rows: Vec<&Row> = self
            .rows
            .values()
            .filter(|row| row.task.status == status)
            .collect();
        rows.sort_by_key(|row| (row.task.position, row.seq));
        rows.into_iter().map(|row| row.task.clone()).collect()
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.rows
            .values()
            .filter(|row| row.task.status == status)
            .count()
    }

    fn all(&self) -> Vec<Task> {
        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by_key(|row| (row.task.status, row.task.position, row.seq));
        rows.into_iter().map(|row| row.task.clone()).collect()
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn put(&mut self, task: Task) -> Result<(), StoreError> {
        if let Some(row) = self.rows.get_mut(&task.id) {
            row.task = task;
            return Ok(());
        }
        let seq = self.next_seq;
        self.next_seq = seq
            .checked_add(1)
            .ok_or_else(|| StoreError::Constraint("insertion sequence exhausted".to_string()))?;
        self.rows.insert(task.id, Row { seq, task });
        Ok(())
    }

    fn remove(&mut self, id: &TaskId) -> Option<Task> {
        self.rows.remove(id).map(|row| row.task)
    }

    pub(crate) fn to_snapshot(&self, owner: &OwnerId) -> BoardSnapshot {
        let mut rows: Vec<SnapshotRow> = self
            .rows
            .values()
            .map(|row| SnapshotRow {
                seq: row.seq,
                task: row.task.clone(),
            })
            .collect();
        rows.sort_by_key(|row| row.seq);
        BoardSnapshot {
            owner: owner.clone(),
            next_seq: self.next_seq,
            rows,
        }
    }

    /// Rebuilds a shard from a decoded snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if a row carries a sequence number no
    /// later row could follow.
    pub(crate) fn from_snapshot(snapshot: BoardSnapshot) -> Result<Self, StoreError> {
        let mut max_seq = 0;
        for row in &snapshot.rows {
            let after = row.seq.checked_add(1).ok_or_else(|| {
                StoreError::Corrupt(format!("task {} has sequence number {}", row.task.id, row.seq))
            })?;
            max_seq = max_seq.max(after);
        }
        let rows = snapshot
            .rows
            .into_iter()
            .map(|row| {
                (
                    row.task.id,
                    Row {
                        seq: row.seq,
                        task: row.task,
                    },
                )
            })
            .collect();
        Ok(Self {
            rows,
            next_seq: snapshot.next_seq.max(max_seq),
        })
    }
}

/// A lockable slot holding an owner's shard; `None` until first loaded.
pub(crate) type ShardCell = Arc<Mutex<Option<Shard>>>;

/// Directory size below which idle cells are never swept.
const SWEEP_FLOOR: usize = 64;

/// Directory of per-owner shard cells.
///
/// Cells that hold no tasks and are not in use are dropped once the
/// directory grows past its sweep mark, so owners that were only ever read
/// do not accumulate. Cells holding tasks are kept.
#[derive(Debug)]
pub(crate) struct ShardMap {
    inner: parking_lot::Mutex<Directory>,
}

#[derive(Debug)]
struct Directory {
    cells: HashMap<OwnerId, ShardCell>,
    sweep_at: usize,
}

impl Default for ShardMap {
    fn default() -> Self {
        Self {
            inner: parking_lot::Mutex::new(Directory {
                cells: HashMap::new(),
                sweep_at: SWEEP_FLOOR,
            }),
        }
    }
}

impl ShardMap {
    /// Returns the cell for `owner`, creating an empty one if needed.
    pub(crate) fn cell(&self, owner: &OwnerId) -> ShardCell {
        let mut dir = self.inner.lock();
        if let Some(cell) = dir.cells.get(owner) {
            return Arc::clone(cell);
        }
        if dir.cells.len() >= dir.sweep_at {
            let before = dir.cells.len();
            dir.cells.retain(|_, cell| !is_idle_and_empty(cell));
            dir.sweep_at = (dir.cells.len() * 2).max(SWEEP_FLOOR);
            tracing::debug!(before, after = dir.cells.len(), "swept idle shard cells");
        }
        Arc::clone(dir.cells.entry(owner.clone()).or_default())
    }

    /// Number of cells currently tracked.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().cells.len()
    }
}

/// True when only the directory references `cell` and it holds no tasks.
///
/// Must be called with the directory locked, so no new reference can appear
/// between the count check and removal.
fn is_idle_and_empty(cell: &ShardCell) -> bool {
    Arc::strong_count(cell) == 1
        && cell
            .try_lock()
            .is_ok_and(|shard| shard.as_ref().is_none_or(Shard::is_empty))
}

/// Transaction over one owner's shard.
///
/// Holds the owner's lock for its whole lifetime and works on a private copy
/// of the shard; [`commit`](StoreTx::commit) persists the copy (when backed
/// by a file) and then swaps it in.
#[derive(Debug)]
pub struct ShardTx {
    owner: OwnerId,
    guard: OwnedMutexGuard<Option<Shard>>,
    staged: Shard,
    dirty: bool,
    sink: Option<PathBuf>,
}

impl ShardTx {
    pub(crate) fn new(
        owner: OwnerId,
        guard: OwnedMutexGuard<Option<Shard>>,
        sink: Option<PathBuf>,
    ) -> Self {
        let staged = (*guard).clone().unwrap_or_default();
        Self {
            owner,
            guard,
            staged,
            dirty: false,
            sink,
        }
    }
}

impl StoreTx for ShardTx {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn find(&self, id: &TaskId) -> Option<Task> {
        self.staged.find(id).cloned()
    }

    fn column(&self, status: TaskStatus) -> Vec<Task> {
        self.staged.column(status)
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.staged.count(status)
    }

    fn all(&self) -> Vec<Task> {
        self.staged.all()
    }

    fn save_all(&mut self, rows: Vec<Task>) -> Result<(), StoreError> {
        if let Some(foreign) = rows.iter().find(|task| task.owner != self.owner) {
            return Err(StoreError::Constraint(format!(
                "task {} is owned by {}, not {}",
                foreign.id, foreign.owner, self.owner
            )));
        }
        for task in rows {
            self.staged.put(task)?;
            self.dirty = true;
        }
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        if self.staged.remove(id).is_none() {
            return Err(StoreError::Constraint(format!("no task {id} to delete")));
        }
        self.dirty = true;
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self {
            owner,
            mut guard,
            staged,
            dirty,
            sink,
        } = self;
        if !dirty {
            return Ok(());
        }
        if let Some(path) = sink {
            file::write_snapshot(&path, &staged.to_snapshot(&owner)).await?;
        }
        *guard = Some(staged);
        Ok(())
    }
}
