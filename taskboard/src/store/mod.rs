//! Task persistence.
//!
//! The engine talks to storage only through [`TaskStore`] and the
//! transaction it hands out, [`StoreTx`]. A transaction is scoped to one
//! owner, holds that owner's lock until it is dropped, and applies nothing
//! until [`StoreTx::commit`] succeeds. Dropping an uncommitted transaction
//! discards every staged write.
//!
//! Implementations:
//! - [`MemoryStore`]: volatile, for tests and ephemeral boards
//! - [`FileStore`]: one postcard snapshot file per owner

mod file;
mod memory;
mod shard;

use std::future::Future;
use std::path::PathBuf;

use taskboard_proto::codec::CodecError;
use taskboard_proto::{OwnerId, Task, TaskId, TaskStatus};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use shard::ShardTx;

/// Errors raised by a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a backing file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] CodecError),

    /// A persisted snapshot does not match what was expected.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    /// A write would break a store constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable keyed storage of task records, partitioned by owner.
pub trait TaskStore: Send + Sync {
    /// Transaction type handed out by [`begin`](Self::begin).
    type Tx: StoreTx + Send;

    /// Opens a transaction over `owner`'s tasks.
    ///
    /// Waits for any other open transaction on the same owner; transactions
    /// on different owners never contend.
    fn begin(
        &self,
        owner: &OwnerId,
    ) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;
}

/// An all-or-nothing unit of reads and writes against one owner's tasks.
///
/// Reads observe the transaction's own staged writes.
pub trait StoreTx {
    /// Owner this transaction is scoped to.
    fn owner(&self) -> &OwnerId;

    /// Fetches a task by id. Tasks of other owners are never visible.
    fn find(&self, id: &TaskId) -> Option<Task>;

    /// Returns one column ordered by position, ties broken by insertion order.
    fn column(&self, status: TaskStatus) -> Vec<Task>;

    /// Number of tasks in one column.
    fn count(&self, status: TaskStatus) -> usize;

    /// Every task of the owner, ordered by status then position.
    fn all(&self) -> Vec<Task>;

    /// Inserts or replaces each row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if any row belongs to another owner;
    /// nothing is staged in that case.
    fn save_all(&mut self, rows: Vec<Task>) -> Result<(), StoreError>;

    /// Removes a single row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if no such row exists.
    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError>;

    /// Makes every staged write visible to later transactions.
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
