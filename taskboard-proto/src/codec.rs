//! On-disk snapshot format for one owner's board.
//!
//! Wire format: `[u8 version][postcard payload]`. The payload is a
//! [`BoardSnapshot`] holding every task row of the owner together with the
//! insertion sequence numbers the store uses to break position ties.

use serde::{Deserialize, Serialize};

use crate::task::{OwnerId, Task};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The version byte is missing or unsupported.
    #[error("unsupported snapshot version: {0:?}")]
    UnsupportedVersion(Option<u8>),
}

/// One stored row: the task and its insertion sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Monotonic per-owner insertion counter.
    pub seq: u64,
    /// The task record.
    pub task: Task,
}

/// Everything persisted for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Owner the rows belong to.
    pub owner: OwnerId,
    /// Next insertion sequence number to hand out.
    pub next_seq: u64,
    /// All rows, in no particular order.
    pub rows: Vec<SnapshotRow>,
}

/// Encodes a [`BoardSnapshot`] with its version prefix.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the snapshot cannot be serialized.
pub fn encode_snapshot(snapshot: &BoardSnapshot) -> Result<Vec<u8>, CodecError> {
    postcard::to_extend(snapshot, vec![SNAPSHOT_VERSION])
        .map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a version-prefixed [`BoardSnapshot`].
///
/// # Errors
///
/// Returns `CodecError::UnsupportedVersion` if the first byte is missing or
/// unknown, or `CodecError::Serialization` if the payload is malformed.
pub fn decode_snapshot(bytes: &[u8]) -> Result<BoardSnapshot, CodecError> {
    match bytes.split_first() {
        Some((&SNAPSHOT_VERSION, payload)) => {
            postcard::from_bytes(payload).map_err(|e| CodecError::Serialization(e.to_string()))
        }
        Some((&other, _)) => Err(CodecError::UnsupportedVersion(Some(other))),
        None => Err(CodecError::UnsupportedVersion(None)),
    }
}
