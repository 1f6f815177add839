//! Error kinds surfaced by the ordering engine.

use taskboard_proto::{TaskId, ValidationError};
use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by [`crate::Board`] operations.
///
/// All three kinds propagate to the caller unchanged; the engine never
/// retries, and a failed operation leaves the store as it was.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The task does not exist for this owner.
    ///
    /// A task owned by someone else is reported the same way.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Malformed caller input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The underlying store failed; the operation was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}
