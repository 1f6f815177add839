//! Shared domain definitions for `Taskboard`.
//!
//! Everything the engine, its stores and the HTTP surface agree on lives
//! here: identifiers, the stored task record, request payloads and their
//! validation, the read model, and the on-disk snapshot codec.

pub mod codec;
pub mod request;
pub mod task;
pub mod validation;
pub mod view;

pub use request::{MoveTask, NewTask, TaskPatch};
pub use task::{OwnerId, Task, TaskId, TaskPriority, TaskStatus};
pub use validation::ValidationError;
pub use view::TaskView;
