//! `Taskboard`: kanban ordering engine library.
//!
//! [`Board`] keeps every `(owner, status)` column densely numbered
//! `0..n` across create, update, move and delete. Persistence is behind the
//! [`store::TaskStore`] trait, with an in-memory and a file-backed store.

pub mod board;
pub mod config;
pub mod error;
pub mod store;

pub use board::Board;
pub use config::{BoardConfig, PositionPolicy};
pub use error::BoardError;
pub use store::{FileStore, MemoryStore, StoreError, StoreTx, TaskStore};
