//! Volatile in-memory task store.

use taskboard_proto::OwnerId;

use super::shard::{ShardMap, ShardTx};
use super::{StoreError, TaskStore};

/// In-memory [`TaskStore`] with one lock per owner.
///
/// Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    shards: ShardMap,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    type Tx = ShardTx;

    async fn begin(&self, owner: &OwnerId) -> Result<ShardTx, StoreError> {
        let guard = self.shards.cell(owner).lock_owned().await;
        Ok(ShardTx::new(owner.clone(), guard, None))
    }
}
