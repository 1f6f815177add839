//! File-backed task store: one snapshot file per owner.
//!
//! Each commit rewrites the owner's snapshot through a temp file, fsyncs it
//! and renames it into place, so a crash leaves either the old or the new
//! snapshot on disk. Snapshots are loaded lazily the first time an owner is
//! touched and then served from memory; a board that holds tasks stays
//! resident for the life of the store.

use std::path::{Path, PathBuf};

use taskboard_proto::OwnerId;
use taskboard_proto::codec::{self, BoardSnapshot};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::shard::{Shard, ShardMap, ShardTx};
use super::{StoreError, TaskStore};

/// Extension used for snapshot files.
const SNAPSHOT_EXTENSION: &str = "board";

/// Durable [`TaskStore`] rooted at a directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    shards: ShardMap,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(io_error(&root))?;
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            shards: ShardMap::default(),
        })
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot path for `owner`.
    ///
    /// The file name is a name-based (v5) UUID of the owner id, so it has the
    /// same short length for any owner. The snapshot itself records the
    /// owner, and a mismatch on load is reported as corruption.
    #[must_use]
    pub fn snapshot_path(&self, owner: &OwnerId) -> PathBuf {
        let name = Uuid::new_v5(&Uuid::NAMESPACE_OID, owner.as_str().as_bytes());
        self.root.join(format!("{name}.{SNAPSHOT_EXTENSION}"))
    }
}

impl TaskStore for FileStore {
    type Tx = ShardTx;

    async fn begin(&self, owner: &OwnerId) -> Result<ShardTx, StoreError> {
        let mut guard = self.shards.cell(owner).lock_owned().await;
        let path = self.snapshot_path(owner);
        if guard.is_none() {
            *guard = Some(load_shard(&path, owner).await?);
        }
        Ok(ShardTx::new(owner.clone(), guard, Some(path)))
    }
}

/// Reads an owner's snapshot; a missing file is an empty board.
async fn load_shard(path: &Path, owner: &OwnerId) -> Result<Shard, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Shard::default()),
        Err(e) => return Err(io_error(path)(e)),
    };
    let snapshot = codec::decode_snapshot(&bytes)?;
    if snapshot.owner != *owner {
        return Err(StoreError::Corrupt(format!(
            "{} holds tasks of {}, expected {owner}",
            path.display(),
            snapshot.owner
        )));
    }
    tracing::debug!(owner = %owner, rows = snapshot.rows.len(), "loaded snapshot");
    Shard::from_snapshot(snapshot)
}

/// Atomically replaces the snapshot at `path`.
///
/// The temp file is removed again if any step fails. Once the rename has
/// happened the new snapshot is the visible one, so a failure to sync the
/// directory afterwards is logged rather than returned.
pub(crate) async fn write_snapshot(path: &Path, snapshot: &BoardSnapshot) -> Result<(), StoreError> {
    let bytes = codec::encode_snapshot(snapshot)?;
    let tmp = temp_path(path);

    let replaced = async {
        let mut file = tokio::fs::File::create(&tmp).await.map_err(io_error(&tmp))?;
        file.write_all(&bytes).await.map_err(io_error(&tmp))?;
        file.sync_all().await.map_err(io_error(&tmp))?;
        drop(file);
        tokio::fs::rename(&tmp, path).await.map_err(io_error(path))
    }
    .await;

    if let Err(e) = replaced {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp).await
            && cleanup.kind() != std::io::ErrorKind::NotFound
        {
            tracing::debug!(path = %tmp.display(), error = %cleanup, "failed to remove temp snapshot");
        }
        return Err(e);
    }

    if let Some(dir) = path.parent()
        && let Err(e) = sync_dir(dir).await
    {
        tracing::warn!(dir = %dir.display(), error = %e, "failed to sync snapshot directory");
    }
    Ok(())
}

/// Temp file a snapshot is staged in before the rename.
fn temp_path(path: &Path) -> PathBuf {
    path.with_extension(format!("{SNAPSHOT_EXTENSION}.tmp"))
}

/// Flushes directory entries so a completed rename survives a crash.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + use<> {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}
