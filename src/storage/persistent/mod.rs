//! Persistent directory-backed profile storage.
//!
//! Layout of a profile directory:
//!
//! ```text
//! <root>/
//! ├── .lock               exclusive process lock (flock / LockFileEx)
//! ├── individual/<id>.nprf   assessment-derived profiles
//! └── hybrid/<id>.nprf       hybrid profiles
//! ```
//!
//! Each `.nprf` file holds one CRC-checked record (see `codec`). Records
//! are written to a temporary file and renamed into place, so a crash
//! never leaves a half-written profile under its final name.

mod codec;
mod file_lock;
mod stores;

pub use file_lock::FileLock;
pub use stores::DirectoryProfileStore;

use std::path::Path;

use crate::error::ProfileResult;

/// Configuration for persistent storage.
#[derive(Debug, Clone)]
pub struct PersistentConfig {
    /// Whether to fsync each record before renaming it into place.
    pub sync_on_write: bool,
    /// Skip unreadable record files at open instead of failing.
    pub skip_corrupt: bool,
}

impl Default for PersistentConfig {
    fn default() -> Self {
        Self {
            sync_on_write: true,
            skip_corrupt: true,
        }
    }
}

/// Open or create a profile directory.
///
/// # Errors
/// - If the directory cannot be created or read
/// - If another process holds the lock
/// - If a record is corrupt and `skip_corrupt` is off
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
/// use neuroprofile::storage::persistent::open_store;
///
/// let store = open_store("./profiles", None)?;
/// let engine = ProfilingEngine::new(Arc::new(store), EngineConfig::default())?;
/// ```
pub fn open_store(
    path: impl AsRef<Path>,
    config: Option<PersistentConfig>,
) -> ProfileResult<DirectoryProfileStore> {
    Ok(DirectoryProfileStore::open(path.as_ref(), config.unwrap_or_default())?)
}
