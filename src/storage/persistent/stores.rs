//! Directory-backed `ProfileStore`.
//!
//! The store wraps:
//! - an in-memory index of every record, loaded at open
//! - one framed file per profile, written via temp file + rename
//! - an exclusive directory lock held for the store's lifetime

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::profile::{CognitiveProfile, ProfileId, ProfileSource, ProfileSummary};
use crate::storage::traits::{ProfileStore, StorageError};

use super::codec;
use super::file_lock::FileLock;
use super::PersistentConfig;

const RECORD_EXT: &str = "nprf";
const TMP_EXT: &str = "tmp";

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

const fn subdir(source: ProfileSource) -> &'static str {
    match source {
        ProfileSource::Assessment => "individual",
        ProfileSource::Hybrid => "hybrid",
    }
}

/// Profile store persisting one record per file.
#[derive(Debug)]
pub struct DirectoryProfileStore {
    dir: PathBuf,
    _lock: FileLock,
    config: PersistentConfig,
    index: RwLock<BTreeMap<ProfileId, CognitiveProfile>>,
}

impl DirectoryProfileStore {
    /// Open or create a profile directory and load its index.
    pub fn open(dir: &Path, config: PersistentConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let lock = FileLock::acquire(dir)?;

        let mut index = BTreeMap::new();
        for source in [ProfileSource::Assessment, ProfileSource::Hybrid] {
            let sub = dir.join(subdir(source));
            fs::create_dir_all(&sub)?;
            load_dir(&sub, source, &config, &mut index)?;
        }

        tracing::debug!(dir = %dir.display(), profiles = index.len(), "opened profile directory");

        Ok(Self {
            dir: dir.to_path_buf(),
            _lock: lock,
            config,
            index: RwLock::new(index),
        })
    }

    /// Root directory of this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: ProfileId, source: ProfileSource) -> PathBuf {
        self.dir
            .join(subdir(source))
            .join(format!("{id}.{RECORD_EXT}"))
    }

    fn write_record(&self, profile: &CognitiveProfile) -> Result<(), StorageError> {
        let bytes = codec::encode(profile)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let path = self.record_path(profile.id, profile.source);
        let tmp = path.with_extension(format!("{RECORD_EXT}.{TMP_EXT}"));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            if self.config.sync_on_write {
                file.sync_all()?;
            }
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn insert_locked(
        &self,
        index: &mut BTreeMap<ProfileId, CognitiveProfile>,
        profile: CognitiveProfile,
    ) -> Result<(), StorageError> {
        if index.contains_key(&profile.id) {
            return Err(StorageError::DuplicateKey(profile.id.to_string()));
        }
        self.write_record(&profile)?;
        index.insert(profile.id, profile);
        Ok(())
    }
}

fn load_dir(
    sub: &Path,
    source: ProfileSource,
    config: &PersistentConfig,
    index: &mut BTreeMap<ProfileId, CognitiveProfile>,
) -> Result<(), StorageError> {
    for entry in fs::read_dir(sub)? {
        let path = entry?.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some(RECORD_EXT) => {}
            Some(TMP_EXT) => {
                // Leftover from an interrupted write; the rename never happened.
                let _ = fs::remove_file(&path);
                continue;
            }
            _ => continue,
        }

        match read_record(&path) {
            Ok(profile) if profile.source == source => {
                index.insert(profile.id, profile);
            }
            Ok(profile) => {
                tracing::warn!(
                    path = %path.display(),
                    source = %profile.source,
                    "skipping profile stored under the wrong directory"
                );
            }
            Err(e) if config.skip_corrupt => {
                tracing::warn!(path = %path.display(), error = %e, "skipping corrupt profile record");
            }
            Err(e) => {
                return Err(StorageError::BackendError(format!(
                    "corrupt profile record {}: {e}",
                    path.display()
                )));
            }
        }
    }
    Ok(())
}

fn read_record(path: &Path) -> std::io::Result<CognitiveProfile> {
    let mut reader = BufReader::new(File::open(path)?);
    codec::decode(&mut reader)
}

impl ProfileStore for DirectoryProfileStore {
    fn get(&self, id: &ProfileId) -> Result<Option<CognitiveProfile>, StorageError> {
        let index = self.index.read().map_err(|_| lock_err("index.read"))?;
        Ok(index.get(id).cloned())
    }

    fn put(&self, profile: CognitiveProfile) -> Result<(), StorageError> {
        let mut index = self.index.write().map_err(|_| lock_err("index.write"))?;
        self.insert_locked(&mut index, profile)
    }

    fn put_derived(
        &self,
        profile: CognitiveProfile,
        sources: &[ProfileId],
    ) -> Result<(), StorageError> {
        let mut index = self.index.write().map_err(|_| lock_err("index.write"))?;
        if let Some(missing) = sources.iter().find(|id| !index.contains_key(id)) {
            return Err(StorageError::MissingSource(*missing));
        }
        self.insert_locked(&mut index, profile)
    }

    fn delete(&self, id: &ProfileId) -> Result<bool, StorageError> {
        let mut index = self.index.write().map_err(|_| lock_err("index.write"))?;
        let Some(source) = index.get(id).map(|p| p.source) else {
            return Ok(false);
        };
        match fs::remove_file(self.record_path(*id, source)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        index.remove(id);
        Ok(true)
    }

    fn list(&self) -> Result<Vec<ProfileSummary>, StorageError> {
        let index = self.index.read().map_err(|_| lock_err("index.read"))?;
        Ok(index.values().map(CognitiveProfile::summary).collect())
    }

    fn contains(&self, id: &ProfileId) -> Result<bool, StorageError> {
        let index = self.index.read().map_err(|_| lock_err("index.read"))?;
        Ok(index.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trait_vector::{CognitiveTrait, TraitVector};
    use tempfile::tempdir;

    fn sample(score: f64) -> CognitiveProfile {
        let traits = TraitVector::neutral().with(CognitiveTrait::Creative, score);
        CognitiveProfile::assessed(ProfileId::new(), traits, Vec::new(), chrono::Utc::now())
    }

    #[test]
    fn test_records_land_in_source_subdir() {
        let dir = tempdir().unwrap();
        let store = DirectoryProfileStore::open(dir.path(), PersistentConfig::default()).unwrap();
        let p = sample(0.9);
        let id = p.id;
        store.put(p).unwrap();

        let file = dir.path().join("individual").join(format!("{id}.nprf"));
        assert!(file.exists());
        assert!(!file.with_extension("nprf.tmp").exists());
    }

    #[test]
    fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let store = DirectoryProfileStore::open(dir.path(), PersistentConfig::default()).unwrap();
        let p = sample(0.4);
        let id = p.id;
        store.put(p).unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(!dir.path().join("individual").join(format!("{id}.nprf")).exists());
        assert!(!store.delete(&id).unwrap());
    }

    #[test]
    fn test_corrupt_record_fails_open_when_not_skipping() {
        let dir = tempdir().unwrap();
        {
            let store = DirectoryProfileStore::open(dir.path(), PersistentConfig::default()).unwrap();
            store.put(sample(0.2)).unwrap();
        }
        fs::write(dir.path().join("individual").join("junk.nprf"), b"garbage").unwrap();

        let strict = PersistentConfig {
            skip_corrupt: false,
            ..PersistentConfig::default()
        };
        assert!(DirectoryProfileStore::open(dir.path(), strict).is_err());

        let lenient = DirectoryProfileStore::open(dir.path(), PersistentConfig::default()).unwrap();
        assert_eq!(lenient.list().unwrap().len(), 1);
    }

    #[test]
    fn test_stale_tmp_files_are_removed() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("hybrid")).unwrap();
        let stale = dir.path().join("hybrid").join("x.nprf.tmp");
        fs::write(&stale, b"partial").unwrap();

        let _store = DirectoryProfileStore::open(dir.path(), PersistentConfig::default()).unwrap();
        assert!(!stale.exists());
    }
}
