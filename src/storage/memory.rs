//! In-memory storage backend.
//!
//! Thread-safe in-memory implementation of `ProfileStore`, intended for
//! embedded usage and tests.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::profile::{CognitiveProfile, ProfileId, ProfileSummary};
use crate::storage::traits::{ProfileStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// In-memory profile store keyed by time-ordered ID.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<BTreeMap<ProfileId, CognitiveProfile>>,
}

impl InMemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub fn len(&self) -> Result<usize, StorageError> {
        let profiles = self.profiles.read().map_err(|_| lock_err("profiles.read"))?;
        Ok(profiles.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, id: &ProfileId) -> Result<Option<CognitiveProfile>, StorageError> {
        let profiles = self.profiles.read().map_err(|_| lock_err("profiles.read"))?;
        Ok(profiles.get(id).cloned())
    }

    fn put(&self, profile: CognitiveProfile) -> Result<(), StorageError> {
        let mut profiles = self.profiles.write().map_err(|_| lock_err("profiles.write"))?;
        if profiles.contains_key(&profile.id) {
            return Err(StorageError::DuplicateKey(profile.id.to_string()));
        }
        profiles.insert(profile.id, profile);
        Ok(())
    }

    fn put_derived(
        &self,
        profile: CognitiveProfile,
        sources: &[ProfileId],
    ) -> Result<(), StorageError> {
        let mut profiles = self.profiles.write().map_err(|_| lock_err("profiles.write"))?;
        if let Some(missing) = sources.iter().find(|id| !profiles.contains_key(id)) {
            return Err(StorageError::MissingSource(*missing));
        }
        if profiles.contains_key(&profile.id) {
            return Err(StorageError::DuplicateKey(profile.id.to_string()));
        }
        profiles.insert(profile.id, profile);
        Ok(())
    }

    fn delete(&self, id: &ProfileId) -> Result<bool, StorageError> {
        let mut profiles = self.profiles.write().map_err(|_| lock_err("profiles.write"))?;
        Ok(profiles.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<ProfileSummary>, StorageError> {
        let profiles = self.profiles.read().map_err(|_| lock_err("profiles.read"))?;
        Ok(profiles.values().map(CognitiveProfile::summary).collect())
    }

    fn contains(&self, id: &ProfileId) -> Result<bool, StorageError> {
        let profiles = self.profiles.read().map_err(|_| lock_err("profiles.read"))?;
        Ok(profiles.contains_key(id))
    }
}
