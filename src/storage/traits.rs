//! Abstract storage traits for profile repositories.
//!
//! The engine only talks to storage through `ProfileStore`, so the same
//! profiling code runs against the in-memory store in tests and the
//! directory store in production.

use thiserror::Error;

use crate::profile::{CognitiveProfile, ProfileId, ProfileSummary};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A derived profile referenced a source that is no longer stored.
    #[error("Missing source profile: {0}")]
    MissingSource(ProfileId),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value repository for cognitive profiles.
///
/// # Safety Considerations
/// - All mutations are atomic from the caller's perspective
/// - Implementations must handle concurrent access safely
pub trait ProfileStore: Send + Sync {
    /// Get a profile by ID.
    fn get(&self, id: &ProfileId) -> Result<Option<CognitiveProfile>, StorageError>;

    /// Insert a new profile. Returns error if ID already exists.
    fn put(&self, profile: CognitiveProfile) -> Result<(), StorageError>;

    /// Insert a profile derived from `sources`.
    ///
    /// The existence check and the write happen under one lock, so a
    /// concurrent delete of any source makes this fail with
    /// `MissingSource` instead of committing a dangling lineage.
    fn put_derived(
        &self,
        profile: CognitiveProfile,
        sources: &[ProfileId],
    ) -> Result<(), StorageError>;

    /// Delete a profile. Returns false if it was not stored.
    fn delete(&self, id: &ProfileId) -> Result<bool, StorageError>;

    /// Summaries of every stored profile, ordered by ID (oldest first).
    fn list(&self) -> Result<Vec<ProfileSummary>, StorageError>;

    /// Returns true if a profile with this ID is stored.
    fn contains(&self, id: &ProfileId) -> Result<bool, StorageError> {
        Ok(self.get(id)?.is_some())
    }
}
