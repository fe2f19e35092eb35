//! Error types for the profiling engine.
//!
//! All errors are strongly typed using thiserror, so callers can
//! pattern match on the failure that stopped an assessment or a hybrid.

use thiserror::Error;

use crate::profile::ProfileId;
use crate::storage::StorageError;

/// Errors raised while deriving features from a single response.
///
/// These are recoverable: the assembler degrades them into a
/// low-confidence feature set instead of aborting the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Response text contains no word tokens ({length} chars)")]
    Unparseable {
        length: usize,
    },

    #[error("Unknown forced-choice code '{code}'")]
    UnknownChoiceCode {
        code: String,
    },
}

/// Reasons a hybrid request is rejected before any computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HybridRequestError {
    #[error("A hybrid needs at least {required} source entries, got {actual}")]
    TooFewSources {
        required: usize,
        actual: usize,
    },

    #[error("Weight {weight} for profile {id} must be finite and greater than zero")]
    InvalidWeight {
        id: ProfileId,
        weight: f64,
    },

    #[error("Got {weights} weights for {profiles} profiles")]
    WeightCountMismatch {
        profiles: usize,
        weights: usize,
    },

    #[error("Source profile not found: {id}")]
    UnknownProfile {
        id: ProfileId,
    },

    #[error("Use case tag cannot be empty")]
    EmptyUseCase,
}

/// Top-level error type for the profiling engine.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Insufficient data: {actual} responses supplied, at least {required} required")]
    InsufficientData {
        required: usize,
        actual: usize,
    },

    #[error("Invalid hybrid request: {0}")]
    InvalidHybridRequest(#[from] HybridRequestError),

    #[error("Source profile {id} disappeared before the hybrid was committed")]
    SourceProfileMissing {
        id: ProfileId,
    },

    #[error("Cycle detected: input {input} already descends from {ancestor} at depth {depth}")]
    CycleDetected {
        input: ProfileId,
        ancestor: ProfileId,
        depth: usize,
    },

    #[error("Lineage of {input} exceeds {limit} generations and cannot be verified")]
    LineageTooDeep {
        input: ProfileId,
        limit: usize,
    },

    #[error("Profile not found: {id}")]
    NotFound {
        id: ProfileId,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {message}")]
    Config {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ProfileError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a rejected hybrid request.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidHybridRequest(_))
    }

    /// Returns true if the assessment was too short.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if the same call may succeed when retried.
    ///
    /// Only the snapshot/commit race is retryable; every other failure
    /// depends on the inputs alone.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceProfileMissing { .. })
    }

    /// Returns true if the input set is rejected for good.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected { .. } | Self::LineageTooDeep { .. } | Self::InvalidHybridRequest(_)
        )
    }
}

/// Result type alias for engine operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
