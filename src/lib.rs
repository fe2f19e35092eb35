//! # neuroprofile - cognitive profiling from free-text responses
//!
//! neuroprofile turns a short session of scenario responses into a
//! seven-trait cognitive profile, encodes it as a compact signature, and
//! blends stored profiles into use-case-tuned hybrids.
//!
//! ## Core Concepts
//!
//! - **ResponseRecord**: One free-text answer, optionally with a forced-choice code
//! - **TraitVector**: Seven scores in [0, 1], neutral at 0.5
//! - **CognitiveProfile**: Traits, signature, narrative and provenance
//! - **HybridProfile**: A profile blended from weighted sources for a use case
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use neuroprofile::{
//!     EngineConfig, HybridRequest, InMemoryProfileStore, ProfilingEngine, ResponseRecord,
//!     ScenarioKind, UseCase,
//! };
//!
//! let engine = ProfilingEngine::new(Arc::new(InMemoryProfileStore::new()), EngineConfig::default())?;
//! let alice = engine.assess(&[
//!     ResponseRecord::new("I break the problem into steps.", ScenarioKind::ProblemSolving),
//!     ResponseRecord::new("I'd talk it through with the team.", ScenarioKind::PersonalityChat),
//!     ResponseRecord::new("", ScenarioKind::ProblemSolving).with_choice("A"),
//! ])?;
//! println!("{}", alice.signature);
//!
//! // ... assess `bob` the same way
//! let hybrid = engine.hybridize(
//!     &HybridRequest::new(UseCase::Leadership)
//!         .source(alice.id, 0.6)
//!         .source(bob.id, 0.4),
//! )?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod error;
pub mod profile;
pub mod response;
pub mod signature;
pub mod trait_vector;
pub mod use_case;

// Assessment pipeline
pub mod assembler;
pub mod features;
pub mod narrative;
pub mod scoring;

// Hybridization, storage and the facade
pub mod config;
pub mod engine;
pub mod export;
pub mod hybrid;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use assembler::ProfileAssembler;
pub use config::EngineConfig;
pub use engine::{ProfileInsights, ProfileStats, ProfilingEngine};
pub use error::{ExtractionError, HybridRequestError, ProfileError, ProfileResult};
pub use features::{extract, extract_or_degrade, Feature, FeatureSet};
pub use hybrid::{blend, compatibility_score, HybridRequest, Hybridizer};
pub use narrative::{HybridizationDifficulty, HybridizationPotential, Narrative};
pub use profile::{
    CognitiveProfile, DataCompleteness, HybridProfile, ProfileId, ProfileQuality, ProfileSource,
    ProfileSummary, SourceWeight,
};
pub use response::{ChoiceOption, ResponseId, ResponseRecord, ScenarioKind};
pub use signature::{encode, Signature, Tier};
pub use storage::{InMemoryProfileStore, ProfileStore, StorageError};
pub use trait_vector::{CognitiveTrait, PartialTraitVector, TraitVector};
pub use use_case::UseCase;

#[cfg(feature = "persistent")]
pub use storage::persistent::{open_store, DirectoryProfileStore, PersistentConfig};
