//! Profiling engine facade.
//!
//! `ProfilingEngine` ties the assembler and the hybridizer to one
//! explicitly supplied repository. It holds no state of its own besides
//! the configuration, so clones share the same store.

use std::sync::Arc;

use serde::Serialize;

use crate::assembler::ProfileAssembler;
use crate::config::EngineConfig;
use crate::error::{ProfileError, ProfileResult};
use crate::hybrid::{compatibility_score, tensions, HybridRequest, Hybridizer};
use crate::narrative::{complementary_traits, HybridizationPotential};
use crate::profile::{CognitiveProfile, HybridProfile, ProfileId, ProfileSource, ProfileSummary};
use crate::response::ResponseRecord;
use crate::storage::{ProfileStore, StorageError};
use crate::trait_vector::TraitVector;

/// Repository counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub total: usize,
    pub assessments: usize,
    pub hybrids: usize,
    pub oldest: Option<ProfileId>,
    pub newest: Option<ProfileId>,
}

/// Derived, non-persisted guidance for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInsights {
    pub complementary_traits: Vec<String>,
    pub potential: HybridizationPotential,
    /// Use-case suggestions; empty for assessment profiles.
    pub suggestions: Vec<&'static str>,
    /// Tensions between the still-stored sources of a hybrid.
    pub tensions: Vec<String>,
}

/// Cognitive profiling engine.
#[derive(Clone)]
pub struct ProfilingEngine {
    store: Arc<dyn ProfileStore>,
    assembler: ProfileAssembler,
    hybridizer: Hybridizer,
}

impl ProfilingEngine {
    /// Create an engine over the given store.
    ///
    /// # Errors
    /// `Config` if the configuration does not validate.
    pub fn new(store: Arc<dyn ProfileStore>, config: EngineConfig) -> ProfileResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            hybridizer: Hybridizer::new(Arc::clone(&store), config.clone()),
            assembler: ProfileAssembler::new(config),
            store,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        self.assembler.config()
    }

    /// Assemble a profile from a session and persist it.
    ///
    /// # Errors
    /// - `InsufficientData` when the session is shorter than `min_responses`
    /// - `Storage` if the profile cannot be written
    pub fn assess(&self, responses: &[ResponseRecord]) -> ProfileResult<CognitiveProfile> {
        let profile = self.assembler.assemble(responses)?;
        self.store.put(profile.clone())?;
        tracing::info!(
            profile_id = %profile.id,
            signature = %profile.signature,
            responses = responses.len(),
            confidence = profile.quality.confidence,
            "persisted assessment profile"
        );
        Ok(profile)
    }

    /// Blend stored profiles into a new persisted hybrid.
    ///
    /// # Errors
    /// See [`Hybridizer::hybridize`].
    pub fn hybridize(&self, request: &HybridRequest) -> ProfileResult<HybridProfile> {
        self.hybridizer.hybridize(request)
    }

    /// # Errors
    /// `NotFound` if no profile has this id; `Storage` on backend failure.
    pub fn get(&self, id: &ProfileId) -> ProfileResult<CognitiveProfile> {
        self.store
            .get(id)?
            .ok_or(ProfileError::NotFound { id: *id })
    }

    /// All profiles, oldest first.
    ///
    /// # Errors
    /// `Storage` on backend failure.
    pub fn list(&self) -> ProfileResult<Vec<ProfileSummary>> {
        Ok(self.store.list()?)
    }

    /// # Errors
    /// `Storage` on backend failure.
    pub fn list_by_source(&self, source: ProfileSource) -> ProfileResult<Vec<ProfileSummary>> {
        let mut all = self.store.list()?;
        all.retain(|s| s.source == source);
        Ok(all)
    }

    /// Delete a profile. Hybrids built from it keep their recorded lineage.
    ///
    /// # Errors
    /// `NotFound` if nothing was deleted; `Storage` on backend failure.
    pub fn delete(&self, id: &ProfileId) -> ProfileResult<()> {
        if self.store.delete(id)? {
            tracing::info!(profile_id = %id, "deleted profile");
            Ok(())
        } else {
            Err(ProfileError::NotFound { id: *id })
        }
    }

    /// Assessment profiles at least `threshold` compatible with `id`, best first.
    ///
    /// # Errors
    /// `NotFound` if `id` is unknown; `Storage` on backend failure.
    pub fn find_compatible(
        &self,
        id: &ProfileId,
        threshold: f64,
    ) -> ProfileResult<Vec<(ProfileSummary, f64)>> {
        let target = self.get(id)?;

        let mut matches = Vec::new();
        for summary in self.list_by_source(ProfileSource::Assessment)? {
            if summary.id == target.id {
                continue;
            }
            // Deleted since listing.
            let Some(other) = self.store.get(&summary.id)? else {
                continue;
            };
            let score = compatibility_score(&[(&target.traits, 1.0), (&other.traits, 1.0)]);
            if score >= threshold {
                matches.push((summary, score));
            }
        }
        matches.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        Ok(matches)
    }

    /// # Errors
    /// `Storage` on backend failure.
    pub fn stats(&self) -> ProfileResult<ProfileStats> {
        let all = self.store.list()?;
        let hybrids = all.iter().filter(|s| s.source == ProfileSource::Hybrid).count();
        Ok(ProfileStats {
            total: all.len(),
            assessments: all.len() - hybrids,
            hybrids,
            oldest: all.iter().min_by_key(|s| (s.created_at, s.id)).map(|s| s.id),
            newest: all.iter().max_by_key(|s| (s.created_at, s.id)).map(|s| s.id),
        })
    }

    /// Complementary traits, hybridization potential and, for hybrids,
    /// use-case suggestions and source tensions.
    ///
    /// # Errors
    /// `NotFound` if `id` is unknown; `Storage` on backend failure.
    pub fn insights(&self, id: &ProfileId) -> ProfileResult<ProfileInsights> {
        let profile = self.get(id)?;

        let (suggestions, tensions) = match HybridProfile::try_from(profile.clone()) {
            Ok(hybrid) => {
                let sources = self.stored_source_traits(&hybrid)?;
                let refs: Vec<&TraitVector> = sources.iter().collect();
                (
                    hybrid.use_case().optimization_suggestions(&hybrid.traits),
                    tensions(&refs),
                )
            }
            Err(_) => (Vec::new(), Vec::new()),
        };

        Ok(ProfileInsights {
            complementary_traits: complementary_traits(&profile.traits),
            potential: HybridizationPotential::assess(&profile.traits),
            suggestions,
            tensions,
        })
    }

    fn stored_source_traits(&self, hybrid: &HybridProfile) -> Result<Vec<TraitVector>, StorageError> {
        let mut out = Vec::new();
        for id in hybrid.parent_ids() {
            if let Some(p) = self.store.get(&id)? {
                out.push(p.traits);
            }
        }
        Ok(out)
    }
}
