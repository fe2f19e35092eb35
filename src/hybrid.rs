//! Profile hybridization.
//!
//! A hybrid is built in four steps:
//! 1. validate the request and coalesce duplicate ids
//! 2. snapshot every source profile from the store
//! 3. reject inputs whose lineages overlap too deeply
//! 4. blend, boost for the use case, and commit with a source check
//!
//! The blend and the compatibility score are pure functions over trait
//! vectors; only steps 2 and 4 touch the store.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::Utc;

use crate::config::EngineConfig;
use crate::error::{HybridRequestError, ProfileError, ProfileResult};
use crate::profile::{CognitiveProfile, HybridProfile, ProfileId, ProfileQuality, SourceWeight};
use crate::signature::Tier;
use crate::storage::{ProfileStore, StorageError};
use crate::trait_vector::{CognitiveTrait, TraitVector};
use crate::use_case::UseCase;

/// Fewest entries a hybrid request may name.
pub const MIN_SOURCES: usize = 2;

/// Hard bound on ancestry walks, independent of configuration.
const MAX_ANCESTRY_HOPS: usize = 128;

/// Spread between inputs above which a trait is reported as divergent.
const DIVERGENCE_CUT: f64 = 0.5;

/// A request to blend existing profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridRequest {
    /// `(profile id, weight)` in caller order. Weights need not sum to 1.
    pub sources: Vec<(ProfileId, f64)>,
    pub use_case: UseCase,
}

impl HybridRequest {
    #[must_use]
    pub const fn new(use_case: UseCase) -> Self {
        Self {
            sources: Vec::new(),
            use_case,
        }
    }

    /// Add a weighted source.
    #[must_use]
    pub fn source(mut self, id: ProfileId, weight: f64) -> Self {
        self.sources.push((id, weight));
        self
    }

    /// Build a request from parallel id and weight lists and a free-form tag.
    ///
    /// # Errors
    /// - `WeightCountMismatch` if the lists differ in length
    /// - `EmptyUseCase` if the tag is blank
    pub fn from_parts(
        ids: &[ProfileId],
        weights: &[f64],
        use_case: &str,
    ) -> Result<Self, HybridRequestError> {
        if ids.len() != weights.len() {
            return Err(HybridRequestError::WeightCountMismatch {
                profiles: ids.len(),
                weights: weights.len(),
            });
        }
        Ok(Self {
            sources: ids.iter().copied().zip(weights.iter().copied()).collect(),
            use_case: use_case.parse()?,
        })
    }

    /// Validate and return the distinct sources with weights normalized to sum to 1.
    ///
    /// Duplicate ids are coalesced: their weights are summed and the first
    /// position is kept.
    ///
    /// # Errors
    /// - `TooFewSources` with fewer than two entries
    /// - `InvalidWeight` for a weight that is not finite and positive
    pub fn normalized_sources(&self) -> Result<Vec<(ProfileId, f64)>, HybridRequestError> {
        if self.sources.len() < MIN_SOURCES {
            return Err(HybridRequestError::TooFewSources {
                required: MIN_SOURCES,
                actual: self.sources.len(),
            });
        }

        let mut distinct: Vec<(ProfileId, f64)> = Vec::with_capacity(self.sources.len());
        for &(id, weight) in &self.sources {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(HybridRequestError::InvalidWeight { id, weight });
            }
            match distinct.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, total)) => *total += weight,
                None => distinct.push((id, weight)),
            }
        }

        let total: f64 = distinct.iter().map(|(_, w)| w).sum();
        for (_, w) in &mut distinct {
            *w /= total;
        }
        Ok(distinct)
    }
}

/// Weighted arithmetic mean of trait vectors.
///
/// Weights are normalized internally; an empty input yields the neutral vector.
#[must_use]
pub fn blend(inputs: &[(&TraitVector, f64)]) -> TraitVector {
    let total: f64 = inputs.iter().map(|(_, w)| w).sum();
    if inputs.is_empty() || total <= 0.0 {
        return TraitVector::neutral();
    }

    let mut out = TraitVector::neutral();
    for t in CognitiveTrait::ALL {
        let mean = inputs.iter().map(|(v, w)| v.get(t) * w).sum::<f64>() / total;
        out.set(t, mean);
    }
    out
}

/// `1 - weighted mean pairwise distance` between inputs, in [0, 1].
///
/// Each pair is weighted by `w_i * w_j`; distance is L1 over trait count.
/// With fewer than two inputs there is nothing to disagree, so the score is 1.
#[must_use]
pub fn compatibility_score(inputs: &[(&TraitVector, f64)]) -> f64 {
    let mut weighted_distance = 0.0;
    let mut pair_weight = 0.0;
    for (i, (a, wa)) in inputs.iter().enumerate() {
        for (b, wb) in &inputs[i + 1..] {
            let w = wa * wb;
            weighted_distance += w * a.normalized_l1_distance(b);
            pair_weight += w;
        }
    }
    if pair_weight <= 0.0 {
        return 1.0;
    }
    (1.0 - weighted_distance / pair_weight).clamp(0.0, 1.0)
}

/// Informational tensions between the inputs of a hybrid.
///
/// Never blocks creation; surfaced so callers can warn about the blend.
#[must_use]
pub fn tensions(inputs: &[&TraitVector]) -> Vec<String> {
    let mut out = Vec::new();
    if inputs.len() < 2 {
        return out;
    }

    let max = |t: CognitiveTrait| inputs.iter().map(|v| v.get(t)).fold(f64::MIN, f64::max);
    let min = |t: CognitiveTrait| inputs.iter().map(|v| v.get(t)).fold(f64::MAX, f64::min);
    let has_tier = |t: CognitiveTrait, tier: Tier| inputs.iter().any(|v| Tier::of(v.get(t)) == tier);

    if max(CognitiveTrait::Analytical) > 0.8 && max(CognitiveTrait::Intuitive) > 0.8 {
        out.push("analytical_intuitive_tension".to_string());
    }
    if has_tier(CognitiveTrait::RiskTolerance, Tier::High)
        && has_tier(CognitiveTrait::RiskTolerance, Tier::Low)
    {
        out.push("risk_tolerance_conflict".to_string());
    }
    if has_tier(CognitiveTrait::Decisiveness, Tier::High)
        && has_tier(CognitiveTrait::Decisiveness, Tier::Low)
    {
        out.push("decision_speed_tension".to_string());
    }
    for t in CognitiveTrait::ALL {
        if max(t) - min(t) > DIVERGENCE_CUT {
            out.push(format!("divergent_{t}"));
        }
    }
    out
}

/// Blends stored profiles into new hybrid profiles.
#[derive(Clone)]
pub struct Hybridizer {
    store: Arc<dyn ProfileStore>,
    config: EngineConfig,
}

impl Hybridizer {
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Create and persist a hybrid profile.
    ///
    /// # Errors
    /// - `InvalidHybridRequest` for bad weights, too few sources or an unknown id
    /// - `CycleDetected` when input lineages overlap beyond `max_ancestry_depth`
    /// - `LineageTooDeep` when an input lineage is too long to verify
    /// - `SourceProfileMissing` when a source is deleted before the commit
    /// - `Storage` for backend failures
    pub fn hybridize(&self, request: &HybridRequest) -> ProfileResult<HybridProfile> {
        let sources = request.normalized_sources()?;

        // Snapshot every source before computing anything.
        let mut snapshot: Vec<(CognitiveProfile, f64)> = Vec::with_capacity(sources.len());
        for (id, weight) in &sources {
            let profile = self
                .store
                .get(id)?
                .ok_or(HybridRequestError::UnknownProfile { id: *id })?;
            snapshot.push((profile, *weight));
        }

        self.check_ancestry(&snapshot)?;

        let hybrid = self.compose(&snapshot, &request.use_case);
        let source_ids: Vec<ProfileId> = sources.iter().map(|(id, _)| *id).collect();

        self.store
            .put_derived(hybrid.clone().into_profile(), &source_ids)
            .map_err(|e| match e {
                StorageError::MissingSource(id) => ProfileError::SourceProfileMissing { id },
                other => ProfileError::Storage(other),
            })?;

        tracing::info!(
            profile_id = %hybrid.id,
            sources = source_ids.len(),
            use_case = %hybrid.use_case(),
            signature = %hybrid.signature,
            compatibility = hybrid.compatibility_score(),
            "persisted hybrid profile"
        );
        Ok(hybrid)
    }

    /// Pure part of hybridization over an already-taken snapshot.
    #[must_use]
    pub fn compose(&self, snapshot: &[(CognitiveProfile, f64)], use_case: &UseCase) -> HybridProfile {
        let inputs: Vec<(&TraitVector, f64)> = snapshot.iter().map(|(p, w)| (&p.traits, *w)).collect();

        let blended = blend(&inputs);
        let compatibility = compatibility_score(&inputs);
        let traits = use_case.apply(&blended, self.config.max_boost);

        let weights = snapshot
            .iter()
            .map(|(p, w)| SourceWeight {
                profile_id: p.id,
                weight: *w,
            })
            .collect();

        let quality =
            ProfileQuality::blend(&snapshot.iter().map(|(p, w)| (p.quality, *w)).collect::<Vec<_>>());

        let created_at = Utc::now();
        HybridProfile::new(
            ProfileId::at(created_at),
            traits,
            weights,
            use_case.clone(),
            compatibility,
            created_at,
        )
        .with_quality(quality)
    }

    /// Reject input sets whose lineages are cyclic or overlap too deeply.
    ///
    /// Depth is measured along the shortest path: the walk is breadth-first
    /// and each ancestor is judged once, at its first visit. Another input
    /// may appear among an input's ancestors down to `max_ancestry_depth`;
    /// an input among its own ancestors is a corrupt lineage. Deleted
    /// ancestors end their branch of the walk.
    fn check_ancestry(&self, snapshot: &[(CognitiveProfile, f64)]) -> ProfileResult<()> {
        let input_ids: HashSet<ProfileId> = snapshot.iter().map(|(p, _)| p.id).collect();

        for (input, _) in snapshot {
            let mut visited: HashSet<ProfileId> = HashSet::new();
            let mut queue: VecDeque<(ProfileId, usize)> =
                input.parent_ids().map(|id| (id, 1)).collect();

            while let Some((id, depth)) = queue.pop_front() {
                if !visited.insert(id) {
                    continue;
                }
                if depth > MAX_ANCESTRY_HOPS {
                    tracing::warn!(input = %input.id, limit = MAX_ANCESTRY_HOPS, "lineage too deep to verify");
                    return Err(ProfileError::LineageTooDeep {
                        input: input.id,
                        limit: MAX_ANCESTRY_HOPS,
                    });
                }

                let own_ancestor = id == input.id;
                let deep_overlap =
                    input_ids.contains(&id) && depth > self.config.max_ancestry_depth;
                if own_ancestor || deep_overlap {
                    tracing::warn!(
                        input = %input.id,
                        ancestor = %id,
                        depth,
                        "rejecting hybrid request with cyclic lineage"
                    );
                    return Err(ProfileError::CycleDetected {
                        input: input.id,
                        ancestor: id,
                        depth,
                    });
                }

                if let Some(ancestor) = self.store.get(&id)? {
                    queue.extend(ancestor.parent_ids().map(|p| (p, depth + 1)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DataCompleteness;
    use crate::storage::InMemoryProfileStore;

    fn assessed(pairs: &[(CognitiveTrait, f64)]) -> CognitiveProfile {
        let traits = TraitVector::from_pairs(pairs.iter().copied());
        CognitiveProfile::assessed(ProfileId::new(), traits, Vec::new(), Utc::now())
    }

    fn hybrid_of(parents: &[ProfileId]) -> CognitiveProfile {
        let weight = 1.0 / parents.len() as f64;
        let sources = parents
            .iter()
            .map(|id| SourceWeight {
                profile_id: *id,
                weight,
            })
            .collect();
        HybridProfile::new(
            ProfileId::new(),
            TraitVector::neutral(),
            sources,
            UseCase::General,
            1.0,
            Utc::now(),
        )
        .into_profile()
    }

    fn setup() -> (Arc<InMemoryProfileStore>, Hybridizer) {
        let store = Arc::new(InMemoryProfileStore::new());
        let hybridizer = Hybridizer::new(store.clone(), EngineConfig::default());
        (store, hybridizer)
    }

    #[test]
    fn request_needs_two_entries() {
        let req = HybridRequest::new(UseCase::General).source(ProfileId::new(), 1.0);
        assert_eq!(
            req.normalized_sources().unwrap_err(),
            HybridRequestError::TooFewSources {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn request_rejects_bad_weights() {
        let id = ProfileId::new();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let req = HybridRequest::new(UseCase::General)
                .source(ProfileId::new(), 1.0)
                .source(id, bad);
            assert!(matches!(
                req.normalized_sources().unwrap_err(),
                HybridRequestError::InvalidWeight { id: got, .. } if got == id
            ));
        }
    }

    #[test]
    fn request_from_parts_checks_lengths() {
        let ids = [ProfileId::new(), ProfileId::new()];
        let err = HybridRequest::from_parts(&ids, &[1.0], "leadership").unwrap_err();
        assert_eq!(
            err,
            HybridRequestError::WeightCountMismatch {
                profiles: 2,
                weights: 1
            }
        );
        let req = HybridRequest::from_parts(&ids, &[1.0, 3.0], "Leadership").unwrap();
        assert_eq!(req.use_case, UseCase::Leadership);
    }

    #[test]
    fn duplicates_coalesce_and_normalize() {
        let a = ProfileId::new();
        let b = ProfileId::new();
        let req = HybridRequest::new(UseCase::General)
            .source(a, 1.0)
            .source(b, 2.0)
            .source(a, 1.0);
        let sources = req.normalized_sources().unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].0, a);
        assert!((sources[0].1 - 0.5).abs() < 1e-12);
        assert!((sources[1].1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn compatibility_is_one_for_identical_vectors() {
        let v = TraitVector::neutral().with(CognitiveTrait::Creative, 0.9);
        assert!((compatibility_score(&[(&v, 0.3), (&v, 0.7)]) - 1.0).abs() < 1e-12);
        assert!((compatibility_score(&[(&v, 1.0)]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn compatibility_decreases_with_distance() {
        let base = TraitVector::neutral();
        let mut last = compatibility_score(&[(&base, 0.5), (&base, 0.5)]);
        for step in 1..=5 {
            let other = base.with(CognitiveTrait::Analytical, 0.5 + 0.1 * f64::from(step));
            let score = compatibility_score(&[(&base, 0.5), (&other, 0.5)]);
            assert!(score < last, "step {step}: {score} !< {last}");
            last = score;
        }
    }

    #[test]
    fn blend_is_weighted_mean() {
        let a = TraitVector::neutral().with(CognitiveTrait::Systematic, 1.0);
        let b = TraitVector::neutral().with(CognitiveTrait::Systematic, 0.0);
        let v = blend(&[(&a, 3.0), (&b, 1.0)]);
        assert!((v.get(CognitiveTrait::Systematic) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn leadership_scenario() {
        let (store, hybridizer) = setup();
        let a = assessed(&[(CognitiveTrait::Analytical, 0.9), (CognitiveTrait::Interpersonal, 0.2)]);
        let b = assessed(&[(CognitiveTrait::Analytical, 0.3), (CognitiveTrait::Interpersonal, 0.8)]);
        store.put(a.clone()).unwrap();
        store.put(b.clone()).unwrap();

        let raw = blend(&[(&a.traits, 0.6), (&b.traits, 0.4)]);
        assert!((raw.get(CognitiveTrait::Analytical) - 0.66).abs() < 1e-9);
        assert!((raw.get(CognitiveTrait::Interpersonal) - 0.44).abs() < 1e-9);

        let req = HybridRequest::new(UseCase::Leadership)
            .source(a.id, 0.6)
            .source(b.id, 0.4);
        let h = hybridizer.hybridize(&req).unwrap();
        assert!((h.traits.get(CognitiveTrait::Analytical) - 0.76).abs() < 1e-9);
        assert!((h.traits.get(CognitiveTrait::Interpersonal) - 0.54).abs() < 1e-9);
        assert_eq!(h.signature.top_trait(), Some(CognitiveTrait::Analytical));
        assert_eq!(h.sources().len(), 2);
        assert!((h.sources()[0].weight - 0.6).abs() < 1e-12);
        assert!(store.contains(&h.id).unwrap());
    }

    #[test]
    fn hybrid_quality_follows_its_sources() {
        let (store, hybridizer) = setup();
        let a = assessed(&[]).with_quality(ProfileQuality::new(1.0, DataCompleteness::Complete));
        let b = assessed(&[]).with_quality(ProfileQuality::new(0.2, DataCompleteness::Partial));
        store.put(a.clone()).unwrap();
        store.put(b.clone()).unwrap();

        let req = HybridRequest::new(UseCase::General).source(a.id, 3.0).source(b.id, 1.0);
        let h = hybridizer.hybridize(&req).unwrap();
        assert!((h.quality.confidence - 0.8).abs() < 1e-12);
        assert_eq!(h.quality.completeness, DataCompleteness::Partial);
        assert_eq!(store.get(&h.id).unwrap().unwrap().quality, h.quality);
    }

    #[test]
    fn self_hybridization_is_identity() {
        let (store, hybridizer) = setup();
        let a = assessed(&[(CognitiveTrait::Creative, 0.83), (CognitiveTrait::Decisiveness, 0.12)]);
        store.put(a.clone()).unwrap();

        let req = HybridRequest::new(UseCase::General).source(a.id, 1.0).source(a.id, 1.0);
        let h = hybridizer.hybridize(&req).unwrap();
        assert_eq!(h.traits, a.traits);
        assert_eq!(h.signature, a.signature);
        assert_eq!(h.sources().len(), 1);
        assert!((h.compatibility_score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_source_is_invalid_request() {
        let (store, hybridizer) = setup();
        let a = assessed(&[]);
        store.put(a.clone()).unwrap();
        let ghost = ProfileId::new();

        let req = HybridRequest::new(UseCase::General).source(a.id, 1.0).source(ghost, 1.0);
        let err = hybridizer.hybridize(&req).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::InvalidHybridRequest(HybridRequestError::UnknownProfile { id }) if id == ghost
        ));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn deep_overlap_is_rejected_shallow_allowed() {
        let (store, hybridizer) = setup();
        let root = assessed(&[(CognitiveTrait::Analytical, 0.8)]);
        store.put(root.clone()).unwrap();

        // chain[k] has `root` at ancestry depth k + 1.
        let mut chain = Vec::new();
        let mut parent = root.id;
        for _ in 0..6 {
            let filler = assessed(&[]);
            store.put(filler.clone()).unwrap();
            let h = hybrid_of(&[parent, filler.id]);
            store.put(h.clone()).unwrap();
            parent = h.id;
            chain.push(h);
        }

        let shallow = HybridRequest::new(UseCase::General)
            .source(chain[4].id, 1.0)
            .source(root.id, 1.0);
        assert!(hybridizer.hybridize(&shallow).is_ok());

        let deep = HybridRequest::new(UseCase::General)
            .source(chain[5].id, 1.0)
            .source(root.id, 1.0);
        let err = hybridizer.hybridize(&deep).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::CycleDetected { input, ancestor, depth: 6 }
                if input == chain[5].id && ancestor == root.id
        ));
        assert!(err.is_permanent());
    }

    /// `root`, plus a chain whose k-th element has `root` at depth k + 1.
    fn chain_from_root(store: &InMemoryProfileStore, len: usize) -> (CognitiveProfile, Vec<CognitiveProfile>) {
        let root = assessed(&[(CognitiveTrait::Analytical, 0.8)]);
        store.put(root.clone()).unwrap();
        let mut chain = Vec::new();
        let mut parent = root.id;
        for _ in 0..len {
            let filler = assessed(&[]);
            store.put(filler.clone()).unwrap();
            let h = hybrid_of(&[parent, filler.id]);
            store.put(h.clone()).unwrap();
            parent = h.id;
            chain.push(h);
        }
        (root, chain)
    }

    #[test]
    fn direct_parent_diamond_is_judged_by_shortest_path() {
        let (store, hybridizer) = setup();
        let (root, chain) = chain_from_root(&store, 5);
        // `root` is a direct parent of `x` and also 6 levels down through chain[4].
        let x = hybrid_of(&[root.id, chain[4].id]);
        store.put(x.clone()).unwrap();

        let req = HybridRequest::new(UseCase::General).source(x.id, 1.0).source(root.id, 1.0);
        assert!(hybridizer.hybridize(&req).is_ok());
    }

    #[test]
    fn shared_intermediate_diamond_is_judged_by_shortest_path() {
        let (store, hybridizer) = setup();
        let (root, chain) = chain_from_root(&store, 6);
        // `root` sits at depth 2 through `near` and depth 7 through chain[5].
        let filler = assessed(&[]);
        store.put(filler.clone()).unwrap();
        let near = hybrid_of(&[root.id, filler.id]);
        store.put(near.clone()).unwrap();
        let x = hybrid_of(&[near.id, chain[5].id]);
        store.put(x.clone()).unwrap();

        let req = HybridRequest::new(UseCase::General).source(x.id, 1.0).source(root.id, 1.0);
        assert!(hybridizer.hybridize(&req).is_ok());

        // Without the short path the same overlap is too deep.
        let deep = HybridRequest::new(UseCase::General)
            .source(chain[5].id, 1.0)
            .source(root.id, 1.0);
        assert!(matches!(
            hybridizer.hybridize(&deep).unwrap_err(),
            ProfileError::CycleDetected { depth: 6, .. }
        ));
    }

    #[test]
    fn overlong_lineage_is_not_reported_as_cycle() {
        let (store, hybridizer) = setup();
        let mut parent = assessed(&[]);
        store.put(parent.clone()).unwrap();
        for _ in 0..=MAX_ANCESTRY_HOPS {
            let h = hybrid_of(&[parent.id]);
            store.put(h.clone()).unwrap();
            parent = h;
        }
        let other = assessed(&[]);
        store.put(other.clone()).unwrap();

        let req = HybridRequest::new(UseCase::General).source(parent.id, 1.0).source(other.id, 1.0);
        let err = hybridizer.hybridize(&req).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::LineageTooDeep { input, limit: MAX_ANCESTRY_HOPS } if input == parent.id
        ));
        assert!(err.is_permanent());
    }

    #[test]
    fn corrupt_self_ancestry_is_rejected() {
        let (store, hybridizer) = setup();
        let other = assessed(&[]);
        store.put(other.clone()).unwrap();

        let mut a = hybrid_of(&[other.id, other.id]);
        let mut b = hybrid_of(&[other.id, other.id]);
        a.hybrid_sources = Some(vec![SourceWeight {
            profile_id: b.id,
            weight: 1.0,
        }]);
        b.hybrid_sources = Some(vec![SourceWeight {
            profile_id: a.id,
            weight: 1.0,
        }]);
        store.put(a.clone()).unwrap();
        store.put(b).unwrap();

        let req = HybridRequest::new(UseCase::General).source(a.id, 1.0).source(other.id, 1.0);
        let err = hybridizer.hybridize(&req).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::CycleDetected { input, ancestor, depth: 2 } if input == a.id && ancestor == a.id
        ));
    }

    /// Deletes the first source between snapshot and commit.
    struct VanishingStore {
        inner: InMemoryProfileStore,
    }

    impl ProfileStore for VanishingStore {
        fn get(&self, id: &ProfileId) -> Result<Option<CognitiveProfile>, StorageError> {
            self.inner.get(id)
        }

        fn put(&self, profile: CognitiveProfile) -> Result<(), StorageError> {
            self.inner.put(profile)
        }

        fn put_derived(
            &self,
            profile: CognitiveProfile,
            sources: &[ProfileId],
        ) -> Result<(), StorageError> {
            self.inner.delete(&sources[0])?;
            self.inner.put_derived(profile, sources)
        }

        fn delete(&self, id: &ProfileId) -> Result<bool, StorageError> {
            self.inner.delete(id)
        }

        fn list(&self) -> Result<Vec<crate::profile::ProfileSummary>, StorageError> {
            self.inner.list()
        }
    }

    #[test]
    fn source_deleted_before_commit_fails_whole_operation() {
        let store = Arc::new(VanishingStore {
            inner: InMemoryProfileStore::new(),
        });
        let a = assessed(&[(CognitiveTrait::Creative, 0.7)]);
        let b = assessed(&[(CognitiveTrait::Creative, 0.1)]);
        store.put(a.clone()).unwrap();
        store.put(b.clone()).unwrap();

        let hybridizer = Hybridizer::new(store.clone(), EngineConfig::default());
        let req = HybridRequest::new(UseCase::Innovation).source(a.id, 1.0).source(b.id, 1.0);
        let err = hybridizer.hybridize(&req).unwrap_err();
        assert!(matches!(err, ProfileError::SourceProfileMissing { id } if id == a.id));
        assert!(err.is_retryable());
        // Nothing but the surviving source is stored.
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn tensions_report_conflicts() {
        let a = TraitVector::neutral()
            .with(CognitiveTrait::Analytical, 0.9)
            .with(CognitiveTrait::RiskTolerance, 0.1)
            .with(CognitiveTrait::Decisiveness, 0.9);
        let b = TraitVector::neutral()
            .with(CognitiveTrait::Intuitive, 0.85)
            .with(CognitiveTrait::RiskTolerance, 0.9)
            .with(CognitiveTrait::Decisiveness, 0.2);
        let found = tensions(&[&a, &b]);
        assert!(found.contains(&"analytical_intuitive_tension".to_string()));
        assert!(found.contains(&"risk_tolerance_conflict".to_string()));
        assert!(found.contains(&"decision_speed_tension".to_string()));
        assert!(found.contains(&"divergent_risk_tolerance".to_string()));
        assert!(found.contains(&"divergent_decisiveness".to_string()));
        assert!(!found.contains(&"divergent_analytical".to_string()));

        assert!(tensions(&[&a, &a]).is_empty());
    }
}
