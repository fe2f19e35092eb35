//! Cognitive profiles and their identifiers.
//!
//! A `CognitiveProfile` is the persisted record for both assessment-derived
//! and hybrid profiles. `HybridProfile` wraps one that is guaranteed to
//! carry lineage, a use case and a compatibility score.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::{NoContext, Timestamp, Uuid};

use crate::error::ProfileError;
use crate::narrative::Narrative;
use crate::response::ResponseRecord;
use crate::signature::{self, Signature};
use crate::trait_vector::TraitVector;
use crate::use_case::UseCase;

/// Time-ordered profile identifier. Sorting ids sorts profiles by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Creates a new time-ordered profile ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an ID ordered at the given instant.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        let secs = u64::try_from(instant.timestamp()).unwrap_or(0);
        let ts = Timestamp::from_unix(NoContext, secs, instant.timestamp_subsec_nanos());
        Self(Uuid::new_v7(ts))
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProfileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Where a profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Assessment,
    Hybrid,
}

impl ProfileSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assessment => "assessment",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much usable evidence a session covered.
///
/// Ordered from weakest to strongest, so the minimum over a set of
/// profiles is the weakest link.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataCompleteness {
    #[default]
    Insufficient,
    Partial,
    Good,
    Complete,
}

impl DataCompleteness {
    /// Map the number of evidence kinds present (0 to 3) onto a level.
    #[must_use]
    pub const fn from_coverage(kinds: usize) -> Self {
        match kinds {
            0 => Self::Insufficient,
            1 => Self::Partial,
            2 => Self::Good,
            _ => Self::Complete,
        }
    }

    /// Expected consistency of a profile built from data this complete.
    #[must_use]
    pub const fn reliability(self) -> f64 {
        match self {
            Self::Complete | Self::Good => 0.8,
            Self::Partial => 0.6,
            Self::Insufficient => 0.4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insufficient => "insufficient",
            Self::Partial => "partial",
            Self::Good => "good",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for DataCompleteness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence behind a profile's traits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileQuality {
    /// Share of the session that carried usable signal, in [0, 1].
    pub confidence: f64,
    pub completeness: DataCompleteness,
}

impl ProfileQuality {
    #[must_use]
    pub fn new(confidence: f64, completeness: DataCompleteness) -> Self {
        Self {
            confidence: if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.0 },
            completeness,
        }
    }

    #[must_use]
    pub const fn reliability(&self) -> f64 {
        self.completeness.reliability()
    }

    /// Weighted mean confidence; completeness of the weakest input.
    #[must_use]
    pub fn blend(inputs: &[(ProfileQuality, f64)]) -> Self {
        let total: f64 = inputs.iter().map(|(_, w)| w).sum();
        let confidence = if total > 0.0 {
            inputs.iter().map(|(q, w)| q.confidence * w).sum::<f64>() / total
        } else {
            0.0
        };
        let completeness = inputs
            .iter()
            .map(|(q, _)| q.completeness)
            .min()
            .unwrap_or_default();
        Self::new(confidence, completeness)
    }
}

/// One contributing profile and its normalized weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeight {
    pub profile_id: ProfileId,
    pub weight: f64,
}

/// The persisted profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveProfile {
    pub id: ProfileId,
    pub source: ProfileSource,
    pub traits: TraitVector,
    pub signature: Signature,
    pub narrative: Narrative,
    pub created_at: DateTime<Utc>,

    pub hybrid_sources: Option<Vec<SourceWeight>>,
    pub use_case: Option<UseCase>,
    pub compatibility_score: Option<f64>,

    #[serde(default)]
    pub quality: ProfileQuality,

    /// Responses the profile was assembled from. Empty for hybrids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ResponseRecord>,
}

impl CognitiveProfile {
    /// Build an assessment-derived profile; signature and narrative are derived from `traits`.
    #[must_use]
    pub fn assessed(
        id: ProfileId,
        traits: TraitVector,
        responses: Vec<ResponseRecord>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            source: ProfileSource::Assessment,
            signature: signature::encode(&traits),
            narrative: Narrative::derive(&traits),
            traits,
            created_at,
            hybrid_sources: None,
            use_case: None,
            compatibility_score: None,
            quality: ProfileQuality::default(),
            responses,
        }
    }

    /// Attach the evidence summary computed for this profile.
    #[must_use]
    pub fn with_quality(mut self, quality: ProfileQuality) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub const fn is_hybrid(&self) -> bool {
        matches!(self.source, ProfileSource::Hybrid)
    }

    /// Ids of the profiles this one was blended from.
    pub fn parent_ids(&self) -> impl Iterator<Item = ProfileId> + '_ {
        self.hybrid_sources
            .iter()
            .flatten()
            .map(|s| s.profile_id)
    }

    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id,
            source: self.source,
            signature: self.signature.clone(),
            created_at: self.created_at,
            use_case: self.use_case.clone(),
        }
    }

    /// BLAKE3 hex digest of the deterministic content.
    ///
    /// Id, timestamp and raw responses are excluded, so regenerating a
    /// profile from the same inputs yields the same fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hash_str(&mut hasher, self.source.as_str());
        for score in self.traits.as_array() {
            hasher.update(&score.to_bits().to_le_bytes());
        }
        hash_str(&mut hasher, self.signature.as_str());
        for s in &self.narrative.strengths {
            hash_str(&mut hasher, s);
        }
        hasher.update(b"|");
        for b in &self.narrative.biases {
            hash_str(&mut hasher, b);
        }
        hasher.update(b"|");
        hash_str(&mut hasher, &self.narrative.communication_style);
        hash_str(&mut hasher, &self.narrative.learning_preference);
        for s in self.hybrid_sources.iter().flatten() {
            hasher.update(s.profile_id.as_uuid().as_bytes());
            hasher.update(&s.weight.to_bits().to_le_bytes());
        }
        if let Some(use_case) = &self.use_case {
            hash_str(&mut hasher, use_case.as_str());
        }
        if let Some(score) = self.compatibility_score {
            hasher.update(&score.to_bits().to_le_bytes());
        }
        hasher.update(&self.quality.confidence.to_bits().to_le_bytes());
        hash_str(&mut hasher, self.quality.completeness.as_str());
        hasher.finalize().to_hex().to_string()
    }
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

static GENERAL: UseCase = UseCase::General;

/// A profile produced by the hybridizer.
///
/// Always carries its weighted sources (one per distinct input id), a
/// use case and a compatibility score in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct HybridProfile(CognitiveProfile);

impl HybridProfile {
    #[must_use]
    pub fn new(
        id: ProfileId,
        traits: TraitVector,
        sources: Vec<SourceWeight>,
        use_case: UseCase,
        compatibility_score: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self(CognitiveProfile {
            id,
            source: ProfileSource::Hybrid,
            signature: signature::encode(&traits),
            narrative: Narrative::derive(&traits),
            traits,
            created_at,
            hybrid_sources: Some(sources),
            use_case: Some(use_case),
            compatibility_score: Some(compatibility_score.clamp(0.0, 1.0)),
            quality: ProfileQuality::default(),
            responses: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_quality(mut self, quality: ProfileQuality) -> Self {
        self.0.quality = quality;
        self
    }

    /// Weighted sources in request order.
    #[must_use]
    pub fn sources(&self) -> &[SourceWeight] {
        self.0.hybrid_sources.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn use_case(&self) -> &UseCase {
        self.0.use_case.as_ref().unwrap_or(&GENERAL)
    }

    #[must_use]
    pub fn compatibility_score(&self) -> f64 {
        self.0.compatibility_score.unwrap_or(0.0)
    }

    #[must_use]
    pub fn into_profile(self) -> CognitiveProfile {
        self.0
    }
}

impl Deref for HybridProfile {
    type Target = CognitiveProfile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<HybridProfile> for CognitiveProfile {
    fn from(hybrid: HybridProfile) -> Self {
        hybrid.0
    }
}

/// Succeeds only for hybrid records carrying their full lineage.
impl TryFrom<CognitiveProfile> for HybridProfile {
    type Error = ProfileError;

    fn try_from(profile: CognitiveProfile) -> Result<Self, Self::Error> {
        let complete = profile.is_hybrid()
            && profile.hybrid_sources.as_ref().is_some_and(|s| !s.is_empty())
            && profile.use_case.is_some()
            && profile.compatibility_score.is_some();
        if complete {
            Ok(Self(profile))
        } else {
            Err(ProfileError::internal(format!(
                "profile {} is not a complete hybrid record",
                profile.id
            )))
        }
    }
}

/// Listing entry returned by stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub source: ProfileSource,
    pub signature: Signature,
    pub created_at: DateTime<Utc>,
    pub use_case: Option<UseCase>,
}
