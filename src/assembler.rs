//! Profile assembly from a session of responses.
//!
//! Each response is extracted and scored on its own; the sparse updates
//! are then folded into one vector with a recency-weighted running mean,
//! so answers given later in the session count slightly more. The same
//! pass records how much of the session carried usable signal.

use crate::config::EngineConfig;
use crate::error::{ProfileError, ProfileResult};
use crate::features::extract_or_degrade;
use crate::profile::{CognitiveProfile, DataCompleteness, ProfileId, ProfileQuality};
use crate::response::{ResponseRecord, ScenarioKind};
use crate::scoring::score;
use crate::trait_vector::{CognitiveTrait, TraitVector};

/// Informative responses needed before session depth stops adding confidence.
pub const FULL_SESSION: usize = 6;

const CHAT_SHARE: f64 = 0.4;
const SCENARIO_SHARE: f64 = 0.3;
const DEPTH_SHARE: f64 = 0.3;

/// Informative and total responses per scenario kind.
#[derive(Debug, Clone, Copy, Default)]
struct Coverage {
    chat: (usize, usize),
    scenario: (usize, usize),
}

impl Coverage {
    fn record(&mut self, kind: ScenarioKind, informative: bool) {
        let slot = match kind {
            ScenarioKind::PersonalityChat => &mut self.chat,
            ScenarioKind::ProblemSolving => &mut self.scenario,
        };
        slot.1 += 1;
        if informative {
            slot.0 += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn quality(&self) -> ProfileQuality {
        let share = |(hits, total): (usize, usize)| {
            if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            }
        };
        let informative = self.chat.0 + self.scenario.0;
        let depth = (informative as f64 / FULL_SESSION as f64).min(1.0);
        let confidence =
            CHAT_SHARE * share(self.chat) + SCENARIO_SHARE * share(self.scenario) + DEPTH_SHARE * depth;

        let kinds = usize::from(self.chat.0 > 0)
            + usize::from(self.scenario.0 > 0)
            + usize::from(informative >= FULL_SESSION);
        ProfileQuality::new(confidence, DataCompleteness::from_coverage(kinds))
    }
}

/// Builds assessment-derived profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileAssembler {
    config: EngineConfig,
}

impl ProfileAssembler {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assemble a profile from an ordered session.
    ///
    /// The profile is timestamped with the latest response, so the same
    /// session always yields the same traits, signature and narrative.
    ///
    /// # Errors
    /// `InsufficientData` when fewer than `min_responses` responses are supplied.
    pub fn assemble(&self, responses: &[ResponseRecord]) -> ProfileResult<CognitiveProfile> {
        let (traits, quality) = self.fold(responses)?;
        let created_at = responses
            .iter()
            .map(ResponseRecord::captured)
            .max()
            .ok_or_else(|| ProfileError::internal("session has no responses"))?;

        let profile = CognitiveProfile::assessed(
            ProfileId::at(created_at),
            traits,
            responses.to_vec(),
            created_at,
        )
        .with_quality(quality);
        tracing::debug!(
            profile_id = %profile.id,
            responses = responses.len(),
            signature = %profile.signature,
            confidence = quality.confidence,
            completeness = %quality.completeness,
            "assembled profile"
        );
        Ok(profile)
    }

    /// Fold a session into its final trait vector.
    ///
    /// Traits no response touched stay at the neutral midpoint.
    ///
    /// # Errors
    /// `InsufficientData` when fewer than `min_responses` responses are supplied.
    pub fn aggregate(&self, responses: &[ResponseRecord]) -> ProfileResult<TraitVector> {
        self.fold(responses).map(|(traits, _)| traits)
    }

    /// Evidence summary for a session: how many answers carried text or a
    /// forced choice, and whether both scenario kinds were covered.
    ///
    /// # Errors
    /// `InsufficientData` when fewer than `min_responses` responses are supplied.
    pub fn quality(&self, responses: &[ResponseRecord]) -> ProfileResult<ProfileQuality> {
        self.fold(responses).map(|(_, quality)| quality)
    }

    fn fold(&self, responses: &[ResponseRecord]) -> ProfileResult<(TraitVector, ProfileQuality)> {
        if responses.len() < self.config.min_responses {
            return Err(ProfileError::InsufficientData {
                required: self.config.min_responses,
                actual: responses.len(),
            });
        }

        let mut weighted = [0.0f64; CognitiveTrait::COUNT];
        let mut weights = [0.0f64; CognitiveTrait::COUNT];
        let mut coverage = Coverage::default();

        for (position, response) in responses.iter().enumerate() {
            let features = extract_or_degrade(response);
            coverage.record(
                response.scenario(),
                !features.is_low_confidence() || features.choice().is_some(),
            );
            let update = score(&features, response.scenario());
            let w = self.config.recency_weight(position);
            for (t, s) in update.iter() {
                weighted[t.index()] += w * s;
                weights[t.index()] += w;
            }
        }

        let mut traits = TraitVector::neutral();
        for t in CognitiveTrait::ALL {
            let total = weights[t.index()];
            if total > 0.0 {
                traits.set(t, weighted[t.index()] / total);
            }
        }
        Ok((traits, coverage.quality()))
    }
}
