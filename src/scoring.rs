//! Trait scoring from extracted features.
//!
//! Scoring is a pure function over two static tables:
//! - `SCORING_TABLE`: `(trait, feature) -> weight`, per scenario kind
//! - the forced-choice rows of the same table, which carry zero pivot
//!
//! A trait touched under a scenario scores
//! `clamp(0.5 + Σ weight × (normalized(feature) − pivot(feature)))`.

use crate::features::{Feature, FeatureSet};
use crate::response::ScenarioKind;
use crate::trait_vector::{CognitiveTrait, PartialTraitVector, TraitVector};

use crate::features::Feature as F;
use crate::response::ScenarioKind::{PersonalityChat as Chat, ProblemSolving as Solve};
use crate::trait_vector::CognitiveTrait as T;

/// One row of the scoring table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRule {
    pub scenario: ScenarioKind,
    pub target: CognitiveTrait,
    pub feature: Feature,
    /// Signed contribution per unit of centred, normalized feature.
    pub weight: f64,
}

const fn rule(
    scenario: ScenarioKind,
    target: CognitiveTrait,
    feature: Feature,
    weight: f64,
) -> ScoringRule {
    ScoringRule {
        scenario,
        target,
        feature,
        weight,
    }
}

/// The fixed `(trait, feature)` weight table.
///
/// Personality chat informs communication-facing traits; problem-solving
/// scenarios inform analytical, systematic and risk traits.
pub static SCORING_TABLE: &[ScoringRule] = &[
    // Personality chat
    rule(Chat, T::Interpersonal, F::SocialMarkers, 0.6),
    rule(Chat, T::Interpersonal, F::Sentiment, 0.3),
    rule(Chat, T::Interpersonal, F::QuestionRate, 0.2),
    rule(Chat, T::Intuitive, F::IntuitiveMarkers, 0.7),
    rule(Chat, T::Intuitive, F::AnalyticalMarkers, -0.2),
    rule(Chat, T::Creative, F::CreativeMarkers, 0.7),
    rule(Chat, T::Creative, F::LexicalDiversity, 0.2),
    rule(Chat, T::Decisiveness, F::HedgeDensity, -0.6),
    rule(Chat, T::Decisiveness, F::CertaintyDensity, 0.5),
    // Problem solving
    rule(Solve, T::Analytical, F::AnalyticalMarkers, 0.7),
    rule(Solve, T::Analytical, F::AvgSentenceLength, 0.2),
    rule(Solve, T::Analytical, F::IntuitiveMarkers, -0.2),
    rule(Solve, T::Analytical, F::ChoiceStructured, 0.25),
    rule(Solve, T::Systematic, F::SystematicMarkers, 0.7),
    rule(Solve, T::Systematic, F::TokenCount, 0.15),
    rule(Solve, T::Systematic, F::LatencySeconds, 0.1),
    rule(Solve, T::Systematic, F::ChoiceStructured, 0.1),
    rule(Solve, T::RiskTolerance, F::RiskMarkers, -0.5),
    rule(Solve, T::RiskTolerance, F::HedgeDensity, -0.3),
    rule(Solve, T::RiskTolerance, F::CertaintyDensity, 0.2),
    rule(Solve, T::RiskTolerance, F::ChoiceGut, 0.15),
    rule(Solve, T::RiskTolerance, F::ChoiceExplore, 0.15),
    rule(Solve, T::Decisiveness, F::HedgeDensity, -0.4),
    rule(Solve, T::Decisiveness, F::LatencySeconds, -0.3),
    rule(Solve, T::Decisiveness, F::ChoiceGut, 0.2),
    rule(Solve, T::Interpersonal, F::SocialMarkers, 0.4),
    rule(Solve, T::Interpersonal, F::ChoiceConsult, 0.25),
    rule(Solve, T::Creative, F::CreativeMarkers, 0.5),
    rule(Solve, T::Creative, F::ChoiceExplore, 0.25),
    rule(Solve, T::Intuitive, F::IntuitiveMarkers, 0.5),
    rule(Solve, T::Intuitive, F::ChoiceGut, 0.25),
];

/// Rows of the table that apply to a scenario kind.
pub fn rules_for(scenario: ScenarioKind) -> impl Iterator<Item = &'static ScoringRule> {
    SCORING_TABLE.iter().filter(move |r| r.scenario == scenario)
}

/// Score one response's features into a sparse trait update.
///
/// Low-confidence sets only apply the forced-choice rows for the option
/// that was picked; with no choice they touch nothing.
#[must_use]
pub fn score(features: &FeatureSet, scenario: ScenarioKind) -> PartialTraitVector {
    let mut sums = [None::<f64>; CognitiveTrait::COUNT];

    for r in rules_for(scenario) {
        if features.is_low_confidence() {
            let picked = features.choice().map(Feature::for_choice);
            if picked != Some(r.feature) {
                continue;
            }
        }
        let centred = features.normalized(r.feature) - r.feature.pivot();
        let slot = &mut sums[r.target.index()];
        *slot = Some(slot.unwrap_or(0.0) + r.weight * centred);
    }

    let mut out = PartialTraitVector::empty();
    for t in CognitiveTrait::ALL {
        if let Some(delta) = sums[t.index()] {
            out.set(t, TraitVector::NEUTRAL + delta);
        }
    }
    out
}
