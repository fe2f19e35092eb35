//! Narrative attributes derived from a trait vector.
//!
//! Every narrative field comes from fixed cut points over the final
//! vector, so the same vector always yields the same narrative. The
//! assembler and the hybridizer share these tables.

use serde::{Deserialize, Serialize};

use crate::trait_vector::{CognitiveTrait, TraitVector};

/// A trait above this score is listed as a strength.
pub const STRENGTH_CUT: f64 = 0.7;
/// A trait below this score asks for a complementary partner.
pub const COMPLEMENT_CUT: f64 = 0.3;
/// A trait above this score is dominant for hybridization purposes.
pub const DOMINANT_CUT: f64 = 0.7;

const STRENGTHS: [(CognitiveTrait, &str); CognitiveTrait::COUNT] = [
    (CognitiveTrait::Analytical, "strong analytical reasoning"),
    (CognitiveTrait::Systematic, "structured execution"),
    (CognitiveTrait::Intuitive, "pattern recognition"),
    (CognitiveTrait::Creative, "innovative thinking"),
    (CognitiveTrait::Interpersonal, "collaborative leadership"),
    (CognitiveTrait::Decisiveness, "rapid decision making"),
    (CognitiveTrait::RiskTolerance, "comfort with uncertainty"),
];

#[derive(Clone, Copy)]
enum Bound {
    Above(f64),
    Below(f64),
}

impl Bound {
    fn holds(self, score: f64) -> bool {
        match self {
            Self::Above(cut) => score > cut,
            Self::Below(cut) => score < cut,
        }
    }
}

const BIASES: [(CognitiveTrait, Bound, &str); 5] = [
    (CognitiveTrait::Analytical, Bound::Above(0.8), "analysis paralysis"),
    (CognitiveTrait::Intuitive, Bound::Above(0.8), "confirmation bias"),
    (CognitiveTrait::Decisiveness, Bound::Above(0.8), "anchoring bias"),
    (CognitiveTrait::RiskTolerance, Bound::Below(0.3), "loss aversion"),
    (CognitiveTrait::RiskTolerance, Bound::Above(0.8), "overconfidence bias"),
];

/// Free-text narrative fields persisted with every profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub strengths: Vec<String>,
    pub biases: Vec<String>,
    pub communication_style: String,
    pub learning_preference: String,
}

impl Narrative {
    /// Derive the narrative for a trait vector.
    #[must_use]
    pub fn derive(vector: &TraitVector) -> Self {
        let strengths = STRENGTHS
            .iter()
            .filter(|(t, _)| vector.get(*t) > STRENGTH_CUT)
            .map(|(_, label)| (*label).to_string())
            .collect();

        let biases = BIASES
            .iter()
            .filter(|(t, bound, _)| bound.holds(vector.get(*t)))
            .map(|(_, _, label)| (*label).to_string())
            .collect();

        Self {
            strengths,
            biases,
            communication_style: communication_style(vector).to_string(),
            learning_preference: learning_preference(vector),
        }
    }
}

fn communication_style(vector: &TraitVector) -> &'static str {
    let collaborative = vector.get(CognitiveTrait::Interpersonal) >= TraitVector::NEUTRAL;
    let explanatory = vector.get(CognitiveTrait::Analytical) >= TraitVector::NEUTRAL;
    match (collaborative, explanatory) {
        (true, true) => "collaborative_explanatory",
        (true, false) => "collaborative_direct",
        (false, true) => "detailed_explanatory",
        (false, false) => "concise_direct",
    }
}

fn learning_preference(vector: &TraitVector) -> String {
    let mode = if vector.get(CognitiveTrait::Analytical) >= vector.get(CognitiveTrait::Intuitive) {
        "sequential"
    } else {
        "holistic"
    };
    if vector.get(CognitiveTrait::Systematic) > 0.6 {
        format!("structured_{mode}")
    } else {
        mode.to_string()
    }
}

/// Traits a hybrid partner should bring, as `high_<trait>` tags.
#[must_use]
pub fn complementary_traits(vector: &TraitVector) -> Vec<String> {
    vector
        .iter()
        .filter(|(_, score)| *score < COMPLEMENT_CUT)
        .map(|(t, _)| format!("high_{t}"))
        .collect()
}

/// How hard a profile is to blend with others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridizationDifficulty {
    Low,
    Medium,
    High,
}

/// Summary of how well a profile lends itself to hybridization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridizationPotential {
    /// `1 - population std-dev` of the trait scores; balanced profiles score high.
    pub flexibility: f64,
    pub difficulty: HybridizationDifficulty,
    pub dominant_traits: Vec<CognitiveTrait>,
    pub suggested_roles: Vec<&'static str>,
}

impl HybridizationPotential {
    /// Assess a trait vector.
    #[must_use]
    pub fn assess(vector: &TraitVector) -> Self {
        let flexibility = 1.0 - vector.spread();
        let difficulty = if flexibility > 0.7 {
            HybridizationDifficulty::Low
        } else if flexibility > 0.4 {
            HybridizationDifficulty::Medium
        } else {
            HybridizationDifficulty::High
        };

        let dominant_traits: Vec<CognitiveTrait> = vector
            .iter()
            .filter(|(_, score)| *score > DOMINANT_CUT)
            .map(|(t, _)| t)
            .collect();

        let mut suggested_roles = Vec::new();
        for (t, role) in [
            (CognitiveTrait::Analytical, "strategic_advisor"),
            (CognitiveTrait::Creative, "innovation_catalyst"),
            (CognitiveTrait::Intuitive, "pattern_synthesizer"),
        ] {
            if dominant_traits.contains(&t) {
                suggested_roles.push(role);
            }
        }
        if dominant_traits.len() > 1 {
            suggested_roles.push("cognitive_bridge");
        }
        if suggested_roles.is_empty() {
            suggested_roles.push("balanced_generalist");
        }

        Self {
            flexibility,
            difficulty,
            dominant_traits,
            suggested_roles,
        }
    }
}
