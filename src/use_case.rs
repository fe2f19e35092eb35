//! Use-case tags and their trait boosts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HybridRequestError;
use crate::trait_vector::{CognitiveTrait, TraitVector};

/// Purpose a hybrid profile is tuned for.
///
/// Parsed case-insensitively from a free-form tag. Tags outside the
/// recommended set are kept verbatim as `Custom` and carry no boost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum UseCase {
    Leadership,
    Innovation,
    ProblemSolving,
    Learning,
    #[default]
    General,
    Custom(String),
}

/// A single trait boost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost {
    pub target: CognitiveTrait,
    pub amount: f64,
}

const fn boost(target: CognitiveTrait, amount: f64) -> Boost {
    Boost { target, amount }
}

static LEADERSHIP: &[Boost] = &[
    boost(CognitiveTrait::Interpersonal, 0.10),
    boost(CognitiveTrait::Analytical, 0.10),
    boost(CognitiveTrait::Decisiveness, 0.05),
];

static INNOVATION: &[Boost] = &[
    boost(CognitiveTrait::Creative, 0.10),
    boost(CognitiveTrait::Intuitive, 0.05),
    boost(CognitiveTrait::RiskTolerance, 0.05),
];

static PROBLEM_SOLVING: &[Boost] = &[
    boost(CognitiveTrait::Analytical, 0.08),
    boost(CognitiveTrait::Systematic, 0.08),
];

static LEARNING: &[Boost] = &[
    boost(CognitiveTrait::Systematic, 0.05),
    boost(CognitiveTrait::Creative, 0.05),
    boost(CognitiveTrait::Interpersonal, 0.05),
];

impl UseCase {
    /// The canonical tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Leadership => "leadership",
            Self::Innovation => "innovation",
            Self::ProblemSolving => "problem_solving",
            Self::Learning => "learning",
            Self::General => "general",
            Self::Custom(tag) => tag,
        }
    }

    /// The fixed boost row for this use case.
    #[must_use]
    pub fn boosts(&self) -> &'static [Boost] {
        match self {
            Self::Leadership => LEADERSHIP,
            Self::Innovation => INNOVATION,
            Self::ProblemSolving => PROBLEM_SOLVING,
            Self::Learning => LEARNING,
            Self::General | Self::Custom(_) => &[],
        }
    }

    /// Add this use case's boosts to a blended vector.
    ///
    /// Each boost is bounded by `max_boost`; results are capped at 1.0.
    #[must_use]
    pub fn apply(&self, vector: &TraitVector, max_boost: f64) -> TraitVector {
        let mut boosted = *vector;
        for b in self.boosts() {
            boosted.add(b.target, b.amount.min(max_boost));
        }
        boosted
    }

    /// Suggestions for getting the most out of a hybrid tuned for this use case.
    #[must_use]
    pub fn optimization_suggestions(&self, vector: &TraitVector) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = match self {
            Self::Leadership => vec![
                "Focus on balancing analytical and intuitive decision-making",
                "Develop stakeholder communication strategies",
            ],
            Self::Innovation => vec![
                "Leverage creative thinking while maintaining systematic approach",
                "Create structured ideation processes",
            ],
            Self::ProblemSolving => vec![
                "Develop frameworks that combine multiple thinking styles",
                "Practice switching between analytical and creative modes",
            ],
            Self::Learning => vec![
                "Pair structured study plans with open-ended exploration",
                "Use group discussion to consolidate new material",
            ],
            Self::General | Self::Custom(_) => Vec::new(),
        };

        if vector.get(CognitiveTrait::Analytical) > 0.7 && vector.get(CognitiveTrait::Creative) > 0.7 {
            out.push("Create structured creativity sessions to balance both strengths");
        }
        if vector.get(CognitiveTrait::Decisiveness) < 0.4 {
            out.push("Develop confidence-building exercises for decision-making");
        }
        out
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = HybridRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.is_empty() {
            return Err(HybridRequestError::EmptyUseCase);
        }
        let key = tag.to_ascii_lowercase().replace(['-', ' '], "_");
        Ok(match key.as_str() {
            "leadership" => Self::Leadership,
            "innovation" => Self::Innovation,
            "problem_solving" => Self::ProblemSolving,
            "learning" => Self::Learning,
            "general" => Self::General,
            _ => Self::Custom(tag.to_string()),
        })
    }
}

impl Serialize for UseCase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UseCase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recommended_tags_case_insensitively() {
        assert_eq!("Leadership".parse::<UseCase>().unwrap(), UseCase::Leadership);
        assert_eq!("problem-solving".parse::<UseCase>().unwrap(), UseCase::ProblemSolving);
        assert_eq!(" LEARNING ".parse::<UseCase>().unwrap(), UseCase::Learning);
    }

    #[test]
    fn unknown_tags_are_custom() {
        let uc = "Crisis Response".parse::<UseCase>().unwrap();
        assert_eq!(uc, UseCase::Custom("Crisis Response".to_string()));
        assert!(uc.boosts().is_empty());
        assert_eq!(uc.to_string(), "Crisis Response");
    }

    #[test]
    fn empty_tag_is_rejected() {
        assert_eq!("  ".parse::<UseCase>().unwrap_err(), HybridRequestError::EmptyUseCase);
    }

    #[test]
    fn leadership_boost_is_capped() {
        let v = TraitVector::neutral()
            .with(CognitiveTrait::Analytical, 0.95)
            .with(CognitiveTrait::Interpersonal, 0.4);
        let boosted = UseCase::Leadership.apply(&v, 0.25);
        assert_eq!(boosted.get(CognitiveTrait::Analytical), 1.0);
        assert!((boosted.get(CognitiveTrait::Interpersonal) - 0.5).abs() < 1e-12);
        assert!((boosted.get(CognitiveTrait::Decisiveness) - 0.55).abs() < 1e-12);
        assert_eq!(boosted.get(CognitiveTrait::Creative), 0.5);
    }

    #[test]
    fn max_boost_bounds_each_entry() {
        let boosted = UseCase::Innovation.apply(&TraitVector::neutral(), 0.02);
        assert!((boosted.get(CognitiveTrait::Creative) - 0.52).abs() < 1e-12);
        assert!((boosted.get(CognitiveTrait::Intuitive) - 0.52).abs() < 1e-12);
    }

    #[test]
    fn general_leaves_vector_untouched() {
        let v = TraitVector::neutral().with(CognitiveTrait::Creative, 0.3);
        assert_eq!(UseCase::General.apply(&v, 0.25), v);
    }

    #[test]
    fn suggestions_combine_use_case_and_traits() {
        let v = TraitVector::neutral()
            .with(CognitiveTrait::Analytical, 0.8)
            .with(CognitiveTrait::Creative, 0.8)
            .with(CognitiveTrait::Decisiveness, 0.3);
        let s = UseCase::Innovation.optimization_suggestions(&v);
        assert_eq!(s.len(), 4);
        assert!(UseCase::General.optimization_suggestions(&TraitVector::neutral()).is_empty());
    }

    #[test]
    fn serde_uses_plain_tag() {
        let json = serde_json::to_string(&UseCase::ProblemSolving).unwrap();
        assert_eq!(json, "\"problem_solving\"");
        let back: UseCase = serde_json::from_str("\"innovation\"").unwrap();
        assert_eq!(back, UseCase::Innovation);
    }
}
