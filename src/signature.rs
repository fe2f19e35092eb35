//! Signature encoding.
//!
//! A signature is a three-segment code such as `AN-HMH-LE`:
//! 1. abbreviation of the highest-scoring trait
//! 2. tier letters for the three highest traits, in canonical order
//! 3. problem-solving style
//!
//! `encode` is total over every `TraitVector` and has no error path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trait_vector::{CognitiveTrait, TraitVector};

/// Lower bound of the `H` tier.
pub const HIGH_CUT: f64 = 0.66;
/// Lower bound of the `M` tier.
pub const MEDIUM_CUT: f64 = 0.33;

/// Number of traits described by the tier segment.
const TIER_WIDTH: usize = 3;

/// Traits that decide the problem-solving style, with their style codes.
const STYLE_TABLE: [(CognitiveTrait, &str); 4] = [
    (CognitiveTrait::Analytical, "LE"),
    (CognitiveTrait::Systematic, "ME"),
    (CognitiveTrait::Creative, "EX"),
    (CognitiveTrait::RiskTolerance, "VE"),
];

/// Style code when no problem-solving trait stands out.
const BALANCED_STYLE: &str = "BA";

/// Tier of a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    /// Classify a score against the fixed cut points.
    #[must_use]
    pub fn of(score: f64) -> Self {
        if score >= HIGH_CUT {
            Self::High
        } else if score >= MEDIUM_CUT {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::High => 'H',
            Self::Medium => 'M',
            Self::Low => 'L',
        }
    }
}

/// An encoded profile signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Returns the signature as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(top trait, tiers, style)`.
    ///
    /// Returns `None` for strings that were not produced by [`encode`].
    #[must_use]
    pub fn segments(&self) -> Option<(&str, &str, &str)> {
        let mut parts = self.0.splitn(3, '-');
        let top = parts.next()?;
        let tiers = parts.next()?;
        let style = parts.next()?;
        Some((top, tiers, style))
    }

    /// The top trait named by the first segment.
    #[must_use]
    pub fn top_trait(&self) -> Option<CognitiveTrait> {
        let (top, _, _) = self.segments()?;
        CognitiveTrait::ALL
            .into_iter()
            .find(|t| t.abbreviation() == top)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a trait vector into its signature.
#[must_use]
pub fn encode(vector: &TraitVector) -> Signature {
    let ranked = vector.ranked();
    let top = ranked[0].0;

    let mut selected: Vec<CognitiveTrait> = ranked.iter().take(TIER_WIDTH).map(|(t, _)| *t).collect();
    selected.sort_by_key(|t| t.index());
    let tiers: String = selected
        .iter()
        .map(|t| Tier::of(vector.get(*t)).letter())
        .collect();

    Signature(format!("{}-{}-{}", top.abbreviation(), tiers, style_code(vector)))
}

fn style_code(vector: &TraitVector) -> &'static str {
    let mut best = STYLE_TABLE[0];
    for entry in STYLE_TABLE {
        if vector.get(entry.0) > vector.get(best.0) {
            best = entry;
        }
    }
    if vector.get(best.0) < TraitVector::NEUTRAL {
        BALANCED_STYLE
    } else {
        best.1
    }
}
