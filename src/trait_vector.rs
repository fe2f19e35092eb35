//! Cognitive traits and trait vectors.
//!
//! The trait set is closed: every `TraitVector` carries exactly one score per
//! `CognitiveTrait`, and every score lives in [0.0, 1.0]. Both invariants are
//! held by construction, so downstream code never has to re-check them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named cognitive trait.
///
/// Variants are declared in canonical priority order. That order breaks
/// ties in the signature encoder and fixes the emission order of tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveTrait {
    /// Evidence-driven, stepwise reasoning.
    Analytical,
    /// Preference for process, order and planning.
    Systematic,
    /// Gut-feel and pattern-based judgement.
    Intuitive,
    /// Divergent, exploratory idea generation.
    Creative,
    /// Orientation toward people and collaboration.
    Interpersonal,
    /// Willingness to commit without hedging.
    Decisiveness,
    /// Comfort acting under uncertainty.
    RiskTolerance,
}

impl CognitiveTrait {
    /// Number of traits in the closed set.
    pub const COUNT: usize = 7;

    /// All traits in canonical priority order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Analytical,
        Self::Systematic,
        Self::Intuitive,
        Self::Creative,
        Self::Interpersonal,
        Self::Decisiveness,
        Self::RiskTolerance,
    ];

    /// Position in canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name used in persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analytical => "analytical",
            Self::Systematic => "systematic",
            Self::Intuitive => "intuitive",
            Self::Creative => "creative",
            Self::Interpersonal => "interpersonal",
            Self::Decisiveness => "decisiveness",
            Self::RiskTolerance => "risk_tolerance",
        }
    }

    /// Two-letter code used in signatures.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Analytical => "AN",
            Self::Systematic => "SY",
            Self::Intuitive => "IN",
            Self::Creative => "CR",
            Self::Interpersonal => "IP",
            Self::Decisiveness => "DE",
            Self::RiskTolerance => "RT",
        }
    }
}

impl fmt::Display for CognitiveTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CognitiveTrait {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| format!("unknown cognitive trait '{s}'"))
    }
}

/// Clamp a raw score into [0, 1]. NaN collapses to the neutral midpoint.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        TraitVector::NEUTRAL
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A complete, bounded trait vector.
///
/// Serialized as a `{ trait_name: score }` map. On deserialization missing
/// traits default to the neutral midpoint and out-of-range values are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitVector {
    scores: [f64; CognitiveTrait::COUNT],
}

impl TraitVector {
    /// Score given to traits with no evidence.
    pub const NEUTRAL: f64 = 0.5;

    /// A vector with every trait at the neutral midpoint.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            scores: [Self::NEUTRAL; CognitiveTrait::COUNT],
        }
    }

    /// Build a vector from `(trait, score)` pairs; unspecified traits stay neutral.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (CognitiveTrait, f64)>) -> Self {
        let mut vector = Self::neutral();
        for (t, score) in pairs {
            vector.set(t, score);
        }
        vector
    }

    /// Returns the score of a trait.
    #[must_use]
    pub const fn get(&self, t: CognitiveTrait) -> f64 {
        self.scores[t.index()]
    }

    /// Sets a trait score, clamped into [0, 1].
    pub fn set(&mut self, t: CognitiveTrait, score: f64) {
        self.scores[t.index()] = clamp_score(score);
    }

    /// Builder-style variant of [`TraitVector::set`].
    #[must_use]
    pub fn with(mut self, t: CognitiveTrait, score: f64) -> Self {
        self.set(t, score);
        self
    }

    /// Adds `delta` to a trait, clamped into [0, 1].
    pub fn add(&mut self, t: CognitiveTrait, delta: f64) {
        let current = self.get(t);
        self.set(t, current + delta);
    }

    /// Iterate `(trait, score)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CognitiveTrait, f64)> + '_ {
        CognitiveTrait::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    /// Raw scores in canonical order.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; CognitiveTrait::COUNT] {
        &self.scores
    }

    /// Traits ranked by score descending; ties keep canonical order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(CognitiveTrait, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        // Stable sort keeps canonical order for equal scores.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// The highest-scoring trait (ties broken by canonical order).
    #[must_use]
    pub fn dominant(&self) -> CognitiveTrait {
        let mut best = CognitiveTrait::ALL[0];
        for t in CognitiveTrait::ALL {
            if self.get(t) > self.get(best) {
                best = t;
            }
        }
        best
    }

    /// Mean absolute per-trait difference (L1 distance / trait count), in [0, 1].
    #[must_use]
    pub fn normalized_l1_distance(&self, other: &Self) -> f64 {
        let total: f64 = self
            .scores
            .iter()
            .zip(other.scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let n = CognitiveTrait::COUNT as f64;
        total / n
    }

    /// Population standard deviation of the scores.
    #[must_use]
    pub fn spread(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = CognitiveTrait::COUNT as f64;
        let mean = self.scores.iter().sum::<f64>() / n;
        let var = self.scores.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        var.sqrt()
    }

    /// Overlay a partial update: every trait present in `partial` replaces the current score.
    pub fn apply(&mut self, partial: &PartialTraitVector) {
        for (t, score) in partial.iter() {
            self.set(t, score);
        }
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Serialize for TraitVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<&'static str, f64> = self.iter().map(|(t, v)| (t.as_str(), v)).collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TraitVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut vector = Self::neutral();
        for (name, score) in raw {
            let t = name.parse::<CognitiveTrait>().map_err(D::Error::custom)?;
            vector.set(t, score);
        }
        Ok(vector)
    }
}

/// A sparse trait update produced by scoring one response.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialTraitVector {
    scores: [Option<f64>; CognitiveTrait::COUNT],
}

impl PartialTraitVector {
    /// An update that touches no trait.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            scores: [None; CognitiveTrait::COUNT],
        }
    }

    /// Returns the score for a trait, if this update touched it.
    #[must_use]
    pub const fn get(&self, t: CognitiveTrait) -> Option<f64> {
        self.scores[t.index()]
    }

    /// Sets a trait score, clamped into [0, 1].
    pub fn set(&mut self, t: CognitiveTrait, score: f64) {
        self.scores[t.index()] = Some(clamp_score(score));
    }

    /// True if no trait was touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.iter().all(Option::is_none)
    }

    /// Number of touched traits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.iter().filter(|s| s.is_some()).count()
    }

    /// Iterate touched traits in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CognitiveTrait, f64)> + '_ {
        CognitiveTrait::ALL
            .into_iter()
            .filter_map(|t| self.get(t).map(|v| (t, v)))
    }
}
