//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Tunables for assembly and hybridization.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fewest responses an assessment may be assembled from.
    pub min_responses: usize,
    /// Recency weight added per response position.
    pub recency_step: f64,
    /// Upper bound of the recency weight.
    pub recency_cap: f64,
    /// Deepest ancestry level at which another input may appear.
    pub max_ancestry_depth: usize,
    /// Upper bound of any single use-case boost.
    pub max_boost: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_responses: 3,
            recency_step: 0.02,
            recency_cap: 1.5,
            max_ancestry_depth: 5,
            max_boost: 0.25,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ProfileError::config(format!("invalid config JSON: {e}")))?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self, ProfileError> {
        if self.min_responses == 0 {
            return Err(ProfileError::config("min_responses must be at least 1"));
        }
        if !self.recency_step.is_finite() || self.recency_step < 0.0 {
            return Err(ProfileError::config(format!(
                "recency_step must be a non-negative number (got {})",
                self.recency_step
            )));
        }
        if !self.recency_cap.is_finite() || self.recency_cap < 1.0 {
            return Err(ProfileError::config(format!(
                "recency_cap must be at least 1.0 (got {})",
                self.recency_cap
            )));
        }
        if self.max_ancestry_depth == 0 {
            return Err(ProfileError::config("max_ancestry_depth must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.max_boost) {
            return Err(ProfileError::config(format!(
                "max_boost must be within [0, 1] (got {})",
                self.max_boost
            )));
        }
        Ok(self)
    }

    /// Recency weight of the response at `position` (0-based).
    #[must_use]
    pub fn recency_weight(&self, position: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let step = self.recency_step * position as f64;
        (1.0 + step).min(self.recency_cap)
    }
}
