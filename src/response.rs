//! Assessment response records.
//!
//! A `ResponseRecord` is one captured user answer. The assessment driver
//! produces them; the profiling engine only reads them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(uuid::Uuid);

impl ResponseId {
    /// Creates a new time-ordered response ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which kind of assessment prompt produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Open conversational questions about habits and preferences.
    PersonalityChat,
    /// Scripted work scenarios answered step by step.
    ProblemSolving,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonalityChat => write!(f, "personality_chat"),
            Self::ProblemSolving => write!(f, "problem_solving"),
        }
    }
}

/// A forced-choice option picked in a scripted scenario.
///
/// Codes are the letters `A`–`D`; every scripted scenario orders its
/// options the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceOption {
    /// A: gather data and analyse before acting.
    StructuredAnalysis,
    /// B: go with the first strong impression.
    GutCall,
    /// C: look for an unconventional alternative.
    ExploreAlternatives,
    /// D: bring other people into the decision.
    ConsultOthers,
}

impl ChoiceOption {
    /// The letter code for this option.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::StructuredAnalysis => 'A',
            Self::GutCall => 'B',
            Self::ExploreAlternatives => 'C',
            Self::ConsultOthers => 'D',
        }
    }
}

impl FromStr for ChoiceOption {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::StructuredAnalysis),
            "B" => Ok(Self::GutCall),
            "C" => Ok(Self::ExploreAlternatives),
            "D" => Ok(Self::ConsultOthers),
            _ => Err(ExtractionError::UnknownChoiceCode {
                code: s.to_string(),
            }),
        }
    }
}

/// One captured user answer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    id: ResponseId,
    text: String,
    captured_at: DateTime<Utc>,
    scenario: ScenarioKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    choice_code: Option<String>,

    /// Time the user took to answer, when the driver measured it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

impl ResponseRecord {
    /// Captures a response now.
    pub fn new(text: impl Into<String>, scenario: ScenarioKind) -> Self {
        Self::captured_at(text, scenario, Utc::now())
    }

    /// Captures a response with an explicit timestamp.
    pub fn captured_at(
        text: impl Into<String>,
        scenario: ScenarioKind,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ResponseId::new(),
            text: text.into(),
            captured_at,
            scenario,
            choice_code: None,
            latency_ms: None,
        }
    }

    /// Attach the forced-choice code the user picked.
    #[must_use]
    pub fn with_choice(mut self, code: impl Into<String>) -> Self {
        self.choice_code = Some(code.into());
        self
    }

    /// Attach the measured answer latency.
    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    #[must_use]
    pub const fn id(&self) -> ResponseId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn captured(&self) -> DateTime<Utc> {
        self.captured_at
    }

    #[must_use]
    pub const fn scenario(&self) -> ScenarioKind {
        self.scenario
    }

    #[must_use]
    pub fn choice_code(&self) -> Option<&str> {
        self.choice_code.as_deref()
    }

    #[must_use]
    pub const fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }
}
