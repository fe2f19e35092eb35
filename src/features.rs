//! Linguistic feature extraction.
//!
//! `extract` is a pure function of a response: identical text (and choice
//! code / latency) always yields the identical `FeatureSet`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::response::{ChoiceOption, ResponseRecord};

/// A named numeric feature of one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Unique tokens / total tokens.
    LexicalDiversity,
    /// Tokens per sentence.
    AvgSentenceLength,
    /// Hedge / uncertainty markers per token.
    HedgeDensity,
    /// Certainty markers per token.
    CertaintyDensity,
    /// Lexicon polarity in [-1, 1].
    Sentiment,
    /// Response length in tokens.
    TokenCount,
    /// Share of sentences that are questions.
    QuestionRate,
    AnalyticalMarkers,
    IntuitiveMarkers,
    CreativeMarkers,
    SystematicMarkers,
    /// Stakeholder and collaboration language per token.
    SocialMarkers,
    /// Risk and obstacle language per token.
    RiskMarkers,
    /// Answer latency in seconds (0 when not measured).
    LatencySeconds,
    ChoiceStructured,
    ChoiceGut,
    ChoiceExplore,
    ChoiceConsult,
}

impl Feature {
    pub const COUNT: usize = 18;

    pub const ALL: [Self; Self::COUNT] = [
        Self::LexicalDiversity,
        Self::AvgSentenceLength,
        Self::HedgeDensity,
        Self::CertaintyDensity,
        Self::Sentiment,
        Self::TokenCount,
        Self::QuestionRate,
        Self::AnalyticalMarkers,
        Self::IntuitiveMarkers,
        Self::CreativeMarkers,
        Self::SystematicMarkers,
        Self::SocialMarkers,
        Self::RiskMarkers,
        Self::LatencySeconds,
        Self::ChoiceStructured,
        Self::ChoiceGut,
        Self::ChoiceExplore,
        Self::ChoiceConsult,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case feature name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LexicalDiversity => "lexical_diversity",
            Self::AvgSentenceLength => "avg_sentence_length",
            Self::HedgeDensity => "hedge_density",
            Self::CertaintyDensity => "certainty_density",
            Self::Sentiment => "sentiment",
            Self::TokenCount => "token_count",
            Self::QuestionRate => "question_rate",
            Self::AnalyticalMarkers => "analytical_markers",
            Self::IntuitiveMarkers => "intuitive_markers",
            Self::CreativeMarkers => "creative_markers",
            Self::SystematicMarkers => "systematic_markers",
            Self::SocialMarkers => "social_markers",
            Self::RiskMarkers => "risk_markers",
            Self::LatencySeconds => "latency_seconds",
            Self::ChoiceStructured => "choice_structured",
            Self::ChoiceGut => "choice_gut",
            Self::ChoiceExplore => "choice_explore",
            Self::ChoiceConsult => "choice_consult",
        }
    }

    /// The one-hot indicator for a forced-choice option.
    #[must_use]
    pub const fn for_choice(choice: ChoiceOption) -> Self {
        match choice {
            ChoiceOption::StructuredAnalysis => Self::ChoiceStructured,
            ChoiceOption::GutCall => Self::ChoiceGut,
            ChoiceOption::ExploreAlternatives => Self::ChoiceExplore,
            ChoiceOption::ConsultOthers => Self::ChoiceConsult,
        }
    }

    /// True for the forced-choice indicators.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(
            self,
            Self::ChoiceStructured | Self::ChoiceGut | Self::ChoiceExplore | Self::ChoiceConsult
        )
    }

    /// Raw value at which the feature saturates to 1.0 after normalization.
    #[must_use]
    pub const fn saturation(self) -> f64 {
        match self {
            Self::AvgSentenceLength => 30.0,
            Self::HedgeDensity
            | Self::AnalyticalMarkers
            | Self::IntuitiveMarkers
            | Self::CreativeMarkers
            | Self::SystematicMarkers
            | Self::SocialMarkers
            | Self::RiskMarkers => 0.1,
            Self::CertaintyDensity => 0.05,
            Self::TokenCount => 150.0,
            Self::LatencySeconds => 60.0,
            Self::LexicalDiversity
            | Self::Sentiment
            | Self::QuestionRate
            | Self::ChoiceStructured
            | Self::ChoiceGut
            | Self::ChoiceExplore
            | Self::ChoiceConsult => 1.0,
        }
    }

    /// Normalized value of an unremarkable response; scoring is centred on it.
    #[must_use]
    pub const fn pivot(self) -> f64 {
        match self {
            Self::LexicalDiversity => 0.6,
            Self::AvgSentenceLength | Self::Sentiment => 0.5,
            Self::TokenCount => 0.33,
            Self::HedgeDensity
            | Self::CertaintyDensity
            | Self::AnalyticalMarkers
            | Self::IntuitiveMarkers
            | Self::CreativeMarkers
            | Self::SystematicMarkers
            | Self::SocialMarkers
            | Self::RiskMarkers => 0.2,
            Self::QuestionRate => 0.1,
            Self::LatencySeconds => 0.25,
            Self::ChoiceStructured | Self::ChoiceGut | Self::ChoiceExplore | Self::ChoiceConsult => 0.0,
        }
    }

    /// Map a raw value into [0, 1].
    #[must_use]
    pub fn normalize(self, raw: f64) -> f64 {
        let scaled = match self {
            Self::Sentiment => (raw + 1.0) / 2.0,
            _ => raw / self.saturation(),
        };
        if scaled.is_nan() {
            0.0
        } else {
            scaled.clamp(0.0, 1.0)
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    values: [f64; Feature::COUNT],
    choice: Option<ChoiceOption>,
    low_confidence: bool,
}

impl FeatureSet {
    /// An all-zero, low-confidence set (text features carry no evidence).
    #[must_use]
    pub fn low_confidence(choice: Option<ChoiceOption>) -> Self {
        let mut set = Self {
            values: [0.0; Feature::COUNT],
            choice: None,
            low_confidence: true,
        };
        set.set_choice(choice);
        set
    }

    /// Raw value of a feature.
    #[must_use]
    pub const fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Normalized value of a feature in [0, 1].
    #[must_use]
    pub fn normalized(&self, feature: Feature) -> f64 {
        feature.normalize(self.get(feature))
    }

    /// The forced-choice option, if one was picked.
    #[must_use]
    pub const fn choice(&self) -> Option<ChoiceOption> {
        self.choice
    }

    /// True when the text carried no usable signal.
    #[must_use]
    pub const fn is_low_confidence(&self) -> bool {
        self.low_confidence
    }

    /// Iterate `(feature, raw value)`.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    fn set_choice(&mut self, choice: Option<ChoiceOption>) {
        self.choice = choice;
        if let Some(c) = choice {
            self.set(Feature::for_choice(c), 1.0);
        }
    }
}

const HEDGE_MARKERS: &[&str] = &[
    "maybe", "perhaps", "possibly", "might", "could", "probably", "likely", "uncertain", "unsure",
    "guess", "sometimes", "usually", "sort of", "kind of", "i think", "not sure",
];

const CERTAINTY_MARKERS: &[&str] = &[
    "definitely", "certainly", "absolutely", "sure", "confident", "always", "never", "clearly",
    "without doubt",
];

const ANALYTICAL_MARKERS: &[&str] = &[
    "first", "second", "third", "therefore", "because", "analyze", "analyse", "analysis",
    "break down", "step by step", "logical", "logically", "evidence", "data", "facts", "research",
    "study", "examine", "evaluate", "assess", "measure", "compare", "consider",
];

const INTUITIVE_MARKERS: &[&str] = &[
    "feel", "sense", "instinct", "gut", "intuition", "seems like", "impression", "hunch", "vibe",
    "energy", "flow", "natural", "organic", "spontaneous", "instinctively", "naturally",
];

const CREATIVE_MARKERS: &[&str] = &[
    "imagine", "what if", "brainstorm", "creative", "innovative", "outside the box", "alternative",
    "unconventional", "novel", "original", "unique", "artistic", "inspiration", "envision", "idea",
    "ideas",
];

const SYSTEMATIC_MARKERS: &[&str] = &[
    "process", "procedure", "method", "framework", "structure", "organize", "organise", "plan",
    "schedule", "timeline", "phases", "stages", "sequence", "order", "prioritize", "prioritise",
    "checklist", "then", "next",
];

const SOCIAL_MARKERS: &[&str] = &[
    "team", "people", "stakeholder", "stakeholders", "client", "customer", "others", "everyone",
    "together", "collaborate", "teamwork", "cooperation", "partnership", "shared", "we", "us",
    "friends", "colleagues",
];

const RISK_MARKERS: &[&str] = &[
    "risk", "risks", "danger", "problem", "issue", "challenge", "difficulty", "obstacle", "concern",
    "worried", "careful", "cautious", "safe", "contingency",
];

const POSITIVE_WORDS: &[&str] = &[
    "enjoy", "love", "happy", "excited", "great", "good", "confident", "pleased", "hope",
    "passionate", "fun", "interesting", "glad", "calm",
];

const NEGATIVE_WORDS: &[&str] = &[
    "worried", "sad", "angry", "frustrated", "nervous", "hate", "fear", "concerned", "stressed",
    "overwhelmed", "bad", "anxious", "upset", "annoyed",
];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{L}+(?:['’]\p{L}+)*").expect("static token regex"))
}

fn sentence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]*").expect("static sentence regex"))
}

fn tokenize(text: &str) -> Vec<String> {
    token_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase().replace('’', "'"))
        .collect()
}

/// Words that flip the certainty marker right after them ("not sure").
const NEGATORS: &[&str] = &[
    "not", "no", "never", "hardly", "barely", "don't", "doesn't", "didn't", "isn't", "wasn't",
    "aren't", "can't", "cannot", "won't", "wouldn't", "couldn't",
];

/// Words allowed between a negator and what it negates ("not really sure").
const INTENSIFIERS: &[&str] = &["really", "very", "so", "too", "quite", "entirely", "that", "totally"];

fn is_negated(tokens: &[String], at: usize) -> bool {
    let before = |back: usize| at.checked_sub(back).map(|i| tokens[i].as_str());
    match before(1) {
        Some(t) if NEGATORS.contains(&t) => true,
        Some(t) if INTENSIFIERS.contains(&t) => before(2).is_some_and(|t| NEGATORS.contains(&t)),
        _ => false,
    }
}

/// Start positions of every lexicon hit; multi-word entries match consecutive tokens.
fn marker_hits<'a>(tokens: &'a [String], lexicon: &'a [&'a str]) -> impl Iterator<Item = usize> + 'a {
    lexicon.iter().flat_map(move |entry| {
        let words: Vec<&str> = entry.split(' ').collect();
        tokens
            .windows(words.len())
            .enumerate()
            .filter(move |(_, w)| w.iter().zip(&words).all(|(t, p)| t == p))
            .map(|(i, _)| i)
    })
}

fn count_markers(tokens: &[String], lexicon: &[&str]) -> usize {
    marker_hits(tokens, lexicon).count()
}

/// Certainty hits, minus those negated ("not sure", "never confident").
fn count_certainty(tokens: &[String]) -> usize {
    marker_hits(tokens, CERTAINTY_MARKERS)
        .filter(|&i| !is_negated(tokens, i))
        .count()
}

#[allow(clippy::cast_precision_loss)]
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Extract features from a response.
///
/// Empty or whitespace-only text is not an error: it yields a
/// low-confidence all-zero set.
///
/// # Errors
/// - `ExtractionError::Unparseable` if non-empty text has no word tokens
/// - `ExtractionError::UnknownChoiceCode` if the choice code is not `A`–`D`
pub fn extract(response: &ResponseRecord) -> Result<FeatureSet, ExtractionError> {
    let choice = response
        .choice_code()
        .map(str::parse::<ChoiceOption>)
        .transpose()?;
    extract_with_choice(response, choice)
}

/// Extract features, degrading any `ExtractionError` into a low-confidence set.
///
/// An unknown choice code only drops the choice flag; the text features are kept.
#[must_use]
pub fn extract_or_degrade(response: &ResponseRecord) -> FeatureSet {
    match extract(response) {
        Ok(set) => set,
        Err(err @ ExtractionError::UnknownChoiceCode { .. }) => {
            tracing::debug!(response_id = %response.id(), error = %err, "ignoring forced-choice code");
            extract_with_choice(response, None)
                .unwrap_or_else(|_| FeatureSet::low_confidence(None))
        }
        Err(err) => {
            tracing::debug!(response_id = %response.id(), error = %err, "degrading to low-confidence features");
            let choice = response.choice_code().and_then(|c| c.parse().ok());
            FeatureSet::low_confidence(choice)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn extract_with_choice(
    response: &ResponseRecord,
    choice: Option<ChoiceOption>,
) -> Result<FeatureSet, ExtractionError> {
    let text = response.text();
    if text.trim().is_empty() {
        return Ok(FeatureSet::low_confidence(choice));
    }

    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(ExtractionError::Unparseable {
            length: text.chars().count(),
        });
    }

    let n = tokens.len();
    let sentences: Vec<&str> = sentence_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| token_regex().is_match(s))
        .collect();
    let sentence_count = sentences.len().max(1);
    let questions = sentences.iter().filter(|s| s.trim_end().ends_with('?')).count();

    let unique: std::collections::HashSet<&str> = tokens.iter().map(String::as_str).collect();

    let positive = count_markers(&tokens, POSITIVE_WORDS);
    let negative = count_markers(&tokens, NEGATIVE_WORDS);
    let sentiment = if positive + negative == 0 {
        0.0
    } else {
        (positive as f64 - negative as f64) / (positive + negative) as f64
    };

    let mut set = FeatureSet {
        values: [0.0; Feature::COUNT],
        choice: None,
        low_confidence: false,
    };
    set.set(Feature::LexicalDiversity, ratio(unique.len(), n));
    set.set(Feature::AvgSentenceLength, ratio(n, sentence_count));
    set.set(Feature::HedgeDensity, ratio(count_markers(&tokens, HEDGE_MARKERS), n));
    set.set(Feature::CertaintyDensity, ratio(count_certainty(&tokens), n));
    set.set(Feature::Sentiment, sentiment);
    set.set(Feature::TokenCount, n as f64);
    set.set(Feature::QuestionRate, ratio(questions, sentence_count));
    set.set(Feature::AnalyticalMarkers, ratio(count_markers(&tokens, ANALYTICAL_MARKERS), n));
    set.set(Feature::IntuitiveMarkers, ratio(count_markers(&tokens, INTUITIVE_MARKERS), n));
    set.set(Feature::CreativeMarkers, ratio(count_markers(&tokens, CREATIVE_MARKERS), n));
    set.set(Feature::SystematicMarkers, ratio(count_markers(&tokens, SYSTEMATIC_MARKERS), n));
    set.set(Feature::SocialMarkers, ratio(count_markers(&tokens, SOCIAL_MARKERS), n));
    set.set(Feature::RiskMarkers, ratio(count_markers(&tokens, RISK_MARKERS), n));
    set.set(
        Feature::LatencySeconds,
        response.latency_ms().map_or(0.0, |ms| ms as f64 / 1000.0),
    );
    set.set_choice(choice);

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ScenarioKind;

    fn chat(text: &str) -> ResponseRecord {
        ResponseRecord::new(text, ScenarioKind::PersonalityChat)
    }

    #[test]
    fn empty_text_is_low_confidence_not_error() {
        let set = extract(&chat("   ")).unwrap();
        assert!(set.is_low_confidence());
        assert!(set.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn punctuation_only_text_is_unparseable() {
        let err = extract(&chat("?!?! ...")).unwrap_err();
        assert!(matches!(err, ExtractionError::Unparseable { length: 8 }));

        let degraded = extract_or_degrade(&chat("?!?! ..."));
        assert!(degraded.is_low_confidence());
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "I think we should maybe analyze the data first. Then plan the next steps?";
        let a = extract(&chat(text)).unwrap();
        let b = extract(&chat(text)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn counts_basic_shape() {
        let set = extract(&chat("I love this. Do you love it too?")).unwrap();
        assert_eq!(set.get(Feature::TokenCount), 8.0);
        assert_eq!(set.get(Feature::AvgSentenceLength), 4.0);
        assert_eq!(set.get(Feature::QuestionRate), 0.5);
        assert_eq!(set.get(Feature::Sentiment), 1.0);
        // "love" repeats: 7 unique of 8
        assert!((set.get(Feature::LexicalDiversity) - 7.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn hedges_and_phrases_are_counted() {
        let set = extract(&chat("Maybe it could work, I think, but I'm not sure")).unwrap();
        // maybe, could, i think, not sure over 10 tokens ("i'm" is one token)
        assert!((set.get(Feature::HedgeDensity) - 4.0 / 10.0).abs() < 1e-12);
    }

    #[test]
    fn negated_certainty_is_not_certainty() {
        let set = extract(&chat("I'm not sure.")).unwrap();
        assert_eq!(set.get(Feature::CertaintyDensity), 0.0);
        assert!(set.get(Feature::HedgeDensity) > 0.0);

        let set = extract(&chat("I am not really confident, but I am absolutely sure")).unwrap();
        // only "absolutely" and the second "sure" count, over 10 tokens
        assert!((set.get(Feature::CertaintyDensity) - 2.0 / 10.0).abs() < 1e-12);
    }

    #[test]
    fn accented_words_are_single_tokens() {
        let set = extract(&chat("Je préfère réfléchir étape par étape.")).unwrap();
        assert_eq!(set.get(Feature::TokenCount), 6.0);
        // "étape" repeats: 5 unique of 6
        assert!((set.get(Feature::LexicalDiversity) - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn non_latin_text_is_parsed() {
        let set = extract(&chat("Я сначала анализирую данные.")).unwrap();
        assert!(!set.is_low_confidence());
        assert_eq!(set.get(Feature::TokenCount), 4.0);
        assert_eq!(set.get(Feature::AvgSentenceLength), 4.0);
    }

    #[test]
    fn curly_apostrophes_match_lexicon() {
        let set = extract(&chat("I don’t know, I’m not sure")).unwrap();
        assert_eq!(set.get(Feature::CertaintyDensity), 0.0);
        assert_eq!(set.get(Feature::TokenCount), 6.0);
    }

    #[test]
    fn mixed_sentiment_is_balanced() {
        let set = extract(&chat("I was worried but also excited")).unwrap();
        assert_eq!(set.get(Feature::Sentiment), 0.0);
    }

    #[test]
    fn choice_code_sets_indicator() {
        let r = ResponseRecord::new("I would gather the data.", ScenarioKind::ProblemSolving)
            .with_choice("a");
        let set = extract(&r).unwrap();
        assert_eq!(set.choice(), Some(ChoiceOption::StructuredAnalysis));
        assert_eq!(set.get(Feature::ChoiceStructured), 1.0);
        assert_eq!(set.get(Feature::ChoiceGut), 0.0);
    }

    #[test]
    fn unknown_choice_code_degrades_to_text_only() {
        let r = ResponseRecord::new("Plan it step by step.", ScenarioKind::ProblemSolving)
            .with_choice("Q");
        assert!(extract(&r).is_err());

        let set = extract_or_degrade(&r);
        assert!(!set.is_low_confidence());
        assert_eq!(set.choice(), None);
        assert!(set.get(Feature::AnalyticalMarkers) > 0.0);
    }

    #[test]
    fn empty_text_keeps_valid_choice() {
        let r = ResponseRecord::new("", ScenarioKind::ProblemSolving).with_choice("D");
        let set = extract(&r).unwrap();
        assert!(set.is_low_confidence());
        assert_eq!(set.get(Feature::ChoiceConsult), 1.0);
    }

    #[test]
    fn latency_is_in_seconds() {
        let r = chat("Sure.").with_latency_ms(12_500);
        let set = extract(&r).unwrap();
        assert_eq!(set.get(Feature::LatencySeconds), 12.5);
    }

    #[test]
    fn normalization_is_bounded() {
        for f in Feature::ALL {
            for raw in [-1e9, -1.0, 0.0, 0.05, 1.0, 1e9, f64::NAN] {
                let n = f.normalize(raw);
                assert!((0.0..=1.0).contains(&n), "{f} {raw} -> {n}");
            }
        }
    }
}
