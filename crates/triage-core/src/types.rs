use core::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority label assigned to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    /// Urgent or time-sensitive work.
    High,
    /// Normal importance.
    Medium,
    /// Optional or deferred work.
    Low,
}

impl PriorityLevel {
    /// Signed lexical weight contributed by a user cue of this level.
    pub fn as_weight(self) -> f64 {
        match self {
            Self::High => 0.66,
            Self::Medium => 0.0,
            Self::Low => -0.66,
        }
    }

    /// Fixed score assigned when the remote classifier returns this label.
    pub fn classifier_score(self) -> f64 {
        match self {
            Self::High => 0.9,
            Self::Medium => 0.5,
            Self::Low => 0.1,
        }
    }

    /// String form matching the wire and store representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses a level from arbitrary input, coercing unknown values to
    /// [`Medium`](Self::Medium).
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Maps a combined score in `[0, 1]` to a label.
    ///
    /// Thresholds: `>= 0.66` is high, `>= 0.33` is medium, else low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.66 {
            Self::High
        } else if score >= 0.33 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Maps a legacy signed cue weight back to a level.
    ///
    /// Used when migrating stored cues from the old `{phrase, w}` shape.
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.3 {
            Self::High
        } else if weight <= -0.3 {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl Display for PriorityLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.as_str())
    }
}

/// A user-defined keyword that nudges the priority score.
///
/// Phrases are matched case-insensitively with word-boundary semantics;
/// the registry guarantees at most one cue per distinct phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCue {
    /// The phrase to match, trimmed and non-empty.
    pub phrase: String,
    /// The nudge direction this phrase carries.
    pub level: PriorityLevel,
}

impl PriorityCue {
    /// Creates a cue from a phrase and level.
    pub fn new(phrase: impl Into<String>, level: PriorityLevel) -> Self {
        Self {
            phrase: phrase.into(),
            level,
        }
    }
}

/// Intermediate signals recorded while deriving a priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    /// Tags of the cues that fired, in table-scan order.
    pub hits: Vec<String>,
    /// Estimated task duration in minutes, if one was found.
    pub minutes: Option<u32>,
    /// Non-negative hours until the due date, if one was found.
    pub hours_to_due: Option<f64>,
}

/// The output of one priority derivation call.
///
/// Constructed fresh per call and never mutated afterwards; persistence
/// is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    /// Input text with internal whitespace collapsed to single spaces.
    pub clean_text: String,
    /// Absolute due timestamp, if one was inferred.
    pub due: Option<DateTime<Utc>>,
    /// The signals that contributed to the score.
    pub signals: Signals,
    /// Combined priority score in `[0, 1]`.
    pub score: f64,
    /// Label derived from the score, subject to override rules.
    pub label: PriorityLevel,
    /// Human-readable summary of why the label was chosen.
    pub rationale: String,
}

impl PriorityResult {
    /// Builds the result shape used for remote classifications.
    ///
    /// Remote results carry no due date or signals; the score comes
    /// from the fixed per-label table.
    pub fn from_classifier(clean_text: impl Into<String>, label: PriorityLevel) -> Self {
        Self {
            clean_text: clean_text.into(),
            due: None,
            signals: Signals::default(),
            score: label.classifier_score(),
            label,
            rationale: format!("LLM classification: {label}"),
        }
    }

    /// Whether this result came from the remote classifier.
    pub fn is_remote(&self) -> bool {
        self.rationale.starts_with("LLM classification:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_weight_table() {
        assert!((PriorityLevel::High.as_weight() - 0.66).abs() < f64::EPSILON);
        assert!(PriorityLevel::Medium.as_weight().abs() < f64::EPSILON);
        assert!((PriorityLevel::Low.as_weight() + 0.66).abs() < f64::EPSILON);
    }

    #[test]
    fn test_level_parse_lenient_coerces_unknown() {
        assert_eq!(PriorityLevel::parse_lenient("HIGH"), PriorityLevel::High);
        assert_eq!(PriorityLevel::parse_lenient(" low "), PriorityLevel::Low);
        assert_eq!(PriorityLevel::parse_lenient("urgent!"), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::parse_lenient(""), PriorityLevel::Medium);
    }

    #[test]
    fn test_level_from_score_thresholds() {
        assert_eq!(PriorityLevel::from_score(0.66), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(0.65), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(0.33), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(0.32), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_score(0.0), PriorityLevel::Low);
    }

    #[test]
    fn test_level_from_weight_migration() {
        assert_eq!(PriorityLevel::from_weight(0.66), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_weight(0.3), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_weight(0.0), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_weight(-0.3), PriorityLevel::Low);
    }

    #[test]
    fn test_level_serde_lowercase() {
        let json = serde_json::to_string(&PriorityLevel::High).unwrap_or_default();
        assert_eq!(json, "\"high\"");
        let parsed: PriorityLevel = serde_json::from_str("\"low\"").unwrap_or(PriorityLevel::Medium);
        assert_eq!(parsed, PriorityLevel::Low);
    }

    #[test]
    fn test_remote_result_shape() {
        let result = PriorityResult::from_classifier("send report", PriorityLevel::High);
        assert!((result.score - 0.9).abs() < f64::EPSILON);
        assert_eq!(result.rationale, "LLM classification: high");
        assert!(result.due.is_none());
        assert!(result.signals.hits.is_empty());
        assert!(result.is_remote());
    }
}
