//! Local heuristic derivation path.

use chrono::{DateTime, Utc};
use tracing::debug;
use triage_core::{PriorityResult, Signals, TemporalConfig};

use crate::cues::CueRegistry;
use crate::scanner::scan;
use crate::synth::synthesize;
use crate::temporal::{
    TemporalParser, duration_nudge, extract_minutes, infer_immediate, select_parser,
};

/// In-process priority analyzer: lexical scan, temporal extraction,
/// and score synthesis.
///
/// Never fails for any string input; an empty string yields a zero
/// score with the "no due date" rationale.
pub struct LocalAnalyzer {
    /// Source of user cues consulted on every call.
    registry: CueRegistry,
    /// Due date parsing strategy, selected at construction.
    parser: Box<dyn TemporalParser>,
}

impl LocalAnalyzer {
    /// Creates an analyzer with the configured temporal strategy.
    pub fn new(registry: CueRegistry, temporal: &TemporalConfig) -> Self {
        Self {
            registry,
            parser: select_parser(temporal),
        }
    }

    /// Replaces the temporal parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Box<dyn TemporalParser>) -> Self {
        self.parser = parser;
        self
    }

    /// The registry this analyzer reads user cues from.
    pub fn registry(&self) -> &CueRegistry {
        &self.registry
    }

    /// Derives a priority from task text, deterministic for a fixed
    /// `now` and cue set.
    pub fn derive(&self, text: &str, now: DateTime<Utc>) -> PriorityResult {
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = cleaned.to_lowercase();

        let user_cues = self.registry.list();
        let outcome = scan(&lower, &user_cues);

        let minutes = extract_minutes(&lower);
        let nudge = duration_nudge(minutes);

        let due = self
            .parser
            .parse_due(&lower, now)
            .or_else(|| infer_immediate(&lower, now));

        debug!(
            parser = self.parser.name(),
            hits = outcome.hits.len(),
            has_due = due.is_some(),
            "local derivation signals"
        );

        let synthesis = synthesize(now, due, &outcome.hits, outcome.lexical_score, nudge, minutes);

        PriorityResult {
            clean_text: cleaned,
            due,
            signals: Signals {
                hits: outcome.hits,
                minutes,
                hours_to_due: synthesis.hours_to_due,
            },
            score: synthesis.score,
            label: synthesis.label,
            rationale: synthesis.rationale,
        }
    }
}
