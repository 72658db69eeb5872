//! Deterministic combination of lexical and temporal signals into a
//! score, label, and rationale. Pure arithmetic over already-validated
//! inputs; this module has no failure modes.

use chrono::{DateTime, Utc};
use triage_core::PriorityLevel;

/// Peak contribution of a due date landing right now.
const DUE_PEAK: f64 = 0.8;
/// Decay constant in hours; the due contribution is near zero past
/// roughly 150 hours out.
const DUE_DECAY_HOURS: f64 = 36.0;
/// Cap applied to the score when the de-emphasis override fires.
const OVERRIDE_CAP: f64 = 0.33;
/// Due dates further out than this do not block the override.
const OVERRIDE_WINDOW_HOURS: f64 = 24.0;

/// Synthesized priority: score, label, and the reasoning behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Combined score in `[0, 1]`.
    pub score: f64,
    /// Label after threshold mapping and override rules.
    pub label: PriorityLevel,
    /// Non-negative hours until the due date, if one was set.
    pub hours_to_due: Option<f64>,
    /// Human-readable fragments joined with " · "; never empty.
    pub rationale: String,
}

/// Combines signals into `(score, label, rationale)`.
///
/// The due-proximity term decays exponentially with hours-to-due; the
/// lexical score and duration nudge are added on top and the sum is
/// clamped into `[0, 1]`. Explicit de-emphasis cues then force the
/// label to low unless a due date within 24 hours contradicts them;
/// the override only ever lowers a label.
pub fn synthesize(
    now: DateTime<Utc>,
    due: Option<DateTime<Utc>>,
    hits: &[String],
    lexical_score: f64,
    duration_nudge: f64,
    minutes: Option<u32>,
) -> Synthesis {
    let hours_to_due = due.map(|deadline| {
        let millis = (deadline - now).num_milliseconds() as f64;
        (millis / 3_600_000.0).max(0.0)
    });

    let due_score = hours_to_due.map_or(0.0, |hours| DUE_PEAK * (-hours / DUE_DECAY_HOURS).exp());

    let mut score = (due_score + lexical_score + duration_nudge).clamp(0.0, 1.0);
    let mut label = PriorityLevel::from_score(score);

    let deemphasized = hits
        .iter()
        .any(|tag| tag.contains("lowprio") || tag.contains("deemphasis"));
    let due_is_near = hours_to_due.is_some_and(|hours| hours <= OVERRIDE_WINDOW_HOURS);
    if deemphasized && !due_is_near {
        label = PriorityLevel::Low;
        score = score.min(OVERRIDE_CAP);
    }

    Synthesis {
        score,
        label,
        hours_to_due,
        rationale: build_rationale(hours_to_due, hits, minutes),
    }
}

/// Builds the rationale string from its fragments.
fn build_rationale(hours_to_due: Option<f64>, hits: &[String], minutes: Option<u32>) -> String {
    let mut reasons: Vec<String> = Vec::new();

    match hours_to_due {
        Some(hours) if hours <= 1.0 => reasons.push("due ~now".to_owned()),
        Some(hours) if hours <= 24.0 => reasons.push("due within a day".to_owned()),
        Some(hours) if hours <= 72.0 => reasons.push("due in a few days".to_owned()),
        Some(_) => reasons.push("has a due date".to_owned()),
        None => reasons.push("no due date".to_owned()),
    }

    if !hits.is_empty() {
        reasons.push(format!("urgency cues: {}", hits.join(", ")));
    }
    if let Some(estimate) = minutes {
        reasons.push(format!("estimated {estimate} min"));
    }

    reasons.join(" · ")
}
