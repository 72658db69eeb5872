//! Lexical scanning of task text against built-in and user cues.

use std::sync::LazyLock;

use regex::Regex;
use triage_core::PriorityCue;

/// A fixed, non-editable lexical rule.
struct BuiltinCue {
    /// Case-insensitive trigger pattern.
    regex: Regex,
    /// Signed weight contributed when the pattern matches.
    weight: f64,
    /// Stable identifier used in rationale text and testing.
    tag: &'static str,
}

/// Compiles one built-in cue, panicking at first use if the pattern is
/// invalid (the table is fixed, so this is a programming error).
fn builtin(pattern: &str, weight: f64, tag: &'static str) -> BuiltinCue {
    match Regex::new(pattern) {
        Ok(regex) => BuiltinCue { regex, weight, tag },
        Err(error) => panic!("built-in cue pattern {tag} is invalid: {error}"),
    }
}

/// The authoritative built-in cue table.
static BUILTIN_CUES: LazyLock<Vec<BuiltinCue>> = LazyLock::new(|| {
    vec![
        builtin(
            r"(?i)\b(asap|urgent|immediately|right away|now)\b",
            0.45,
            "urgent_keyword",
        ),
        builtin(
            r"(?i)\b(important|priority|critical|high(-|\s*)prio)\b",
            0.35,
            "importance",
        ),
        builtin(r"(?i)\b(eod|end of day|by tonight|tonight)\b", 0.35, "eod"),
        builtin(r"(?i)\b(tomorrow|tmr|tmrw)\b", 0.25, "tomorrow"),
        builtin(
            r"(?i)\b(this (morning|afternoon|evening))\b",
            0.25,
            "same_day",
        ),
        builtin(r"(?i)!!+|🔥|⚠️|❗", 0.20, "punct_emphasis"),
        builtin(
            r"(?i)\b(maybe|someday|later|nice to have)\b",
            -0.35,
            "deemphasis",
        ),
        builtin(r"(?i)\b(low\s*prio|low priority)\b", -0.45, "lowprio"),
    ]
});

/// The cues that matched one text, and the sum of their weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Tags of matched cues, in table-scan order (builtins first).
    pub hits: Vec<String>,
    /// Sum of the weights of all matched cues.
    pub lexical_score: f64,
}

/// Scans text against the built-in table plus the given user cues.
///
/// Each distinct cue contributes its weight at most once regardless of
/// how many times it occurs in the text. User cues are matched as
/// whole words over their exact phrase ("blocker" does not match
/// "blockers"). Pure function; empty text matches nothing.
pub fn scan(text: &str, user_cues: &[PriorityCue]) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for cue in BUILTIN_CUES.iter() {
        if cue.regex.is_match(text) {
            outcome.hits.push(cue.tag.to_owned());
            outcome.lexical_score += cue.weight;
        }
    }

    for cue in user_cues {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(&cue.phrase));
        let Ok(regex) = Regex::new(&pattern) else {
            continue;
        };
        if regex.is_match(text) {
            outcome
                .hits
                .push(format!("user:{}", cue.phrase.to_lowercase()));
            outcome.lexical_score += cue.level.as_weight();
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::PriorityLevel;

    #[test]
    fn test_empty_text_matches_nothing() {
        let outcome = scan("", &[]);
        assert!(outcome.hits.is_empty());
        assert!(outcome.lexical_score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_urgent_keyword_fires_once() {
        let outcome = scan("asap asap urgent", &[]);
        assert_eq!(outcome.hits, vec!["urgent_keyword"]);
        assert!((outcome.lexical_score - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_table_order_preserved() {
        let outcome = scan("urgent and important by tonight, maybe", &[]);
        assert_eq!(
            outcome.hits,
            vec!["urgent_keyword", "importance", "eod", "deemphasis"]
        );
    }

    #[test]
    fn test_punct_emphasis_variants() {
        assert_eq!(scan("do it!!", &[]).hits, vec!["punct_emphasis"]);
        assert_eq!(scan("deploy 🔥", &[]).hits, vec!["punct_emphasis"]);
        assert!(scan("just one!", &[]).hits.is_empty());
    }

    #[test]
    fn test_high_prio_spelling_variants() {
        assert_eq!(scan("high prio", &[]).hits, vec!["importance"]);
        assert_eq!(scan("high-prio", &[]).hits, vec!["importance"]);
        assert_eq!(scan("highprio", &[]).hits, vec!["importance"]);
    }

    #[test]
    fn test_lowprio_and_deemphasis_weights() {
        let outcome = scan("low prio, nice to have", &[]);
        assert_eq!(outcome.hits, vec!["deemphasis", "lowprio"]);
        assert!((outcome.lexical_score + 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_user_cue_word_boundary() {
        let cues = vec![PriorityCue::new("blocker", PriorityLevel::High)];
        let hit = scan("this is a blocker", &cues);
        assert_eq!(hit.hits, vec!["user:blocker"]);
        assert!((hit.lexical_score - 0.66).abs() < 1e-9);

        let miss = scan("these are blockers", &cues);
        assert!(miss.hits.is_empty());
    }

    #[test]
    fn test_user_cue_case_insensitive() {
        let cues = vec![PriorityCue::new("Blocker", PriorityLevel::High)];
        let outcome = scan("huge BLOCKER here", &cues);
        assert_eq!(outcome.hits, vec!["user:blocker"]);
    }

    #[test]
    fn test_user_cues_scan_after_builtins() {
        let cues = vec![PriorityCue::new("blocker", PriorityLevel::High)];
        let outcome = scan("urgent blocker", &cues);
        assert_eq!(outcome.hits, vec!["urgent_keyword", "user:blocker"]);
    }

    #[test]
    fn test_user_cue_with_regex_metacharacters() {
        let cues = vec![PriorityCue::new("c++ review", PriorityLevel::High)];
        let outcome = scan("needs c++ review before friday", &cues);
        assert_eq!(outcome.hits, vec!["user:c++ review"]);
    }
}
