//! Due date and duration extraction.
//!
//! Two parsing strategies sit behind [`TemporalParser`]: the full
//! date-expression parser, and a minimal keyword fallback. Selection
//! happens once when the engine is constructed, not per call.

/// Minimal keyword-based due date parser.
pub mod fallback;
/// Full date-expression parser.
pub mod full;

use std::sync::LazyLock;

use chrono::{DateTime, Duration, TimeZone as _, Utc};
use regex::Regex;
use triage_core::TemporalConfig;

pub use fallback::FallbackParser;
pub use full::FullParser;

/// Strategy for inferring an absolute due timestamp from text.
pub trait TemporalParser: Send + Sync {
    /// Parses a due timestamp from text, resolving relative
    /// expressions against `now`.
    fn parse_due(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Selects the configured parser strategy.
pub fn select_parser(config: &TemporalConfig) -> Box<dyn TemporalParser> {
    if config.full_parser {
        Box::new(FullParser)
    } else {
        Box::new(FallbackParser)
    }
}

/// Compiles a fixed pattern, panicking at first use if invalid.
fn fixed_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(error) => panic!("temporal pattern is invalid: {error}"),
    }
}

/// First `<number> <unit>` duration expression.
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| fixed_regex(r"(?i)\b(\d+)\s*(min|mins|minutes|m|hour|hours|h)\b"));

/// Urgency keywords that imply a near-term deadline on their own.
static IMMEDIACY: LazyLock<Regex> = LazyLock::new(|| {
    fixed_regex(r"(?i)\b(asap|immediately|right away|now|today|urgent|critical|high(-|\s*)prio)\b")
});

/// Extracts an estimated duration in minutes from text.
///
/// Only the first match is used; hour units are converted to minutes.
pub fn extract_minutes(text: &str) -> Option<u32> {
    let captures = DURATION.captures(text)?;
    let count: u32 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures.get(2)?.as_str().to_lowercase();
    if unit.starts_with('h') {
        Some(count.saturating_mul(60))
    } else {
        Some(count)
    }
}

/// Score nudge for short tasks.
///
/// Tasks of ten minutes or less read slightly less urgent, a soft
/// heuristic with deliberately small constants.
pub fn duration_nudge(minutes: Option<u32>) -> f64 {
    match minutes {
        Some(value) if value <= 10 => -0.05,
        Some(value) if value <= 30 => -0.025,
        _ => 0.0,
    }
}

/// Treats bare urgency keywords as a near-term deadline.
///
/// Only consulted when no explicit due date was parsed; returns
/// `now + 1h` so urgency wording alone still produces a due-proximity
/// effect.
pub fn infer_immediate(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    IMMEDIACY
        .is_match(text)
        .then(|| now + Duration::hours(1))
}

/// End of the day containing `timestamp` (23:59:59.999).
pub fn end_of_day(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map_or(timestamp, |naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2024, 3, 12, 9, 30, 0) {
            chrono::LocalResult::Single(now) => now,
            _ => panic!("fixed timestamp must be unambiguous"),
        }
    }

    #[test]
    fn test_extract_minutes_units() {
        assert_eq!(extract_minutes("should take 30 min"), Some(30));
        assert_eq!(extract_minutes("roughly 2 hours of work"), Some(120));
        assert_eq!(extract_minutes("a 45m call"), Some(45));
        assert_eq!(extract_minutes("1h sync"), Some(60));
        assert_eq!(extract_minutes("no duration here"), None);
    }

    #[test]
    fn test_extract_minutes_first_match_wins() {
        assert_eq!(extract_minutes("5 min now, 3 hours later"), Some(5));
    }

    #[test]
    fn test_duration_nudge_bands() {
        assert!((duration_nudge(Some(10)) + 0.05).abs() < 1e-9);
        assert!((duration_nudge(Some(11)) + 0.025).abs() < 1e-9);
        assert!((duration_nudge(Some(30)) + 0.025).abs() < 1e-9);
        assert!(duration_nudge(Some(31)).abs() < f64::EPSILON);
        assert!(duration_nudge(None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_infer_immediate_from_urgency_words() {
        let now = fixed_now();
        assert_eq!(
            infer_immediate("do this asap", now),
            Some(now + Duration::hours(1))
        );
        assert_eq!(
            infer_immediate("critical fix", now),
            Some(now + Duration::hours(1))
        );
        assert_eq!(infer_immediate("sometime whenever", now), None);
    }

    #[test]
    fn test_end_of_day_clamps_to_milliseconds() {
        let end = end_of_day(fixed_now());
        assert_eq!(end.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
        assert_eq!(end.date_naive(), fixed_now().date_naive());
    }
}
