//! Minimal keyword-based due date parser.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use super::{TemporalParser, end_of_day, fixed_regex};

/// "today" literal.
static TODAY: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"(?i)\btoday\b"));
/// "tomorrow" literal and its shorthands.
static TOMORROW: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"(?i)\b(tomorrow|tmr|tmrw)\b"));
/// "next week" literal.
static NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"(?i)\bnext week\b"));

/// Fallback strategy recognizing exactly three literal patterns:
/// "today", "tomorrow" (and shorthands), and "next week", each
/// resolving to end of the respective day. Nothing else is
/// recognized.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackParser;

impl TemporalParser for FallbackParser {
    fn parse_due(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if TODAY.is_match(text) {
            Some(end_of_day(now))
        } else if TOMORROW.is_match(text) {
            Some(end_of_day(now + Duration::days(1)))
        } else if NEXT_WEEK.is_match(text) {
            Some(end_of_day(now + Duration::days(7)))
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
