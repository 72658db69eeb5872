//! Full date-expression parser.
//!
//! Recognizes clock times, weekday names, calendar dates, relative
//! offsets, and the literal day keywords. Each recognizer resolves
//! forward (ambiguous expressions land in the future relative to
//! `now`); recognizers are independent, and when several expressions
//! parse, the chronologically earliest candidate wins.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike as _, Duration, NaiveDate, TimeZone as _, Utc, Weekday};
use regex::Regex;

use super::{TemporalParser, end_of_day, fixed_regex};

/// Clock time with meridiem: "5pm", "5:30 pm".
static CLOCK_MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| fixed_regex(r"(?i)\b(\d{1,2})(?::([0-5]\d))?\s*(am|pm)\b"));

/// 24-hour clock time introduced by "by" or "at": "at 17:30".
static CLOCK_24H: LazyLock<Regex> =
    LazyLock::new(|| fixed_regex(r"(?i)\b(?:by|at)\s+([01]?\d|2[0-3]):([0-5]\d)\b"));

/// Relative offset: "in 2 hours", "in 3 days".
static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    fixed_regex(r"(?i)\bin\s+(\d+)\s*(minute|minutes|min|mins|hour|hours|h|day|days|week|weeks)\b")
});

/// ISO calendar date: "2024-06-01".
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| fixed_regex(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"));

/// Month-name date: "jun 1", "June 1st".
static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    fixed_regex(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(\d{1,2})(?:st|nd|rd|th)?\b",
    )
});

/// Weekday name, optionally introduced by on/by/this/next.
static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    fixed_regex(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
});

/// Literal day keywords, resolved like the fallback parser.
static TODAY: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"(?i)\b(today|tonight)\b"));
/// "tomorrow" and shorthands.
static TOMORROW: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"(?i)\b(tomorrow|tmr|tmrw)\b"));
/// "next week" literal.
static NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"(?i)\bnext week\b"));

/// Full parsing strategy built from independent regex recognizers.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullParser;

impl TemporalParser for FullParser {
    fn parse_due(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut candidates: Vec<DateTime<Utc>> = Vec::new();

        candidates.extend(clock_candidates(text, now));
        candidates.extend(relative_candidate(text, now));
        candidates.extend(iso_date_candidate(text));
        candidates.extend(month_day_candidate(text, now));
        candidates.extend(weekday_candidate(text, now));

        if TODAY.is_match(text) {
            candidates.push(end_of_day(now));
        }
        if TOMORROW.is_match(text) {
            candidates.push(end_of_day(now + Duration::days(1)));
        }
        if NEXT_WEEK.is_match(text) {
            candidates.push(end_of_day(now + Duration::days(7)));
        }

        candidates.into_iter().min()
    }

    fn name(&self) -> &'static str {
        "full"
    }
}

/// Resolves a wall-clock time on `now`'s date, rolling to the next day
/// when the time has already passed.
fn at_time_forward(now: DateTime<Utc>, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let naive = now.date_naive().and_hms_opt(hour, minute, 0)?;
    let candidate = Utc.from_utc_datetime(&naive);
    if candidate <= now {
        Some(candidate + Duration::days(1))
    } else {
        Some(candidate)
    }
}

/// Clock-time candidates from both the meridiem and 24-hour forms.
fn clock_candidates(text: &str, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut candidates = Vec::new();

    if let Some(captures) = CLOCK_MERIDIEM.captures(text) {
        let hour_12: u32 = captures
            .get(1)
            .and_then(|digits| digits.as_str().parse().ok())
            .unwrap_or(0);
        let minute: u32 = captures
            .get(2)
            .and_then(|digits| digits.as_str().parse().ok())
            .unwrap_or(0);
        let is_pm = captures
            .get(3)
            .is_some_and(|meridiem| meridiem.as_str().eq_ignore_ascii_case("pm"));

        if (1..=12).contains(&hour_12) {
            let hour = if is_pm { hour_12 % 12 + 12 } else { hour_12 % 12 };
            candidates.extend(at_time_forward(now, hour, minute));
        }
    }

    if let Some(captures) = CLOCK_24H.captures(text) {
        let hour: Option<u32> = captures.get(1).and_then(|digits| digits.as_str().parse().ok());
        let minute: Option<u32> = captures.get(2).and_then(|digits| digits.as_str().parse().ok());
        if let (Some(hour), Some(minute)) = (hour, minute) {
            candidates.extend(at_time_forward(now, hour, minute));
        }
    }

    candidates
}

/// "in N units" offset from `now`.
fn relative_candidate(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let captures = RELATIVE.captures(text)?;
    let count: i64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures.get(2)?.as_str().to_lowercase();

    let offset = if unit.starts_with('w') {
        Duration::weeks(count)
    } else if unit.starts_with('d') {
        Duration::days(count)
    } else if unit.starts_with('h') {
        Duration::hours(count)
    } else {
        Duration::minutes(count)
    };

    Some(now + offset)
}

/// Explicit ISO date; kept even when it lies in the past, since an
/// explicit date is not ambiguous.
fn iso_date_candidate(text: &str) -> Option<DateTime<Utc>> {
    let captures = ISO_DATE.captures(text)?;
    let year: i32 = captures.get(1)?.as_str().parse().ok()?;
    let month: u32 = captures.get(2)?.as_str().parse().ok()?;
    let day: u32 = captures.get(3)?.as_str().parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let naive = date.and_hms_milli_opt(23, 59, 59, 999)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Month-name date, resolved to the next occurrence.
fn month_day_candidate(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let captures = MONTH_DAY.captures(text)?;
    let month = month_number(captures.get(1)?.as_str())?;
    let day: u32 = captures.get(2)?.as_str().parse().ok()?;

    let this_year = NaiveDate::from_ymd_opt(now.year(), month, day)?;
    let date = if this_year < now.date_naive() {
        NaiveDate::from_ymd_opt(now.year() + 1, month, day)?
    } else {
        this_year
    };

    let naive = date.and_hms_milli_opt(23, 59, 59, 999)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Maps a month-name prefix to its calendar number.
fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Next occurrence of a named weekday, end of that day.
///
/// A weekday naming today resolves to the same day next week.
fn weekday_candidate(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let captures = WEEKDAY.captures(text)?;
    let target = match captures.get(1)?.as_str().to_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        _ => Weekday::Sun,
    };

    let today = now.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let mut ahead = i64::from(wanted) - i64::from(today);
    if ahead <= 0 {
        ahead += 7;
    }

    Some(end_of_day(now + Duration::days(ahead)))
}
