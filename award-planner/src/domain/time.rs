//! Naive local timestamp handling.
//!
//! The availability API reports departure and arrival times in the local time
//! of the airport concerned, sometimes with a spurious trailing `Z`. There is
//! no time zone database involved anywhere: timestamps stay naive, and day
//! arithmetic is plain calendar arithmetic on the local values.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Error returned when parsing an invalid timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Accepted layouts, tried in order. Fractional seconds are handled by `%.f`.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a local timestamp, discarding any trailing `Z`.
///
/// The `Z` is not honoured as UTC: the API marks local wall-clock times with
/// it, so the value is kept exactly as written.
///
/// # Examples
///
/// ```
/// use award_planner::domain::parse_local_timestamp;
///
/// let a = parse_local_timestamp("2025-03-15T09:30:00Z").unwrap();
/// let b = parse_local_timestamp("2025-03-15 09:30").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "2025-03-15 09:30:00");
///
/// assert!(parse_local_timestamp("15/03/2025 09:30").is_err());
/// ```
pub fn parse_local_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    let trimmed = s.trim();
    let local = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    if local.is_empty() {
        return Err(TimeError::new(s, "empty"));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
        .ok_or_else(|| TimeError::new(s, "expected YYYY-MM-DDTHH:MM[:SS]"))
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The last whole second of `date` (23:59:59).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::seconds(1)
}

/// Calendar days between `base` and the date of `ts`.
///
/// Negative when `ts` falls before `base`.
pub fn day_offset(ts: NaiveDateTime, base: NaiveDate) -> i64 {
    ts.date().signed_duration_since(base).num_days()
}

/// Format `ts` as `HH:MM`, annotated with `(+N)` when it falls N days after `base`.
///
/// Times on or before the base date carry no annotation.
///
/// # Examples
///
/// ```
/// use award_planner::domain::{format_with_day_offset, parse_local_timestamp};
/// use chrono::NaiveDate;
///
/// let base = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
///
/// let same_day = parse_local_timestamp("2025-03-15T23:10").unwrap();
/// assert_eq!(format_with_day_offset(same_day, base), "23:10");
///
/// let two_days_on = parse_local_timestamp("2025-03-17T06:45").unwrap();
/// assert_eq!(format_with_day_offset(two_days_on, base), "06:45 (+2)");
/// ```
pub fn format_with_day_offset(ts: NaiveDateTime, base: NaiveDate) -> String {
    let clock = ts.format("%H:%M");
    match day_offset(ts, base) {
        n if n > 0 => format!("{clock} (+{n})"),
        _ => clock.to_string(),
    }
}

/// Every calendar date touched by `[start, end]`, in order, one per day.
///
/// Empty when `end` precedes `start`.
pub fn dates_between(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let last = end.date();
    let mut current = start.date();

    while current <= last {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    dates
}
