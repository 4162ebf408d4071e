//! Date and time parsing utilities.
//!
//! Accepts natural language (`today`, `in 3 days`, `next friday 3pm`) as
//! well as ISO dates and RFC 3339 timestamps. Calendar dates resolve to
//! midnight UTC unless a time of day is given.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CadenceError;

/// Trailing time of day: `3pm`, `3:30pm`, `15:00`, optionally preceded by "at".
static TIME_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<rest>.*?)\s*(?:\bat\s+)?\b(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<ampm>am|pm)?$")
        .unwrap_or_else(|e| panic!("Invalid time regex: {e}"))
});

/// Parse a calendar date relative to `today`.
///
/// Supports:
/// - `today`, `tomorrow`, `yesterday`
/// - `monday`, `tue`, ... (next occurrence), `next monday`
/// - `in 3 days`, `in 2 weeks`
/// - `2024-12-15`
///
/// Returns `None` if the input cannot be parsed.
#[must_use]
pub fn parse_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {},
    }

    if let Some(date) = parse_relative_offset(&input, today) {
        return Some(date);
    }

    if let Some(date) = parse_weekday(&input, today) {
        return Some(date);
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d").ok()
}

/// Parse a timestamp relative to `now`.
///
/// Tries RFC 3339 first, then `YYYY-MM-DD HH:MM`, then a natural date with
/// an optional trailing time of day.
///
/// # Errors
///
/// Returns `CadenceError::Parse` if the input matches none of the formats.
pub fn parse_timestamp(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CadenceError> {
    let trimmed = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Ok(naive.and_utc());
    }

    let today = now.date_naive();
    let unparseable = || CadenceError::Parse(format!("Unrecognized date '{trimmed}'"));

    if let Some(date) = parse_date(trimmed, today) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    let lowered = trimmed.to_lowercase();
    let (date_part, time) = extract_time(&lowered).ok_or_else(unparseable)?;
    let date = if date_part.is_empty() {
        today
    } else {
        parse_date(&date_part, today).ok_or_else(unparseable)?
    };
    Ok(date.and_time(time).and_utc())
}

/// Split a trailing time of day off the input.
fn extract_time(input: &str) -> Option<(String, NaiveTime)> {
    let caps = TIME_SUFFIX.captures(input)?;
    let mut hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
    let minute: u32 = caps
        .name("minute")
        .map_or(Some(0), |m| m.as_str().parse().ok())?;

    match caps.name("ampm").map(|m| m.as_str()) {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        Some(_) if hour > 12 => return None,
        None if caps.name("minute").is_none() => return None,
        _ => {},
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim().to_string();
    Some((rest, time))
}

/// Parse "in X days/weeks" patterns.
fn parse_relative_offset(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() == 3 && parts[0] == "in" {
        let amount: i64 = parts[1].parse().ok()?;
        let days = match parts[2].trim_end_matches('s') {
            "day" => amount,
            "week" => amount.checked_mul(7)?,
            _ => return None,
        };
        return today.checked_add_signed(Duration::try_days(days)?);
    }

    None
}

/// Parse weekday names.
fn parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (is_next, day_str) = input
        .strip_prefix("next ")
        .map_or((false, input), |rest| (true, rest));

    let target = match day_str {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    let mut days_until = (i64::from(target.num_days_from_sunday())
        - i64::from(today.weekday().num_days_from_sunday())
        + 7)
        % 7;

    if days_until == 0 || is_next {
        days_until += 7;
    }

    Some(today + Duration::days(days_until))
}
