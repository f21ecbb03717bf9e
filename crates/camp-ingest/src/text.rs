//! Parsing for the free-text fields sources use for times, days, dates and ages.

use std::sync::LazyLock;

use camp_core::{MINUTES_PER_DAY, parse_weekday};
use chrono::{Local, NaiveDate, TimeZone};
use regex::Regex;

use crate::error::FieldError;

/// `9`, `9:30`, `15:00`, `3PM`, `3 pm`, `9:30 AM`.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*([ap]m)?$").unwrap());

static MIN_AGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)at least\s+(\d+)").unwrap());

static MAX_AGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)less than\s+(\d+)").unwrap());

static FIRST_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

/// Parses a clock time into minutes since midnight.
///
/// Accepts 12-hour times with an AM/PM suffix, 24-hour `HH` or `HH:MM`, and
/// the words `Noon` and `Midnight`.
pub fn parse_clock(text: &str) -> Result<u32, FieldError> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "noon" => return Ok(12 * 60),
        "midnight" => return Ok(0),
        _ => {}
    }

    let invalid = || FieldError::Clock(trimmed.to_string());
    let caps = CLOCK_RE.captures(trimmed).ok_or_else(invalid)?;
    let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };
    if minute >= 60 {
        return Err(invalid());
    }

    let hour = match caps.get(3) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
            hour % 12 + if pm { 12 } else { 0 }
        }
        None => hour,
    };

    let total = hour * 60 + minute;
    if total > MINUTES_PER_DAY {
        return Err(invalid());
    }
    Ok(total)
}

/// Parses a range such as `9:00 AM - 12:00 PM` or `1 PM – Midnight`.
///
/// A range ending at midnight runs to the end of the day.
pub fn parse_clock_range(text: &str) -> Result<(u32, u32), FieldError> {
    let (start, end) = text
        .split_once(['-', '–'])
        .ok_or_else(|| FieldError::Clock(text.trim().to_string()))?;
    let start = parse_clock(start)?;
    let end = match parse_clock(end)? {
        0 if start > 0 => MINUTES_PER_DAY,
        end => end,
    };
    Ok((start, end))
}

/// Expands weekday tokens such as `Mon-Fri`, `Tue–Thu` or `Mon,Wed`.
///
/// Expanded days come out as canonical three-letter tokens without
/// duplicates. Parts that are not weekdays are passed through unchanged so
/// normalisation can reject the record.
pub fn expand_days<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut days: Vec<String> = Vec::new();
    for token in tokens {
        for part in token.as_ref().split([',', '/']) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            for day in expand_part(part) {
                if !days.contains(&day) {
                    days.push(day);
                }
            }
        }
    }
    days
}

fn expand_part(part: &str) -> Vec<String> {
    if let Some((from, to)) = part.split_once(['-', '–']) {
        if let (Ok(from), Ok(to)) = (parse_weekday(from), parse_weekday(to)) {
            let mut out = Vec::new();
            let mut day = from;
            loop {
                out.push(day.to_string());
                if day == to {
                    break;
                }
                day = day.succ();
            }
            return out;
        }
    }
    match parse_weekday(part) {
        Ok(day) => vec![day.to_string()],
        Err(_) => vec![part.to_string()],
    }
}

/// Parses `2025-07-07`, `July 7, 2025` or `Jul 7, 2025`.
pub fn parse_date(text: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| FieldError::Date(trimmed.to_string()))
}

/// The local calendar day a unix timestamp (seconds) falls on.
pub fn unix_to_local_date(seconds: i64) -> Result<NaiveDate, FieldError> {
    Local
        .timestamp_opt(seconds, 0)
        .single()
        .map(|instant| instant.date_naive())
        .ok_or(FieldError::Timestamp(seconds))
}

/// Reads `at least N yrs but less than M yrs` into (min inclusive, max exclusive).
///
/// Either half may be missing.
pub fn parse_age_text(text: &str) -> (Option<u32>, Option<u32>) {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    };
    (capture(&MIN_AGE_RE), capture(&MAX_AGE_RE))
}

/// The first positive integer in a cell, e.g. `9` in `"9 yrs"`.
pub fn first_positive_integer(text: &str) -> Option<u32> {
    FIRST_NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .find(|n| *n > 0)
}
