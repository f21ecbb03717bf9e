//! Session file reader.
//!
//! The session file is a JSON array of records as written by the scraper or
//! by hand. Field spellings vary between sources, so each record is read
//! leniently and then converted into a [`RawSession`]. Records that cannot be
//! understood are reported as [`Warning::MalformedRecord`] and skipped.

use std::fs;
use std::path::Path;

use camp_core::{RawSession, Warning, WarningSink};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldError, IngestError};
use crate::text::{
    expand_days, parse_age_text, parse_clock, parse_clock_range, parse_date, unix_to_local_date,
};

/// Days given either as a list of tokens or as a single text such as `Mon-Fri`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DaysField {
    List(Vec<String>),
    Text(String),
}

impl Default for DaysField {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// One session record with every accepted field spelling.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default, alias = "activity")]
    title: String,
    start_date: Option<String>,
    end_date: Option<String>,
    start_date_unix: Option<i64>,
    end_date_unix: Option<i64>,
    #[serde(default)]
    days: DaysField,
    #[serde(alias = "startMinute")]
    start_minutes: Option<u32>,
    #[serde(alias = "endMinute")]
    end_minutes: Option<u32>,
    start_time: Option<String>,
    end_time: Option<String>,
    /// A combined range such as `9:00 AM - 12:00 PM`.
    time: Option<String>,
    min_age: Option<u32>,
    max_age: Option<u32>,
    ages: Option<String>,
    #[serde(default)]
    availability: String,
    #[serde(default, alias = "url")]
    page_url: String,
}

fn non_blank(text: Option<&String>) -> Option<&str> {
    text.map(|t| t.trim()).filter(|t| !t.is_empty())
}

impl SessionRecord {
    fn dates(&self) -> Result<(NaiveDate, NaiveDate), FieldError> {
        let start = match (non_blank(self.start_date.as_ref()), self.start_date_unix) {
            (Some(text), _) => parse_date(text)?,
            (None, Some(seconds)) => unix_to_local_date(seconds)?,
            (None, None) => return Err(FieldError::Missing("start date")),
        };
        let end = match (non_blank(self.end_date.as_ref()), self.end_date_unix) {
            (Some(text), _) => parse_date(text)?,
            (None, Some(seconds)) => unix_to_local_date(seconds)?,
            (None, None) => start,
        };
        Ok((start, end))
    }

    fn clock(&self) -> Result<(u32, u32), FieldError> {
        if self.start_minutes.is_none() && self.end_minutes.is_none() {
            if let Some(range) = non_blank(self.time.as_ref()) {
                return parse_clock_range(range);
            }
        }

        let start = match (self.start_minutes, non_blank(self.start_time.as_ref())) {
            (Some(minute), _) => minute,
            (None, Some(text)) => parse_clock(text)?,
            (None, None) => 0,
        };
        let end = match (self.end_minutes, non_blank(self.end_time.as_ref())) {
            (Some(minute), _) => minute,
            // A window ending at midnight runs to the end of the day.
            (None, Some(text)) => match parse_clock(text)? {
                0 if start > 0 => camp_core::MINUTES_PER_DAY,
                end => end,
            },
            (None, None) => 0,
        };
        Ok((start, end))
    }

    fn into_raw(self) -> Result<RawSession, FieldError> {
        let (start_date, end_date) = self.dates()?;
        let (start_minute, end_minute) = self.clock()?;

        let (text_min, text_max) = non_blank(self.ages.as_ref()).map_or((None, None), parse_age_text);
        let days = match &self.days {
            DaysField::List(tokens) => expand_days(tokens),
            DaysField::Text(text) => expand_days(&[text]),
        };

        Ok(RawSession {
            title: self.title,
            start_date,
            end_date,
            days,
            start_minute,
            end_minute,
            min_age: self.min_age.or(text_min),
            max_age: self.max_age.or(text_max),
            availability: self.availability,
            page_url: self.page_url,
        })
    }
}

/// Converts parsed JSON into raw sessions, warning about records it cannot read.
fn records_to_sessions(records: Vec<Value>, sink: &mut impl WarningSink) -> Vec<RawSession> {
    let total = records.len();
    let mut sessions = Vec::with_capacity(total);

    for (index, value) in records.into_iter().enumerate() {
        let converted = serde_json::from_value::<SessionRecord>(value)
            .map_err(|e| e.to_string())
            .and_then(|record| record.into_raw().map_err(|e| e.to_string()));
        match converted {
            Ok(raw) => sessions.push(raw),
            Err(message) => sink.warn(Warning::MalformedRecord { index, message }),
        }
    }

    tracing::debug!(records = total, read = sessions.len(), "parsed session records");
    sessions
}

fn parse_at(path: &Path, text: &str, sink: &mut impl WarningSink) -> Result<Vec<RawSession>, IngestError> {
    let value: Value = serde_json::from_str(text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(records) = value else {
        return Err(IngestError::NotAnArray {
            path: path.to_path_buf(),
        });
    };
    Ok(records_to_sessions(records, sink))
}

/// Parses session records from JSON text.
pub fn parse_sessions(text: &str, sink: &mut impl WarningSink) -> Result<Vec<RawSession>, IngestError> {
    parse_at(Path::new("<input>"), text, sink)
}

/// Reads a session file.
pub fn read_sessions(path: &Path, sink: &mut impl WarningSink) -> Result<Vec<RawSession>, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sessions = parse_at(path, &text, sink)?;
    tracing::info!(path = %path.display(), sessions = sessions.len(), "read session file");
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_reads_canonical_record() {
        let json = r#"[{
            "title": "Clay Creations",
            "startDate": "2025-07-07",
            "endDate": "2025-07-11",
            "days": ["Mon", "Tue", "Wed", "Thu", "Fri"],
            "startMinutes": 540,
            "endMinutes": 720,
            "minAge": 6,
            "maxAge": 12,
            "availability": "Available",
            "pageUrl": "https://example.test/clay"
        }]"#;
        let mut warnings: Vec<Warning> = Vec::new();
        let sessions = parse_sessions(json, &mut warnings).unwrap();

        assert!(warnings.is_empty());
        let clay = &sessions[0];
        assert_eq!(clay.title, "Clay Creations");
        assert_eq!((clay.start_date, clay.end_date), (date(7, 7), date(7, 11)));
        assert_eq!(clay.days.len(), 5);
        assert_eq!((clay.start_minute, clay.end_minute), (540, 720));
        assert_eq!((clay.min_age, clay.max_age), (Some(6), Some(12)));
        assert_eq!(clay.page_url, "https://example.test/clay");
    }

    #[test]
    fn test_reads_alternate_spellings() {
        let json = r#"[{
            "activity": "Rocket Lab",
            "startDate": "July 14, 2025",
            "days": "Tue–Thu",
            "startTime": "1 PM",
            "endTime": "Midnight",
            "ages": "at least 7 yrs but less than 10 yrs",
            "url": "https://example.test/rocket"
        }, {
            "title": "Swim",
            "startDate": "2025-07-21",
            "endDate": "2025-07-25",
            "days": ["Mon-Wed", "Fri"],
            "time": "9:30 AM - Noon"
        }]"#;
        let sessions = parse_sessions(json, &mut Vec::<Warning>::new()).unwrap();

        let rocket = &sessions[0];
        assert_eq!(rocket.title, "Rocket Lab");
        assert_eq!(rocket.end_date, rocket.start_date);
        assert_eq!(rocket.days, ["Tue", "Wed", "Thu"]);
        assert_eq!((rocket.start_minute, rocket.end_minute), (780, 1440));
        assert_eq!((rocket.min_age, rocket.max_age), (Some(7), Some(10)));
        assert_eq!(rocket.availability, "");
        assert_eq!(rocket.page_url, "https://example.test/rocket");

        let swim = &sessions[1];
        assert_eq!(swim.days, ["Mon", "Tue", "Wed", "Fri"]);
        assert_eq!((swim.start_minute, swim.end_minute), (570, 720));
    }

    #[test]
    fn test_unix_dates_use_the_local_day() {
        let noon = date(7, 7).and_hms_opt(12, 0, 0).unwrap();
        let seconds = noon
            .and_local_timezone(chrono::Local)
            .single()
            .unwrap()
            .timestamp();
        let json = format!(r#"[{{"title": "Clay", "startDateUnix": {seconds}, "endDateUnix": {seconds}}}]"#);
        let sessions = parse_sessions(&json, &mut Vec::<Warning>::new()).unwrap();
        assert_eq!(sessions[0].start_date, date(7, 7));
    }

    #[test]
    fn test_malformed_records_are_skipped_with_warnings() {
        let json = r#"[
            {"title": "No dates"},
            {"title": "Bad clock", "startDate": "2025-07-07", "startTime": "sometime"},
            {"title": "Wrong type", "startDate": 20250707},
            {"title": "Fine", "startDate": "2025-07-07"},
            "not an object"
        ]"#;
        let mut warnings: Vec<Warning> = Vec::new();
        let sessions = parse_sessions(json, &mut warnings).unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title, "Fine");
        let indices: Vec<_> = warnings
            .iter()
            .map(|w| match w {
                Warning::MalformedRecord { index, .. } => *index,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(indices, [0, 1, 2, 4]);
    }

    #[test]
    fn test_missing_title_is_left_for_normalisation() {
        let sessions =
            parse_sessions(r#"[{"startDate": "2025-07-07"}]"#, &mut Vec::<Warning>::new()).unwrap();
        assert_eq!(sessions[0].title, "");
    }

    #[test]
    fn test_non_array_is_fatal() {
        let err = parse_sessions(r#"{"title": "Clay"}"#, &mut Vec::<Warning>::new()).unwrap_err();
        assert!(matches!(err, IngestError::NotAnArray { .. }));

        let err = parse_sessions("[{", &mut Vec::<Warning>::new()).unwrap_err();
        assert!(matches!(err, IngestError::Json { .. }));
    }

    #[test]
    fn test_reads_from_file_and_reports_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "Clay", "startDate": "2025-07-07"}}]"#).unwrap();
        let sessions = read_sessions(file.path(), &mut Vec::<Warning>::new()).unwrap();
        assert_eq!(sessions.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let err = read_sessions(&dir.path().join("missing.json"), &mut Vec::<Warning>::new())
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
