//! Session records and their normalisation.
//!
//! A [`RawSession`] is what an ingester delivers: a title, a date range,
//! weekday tokens, a clock window and the enrolment details. Normalising a
//! list of raw records trims and validates every field, canonicalises the
//! weekday tokens, attaches the preference sheet's `interested` map and
//! numbers the accepted sessions by position.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::preferences::PreferenceSheet;
use crate::priority::Priority;
use crate::types::{
    ActivityName, AgeBounds, ChildName, ClockWindow, SessionId, ValidationError, WeekdaySet,
};
use crate::warning::{Warning, WarningSink};

/// A session record as delivered by an ingester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSession {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub start_minute: u32,
    #[serde(default)]
    pub end_minute: u32,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub availability: String,
    #[serde(default, rename = "pageUrl")]
    pub page_url: String,
}

/// A single normalised offering. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub activity: ActivityName,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weekdays: WeekdaySet,
    pub clock: ClockWindow,
    pub ages: AgeBounds,
    pub availability: String,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    pub interested: BTreeMap<ChildName, Priority>,
}

impl Session {
    /// The child's priority for this session; `No` when the sheet is silent.
    pub fn priority_for(&self, child: &str) -> Priority {
        self.interested.get(child).copied().unwrap_or_default()
    }

    /// First day at the window's start minute.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::default())
            + Duration::minutes(i64::from(self.clock.start_minute()))
    }

    /// Last day at the window's end minute.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.end_date.and_time(NaiveTime::default())
            + Duration::minutes(i64::from(self.clock.end_minute()))
    }

    /// Reconstructs the raw record this session normalises from.
    pub fn to_raw(&self) -> RawSession {
        RawSession {
            title: self.activity.to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            days: self.weekdays.tokens(),
            start_minute: self.clock.start_minute(),
            end_minute: self.clock.end_minute(),
            min_age: self.ages.min_inclusive,
            max_age: self.ages.max_exclusive,
            availability: self.availability.clone(),
            page_url: self.page_url.clone(),
        }
    }
}

/// Validates one raw record. The id is assigned by the caller.
fn normalise_one(
    raw: &RawSession,
    id: SessionId,
    sheet: &PreferenceSheet,
) -> Result<Session, ValidationError> {
    let activity = ActivityName::new(raw.title.as_str())?;

    if raw.start_date > raw.end_date {
        return Err(ValidationError::DateRangeInverted {
            start: raw.start_date,
            end: raw.end_date,
        });
    }

    let weekdays = WeekdaySet::parse(&raw.days)?;
    let clock = ClockWindow::new(raw.start_minute, raw.end_minute)?;
    let interested = sheet.priorities_for(activity.as_str());

    Ok(Session {
        id,
        activity,
        start_date: raw.start_date,
        end_date: raw.end_date,
        weekdays,
        clock,
        ages: AgeBounds {
            min_inclusive: raw.min_age,
            max_exclusive: raw.max_age,
        },
        availability: raw.availability.trim().to_string(),
        page_url: raw.page_url.trim().to_string(),
        interested,
    })
}

/// Normalises raw records into sessions.
///
/// Invalid records are dropped and reported to `sink`. Accepted sessions are
/// numbered by their position in the returned list. Duplicates are kept.
pub fn normalise_sessions(
    raw_sessions: &[RawSession],
    sheet: &PreferenceSheet,
    sink: &mut impl WarningSink,
) -> Vec<Session> {
    let mut sessions = Vec::with_capacity(raw_sessions.len());

    for (index, raw) in raw_sessions.iter().enumerate() {
        match normalise_one(raw, SessionId(sessions.len()), sheet) {
            Ok(session) => sessions.push(session),
            Err(reason) => sink.warn(Warning::InvalidSession {
                index,
                title: raw.title.clone(),
                reason,
            }),
        }
    }

    tracing::debug!(
        accepted = sessions.len(),
        dropped = raw_sessions.len() - sessions.len(),
        "normalised sessions"
    );
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn raw(title: &str) -> RawSession {
        RawSession {
            title: title.to_string(),
            start_date: date(7, 7),
            end_date: date(7, 11),
            days: vec!["mon".into(), "Tuesday".into(), "WED".into()],
            start_minute: 540,
            end_minute: 720,
            min_age: Some(6),
            max_age: Some(12),
            availability: "  Available ".to_string(),
            page_url: " https://example.test/clay ".to_string(),
        }
    }

    fn sheet() -> PreferenceSheet {
        let mut builder = PreferenceSheet::builder();
        builder.add_child(ChildName::new("Alice").unwrap(), 9).unwrap();
        builder.set_priority(ActivityName::new("Clay").unwrap(), "Alice", Priority::High);
        builder.build(&mut Vec::<Warning>::new())
    }

    #[test]
    fn test_normalises_fields() {
        let sessions = normalise_sessions(&[raw(" Clay ")], &sheet(), &mut Vec::<Warning>::new());
        let session = &sessions[0];

        assert_eq!(session.id, SessionId(0));
        assert_eq!(session.activity.as_str(), "Clay");
        assert_eq!(session.weekdays.to_string(), "Mon,Tue,Wed");
        assert_eq!(session.availability, "Available");
        assert_eq!(session.page_url, "https://example.test/clay");
        assert_eq!(session.priority_for("Alice"), Priority::High);
        assert_eq!(session.priority_for("Peter"), Priority::No);
    }

    #[test]
    fn test_ids_follow_accepted_positions() {
        let mut bad = raw("Broken");
        bad.end_date = date(7, 1);
        let input = [raw("Clay"), bad, raw("Rocket")];
        let mut warnings: Vec<Warning> = Vec::new();
        let sessions = normalise_sessions(&input, &sheet(), &mut warnings);

        let ids: Vec<_> = sessions.iter().map(|s| (s.id.0, s.activity.as_str())).collect();
        assert_eq!(ids, [(0, "Clay"), (1, "Rocket")]);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            Warning::InvalidSession {
                index: 1,
                reason: ValidationError::DateRangeInverted { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_missing_title_and_bad_clock() {
        let mut backwards_clock = raw("Clay");
        backwards_clock.start_minute = 800;
        let mut bad_day = raw("Clay");
        bad_day.days = vec!["Someday".into()];
        let input = [raw("   "), backwards_clock, bad_day];
        let mut warnings: Vec<Warning> = Vec::new();
        let sessions = normalise_sessions(&input, &sheet(), &mut warnings);

        assert!(sessions.is_empty());
        let reasons: Vec<_> = warnings
            .iter()
            .map(|w| match w {
                Warning::InvalidSession { reason, .. } => reason.clone(),
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(reasons[0], ValidationError::Empty { field: "title" });
        assert_eq!(
            reasons[1],
            ValidationError::ClockOutOfRange {
                start: 800,
                end: 720
            }
        );
        assert!(matches!(reasons[2], ValidationError::UnknownWeekday { .. }));
    }

    #[test]
    fn test_duplicates_are_kept_distinct() {
        let sessions = normalise_sessions(
            &[raw("Clay"), raw("Clay")],
            &sheet(),
            &mut Vec::<Warning>::new(),
        );
        assert_eq!(sessions.len(), 2);
        assert_ne!(sessions[0].id, sessions[1].id);
    }

    #[test]
    fn test_normalising_normalised_sessions_is_a_no_op() {
        let sheet = sheet();
        let first = normalise_sessions(&[raw(" Clay "), raw("Rocket")], &sheet, &mut Vec::<Warning>::new());
        let again: Vec<RawSession> = first.iter().map(Session::to_raw).collect();
        let second = normalise_sessions(&again, &sheet, &mut Vec::<Warning>::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_instants_combine_date_and_clock() {
        let mut full_day = raw("Clay");
        full_day.start_minute = 0;
        full_day.end_minute = 1440;
        let sessions = normalise_sessions(&[raw("Clay"), full_day], &sheet(), &mut Vec::<Warning>::new());

        assert_eq!(sessions[0].starts_at().to_string(), "2025-07-07 09:00:00");
        assert_eq!(sessions[0].ends_at().to_string(), "2025-07-11 12:00:00");
        assert_eq!(sessions[1].ends_at().to_string(), "2025-07-12 00:00:00");
    }
}
