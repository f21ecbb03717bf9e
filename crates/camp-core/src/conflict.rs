//! Conflict detection between two sessions attended by the same child.

use crate::session::Session;

/// Travel-and-transition allowance between two sessions on the same day.
pub const DEFAULT_BUFFER_MINUTES: u32 = 120;

/// Inclusive date ranges share at least one calendar day.
pub fn dates_overlap(a: &Session, b: &Session) -> bool {
    a.end_date >= b.start_date && b.end_date >= a.start_date
}

/// Two sessions conflict when their dates overlap, they share a weekday and
/// their clock windows come within `buffer_minutes` of each other.
///
/// Unspecified weekdays or clock windows count as overlapping.
pub fn sessions_conflict(a: &Session, b: &Session, buffer_minutes: u32) -> bool {
    dates_overlap(a, b)
        && a.weekdays.overlaps(b.weekdays)
        && a.clock.within_buffer(b.clock, buffer_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityName, AgeBounds, ClockWindow, SessionId, WeekdaySet};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn session(start: (u32, u32), end: (u32, u32), days: &[&str], clock: (u32, u32)) -> Session {
        Session {
            id: SessionId(0),
            activity: ActivityName::new("Any").unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, start.0, start.1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, end.0, end.1).unwrap(),
            weekdays: WeekdaySet::parse(days).unwrap(),
            clock: ClockWindow::new(clock.0, clock.1).unwrap(),
            ages: AgeBounds::UNBOUNDED,
            availability: String::new(),
            page_url: String::new(),
            interested: BTreeMap::new(),
        }
    }

    const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri"];

    #[test]
    fn test_buffer_enforces_separation() {
        let morning = session((7, 7), (7, 11), WEEKDAYS, (540, 720));
        let lunch = session((7, 7), (7, 11), WEEKDAYS, (780, 840));
        let afternoon = session((7, 7), (7, 11), WEEKDAYS, (840, 960));

        assert!(sessions_conflict(&morning, &lunch, DEFAULT_BUFFER_MINUTES));
        assert!(!sessions_conflict(&morning, &afternoon, DEFAULT_BUFFER_MINUTES));
        assert!(!sessions_conflict(&morning, &lunch, 0));
    }

    #[test]
    fn test_disjoint_dates_never_conflict() {
        let first_week = session((7, 7), (7, 11), WEEKDAYS, (540, 720));
        let second_week = session((7, 14), (7, 18), WEEKDAYS, (540, 720));
        assert!(!sessions_conflict(&first_week, &second_week, DEFAULT_BUFFER_MINUTES));
    }

    #[test]
    fn test_touching_dates_overlap() {
        let first = session((7, 7), (7, 11), WEEKDAYS, (540, 720));
        let second = session((7, 11), (7, 15), WEEKDAYS, (540, 720));
        assert!(dates_overlap(&first, &second));
        assert!(sessions_conflict(&first, &second, DEFAULT_BUFFER_MINUTES));
    }

    #[test]
    fn test_disjoint_weekdays_never_conflict() {
        let mon_wed = session((7, 7), (8, 29), &["Mon", "Wed"], (540, 720));
        let tue_thu = session((7, 7), (8, 29), &["Tue", "Thu"], (540, 720));
        assert!(!sessions_conflict(&mon_wed, &tue_thu, DEFAULT_BUFFER_MINUTES));
    }

    #[test]
    fn test_unspecified_weekdays_conflict_with_overlapping_dates() {
        let unspecified = session((7, 7), (7, 11), &[], (540, 720));
        let saturday = session((7, 5), (7, 12), &["Sat"], (600, 660));
        assert!(sessions_conflict(&unspecified, &saturday, DEFAULT_BUFFER_MINUTES));
    }

    #[test]
    fn test_unspecified_clock_forces_conflict() {
        let no_clock = session((7, 7), (7, 11), WEEKDAYS, (0, 0));
        let evening = session((7, 7), (7, 11), WEEKDAYS, (1200, 1260));
        assert!(sessions_conflict(&no_clock, &evening, DEFAULT_BUFFER_MINUTES));
    }

    #[test]
    fn test_predicate_is_symmetric_and_reflexive() {
        let a = session((7, 7), (7, 11), WEEKDAYS, (540, 720));
        let b = session((7, 9), (7, 20), &["Wed"], (700, 800));
        assert_eq!(
            sessions_conflict(&a, &b, DEFAULT_BUFFER_MINUTES),
            sessions_conflict(&b, &a, DEFAULT_BUFFER_MINUTES)
        );
        assert!(sessions_conflict(&a, &a, DEFAULT_BUFFER_MINUTES));
    }
}
