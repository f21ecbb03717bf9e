//! Whether a child may and wants to attend a session.

use crate::preferences::Child;
use crate::session::Session;

/// Availability strings that mean enrolment is open.
const OPEN_AVAILABILITY: [&str; 3] = ["", "available", "starting soon"];

/// Returns true if the source's availability text means seats can be taken.
///
/// Open: blank, `available`, `starting soon`, or anything mentioning both
/// `space` and `left` (e.g. "3 spaces left"). Everything else is closed.
pub fn availability_is_open(availability: &str) -> bool {
    let lower = availability.trim().to_lowercase();
    OPEN_AVAILABILITY.contains(&lower.as_str()) || (lower.contains("space") && lower.contains("left"))
}

/// Age, availability and positive interest all hold for this child.
pub fn is_child_eligible(session: &Session, child: &Child) -> bool {
    session.ages.admits(child.age)
        && availability_is_open(&session.availability)
        && session.priority_for(child.name.as_str()).is_interested()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;
    use crate::types::{ActivityName, AgeBounds, ChildName, ClockWindow, SessionId, WeekdaySet};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn session(ages: AgeBounds, availability: &str, priority: Priority) -> Session {
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        Session {
            id: SessionId(0),
            activity: ActivityName::new("Clay").unwrap(),
            start_date: date,
            end_date: date,
            weekdays: WeekdaySet::UNSPECIFIED,
            clock: ClockWindow::UNSPECIFIED,
            ages,
            availability: availability.to_string(),
            page_url: String::new(),
            interested: BTreeMap::from([(ChildName::new("Alice").unwrap(), priority)]),
        }
    }

    fn alice(age: u32) -> Child {
        Child {
            name: ChildName::new("Alice").unwrap(),
            age,
        }
    }

    #[test]
    fn test_open_availability_set() {
        for open in ["", "  ", "Available", "Starting Soon", "3 spaces left", "1 Space Left"] {
            assert!(availability_is_open(open), "{open:?} should be open");
        }
        for closed in ["Full", "Waitlist", "Closed", "spaces available", "left"] {
            assert!(!availability_is_open(closed), "{closed:?} should be closed");
        }
    }

    #[test]
    fn test_upper_age_bound_is_exclusive() {
        let bounded = AgeBounds {
            min_inclusive: Some(6),
            max_exclusive: Some(9),
        };
        let s = session(bounded, "available", Priority::High);
        assert!(!is_child_eligible(&s, &alice(9)));
        assert!(is_child_eligible(&s, &alice(8)));
        assert!(!is_child_eligible(&s, &alice(5)));
    }

    #[test]
    fn test_missing_bounds_are_unbounded() {
        let s = session(AgeBounds::UNBOUNDED, "", Priority::Low);
        assert!(is_child_eligible(&s, &alice(1)));
        assert!(is_child_eligible(&s, &alice(40)));
    }

    #[test]
    fn test_closed_or_uninterested_is_ineligible() {
        assert!(!is_child_eligible(
            &session(AgeBounds::UNBOUNDED, "Full", Priority::High),
            &alice(9)
        ));
        assert!(!is_child_eligible(
            &session(AgeBounds::UNBOUNDED, "available", Priority::No),
            &alice(9)
        ));
    }
}
