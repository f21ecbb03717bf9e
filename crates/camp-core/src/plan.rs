//! Per-child plan store.

use std::collections::BTreeSet;

use crate::conflict::sessions_conflict;
use crate::scheduler::ScheduleError;
use crate::session::Session;

/// Sessions chosen for one child, plus the activities they cover.
///
/// Plans only grow: there is no removal within a run.
#[derive(Debug, Clone, Default)]
pub struct ChildPlan<'a> {
    sessions: Vec<&'a Session>,
    activities: BTreeSet<&'a str>,
}

impl<'a> ChildPlan<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The activity is not yet enrolled and no seated session conflicts.
    pub fn fits(&self, session: &Session, buffer_minutes: u32) -> bool {
        !self.activities.contains(session.activity.as_str())
            && !self
                .sessions
                .iter()
                .any(|seated| sessions_conflict(seated, session, buffer_minutes))
    }

    /// Seats a session. Fails if it does not fit, which is a caller bug.
    pub fn add(&mut self, session: &'a Session, buffer_minutes: u32) -> Result<(), ScheduleError> {
        if !self.fits(session, buffer_minutes) {
            return Err(ScheduleError::InvariantViolation(format!(
                "session {} ({}) added to a plan it does not fit",
                session.id, session.activity
            )));
        }
        self.sessions.push(session);
        self.activities.insert(session.activity.as_str());
        Ok(())
    }

    pub fn sessions(&self) -> &[&'a Session] {
        &self.sessions
    }

    pub fn is_enrolled(&self, activity: &str) -> bool {
        self.activities.contains(activity)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions ordered by start date, then id.
    pub fn into_chronological(self) -> Vec<&'a Session> {
        let mut sessions = self.sessions;
        sessions.sort_by_key(|s| (s.start_date, s.id));
        sessions
    }
}
