//! Core domain logic for the camp scheduler.
//!
//! This crate contains the fundamental types and logic for:
//! - Normalisation: validating raw session records into [`Session`]s
//! - Eligibility and conflicts: whether a child can take a session
//! - Scheduling: the two-phase greedy planner behind [`schedule`]

mod conflict;
mod eligibility;
mod plan;
pub mod preferences;
pub mod priority;
mod scheduler;
pub mod session;
pub mod types;
pub mod warning;

pub use conflict::{DEFAULT_BUFFER_MINUTES, dates_overlap, sessions_conflict};
pub use eligibility::{availability_is_open, is_child_eligible};
pub use plan::ChildPlan;
pub use preferences::{Child, PreferenceSheet, PreferenceSheetBuilder};
pub use priority::{Priority, UnknownPriority};
pub use scheduler::{RunResult, ScheduleError, SchedulerConfig, schedule};
pub use session::{RawSession, Session, normalise_sessions};
pub use types::{
    ActivityName, AgeBounds, ChildName, ClockWindow, MINUTES_PER_DAY, SessionId, ValidationError,
    WeekdaySet, parse_weekday,
};
pub use warning::{TracingSink, Warning, WarningSink};
