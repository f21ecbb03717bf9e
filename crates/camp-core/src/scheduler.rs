//! Two-phase greedy scheduler.
//!
//! Turns a normalised session pool and a preference sheet into conflict-free
//! per-child plans plus the list of sessions every child attends together.
//!
//! # Algorithm Summary
//!
//! 1. Joint phase: every session that all children are eligible for is
//!    scored by the sum of their priorities, ranked by
//!    `(-score, start date, id)` and seated in every plan when it fits in
//!    every plan.
//! 2. Individual phase: for activities not taken jointly, every eligible
//!    (session, child) pair is ranked by `(-score, start date, id, child)`
//!    and seated in that child's plan when it fits.
//! 3. Packaging: the joint list and each plan are sorted by
//!    `(start date, id)`.
//!
//! A run moves through `Normalised -> JointSeated -> IndividualSeated` once,
//! with no retries. It is a pure function of its inputs.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::conflict::DEFAULT_BUFFER_MINUTES;
use crate::eligibility::is_child_eligible;
use crate::plan::ChildPlan;
use crate::preferences::{Child, PreferenceSheet};
use crate::session::Session;
use crate::types::ChildName;

/// Configuration for a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Minimum gap between two sessions on the same day.
    /// Default: 120 minutes.
    pub buffer_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
        }
    }
}

/// Errors surfaced by the scheduler. Data problems are never errors here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// An internal invariant broke; this is a bug, not bad input.
    #[error("scheduler invariant violated: {0}")]
    InvariantViolation(String),
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Normalised,
    JointSeated,
    IndividualSeated,
}

/// The joint list and every child's plan, each sorted by start date then id.
///
/// Every joint session also appears in every child's list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult<'a> {
    joint: Vec<&'a Session>,
    per_child: BTreeMap<ChildName, Vec<&'a Session>>,
}

impl<'a> RunResult<'a> {
    pub fn joint(&self) -> &[&'a Session] {
        &self.joint
    }

    /// Plans keyed by child, in name order.
    pub fn per_child(&self) -> &BTreeMap<ChildName, Vec<&'a Session>> {
        &self.per_child
    }

    /// The full plan for a child, joint sessions included. Empty for unknown children.
    pub fn plan_for(&self, child: &str) -> &[&'a Session] {
        self.per_child.get(child).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn joint_activities(&self) -> BTreeSet<&str> {
        self.joint.iter().map(|s| s.activity.as_str()).collect()
    }

    /// A child's plan with joint activities suppressed.
    pub fn individual_sessions(&self, child: &str) -> Vec<&'a Session> {
        let joint = self.joint_activities();
        self.plan_for(child)
            .iter()
            .filter(|s| !joint.contains(s.activity.as_str()))
            .copied()
            .collect()
    }

    /// True when nothing was seated for anyone.
    pub fn is_empty(&self) -> bool {
        self.joint.is_empty() && self.per_child.values().all(Vec::is_empty)
    }
}

#[derive(Debug)]
struct JointCandidate<'a> {
    session: &'a Session,
    score: u32,
}

#[derive(Debug)]
struct IndividualCandidate<'a, 's> {
    session: &'a Session,
    child: &'s Child,
    score: u32,
}

struct Scheduler<'a, 's> {
    sessions: &'a [Session],
    sheet: &'s PreferenceSheet,
    buffer_minutes: u32,
    phase: Phase,
    plans: BTreeMap<ChildName, ChildPlan<'a>>,
    joint: Vec<&'a Session>,
}

impl<'a, 's> Scheduler<'a, 's> {
    fn new(sessions: &'a [Session], sheet: &'s PreferenceSheet, config: &SchedulerConfig) -> Self {
        let plans = sheet
            .children()
            .map(|child| (child.name.clone(), ChildPlan::new()))
            .collect();
        Self {
            sessions,
            sheet,
            buffer_minutes: config.buffer_minutes,
            phase: Phase::Normalised,
            plans,
            joint: Vec::new(),
        }
    }

    fn expect_phase(&self, expected: Phase, step: &str) -> Result<(), ScheduleError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ScheduleError::InvariantViolation(format!(
                "{step} requires phase {expected:?}, run is in {:?}",
                self.phase
            )))
        }
    }

    /// Sessions every child may attend, highest combined priority first.
    fn joint_candidates(&self) -> Vec<JointCandidate<'a>> {
        let sessions: &'a [Session] = self.sessions;
        let mut candidates: Vec<JointCandidate<'a>> = sessions
            .iter()
            .filter_map(|session| {
                let mut score = 0;
                for child in self.sheet.children() {
                    if !is_child_eligible(session, child) {
                        return None;
                    }
                    score += session.priority_for(child.name.as_str()).score();
                }
                Some(JointCandidate { session, score })
            })
            .collect();

        candidates.sort_by_key(|c| (Reverse(c.score), c.session.start_date, c.session.id));
        candidates
    }

    fn seat_joint(&mut self) -> Result<(), ScheduleError> {
        self.expect_phase(Phase::Normalised, "joint seating")?;
        let buffer = self.buffer_minutes;
        let candidates = self.joint_candidates();

        for candidate in &candidates {
            let fits_everywhere = self
                .plans
                .values()
                .all(|plan| plan.fits(candidate.session, buffer));
            if !fits_everywhere {
                continue;
            }
            for plan in self.plans.values_mut() {
                plan.add(candidate.session, buffer)?;
            }
            self.joint.push(candidate.session);
        }

        tracing::debug!(
            candidates = candidates.len(),
            seated = self.joint.len(),
            "joint phase complete"
        );
        self.phase = Phase::JointSeated;
        Ok(())
    }

    /// (session, child) pairs outside the joint activities, best first.
    fn individual_candidates(&self) -> Vec<IndividualCandidate<'a, 's>> {
        let sessions: &'a [Session] = self.sessions;
        let sheet: &'s PreferenceSheet = self.sheet;
        let joint_activities: BTreeSet<&str> =
            self.joint.iter().map(|s| s.activity.as_str()).collect();

        let mut candidates = Vec::new();
        for session in sessions {
            if joint_activities.contains(session.activity.as_str()) {
                continue;
            }
            for child in sheet.children() {
                if is_child_eligible(session, child) {
                    candidates.push(IndividualCandidate {
                        session,
                        child,
                        score: session.priority_for(child.name.as_str()).score(),
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.session.start_date.cmp(&b.session.start_date))
                .then_with(|| a.session.id.cmp(&b.session.id))
                .then_with(|| a.child.name.cmp(&b.child.name))
        });
        candidates
    }

    fn seat_individual(&mut self) -> Result<(), ScheduleError> {
        self.expect_phase(Phase::JointSeated, "individual seating")?;
        let buffer = self.buffer_minutes;
        let candidates = self.individual_candidates();
        let mut seated = 0usize;

        for candidate in &candidates {
            let plan = self
                .plans
                .get_mut(candidate.child.name.as_str())
                .ok_or_else(|| {
                    ScheduleError::InvariantViolation(format!(
                        "no plan for child {}",
                        candidate.child.name
                    ))
                })?;
            if plan.fits(candidate.session, buffer) {
                plan.add(candidate.session, buffer)?;
                seated += 1;
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            seated,
            "individual phase complete"
        );
        self.phase = Phase::IndividualSeated;
        Ok(())
    }

    fn into_result(self) -> Result<RunResult<'a>, ScheduleError> {
        self.expect_phase(Phase::IndividualSeated, "packaging")?;

        for session in &self.joint {
            if let Some((child, _)) = self
                .plans
                .iter()
                .find(|(_, plan)| !plan.sessions().iter().any(|s| s.id == session.id))
            {
                return Err(ScheduleError::InvariantViolation(format!(
                    "joint session {} missing from {child}'s plan",
                    session.id
                )));
            }
        }

        let mut joint = self.joint;
        joint.sort_by_key(|s| (s.start_date, s.id));
        let per_child = self
            .plans
            .into_iter()
            .map(|(child, plan)| (child, plan.into_chronological()))
            .collect();

        Ok(RunResult { joint, per_child })
    }
}

/// Builds joint and individual plans for every child in the sheet.
///
/// An empty sheet yields an empty result; so does an empty session pool
/// (each child gets an empty plan).
pub fn schedule<'a>(
    sessions: &'a [Session],
    sheet: &PreferenceSheet,
    config: &SchedulerConfig,
) -> Result<RunResult<'a>, ScheduleError> {
    if sheet.is_empty() {
        return Ok(RunResult::default());
    }

    let mut scheduler = Scheduler::new(sessions, sheet, config);
    scheduler.seat_joint()?;
    scheduler.seat_individual()?;
    let result = scheduler.into_result()?;

    tracing::info!(
        sessions = sessions.len(),
        children = sheet.child_count(),
        joint = result.joint.len(),
        "schedule built"
    );
    Ok(result)
}
