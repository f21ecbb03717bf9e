//! Text report and JSON export for a finished schedule.

use std::collections::BTreeMap;
use std::io::{self, Write};

use camp_core::{PreferenceSheet, RunResult, Session};
use chrono::NaiveDate;
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ========== JSON ==========

/// One session in the exported schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub activity: String,
    pub start_date: String,
    pub end_date: String,
    pub url: String,
}

impl From<&Session> for ExportEntry {
    fn from(session: &Session) -> Self {
        Self {
            activity: session.activity.to_string(),
            start_date: iso_date(session.start_date),
            end_date: iso_date(session.end_date),
            url: session.page_url.clone(),
        }
    }
}

/// The exported schedule: the joint list plus one list per child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    pub joint: Vec<ExportEntry>,
    pub children: BTreeMap<String, Vec<ExportEntry>>,
}

/// Builds the export payload. With `hide_joint`, joint activities only
/// appear in the joint list.
pub fn export_payload(result: &RunResult<'_>, hide_joint: bool) -> ExportPayload {
    let joint = result.joint().iter().map(|s| ExportEntry::from(*s)).collect();
    let children = result
        .per_child()
        .iter()
        .map(|(child, plan)| {
            let sessions = if hide_joint {
                result.individual_sessions(child.as_str())
            } else {
                plan.clone()
            };
            let entries = sessions.into_iter().map(ExportEntry::from).collect();
            (child.to_string(), entries)
        })
        .collect();

    ExportPayload { joint, children }
}

// ========== Text ==========

fn heading(writer: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "─".repeat(title.chars().count()))
}

fn session_line(writer: &mut impl Write, session: &Session) -> io::Result<()> {
    let days = if session.weekdays.is_unspecified() {
        "any day".to_string()
    } else {
        session.weekdays.to_string()
    };
    writeln!(
        writer,
        "  {} to {}  {:<19}  {:<11}  {}",
        iso_date(session.start_date),
        iso_date(session.end_date),
        days,
        session.clock.to_string(),
        session.activity
    )
}

/// Writes the human-readable schedule: joint sessions, then each child in
/// name order, then a summary.
pub fn write_report(
    writer: &mut impl Write,
    result: &RunResult<'_>,
    sheet: &PreferenceSheet,
    considered: usize,
    hide_joint: bool,
) -> io::Result<()> {
    writeln!(
        writer,
        "CAMP SCHEDULE: {} children, {considered} sessions considered",
        sheet.child_count()
    )?;

    if sheet.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No children found in the preference sheet.")?;
        writeln!(writer)?;
        writeln!(writer, "Hint: add \"<Name>'s age\" and \"<Name>'s priority\" columns.")?;
        return Ok(());
    }

    heading(writer, "TOGETHER")?;
    if result.joint().is_empty() {
        writeln!(writer, "  (no joint sessions)")?;
    }
    for session in result.joint() {
        session_line(writer, session)?;
    }

    for child in sheet.children() {
        heading(writer, &format!("{} ({})", child.name.as_str().to_uppercase(), child.age))?;
        let sessions = if hide_joint {
            result.individual_sessions(child.name.as_str())
        } else {
            result.plan_for(child.name.as_str()).to_vec()
        };
        if sessions.is_empty() {
            writeln!(writer, "  (nothing else scheduled)")?;
        }
        for session in sessions {
            session_line(writer, session)?;
        }
    }

    heading(writer, "SUMMARY")?;
    writeln!(writer, "Joint sessions:  {}", result.joint().len())?;
    for child in sheet.children() {
        let total = result.plan_for(child.name.as_str()).len();
        let own = result.individual_sessions(child.name.as_str()).len();
        writeln!(
            writer,
            "{:<16} {total} sessions ({own} on their own)",
            format!("{}:", child.name)
        )?;
    }
    Ok(())
}
