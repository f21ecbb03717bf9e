//! Offline batch mode: read both inputs, schedule, render.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use camp_core::{PreferenceSheet, Session, TracingSink, WarningSink, normalise_sessions, schedule};
use camp_ingest::{read_preferences, read_sessions};

use super::render::{export_payload, write_report};
use crate::Config;

/// Both inputs, read and normalised.
#[derive(Debug)]
pub struct Inputs {
    pub sheet: PreferenceSheet,
    pub sessions: Vec<Session>,
}

/// Reads the preference sheet.
pub fn load_sheet(want: &Path, sink: &mut impl WarningSink) -> Result<PreferenceSheet> {
    read_preferences(want, sink).context("failed to read preference sheet")
}

/// Reads the session file and normalises it against `sheet`.
pub fn load_sessions(
    sessions: &Path,
    sheet: &PreferenceSheet,
    sink: &mut impl WarningSink,
) -> Result<Vec<Session>> {
    let raw = read_sessions(sessions, sink).context("failed to read session file")?;
    Ok(normalise_sessions(&raw, sheet, sink))
}

pub fn load_inputs(sessions: &Path, want: &Path, sink: &mut impl WarningSink) -> Result<Inputs> {
    let sheet = load_sheet(want, sink)?;
    let sessions = load_sessions(sessions, &sheet, sink)?;
    Ok(Inputs { sheet, sessions })
}

/// Runs the schedule command.
///
/// Without `json_out` the text report goes to `writer`; otherwise the JSON
/// export is written to `json_out` and a confirmation line to `writer`.
pub fn run(
    sessions: &Path,
    want: &Path,
    json_out: Option<&Path>,
    config: &Config,
    writer: &mut impl Write,
) -> Result<()> {
    let inputs = load_inputs(sessions, want, &mut TracingSink)?;
    let result = schedule(&inputs.sessions, &inputs.sheet, &config.scheduler())
        .context("scheduling failed")?;

    match json_out {
        Some(path) => {
            let payload = export_payload(&result, config.hide_joint_in_child_lists);
            let json = serde_json::to_string_pretty(&payload)?;
            fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(writer, "wrote {}", path.display())?;
        }
        None => write_report(
            writer,
            &result,
            &inputs.sheet,
            inputs.sessions.len(),
            config.hide_joint_in_child_lists,
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SESSIONS: &str = r#"[
        {"title": "Clay", "startDate": "2025-07-07", "endDate": "2025-07-11",
         "days": ["Mon-Fri"], "startTime": "9:00 AM", "endTime": "12:00 PM",
         "availability": "Available", "pageUrl": "https://example.test/clay"},
        {"title": "Rocket", "startDate": "2025-07-07", "endDate": "2025-07-11",
         "days": ["Mon-Fri"], "startMinutes": 780, "endMinutes": 840,
         "availability": "Full"}
    ]"#;

    const WANT: &str = "Camp,Alice's age,Alice's priority\nClay,9,High\nRocket,9,High\n";

    fn inputs(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let sessions = dir.path().join("sessions.json");
        let want = dir.path().join("want.csv");
        fs::write(&sessions, SESSIONS).unwrap();
        fs::write(&want, WANT).unwrap();
        (sessions, want)
    }

    #[test]
    fn test_writes_json_export() {
        let dir = TempDir::new().unwrap();
        let (sessions, want) = inputs(&dir);
        let out = dir.path().join("schedule.json");
        let mut stdout = Vec::new();

        run(&sessions, &want, Some(&out), &Config::default(), &mut stdout).unwrap();

        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            format!("wrote {}\n", out.display())
        );
        let payload: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(payload["joint"][0]["activity"], "Clay");
        assert_eq!(payload["children"]["Alice"], serde_json::json!([]));
    }

    #[test]
    fn test_text_report_goes_to_writer() {
        let dir = TempDir::new().unwrap();
        let (sessions, want) = inputs(&dir);
        let mut stdout = Vec::new();

        run(&sessions, &want, None, &Config::default(), &mut stdout).unwrap();

        let text = String::from_utf8(stdout).unwrap();
        assert!(text.starts_with("CAMP SCHEDULE: 1 children, 2 sessions considered"));
        assert!(text.contains("09:00-12:00  Clay"));
        assert!(!text.contains("Rocket"));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (sessions, _) = inputs(&dir);
        let err = run(
            &sessions,
            &dir.path().join("nope.csv"),
            None,
            &Config::default(),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("nope.csv"));
    }
}
