//! Asynchronous job mode.
//!
//! A job reads the preference sheet, ingests the session file, schedules and
//! reports progress as one JSON line per stage. The work runs on a blocking
//! tokio task and streams [`JobEvent`]s back over a channel; the caller
//! writes each one as it arrives.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use camp_core::{SchedulerConfig, Warning, schedule};
use serde::Serialize;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use uuid::Uuid;

use super::render::{ExportPayload, export_payload};
use super::schedule::{load_sessions, load_sheet};
use crate::Config;

/// Pipeline stages, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Reading the preference sheet.
    Verifying,
    /// Ingesting the session file.
    Scraping,
    /// Running the scheduler.
    Optimising,
    /// No further stages; a result or error line follows.
    Done,
}

/// One line of job output.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JobEvent {
    Stage {
        job: String,
        stage: Stage,
    },
    Result {
        job: String,
        result: ExportPayload,
        warnings: Vec<String>,
    },
    Error {
        job: String,
        error: String,
    },
}

/// What a job needs to run.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub sessions: PathBuf,
    pub want: PathBuf,
    pub scheduler: SchedulerConfig,
    pub hide_joint: bool,
}

impl JobRequest {
    pub fn new(sessions: PathBuf, want: PathBuf, config: &Config) -> Self {
        Self {
            sessions,
            want,
            scheduler: config.scheduler(),
            hide_joint: config.hide_joint_in_child_lists,
        }
    }
}

fn send(tx: &UnboundedSender<JobEvent>, event: JobEvent) {
    if tx.send(event).is_err() {
        tracing::debug!("job output closed, dropping event");
    }
}

fn pipeline(
    job: &str,
    request: &JobRequest,
    tx: &UnboundedSender<JobEvent>,
) -> Result<(ExportPayload, Vec<Warning>)> {
    let stage = |stage| {
        tracing::debug!(job, ?stage, "job stage");
        send(
            tx,
            JobEvent::Stage {
                job: job.to_string(),
                stage,
            },
        );
    };
    let mut warnings: Vec<Warning> = Vec::new();

    stage(Stage::Verifying);
    let sheet = load_sheet(&request.want, &mut warnings)?;

    stage(Stage::Scraping);
    let sessions = load_sessions(&request.sessions, &sheet, &mut warnings)?;

    stage(Stage::Optimising);
    let result = schedule(&sessions, &sheet, &request.scheduler).context("scheduling failed")?;

    Ok((export_payload(&result, request.hide_joint), warnings))
}

/// Runs every stage, always finishing with `done` and a result or error event.
fn execute(job: &str, request: &JobRequest, tx: &UnboundedSender<JobEvent>) -> Result<()> {
    let outcome = pipeline(job, request, tx);
    send(
        tx,
        JobEvent::Stage {
            job: job.to_string(),
            stage: Stage::Done,
        },
    );

    match outcome {
        Ok((result, warnings)) => {
            tracing::info!(job, warnings = warnings.len(), "job finished");
            send(
                tx,
                JobEvent::Result {
                    job: job.to_string(),
                    result,
                    warnings: warnings.iter().map(ToString::to_string).collect(),
                },
            );
            Ok(())
        }
        Err(e) => {
            send(
                tx,
                JobEvent::Error {
                    job: job.to_string(),
                    error: format!("{e:#}"),
                },
            );
            Err(e)
        }
    }
}

/// Runs a job on a blocking task, writing each event as a JSON line.
pub async fn run_job(request: JobRequest, writer: &mut impl Write) -> Result<()> {
    let job = Uuid::new_v4().to_string();
    tracing::info!(%job, sessions = %request.sessions.display(), "job started");

    let (tx, mut rx) = unbounded_channel();
    let task = tokio::task::spawn_blocking({
        let job = job.clone();
        move || execute(&job, &request, &tx)
    });

    while let Some(event) = rx.recv().await {
        writeln!(writer, "{}", serde_json::to_string(&event)?)?;
        writer.flush()?;
    }

    task.await.context("job task failed")?
}

/// Runs the job command on a fresh tokio runtime.
pub fn run(request: JobRequest, writer: &mut impl Write) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(run_job(request, writer))
}
