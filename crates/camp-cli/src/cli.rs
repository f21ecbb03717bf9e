//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Summer camp scheduler.
///
/// Builds conflict-free camp schedules for several children from a scraped
/// session list and a family preference sheet, seating shared sessions first.
#[derive(Debug, Parser)]
#[command(name = "camp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a schedule and print it, or write it as JSON.
    Schedule {
        /// Session file (JSON array of scraped sessions).
        #[arg(long)]
        sessions: PathBuf,

        /// Preference sheet (CSV with `<Child>'s age` and `<Child>'s priority` columns).
        #[arg(long)]
        want: PathBuf,

        /// Write the schedule as JSON to this file instead of printing a report.
        #[arg(long, value_name = "OUT")]
        json: Option<PathBuf>,
    },

    /// Run a scheduling job, streaming its stages as JSON lines.
    Job {
        /// Session file (JSON array of scraped sessions).
        #[arg(long)]
        sessions: PathBuf,

        /// Preference sheet (CSV).
        #[arg(long)]
        want: PathBuf,
    },

    /// List the camp names a preference sheet asks about.
    Camps {
        /// Preference sheet (CSV) with a `Camp` column.
        #[arg(long)]
        want: PathBuf,
    },
}
