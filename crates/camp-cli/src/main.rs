use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use camp_cli::commands::{camps, job, schedule};
use camp_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr; stdout carries reports and job events.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Some(Commands::Schedule {
            sessions,
            want,
            json,
        }) => {
            schedule::run(&sessions, &want, json.as_deref(), &config, &mut stdout)?;
        }
        Some(Commands::Job { sessions, want }) => {
            job::run(job::JobRequest::new(sessions, want, &config), &mut stdout)?;
        }
        Some(Commands::Camps { want }) => {
            camps::run(&want, &mut stdout)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
