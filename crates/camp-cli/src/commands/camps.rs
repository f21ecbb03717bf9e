//! Lists the camps a preference sheet asks about.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use camp_ingest::read_camp_names;

/// Runs the camps command: one name per line.
pub fn run(want: &Path, writer: &mut impl Write) -> Result<()> {
    let names = read_camp_names(want).context("failed to read camp names")?;
    for name in &names {
        writeln!(writer, "{name}")?;
    }
    tracing::debug!(count = names.len(), "listed camps");
    Ok(())
}
