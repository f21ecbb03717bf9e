//! CLI subcommand implementations.

pub mod camps;
pub mod job;
pub mod render;
pub mod schedule;
