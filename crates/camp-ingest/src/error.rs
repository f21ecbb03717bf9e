//! Error types for the input readers.

use std::path::PathBuf;

use thiserror::Error;

/// A whole input could not be read. Bad individual records are warnings instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The session file is JSON but not an array of records.
    #[error("{path} must contain a JSON array of sessions")]
    NotAnArray { path: PathBuf },
    /// The preference sheet is not readable CSV.
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The preference sheet has no `<Child>'s age` or `<Child>'s priority` columns.
    #[error("{path} has no \"<Child>'s age\" or \"<Child>'s priority\" columns")]
    NoChildColumns { path: PathBuf },
    /// Camp names were requested from a sheet without a `Camp` column.
    #[error("{path} has no \"Camp\" column")]
    MissingCampColumn { path: PathBuf },
}

/// A single field's text could not be understood.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unrecognised clock time {0:?}")]
    Clock(String),
    #[error("unrecognised date {0:?}")]
    Date(String),
    #[error("unix timestamp {0} out of range")]
    Timestamp(i64),
    #[error("missing {0}")]
    Missing(&'static str),
}
