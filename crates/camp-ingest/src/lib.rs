//! Input readers for the camp scheduler.
//!
//! - [`read_sessions`]: the JSON session file a scraper produces
//! - [`read_preferences`]: the CSV preference sheet ("want file")
//! - [`read_camp_names`]: the camp list a scraper is pointed at
//!
//! Readers fail only when a whole input is unusable. Individual bad records
//! are reported through a [`camp_core::WarningSink`] and skipped.

mod error;
pub mod preferences;
pub mod sessions;
pub mod text;

pub use error::{FieldError, IngestError};
pub use preferences::{parse_camp_names, parse_preferences, read_camp_names, read_preferences};
pub use sessions::{parse_sessions, read_sessions};
