//! Data-level warnings and the sink they are reported through.
//!
//! Bad input never aborts a run: the offending record or entry is dropped
//! and a [`Warning`] is handed to the caller's [`WarningSink`].

use thiserror::Error;

use crate::types::ValidationError;

/// A recoverable problem with the input data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A session record violated an invariant and was dropped.
    #[error("session record {index} ({title:?}) dropped: {reason}")]
    InvalidSession {
        index: usize,
        title: String,
        reason: ValidationError,
    },

    /// A preference entry referenced a child that is not in the sheet.
    #[error("preference for unknown child {child:?} on {activity:?} dropped")]
    UnknownChild { child: String, activity: String },

    /// A priority cell held something other than High/Medium/Low/No.
    #[error("unrecognised priority {value:?} for {child:?} on {activity:?}, treating as No")]
    UnknownPriority {
        child: String,
        activity: String,
        value: String,
    },

    /// An input row could not be understood by a reader and was skipped.
    #[error("record {index} skipped: {message}")]
    MalformedRecord { index: usize, message: String },
}

/// Receives data-level warnings.
pub trait WarningSink {
    fn warn(&mut self, warning: Warning);
}

impl WarningSink for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Forwards every warning to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(%warning, "dropping input");
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn warn(&mut self, warning: Warning) {
        (**self).warn(warning);
    }
}
