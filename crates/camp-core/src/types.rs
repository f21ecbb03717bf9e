//! Core type definitions with validation.

use std::borrow::Borrow;
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in a day; the upper bound of a clock window.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A weekday token could not be recognised.
    #[error("unknown weekday: {value:?}")]
    UnknownWeekday { value: String },

    /// The clock window is outside a single day or runs backwards.
    #[error("clock window {start}..{end} must satisfy 0 <= start <= end <= 1440")]
    ClockOutOfRange { start: u32, end: u32 },

    /// The date range ends before it starts.
    #[error("date range {start}..{end} ends before it starts")]
    DateRangeInverted { start: NaiveDate, end: NaiveDate },

    /// A child's age must be a positive integer.
    #[error("age must be positive, got {value}")]
    NonPositiveAge { value: u32 },
}

/// Generates a validated, trimmed string newtype with common trait implementations.
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new name after trimming and validation.
            pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
                let name = name.into();
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                if trimmed.len() == name.len() {
                    Ok(Self(name))
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> Self {
                name.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name!(
    /// A validated child name.
    ///
    /// Child names are non-empty and trimmed. Their `Ord` is the
    /// lexicographic order every per-child iteration follows.
    ChildName, "child name"
);

define_name!(
    /// A validated activity name (the title shared by all sessions of a course).
    ActivityName, "title"
);

/// Position of a session in the accepted (normalised) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub usize);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Parses a weekday token such as `Mon`, `monday`, `TUES` or `Thurs`.
///
/// A token matches when it is at least three letters long and is a
/// case-insensitive prefix of the full day name.
pub fn parse_weekday(token: &str) -> Result<Weekday, ValidationError> {
    let lower = token.trim().to_ascii_lowercase();
    if lower.len() >= 3 {
        if let Some(index) = WEEKDAY_NAMES.iter().position(|name| name.starts_with(&lower)) {
            return Ok(WEEKDAY_ORDER[index]);
        }
    }
    Err(ValidationError::UnknownWeekday {
        value: token.to_string(),
    })
}

/// A set of weekdays. The empty set means "unspecified".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The unspecified (empty) set.
    pub const UNSPECIFIED: Self = Self(0);

    /// Canonicalises weekday tokens into a set.
    pub fn parse<I, S>(tokens: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::UNSPECIFIED;
        for token in tokens {
            set.insert(parse_weekday(token.as_ref())?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub const fn is_unspecified(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the two sets may fall on a common day.
    ///
    /// An unspecified set matches any weekday.
    pub const fn overlaps(self, other: Self) -> bool {
        self.is_unspecified() || other.is_unspecified() || self.0 & other.0 != 0
    }

    /// Iterates Monday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEKDAY_ORDER.into_iter().filter(move |day| self.contains(*day))
    }

    /// Canonical three-letter tokens, Monday first.
    pub fn tokens(self) -> Vec<String> {
        self.iter().map(|day| day.to_string()).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut set = Self::UNSPECIFIED;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(","))
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.tokens().serialize(serializer)
    }
}

/// A clock window in minutes since local midnight.
///
/// `(0, 0)` means "unspecified".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockWindow {
    start_minute: u32,
    end_minute: u32,
}

impl ClockWindow {
    pub const UNSPECIFIED: Self = Self {
        start_minute: 0,
        end_minute: 0,
    };

    pub fn new(start_minute: u32, end_minute: u32) -> Result<Self, ValidationError> {
        if start_minute > end_minute || end_minute > MINUTES_PER_DAY {
            return Err(ValidationError::ClockOutOfRange {
                start: start_minute,
                end: end_minute,
            });
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    pub const fn start_minute(self) -> u32 {
        self.start_minute
    }

    pub const fn end_minute(self) -> u32 {
        self.end_minute
    }

    pub const fn is_unspecified(self) -> bool {
        self.start_minute == 0 && self.end_minute == 0
    }

    /// Returns true unless one window ends at least `buffer_minutes` before the other starts.
    ///
    /// An unspecified window is treated as overlapping everything.
    pub const fn within_buffer(self, other: Self, buffer_minutes: u32) -> bool {
        if self.is_unspecified() || other.is_unspecified() {
            return true;
        }
        let separated = self.end_minute.saturating_add(buffer_minutes) <= other.start_minute
            || other.end_minute.saturating_add(buffer_minutes) <= self.start_minute;
        !separated
    }
}

impl fmt::Display for ClockWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            return f.write_str("--:--");
        }
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

/// Age eligibility bounds: inclusive minimum, exclusive maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBounds {
    pub min_inclusive: Option<u32>,
    pub max_exclusive: Option<u32>,
}

impl AgeBounds {
    pub const UNBOUNDED: Self = Self {
        min_inclusive: None,
        max_exclusive: None,
    };

    /// Returns true if `age` is within `[min, max)`. Missing bounds are open.
    pub fn admits(self, age: u32) -> bool {
        let min = self.min_inclusive.unwrap_or(0);
        self.max_exclusive
            .map_or(age >= min, |max| age >= min && age < max)
    }
}
