//! Preference sheet ("want file") reader.
//!
//! The sheet is a CSV with one row per camp. The `Camp` column (or the first
//! column when there is none) names the activity; every child contributes a
//! `<Child>'s age` column and a `<Child>'s priority` column.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use camp_core::{ActivityName, ChildName, PreferenceSheet, Priority, Warning, WarningSink};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::IngestError;
use crate::text::first_positive_integer;

const CAMP_COLUMN: &str = "camp";
const AGE_SUFFIX: &str = "'s age";
const PRIORITY_SUFFIX: &str = "'s priority";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Age,
    Priority,
}

#[derive(Debug)]
struct ChildColumn {
    child: String,
    kind: ColumnKind,
    index: usize,
}

#[derive(Debug)]
struct SheetLayout {
    title: usize,
    columns: Vec<ChildColumn>,
}

fn clean_header(header: &str) -> String {
    header.trim().trim_matches('"').trim().replace('\u{2019}', "'")
}

fn strip_suffix_ignore_case<'h>(header: &'h str, suffix: &str) -> Option<&'h str> {
    let split = header.len().checked_sub(suffix.len())?;
    let tail = header.get(split..)?;
    tail.eq_ignore_ascii_case(suffix)
        .then(|| header[..split].trim())
}

fn camp_column(headers: &StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|h| clean_header(h).eq_ignore_ascii_case(CAMP_COLUMN))
}

fn layout(headers: &StringRecord) -> SheetLayout {
    let columns = headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let header = clean_header(header);
            let (child, kind) = if let Some(child) = strip_suffix_ignore_case(&header, AGE_SUFFIX) {
                (child, ColumnKind::Age)
            } else {
                (strip_suffix_ignore_case(&header, PRIORITY_SUFFIX)?, ColumnKind::Priority)
            };
            (!child.is_empty()).then(|| ChildColumn {
                child: child.to_string(),
                kind,
                index,
            })
        })
        .collect();

    SheetLayout {
        title: camp_column(headers).unwrap_or(0),
        columns,
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Parses a preference sheet from CSV.
///
/// Unreadable rows, unknown priority words and priorities for children
/// without an age are reported to `sink`; the rest of the sheet is kept.
/// Returns `None` when the header names no child columns at all.
pub fn parse_preferences<R: Read>(
    reader: R,
    sink: &mut impl WarningSink,
) -> Result<Option<PreferenceSheet>, csv::Error> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    let layout = layout(&headers);
    if layout.columns.is_empty() {
        return Ok(None);
    }
    let mut builder = PreferenceSheet::builder();

    for (index, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                sink.warn(Warning::MalformedRecord {
                    index,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let Ok(activity) = ActivityName::new(row.get(layout.title).unwrap_or_default()) else {
            tracing::debug!(row = index, "skipping preference row without a camp name");
            continue;
        };

        for column in &layout.columns {
            let cell = row.get(column.index).unwrap_or_default();
            match column.kind {
                ColumnKind::Age => {
                    let (Some(age), Ok(name)) =
                        (first_positive_integer(cell), ChildName::new(column.child.as_str()))
                    else {
                        continue;
                    };
                    if let Err(e) = builder.add_child(name, age) {
                        tracing::debug!(child = %column.child, error = %e, "ignoring age");
                    }
                }
                ColumnKind::Priority => {
                    if cell.is_empty() {
                        continue;
                    }
                    let priority = cell.parse::<Priority>().unwrap_or_else(|_| {
                        sink.warn(Warning::UnknownPriority {
                            child: column.child.clone(),
                            activity: activity.to_string(),
                            value: cell.to_string(),
                        });
                        Priority::No
                    });
                    builder.set_priority(activity.clone(), column.child.as_str(), priority);
                }
            }
        }
    }

    Ok(Some(builder.build(sink)))
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a preference sheet file.
pub fn read_preferences(
    path: &Path,
    sink: &mut impl WarningSink,
) -> Result<PreferenceSheet, IngestError> {
    let sheet = parse_preferences(open(path)?, sink)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| IngestError::NoChildColumns {
            path: path.to_path_buf(),
        })?;
    tracing::info!(
        path = %path.display(),
        children = sheet.child_count(),
        activities = sheet.activities().count(),
        "read preference sheet"
    );
    Ok(sheet)
}

/// Unique, sorted, non-blank values of the `Camp` column.
pub fn parse_camp_names<R: Read>(reader: R) -> Result<Option<Vec<String>>, csv::Error> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    let Some(column) = camp_column(&headers) else {
        return Ok(None);
    };

    let mut names = BTreeSet::new();
    for row in reader.records() {
        let row = row?;
        if let Some(name) = row.get(column).filter(|n| !n.is_empty()) {
            names.insert(name.to_string());
        }
    }
    Ok(Some(names.into_iter().collect()))
}

/// Reads the camp names a preference sheet asks about.
pub fn read_camp_names(path: &Path) -> Result<Vec<String>, IngestError> {
    parse_camp_names(open(path)?)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| IngestError::MissingCampColumn {
            path: path.to_path_buf(),
        })
}
