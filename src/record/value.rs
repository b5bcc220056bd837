//! Field kinds, field values and their canonical CSV text form.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use log::error;

use crate::error_handling::FieldParseError;

/// The semantic kind of a record field.
///
/// Only the first six kinds can be written to or read from CSV. `Other` marks a
/// field whose Rust type has no CSV mapping; it carries the type name for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Int64,
    Uint64,
    Bool,
    /// RFC-3339 timestamp, normalized to UTC.
    Timestamp,
    /// Ordered sequence of text, comma-joined in CSV.
    TextList,
    Other(&'static str),
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Int64 => "int64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Bool => "bool",
            FieldKind::Timestamp => "timestamp",
            FieldKind::TextList => "text sequence",
            FieldKind::Other(type_name) => type_name,
        }
    }

    /// Parses one CSV cell into a value of this kind.
    pub fn parse(self, raw: &str) -> Result<FieldValue, FieldParseError> {
        Ok(match self {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Int64 => FieldValue::Int64(raw.parse()?),
            FieldKind::Uint64 => FieldValue::Uint64(raw.parse()?),
            FieldKind::Bool => FieldValue::Bool(parse_bool(raw).ok_or(FieldParseError::Boolean)?),
            FieldKind::Timestamp => FieldValue::Timestamp(parse_timestamp(raw)?),
            FieldKind::TextList => FieldValue::TextList(split_text_list(raw)),
            FieldKind::Other(type_name) => return Err(FieldParseError::Unsupported(type_name)),
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of one record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int64(i64),
    Uint64(u64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    TextList(Vec<String>),
    /// A value whose type has no CSV mapping (type name only).
    Other(&'static str),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Uint64(_) => FieldKind::Uint64,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::TextList(_) => FieldKind::TextList,
            FieldValue::Other(type_name) => FieldKind::Other(type_name),
        }
    }

    /// Canonical CSV text for this value.
    ///
    /// A value of an unsupported type is logged and rendered as an empty cell.
    pub fn to_csv_field(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Int64(v) => v.to_string(),
            FieldValue::Uint64(v) => v.to_string(),
            FieldValue::Bool(v) => v.to_string(),
            FieldValue::Timestamp(ts) => format_timestamp(ts),
            FieldValue::TextList(items) => items.join(","),
            FieldValue::Other(type_name) => {
                error!("Cannot convert the data type {type_name} to a CSV field");
                String::new()
            }
        }
    }
}

/// Formats a timestamp as RFC-3339 in UTC with a `Z` suffix.
///
/// Fractional seconds are printed only when non-zero, with trailing zeros
/// trimmed (`2021-01-01T00:00:00Z`, `2021-01-01T00:00:00.25Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let mut out = ts.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = ts.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

/// Parses an RFC-3339 timestamp into UTC.
///
/// Also accepts the space-separated text databases print for timestamp columns
/// (`2021-01-01 10:00:00.5+00`, or without an offset, read as UTC) so a table
/// dumped with the SQL exporter can be loaded again.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let rfc_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => return Ok(ts.with_timezone(&Utc)),
        Err(e) => e,
    };
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    Err(rfc_err)
}

/// Parses the boolean spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Splits a comma-joined CSV cell. An empty cell is an empty sequence.
pub fn split_text_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}
