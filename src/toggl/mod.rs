//! Toggl time entries.
//!
//! [`TogglTime`] pulls a time range from a [`TimeEntrySource`] (normally the
//! [`TogglClient`]) and either writes it to `toggl_time_entries.csv` or stores
//! it in the `toggl_time` table.

mod client;

use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{error, info};

use crate::config::{TOGGL_CSV_NAME, TOGGL_TIME_TABLE};
use crate::error_handling::{ClientError, DatabaseError, TogglError};
use crate::export::write_records_csv_in;
use crate::record::{Field, FieldKind, FieldValue, Record};
use crate::storage::{insert_records, DatabaseConnection, SqlExecutor};

pub use client::{ProjectCache, ProjectData, TogglClient};

/// One Toggl time entry, flattened to a `toggl_time` row.
#[derive(Debug, Clone, PartialEq)]
pub struct TogglTimeEntry {
    pub id: u64,
    pub description: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    /// Seconds.
    pub duration: i64,
    pub billable: bool,
    pub workspace_id: u64,
    pub project_id: u64,
    pub project_name: String,
    pub tags: Vec<String>,
    /// The Trello card this entry was spent on; empty until linked.
    pub trello_card_id: String,
}

impl Record for TogglTimeEntry {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            kind: FieldKind::Uint64,
            get: |e| FieldValue::Uint64(e.id),
        },
        Field {
            name: "description",
            kind: FieldKind::Text,
            get: |e| FieldValue::Text(e.description.clone()),
        },
        Field {
            name: "start",
            kind: FieldKind::Timestamp,
            get: |e| FieldValue::Timestamp(e.start),
        },
        Field {
            name: "stop",
            kind: FieldKind::Timestamp,
            get: |e| FieldValue::Timestamp(e.stop),
        },
        Field {
            name: "duration",
            kind: FieldKind::Int64,
            get: |e| FieldValue::Int64(e.duration),
        },
        Field {
            name: "billable",
            kind: FieldKind::Bool,
            get: |e| FieldValue::Bool(e.billable),
        },
        Field {
            name: "workspace_id",
            kind: FieldKind::Uint64,
            get: |e| FieldValue::Uint64(e.workspace_id),
        },
        Field {
            name: "project_id",
            kind: FieldKind::Uint64,
            get: |e| FieldValue::Uint64(e.project_id),
        },
        Field {
            name: "project_name",
            kind: FieldKind::Text,
            get: |e| FieldValue::Text(e.project_name.clone()),
        },
        Field {
            name: "tags",
            kind: FieldKind::TextList,
            get: |e| FieldValue::TextList(e.tags.clone()),
        },
        Field {
            name: "trello_card_id",
            kind: FieldKind::Text,
            get: |e| FieldValue::Text(e.trello_card_id.clone()),
        },
    ];
}

/// Where time entries come from.
#[allow(async_fn_in_trait)]
pub trait TimeEntrySource {
    /// Time entries that started between `start` and `end`, inclusive.
    async fn get_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TogglTimeEntry>, ClientError>;
}

/// First and last instant of a calendar month in UTC: the 1st at 00:00:00
/// through the last day at 23:59:59.
///
/// Returns `None` for a month outside 1..=12 or an unrepresentable year.
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let start = first.and_hms_opt(0, 0, 0)?.and_utc();
    let end = next.and_hms_opt(0, 0, 0)?.and_utc() - Duration::seconds(1);
    Some((start, end))
}

/// The Toggl time service.
pub struct TogglTime<S, E = DatabaseConnection> {
    source: S,
    database: Option<E>,
    output_dir: PathBuf,
}

impl<S: TimeEntrySource> TogglTime<S> {
    /// A service that can only write CSV files.
    pub fn new(source: S) -> Self {
        Self {
            source,
            database: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl<S: TimeEntrySource, E: SqlExecutor> TogglTime<S, E> {
    pub fn with_database(source: S, database: E) -> Self {
        Self {
            source,
            database: Some(database),
            output_dir: PathBuf::from("."),
        }
    }

    /// Directory [`download_as_csv`](Self::download_as_csv) writes to
    /// (default: the working directory).
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Writes the entries of the range to `toggl_time_entries.csv`.
    pub async fn download_as_csv(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PathBuf, TogglError> {
        let entries = self.retrieve(start, end).await?;
        Ok(write_records_csv_in(&self.output_dir, &entries, TOGGL_CSV_NAME)?)
    }

    /// Inserts the entries of the range into `toggl_time`, one transaction per
    /// entry, and returns how many were stored.
    pub async fn store(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<usize, TogglError> {
        let entries = self.retrieve(start, end).await?;
        let Some(db) = &self.database else {
            return Err(DatabaseError::NoConnection.into());
        };
        let stored = insert_records(db, TOGGL_TIME_TABLE, &entries).await?;
        info!("Stored {stored} time entries in {TOGGL_TIME_TABLE}");
        Ok(stored)
    }

    async fn retrieve(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TogglTimeEntry>, TogglError> {
        let entries = self.source.get_range(start, end).await?;
        if entries.is_empty() {
            error!("No Toggl time entries between {start} and {end}, skipping");
            return Err(TogglError::EmptyTimeEntries);
        }
        info!("Toggl time entries: {}", entries.len());
        Ok(entries)
    }
}
