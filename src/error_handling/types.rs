//! Error type definitions.
//!
//! This module defines the error types returned by every service in the crate.
//! Each concern gets its own enum so callers can match on the conditions they
//! care about (an empty export, a cell that failed coercion) without string
//! inspection.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::record::FieldKind;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// A database operation was requested from a service built without a connection.
    #[error("The database connection is not configured")]
    NoConnection,

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// A CSV cell that could not be converted to its declared field kind.
#[derive(Error, Debug)]
pub enum FieldParseError {
    #[error("invalid integer: {0}")]
    Integer(#[from] std::num::ParseIntError),

    #[error("invalid boolean")]
    Boolean,

    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// The shape declares the field with a type outside the supported set.
    #[error("unsupported field type {0}")]
    Unsupported(&'static str),
}

/// Error types for writing CSV files (typed records or SQL result sets).
#[derive(Error, Debug)]
pub enum CsvExportError {
    /// There was nothing to export. No file is created in this case.
    #[error("The record entries are empty")]
    EmptyEntries,

    #[error("CSV file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Error types for loading CSV files into the database.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// A header column has no counterpart in the record shape.
    #[error("Column {0} is not a field of the record shape")]
    UnknownColumn(String),

    /// A header column whose field type has no CSV mapping.
    #[error("Column {column} has type {type_name}, which cannot be read from CSV")]
    UnsupportedColumn {
        column: String,
        type_name: &'static str,
    },

    /// A cell could not be coerced to the kind its column declares.
    #[error("Row {row}, column {column}: cannot read {value:?} as {kind}: {source}")]
    FieldCoercion {
        /// 1-based data row number (the header is row 0).
        row: usize,
        column: String,
        kind: FieldKind,
        value: String,
        #[source]
        source: FieldParseError,
    },
}

/// Error types for the remote API clients.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] ReqwestError),

    #[error("Unexpected HTTP status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
}

/// Error types for the Toggl time service.
#[derive(Error, Debug)]
pub enum TogglError {
    /// The requested range contains no time entries.
    #[error("The Toggl time entries are empty")]
    EmptyTimeEntries,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Export(#[from] CsvExportError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Error types for the Trello board service.
#[derive(Error, Debug)]
pub enum TrelloError {
    /// The board has no cards.
    #[error("The Trello card entries are empty")]
    EmptyCards,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Export(#[from] CsvExportError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Error types for the dashboard generator.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Error parsing the dashboard parameter {0}")]
    InvalidParameter(&'static str),

    #[error("The end month must be greater than or equal to the start month")]
    InvalidRange,

    #[error("Dashboard file error: {0}")]
    Io(#[from] std::io::Error),
}
