//! Error handling.
//!
//! This module provides the error types for every service in the crate:
//! - Initialization (logger, HTTP client)
//! - Database access
//! - CSV export and import, including per-cell coercion failures
//! - Remote API clients and the services built on them
//!
//! Failures are always returned to the immediate caller; nothing in this crate
//! retries an operation on its own.

mod types;

// Re-export public API
pub use types::{
    ClientError, CsvExportError, DashboardError, DatabaseError, FieldParseError, ImportError,
    InitializationError, TogglError, TrelloError,
};
