//! toggl_trello_kpi library: Toggl and Trello data in and out of SQL tables
//!
//! This library moves typed records between CSV files, SQL tables and the
//! Toggl and Trello APIs. Records describe their columns once through the
//! [`Record`] trait; the CSV writer, the importer and the table inserts are
//! all driven by that description.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use toggl_trello_kpi::config::DatabaseConfig;
//! use toggl_trello_kpi::export::export_table;
//! use toggl_trello_kpi::storage::{init_database, DatabaseConnection};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig {
//!     url: Some("sqlite:kpi.db".to_string()),
//!     ..Default::default()
//! };
//! let db = DatabaseConnection::connect(&config).await?;
//! init_database(&db).await?;
//!
//! let rows = export_table(&db, Path::new("."), "toggl_time").await?;
//! println!("Exported {rows} time entries to toggl_time.csv");
//! db.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
pub mod dashboard;
pub mod error_handling;
pub mod export;
mod http;
pub mod import;
pub mod initialization;
pub mod record;
pub mod storage;
pub mod toggl;
pub mod trello;

// Re-export public API
pub use app::{run, Outcome};
pub use config::{Cli, Command, LogFormat, LogLevel};
pub use record::{FieldKind, FieldValue, Record};
