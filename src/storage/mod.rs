//! Database access.
//!
//! - [`SqlExecutor`]: the statement capability the CSV services run against
//! - [`DatabaseConnection`]: a SQLite or PostgreSQL pool chosen by configuration
//! - schema creation and typed record inserts

mod executor;
mod insert;
mod pool;
mod schema;
mod tables;

// Re-export public API
pub use executor::{DatabaseConnection, Dialect, SqlExecutor, TextRow};
pub use insert::{insert_records, insert_statement};
pub use schema::init_database;
pub use tables::{is_identifier, parse_column, KnownTable};
