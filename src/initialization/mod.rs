//! Application initialization and resource setup.
//!
//! - the global logger
//! - the HTTP client used by the remote API clients
//!
//! The database pool is opened by
//! [`DatabaseConnection::connect`](crate::storage::DatabaseConnection::connect).

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
