//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (table names, endpoints, defaults)
//! - Settings groups for the database, the remote APIs and the dashboard
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command};
pub use constants::*;
pub use types::{
    DashboardConfig, DatabaseConfig, LabelColors, LogFormat, LogLevel, TogglConfig, TrelloConfig,
};
