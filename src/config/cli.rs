//! Command-line interface.
//!
//! # Examples
//!
//! ```bash
//! # Download February 2021 from Toggl into toggl_time_entries.csv
//! toggl_trello_kpi toggl-csv 2021 2
//!
//! # Dump two columns of the Trello table
//! toggl_trello_kpi --database-url sqlite:kpi.db export trello_card id,name
//!
//! # Link time entries to cards from an edited CSV file
//! toggl_trello_kpi update toggl_time.csv toggl_time trello_card_id
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::types::{
    DashboardConfig, DatabaseConfig, LogFormat, LogLevel, TogglConfig, TrelloConfig,
};
use crate::storage::{parse_column, KnownTable};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "toggl_trello_kpi",
    version,
    about = "Synchronizes Toggl time entries and Trello cards with a database, with CSV import and export."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(
        long,
        value_enum,
        env = "APPLICATION_LOG_LEVEL",
        ignore_case = true,
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Directory the CSV files are written to
    #[arg(long, value_parser, default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub toggl: TogglConfig,

    #[command(flatten)]
    pub trello: TrelloConfig,

    #[command(flatten)]
    pub dashboard: DashboardConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// The operation to run.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Download one month of Toggl time entries to toggl_time_entries.csv
    TogglCsv {
        year: i32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Download the Trello board's cards to trello_entries.csv
    TrelloCsv,

    /// Insert the rows of a CSV file into a table
    Insert {
        file: PathBuf,
        #[arg(value_enum)]
        table: KnownTable,
    },

    /// Download one month of Toggl time entries into the toggl_time table
    StoreToggl {
        year: i32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Download the Trello board's cards into the trello_card table
    StoreTrello,

    /// Export a table to {table}.csv, optionally only some columns
    Export {
        #[arg(value_enum)]
        table: KnownTable,
        /// Columns to export, comma-separated (default: all)
        #[arg(value_delimiter = ',', value_parser = parse_column)]
        columns: Vec<String>,
    },

    /// Update one column of a table from a CSV file, matching rows by id
    Update {
        file: PathBuf,
        #[arg(value_enum)]
        table: KnownTable,
        #[arg(value_parser = parse_column)]
        column: String,
    },

    /// Generate the Grafana dashboard from its template
    Dashboard,
}

impl Command {
    /// Whether the command needs a database connection.
    pub fn uses_database(&self) -> bool {
        matches!(
            self,
            Command::Insert { .. }
                | Command::StoreToggl { .. }
                | Command::StoreTrello
                | Command::Export { .. }
                | Command::Update { .. }
        )
    }
}
