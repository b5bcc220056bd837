//! Command dispatch.
//!
//! [`run`] opens whatever the chosen command needs (database pool, HTTP
//! client), runs it, and releases the pool again before returning.

mod commands;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;

use crate::config::{Cli, Command};
use crate::import::UpdateSummary;
use crate::storage::{init_database, DatabaseConnection};

/// What a command did, for the closing line printed by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Records or rows written to a CSV file.
    CsvWritten { path: PathBuf, rows: Option<usize> },
    /// Rows inserted into a table.
    Inserted { table: String, rows: usize },
    /// Result of a column update.
    Updated {
        table: String,
        column: String,
        summary: UpdateSummary,
    },
    /// The dashboard file generated.
    Dashboard { path: PathBuf },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::CsvWritten {
                path,
                rows: Some(rows),
            } => write!(f, "Wrote {rows} row{} to {}", plural(*rows), path.display()),
            Outcome::CsvWritten { path, rows: None } => write!(f, "Wrote {}", path.display()),
            Outcome::Inserted { table, rows } => {
                write!(f, "Inserted {rows} row{} into {table}", plural(*rows))
            }
            Outcome::Updated {
                table,
                column,
                summary,
            } => write!(
                f,
                "Updated {table}.{column} on {} row{} ({} failed)",
                summary.updated,
                plural(summary.updated),
                summary.failed
            ),
            Outcome::Dashboard { path } => write!(f, "Dashboard saved in {}", path.display()),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Runs the command selected on the command line.
///
/// Commands that touch the database open the pool first and create the
/// tables if they are missing. The pool is closed whether or not the command
/// succeeds.
pub async fn run(cli: Cli) -> Result<Outcome> {
    if !cli.command.uses_database() {
        return commands::run_without_database(&cli).await;
    }

    let db = DatabaseConnection::connect(&cli.database)
        .await
        .context("Failed to connect to the database")?;
    debug!("Database connection opened");

    let result = match init_database(&db).await {
        Ok(()) => commands::run_with_database(&cli, &db).await,
        Err(e) => Err(anyhow::Error::new(e).context("Failed to create the tables")),
    };
    db.close().await;
    result
}

impl Cli {
    /// Short name of the selected command, for log lines.
    pub fn command_name(&self) -> &'static str {
        match self.command {
            Command::TogglCsv { .. } => "toggl-csv",
            Command::TrelloCsv => "trello-csv",
            Command::Insert { .. } => "insert",
            Command::StoreToggl { .. } => "store-toggl",
            Command::StoreTrello => "store-trello",
            Command::Export { .. } => "export",
            Command::Update { .. } => "update",
            Command::Dashboard => "dashboard",
        }
    }
}
