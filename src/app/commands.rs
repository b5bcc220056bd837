use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::config::{Cli, Command, TogglConfig, TrelloConfig};
use crate::dashboard::create_dashboard;
use crate::export::{export_table, export_table_columns, table_csv_path};
use crate::import::{insert_from_csv, update_from_csv};
use crate::initialization::init_client;
use crate::storage::{DatabaseConnection, KnownTable};
use crate::toggl::{month_range, TogglClient, TogglTime, TogglTimeEntry};
use crate::trello::{Trello, TrelloCardEntry, TrelloClient};

use super::Outcome;

pub(super) async fn run_without_database(cli: &Cli) -> Result<Outcome> {
    match &cli.command {
        Command::TogglCsv { year, month } => {
            let (start, end) = month_bounds(*year, *month)?;
            let client = toggl_client(&cli.toggl)?;
            let path = TogglTime::new(client)
                .output_dir(&cli.output_dir)
                .download_as_csv(start, end)
                .await
                .context("Failed to download Toggl time entries")?;
            Ok(Outcome::CsvWritten { path, rows: None })
        }
        Command::TrelloCsv => {
            let client = trello_client(&cli.trello)?;
            let path = Trello::new(client)
                .output_dir(&cli.output_dir)
                .download_as_csv()
                .await
                .context("Failed to download Trello cards")?;
            Ok(Outcome::CsvWritten { path, rows: None })
        }
        Command::Dashboard => {
            let path = create_dashboard(&cli.dashboard).context("Failed to create the dashboard")?;
            Ok(Outcome::Dashboard { path })
        }
        other => Err(anyhow!("{other:?} needs a database connection")),
    }
}

pub(super) async fn run_with_database(cli: &Cli, db: &DatabaseConnection) -> Result<Outcome> {
    match &cli.command {
        Command::Insert { file, table } => {
            let rows = match table {
                KnownTable::TogglTime => {
                    insert_from_csv::<TogglTimeEntry, _>(db, file, table.name()).await
                }
                KnownTable::TrelloCard => {
                    insert_from_csv::<TrelloCardEntry, _>(db, file, table.name()).await
                }
            }
            .with_context(|| format!("Failed to insert {} into {table}", file.display()))?;
            Ok(Outcome::Inserted {
                table: table.to_string(),
                rows,
            })
        }
        Command::StoreToggl { year, month } => {
            let (start, end) = month_bounds(*year, *month)?;
            let client = toggl_client(&cli.toggl)?;
            let rows = TogglTime::with_database(client, db.clone())
                .store(start, end)
                .await
                .context("Failed to store Toggl time entries")?;
            Ok(Outcome::Inserted {
                table: KnownTable::TogglTime.to_string(),
                rows,
            })
        }
        Command::StoreTrello => {
            let client = trello_client(&cli.trello)?;
            let rows = Trello::with_database(client, db.clone())
                .store()
                .await
                .context("Failed to store Trello cards")?;
            Ok(Outcome::Inserted {
                table: KnownTable::TrelloCard.to_string(),
                rows,
            })
        }
        Command::Export { table, columns } => {
            let rows = if columns.is_empty() {
                export_table(db, &cli.output_dir, table.name()).await
            } else {
                export_table_columns(db, &cli.output_dir, table.name(), columns).await
            }
            .with_context(|| format!("Failed to export {table}"))?;
            Ok(Outcome::CsvWritten {
                path: table_csv_path(&cli.output_dir, table.name()),
                rows: Some(rows),
            })
        }
        Command::Update {
            file,
            table,
            column,
        } => {
            let summary = update_from_csv(db, file, table.name(), column)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            info!(
                "{table}.{column}: {} updated, {} failed",
                summary.updated, summary.failed
            );
            Ok(Outcome::Updated {
                table: table.to_string(),
                column: column.clone(),
                summary,
            })
        }
        Command::TogglCsv { .. } | Command::TrelloCsv | Command::Dashboard => {
            run_without_database(cli).await
        }
    }
}

fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    month_range(year, month).ok_or_else(|| anyhow!("Invalid month {year}-{month:02}"))
}

fn toggl_client(config: &TogglConfig) -> Result<TogglClient> {
    let token = config
        .api_token
        .as_deref()
        .context("TOGGL_API_TOKEN is not set")?;
    let http = init_client().context("Failed to initialize HTTP client")?;
    Ok(TogglClient::new(http, &config.api_url, token))
}

fn trello_client(config: &TrelloConfig) -> Result<TrelloClient> {
    let app_key = config
        .app_key
        .as_deref()
        .context("TRELLO_APP_KEY is not set")?;
    let token = config
        .api_token
        .as_deref()
        .context("TRELLO_API_TOKEN is not set")?;
    let board_id = config
        .board_id
        .as_deref()
        .context("TRELLO_BOARD_ID is not set")?;
    let http = init_client().context("Failed to initialize HTTP client")?;
    Ok(TrelloClient::new(
        http,
        &config.api_url,
        app_key,
        token,
        board_id,
        config.label_colors.clone(),
    ))
}
