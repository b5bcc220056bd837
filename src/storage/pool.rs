//! Database connection pool management.
//!
//! This module opens the pool described by a [`DatabaseConfig`]:
//! - `sqlite:` URLs open a SQLite pool, creating the database file if needed
//! - any other URL, or the individual host/port/name fields, open a PostgreSQL pool

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use log::{error, info};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::SqlitePoolOptions;

use crate::config::DatabaseConfig;
use crate::error_handling::DatabaseError;
use crate::storage::executor::DatabaseConnection;

impl DatabaseConnection {
    /// Opens a pool for the configured database.
    ///
    /// The pool honors the configured connection limits. PostgreSQL connections
    /// are recycled once they reach the configured lifetime.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => connect_sqlite(url, config).await,
            Some(url) => {
                let pool = postgres_pool_options(config)
                    .connect(url)
                    .await
                    .map_err(|e| {
                        error!("Failed to connect to database: {e}");
                        DatabaseError::SqlError(e)
                    })?;
                Ok(Self::Postgres(pool))
            }
            None => {
                let options = PgConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .database(&config.name)
                    .username(&config.username)
                    .password(&config.password);
                let pool = postgres_pool_options(config)
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        error!(
                            "Failed to connect to database {} on {}:{}: {e}",
                            config.name, config.host, config.port
                        );
                        DatabaseError::SqlError(e)
                    })?;
                Ok(Self::Postgres(pool))
            }
        }
    }
}

fn postgres_pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_open_connections.max(1))
        .min_connections(config.max_idle_connections.min(config.max_open_connections))
        .max_lifetime(Duration::from_secs(config.max_lifetime_minutes * 60))
}

async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection, DatabaseError> {
    if let Some(path) = sqlite_file_path(url) {
        create_database_file(Path::new(path))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_open_connections.max(1))
        .connect(url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;
    Ok(DatabaseConnection::Sqlite(pool))
}

/// The file path inside a `sqlite:` URL, or `None` for an in-memory database.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

fn create_database_file(path: &Path) -> Result<(), DatabaseError> {
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(_) => info!("Database file {} created.", path.display()),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file {} already exists.", path.display())
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }
    Ok(())
}
