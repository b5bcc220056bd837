//! The database capability the CSV exporter, importer and updater run against.
//!
//! [`SqlExecutor`] is implemented for SQLite and PostgreSQL pools and for
//! [`DatabaseConnection`], which picks one of the two at runtime. Statements
//! use `$N` placeholders, which both backends accept.

use futures::stream::BoxStream;
use futures::StreamExt;
use log::warn;
use sqlx::postgres::PgRow;
use sqlx::query::Query;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Database, Executor, PgPool, Postgres, Row, Sqlite, SqlitePool, Statement};

use crate::record::{format_timestamp, FieldValue};

/// The raw text cells of one result row, in requested column order.
/// `None` is SQL NULL.
pub type TextRow = Vec<Option<String>>;

/// SQL dialect of a connection. Only DDL differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// Runs statements for the CSV services.
#[allow(async_fn_in_trait)]
pub trait SqlExecutor {
    fn dialect(&self) -> Dialect;

    /// Column names the query returns, in result order. Works for an empty
    /// result set since only the statement metadata is read.
    async fn column_names(&self, sql: &str) -> Result<Vec<String>, sqlx::Error>;

    /// Streams the query's rows as raw text, reading each row's cells by
    /// name in `columns` order.
    fn fetch_text_rows<'a>(
        &'a self,
        sql: &'a str,
        columns: &'a [String],
    ) -> BoxStream<'a, Result<TextRow, sqlx::Error>>;

    /// Executes one statement with positional parameters and returns the
    /// number of affected rows.
    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error>;

    /// Like [`SqlExecutor::execute`], inside its own transaction: committed on
    /// success, rolled back on failure.
    async fn execute_in_transaction(
        &self,
        sql: &str,
        params: &[FieldValue],
    ) -> Result<u64, sqlx::Error>;
}

type BoundQuery<'q, DB> = Query<'q, DB, <DB as Database>::Arguments<'q>>;

fn unsupported(type_name: &str) -> sqlx::Error {
    sqlx::Error::Encode(format!("unsupported field type {type_name}").into())
}

fn to_i64(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// SQLite has no array or timestamp types: text lists are stored comma-joined
/// and timestamps in their canonical RFC-3339 text.
fn bind_sqlite<'q>(sql: &'q str, params: &[FieldValue]) -> Result<BoundQuery<'q, Sqlite>, sqlx::Error> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            FieldValue::Text(text) => query.bind(text.clone()),
            FieldValue::Int64(v) => query.bind(*v),
            FieldValue::Uint64(v) => query.bind(to_i64(*v)?),
            FieldValue::Bool(v) => query.bind(*v),
            FieldValue::Timestamp(ts) => query.bind(format_timestamp(ts)),
            FieldValue::TextList(items) => query.bind(items.join(",")),
            FieldValue::Other(type_name) => return Err(unsupported(type_name)),
        };
    }
    Ok(query)
}

fn bind_postgres<'q>(
    sql: &'q str,
    params: &[FieldValue],
) -> Result<BoundQuery<'q, Postgres>, sqlx::Error> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            FieldValue::Text(text) => query.bind(text.clone()),
            FieldValue::Int64(v) => query.bind(*v),
            FieldValue::Uint64(v) => query.bind(to_i64(*v)?),
            FieldValue::Bool(v) => query.bind(*v),
            FieldValue::Timestamp(ts) => query.bind(*ts),
            FieldValue::TextList(items) => query.bind(items.clone()),
            FieldValue::Other(type_name) => return Err(unsupported(type_name)),
        };
    }
    Ok(query)
}

fn sqlite_text_cells(row: &SqliteRow, columns: &[String]) -> Result<TextRow, sqlx::Error> {
    columns
        .iter()
        .map(|name| row.try_get_unchecked::<Option<String>, _>(name.as_str()))
        .collect()
}

// Rows fetched through `raw_sql` use the simple query protocol, so every
// value arrives in its text form whatever the column type.
fn postgres_text_cells(row: &PgRow, columns: &[String]) -> Result<TextRow, sqlx::Error> {
    columns
        .iter()
        .map(|name| row.try_get_unchecked::<Option<String>, _>(name.as_str()))
        .collect()
}

impl SqlExecutor for SqlitePool {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn column_names(&self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
        let statement = self.prepare(sql).await?;
        Ok(statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect())
    }

    fn fetch_text_rows<'a>(
        &'a self,
        sql: &'a str,
        columns: &'a [String],
    ) -> BoxStream<'a, Result<TextRow, sqlx::Error>> {
        sqlx::raw_sql(sql)
            .fetch(self)
            .map(move |row| row.and_then(|row| sqlite_text_cells(&row, columns)))
            .boxed()
    }

    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        let query = bind_sqlite(sql, params)?;
        Ok(query.execute(self).await?.rows_affected())
    }

    async fn execute_in_transaction(
        &self,
        sql: &str,
        params: &[FieldValue],
    ) -> Result<u64, sqlx::Error> {
        let query = bind_sqlite(sql, params)?;
        let mut tx = self.begin().await?;
        match query.execute(&mut *tx).await {
            Ok(done) => {
                tx.commit().await?;
                Ok(done.rows_affected())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Failed to roll back transaction: {rollback_err}");
                }
                Err(e)
            }
        }
    }
}

impl SqlExecutor for PgPool {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn column_names(&self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
        let statement = self.prepare(sql).await?;
        Ok(statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect())
    }

    fn fetch_text_rows<'a>(
        &'a self,
        sql: &'a str,
        columns: &'a [String],
    ) -> BoxStream<'a, Result<TextRow, sqlx::Error>> {
        sqlx::raw_sql(sql)
            .fetch(self)
            .map(move |row| row.and_then(|row| postgres_text_cells(&row, columns)))
            .boxed()
    }

    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        let query = bind_postgres(sql, params)?;
        Ok(query.execute(self).await?.rows_affected())
    }

    async fn execute_in_transaction(
        &self,
        sql: &str,
        params: &[FieldValue],
    ) -> Result<u64, sqlx::Error> {
        let query = bind_postgres(sql, params)?;
        let mut tx = self.begin().await?;
        match query.execute(&mut *tx).await {
            Ok(done) => {
                tx.commit().await?;
                Ok(done.rows_affected())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Failed to roll back transaction: {rollback_err}");
                }
                Err(e)
            }
        }
    }
}

/// A pool for whichever backend the configuration names.
#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DatabaseConnection {
    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

impl SqlExecutor for DatabaseConnection {
    fn dialect(&self) -> Dialect {
        match self {
            Self::Postgres(_) => Dialect::Postgres,
            Self::Sqlite(_) => Dialect::Sqlite,
        }
    }

    async fn column_names(&self, sql: &str) -> Result<Vec<String>, sqlx::Error> {
        match self {
            Self::Postgres(pool) => pool.column_names(sql).await,
            Self::Sqlite(pool) => pool.column_names(sql).await,
        }
    }

    fn fetch_text_rows<'a>(
        &'a self,
        sql: &'a str,
        columns: &'a [String],
    ) -> BoxStream<'a, Result<TextRow, sqlx::Error>> {
        match self {
            Self::Postgres(pool) => pool.fetch_text_rows(sql, columns),
            Self::Sqlite(pool) => pool.fetch_text_rows(sql, columns),
        }
    }

    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        match self {
            Self::Postgres(pool) => SqlExecutor::execute(pool, sql, params).await,
            Self::Sqlite(pool) => SqlExecutor::execute(pool, sql, params).await,
        }
    }

    async fn execute_in_transaction(
        &self,
        sql: &str,
        params: &[FieldValue],
    ) -> Result<u64, sqlx::Error> {
        match self {
            Self::Postgres(pool) => pool.execute_in_transaction(sql, params).await,
            Self::Sqlite(pool) => pool.execute_in_transaction(sql, params).await,
        }
    }
}
