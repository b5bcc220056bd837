//! SQL result-set CSV export.
//!
//! Dumps a query's rows to CSV without knowing the column types: every value
//! is read as raw text and SQL NULL becomes an empty cell. The header is taken
//! from the statement metadata, so an empty table still yields a header row.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use futures::TryStreamExt;
use log::info;

use crate::error_handling::CsvExportError;
use crate::storage::SqlExecutor;

/// Exports every column of `table` to `{dir}/{table}.csv`.
///
/// # Returns
///
/// The number of data rows written.
pub async fn export_table<E: SqlExecutor>(
    db: &E,
    dir: &Path,
    table: &str,
) -> Result<usize, CsvExportError> {
    let sql = format!("SELECT * FROM {table}");
    export_query_to_file(db, &sql, &table_csv_path(dir, table)).await
}

/// Exports the listed columns of `table`, in the listed order, to
/// `{dir}/{table}.csv`.
///
/// Column names are spliced into the statement text unquoted.
pub async fn export_table_columns<E: SqlExecutor>(
    db: &E,
    dir: &Path,
    table: &str,
    columns: &[String],
) -> Result<usize, CsvExportError> {
    let sql = format!("SELECT {} FROM {table}", columns.join(","));
    export_query_to_file(db, &sql, &table_csv_path(dir, table)).await
}

/// Path of the CSV file a table export writes.
pub fn table_csv_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{table}.csv"))
}

/// Runs `sql` and writes the result set to `output`, replacing any existing
/// file.
///
/// The query is checked before the file is created, so a failing statement
/// leaves no file behind.
pub async fn export_query_to_file<E: SqlExecutor>(
    db: &E,
    sql: &str,
    output: &Path,
) -> Result<usize, CsvExportError> {
    let columns = db.column_names(sql).await?;
    let file = File::create(output)?;
    let count = write_rows(db, sql, &columns, file).await?;
    info!("Exported {count} rows to {}", output.display());
    Ok(count)
}

/// Runs `sql` and writes the result set as CSV to any writer.
pub async fn export_query<E: SqlExecutor, W: Write>(
    db: &E,
    sql: &str,
    out: W,
) -> Result<usize, CsvExportError> {
    let columns = db.column_names(sql).await?;
    write_rows(db, sql, &columns, out).await
}

async fn write_rows<E: SqlExecutor, W: Write>(
    db: &E,
    sql: &str,
    columns: &[String],
    out: W,
) -> Result<usize, CsvExportError> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(columns)?;

    let mut rows = db.fetch_text_rows(sql, columns);
    let mut record_count = 0;
    while let Some(cells) = rows.try_next().await? {
        writer.write_record(cells.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        record_count += 1;
    }

    writer.flush()?;
    Ok(record_count)
}
