//! CSV-to-SQL row import.

use std::path::Path;

use csv::StringRecord;
use log::{debug, info};

use crate::error_handling::ImportError;
use crate::record::{FieldKind, FieldValue, Record};
use crate::storage::{insert_statement, SqlExecutor};

use super::{open_csv, read_header};

/// Inserts every data row of the CSV file at `path` into `table`.
///
/// The header names the target columns. Each header column is looked up in
/// `R`'s shape (ignoring case) and its cells are coerced to that field's kind.
/// Rows are inserted in file order, one statement per row and no enclosing
/// transaction, so rows before a failing one stay inserted.
///
/// # Returns
///
/// The number of rows inserted. An empty file inserts nothing and succeeds.
///
/// # Errors
///
/// - `ImportError::Csv` for a malformed file, before anything is inserted
/// - `ImportError::UnknownColumn` if a header column is not a field of `R`
/// - `ImportError::UnsupportedColumn` if a header column's field has no CSV mapping
/// - `ImportError::FieldCoercion` for the first cell that fails to parse
/// - `ImportError::Sql` for the first failing statement
pub async fn insert_from_csv<R: Record, E: SqlExecutor>(
    db: &E,
    path: &Path,
    table: &str,
) -> Result<usize, ImportError> {
    let mut reader = open_csv(path)?;
    let Some(header) = read_header(&mut reader)? else {
        info!("The CSV file {} is empty, nothing to insert", path.display());
        return Ok(0);
    };

    let columns: Vec<&str> = header.iter().collect();
    let kinds = columns
        .iter()
        .map(|column| match R::field(column).map(|field| field.kind) {
            None => Err(ImportError::UnknownColumn(column.to_string())),
            Some(FieldKind::Other(type_name)) => Err(ImportError::UnsupportedColumn {
                column: column.to_string(),
                type_name,
            }),
            Some(kind) => Ok(kind),
        })
        .collect::<Result<Vec<FieldKind>, _>>()?;
    let sql = insert_statement(table, &columns);
    debug!("Insert statement: {sql}");

    // A malformed file fails here, before any row reaches the database.
    let records = reader.records().collect::<Result<Vec<StringRecord>, _>>()?;

    let mut inserted = 0;
    for (index, record) in records.iter().enumerate() {
        let params = coerce_row(index + 1, &columns, &kinds, record)?;
        db.execute(&sql, &params).await?;
        inserted += 1;
    }

    info!("Inserted {inserted} rows from {} into {table}", path.display());
    Ok(inserted)
}

fn coerce_row(
    row: usize,
    columns: &[&str],
    kinds: &[FieldKind],
    record: &StringRecord,
) -> Result<Vec<FieldValue>, ImportError> {
    record
        .iter()
        .zip(columns)
        .zip(kinds)
        .map(|((value, column), kind)| {
            kind.parse(value).map_err(|source| ImportError::FieldCoercion {
                row,
                column: column.to_string(),
                kind: *kind,
                value: value.to_string(),
                source,
            })
        })
        .collect()
}
