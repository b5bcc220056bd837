//! Typed record inserts.
//!
//! Records are written through their shape: the column list is the shape's
//! field names and the parameters are the record's field values.

use log::debug;

use crate::error_handling::DatabaseError;
use crate::record::Record;
use crate::storage::executor::SqlExecutor;

/// Builds `INSERT INTO {table}(c1,c2,...) VALUES ($1,$2,...)`.
///
/// `table` and `columns` are spliced into the statement text; callers pass
/// only known table names and shape or header column names.
pub fn insert_statement<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let column_list = columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    let placeholders = (1..=columns.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("INSERT INTO {table}({column_list}) VALUES ({placeholders})")
}

/// Inserts each record into `table`, one transaction per record.
///
/// Stops at the first failing record; the records before it stay committed.
pub async fn insert_records<R: Record, E: SqlExecutor>(
    db: &E,
    table: &str,
    records: &[R],
) -> Result<usize, DatabaseError> {
    let sql = insert_statement(table, &R::column_names());
    for record in records {
        db.execute_in_transaction(&sql, &record.values()).await?;
    }
    debug!("Inserted {} records into {table}", records.len());
    Ok(records.len())
}
