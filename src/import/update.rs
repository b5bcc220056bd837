//! CSV-to-SQL single column update.

use std::path::Path;

use csv::StringRecord;
use log::{error, info, warn};

use crate::error_handling::ImportError;
use crate::record::FieldValue;
use crate::storage::SqlExecutor;

use super::{open_csv, read_header};

/// Outcome of [`update_from_csv`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Rows whose UPDATE statement succeeded.
    pub updated: usize,
    /// Rows whose UPDATE statement failed. Each failure is logged.
    pub failed: usize,
}

/// Sets `column` of `table` from the CSV file at `path`, matching rows by `id`.
///
/// For every data row this runs `UPDATE {table} SET {column} = $1 WHERE id = $2`
/// with the row's `column` and `id` cells passed as text. A row whose statement
/// fails is logged and counted in [`UpdateSummary::failed`]; the remaining rows
/// are still processed.
///
/// An empty file, or a header without `id` or without `column`, is logged and
/// updates nothing. Header names match exactly.
///
/// # Errors
///
/// Only for a file that cannot be opened or parsed as CSV. The whole file is
/// parsed before the first UPDATE, so a malformed file changes nothing.
pub async fn update_from_csv<E: SqlExecutor>(
    db: &E,
    path: &Path,
    table: &str,
    column: &str,
) -> Result<UpdateSummary, ImportError> {
    let mut summary = UpdateSummary::default();
    let mut reader = open_csv(path)?;
    let Some(header) = read_header(&mut reader)? else {
        error!("The CSV file {} is empty", path.display());
        return Ok(summary);
    };

    let Some(id_index) = header.iter().position(|name| name == "id") else {
        error!("The CSV file {} has no id column", path.display());
        return Ok(summary);
    };
    let Some(column_index) = header.iter().position(|name| name == column) else {
        error!("The CSV file {} has no {column} column", path.display());
        return Ok(summary);
    };

    let sql = format!("UPDATE {table} SET {column} = $1 WHERE id = $2");
    let records = reader.records().collect::<Result<Vec<StringRecord>, _>>()?;
    for (index, record) in records.iter().enumerate() {
        let id = record.get(id_index).unwrap_or_default();
        let value = record.get(column_index).unwrap_or_default();
        let params = [
            FieldValue::Text(value.to_string()),
            FieldValue::Text(id.to_string()),
        ];
        match db.execute(&sql, &params).await {
            Ok(_) => summary.updated += 1,
            Err(e) => {
                warn!(
                    "Failed to update row {} (id {id:?}) of {table}: {e}",
                    index + 1
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        "Updated {column} of {table} from {}: {} rows updated, {} failed",
        path.display(),
        summary.updated,
        summary.failed
    );
    Ok(summary)
}
