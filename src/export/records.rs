//! Typed record CSV export.
//!
//! Writes a homogeneous slice of [`Record`]s as CSV: one header row of field
//! names in declaration order, then one row per record in slice order.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::{error, info};

use crate::error_handling::CsvExportError;
use crate::record::{FieldValue, Record};

/// Writes `records` as CSV to `out` and returns the number of data rows.
///
/// # Errors
///
/// Returns `CsvExportError::EmptyEntries` for an empty slice, before anything
/// is written.
pub fn write_records<R: Record, W: Write>(out: W, records: &[R]) -> Result<usize, CsvExportError> {
    if records.is_empty() {
        return Err(CsvExportError::EmptyEntries);
    }

    let mut writer = Writer::from_writer(out);
    writer.write_record(R::column_names())?;
    for record in records {
        writer.write_record(record.values().iter().map(FieldValue::to_csv_field))?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Writes `records` to `{name}.csv` in the working directory.
pub fn write_records_csv<R: Record>(records: &[R], name: &str) -> Result<PathBuf, CsvExportError> {
    write_records_csv_in(Path::new("."), records, name)
}

/// Writes `records` to `{dir}/{name}.csv`, replacing any existing file.
///
/// No file is created when `records` is empty.
pub fn write_records_csv_in<R: Record>(
    dir: &Path,
    records: &[R],
    name: &str,
) -> Result<PathBuf, CsvExportError> {
    if records.is_empty() {
        error!("No records to write to {name}.csv");
        return Err(CsvExportError::EmptyEntries);
    }

    let path = dir.join(format!("{name}.csv"));
    let file = File::create(&path)?;
    let count = write_records(file, records)?;
    info!("Wrote {count} records to {}", path.display());
    Ok(path)
}
