//! CSV import into the database.
//!
//! - [`insert_from_csv`]: one INSERT per data row, cells coerced by a record shape
//! - [`update_from_csv`]: one UPDATE of a single column per data row, matched by `id`
//!
//! The first CSV row is always the header. Every data row must have as many
//! cells as the header.

mod insert;
mod update;

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::error_handling::ImportError;

pub use insert::insert_from_csv;
pub use update::{update_from_csv, UpdateSummary};

/// Opens `path` as a headerless CSV reader so row 0 can be read as a record.
fn open_csv(path: &Path) -> Result<Reader<File>, ImportError> {
    let file = File::open(path)?;
    Ok(ReaderBuilder::new().has_headers(false).from_reader(file))
}

/// Reads the header row, or `None` for an empty file.
fn read_header(reader: &mut Reader<File>) -> Result<Option<StringRecord>, ImportError> {
    let mut header = StringRecord::new();
    if reader.read_record(&mut header)? {
        Ok(Some(header))
    } else {
        Ok(None)
    }
}
