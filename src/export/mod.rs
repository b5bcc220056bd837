//! CSV export.
//!
//! Two writers share one CSV text format:
//! - [`write_records`] and friends serialize typed records through their shape
//! - [`export_table`] and friends dump SQL result sets as raw text

mod csv;
mod records;

pub use self::csv::{
    export_query, export_query_to_file, export_table, export_table_columns, table_csv_path,
};
pub use records::{write_records, write_records_csv, write_records_csv_in};
