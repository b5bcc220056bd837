//! Record shapes shared by the CSV codec and the CSV importer.
//!
//! A record type declares its shape once, as a static table of
//! `(name, kind, accessor)` entries in column order. Export reads values
//! through the accessors; import looks up the kind of each CSV column by name
//! and coerces the cell with [`FieldKind::parse`].
//!
//! ```
//! use toggl_trello_kpi::record::{Field, FieldKind, FieldValue, Record};
//!
//! struct Sample {
//!     name: String,
//!     count: i64,
//! }
//!
//! impl Record for Sample {
//!     const FIELDS: &'static [Field<Self>] = &[
//!         Field { name: "name", kind: FieldKind::Text, get: |s| FieldValue::Text(s.name.clone()) },
//!         Field { name: "count", kind: FieldKind::Int64, get: |s| FieldValue::Int64(s.count) },
//!     ];
//! }
//!
//! assert_eq!(Sample::column_names(), vec!["name", "count"]);
//! assert_eq!(Sample::field("COUNT").map(|f| f.kind), Some(FieldKind::Int64));
//! ```

mod value;

pub use value::{
    format_timestamp, parse_bool, parse_timestamp, split_text_list, FieldKind, FieldValue,
};

/// One column of a record shape.
pub struct Field<R> {
    /// Column name, used as the CSV header and looked up on import.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Reads this field from a record.
    pub get: fn(&R) -> FieldValue,
}

/// A flat, fixed-shape record that can be written to CSV and loaded from it.
pub trait Record: Sized + 'static {
    /// The record's fields in declaration (and CSV column) order.
    const FIELDS: &'static [Field<Self>];

    fn column_names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|field| field.name).collect()
    }

    /// Finds a field by name, ignoring ASCII case (SQL folds unquoted
    /// identifiers, so `Id` and `id` name the same column).
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    fn values(&self) -> Vec<FieldValue> {
        Self::FIELDS.iter().map(|field| (field.get)(self)).collect()
    }
}
