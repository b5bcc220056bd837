//! Tests for typed record CSV export and re-import.

use std::fs;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use toggl_trello_kpi::error_handling::CsvExportError;
use toggl_trello_kpi::export::{write_records, write_records_csv_in};
use toggl_trello_kpi::import::insert_from_csv;
use toggl_trello_kpi::record::{parse_timestamp, Field, FieldKind, FieldValue, Record};

#[path = "helpers.rs"]
mod helpers;

use helpers::{create_empty_pool, RecordingExecutor};

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    string_field: String,
    int64_field: i64,
    uint64_field: u64,
    bool_field: bool,
    time_field: DateTime<Utc>,
    string_array: Vec<String>,
}

impl Record for Sample {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "StringField",
            kind: FieldKind::Text,
            get: |s| FieldValue::Text(s.string_field.clone()),
        },
        Field {
            name: "Int64Field",
            kind: FieldKind::Int64,
            get: |s| FieldValue::Int64(s.int64_field),
        },
        Field {
            name: "Uint64Field",
            kind: FieldKind::Uint64,
            get: |s| FieldValue::Uint64(s.uint64_field),
        },
        Field {
            name: "BoolField",
            kind: FieldKind::Bool,
            get: |s| FieldValue::Bool(s.bool_field),
        },
        Field {
            name: "TimeField",
            kind: FieldKind::Timestamp,
            get: |s| FieldValue::Timestamp(s.time_field),
        },
        Field {
            name: "StringArray",
            kind: FieldKind::TextList,
            get: |s| FieldValue::TextList(s.string_array.clone()),
        },
    ];
}

/// Same columns without the list, for the database round trip.
#[derive(Debug, Clone, PartialEq)]
struct ScalarSample {
    string_field: String,
    int64_field: i64,
    uint64_field: u64,
    bool_field: bool,
    time_field: DateTime<Utc>,
}

impl Record for ScalarSample {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "StringField",
            kind: FieldKind::Text,
            get: |s| FieldValue::Text(s.string_field.clone()),
        },
        Field {
            name: "Int64Field",
            kind: FieldKind::Int64,
            get: |s| FieldValue::Int64(s.int64_field),
        },
        Field {
            name: "Uint64Field",
            kind: FieldKind::Uint64,
            get: |s| FieldValue::Uint64(s.uint64_field),
        },
        Field {
            name: "BoolField",
            kind: FieldKind::Bool,
            get: |s| FieldValue::Bool(s.bool_field),
        },
        Field {
            name: "TimeField",
            kind: FieldKind::Timestamp,
            get: |s| FieldValue::Timestamp(s.time_field),
        },
    ];
}

/// A record with a field the CSV mapping does not cover.
struct WithBlob {
    name: String,
}

impl Record for WithBlob {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "name",
            kind: FieldKind::Text,
            get: |w| FieldValue::Text(w.name.clone()),
        },
        Field {
            name: "payload",
            kind: FieldKind::Other("Vec<u8>"),
            get: |_| FieldValue::Other("Vec<u8>"),
        },
    ];
}

fn sample() -> Sample {
    Sample {
        string_field: "x".to_string(),
        int64_field: 75,
        uint64_field: 9,
        bool_field: true,
        time_field: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
        string_array: vec!["a".to_string(), "b".to_string()],
    }
}

#[test]
fn test_export_writes_canonical_text() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_records_csv_in(temp_dir.path(), &[sample()], "t").expect("export");

    assert_eq!(path, temp_dir.path().join("t.csv"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "StringField,Int64Field,Uint64Field,BoolField,TimeField,StringArray\n\
         x,75,9,true,2021-01-01T00:00:00Z,\"a,b\"\n"
    );
}

#[test]
fn test_export_rows_follow_input_order() {
    let mut second = sample();
    second.string_field = "y".to_string();
    second.bool_field = false;
    second.string_array.clear();

    let mut out = Vec::new();
    let rows = write_records(&mut out, &[sample(), second]).expect("export");
    assert_eq!(rows, 2);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("x,"));
    assert_eq!(lines[2], "y,75,9,false,2021-01-01T00:00:00Z,");
}

#[test]
fn test_export_of_nothing_writes_no_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = write_records_csv_in::<Sample>(temp_dir.path(), &[], "t");

    assert!(matches!(result, Err(CsvExportError::EmptyEntries)));
    assert!(!temp_dir.path().join("t.csv").exists());
}

#[test]
fn test_unsupported_field_is_written_empty() {
    let mut out = Vec::new();
    write_records(
        &mut out,
        &[WithBlob {
            name: "blob".to_string(),
        }],
    )
    .expect("unsupported fields do not fail the export");
    assert_eq!(String::from_utf8(out).unwrap(), "name,payload\nblob,\n");
}

#[test]
fn test_export_overwrites_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("t.csv");
    fs::write(&path, "stale content that is longer than the new file\n".repeat(10)).unwrap();

    write_records_csv_in(temp_dir.path(), &[sample()], "t").expect("export");
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn test_import_passes_list_cells_as_sequences() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_records_csv_in(temp_dir.path(), &[sample()], "t").expect("export");

    let db = RecordingExecutor::default();
    let inserted = insert_from_csv::<Sample, _>(&db, &path, "t").await.expect("import");
    assert_eq!(inserted, 1);

    let statements = db.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].sql,
        "INSERT INTO t(StringField,Int64Field,Uint64Field,BoolField,TimeField,StringArray) VALUES ($1,$2,$3,$4,$5,$6)"
    );
    assert_eq!(
        statements[0].params,
        vec![
            FieldValue::Text("x".to_string()),
            FieldValue::Int64(75),
            FieldValue::Uint64(9),
            FieldValue::Bool(true),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
            FieldValue::TextList(vec!["a".to_string(), "b".to_string()]),
        ]
    );
}

#[tokio::test]
async fn test_scalar_records_survive_a_database_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let records = vec![
        ScalarSample {
            string_field: "first, with comma".to_string(),
            int64_field: -12,
            uint64_field: 9_000_000_000,
            bool_field: true,
            time_field: Utc.with_ymd_and_hms(2021, 6, 30, 23, 59, 59).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
        },
        ScalarSample {
            string_field: "second \"quoted\"".to_string(),
            int64_field: 0,
            uint64_field: 1,
            bool_field: false,
            time_field: Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0).unwrap(),
        },
    ];
    let path = write_records_csv_in(temp_dir.path(), &records, "samples").expect("export");

    let pool = create_empty_pool().await;
    sqlx::query(
        "CREATE TABLE samples (
            StringField TEXT NOT NULL,
            Int64Field INTEGER NOT NULL,
            Uint64Field INTEGER NOT NULL,
            BoolField BOOLEAN NOT NULL,
            TimeField TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create table");

    let inserted = insert_from_csv::<ScalarSample, _>(&pool, &path, "samples")
        .await
        .expect("import");
    assert_eq!(inserted, 2);

    let rows: Vec<(String, i64, i64, bool, String)> = sqlx::query_as(
        "SELECT StringField, Int64Field, Uint64Field, BoolField, TimeField FROM samples ORDER BY rowid",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to read rows");

    let loaded: Vec<ScalarSample> = rows
        .into_iter()
        .map(|(s, i, u, b, t)| ScalarSample {
            string_field: s,
            int64_field: i,
            uint64_field: u64::try_from(u).unwrap(),
            bool_field: b,
            time_field: parse_timestamp(&t).unwrap(),
        })
        .collect();
    assert_eq!(loaded, records);
}
