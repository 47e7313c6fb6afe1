//! Record export
//!
//! Console destination: the record sequence as pretty-printed JSON on
//! stdout, no file touched. File destination: CSV, fully serialized in
//! memory before the filesystem is touched so a failure never leaves a
//! partial file behind.
//!
//! The CSV header comes from the first record's field names. A later record
//! missing a header field produces an empty cell; a later record with extra
//! fields silently loses them. That asymmetry is inherited behavior, kept
//! for output compatibility.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use super::records::Record;
use crate::utils::{ExportError, Result};

/// Where the record set goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Console,
    File(PathBuf),
}

impl Destination {
    /// The literal string `console` selects stdout, anything else is a path
    pub fn parse(raw: &str) -> Self {
        if raw == "console" {
            Destination::Console
        } else {
            Destination::File(PathBuf::from(raw))
        }
    }
}

/// Export the record set to its destination
pub fn export_records(
    records: &[Record],
    destination: &Destination,
    delimiter: u8,
    overwrite: bool,
) -> Result<()> {
    if records.is_empty() {
        return Err(ExportError::EmptyResult);
    }

    match destination {
        Destination::Console => {
            let json = serde_json::to_string_pretty(records)
                .map_err(|e| ExportError::Parse(format!("failed to encode records: {e}")))?;
            println!("{json}");
            Ok(())
        }
        Destination::File(path) => {
            let csv = render_csv(records, delimiter)?;
            write_output_file(path, &csv, overwrite)?;
            info!(records = records.len(), path = %path.display(), "wrote CSV output");
            Ok(())
        }
    }
}

/// Serialize the record set as CSV, header taken from the first record
pub fn render_csv(records: &[Record], delimiter: u8) -> Result<Vec<u8>> {
    let first = records.first().ok_or(ExportError::EmptyResult)?;
    let header: Vec<&String> = first.keys().collect();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(&header)?;

    for record in records {
        let row: Vec<String> = header
            .iter()
            .map(|field| record.get(*field).map(csv_field).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Scalar rendering for one CSV cell
fn csv_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Write the fully-assembled output, honoring the overwrite flag
fn write_output_file(path: &Path, contents: &[u8], overwrite: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if path.exists() {
        if !overwrite {
            return Err(ExportError::OutputExists(path.to_path_buf()));
        }
        fs::remove_file(path)?;
    }

    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn record(fields: &[(&str, Value)]) -> Record {
        let mut record = IndexMap::new();
        for (name, value) in fields {
            record.insert(name.to_string(), value.clone());
        }
        record
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!(Destination::parse("console"), Destination::Console);
        assert_eq!(
            Destination::parse("out/results.csv"),
            Destination::File(PathBuf::from("out/results.csv"))
        );
    }

    #[test]
    fn test_render_csv_header_from_first_record() {
        let records = vec![
            record(&[
                ("bucket", Value::from("b1")),
                ("index_name", Value::from("i1")),
                ("items_count", Value::from(42)),
            ]),
            // Missing items_count, carries an extra field the header lacks
            record(&[
                ("bucket", Value::from("b1")),
                ("index_name", Value::from("i2")),
                ("data_size", Value::from(9)),
            ]),
        ];

        let csv = String::from_utf8(render_csv(&records, b',').unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "bucket,index_name,items_count");
        assert_eq!(lines[1], "b1,i1,42");
        assert_eq!(lines[2], "b1,i2,");
    }

    #[test]
    fn test_render_csv_custom_delimiter() {
        let records = vec![record(&[
            ("bucket", Value::from("b1")),
            ("items_count", Value::from(1)),
        ])];

        let csv = String::from_utf8(render_csv(&records, b';').unwrap()).unwrap();
        assert!(csv.starts_with("bucket;items_count"));
    }

    #[test]
    fn test_export_empty_records_fails() {
        let err = export_records(&[], &Destination::Console, b',', false).unwrap_err();
        assert!(matches!(err, ExportError::EmptyResult));
    }

    #[test]
    fn test_existing_file_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "old contents").unwrap();

        let records = vec![record(&[("bucket", Value::from("b1"))])];
        let err = export_records(
            &records,
            &Destination::File(path.clone()),
            b',',
            false,
        )
        .unwrap_err();

        assert!(matches!(err, ExportError::OutputExists(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old contents");
    }

    #[test]
    fn test_existing_file_with_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "old contents").unwrap();

        let records = vec![record(&[("bucket", Value::from("b1"))])];
        export_records(&records, &Destination::File(path.clone()), b',', true).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("bucket"));
        assert!(written.contains("b1"));
    }

    #[test]
    fn test_parent_directories_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/results.csv");

        let records = vec![record(&[("bucket", Value::from("b1"))])];
        export_records(&records, &Destination::File(path.clone()), b',', false).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_console_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let before: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();

        let records = vec![record(&[("bucket", Value::from("b1"))])];
        export_records(&records, &Destination::Console, b',', false).unwrap();

        let after: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(before.len(), after.len());
    }

    #[test]
    fn test_console_records_round_trip_as_json() {
        let records = vec![record(&[
            ("bucket", Value::from("b1")),
            ("items_count", Value::from(42)),
        ])];

        // The console path prints to_string_pretty of the slice; check the
        // encoding is valid JSON preserving the sequence
        let json = serde_json::to_string_pretty(&records).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }
}
