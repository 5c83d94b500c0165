use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{RawRecord, CUSTOMER_COLUMNS};

pub fn load_records(path: &Path) -> PipelineResult<Vec<RawRecord>> {
    let file = File::open(path).map_err(|err| PipelineError::io(path, err))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| PipelineError::from_csv(path, err))?
        .clone();
    check_headers(path, &headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| PipelineError::from_csv(path, err))?;
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);
        if row.iter().all(str::is_empty) {
            continue;
        }
        if row.len() != headers.len() {
            return Err(PipelineError::format(
                path,
                format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    headers.len(),
                    row.len()
                ),
            ));
        }
        let fields: BTreeMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        records.push(RawRecord { line, fields });
    }

    tracing::info!(path = %path.display(), rows = records.len(), "loaded input file");
    Ok(records)
}

fn check_headers(path: &Path, headers: &csv::StringRecord) -> PipelineResult<()> {
    if headers.iter().all(str::is_empty) {
        return Err(PipelineError::format(path, "missing header row"));
    }

    let mut seen = HashSet::new();
    for column in headers.iter() {
        if !seen.insert(column) {
            return Err(PipelineError::format(
                path,
                format!("duplicate column {column:?} in header"),
            ));
        }
    }

    let missing: Vec<&str> = CUSTOMER_COLUMNS
        .iter()
        .copied()
        .filter(|column| !seen.contains(column))
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::format(
            path,
            format!("header is missing required columns: {}", missing.join(", ")),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_rows_in_file_order() {
        let file = csv_file(
            "customer_id,name,email,signup_date\n\
             1, Avery Lee ,avery@example.com,2026-01-02\n\
             2,Jules Moreno,jules@example.com,2025-11-30\n",
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].get("name"), Some("Avery Lee"));
        assert_eq!(records[1].line, 3);
        assert_eq!(records[1].get("customer_id"), Some("2"));
    }

    #[test]
    fn extra_columns_are_kept_in_raw_record() {
        let file = csv_file(
            "customer_id,name,email,signup_date,country\n\
             1,Avery Lee,avery@example.com,2026-01-02,NZ\n",
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].get("country"), Some("NZ"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn empty_file_is_format_error() {
        let file = csv_file("");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));
    }

    #[test]
    fn missing_required_column_is_format_error() {
        let file = csv_file("customer_id,name,signup_date\n1,Avery,2026-01-02\n");
        let err = load_records(file.path()).unwrap_err();
        match err {
            PipelineError::Format { message, .. } => assert!(message.contains("email")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_column_is_format_error() {
        let file = csv_file("customer_id,name,email,email,signup_date\n");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let file = csv_file(
            "customer_id,name,email,signup_date\n\
             1,Avery Lee,avery@example.com,2026-01-02\n\
             \x20\x20\t\n\
             2,Jules Moreno,jules@example.com,2025-11-30\n",
        );

        let records = load_records(file.path()).unwrap();
        let lines: Vec<u64> = records.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn invalid_utf8_is_format_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"customer_id,name,email,signup_date\n1,\xff\xfe,a@b.c,2026-10-01\n")
            .unwrap();

        let err = load_records(file.path()).unwrap_err();
        match err {
            PipelineError::Format { message, .. } => {
                assert!(message.contains("line 2"), "{message}");
                assert!(message.contains("UTF-8"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_row_is_format_error() {
        let file = csv_file(
            "customer_id,name,email,signup_date\n\
             1,Avery Lee,avery@example.com\n",
        );
        let err = load_records(file.path()).unwrap_err();
        match err {
            PipelineError::Format { message, .. } => {
                assert_eq!(message, "line 2: expected 4 fields, found 3")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
