//! Integration tests for CSV loading.

use std::fs;

use statdoc::{load_table, load_table_bytes, load_table_with_options, CsvOptions, Error};

#[test]
fn test_load_table_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    fs::write(&path, "variable,coef,p_value\nage,1.05,0.02\nsex,0.88,0.04\n").unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.columns(), &["variable", "coef", "p_value"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[0], vec!["age", "1.05", "0.02"]);
    assert_eq!(table.rows()[1], vec!["sex", "0.88", "0.04"]);
}

#[test]
fn test_missing_file() {
    let result = load_table("definitely_not_here.csv");
    assert!(matches!(result, Err(Error::FileNotFound(_))));
}

#[test]
fn test_quoted_fields_with_embedded_delimiters() {
    let table =
        load_table_bytes(b"variable,label\nage,\"Age, years\"\nsex,\"Sex (\"\"male\"\")\"\n".to_vec())
            .unwrap();

    assert_eq!(table.rows()[0][1], "Age, years");
    assert_eq!(table.rows()[1][1], "Sex (\"male\")");
}

#[test]
fn test_quoted_multiline_field_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.csv");
    fs::write(&path, "variable,note\nage,\"first line\nsecond line\"\n").unwrap();

    let table = load_table(&path).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows()[0][1], "first line\nsecond line");
}

#[test]
fn test_bom_and_crlf_input() {
    let mut data = Vec::new();
    data.extend_from_slice(b"\xEF\xBB\xBF");
    data.extend_from_slice(b"variable,coef\r\nage,1.05\r\n");

    let table = load_table_bytes(data).unwrap();
    assert_eq!(table.columns(), &["variable", "coef"]);
    assert_eq!(table.rows()[0], vec!["age", "1.05"]);
}

#[test]
fn test_ragged_row_reports_line() {
    let result = load_table_bytes(b"a,b,c\n1,2,3\n4,5\n".to_vec());
    match result {
        Err(Error::Parse { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("expected 3 fields"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_header_rejected() {
    let result = load_table_bytes(b"coef,coef\n1,2\n".to_vec());
    match result {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_semicolon_delimiter_with_trim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    fs::write(&path, "variable; coef\nage; 1.05\n").unwrap();

    let options = CsvOptions::new().with_delimiter(b';').trimmed();
    let table = load_table_with_options(&path, options).unwrap();
    assert_eq!(table.columns(), &["variable", "coef"]);
    assert_eq!(table.rows()[0], vec!["age", "1.05"]);
}

#[test]
fn test_invalid_utf8_reports_line() {
    let mut data = b"variable,coef\n".to_vec();
    data.extend_from_slice(b"age,\xFF\xFE\n");

    let result = load_table_bytes(data);
    match result {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_blank_records_skipped() {
    let table = load_table_bytes(b"a,b\n1,2\n\n3,4\n".to_vec()).unwrap();
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_quoted_empty_row_kept() {
    let table = load_table_bytes(b"value\n\"\"\nx\n".to_vec()).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[0], vec![""]);
    assert_eq!(table.rows()[1], vec!["x"]);
}
