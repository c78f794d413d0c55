//! Delimited text reader.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};

use super::options::CsvOptions;
use super::table::DataTable;

/// UTF-8 byte order mark, stripped when present.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Field scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field
    FieldStart,
    /// Inside an unquoted field
    Unquoted,
    /// Inside a quoted field
    Quoted,
    /// Just consumed a quote inside a quoted field
    QuoteInQuoted,
}

/// Delimited table reader.
///
/// The first record is the header row; every following record is a data row
/// and must carry the same number of fields.
pub struct CsvReader {
    data: Vec<u8>,
    options: CsvOptions,
}

impl CsvReader {
    /// Open a table file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, CsvOptions::default())
    }

    /// Open a table file with custom options.
    ///
    /// A missing file maps to `Error::FileNotFound` so callers report the
    /// input path that was expected.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Self { data, options })
    }

    /// Read a table from bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::from_bytes_with_options(data, CsvOptions::default())
    }

    /// Read a table from bytes with custom options.
    pub fn from_bytes_with_options(data: impl Into<Vec<u8>>, options: CsvOptions) -> Self {
        Self {
            data: data.into(),
            options,
        }
    }

    /// Read a table from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, CsvOptions::default())
    }

    /// Read a table from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: CsvOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self { data, options })
    }

    /// Parse the input and return the loaded table.
    pub fn read(&self) -> Result<DataTable> {
        let bytes = self.data.strip_prefix(UTF8_BOM).unwrap_or(&self.data);

        let text = std::str::from_utf8(bytes).map_err(|e| {
            let line = 1 + bytes[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            Error::Parse {
                line,
                message: format!("invalid UTF-8 at byte offset {}", e.valid_up_to()),
            }
        })?;

        let records = self.split_records(text)?;

        let mut iter = records.into_iter();
        let (_, columns) = iter.next().ok_or(Error::Parse {
            line: 1,
            message: "empty input: missing header record".to_string(),
        })?;

        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::Parse {
                    line: 1,
                    message: format!("duplicate column name: {:?}", name),
                });
            }
            if name.is_empty() {
                log::warn!("column {} has an empty name", i + 1);
            }
        }

        let mut rows = Vec::new();
        for (line, fields) in iter {
            if fields.len() != columns.len() {
                return Err(Error::Parse {
                    line,
                    message: format!("expected {} fields, found {}", columns.len(), fields.len()),
                });
            }
            rows.push(fields);
        }

        log::debug!(
            "loaded table: {} columns, {} rows",
            columns.len(),
            rows.len()
        );
        DataTable::new(columns, rows)
    }

    /// Split input text into records of fields, tracking record start lines.
    ///
    /// Quoted fields preserve delimiters, quotes and newlines verbatim;
    /// LF, CRLF and lone CR all end a record outside quotes. A record counts
    /// as blank only when its single field is empty and was never quoted.
    fn split_records(&self, text: &str) -> Result<Vec<(usize, Vec<String>)>> {
        let delimiter = self.options.delimiter as char;
        let mut records: Vec<(usize, Vec<String>)> = Vec::new();
        let mut record: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut state = State::FieldStart;
        let mut record_quoted = false;
        let mut line = 1usize;
        let mut record_line = 1usize;

        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match (state, c) {
                (State::FieldStart, c) if c == delimiter => {
                    self.finish_field(&mut field, &mut record);
                }
                (State::FieldStart, '"') => {
                    record_quoted = true;
                    state = State::Quoted;
                }
                (State::FieldStart, '\r' | '\n') => {
                    if c == '\r' {
                        chars.next_if_eq(&'\n');
                    }
                    self.finish_field(&mut field, &mut record);
                    self.finish_record(&mut record, &mut records, record_line, &mut record_quoted);
                    line += 1;
                    record_line = line;
                }
                (State::FieldStart, c) => {
                    field.push(c);
                    state = State::Unquoted;
                }

                (State::Unquoted, c) if c == delimiter => {
                    self.finish_field(&mut field, &mut record);
                    state = State::FieldStart;
                }
                (State::Unquoted, '\r' | '\n') => {
                    if c == '\r' {
                        chars.next_if_eq(&'\n');
                    }
                    self.finish_field(&mut field, &mut record);
                    self.finish_record(&mut record, &mut records, record_line, &mut record_quoted);
                    line += 1;
                    record_line = line;
                    state = State::FieldStart;
                }
                (State::Unquoted, c) => field.push(c),

                (State::Quoted, '"') => state = State::QuoteInQuoted,
                (State::Quoted, '\n') => {
                    field.push('\n');
                    line += 1;
                }
                (State::Quoted, c) => field.push(c),

                (State::QuoteInQuoted, '"') => {
                    field.push('"');
                    state = State::Quoted;
                }
                (State::QuoteInQuoted, c) if c == delimiter => {
                    self.finish_field(&mut field, &mut record);
                    state = State::FieldStart;
                }
                (State::QuoteInQuoted, '\r' | '\n') => {
                    if c == '\r' {
                        chars.next_if_eq(&'\n');
                    }
                    self.finish_field(&mut field, &mut record);
                    self.finish_record(&mut record, &mut records, record_line, &mut record_quoted);
                    line += 1;
                    record_line = line;
                    state = State::FieldStart;
                }
                (State::QuoteInQuoted, c) => {
                    return Err(Error::Parse {
                        line,
                        message: format!("unexpected character {:?} after closing quote", c),
                    });
                }
            }
        }

        match state {
            State::Quoted => {
                return Err(Error::Parse {
                    line,
                    message: "unterminated quoted field".to_string(),
                });
            }
            State::Unquoted | State::QuoteInQuoted => {
                self.finish_field(&mut field, &mut record);
                self.finish_record(&mut record, &mut records, record_line, &mut record_quoted);
            }
            State::FieldStart => {
                // A trailing record break already closed the last record;
                // a trailing delimiter leaves a final empty field to flush.
                if !record.is_empty() {
                    self.finish_field(&mut field, &mut record);
                    self.finish_record(&mut record, &mut records, record_line, &mut record_quoted);
                }
            }
        }

        Ok(records)
    }

    fn finish_field(&self, field: &mut String, record: &mut Vec<String>) {
        let value = std::mem::take(field);
        if self.options.trim_fields {
            record.push(value.trim().to_string());
        } else {
            record.push(value);
        }
    }

    fn finish_record(
        &self,
        record: &mut Vec<String>,
        records: &mut Vec<(usize, Vec<String>)>,
        record_line: usize,
        quoted: &mut bool,
    ) {
        let fields = std::mem::take(record);
        // A quoted empty field ("") is data, not a blank line
        let blank = !*quoted && fields.len() == 1 && fields[0].is_empty();
        *quoted = false;
        if blank && self.options.skip_blank_records {
            log::debug!("skipping blank record at line {}", record_line);
            return;
        }
        records.push((record_line, fields));
    }
}
