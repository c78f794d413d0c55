//! Table loading options and configuration.

/// Options for reading delimited table files.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (ASCII). Comma by default.
    pub delimiter: u8,

    /// Whether to trim leading/trailing whitespace from fields
    pub trim_fields: bool,

    /// Whether fully blank records are skipped rather than kept
    pub skip_blank_records: bool,
}

impl CsvOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable field trimming.
    pub fn with_trim_fields(mut self, trim: bool) -> Self {
        self.trim_fields = trim;
        self
    }

    /// Trim whitespace around fields.
    pub fn trimmed(mut self) -> Self {
        self.trim_fields = true;
        self
    }

    /// Enable or disable skipping of blank records.
    pub fn with_skip_blank_records(mut self, skip: bool) -> Self {
        self.skip_blank_records = skip;
        self
    }

    /// Keep blank records instead of skipping them.
    ///
    /// A kept blank record is a single empty field, which a multi-column
    /// header then rejects as ragged.
    pub fn keep_blank_records(mut self) -> Self {
        self.skip_blank_records = false;
        self
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_fields: false,
            skip_blank_records: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = CsvOptions::new()
            .with_delimiter(b';')
            .trimmed()
            .keep_blank_records();

        assert_eq!(options.delimiter, b';');
        assert!(options.trim_fields);
        assert!(!options.skip_blank_records);
    }

    #[test]
    fn test_default_options() {
        let options = CsvOptions::default();
        assert_eq!(options.delimiter, b',');
        assert!(!options.trim_fields);
        assert!(options.skip_blank_records);
    }
}
