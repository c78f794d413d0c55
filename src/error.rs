//! Error types for statdoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for statdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during report generation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input table file does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Error parsing delimited table data.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input where the error was detected.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// The chart image file does not exist.
    #[error("Image file not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The image data is not in a supported raster format.
    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    /// An image block references a resource id the document does not hold.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Error during rendering (DOCX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The document violates a structural constraint the writer relies on.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FileNotFound(PathBuf::from("cox_summary.csv"));
        assert_eq!(err.to_string(), "Input file not found: cox_summary.csv");

        let err = Error::Parse {
            line: 3,
            message: "expected 3 fields, found 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at line 3: expected 3 fields, found 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
