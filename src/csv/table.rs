//! Loaded table types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A loaded tabular result: ordered columns plus ordered rows of text cells.
///
/// Rectangularity and column-name uniqueness are enforced at construction;
/// holders of a `DataTable` can rely on every row having exactly
/// `column_count()` cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a table from column names and rows.
    ///
    /// # Errors
    /// `Error::InvalidDocument` when a row's cell count differs from the
    /// column count, or when column names repeat.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::InvalidDocument(format!(
                    "duplicate column name: {:?}",
                    name
                )));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::InvalidDocument(format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows in order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` data rows, or all of them when fewer exist.
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }
}
