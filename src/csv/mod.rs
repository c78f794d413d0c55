//! Delimited table loading module.

mod options;
mod reader;
mod table;

pub use options::CsvOptions;
pub use reader::CsvReader;
pub use table::DataTable;
