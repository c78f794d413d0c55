//! # statdoc
//!
//! Statistical report generation library for Rust.
//!
//! This library reads a regression summary table from CSV, pairs it with a
//! pre-rendered chart image, and assembles a formatted DOCX report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use statdoc::{load_table, report, render};
//!
//! fn main() -> statdoc::Result<()> {
//!     // Load the model summary table
//!     let table = load_table("cox_summary.csv")?;
//!
//!     // Assemble the report document
//!     let options = report::ReportOptions::default();
//!     let doc = report::compose(&table, "survival_curve.png", &options)?;
//!
//!     // Write it as DOCX
//!     render::write_docx(&doc, &render::RenderOptions::default(), "report.docx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Strict CSV loading**: RFC 4180 quoting, duplicate and ragged row checks
//! - **Structural copy**: the summary table lands in the report cell for cell
//! - **Embedded charts**: PNG, JPEG, GIF, BMP images placed at a fixed width
//! - **Deterministic output**: the same inputs produce byte-identical files
//! - **JSON dumps**: inspect the assembled document structure

pub mod csv;
pub mod error;
pub mod image;
pub mod model;
pub mod render;
pub mod report;

// Re-export commonly used types
pub use csv::{CsvOptions, CsvReader, DataTable};
pub use error::{Error, Result};
pub use image::{ImageFormat, ImageInfo};
pub use model::{
    Alignment, Block, Document, InlineContent, Metadata, Paragraph, ParagraphStyle, Resource,
    Table, TableCell, TableRow, TextRun, TextStyle,
};
pub use report::{ReportBuilder, ReportOptions};
pub use render::{JsonFormat, PageSize, RenderOptions};

use std::io::Read;
use std::path::Path;

/// Load a CSV file into a table.
///
/// # Arguments
///
/// * `path` - Path to the CSV file
///
/// # Returns
///
/// A `Result` containing the loaded `DataTable` or an error.
///
/// # Example
///
/// ```no_run
/// use statdoc::load_table;
///
/// let table = load_table("cox_summary.csv").unwrap();
/// println!("Rows: {}", table.row_count());
/// ```
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<DataTable> {
    CsvReader::open(path)?.read()
}

/// Load a CSV file with custom options.
///
/// # Example
///
/// ```no_run
/// use statdoc::{load_table_with_options, CsvOptions};
///
/// let options = CsvOptions::new().with_delimiter(b';').trimmed();
/// let table = load_table_with_options("summary.csv", options).unwrap();
/// ```
pub fn load_table_with_options<P: AsRef<Path>>(path: P, options: CsvOptions) -> Result<DataTable> {
    CsvReader::open_with_options(path, options)?.read()
}

/// Load a table from CSV bytes.
///
/// # Example
///
/// ```
/// use statdoc::load_table_bytes;
///
/// let table = load_table_bytes(b"variable,coef\nage,1.05\n".to_vec()).unwrap();
/// assert_eq!(table.row_count(), 1);
/// ```
pub fn load_table_bytes(data: impl Into<Vec<u8>>) -> Result<DataTable> {
    CsvReader::from_bytes(data).read()
}

/// Load a table from a reader.
///
/// # Example
///
/// ```no_run
/// use statdoc::load_table_reader;
/// use std::fs::File;
///
/// let file = File::open("cox_summary.csv").unwrap();
/// let table = load_table_reader(file).unwrap();
/// ```
pub fn load_table_reader<R: Read>(reader: R) -> Result<DataTable> {
    CsvReader::from_reader(reader)?.read()
}

/// Generate the report DOCX from a CSV file and a chart image.
///
/// Runs the whole pipeline with default options. On any failure no output
/// file is written.
///
/// # Example
///
/// ```no_run
/// use statdoc::generate;
///
/// generate("cox_summary.csv", "survival_curve.png", "report.docx").unwrap();
/// ```
pub fn generate<P1, P2, P3>(csv_path: P1, image_path: P2, output_path: P3) -> Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    generate_with_options(
        csv_path,
        image_path,
        output_path,
        &ReportOptions::default(),
        &RenderOptions::default(),
    )
}

/// Generate the report DOCX with custom report and render options.
///
/// # Example
///
/// ```no_run
/// use statdoc::{generate_with_options, RenderOptions, ReportOptions};
///
/// let report = ReportOptions::new().with_title("Oncology Outcomes");
/// let render = RenderOptions::new().a4();
/// generate_with_options("summary.csv", "curve.png", "report.docx", &report, &render).unwrap();
/// ```
pub fn generate_with_options<P1, P2, P3>(
    csv_path: P1,
    image_path: P2,
    output_path: P3,
    report_options: &ReportOptions,
    render_options: &RenderOptions,
) -> Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let table = load_table(csv_path)?;
    let doc = report::compose(&table, image_path, report_options)?;
    render::write_docx(&doc, render_options, output_path)
}

/// Render the report to DOCX bytes without touching the filesystem for
/// output.
///
/// # Example
///
/// ```no_run
/// use statdoc::to_docx;
///
/// let bytes = to_docx("cox_summary.csv", "survival_curve.png").unwrap();
/// assert_eq!(&bytes[..2], b"PK");
/// ```
pub fn to_docx<P1: AsRef<Path>, P2: AsRef<Path>>(csv_path: P1, image_path: P2) -> Result<Vec<u8>> {
    let table = load_table(csv_path)?;
    let doc = report::compose(&table, image_path, &ReportOptions::default())?;
    render::to_docx(&doc, &RenderOptions::default())
}

/// Render the assembled report as JSON for inspection.
///
/// # Example
///
/// ```no_run
/// use statdoc::{to_json, JsonFormat};
///
/// let json = to_json("cox_summary.csv", "survival_curve.png", JsonFormat::Pretty).unwrap();
/// std::fs::write("report.json", json).unwrap();
/// ```
pub fn to_json<P1: AsRef<Path>, P2: AsRef<Path>>(
    csv_path: P1,
    image_path: P2,
    format: JsonFormat,
) -> Result<String> {
    let table = load_table(csv_path)?;
    let doc = report::compose(&table, image_path, &ReportOptions::default())?;
    render::to_json(&doc, format)
}

/// Builder for loading, assembling and rendering report documents.
///
/// # Example
///
/// ```no_run
/// use statdoc::Statdoc;
///
/// Statdoc::new()
///     .with_title("Oncology Outcomes")
///     .with_image_width(288.0)
///     .a4()
///     .compose("summary.csv", "curve.png")?
///     .write("report.docx")?;
/// # Ok::<(), statdoc::Error>(())
/// ```
pub struct Statdoc {
    csv_options: CsvOptions,
    report_options: ReportOptions,
    render_options: RenderOptions,
    stamp: bool,
}

impl Statdoc {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            csv_options: CsvOptions::default(),
            report_options: ReportOptions::default(),
            render_options: RenderOptions::default(),
            stamp: false,
        }
    }

    /// Set the CSV field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_options = self.csv_options.with_delimiter(delimiter);
        self
    }

    /// Trim whitespace around CSV fields.
    pub fn trimmed(mut self) -> Self {
        self.csv_options = self.csv_options.trimmed();
        self
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.report_options = self.report_options.with_title(title);
        self
    }

    /// Set the table section heading.
    pub fn with_table_heading(mut self, heading: impl Into<String>) -> Self {
        self.report_options = self.report_options.with_table_heading(heading);
        self
    }

    /// Set the table caption paragraph.
    pub fn with_table_caption(mut self, caption: impl Into<String>) -> Self {
        self.report_options = self.report_options.with_table_caption(caption);
        self
    }

    /// Set the chart section heading.
    pub fn with_chart_heading(mut self, heading: impl Into<String>) -> Self {
        self.report_options = self.report_options.with_chart_heading(heading);
        self
    }

    /// Set the chart display width in points.
    pub fn with_image_width(mut self, points: f32) -> Self {
        self.report_options = self.report_options.with_image_width(points);
        self
    }

    /// Set the output page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.render_options = self.render_options.with_page_size(size);
        self
    }

    /// Use A4 pages.
    pub fn a4(mut self) -> Self {
        self.render_options = self.render_options.a4();
        self
    }

    /// Record the generation time in the document properties.
    ///
    /// Stamped output embeds the current time and is no longer
    /// byte-reproducible across runs.
    pub fn stamped(mut self) -> Self {
        self.stamp = true;
        self
    }

    /// Load the table and image from files and assemble the report.
    pub fn compose<P1, P2>(self, csv_path: P1, image_path: P2) -> Result<StatdocResult>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let table = CsvReader::open_with_options(csv_path, self.csv_options)?.read()?;
        let mut document = report::compose(&table, image_path, &self.report_options)?;
        if self.stamp {
            document.metadata.stamp(chrono::Utc::now());
        }
        Ok(StatdocResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Assemble the report from in-memory CSV and image bytes.
    pub fn compose_bytes(self, csv: impl Into<Vec<u8>>, image: Vec<u8>) -> Result<StatdocResult> {
        let table = CsvReader::from_bytes_with_options(csv, self.csv_options).read()?;
        let mut document = report::compose_bytes(&table, image, &self.report_options)?;
        if self.stamp {
            document.metadata.stamp(chrono::Utc::now());
        }
        Ok(StatdocResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Statdoc {
    fn default() -> Self {
        Self::new()
    }
}

/// An assembled report, ready to render.
pub struct StatdocResult {
    /// The assembled document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl StatdocResult {
    /// Render to DOCX bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        render::to_docx(&self.document, &self.render_options)
    }

    /// Render and write the DOCX file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        render::write_docx(&self.document, &self.render_options, path)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text of the document body.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
