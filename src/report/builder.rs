//! Fluent report document builder.

use std::fs;
use std::io;
use std::path::Path;

use crate::csv::DataTable;
use crate::error::{Error, Result};
use crate::image;
use crate::model::{Document, Paragraph, Resource, Table, TableCell, TableRow};

/// Builds a report `Document` block by block.
///
/// Content methods append in call order; `build` hands back the assembled
/// document. Image methods are fallible (the bytes are probed immediately)
/// and chain with `?`.
pub struct ReportBuilder {
    document: Document,
    image_count: usize,
}

impl ReportBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            image_count: 0,
        }
    }

    /// Add the document title and record it in the metadata.
    pub fn title(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.document.metadata.title = Some(text.clone());
        self.document.add_paragraph(Paragraph::title(text));
        self
    }

    /// Add a section heading at the given level (1-6).
    pub fn heading(mut self, text: impl Into<String>, level: u8) -> Self {
        self.document.add_paragraph(Paragraph::heading(text, level));
        self
    }

    /// Add a body paragraph.
    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.document.add_paragraph(Paragraph::with_text(text));
        self
    }

    /// Add a table copied structurally from a loaded `DataTable`.
    ///
    /// One header row carries the column names in order (bold); every data
    /// row follows in order with each cell's text verbatim. Nothing is
    /// reordered, filtered or reformatted.
    pub fn data_table(mut self, table: &DataTable) -> Self {
        let mut model = Table::with_header(1);
        model.add_row(TableRow::header(
            table
                .columns()
                .iter()
                .map(|name| TableCell::bold(name.as_str()))
                .collect(),
        ));
        for row in table.rows() {
            model.add_row(TableRow::from_strings(row.iter().map(String::as_str)));
        }
        self.document.add_table(model);
        self
    }

    /// Embed an image from a file and append it at the given width.
    ///
    /// A missing file maps to `Error::ImageNotFound`; bytes that are not a
    /// supported raster format map to `Error::UnsupportedImage`.
    pub fn image_file(self, path: impl AsRef<Path>, width: Option<f32>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::ImageNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        self.image_bytes(data, width)
    }

    /// Embed an image from raw bytes and append it at the given width.
    ///
    /// Height is left to the renderer, which scales by the probed pixel
    /// aspect ratio.
    pub fn image_bytes(mut self, data: Vec<u8>, width: Option<f32>) -> Result<Self> {
        let info = image::probe_bytes(&data)?;
        self.image_count += 1;
        let id = format!("image{}", self.image_count);
        log::debug!(
            "embedding {} {}x{} as {}",
            info.format,
            info.width,
            info.height,
            id
        );
        self.document.add_resource(id.clone(), Resource::new(data, info));
        self.document.add_image(id, width, None);
        Ok(self)
    }

    /// Finish and return the assembled document.
    pub fn build(self) -> Document {
        self.document
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, InlineContent};

    fn sample_table() -> DataTable {
        DataTable::new(
            vec!["variable".into(), "coef".into(), "p_value".into()],
            vec![
                vec!["age".into(), "1.05".into(), "0.02".into()],
                vec!["sex".into(), "0.88".into(), "0.04".into()],
            ],
        )
        .unwrap()
    }

    fn fake_png() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"\x89PNG\r\n\x1a\n");
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&320u32.to_be_bytes());
        data.extend_from_slice(&240u32.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data.extend_from_slice(&[0; 4]);
        data
    }

    #[test]
    fn test_structural_copy() {
        let table = sample_table();
        let doc = ReportBuilder::new().data_table(&table).build();

        let model = doc.tables().next().unwrap();
        assert_eq!(model.row_count(), 3);
        assert_eq!(model.header_rows, 1);

        let header = &model.rows[0];
        assert!(header.is_header);
        let names: Vec<String> = header.cells.iter().map(|c| c.plain_text()).collect();
        assert_eq!(names, ["variable", "coef", "p_value"]);

        let body: Vec<Vec<String>> = model
            .body()
            .iter()
            .map(|r| r.cells.iter().map(|c| c.plain_text()).collect())
            .collect();
        assert_eq!(body[0], ["age", "1.05", "0.02"]);
        assert_eq!(body[1], ["sex", "0.88", "0.04"]);
    }

    #[test]
    fn test_header_cells_bold() {
        let doc = ReportBuilder::new().data_table(&sample_table()).build();
        let model = doc.tables().next().unwrap();
        for cell in &model.rows[0].cells {
            let p = &cell.content[0];
            match &p.content[0] {
                InlineContent::Text(run) => assert!(run.style.bold),
                other => panic!("expected text run, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_header_only_data_table() {
        let table = DataTable::new(vec!["variable".into()], Vec::new()).unwrap();
        let doc = ReportBuilder::new().data_table(&table).build();
        let model = doc.tables().next().unwrap();
        assert_eq!(model.row_count(), 1);
        assert!(model.body().is_empty());
    }

    #[test]
    fn test_title_sets_metadata() {
        let doc = ReportBuilder::new().title("Survival Report").build();
        assert_eq!(doc.metadata.title.as_deref(), Some("Survival Report"));
        match &doc.body[0] {
            Block::Paragraph(p) => assert_eq!(p.heading_level(), Some(0)),
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_image_bytes_registers_resource() {
        let doc = ReportBuilder::new()
            .image_bytes(fake_png(), Some(360.0))
            .unwrap()
            .build();

        assert!(doc.get_resource("image1").is_some());
        match &doc.body[0] {
            Block::Image { resource_id, width, height } => {
                assert_eq!(resource_id, "image1");
                assert_eq!(*width, Some(360.0));
                assert_eq!(*height, None);
            }
            other => panic!("expected image block, got {:?}", other),
        }
    }

    #[test]
    fn test_image_file_missing() {
        let result = ReportBuilder::new().image_file("no/such/survival_curve.png", None);
        assert!(matches!(result, Err(Error::ImageNotFound(_))));
    }

    #[test]
    fn test_unsupported_image_bytes() {
        let result = ReportBuilder::new().image_bytes(b"not an image".to_vec(), None);
        assert!(matches!(result, Err(Error::UnsupportedImage(_))));
    }
}
