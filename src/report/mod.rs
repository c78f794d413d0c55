//! Report assembly module.
//!
//! Takes a loaded `DataTable` and a chart image and assembles the report
//! document: title, table section (heading, caption, table), chart section
//! (heading, embedded image).

mod builder;
mod options;

pub use builder::ReportBuilder;
pub use options::ReportOptions;

use std::path::Path;

use crate::csv::DataTable;
use crate::error::Result;
use crate::model::Document;

/// Assemble the standard report document from a table and a chart image.
///
/// Block order: title, table heading, caption paragraph, table, chart
/// heading, image at `options.image_width`.
pub fn compose(
    table: &DataTable,
    image_path: impl AsRef<Path>,
    options: &ReportOptions,
) -> Result<Document> {
    let builder = ReportBuilder::new()
        .title(options.title.as_str())
        .heading(options.table_heading.as_str(), 1)
        .paragraph(options.table_caption.as_str())
        .data_table(table)
        .heading(options.chart_heading.as_str(), 1)
        .image_file(image_path, Some(options.image_width))?;
    Ok(builder.build())
}

/// Like [`compose`], with the chart image supplied as in-memory bytes.
pub fn compose_bytes(
    table: &DataTable,
    image_data: Vec<u8>,
    options: &ReportOptions,
) -> Result<Document> {
    let builder = ReportBuilder::new()
        .title(options.title.as_str())
        .heading(options.table_heading.as_str(), 1)
        .paragraph(options.table_caption.as_str())
        .data_table(table)
        .heading(options.chart_heading.as_str(), 1)
        .image_bytes(image_data, Some(options.image_width))?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use std::io::Write;

    fn fake_png() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"\x89PNG\r\n\x1a\n");
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&100u32.to_be_bytes());
        data.extend_from_slice(&50u32.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data.extend_from_slice(&[0; 4]);
        data
    }

    #[test]
    fn test_compose_block_order() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("survival_curve.png");
        let mut f = std::fs::File::create(&image_path).unwrap();
        f.write_all(&fake_png()).unwrap();

        let table = DataTable::new(
            vec!["variable".into(), "coef".into()],
            vec![vec!["age".into(), "1.05".into()]],
        )
        .unwrap();

        let doc = compose(&table, &image_path, &ReportOptions::default()).unwrap();
        assert_eq!(doc.block_count(), 6);

        match &doc.body[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.heading_level(), Some(0));
                assert_eq!(p.plain_text(), "Healthcare Survival Analysis Report");
            }
            other => panic!("expected title paragraph, got {:?}", other),
        }
        match &doc.body[1] {
            Block::Paragraph(p) => {
                assert_eq!(p.heading_level(), Some(1));
                assert_eq!(p.plain_text(), "Cox Proportional Hazards Model");
            }
            other => panic!("expected heading, got {:?}", other),
        }
        match &doc.body[2] {
            Block::Paragraph(p) => {
                assert!(p.heading_level().is_none());
                assert_eq!(
                    p.plain_text(),
                    "Summary table of hazard ratios and significance."
                );
            }
            other => panic!("expected caption paragraph, got {:?}", other),
        }
        assert!(doc.body[3].is_table());
        match &doc.body[4] {
            Block::Paragraph(p) => assert_eq!(p.plain_text(), "Kaplan-Meier Curve"),
            other => panic!("expected heading, got {:?}", other),
        }
        match &doc.body[5] {
            Block::Image { width, .. } => assert_eq!(*width, Some(360.0)),
            other => panic!("expected image block, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_bytes_header_only() {
        let table = DataTable::new(vec!["variable".into(), "coef".into()], vec![]).unwrap();
        let doc = compose_bytes(&table, fake_png(), &ReportOptions::default()).unwrap();
        assert_eq!(doc.block_count(), 6);
        assert_eq!(doc.resources.len(), 1);
    }
}
