//! Document-level types.

use super::{Block, Paragraph, Resource, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An assembled report document.
///
/// The body is a single flow of block elements; embedded images live in
/// `resources`, referenced by id from `Block::Image` entries. Resources are
/// kept in a `BTreeMap` so iteration order (and therefore media part
/// numbering in the output package) is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Content blocks in reading order
    pub body: Vec<Block>,

    /// Embedded resources (images), keyed by id
    pub resources: BTreeMap<String, Resource>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            body: Vec::new(),
            resources: BTreeMap::new(),
        }
    }

    /// Add a block to the document body.
    pub fn add_block(&mut self, block: Block) {
        self.body.push(block);
    }

    /// Add a paragraph to the document body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the document body.
    pub fn add_table(&mut self, table: Table) {
        self.body.push(Block::Table(table));
    }

    /// Add an image block referencing an embedded resource.
    ///
    /// Dimensions are in points. When only the width is given the height is
    /// derived from the pixel aspect ratio at render time.
    pub fn add_image(
        &mut self,
        resource_id: impl Into<String>,
        width: Option<f32>,
        height: Option<f32>,
    ) {
        self.body.push(Block::Image {
            resource_id: resource_id.into(),
            width,
            height,
        });
    }

    /// Add a resource to the document.
    pub fn add_resource(&mut self, id: impl Into<String>, resource: Resource) {
        self.resources.insert(id.into(), resource);
    }

    /// Get a resource by id.
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Check if the document has any content blocks.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Get the number of blocks in the body.
    pub fn block_count(&self) -> usize {
        self.body.len()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.body
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => Some(p.plain_text()),
                Block::Table(t) => Some(t.plain_text()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Iterate over tables in the body.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata, mapped to DOCX core and application properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Producing application name
    pub application: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Record creation and modification timestamps.
    ///
    /// Timestamps are never set implicitly; an unstamped document renders
    /// byte-identically across runs.
    pub fn stamp(&mut self, at: DateTime<Utc>) {
        self.created = Some(at);
        self.modified = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.block_count(), 0);
        assert!(doc.resources.is_empty());
    }

    #[test]
    fn test_document_plain_text() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("First"));
        doc.add_paragraph(Paragraph::with_text("Second"));
        assert_eq!(doc.plain_text(), "First\n\nSecond");
    }

    #[test]
    fn test_add_image_block() {
        let mut doc = Document::new();
        doc.add_image("chart1", Some(360.0), None);
        assert_eq!(doc.block_count(), 1);
        assert!(doc.body[0].is_image());
    }

    #[test]
    fn test_metadata_stamp() {
        let mut metadata = Metadata::with_title("Report");
        assert!(metadata.created.is_none());

        let at = Utc::now();
        metadata.stamp(at);
        assert_eq!(metadata.created, Some(at));
        assert_eq!(metadata.modified, Some(at));
    }
}
