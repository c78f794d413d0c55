//! Block-level content types.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A block element in the document body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// An embedded image reference
    Image {
        /// Resource id for the image data
        resource_id: String,
        /// Display width in points
        width: Option<f32>,
        /// Display height in points; derived from the pixel aspect ratio
        /// when absent
        height: Option<f32>,
    },
}

impl Block {
    /// Create an image block with natural size.
    pub fn image(resource_id: impl Into<String>) -> Self {
        Block::Image {
            resource_id: resource_id.into(),
            width: None,
            height: None,
        }
    }

    /// Create an image block at a fixed display width.
    pub fn image_with_width(resource_id: impl Into<String>, width: f32) -> Self {
        Block::Image {
            resource_id: resource_id.into(),
            width: Some(width),
            height: None,
        }
    }

    /// Create an image block with explicit dimensions.
    pub fn image_with_size(resource_id: impl Into<String>, width: f32, height: f32) -> Self {
        Block::Image {
            resource_id: resource_id.into(),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_variants() {
        let img = Block::image("img1");
        assert!(img.is_image());
        assert!(!img.is_paragraph());

        let p = Block::Paragraph(Paragraph::with_text("text"));
        assert!(p.is_paragraph());
        assert!(!p.is_table());
    }

    #[test]
    fn test_image_with_width() {
        match Block::image_with_width("chart", 360.0) {
            Block::Image { width, height, .. } => {
                assert_eq!(width, Some(360.0));
                assert_eq!(height, None);
            }
            _ => panic!("expected image block"),
        }
    }
}
