//! Document model types for report content representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! table loading and document rendering. The model is output-agnostic: the
//! same document can be rendered to DOCX or dumped as JSON.

mod block;
mod document;
mod paragraph;
mod resource;
mod table;

pub use block::Block;
pub use document::{Document, Metadata};
pub use paragraph::{Alignment, InlineContent, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use resource::Resource;
pub use table::{Table, TableCell, TableRow};
