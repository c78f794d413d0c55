//! Rendering module for converting documents to output formats.

mod docx;
mod json;
mod options;
mod package;

pub use docx::{to_docx, write_docx, DocxRenderer};
pub use json::{to_json, JsonFormat};
pub use options::{PageSize, RenderOptions};
