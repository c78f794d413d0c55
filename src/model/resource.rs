//! Resource types for embedded content.

use crate::image::ImageInfo;
use serde::{Deserialize, Serialize};

/// An embedded image resource.
///
/// Raw bytes are kept for packaging but skipped when the model is
/// serialized; a JSON dump carries only the probed facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Raw image file bytes
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Probed format and pixel dimensions
    pub info: ImageInfo,
}

impl Resource {
    /// Create a new resource from bytes and probed info.
    pub fn new(data: Vec<u8>, info: ImageInfo) -> Self {
        Self { data, info }
    }

    /// Get the size of the resource data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME content type of the image.
    pub fn content_type(&self) -> &'static str {
        self.info.format.content_type()
    }

    /// File extension for the media part, without the dot.
    pub fn extension(&self) -> &'static str {
        self.info.format.extension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageFormat;

    #[test]
    fn test_resource_facts() {
        let info = ImageInfo {
            format: ImageFormat::Png,
            width: 640,
            height: 480,
        };
        let res = Resource::new(vec![1, 2, 3], info);
        assert_eq!(res.size(), 3);
        assert_eq!(res.content_type(), "image/png");
        assert_eq!(res.extension(), "png");
    }

    #[test]
    fn test_serialize_skips_data() {
        let info = ImageInfo {
            format: ImageFormat::Jpeg,
            width: 10,
            height: 20,
        };
        let res = Resource::new(vec![0xFF; 64], info);
        let json = serde_json::to_string(&res).unwrap();
        assert!(!json.contains("data"));
        assert!(json.contains("jpeg"));
    }
}
