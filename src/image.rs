//! Raster image format detection and dimension probing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// PNG signature bytes.
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
/// JPEG SOI marker followed by the first marker prefix.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";
const BMP_MAGIC: &[u8] = b"BM";

/// Raster formats accepted for chart embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// File extension used for the media part, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// MIME content type for the format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::Bmp => write!(f, "BMP"),
        }
    }
}

/// Pixel-level facts about an image, read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Detected raster format.
    pub format: ImageFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageInfo {
    /// Aspect ratio as height over width.
    ///
    /// `probe_bytes` rejects zero-sized images, so info obtained from a
    /// probe always divides safely.
    pub fn aspect(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}

/// Detect the raster format from leading magic bytes.
///
/// # Arguments
/// * `data` - Byte slice containing at least the file header
///
/// # Returns
/// * `Some(ImageFormat)` if the magic bytes match a supported format
/// * `None` otherwise
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        Some(ImageFormat::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        Some(ImageFormat::Gif)
    } else if data.starts_with(BMP_MAGIC) {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// Check if bytes look like a supported raster image.
pub fn is_supported_image(data: &[u8]) -> bool {
    detect_format(data).is_some()
}

/// Probe format and pixel dimensions from image bytes.
///
/// Only the header is inspected; pixel data is never decoded.
///
/// # Arguments
/// * `data` - Complete image file contents, or at least its header segments
///
/// # Returns
/// * `Ok(ImageInfo)` with format and nonzero dimensions
/// * `Err(Error::UnsupportedImage)` for unknown, truncated, or zero-sized images
///
/// # Example
/// ```no_run
/// use statdoc::image::probe_bytes;
///
/// let data = std::fs::read("survival_curve.png").unwrap();
/// let info = probe_bytes(&data).unwrap();
/// println!("{} {}x{}", info.format, info.width, info.height);
/// ```
pub fn probe_bytes(data: &[u8]) -> Result<ImageInfo> {
    let format = detect_format(data)
        .ok_or_else(|| Error::UnsupportedImage("unrecognized magic bytes".to_string()))?;

    let dims = match format {
        ImageFormat::Png => parse_png_dimensions(data),
        ImageFormat::Jpeg => parse_jpeg_dimensions(data),
        ImageFormat::Gif => parse_gif_dimensions(data),
        ImageFormat::Bmp => parse_bmp_dimensions(data),
    };

    let (width, height) = dims.ok_or_else(|| {
        Error::UnsupportedImage(format!("truncated or malformed {} header", format))
    })?;

    if width == 0 || height == 0 {
        return Err(Error::UnsupportedImage(format!(
            "{} declares zero pixel dimensions",
            format
        )));
    }

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}

/// Probe format and pixel dimensions from an image file.
///
/// A missing file maps to `Error::ImageNotFound` rather than a bare I/O
/// error, so callers report the chart path that was expected.
pub fn probe_file<P: AsRef<Path>>(path: P) -> Result<ImageInfo> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::ImageNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    probe_bytes(&data)
}

/// PNG: the IHDR chunk is required first, width and height big-endian.
fn parse_png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 || &data[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}

/// JPEG: walk marker segments until a start-of-frame carries the dimensions.
fn parse_jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2; // past SOI
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        // Fill bytes before a marker are legal
        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        if pos >= data.len() {
            return None;
        }
        let marker = data[pos];
        pos += 1;
        match marker {
            // Standalone markers carry no length field
            0x01 | 0xD0..=0xD8 => continue,
            // EOI or scan data reached without a frame header
            0xD9 | 0xDA => return None,
            _ => {}
        }
        if pos + 2 > data.len() {
            return None;
        }
        let len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if len < 2 {
            return None;
        }
        if is_sof_marker(marker) {
            // Segment: length(2) precision(1) height(2) width(2)
            if pos + 7 > data.len() {
                return None;
            }
            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            return Some((width, height));
        }
        pos += len;
    }
    None
}

/// SOF0-SOF15 minus DHT (C4), JPG (C8) and DAC (CC).
fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// GIF: logical screen width and height, little-endian u16 at offset 6.
fn parse_gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 10 {
        return None;
    }
    let width = u16::from_le_bytes([data[6], data[7]]) as u32;
    let height = u16::from_le_bytes([data[8], data[9]]) as u32;
    Some((width, height))
}

/// BMP: dimensions depend on the DIB header variant at offset 14.
fn parse_bmp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 18 {
        return None;
    }
    let header_size = u32::from_le_bytes([data[14], data[15], data[16], data[17]]);
    if header_size == 12 {
        // BITMAPCOREHEADER: u16 fields
        if data.len() < 22 {
            return None;
        }
        let width = u16::from_le_bytes([data[18], data[19]]) as u32;
        let height = u16::from_le_bytes([data[20], data[21]]) as u32;
        Some((width, height))
    } else {
        // BITMAPINFOHEADER and later: i32 fields, height negative when top-down
        if data.len() < 26 {
            return None;
        }
        let width = i32::from_le_bytes([data[18], data[19], data[20], data[21]]);
        let height = i32::from_le_bytes([data[22], data[23], data[24], data[25]]);
        Some((width.unsigned_abs(), height.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(PNG_MAGIC);
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data.extend_from_slice(&[0; 4]);
        data
    }

    #[test]
    fn test_detect_png() {
        assert_eq!(detect_format(&png_bytes(1, 1)), Some(ImageFormat::Png));
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(
            detect_format(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
    }

    #[test]
    fn test_detect_gif_and_bmp() {
        assert_eq!(detect_format(b"GIF89a\x00\x00"), Some(ImageFormat::Gif));
        assert_eq!(detect_format(b"GIF87a\x00\x00"), Some(ImageFormat::Gif));
        assert_eq!(detect_format(b"BMxxxx"), Some(ImageFormat::Bmp));
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_format(b"<!DOCTYPE html>"), None);
        assert!(!is_supported_image(b"plain text"));
    }

    #[test]
    fn test_probe_png_dimensions() {
        let info = probe_bytes(&png_bytes(640, 480)).unwrap();
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 480);
        assert!((info.aspect() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_probe_jpeg_dimensions() {
        let mut data = vec![0xFF, 0xD8]; // SOI
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46]); // APP0
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]); // SOF0, precision
        data.extend_from_slice(&[0x00, 0xF0]); // height 240
        data.extend_from_slice(&[0x01, 0x40]); // width 320
        let info = probe_bytes(&data).unwrap();
        assert_eq!(info.format, ImageFormat::Jpeg);
        assert_eq!(info.width, 320);
        assert_eq!(info.height, 240);
    }

    #[test]
    fn test_probe_gif_dimensions() {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&320u16.to_le_bytes());
        data.extend_from_slice(&240u16.to_le_bytes());
        let info = probe_bytes(&data).unwrap();
        assert_eq!(info.format, ImageFormat::Gif);
        assert_eq!(info.width, 320);
        assert_eq!(info.height, 240);
    }

    #[test]
    fn test_probe_bmp_dimensions() {
        let mut data = b"BM".to_vec();
        data.extend_from_slice(&[0; 12]); // file size, reserved, data offset
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&800i32.to_le_bytes());
        data.extend_from_slice(&(-600i32).to_le_bytes()); // top-down rows
        let info = probe_bytes(&data).unwrap();
        assert_eq!(info.format, ImageFormat::Bmp);
        assert_eq!(info.width, 800);
        assert_eq!(info.height, 600);
    }

    #[test]
    fn test_probe_unknown_rejected() {
        let result = probe_bytes(b"not an image at all");
        assert!(matches!(result, Err(Error::UnsupportedImage(_))));
    }

    #[test]
    fn test_probe_truncated_png() {
        let data = &png_bytes(10, 10)[..16];
        let result = probe_bytes(data);
        assert!(matches!(result, Err(Error::UnsupportedImage(_))));
    }

    #[test]
    fn test_probe_zero_sized_rejected() {
        let result = probe_bytes(&png_bytes(0, 100));
        assert!(matches!(result, Err(Error::UnsupportedImage(_))));
    }

    #[test]
    fn test_probe_missing_file() {
        let result = probe_file("no/such/chart.png");
        assert!(matches!(result, Err(Error::ImageNotFound(_))));
    }
}
