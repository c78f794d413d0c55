//! OPC (ZIP) package writer for the DOCX container.
//!
//! Emits local file headers, a central directory and the end-of-central-
//! directory record, in the order parts were added. Entry timestamps are
//! pinned to the DOS epoch so identical parts always produce an identical
//! archive.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};

use crate::error::{Error, Result};

/// Local file header signature (PK\x03\x04).
const LOCAL_HEADER_SIGNATURE: u32 = 0x04034b50;
/// Central directory entry signature (PK\x01\x02).
const CENTRAL_HEADER_SIGNATURE: u32 = 0x02014b50;
/// End of central directory signature (PK\x05\x06).
const EOCD_SIGNATURE: u32 = 0x06054b50;

/// ZIP version 2.0: deflate support.
const ZIP_VERSION: u16 = 20;
/// Fixed DOS mod time, 00:00:00.
const DOS_TIME: u16 = 0x0000;
/// Fixed DOS mod date, 1980-01-01.
const DOS_DATE: u16 = 0x0021;

/// How a part's bytes are stored in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Stored verbatim (method 0), for already-compressed media
    Stored,
    /// Raw deflate (method 8), for XML parts
    Deflated,
}

impl CompressionMethod {
    fn code(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflated => 8,
        }
    }
}

struct PartEntry {
    name: String,
    data: Vec<u8>,
    method: CompressionMethod,
}

/// Accumulates package parts and serializes the archive.
pub struct PackageWriter {
    parts: Vec<PartEntry>,
}

impl PackageWriter {
    /// Create an empty package.
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Stage a part. Parts are written in the order they are added.
    pub fn add_part(&mut self, name: impl Into<String>, data: Vec<u8>, method: CompressionMethod) {
        self.parts.push(PartEntry {
            name: name.into(),
            data,
            method,
        });
    }

    /// Number of staged parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Serialize the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let entries = u16::try_from(self.parts.len())
            .map_err(|_| Error::Render("too many package parts".to_string()))?;

        let mut archive = Vec::new();
        let mut directory = Vec::new();

        for part in &self.parts {
            let offset = size_u32(archive.len(), &part.name)?;

            let mut crc = Crc::new();
            crc.update(&part.data);
            let checksum = crc.sum();

            let compressed = match part.method {
                CompressionMethod::Stored => None,
                CompressionMethod::Deflated => {
                    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(&part.data)?;
                    Some(encoder.finish()?)
                }
            };
            let payload = compressed.as_deref().unwrap_or(&part.data);

            let compressed_size = size_u32(payload.len(), &part.name)?;
            let uncompressed_size = size_u32(part.data.len(), &part.name)?;
            let name = part.name.as_bytes();
            let name_len = u16::try_from(name.len())
                .map_err(|_| Error::Render(format!("part name too long: {}", part.name)))?;

            // Local file header
            write_u32(&mut archive, LOCAL_HEADER_SIGNATURE);
            write_u16(&mut archive, ZIP_VERSION);
            write_u16(&mut archive, 0); // general purpose flags
            write_u16(&mut archive, part.method.code());
            write_u16(&mut archive, DOS_TIME);
            write_u16(&mut archive, DOS_DATE);
            write_u32(&mut archive, checksum);
            write_u32(&mut archive, compressed_size);
            write_u32(&mut archive, uncompressed_size);
            write_u16(&mut archive, name_len);
            write_u16(&mut archive, 0); // extra field length
            archive.extend_from_slice(name);
            archive.extend_from_slice(payload);

            // Central directory entry
            write_u32(&mut directory, CENTRAL_HEADER_SIGNATURE);
            write_u16(&mut directory, ZIP_VERSION); // version made by
            write_u16(&mut directory, ZIP_VERSION); // version needed
            write_u16(&mut directory, 0); // general purpose flags
            write_u16(&mut directory, part.method.code());
            write_u16(&mut directory, DOS_TIME);
            write_u16(&mut directory, DOS_DATE);
            write_u32(&mut directory, checksum);
            write_u32(&mut directory, compressed_size);
            write_u32(&mut directory, uncompressed_size);
            write_u16(&mut directory, name_len);
            write_u16(&mut directory, 0); // extra field length
            write_u16(&mut directory, 0); // comment length
            write_u16(&mut directory, 0); // disk number start
            write_u16(&mut directory, 0); // internal attributes
            write_u32(&mut directory, 0); // external attributes
            write_u32(&mut directory, offset);
            directory.extend_from_slice(name);
        }

        let directory_offset = size_u32(archive.len(), "central directory")?;
        let directory_size = size_u32(directory.len(), "central directory")?;
        archive.extend_from_slice(&directory);

        // End of central directory
        write_u32(&mut archive, EOCD_SIGNATURE);
        write_u16(&mut archive, 0); // disk number
        write_u16(&mut archive, 0); // directory start disk
        write_u16(&mut archive, entries);
        write_u16(&mut archive, entries);
        write_u32(&mut archive, directory_size);
        write_u32(&mut archive, directory_offset);
        write_u16(&mut archive, 0); // comment length

        Ok(archive)
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn size_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::Render(format!("{} exceeds ZIP size limits", what)))
}
