//! Input format detection.
//!
//! Detects the supported HDR input formats from magic bytes, with a file
//! extension fallback.

use crate::IoResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Supported HDR input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// OpenEXR format.
    Exr,
    /// Radiance HDR (RGBE) format.
    Hdr,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from a file path (magic bytes, then extension).
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();

        if let Ok(format) = Self::from_magic_bytes(path) {
            if format != Format::Unknown {
                return Ok(format);
            }
        }

        Ok(Self::from_extension(path))
    }

    /// Detects format from the file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("exr") => Format::Exr,
            Some("hdr") | Some("pic") | Some("rgbe") => Format::Hdr,
            _ => Format::Unknown,
        }
    }

    /// Detects format from the file's leading magic bytes.
    pub fn from_magic_bytes<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; 4];
        let bytes_read = file.read(&mut header)?;
        Ok(Self::from_bytes(&header[..bytes_read]))
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // EXR: 0x76 0x2f 0x31 0x01
        if bytes.len() >= 4 && bytes[0..4] == [0x76, 0x2f, 0x31, 0x01] {
            return Format::Exr;
        }

        // Radiance HDR: "#?"
        if bytes.len() >= 2 && bytes[0..2] == [b'#', b'?'] {
            return Format::Hdr;
        }

        Format::Unknown
    }
}
