//! PNG output support.
//!
//! Writes the CDM half of a WebHDR pair as an 8-bit grayscale PNG. The
//! map carries per-pixel curve codes, so the format must be lossless.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use webhdr_core::CdmMap;

/// Writes a CDM to an 8-bit grayscale PNG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn write<P: AsRef<Path>>(path: P, map: &CdmMap) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, map.width(), map.height());
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    png_writer
        .write_image_data(map.data())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}
