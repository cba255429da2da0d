//! JPEG output support.
//!
//! Writes the LDR half of a WebHDR pair. The encoder settings are fixed:
//! quality 90, progressive scan, optimized Huffman tables.

use crate::{IoError, IoResult};
use std::path::Path;
use webhdr_core::RgbImage;

/// JPEG quality for the LDR output.
pub const LDR_QUALITY: u8 = 90;

/// Writes an LDR image to a JPEG file.
///
/// The input is expected in display range; each channel is clamped to
/// `[0, 1]` and scaled to 8 bits before encoding.
///
/// # Errors
///
/// Returns an error if the image exceeds the 16-bit JPEG dimension
/// limit, encoding fails, or the file cannot be written.
pub fn write<P: AsRef<Path>>(path: P, image: &RgbImage) -> IoResult<()> {
    use jpeg_encoder::{ColorType, Encoder};

    let (width, height) = image.dimensions();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(IoError::EncodeError(format!(
            "image too large for JPEG: {}x{}",
            width, height
        )));
    }

    let pixels: Vec<u8> = image
        .data()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, LDR_QUALITY);
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(&pixels, width as u16, height as u16, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    std::fs::write(path.as_ref(), buffer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_produces_jpeg_file() {
        let width = 16;
        let height = 16;
        let data: Vec<f32> = (0..width * height * 3)
            .map(|i| (i % 256) as f32 / 255.0)
            .collect();
        let image = RgbImage::from_data(width as u32, height as u32, data).unwrap();

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.jpg");
        write(&path, &image).expect("JPEG write failed");

        let bytes = std::fs::read(&path).expect("read back");
        assert!(bytes.len() > 2);
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let image = RgbImage::from_data(2, 1, vec![-0.5, 2.0, 0.5, 1.0, 0.0, 10.0]).unwrap();

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clamped.jpg");
        write(&path, &image).expect("JPEG write failed");
        assert!(path.exists());
    }
}
