//! OpenEXR input support.
//!
//! Reads the first RGBA layer of an EXR file and drops the alpha channel;
//! WebHDR conversion works on linear RGB radiance only.

use crate::{IoError, IoResult};
use std::path::Path;
use webhdr_core::RgbImage;

/// Reads an EXR file from the given path.
///
/// Returns the first layer's pixels as linear RGB f32. The alpha channel,
/// if present, is discarded.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<RgbImage> {
    use exr::prelude::*;

    let path = path.as_ref();

    let image = read_first_rgba_layer_from_file(
        path,
        |resolution, _| {
            let width = resolution.width();
            let size = width * resolution.height();
            (width, vec![(0.0f32, 0.0f32, 0.0f32); size])
        },
        |(width, buffer), position, (r, g, b, _a): (f32, f32, f32, f32)| {
            let idx = position.y() * *width + position.x();
            if idx < buffer.len() {
                buffer[idx] = (r, g, b);
            }
        },
    )
    .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let width = image.layer_data.size.width() as u32;
    let height = image.layer_data.size.height() as u32;
    let (_, ref pixel_data) = image.layer_data.channel_data.pixels;

    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for &(r, g, b) in pixel_data {
        data.push(r);
        data.push(g);
        data.push(b);
    }

    RgbImage::from_data(width, height, data)
        .map_err(|e| IoError::DecodeError(e.to_string()))
}
