//! Scalar luminance extraction.
//!
//! Derives a per-pixel luminance field from linear-light RGB using the
//! standard relative-luminance weights. The weights are fixed; the WebHDR
//! band structure is defined against exactly this field.

use webhdr_core::{RgbImage, ScalarMap};

/// Relative luminance weight for the red channel.
pub const LUMA_R: f32 = 0.213;

/// Relative luminance weight for the green channel.
pub const LUMA_G: f32 = 0.715;

/// Relative luminance weight for the blue channel.
pub const LUMA_B: f32 = 0.072;

/// Relative luminance weights as an array [R, G, B].
pub const LUMA: [f32; 3] = [LUMA_R, LUMA_G, LUMA_B];

/// Calculates relative luminance from an RGB triple.
///
/// `Y = 0.213*R + 0.715*G + 0.072*B`
///
/// # Example
///
/// ```
/// use webhdr_ops::luminance::relative_luminance;
/// let y = relative_luminance([0.5, 0.3, 0.2]);
/// // 0.5 * 0.213 + 0.3 * 0.715 + 0.2 * 0.072 = 0.3354
/// assert!((y - 0.3354).abs() < 1e-4);
/// ```
#[inline]
pub fn relative_luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_R + rgb[1] * LUMA_G + rgb[2] * LUMA_B
}

/// Extracts the luminance field from an RGB image.
///
/// The result has the same dimensions as the input, one scalar per pixel.
/// No positivity check happens here; the band partitioner rejects fields
/// whose logarithm is not finite.
pub fn luminance(image: &RgbImage) -> ScalarMap {
    let mut out = ScalarMap::new(image.width(), image.height());
    for (dst, rgb) in out.data_mut().iter_mut().zip(image.data().chunks_exact(3)) {
        *dst = rgb[0] * LUMA_R + rgb[1] * LUMA_G + rgb[2] * LUMA_B;
    }
    out
}
