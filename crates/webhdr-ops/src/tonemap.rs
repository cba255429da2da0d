//! Per-band quantized tone mapping.
//!
//! Each surviving band gets one compression curve derived from its mean
//! log-luminance. The curve parameter is clipped, quantized to an 8-bit
//! code, and the *dequantized* value is what the transfer function applies,
//! so the LDR output stays consistent with what a decoder would later
//! recover from the CDM.
//!
//! The transfer function is a Reinhard-style rational curve over per-channel
//! log10 radiance:
//!
//! ```text
//! ld = (a * log10(v)) / (a * log10(v) + 1)
//! ```
//!
//! Bands with different mean luminance get different steepness `a`, so both
//! very dark and very bright regions keep local contrast after compression
//! to [0, 1].

use crate::bands::BandPartition;
use crate::{OpsError, OpsResult};
use tracing::debug;
use webhdr_core::{CdmMap, RgbImage};

/// Lower clip bound for the raw compression parameter.
const PARAM_MIN: f64 = -8.0;

/// Upper clip bound for the raw compression parameter.
const PARAM_MAX: f64 = 8.0;

/// Compression curve for one band, stored in quantized form.
///
/// The 8-bit code is what the CDM persists; [`strength`](Self::strength)
/// recovers the lossy dequantized parameter the curve actually applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandCurve {
    code: u8,
}

impl BandCurve {
    /// Derives the curve for a band from its mean log-luminance.
    ///
    /// `a = clip(lmean / 4, -8, 8)` is mapped affinely onto [0, 256) and
    /// truncated toward zero. The exact upper boundary (`a == 8` maps to
    /// 256) clamps to 255 so the code always fits the 8-bit CDM sample.
    pub fn from_log_mean(lmean: f64) -> Self {
        let clipped = (lmean / 4.0).clamp(PARAM_MIN, PARAM_MAX);
        let code = (((clipped + 8.0) * 16.0) as u32).min(255) as u8;
        Self { code }
    }

    /// The quantized 8-bit code stored in the CDM.
    #[inline]
    pub fn code(&self) -> u8 {
        self.code
    }

    /// The dequantized compression parameter, `code / 16 - 8`.
    ///
    /// Within 1/16 of the clipped parameter the code was derived from.
    #[inline]
    pub fn strength(&self) -> f32 {
        self.code as f32 / 16.0 - 8.0
    }

    /// Applies the compressive curve to one log10 radiance sample.
    ///
    /// Not guarded against the pole at `a * log_value == -1`; f32 division
    /// yields an infinity there which the final clamp pins to the range
    /// boundary.
    #[inline]
    pub fn apply(&self, log_value: f32) -> f32 {
        let scaled = self.strength() * log_value;
        scaled / (scaled + 1.0)
    }
}

/// The backward-compatible WebHDR pair: viewable LDR image plus CDM.
///
/// Both halves derive from the same final band partition, so a decoder can
/// invert the LDR with the per-pixel parameters the CDM carries.
#[derive(Debug, Clone)]
pub struct WebHdr {
    /// Tone-mapped image, every sample in [0, 1].
    pub ldr: RgbImage,
    /// Per-pixel quantized compression codes.
    pub cdm: CdmMap,
}

/// Tone-maps an HDR image over a stable band partition.
///
/// One [`BandCurve`] is computed per surviving band; the per-pixel
/// application then only reads the fixed curve table, so it runs in
/// parallel across rows when the `parallel` feature is enabled (bands write
/// disjoint pixel sets, and every pixel is written exactly once).
///
/// # Errors
///
/// Returns [`OpsError::SizeMismatch`] when the partition was built for
/// different dimensions.
pub fn tone_map(image: &RgbImage, partition: &BandPartition) -> OpsResult<WebHdr> {
    if image.dimensions() != partition.labels().dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "image is {}x{} but partition is {}x{}",
            image.width(),
            image.height(),
            partition.labels().width(),
            partition.labels().height(),
        )));
    }

    let (width, height) = image.dimensions();
    let mut ldr = RgbImage::new(width, height);
    let mut cdm = CdmMap::new(width, height);

    if image.is_empty() {
        return Ok(WebHdr { ldr, cdm });
    }

    // Curve table, ascending by label so rows can binary-search it.
    let curves: Vec<(i32, BandCurve)> = partition
        .distinct_labels()
        .into_iter()
        .filter_map(|label| {
            let mean = partition.band_mean(label)?;
            let curve = BandCurve::from_log_mean(mean);
            debug!(label, mean, code = curve.code(), "band compression curve");
            Some((label, curve))
        })
        .collect();

    let log_image = image.log10();
    let row = width as usize;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        ldr.data_mut()
            .par_chunks_mut(row * 3)
            .zip(cdm.data_mut().par_chunks_mut(row))
            .zip(partition.labels().data().par_chunks(row))
            .zip(log_image.data().par_chunks(row * 3))
            .for_each(|(((ldr_row, cdm_row), label_row), log_row)| {
                tone_map_row(&curves, label_row, log_row, ldr_row, cdm_row);
            });
    }

    #[cfg(not(feature = "parallel"))]
    {
        let labels = partition.labels();
        for (((ldr_row, cdm_row), label_row), log_row) in ldr
            .data_mut()
            .chunks_mut(row * 3)
            .zip(cdm.data_mut().chunks_mut(row))
            .zip(labels.data().chunks(row))
            .zip(log_image.data().chunks(row * 3))
        {
            tone_map_row(&curves, label_row, log_row, ldr_row, cdm_row);
        }
    }

    ldr.clamp_in_place(0.0, 1.0);

    Ok(WebHdr { ldr, cdm })
}

/// Applies the curve table to one row of pixels.
fn tone_map_row(
    curves: &[(i32, BandCurve)],
    label_row: &[i32],
    log_row: &[f32],
    ldr_row: &mut [f32],
    cdm_row: &mut [u8],
) {
    for (x, label) in label_row.iter().enumerate() {
        // The table holds exactly the partition's labels.
        let Ok(k) = curves.binary_search_by_key(label, |c| c.0) else {
            continue;
        };
        let curve = curves[k].1;
        cdm_row[x] = curve.code();
        let base = x * 3;
        for c in 0..3 {
            ldr_row[base + c] = curve.apply(log_row[base + c]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bands, luminance};
    use approx::assert_relative_eq;
    use webhdr_core::RgbImage;

    #[test]
    fn test_curve_quantization_known_values() {
        // lmean 4 -> a = 1 -> code (1 + 8) * 16 = 144, exact round trip
        let curve = BandCurve::from_log_mean(4.0);
        assert_eq!(curve.code(), 144);
        assert_relative_eq!(curve.strength(), 1.0);

        // lmean 0 -> a = 0 -> code 128
        let curve = BandCurve::from_log_mean(0.0);
        assert_eq!(curve.code(), 128);
        assert_relative_eq!(curve.strength(), 0.0);

        // Deep shadows clip at the lower bound
        let curve = BandCurve::from_log_mean(-100.0);
        assert_eq!(curve.code(), 0);
        assert_relative_eq!(curve.strength(), -8.0);

        // Exact upper boundary clamps into the 8-bit range
        let curve = BandCurve::from_log_mean(100.0);
        assert_eq!(curve.code(), 255);
        assert_relative_eq!(curve.strength(), 7.9375);
    }

    #[test]
    fn test_curve_quantization_error_bound() {
        let mut a = -8.0f64;
        while a <= 8.0 {
            let curve = BandCurve::from_log_mean(a * 4.0);
            let err = (curve.strength() as f64 - a).abs();
            assert!(err <= 1.0 / 16.0 + 1e-9, "a={a}: error {err} > 1/16");
            a += 0.0437;
        }
    }

    #[test]
    fn test_curve_apply() {
        // a = 1, v = 10 -> (1 * 1) / (1 * 1 + 1) = 0.5
        let curve = BandCurve::from_log_mean(4.0);
        assert_relative_eq!(curve.apply(1.0), 0.5);
        assert_relative_eq!(curve.apply(0.0), 0.0);
    }

    #[test]
    fn test_tone_map_constant_image() {
        let image = RgbImage::filled(4, 4, [1.0, 1.0, 1.0]);
        let partition = bands::partition(&luminance::luminance(&image)).unwrap();
        let webhdr = tone_map(&image, &partition).unwrap();

        let first_code = webhdr.cdm.data()[0];
        assert!(webhdr.cdm.data().iter().all(|&c| c == first_code));
        let first_ld = webhdr.ldr.data()[0];
        for &v in webhdr.ldr.data() {
            assert_relative_eq!(v, first_ld);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_tone_map_two_bands_two_codes() {
        let mut image = RgbImage::filled(4, 2, [1.0, 1.0, 1.0]);
        for x in 0..4 {
            image.set_pixel(x, 1, [100.0, 100.0, 100.0]);
        }
        let partition = bands::partition(&luminance::luminance(&image)).unwrap();
        assert_eq!(partition.band_count(), 2);

        let webhdr = tone_map(&image, &partition).unwrap();
        let mut codes: Vec<u8> = webhdr.cdm.data().to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 2);

        // Rows are uniform and match their band
        assert!(webhdr.cdm.row(0).iter().all(|&c| c == webhdr.cdm.data()[0]));
        assert!(webhdr.cdm.row(1).iter().all(|&c| c == webhdr.cdm.row(1)[0]));
    }

    #[test]
    fn test_tone_map_output_in_range() {
        let mut image = RgbImage::new(8, 1);
        for x in 0..8 {
            let v = 10.0f32.powi(x as i32 - 4);
            image.set_pixel(x, 0, [v, v * 0.5, v * 2.0]);
        }
        let partition = bands::partition(&luminance::luminance(&image)).unwrap();
        let webhdr = tone_map(&image, &partition).unwrap();
        for &v in webhdr.ldr.data() {
            assert!((0.0..=1.0).contains(&v), "LDR sample {v} out of range");
        }
    }

    #[test]
    fn test_tone_map_dimension_mismatch() {
        let image = RgbImage::filled(4, 4, [1.0, 1.0, 1.0]);
        let other = RgbImage::filled(2, 2, [1.0, 1.0, 1.0]);
        let partition = bands::partition(&luminance::luminance(&other)).unwrap();
        assert!(matches!(
            tone_map(&image, &partition),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
