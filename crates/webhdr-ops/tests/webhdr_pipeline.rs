//! End-to-end tests for the luminance -> partition -> tone-map pipeline.

use approx::assert_relative_eq;
use webhdr_core::RgbImage;
use webhdr_ops::bands::{self, MERGE_THRESHOLD};
use webhdr_ops::{luminance::luminance, tonemap::tone_map, OpsError};

fn convert(image: &RgbImage) -> webhdr_ops::WebHdr {
    let lum = luminance(image);
    let partition = bands::partition(&lum).expect("partition failed");
    tone_map(image, &partition).expect("tone map failed")
}

#[test]
fn constant_white_image_yields_single_flat_band() {
    let image = RgbImage::filled(4, 4, [1.0, 1.0, 1.0]);

    let lum = luminance(&image);
    let partition = bands::partition(&lum).unwrap();
    assert_eq!(partition.band_count(), 1);

    let webhdr = tone_map(&image, &partition).unwrap();

    let code = webhdr.cdm.data()[0];
    assert!(webhdr.cdm.data().iter().all(|&c| c == code));

    let ld = webhdr.ldr.data()[0];
    for &v in webhdr.ldr.data() {
        assert_relative_eq!(v, ld);
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn two_decades_apart_stay_two_bands() {
    // Two regions whose luminance differs by exactly 2.0 log10 units must
    // not merge (threshold is 1.0) and must yield two distinct CDM codes.
    let mut image = RgbImage::filled(4, 4, [1.0, 1.0, 1.0]);
    for y in 2..4 {
        for x in 0..4 {
            image.set_pixel(x, y, [100.0, 100.0, 100.0]);
        }
    }

    let partition = bands::partition(&luminance(&image)).unwrap();
    assert_eq!(partition.band_count(), 2);

    let labels = partition.distinct_labels();
    let gap = partition.band_mean(labels[1]).unwrap() - partition.band_mean(labels[0]).unwrap();
    assert!(gap >= MERGE_THRESHOLD);
    assert_relative_eq!(gap, 2.0, epsilon = 1e-5);

    let webhdr = tone_map(&image, &partition).unwrap();
    let mut codes: Vec<u8> = webhdr.cdm.data().to_vec();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), 2);
}

#[test]
fn zero_valued_pixel_is_a_fatal_input() {
    let mut image = RgbImage::filled(4, 4, [1.0, 1.0, 1.0]);
    image.set_pixel(1, 2, [0.0, 0.0, 0.0]);

    let err = bands::partition(&luminance(&image)).unwrap_err();
    assert!(matches!(err, OpsError::NonFiniteLogLuminance { count: 1 }));
}

#[test]
fn outputs_stay_in_declared_ranges() {
    // A wide sweep over eleven decades of radiance.
    let mut image = RgbImage::new(11, 3);
    for y in 0..3 {
        for x in 0..11 {
            let v = 10.0f32.powi(x as i32 - 5) * (1.0 + y as f32 * 0.17);
            image.set_pixel(x, y, [v, v * 0.8, v * 1.3]);
        }
    }

    let webhdr = convert(&image);
    for &v in webhdr.ldr.data() {
        assert!((0.0..=1.0).contains(&v), "LDR sample {v} out of [0, 1]");
    }
    // CDM samples are u8, in [0, 255] by construction; check both outputs
    // cover the full image.
    assert_eq!(webhdr.cdm.pixel_count(), 33);
    assert_eq!(webhdr.ldr.pixel_count(), 33);
}

#[test]
fn partition_is_stable_and_exhaustive() {
    let mut image = RgbImage::new(6, 6);
    for y in 0..6 {
        for x in 0..6 {
            let v = 0.01 * 1.9f32.powi((x + y) as i32);
            image.set_pixel(x, y, [v, v, v]);
        }
    }

    let partition = bands::partition(&luminance(&image)).unwrap();
    assert!(partition.is_stable());

    // Every pixel carries a surviving label.
    let distinct = partition.distinct_labels();
    for label in partition.labels().data() {
        assert!(distinct.contains(label));
    }

    // Adjacent band means are separated by at least the threshold.
    for pair in distinct.windows(2) {
        let gap = partition.band_mean(pair[1]).unwrap() - partition.band_mean(pair[0]).unwrap();
        assert!(gap >= MERGE_THRESHOLD);
    }
}

#[test]
fn cdm_and_ldr_derive_from_the_same_partition() {
    let mut image = RgbImage::filled(8, 1, [0.05, 0.05, 0.05]);
    for x in 4..8 {
        image.set_pixel(x, 0, [50.0, 50.0, 50.0]);
    }

    let lum = luminance(&image);
    let partition = bands::partition(&lum).unwrap();
    let webhdr = tone_map(&image, &partition).unwrap();

    // Pixels sharing a band label share a CDM code and, for identical
    // radiance, identical LDR values.
    let labels = partition.labels();
    for x in 1..4 {
        assert_eq!(webhdr.cdm.pixel(x, 0), webhdr.cdm.pixel(0, 0));
        assert_eq!(labels.pixel(x, 0), labels.pixel(0, 0));
        assert_eq!(webhdr.ldr.pixel(x, 0), webhdr.ldr.pixel(0, 0));
    }
    for x in 5..8 {
        assert_eq!(webhdr.cdm.pixel(x, 0), webhdr.cdm.pixel(4, 0));
    }
    assert_ne!(webhdr.cdm.pixel(0, 0), webhdr.cdm.pixel(4, 0));
}
