//! The conversion pipeline: read, partition, tone map, write the pair.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};
use webhdr_io::OutputPaths;
use webhdr_ops::{bands, luminance, tonemap};

/// Runs a full HDR to WebHDR pair conversion.
pub fn run(input: &Path) -> Result<()> {
    info!(input = %input.display(), "converting to WebHDR pair");

    let image = webhdr_io::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    debug!(
        width = image.width(),
        height = image.height(),
        "loaded HDR input"
    );

    let lum = luminance::luminance(&image);
    let partition = bands::partition(&lum)
        .with_context(|| format!("Failed to partition {}", input.display()))?;
    debug!(bands = partition.band_count(), "luminance bands merged");

    let pair = tonemap::tone_map(&image, &partition).context("Tone mapping failed")?;

    let paths = OutputPaths::for_input(input);
    webhdr_io::write_ldr(&paths.ldr, &pair.ldr)
        .with_context(|| format!("Failed to write {}", paths.ldr.display()))?;
    webhdr_io::write_cdm(&paths.cdm, &pair.cdm)
        .with_context(|| format!("Failed to write {}", paths.cdm.display()))?;

    info!(
        ldr = %paths.ldr.display(),
        cdm = %paths.cdm.display(),
        "wrote WebHDR pair"
    );

    Ok(())
}
