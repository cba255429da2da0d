//! webhdr - HDR to backward-compatible WebHDR pair converter
//!
//! Takes a linear-light HDR image and emits a viewable LDR JPEG plus a
//! compression-driven map (CDM) PNG that lets capable clients recover
//! the dynamic range.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod convert;

#[derive(Parser)]
#[command(name = "webhdr")]
#[command(author, version, about = "Convert an HDR image to a WebHDR pair")]
#[command(long_about = "
Converts a linear-light HDR image (OpenEXR or Radiance HDR) into a
backward-compatible WebHDR pair:

  <name>_ld.jpg    tone-mapped LDR image, viewable anywhere
  <name>_cdm.png   per-pixel curve codes for dynamic range recovery

Outputs are written next to the input, named after the input file
truncated at its first dot.

Examples:
  webhdr render.exr          # writes render_ld.jpg and render_cdm.png
  webhdr probe.hdr
  RUST_LOG=debug webhdr render.exr
")]
struct Cli {
    /// Input HDR image (.exr, .hdr)
    file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    convert::run(&cli.file)
}
