//! # webhdr-io
//!
//! Image I/O for WebHDR conversion.
//!
//! Input side: linear-light HDR images, auto-detected by magic bytes with
//! an extension fallback:
//!
//! - **EXR** - OpenEXR, the industry standard for HDR/linear workflow
//! - **HDR** - Radiance RGBE
//!
//! Output side: the two halves of a WebHDR pair, written by
//! [`write_ldr`] (8-bit RGB JPEG, quality 90, progressive, optimized
//! Huffman tables) and [`write_cdm`] (8-bit grayscale PNG, lossless).
//! [`OutputPaths`] derives the two output file names from the input path.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use webhdr_io::{read, write_cdm, write_ldr, OutputPaths};
//!
//! let image = read("input.exr")?;
//! let paths = OutputPaths::for_input("input.exr".as_ref());
//! // ... tone map ...
//! write_ldr(&paths.ldr, &webhdr.ldr)?;
//! write_cdm(&paths.cdm, &webhdr.cdm)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
mod paths;

pub mod exr;
pub mod hdr;
pub mod jpeg;
pub mod png;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use jpeg::write as write_ldr;
pub use paths::OutputPaths;
pub use png::write as write_cdm;

use std::path::Path;
use tracing::debug;
use webhdr_core::RgbImage;

/// Reads an HDR image from a file, auto-detecting the format.
///
/// The format is detected by magic bytes, falling back to the file
/// extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is not a
/// supported HDR input, or the file is corrupted.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<RgbImage> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "reading HDR input");

    match format {
        Format::Exr => exr::read(path),
        Format::Hdr => hdr::read(path),
        Format::Unknown => Err(IoError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}
