//! # webhdr-ops
//!
//! Tone-mapping operations for WebHDR conversion.
//!
//! This crate implements the piecewise logarithmic compression scheme that
//! turns a linear-light HDR image into a display-ready LDR image plus a
//! compression-driven map (CDM):
//!
//! - [`luminance`] - scalar luminance extraction with fixed channel weights
//! - [`bands`] - log-luminance band partitioning with iterative merging of
//!   under-populated bands
//! - [`tonemap`] - per-band quantized compression curve application
//!
//! # Pipeline
//!
//! ```rust
//! use webhdr_core::RgbImage;
//! use webhdr_ops::{bands, luminance, tonemap};
//!
//! let image = RgbImage::filled(4, 4, [1.0, 1.0, 1.0]);
//! let lum = luminance::luminance(&image);
//! let partition = bands::partition(&lum).unwrap();
//! let webhdr = tonemap::tone_map(&image, &partition).unwrap();
//! assert_eq!(webhdr.cdm.dimensions(), (4, 4));
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - parallelize the per-pixel curve application
//!   with rayon. The band-merge loop is inherently sequential and is never
//!   parallelized.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod bands;
pub mod luminance;
pub mod tonemap;

pub use bands::BandPartition;
pub use error::{OpsError, OpsResult};
pub use tonemap::{BandCurve, WebHdr};
