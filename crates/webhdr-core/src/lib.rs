//! # webhdr-core
//!
//! Core types for WebHDR conversion.
//!
//! This crate provides the foundational containers used throughout the
//! WebHDR pipeline:
//!
//! - [`Raster`] - Owned 2D sample buffer, generic over sample type and
//!   channel count
//! - [`RgbImage`], [`ScalarMap`], [`BandLabels`], [`CdmMap`] - the concrete
//!   rasters the pipeline passes between stages
//!
//! ## Design Philosophy
//!
//! The pipeline is single-shot: each stage takes exclusive ownership of (or
//! a shared borrow into) plain owned buffers, so there is no copy-on-write
//! machinery and no interior mutability. Elementwise numeric operations
//! (log10, clamp, label-masked averaging) live directly on the raster types
//! rather than in an ambient array runtime.
//!
//! ## Crate Structure
//!
//! This crate is the foundation of the workspace and has no internal
//! dependencies:
//!
//! ```text
//! webhdr-core (this crate)
//!    ^
//!    |
//!    +-- webhdr-ops (luminance, band partitioning, tone mapping)
//!    +-- webhdr-io  (EXR/HDR input, JPEG/PNG output)
//!    +-- webhdr-cli (the webhdr binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{BandLabels, CdmMap, Raster, RgbImage, ScalarMap};
