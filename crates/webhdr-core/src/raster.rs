//! Raster buffer types for the WebHDR pipeline.
//!
//! This module provides [`Raster`], an owned 2D sample buffer generic over
//! the sample type `T` and the channel count `N`, plus the elementwise and
//! masked numeric operations the tone-mapping algorithm needs.
//!
//! # Memory Layout
//!
//! Rasters store samples in **row-major** order, top-to-bottom, channels
//! interleaved:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use webhdr_core::RgbImage;
//!
//! let mut img = RgbImage::filled(4, 4, [1.0, 0.5, 0.25]);
//! img.set_pixel(0, 0, [2.0, 2.0, 2.0]);
//! assert_eq!(img.pixel(0, 0), [2.0, 2.0, 2.0]);
//! assert_eq!(img.pixel(3, 3), [1.0, 0.5, 0.25]);
//! ```

use crate::{Error, Result};

/// Linear-light HDR radiance image, one f32 triple per pixel.
pub type RgbImage = Raster<f32, 3>;

/// Scalar field over the image plane (luminance, log-luminance).
pub type ScalarMap = Raster<f32, 1>;

/// Per-pixel band index labels.
///
/// Labels start as `floor(log10(L))` truncated to the `i8` value range, but
/// are stored as `i32` so the merge loop's sentinel target (`i32::MIN`)
/// remains representable.
pub type BandLabels = Raster<i32, 1>;

/// Compression-driven map: one quantized 8-bit compression code per pixel.
pub type CdmMap = Raster<u8, 1>;

/// Owned 2D sample buffer with `N` interleaved channels per pixel.
///
/// Unlike a shared image container, a `Raster` is a plain `Vec`-backed
/// buffer: each pipeline stage owns its rasters exclusively, so mutation
/// (notably the in-place band relabeling) needs no synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T, const N: usize> {
    /// Sample data, `width * height * N` entries, row-major.
    data: Vec<T>,
    /// Raster width in pixels.
    width: u32,
    /// Raster height in pixels.
    height: u32,
}

impl<T: Copy + Default, const N: usize> Raster<T, N> {
    /// Creates a new raster filled with default samples (zeros for numbers).
    pub fn new(width: u32, height: u32) -> Self {
        let sample_count = width as usize * height as usize * N;
        Self {
            data: vec![T::default(); sample_count],
            width,
            height,
        }
    }

    /// Creates a raster filled with a specific pixel value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webhdr_core::ScalarMap;
    ///
    /// let field = ScalarMap::filled(8, 8, [0.5]);
    /// assert_eq!(field.pixel(7, 7), [0.5]);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: [T; N]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * N);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates a raster from existing sample data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data` does not hold exactly
    /// `width * height * N` samples.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = width as usize * height as usize * N;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of channels per pixel.
    #[inline]
    pub const fn channels(&self) -> usize {
        N
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the raster has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a reference to the raw sample data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable reference to the raw sample data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the raster, returning the sample buffer.
    #[inline]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns the sample offset for pixel at (x, y).
    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * N
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [T; N] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        let mut result = [T::default(); N];
        result.copy_from_slice(&self.data[offset..offset + N]);
        result
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[T; N]> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [T; N]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        self.data[offset..offset + N].copy_from_slice(&pixel);
    }

    /// Returns a row of samples as a slice.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize * N;
        let end = start + self.width as usize * N;
        &self.data[start..end]
    }

    /// Applies a function to each pixel in place.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn([T; N]) -> [T; N],
    {
        for chunk in self.data.chunks_exact_mut(N) {
            let mut pixel = [T::default(); N];
            pixel.copy_from_slice(chunk);
            chunk.copy_from_slice(&f(pixel));
        }
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [T; N])> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }
}

impl<const N: usize> Raster<f32, N> {
    /// Returns a new raster with `log10` applied to every sample.
    ///
    /// Non-positive samples produce non-finite values (`-inf` for zero,
    /// NaN for negatives), exactly as `f32::log10` defines them; callers
    /// decide whether that is an error.
    pub fn log10(&self) -> Self {
        Self {
            data: self.data.iter().map(|v| v.log10()).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Clamps every sample to `[lo, hi]` in place.
    ///
    /// NaN samples stay NaN, matching elementwise clip semantics.
    pub fn clamp_in_place(&mut self, lo: f32, hi: f32) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }

    /// Counts samples that are not finite (NaN or infinity).
    pub fn count_non_finite(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }
}

impl ScalarMap {
    /// Arithmetic mean of samples at pixels carrying `label`.
    ///
    /// The mask is boolean membership in `labels`; accumulation is f64 to
    /// keep band means stable on large bands. Returns `None` when no pixel
    /// carries the label.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when the label raster has different
    /// dimensions.
    pub fn mean_where(&self, labels: &BandLabels, label: i32) -> Option<f64> {
        debug_assert_eq!(self.dimensions(), labels.dimensions());
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for (v, l) in self.data.iter().zip(labels.data()) {
            if *l == label {
                sum += *v as f64;
                count += 1;
            }
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

impl BandLabels {
    /// Returns the distinct labels currently present, in ascending order.
    pub fn distinct_ascending(&self) -> Vec<i32> {
        let mut labels = self.data.clone();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Relabels every pixel carrying `from` to `to`, returning how many
    /// pixels changed.
    pub fn relabel(&mut self, from: i32, to: i32) -> usize {
        let mut changed = 0;
        for l in &mut self.data {
            if *l == from {
                *l = to;
                changed += 1;
            }
        }
        changed
    }
}
