//! Error types for webhdr-core operations.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing rasters.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid raster dimensions.
    ///
    /// Returned when a data buffer's length does not match the requested
    /// `width * height * channels`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = Error::invalid_dimensions(4, 4, "expected 48 samples, got 3");
        assert!(err.to_string().contains("4x4"));
        assert!(err.to_string().contains("48"));
    }
}
