//! Error types for tone-mapping operations.

use thiserror::Error;

/// Error type for tone-mapping operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// The log-luminance field contains non-finite samples.
    ///
    /// Produced by pixels with zero or negative luminance; the conversion
    /// is aborted rather than letting the artifacts flow into the output.
    #[error("log-luminance is not finite for {count} pixel(s); input radiance must be strictly positive")]
    NonFiniteLogLuminance {
        /// Number of offending pixels.
        count: usize,
    },

    /// Rasters have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),
}

/// Result type for tone-mapping operations.
pub type OpsResult<T> = Result<T, OpsError>;
