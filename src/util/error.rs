//! Error types for ssimtile.

use thiserror::Error;

/// Result alias for ssimtile operations.
pub type SsimResult<T> = std::result::Result<T, SsimError>;

/// `EINVAL`, returned by the sentinel-style entry point for invalid arguments.
pub const CODE_INVALID_ARGUMENT: i32 = -22;
/// `ENOMEM`, returned by the sentinel-style entry point on allocation failure.
pub const CODE_OUT_OF_MEMORY: i32 = -12;

/// Errors that can occur when computing SSIM.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SsimError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Step or stride cannot address `width` samples without overlap.
    #[error("invalid stride {stride} for width {width} with step {step}")]
    InvalidStride {
        width: usize,
        step: usize,
        stride: usize,
    },
    /// The backing slice is shorter than the layout requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The two input images do not share the same size.
    #[error("image size mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        a_width: usize,
        a_height: usize,
        b_width: usize,
        b_height: usize,
    },
    /// A convolution source does not carry `radius` margin pixels per side.
    #[error("source stride {stride} cannot hold width {width} plus a margin of {radius}")]
    InsufficientMargin {
        radius: usize,
        width: usize,
        stride: usize,
    },
    /// The allocator could not provide an aligned buffer.
    #[error("allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },
    /// Image decoding or encoding failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}

impl SsimError {
    /// Returns the negative sentinel code reported by
    /// [`crate::lowlevel::compute_ssim_strided`].
    pub fn code(&self) -> i32 {
        match self {
            SsimError::OutOfMemory { .. } => CODE_OUT_OF_MEMORY,
            _ => CODE_INVALID_ARGUMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SsimError, CODE_INVALID_ARGUMENT, CODE_OUT_OF_MEMORY};

    #[test]
    fn codes_distinguish_allocation_failures() {
        assert_eq!(
            SsimError::OutOfMemory { bytes: 64 }.code(),
            CODE_OUT_OF_MEMORY
        );
        assert_eq!(
            SsimError::InvalidInput("missing image").code(),
            CODE_INVALID_ARGUMENT
        );
        assert_eq!(
            SsimError::BufferTooSmall { needed: 4, got: 3 }.code(),
            CODE_INVALID_ARGUMENT
        );
    }
}
