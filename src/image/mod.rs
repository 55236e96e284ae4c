//! Image views and padded working buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit step
//! and stride. The step counts elements between consecutive samples of a row
//! (1 for packed grayscale, 3 for one channel of interleaved RGB), and the
//! stride counts elements between the starts of consecutive rows.
//! `ImageViewMut` is the writable counterpart used for the optional SSIM map.

use crate::trace::report_error;
use crate::util::math::strided_len;
use crate::util::{SsimError, SsimResult};

#[cfg(feature = "image-io")]
pub mod io;
mod owned;
pub mod padded;

pub use owned::OwnedImage;
pub use padded::PaddedImage;

/// Borrowed 2D image view with an explicit step and stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    step: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `step == 1` and `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> SsimResult<Self> {
        Self::with_step(data, width, height, 1, width)
    }

    /// Creates a view with an explicit stride and packed samples.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> SsimResult<Self> {
        Self::with_step(data, width, height, 1, stride)
    }

    /// Creates a view with an explicit sample step and row stride.
    pub fn with_step(
        data: &'a [T],
        width: usize,
        height: usize,
        step: usize,
        stride: usize,
    ) -> SsimResult<Self> {
        check_layout(data.len(), width, height, step, stride)?;
        Ok(Self {
            data,
            width,
            height,
            step,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the step in elements between samples of a row.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x * self.step)
    }

    /// Returns the samples of row `y`, starting at column 0 and keeping the step.
    ///
    /// The slice spans `(width - 1) * step + 1` elements; use
    /// `.iter().step_by(step)` to visit the samples.
    pub(crate) fn row_span(&self, y: usize) -> &'a [T] {
        debug_assert!(y < self.height);
        let start = y * self.stride;
        &self.data[start..start + (self.width - 1) * self.step + 1]
    }
}

/// Mutable 2D view with an explicit step and stride.
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    data: &'a mut [T],
    width: usize,
    height: usize,
    step: usize,
    stride: usize,
}

impl<'a, T> ImageViewMut<'a, T> {
    /// Creates a contiguous mutable view with `step == 1` and `stride == width`.
    pub fn from_slice(data: &'a mut [T], width: usize, height: usize) -> SsimResult<Self> {
        Self::with_step(data, width, height, 1, width)
    }

    /// Creates a mutable view with an explicit sample step and row stride.
    pub fn with_step(
        data: &'a mut [T],
        width: usize,
        height: usize,
        step: usize,
        stride: usize,
    ) -> SsimResult<Self> {
        check_layout(data.len(), width, height, step, stride)?;
        Ok(Self {
            data,
            width,
            height,
            step,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the step in elements between samples of a row.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x * self.step)
    }

    /// Returns the length of the backing slice.
    pub(crate) fn buffer_len(&self) -> usize {
        self.data.len()
    }

    /// Returns the backing slice mutably, including any padding elements.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data[..]
    }
}

/// Validates a layout against a backing slice of `len` elements.
fn check_layout(
    len: usize,
    width: usize,
    height: usize,
    step: usize,
    stride: usize,
) -> SsimResult<()> {
    let result = required_len(width, height, step, stride).and_then(|needed| {
        if len < needed {
            Err(SsimError::BufferTooSmall { needed, got: len })
        } else {
            Ok(())
        }
    });
    if let Err(err) = &result {
        report_error!(err);
    }
    result
}

fn required_len(width: usize, height: usize, step: usize, stride: usize) -> SsimResult<usize> {
    if width == 0 || height == 0 {
        return Err(SsimError::InvalidDimensions { width, height });
    }
    let row_span = (width - 1)
        .checked_mul(step)
        .and_then(|v| v.checked_add(1))
        .ok_or(SsimError::InvalidDimensions { width, height })?;
    if step == 0 || (height > 1 && stride < row_span) {
        return Err(SsimError::InvalidStride {
            width,
            step,
            stride,
        });
    }
    strided_len(width, height, step, stride).ok_or(SsimError::InvalidDimensions { width, height })
}
