//! Allocator-backed float images with a replicated border.
//!
//! A `PaddedImage` stores `height + 2 * margin` rows of `stride` floats. The
//! stride covers `width + 2 * margin` samples rounded up to
//! [`CACHE_ALIGNMENT`] bytes, and the buffer itself is cache-line aligned.
//! Logical coordinates run from `-margin` to `width + margin - 1` (and the
//! same vertically); the margin holds copies of the nearest edge sample.

use crate::image::ImageView;
use crate::memory::{aligned_layout, SsimAllocator, CACHE_ALIGNMENT};
use crate::trace::report_error;
use crate::util::math::align_up;
use crate::util::{SsimError, SsimResult};
use std::alloc::Layout;
use std::ptr::NonNull;

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

/// Padded single-precision image owned through an [`SsimAllocator`].
pub struct PaddedImage<A: SsimAllocator> {
    ptr: NonNull<f32>,
    layout: Layout,
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    margin: usize,
    alloc: A,
}

impl<A: SsimAllocator> PaddedImage<A> {
    /// Allocates a zero-filled image with `margin` border pixels on each side.
    pub fn new_in(alloc: A, width: usize, height: usize, margin: usize) -> SsimResult<Self> {
        if width == 0 || height == 0 {
            return Err(SsimError::InvalidDimensions { width, height });
        }
        let overflow = SsimError::InvalidDimensions { width, height };
        let padded_width = margin
            .checked_mul(2)
            .and_then(|m| m.checked_add(width))
            .ok_or_else(|| overflow.clone())?;
        let padded_height = margin
            .checked_mul(2)
            .and_then(|m| m.checked_add(height))
            .ok_or_else(|| overflow.clone())?;
        let stride = padded_width
            .checked_mul(FLOAT_SIZE)
            .and_then(|bytes| align_up(bytes, CACHE_ALIGNMENT))
            .ok_or_else(|| overflow.clone())?
            / FLOAT_SIZE;
        let len = stride
            .checked_mul(padded_height)
            .ok_or_else(|| overflow.clone())?;
        let bytes = len.checked_mul(FLOAT_SIZE).ok_or(overflow)?;

        let layout = aligned_layout(bytes, CACHE_ALIGNMENT)?;
        let Some(raw) = alloc.allocate(layout) else {
            let err = SsimError::OutOfMemory { bytes };
            report_error!(err);
            return Err(err);
        };
        let ptr = raw.cast::<f32>();
        // SAFETY: the block holds `len` floats and all-zero bits are 0.0.
        unsafe { std::ptr::write_bytes(ptr.as_ptr(), 0, len) };

        Ok(Self {
            ptr,
            layout,
            len,
            width,
            height,
            stride,
            margin,
            alloc,
        })
    }

    /// Converts an 8-bit view to floats and replicates its edges into the margin.
    pub fn from_view_in(alloc: A, src: ImageView<'_, u8>, margin: usize) -> SsimResult<Self> {
        let mut img = Self::new_in(alloc, src.width(), src.height(), margin)?;
        let width = img.width;
        let stride = img.stride;
        let padded_width = width + 2 * margin;
        let step = src.step();
        let buf = img.as_mut_slice();

        for y in 0..src.height() {
            let row = &mut buf[(y + margin) * stride..][..padded_width];
            let (left, rest) = row.split_at_mut(margin);
            let (body, right) = rest.split_at_mut(width);
            for (dst, &sample) in body.iter_mut().zip(src.row_span(y).iter().step_by(step)) {
                *dst = f32::from(sample);
            }
            left.fill(body[0]);
            right.fill(body[width - 1]);
        }

        let first = margin * stride;
        let last = (margin + src.height() - 1) * stride;
        for k in 1..=margin {
            buf.copy_within(first..first + padded_width, first - k * stride);
            buf.copy_within(last..last + padded_width, last + k * stride);
        }

        Ok(img)
    }

    /// Returns the logical width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the logical height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row stride in floats.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the border width in pixels.
    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Returns the whole buffer, starting at logical `(-margin, -margin)`.
    pub fn as_slice(&self) -> &[f32] {
        // SAFETY: `ptr` owns `len` initialized floats for the lifetime of `self`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the whole buffer mutably, starting at logical `(-margin, -margin)`.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Returns logical row `y` including both margins.
    ///
    /// Index 0 of the slice is logical column `-margin`.
    pub fn padded_row(&self, y: isize) -> &[f32] {
        let m = self.margin as isize;
        debug_assert!(-m <= y && y < self.height as isize + m);
        let start = (y + m) as usize * self.stride;
        &self.as_slice()[start..start + self.width + 2 * self.margin]
    }

    /// Returns the sample at logical `(x, y)`; negative coordinates address the margin.
    pub fn get(&self, x: isize, y: isize) -> f32 {
        let m = self.margin as isize;
        debug_assert!(-m <= x && x < self.width as isize + m);
        self.padded_row(y)[(x + m) as usize]
    }

    pub(crate) fn padded_width(&self) -> usize {
        self.width + 2 * self.margin
    }

    pub(crate) fn padded_height(&self) -> usize {
        self.height + 2 * self.margin
    }
}

impl<A: SsimAllocator> Drop for PaddedImage<A> {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `self.alloc.allocate(self.layout)`.
        unsafe { self.alloc.deallocate(self.ptr.cast::<u8>(), self.layout) };
    }
}
