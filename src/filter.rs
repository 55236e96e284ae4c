//! Elementwise products and direct 2D Gaussian convolution on float buffers.
//!
//! Both operations work on row-major buffers with an explicit stride. The
//! convolution is non-separable and costs `O(width * height * size^2)`.

use crate::gaussian::GaussianKernel;
use crate::trace::report_error;
use crate::util::math::strided_len;
use crate::util::{SsimError, SsimResult};

/// Writes `a * b` into `dst` over a `width x height` region sharing `stride`.
///
/// Border samples are multiplied like any other sample, so products of
/// replicated borders stay valid replicated borders.
pub fn multiply(dst: &mut [f32], a: &[f32], b: &[f32], width: usize, height: usize, stride: usize) {
    debug_assert!(stride >= width);
    for y in 0..height {
        let start = y * stride;
        let out = &mut dst[start..start + width];
        let ra = &a[start..start + width];
        let rb = &b[start..start + width];
        for ((p, &va), &vb) in out.iter_mut().zip(ra).zip(rb) {
            *p = va * vb;
        }
    }
}

/// Convolves `src` with `kernel` into a `width x height` region of `dst`.
///
/// `src` starts at the top-left corner of its margin: output pixel `(x, y)`
/// reads `src[(y + j) * src_stride + x + i]` for kernel tap `(i, j)`. The
/// source therefore needs `width + 2r` columns and `height + 2r` rows of valid
/// samples, where `r` is the kernel radius.
///
/// Buffer sizes and the margin are validated once before the loop.
pub fn gaussian_blur(
    dst: &mut [f32],
    dst_stride: usize,
    src: &[f32],
    src_stride: usize,
    width: usize,
    height: usize,
    kernel: &GaussianKernel,
) -> SsimResult<()> {
    let checked = check_blur_layout(
        dst.len(),
        dst_stride,
        src.len(),
        src_stride,
        width,
        height,
        kernel.radius(),
    );
    if let Err(err) = &checked {
        report_error!(err);
    }
    checked?;

    blur_unchecked(dst, dst_stride, src, src_stride, width, height, kernel);
    Ok(())
}

fn check_blur_layout(
    dst_len: usize,
    dst_stride: usize,
    src_len: usize,
    src_stride: usize,
    width: usize,
    height: usize,
    radius: usize,
) -> SsimResult<()> {
    if width == 0 || height == 0 {
        return Err(SsimError::InvalidDimensions { width, height });
    }
    let overflow = SsimError::InvalidDimensions { width, height };
    let apron = radius.checked_mul(2).ok_or_else(|| overflow.clone())?;
    let src_width = width.checked_add(apron).ok_or_else(|| overflow.clone())?;
    let src_height = height.checked_add(apron).ok_or_else(|| overflow.clone())?;
    if src_stride < src_width {
        return Err(SsimError::InsufficientMargin {
            radius,
            width,
            stride: src_stride,
        });
    }
    if dst_stride < width {
        return Err(SsimError::InvalidStride {
            width,
            step: 1,
            stride: dst_stride,
        });
    }
    let src_needed =
        strided_len(src_width, src_height, 1, src_stride).ok_or_else(|| overflow.clone())?;
    if src_len < src_needed {
        return Err(SsimError::BufferTooSmall {
            needed: src_needed,
            got: src_len,
        });
    }
    let dst_needed = strided_len(width, height, 1, dst_stride).ok_or(overflow)?;
    if dst_len < dst_needed {
        return Err(SsimError::BufferTooSmall {
            needed: dst_needed,
            got: dst_len,
        });
    }
    Ok(())
}

/// Hot-path convolution; preconditions are those of [`gaussian_blur`] and are
/// only checked in debug builds.
pub(crate) fn blur_unchecked(
    dst: &mut [f32],
    dst_stride: usize,
    src: &[f32],
    src_stride: usize,
    width: usize,
    height: usize,
    kernel: &GaussianKernel,
) {
    let size = kernel.size();
    debug_assert!(src_stride >= width + size - 1);
    debug_assert!(dst_stride >= width);
    let weights = kernel.weights();

    for y in 0..height {
        let out = &mut dst[y * dst_stride..y * dst_stride + width];
        for (x, value) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (j, taps) in weights.chunks_exact(size).enumerate() {
                let start = (y + j) * src_stride + x;
                let window = &src[start..start + size];
                for (&w, &s) in taps.iter().zip(window) {
                    acc += w * s;
                }
            }
            *value = acc;
        }
    }
}
