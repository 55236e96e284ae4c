//! Low-level building blocks and a sentinel-returning entry point.
//!
//! These expose the kernel builder, blur and multiply primitives, and an
//! entry point that reports failures as negative numbers instead of `Result`,
//! for callers bridging to C-style interfaces. Most users should prefer
//! [`crate::Ssim`] or [`crate::compute_ssim`].

pub use crate::filter::{gaussian_blur, multiply};
pub use crate::gaussian::{GaussianKernel, SSIM_RADIUS, SSIM_SIGMA};
pub use crate::memory::{DefaultAllocator, SsimAllocator, CACHE_ALIGNMENT};
pub use crate::tile::{TILE_MARGIN, TILE_SIZE, TILE_STRIDE};
pub use crate::util::error::{CODE_INVALID_ARGUMENT, CODE_OUT_OF_MEMORY};

use crate::image::{ImageView, ImageViewMut};
use crate::ssim::Ssim;
use crate::trace::report_error;
use crate::util::{SsimError, SsimResult};

/// Computes SSIM over two strided 8-bit buffers of the same size.
///
/// `*_step` is the element distance between samples of a row and `*_stride`
/// the distance between rows. Returns the mean score, or
/// [`CODE_INVALID_ARGUMENT`] when a source is absent or a layout is invalid.
/// The tiled path works on stack buffers only, so [`CODE_OUT_OF_MEMORY`] is
/// never returned from here. The map, when given, receives one score per
/// pixel at `y * map_stride + x * map_step`.
///
/// Every failure is reported through the crate's error diagnostics before
/// its code is returned.
#[allow(clippy::too_many_arguments)]
pub fn compute_ssim_strided(
    width: usize,
    height: usize,
    a: Option<&[u8]>,
    a_step: usize,
    a_stride: usize,
    b: Option<&[u8]>,
    b_step: usize,
    b_stride: usize,
    map: Option<&mut [f32]>,
    map_step: usize,
    map_stride: usize,
) -> f32 {
    let result = (|| -> SsimResult<f32> {
        let (Some(a), Some(b)) = (a, b) else {
            let err = SsimError::InvalidInput("image a or image b is absent");
            report_error!(err);
            return Err(err);
        };
        let view_a = ImageView::with_step(a, width, height, a_step, a_stride)?;
        let view_b = ImageView::with_step(b, width, height, b_step, b_stride)?;
        let ssim = Ssim::new();
        match map {
            Some(data) => {
                let mut map = ImageViewMut::with_step(data, width, height, map_step, map_stride)?;
                ssim.compute_with_map(view_a, view_b, &mut map)
            }
            None => ssim.compute(view_a, view_b),
        }
    })();

    match result {
        Ok(score) => score,
        Err(err) => err.code() as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_ssim_strided, CODE_INVALID_ARGUMENT};

    #[test]
    fn absent_source_returns_invalid_argument() {
        let data = [7u8; 16];
        let score = compute_ssim_strided(4, 4, Some(&data), 1, 4, None, 1, 4, None, 0, 0);
        assert_eq!(score, CODE_INVALID_ARGUMENT as f32);
    }

    #[test]
    fn short_buffer_returns_invalid_argument() {
        let data = [7u8; 15];
        let score = compute_ssim_strided(4, 4, Some(&data), 1, 4, Some(&data), 1, 4, None, 0, 0);
        assert_eq!(score, CODE_INVALID_ARGUMENT as f32);
    }

    #[test]
    fn constant_images_score_one_with_map() {
        let data = [128u8; 64];
        let mut map = vec![0.0f32; 64];
        let score = compute_ssim_strided(
            8,
            8,
            Some(&data),
            1,
            8,
            Some(&data),
            1,
            8,
            Some(&mut map),
            1,
            8,
        );
        assert_eq!(score, 1.0);
        assert!(map.iter().all(|&v| v == 1.0));
    }
}
