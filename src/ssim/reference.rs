//! Whole-image SSIM without tiling.
//!
//! Builds padded float copies of both images through the configured
//! allocator, multiplies and blurs them at full size, then combines row by
//! row. Slower and heavier than the tiled path; kept as the oracle the tiled
//! path is checked against.

use crate::filter::{blur_unchecked, multiply};
use crate::gaussian::GaussianKernel;
use crate::image::{ImageView, ImageViewMut, PaddedImage};
use crate::memory::SsimAllocator;
use crate::ssim::combine::{combine_block, MapRegion, Moments};
use crate::util::SsimResult;

fn product<A: SsimAllocator>(
    alloc: A,
    a: &PaddedImage<A>,
    b: &PaddedImage<A>,
) -> SsimResult<PaddedImage<A>> {
    debug_assert_eq!(a.stride(), b.stride());
    let mut out = PaddedImage::new_in(alloc, a.width(), a.height(), a.margin())?;
    let (w, h, stride) = (a.padded_width(), a.padded_height(), a.stride());
    multiply(out.as_mut_slice(), a.as_slice(), b.as_slice(), w, h, stride);
    Ok(out)
}

fn blur<A: SsimAllocator>(
    alloc: A,
    src: &PaddedImage<A>,
    kernel: &GaussianKernel,
) -> SsimResult<PaddedImage<A>> {
    debug_assert!(src.margin() >= kernel.radius());
    let mut out = PaddedImage::new_in(alloc, src.width(), src.height(), 0)?;
    // Skip any margin beyond the kernel radius.
    let extra = src.margin() - kernel.radius();
    let offset = extra * src.stride() + extra;
    let dst_stride = out.stride();
    blur_unchecked(
        out.as_mut_slice(),
        dst_stride,
        &src.as_slice()[offset..],
        src.stride(),
        src.width(),
        src.height(),
        kernel,
    );
    Ok(out)
}

/// Sum of SSIM values over the whole image, computed without tiles.
pub(crate) fn image_sum<A: SsimAllocator + Copy>(
    alloc: A,
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    map: Option<&mut ImageViewMut<'_, f32>>,
) -> SsimResult<f64> {
    let margin = kernel.radius();
    let img_a = PaddedImage::from_view_in(alloc, a, margin)?;
    let img_b = PaddedImage::from_view_in(alloc, b, margin)?;

    let a2 = product(alloc, &img_a, &img_a)?;
    let b2 = product(alloc, &img_b, &img_b)?;
    let ab = product(alloc, &img_a, &img_b)?;

    let mu_a = blur(alloc, &img_a, kernel)?;
    let mu_b = blur(alloc, &img_b, kernel)?;
    let e_a2 = blur(alloc, &a2, kernel)?;
    let e_b2 = blur(alloc, &b2, kernel)?;
    let e_ab = blur(alloc, &ab, kernel)?;

    let moments = Moments {
        mu_a: mu_a.as_slice(),
        mu_b: mu_b.as_slice(),
        e_a2: e_a2.as_slice(),
        e_b2: e_b2.as_slice(),
        e_ab: e_ab.as_slice(),
        stride: mu_a.stride(),
    };
    let sum = match map {
        Some(map) => {
            let (step, stride) = (map.step(), map.stride());
            let mut region = MapRegion {
                data: map.as_mut_slice(),
                step,
                stride,
            };
            combine_block(&moments, a.width(), a.height(), 0, Some(&mut region))
        }
        None => combine_block(&moments, a.width(), a.height(), 0, None),
    };
    Ok(sum)
}
