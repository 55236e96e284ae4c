//! Serial tiled SSIM evaluation.
//!
//! The image is cut into bands of `TILE_SIZE` rows and each band into tiles of
//! `TILE_SIZE` columns. Every tile is processed entirely in stack buffers:
//! load both sources with a border, form the squared and cross products, blur
//! the five quantities, and combine. Tile sums are added in column order
//! within a band and band sums in row order.

use crate::filter::{blur_unchecked, multiply};
use crate::gaussian::GaussianKernel;
use crate::image::{ImageView, ImageViewMut};
use crate::ssim::combine::{combine_block, MapRegion, Moments};
use crate::tile::{
    load_tile, tiles_in_band, TileBuffer, TileRect, BORDERED_LEN, PLAIN_LEN, TILE_MARGIN,
    TILE_SIZE, TILE_STRIDE,
};

/// Working storage for one tile; blurred outputs overwrite consumed inputs.
struct TileScratch {
    plain: TileBuffer<PLAIN_LEN>,
    s1: TileBuffer<BORDERED_LEN>,
    s2: TileBuffer<BORDERED_LEN>,
    s3: TileBuffer<BORDERED_LEN>,
    s4: TileBuffer<BORDERED_LEN>,
    s5: TileBuffer<BORDERED_LEN>,
}

impl TileScratch {
    fn new() -> Self {
        Self {
            plain: TileBuffer::new(),
            s1: TileBuffer::new(),
            s2: TileBuffer::new(),
            s3: TileBuffer::new(),
            s4: TileBuffer::new(),
            s5: TileBuffer::new(),
        }
    }
}

/// Number of `TILE_SIZE`-row bands covering `height`.
pub(crate) fn band_count(height: usize) -> usize {
    height.div_ceil(TILE_SIZE)
}

/// Number of tiles covering a `width x height` image.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn tile_count(width: usize, height: usize) -> usize {
    width.div_ceil(TILE_SIZE) * band_count(height)
}

/// Length of the map chunk handed to each band.
pub(crate) fn map_band_len(map: &ImageViewMut<'_, f32>) -> usize {
    if band_count(map.height()) == 1 {
        map.buffer_len()
    } else {
        TILE_SIZE * map.stride()
    }
}

/// Evaluates one band of tiles starting at image row `y` and returns its SSIM sum.
pub(crate) fn band_sum(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    y: usize,
    mut map: Option<MapRegion<'_>>,
) -> f64 {
    let height = TILE_SIZE.min(a.height() - y);
    let mut scratch = TileScratch::new();
    let mut sum = 0.0f64;
    for rect in tiles_in_band(a.width(), y, height) {
        sum += tile_sum(&mut scratch, a, b, kernel, rect, map.as_mut());
    }
    sum
}

fn tile_sum(
    scratch: &mut TileScratch,
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    rect: TileRect,
    map: Option<&mut MapRegion<'_>>,
) -> f64 {
    debug_assert_eq!(kernel.radius(), TILE_MARGIN);
    let TileScratch {
        plain,
        s1,
        s2,
        s3,
        s4,
        s5,
    } = scratch;

    load_tile(s1, TILE_STRIDE, rect, TILE_MARGIN, a);
    load_tile(s2, TILE_STRIDE, rect, TILE_MARGIN, b);

    let padded_width = rect.width + 2 * TILE_MARGIN;
    let padded_height = rect.height + 2 * TILE_MARGIN;
    multiply(s3, s1, s1, padded_width, padded_height, TILE_STRIDE);
    multiply(s4, s2, s2, padded_width, padded_height, TILE_STRIDE);
    multiply(s5, s1, s2, padded_width, padded_height, TILE_STRIDE);

    let (w, h) = (rect.width, rect.height);
    blur_unchecked(plain, TILE_SIZE, s1, TILE_STRIDE, w, h, kernel);
    blur_unchecked(s1, TILE_SIZE, s2, TILE_STRIDE, w, h, kernel);
    blur_unchecked(s2, TILE_SIZE, s3, TILE_STRIDE, w, h, kernel);
    blur_unchecked(s3, TILE_SIZE, s4, TILE_STRIDE, w, h, kernel);
    blur_unchecked(s4, TILE_SIZE, s5, TILE_STRIDE, w, h, kernel);

    let moments = Moments {
        mu_a: plain,
        mu_b: s1,
        e_a2: s2,
        e_b2: s3,
        e_ab: s4,
        stride: TILE_SIZE,
    };
    combine_block(&moments, w, h, rect.x, map)
}

/// Serial sum of SSIM values over the whole image.
pub(crate) fn image_sum(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    map: Option<&mut ImageViewMut<'_, f32>>,
) -> f64 {
    let bands = band_count(a.height());
    match map {
        Some(map) => {
            let band_len = map_band_len(map);
            let (step, stride) = (map.step(), map.stride());
            map.as_mut_slice()
                .chunks_mut(band_len)
                .take(bands)
                .enumerate()
                .map(|(band, data)| {
                    let region = MapRegion { data, step, stride };
                    band_sum(a, b, kernel, band * TILE_SIZE, Some(region))
                })
                .sum()
        }
        None => (0..bands)
            .map(|band| band_sum(a, b, kernel, band * TILE_SIZE, None))
            .sum(),
    }
}
