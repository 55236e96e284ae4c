//! Fixed-size tile buffers and bordered tile extraction.
//!
//! A tile covers at most `TILE_SIZE x TILE_SIZE` image pixels plus a
//! `TILE_MARGIN` border on every side. Border samples that fall outside the
//! source image repeat the nearest in-bounds sample, matching
//! [`crate::PaddedImage::from_view_in`] pixel for pixel.

use crate::gaussian::SSIM_RADIUS;
use crate::image::ImageView;
use std::ops::{Deref, DerefMut};

/// Side length of a tile in image pixels.
pub const TILE_SIZE: usize = 64;
/// Border carried around each tile; equals the SSIM kernel radius.
pub const TILE_MARGIN: usize = SSIM_RADIUS;
/// Row stride of bordered tile buffers, in floats.
pub const TILE_STRIDE: usize = TILE_SIZE + 2 * TILE_MARGIN;

/// Element count of a bordered tile buffer.
pub(crate) const BORDERED_LEN: usize = TILE_STRIDE * TILE_STRIDE;
/// Element count of an unbordered (blurred) tile buffer.
pub(crate) const PLAIN_LEN: usize = TILE_SIZE * TILE_SIZE;

/// Cache-line aligned, stack-resident tile storage.
#[repr(C, align(64))]
pub(crate) struct TileBuffer<const N: usize>([f32; N]);

impl<const N: usize> TileBuffer<N> {
    pub(crate) fn new() -> Self {
        Self([0.0; N])
    }
}

impl<const N: usize> Deref for TileBuffer<N> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl<const N: usize> DerefMut for TileBuffer<N> {
    fn deref_mut(&mut self) -> &mut [f32] {
        &mut self.0
    }
}

/// Placement of one tile inside the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TileRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Copies `rect` plus a `margin` border from `src` into `tile` as floats.
///
/// The tile is written row-major with `tile_stride` floats per row, its first
/// element being image pixel `(rect.x - margin, rect.y - margin)`. Columns
/// outside the image repeat the nearest in-bounds column of the same row;
/// rows outside the image are block copies of the nearest written row.
pub(crate) fn load_tile(
    tile: &mut [f32],
    tile_stride: usize,
    rect: TileRect,
    margin: usize,
    src: ImageView<'_, u8>,
) {
    let padded_width = rect.width + 2 * margin;
    let padded_height = rect.height + 2 * margin;
    debug_assert!(tile_stride >= padded_width);
    debug_assert!(tile.len() >= (padded_height - 1) * tile_stride + padded_width);
    debug_assert!(rect.x < src.width() && rect.y < src.height());

    let m = margin as isize;
    let dx1 = rect.x as isize - m;
    let dy1 = rect.y as isize - m;
    let dx2 = (rect.x + rect.width) as isize + m;
    let dy2 = (rect.y + rect.height) as isize + m;
    let sx1 = dx1.max(0);
    let sy1 = dy1.max(0);
    let sx2 = dx2.min(src.width() as isize);
    let sy2 = dy2.min(src.height() as isize);

    let left = (sx1 - dx1) as usize;
    let body = (sx2 - sx1) as usize;
    let step = src.step();

    for sy in sy1..sy2 {
        let start = (sy - dy1) as usize * tile_stride;
        let row = &mut tile[start..start + padded_width];
        let (head, rest) = row.split_at_mut(left);
        let (mid, tail) = rest.split_at_mut(body);

        let samples = src.row_span(sy as usize)[sx1 as usize * step..]
            .iter()
            .step_by(step);
        for (dst, &sample) in mid.iter_mut().zip(samples) {
            *dst = f32::from(sample);
        }
        head.fill(mid[0]);
        tail.fill(mid[body - 1]);
    }

    let first = (sy1 - dy1) as usize;
    let last = (sy2 - dy1) as usize - 1;
    for r in last + 1..padded_height {
        let from = last * tile_stride;
        tile.copy_within(from..from + padded_width, r * tile_stride);
    }
    for r in 0..first {
        let from = first * tile_stride;
        tile.copy_within(from..from + padded_width, r * tile_stride);
    }
}

/// Iterates tile placements in row-major order, `TILE_SIZE` apart.
pub(crate) fn tiles_in_band(
    width: usize,
    y: usize,
    height: usize,
) -> impl Iterator<Item = TileRect> {
    (0..width).step_by(TILE_SIZE).map(move |x| TileRect {
        x,
        y,
        width: TILE_SIZE.min(width - x),
        height,
    })
}
