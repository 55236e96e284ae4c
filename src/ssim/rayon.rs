//! Rayon-parallel tile loop (feature-gated).
//!
//! Bands of `TILE_SIZE` rows run on the rayon pool, each with its own stack
//! scratch and its own disjoint chunk of the output map. Band sums are
//! collected in band order and added serially, so the score is bit-identical
//! to the serial path.

use crate::gaussian::GaussianKernel;
use crate::image::{ImageView, ImageViewMut};
use crate::ssim::combine::MapRegion;
use crate::ssim::scalar::{band_count, band_sum, map_band_len};
use crate::tile::TILE_SIZE;
use rayon::prelude::*;

/// Band-parallel sum of SSIM values over the whole image.
pub(crate) fn image_sum_par(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    map: Option<&mut ImageViewMut<'_, f32>>,
) -> f64 {
    let bands = band_count(a.height());
    let band_sums: Vec<f64> = match map {
        Some(map) => {
            let band_len = map_band_len(map);
            let (step, stride) = (map.step(), map.stride());
            map.as_mut_slice()
                .par_chunks_mut(band_len)
                .take(bands)
                .enumerate()
                .map(|(band, data)| {
                    let region = MapRegion { data, step, stride };
                    band_sum(a, b, kernel, band * TILE_SIZE, Some(region))
                })
                .collect()
        }
        None => (0..bands)
            .into_par_iter()
            .map(|band| band_sum(a, b, kernel, band * TILE_SIZE, None))
            .collect(),
    };
    band_sums.iter().sum()
}
