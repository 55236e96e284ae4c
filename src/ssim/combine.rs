//! Pointwise SSIM formula and tile reduction.
//!
//! Moments arrive as `f32` but the formula runs in `f64`: the variance terms
//! are differences of large, nearly equal numbers.

/// Luminance stabilizer weight.
pub const K1: f64 = 0.01;
/// Contrast stabilizer weight.
pub const K2: f64 = 0.03;
/// Dynamic range of 8-bit samples.
pub const DYNAMIC_RANGE: f64 = 255.0;

const C1: f64 = (K1 * DYNAMIC_RANGE) * (K1 * DYNAMIC_RANGE);
const C2: f64 = (K2 * DYNAMIC_RANGE) * (K2 * DYNAMIC_RANGE);

/// Blurred local moments for one region, all sharing `stride`.
pub(crate) struct Moments<'a> {
    pub mu_a: &'a [f32],
    pub mu_b: &'a [f32],
    pub e_a2: &'a [f32],
    pub e_b2: &'a [f32],
    pub e_ab: &'a [f32],
    pub stride: usize,
}

/// Writable window of the caller's SSIM map.
///
/// `data[0]` is map pixel `(0, y0)` for the band or image this region covers.
pub(crate) struct MapRegion<'a> {
    pub data: &'a mut [f32],
    pub step: usize,
    pub stride: usize,
}

/// SSIM of one pixel from its local means and blurred second moments.
#[inline]
pub(crate) fn ssim_pixel(mu_a: f32, mu_b: f32, e_a2: f32, e_b2: f32, e_ab: f32) -> f64 {
    let mu_a = f64::from(mu_a);
    let mu_b = f64::from(mu_b);
    let mu_a2 = mu_a * mu_a;
    let mu_b2 = mu_b * mu_b;
    let mu_ab = mu_a * mu_b;
    let sigma_a2 = f64::from(e_a2) - mu_a2;
    let sigma_b2 = f64::from(e_b2) - mu_b2;
    let sigma_ab = f64::from(e_ab) - mu_ab;

    let numerator = (2.0 * mu_ab + C1) * (2.0 * sigma_ab + C2);
    let denominator = (mu_a2 + mu_b2 + C1) * (sigma_a2 + sigma_b2 + C2);
    numerator / denominator
}

/// Combines a `width x height` block of moments and returns the sum of SSIM
/// values, writing each value to `map` at column offset `x0` when present.
pub(crate) fn combine_block(
    moments: &Moments<'_>,
    width: usize,
    height: usize,
    x0: usize,
    mut map: Option<&mut MapRegion<'_>>,
) -> f64 {
    let mut sum = 0.0f64;
    for y in 0..height {
        let start = y * moments.stride;
        let mu_a = &moments.mu_a[start..start + width];
        let mu_b = &moments.mu_b[start..start + width];
        let e_a2 = &moments.e_a2[start..start + width];
        let e_b2 = &moments.e_b2[start..start + width];
        let e_ab = &moments.e_ab[start..start + width];
        for x in 0..width {
            let ssim = ssim_pixel(mu_a[x], mu_b[x], e_a2[x], e_b2[x], e_ab[x]);
            sum += ssim;
            if let Some(region) = map.as_deref_mut() {
                region.data[y * region.stride + (x0 + x) * region.step] = ssim as f32;
            }
        }
    }
    sum
}
