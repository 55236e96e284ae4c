//! Normalized 2D Gaussian convolution kernels.
//!
//! Weights are evaluated for one quadrant (offsets `[-r, 0]` in both axes),
//! mirrored horizontally across the centre column, then the top half is
//! mirrored vertically onto the bottom half. The running sum follows that
//! fill order so a given `(radius, sigma)` always yields the same bits.

use crate::util::{SsimError, SsimResult};
use std::sync::OnceLock;

/// Kernel radius used by SSIM (11x11 window).
pub const SSIM_RADIUS: usize = 5;
/// Gaussian standard deviation used by SSIM.
pub const SSIM_SIGMA: f32 = 1.5;

/// Square Gaussian kernel with weights summing to one.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    radius: usize,
    sigma: f32,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Builds a `(2 * radius + 1)^2` kernel for the given standard deviation.
    pub fn new(radius: usize, sigma: f32) -> SsimResult<Self> {
        if radius == 0 {
            return Err(SsimError::InvalidInput("kernel radius must be at least 1"));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(SsimError::InvalidInput(
                "kernel sigma must be finite and positive",
            ));
        }
        let size = radius
            .checked_mul(2)
            .and_then(|d| d.checked_add(1))
            .ok_or(SsimError::InvalidInput("kernel radius too large"))?;
        let count = size
            .checked_mul(size)
            .ok_or(SsimError::InvalidInput("kernel radius too large"))?;

        let mut weights = vec![0.0f32; count];
        let mut sum = 0.0f64;
        let r = radius as i64;

        for y in 0..=radius {
            let row = y * size;
            for x in 0..=radius {
                let w = gaussian_weight(x as i64 - r, y as i64 - r, sigma);
                weights[row + x] = w;
                sum += f64::from(w);
            }
            for x in radius + 1..size {
                let w = weights[row + size - 1 - x];
                weights[row + x] = w;
                sum += f64::from(w);
            }
        }
        for y in radius + 1..size {
            let mirror = (size - 1 - y) * size;
            for x in 0..size {
                let w = weights[mirror + x];
                weights[y * size + x] = w;
                sum += f64::from(w);
            }
        }

        let norm = sum as f32;
        for w in &mut weights {
            *w /= norm;
        }

        Ok(Self {
            radius,
            sigma,
            weights,
        })
    }

    /// Returns the process-wide radius 5, sigma 1.5 kernel used by SSIM.
    ///
    /// Built on first use and shared afterwards.
    pub fn ssim_default() -> &'static GaussianKernel {
        static KERNEL: OnceLock<GaussianKernel> = OnceLock::new();
        KERNEL.get_or_init(|| {
            GaussianKernel::new(SSIM_RADIUS, SSIM_SIGMA).expect("ssim kernel parameters are valid")
        })
    }

    /// Returns the kernel radius.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns the Gaussian standard deviation.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Returns the side length `2 * radius + 1`.
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }

    /// Returns the weights in row-major order.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

fn gaussian_weight(x: i64, y: i64, sigma: f32) -> f32 {
    let sigma2 = sigma * sigma;
    let numerator = (-((x * x + y * y) as f32) / (2.0 * sigma2)).exp();
    let denominator = 2.0 * std::f32::consts::PI * sigma2;
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::{GaussianKernel, SSIM_RADIUS, SSIM_SIGMA};
    use crate::util::SsimError;

    #[test]
    fn ssim_kernel_sums_to_one() {
        let kernel = GaussianKernel::ssim_default();
        assert_eq!(kernel.size(), 11);
        assert_eq!(kernel.weights().len(), 121);
        let sum: f64 = kernel.weights().iter().map(|&w| f64::from(w)).sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum = {sum}");
        assert!(kernel.weights().iter().all(|&w| w > 0.0));
    }

    #[test]
    fn kernel_is_symmetric_and_peaks_at_centre() {
        let kernel = GaussianKernel::new(3, 1.2).unwrap();
        let size = kernel.size();
        let w = kernel.weights();
        for y in 0..size {
            for x in 0..size {
                let v = w[y * size + x];
                assert_eq!(v, w[y * size + (size - 1 - x)]);
                assert_eq!(v, w[(size - 1 - y) * size + x]);
                assert_eq!(v, w[x * size + y]);
                assert!(v <= w[3 * size + 3]);
            }
        }
    }

    #[test]
    fn rebuilding_is_bit_reproducible() {
        let a = GaussianKernel::new(SSIM_RADIUS, SSIM_SIGMA).unwrap();
        let b = GaussianKernel::new(SSIM_RADIUS, SSIM_SIGMA).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a, GaussianKernel::ssim_default());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            GaussianKernel::new(0, 1.5).err().unwrap(),
            SsimError::InvalidInput("kernel radius must be at least 1")
        );
        assert!(GaussianKernel::new(2, 0.0).is_err());
        assert!(GaussianKernel::new(2, f32::NAN).is_err());
    }
}
