//! SSIM entry points.
//!
//! [`Ssim`] owns the allocator and configuration and runs the tiled pipeline.
//! The free functions [`compute_ssim`] and [`compute_ssim_map`] use the
//! default allocator and a serial tile loop.

pub(crate) mod combine;
#[cfg(feature = "rayon")]
pub(crate) mod rayon;
pub(crate) mod reference;
pub(crate) mod scalar;

pub use combine::{DYNAMIC_RANGE, K1, K2};

use crate::gaussian::GaussianKernel;
use crate::image::{ImageView, ImageViewMut};
use crate::memory::{DefaultAllocator, SsimAllocator};
use crate::trace::{report_error, trace_event, trace_span};
use crate::util::{SsimError, SsimResult};

/// Runtime options for [`Ssim`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SsimConfig {
    /// Process tile bands on the rayon pool (requires the `rayon` feature;
    /// ignored otherwise).
    pub parallel: bool,
}

/// SSIM evaluator with an explicit allocator and configuration.
///
/// The allocator backs the padded whole-image buffers of
/// [`Ssim::compute_reference`]; the tiled path works on stack buffers only.
#[derive(Clone, Debug, Default)]
pub struct Ssim<A: SsimAllocator = DefaultAllocator> {
    alloc: A,
    cfg: SsimConfig,
}

impl Ssim<DefaultAllocator> {
    /// Creates an evaluator using the global allocator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: SsimAllocator> Ssim<A> {
    /// Creates an evaluator that allocates through `alloc`.
    pub fn with_allocator(alloc: A) -> Self {
        Self {
            alloc,
            cfg: SsimConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: SsimConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> SsimConfig {
        self.cfg
    }

    /// Returns the allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the mean SSIM of `a` against `b`.
    pub fn compute(&self, a: ImageView<'_, u8>, b: ImageView<'_, u8>) -> SsimResult<f32> {
        self.run_tiled(a, b, None)
    }

    /// Returns the mean SSIM and writes every per-pixel score into `map`.
    pub fn compute_with_map(
        &self,
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
        map: &mut ImageViewMut<'_, f32>,
    ) -> SsimResult<f32> {
        self.run_tiled(a, b, Some(map))
    }

    /// Whole-image evaluation without tiling.
    ///
    /// Produces the same per-pixel values as the tiled path (the border policy
    /// and summation order inside each pixel are identical); only the order of
    /// the final reduction differs.
    pub fn compute_reference(
        &self,
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
        map: Option<&mut ImageViewMut<'_, f32>>,
    ) -> SsimResult<f32> {
        check_inputs(a, b, map.as_deref())?;
        let kernel = GaussianKernel::ssim_default();
        let _span = trace_span!(
            "compute_ssim_reference",
            width = a.width(),
            height = a.height()
        )
        .entered();
        let sum = reference::image_sum(&self.alloc, a, b, kernel, map).inspect_err(|err| {
            report_error!(err);
        })?;
        Ok(finish(sum, a))
    }

    fn run_tiled(
        &self,
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
        map: Option<&mut ImageViewMut<'_, f32>>,
    ) -> SsimResult<f32> {
        check_inputs(a, b, map.as_deref())?;
        let kernel = GaussianKernel::ssim_default();
        let _span = trace_span!(
            "compute_ssim",
            width = a.width(),
            height = a.height(),
            tiles = scalar::tile_count(a.width(), a.height()),
            parallel = self.cfg.parallel
        )
        .entered();

        let sum = if self.cfg.parallel {
            parallel_sum(a, b, kernel, map)
        } else {
            scalar::image_sum(a, b, kernel, map)
        };
        let score = finish(sum, a);
        trace_event!("ssim_score", score = score);
        Ok(score)
    }
}

#[cfg(feature = "rayon")]
fn parallel_sum(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    map: Option<&mut ImageViewMut<'_, f32>>,
) -> f64 {
    self::rayon::image_sum_par(a, b, kernel, map)
}

#[cfg(not(feature = "rayon"))]
fn parallel_sum(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    kernel: &GaussianKernel,
    map: Option<&mut ImageViewMut<'_, f32>>,
) -> f64 {
    scalar::image_sum(a, b, kernel, map)
}

fn finish(sum: f64, a: ImageView<'_, u8>) -> f32 {
    (sum / (a.width() * a.height()) as f64) as f32
}

fn check_inputs(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    map: Option<&ImageViewMut<'_, f32>>,
) -> SsimResult<()> {
    let result = if a.width() != b.width() || a.height() != b.height() {
        Err(SsimError::DimensionMismatch {
            a_width: a.width(),
            a_height: a.height(),
            b_width: b.width(),
            b_height: b.height(),
        })
    } else if map.is_some_and(|m| m.width() != a.width() || m.height() != a.height()) {
        Err(SsimError::InvalidInput("map size differs from image size"))
    } else {
        Ok(())
    };
    if let Err(err) = &result {
        report_error!(err);
    }
    result
}

/// Mean SSIM of two equally sized 8-bit images.
pub fn compute_ssim(a: ImageView<'_, u8>, b: ImageView<'_, u8>) -> SsimResult<f32> {
    Ssim::new().compute(a, b)
}

/// Mean SSIM of two equally sized 8-bit images, also filling `map`.
pub fn compute_ssim_map(
    a: ImageView<'_, u8>,
    b: ImageView<'_, u8>,
    map: &mut ImageViewMut<'_, f32>,
) -> SsimResult<f32> {
    Ssim::new().compute_with_map(a, b, map)
}
