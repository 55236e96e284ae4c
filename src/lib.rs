//! ssimtile computes the Structural Similarity Index (SSIM) of two 8-bit
//! grayscale images.
//!
//! The image is processed in 64x64 tiles. Each tile is copied with a 5-pixel
//! replicated border into stack buffers, squared and cross products are
//! formed, all five quantities are blurred with an 11x11 Gaussian
//! (sigma 1.5), and the per-pixel SSIM values are combined in double
//! precision. The score is the mean over all pixels; a per-pixel map can be
//! written into a caller-owned buffer. Tile bands run in parallel with the
//! optional `rayon` feature.

pub mod filter;
pub mod gaussian;
pub mod image;
pub mod lowlevel;
pub mod memory;
pub mod ssim;
mod tile;
mod trace;
pub mod util;

pub use crate::gaussian::GaussianKernel;
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, ImageViewMut, OwnedImage, PaddedImage};
pub use crate::memory::{DefaultAllocator, SsimAllocator};
pub use crate::ssim::{compute_ssim, compute_ssim_map, Ssim, SsimConfig};
pub use crate::util::{SsimError, SsimResult};
