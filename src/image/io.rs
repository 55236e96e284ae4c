//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{SsimError, SsimResult};
use std::path::Path;

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> SsimResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> SsimResult<OwnedImage> {
    let img = image::open(path).map_err(|err| SsimError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Saves a contiguous SSIM map as an 8-bit grayscale image.
///
/// Scores are clamped to `[0, 1]` and scaled to `[0, 255]`.
pub fn save_map_png<P: AsRef<Path>>(
    path: P,
    map: &[f32],
    width: usize,
    height: usize,
) -> SsimResult<()> {
    let needed = width
        .checked_mul(height)
        .ok_or(SsimError::InvalidDimensions { width, height })?;
    if map.len() < needed {
        return Err(SsimError::BufferTooSmall {
            needed,
            got: map.len(),
        });
    }
    let w = u32::try_from(width).map_err(|_| SsimError::InvalidDimensions { width, height })?;
    let h = u32::try_from(height).map_err(|_| SsimError::InvalidDimensions { width, height })?;
    let pixels: Vec<u8> = map[..needed]
        .iter()
        .map(|&score| (score.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    let Some(img) = image::GrayImage::from_raw(w, h, pixels) else {
        return Err(SsimError::InvalidInput("map buffer does not match dimensions"));
    };
    img.save(path).map_err(|err| SsimError::ImageIo {
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{load_gray_image, save_map_png};
    use crate::util::SsimError;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ssimtile-{}-{name}.png", std::process::id()))
    }

    #[test]
    fn map_png_clamps_and_scales_scores() {
        let path = scratch_path("clamp");
        let map = [-0.5f32, 0.0, 0.5, 1.0, 1.25, 0.2];
        save_map_png(&path, &map, 3, 2).unwrap();

        let loaded = load_gray_image(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        assert_eq!(loaded.data(), &[0, 0, 128, 255, 255, 51]);
    }

    #[test]
    fn short_map_is_rejected_before_writing() {
        let path = scratch_path("short");
        let err = save_map_png(&path, &[1.0f32; 5], 3, 2).err().unwrap();
        assert_eq!(err, SsimError::BufferTooSmall { needed: 6, got: 5 });
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_reports_io_error() {
        let path = scratch_path("missing");
        let err = load_gray_image(&path).err().unwrap();
        assert!(matches!(err, SsimError::ImageIo { .. }));
    }
}
