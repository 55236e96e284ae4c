//! Owned contiguous grayscale images.

use crate::image::ImageView;
use crate::util::{SsimError, SsimResult};

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> SsimResult<Self> {
        if width == 0 || height == 0 {
            return Err(SsimError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(SsimError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(SsimError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(SsimError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided or stepped) view into a contiguous image.
    pub fn from_view(view: ImageView<'_, u8>) -> SsimResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            data.extend(view.row_span(y).iter().step_by(view.step()).copied());
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the contiguous sample buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            step: 1,
            stride: self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OwnedImage;
    use crate::image::ImageView;
    use crate::util::SsimError;

    #[test]
    fn from_view_packs_stepped_samples() {
        let data: Vec<u8> = (0u8..12).collect();
        let view = ImageView::with_step(&data, 2, 2, 2, 6).unwrap();
        let owned = OwnedImage::from_view(view).unwrap();
        assert_eq!(owned.data(), &[0u8, 2, 6, 8]);
        assert_eq!(owned.view().stride(), 2);
    }

    #[test]
    fn rejects_oversized_buffers() {
        let err = OwnedImage::new(vec![0u8; 5], 2, 2).err().unwrap();
        assert_eq!(
            err,
            SsimError::InvalidDimensions {
                width: 2,
                height: 2,
            }
        );
    }
}
