use ssimtile::lowlevel::{GaussianKernel, SSIM_RADIUS, SSIM_SIGMA};
use ssimtile::{DefaultAllocator, ImageView, ImageViewMut, OwnedImage, PaddedImage, SsimError};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        SsimError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        SsimError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 2, 3).err().unwrap();
    assert_eq!(
        err,
        SsimError::InvalidStride {
            width: 4,
            step: 1,
            stride: 3,
        }
    );

    // Three samples two apart need at least five elements per row.
    let err = ImageView::with_step(&data, 3, 2, 2, 4).err().unwrap();
    assert_eq!(
        err,
        SsimError::InvalidStride {
            width: 3,
            step: 2,
            stride: 4,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, SsimError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_reads_padded_rows() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 3, 3, 4).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.step(), 1);
    assert_eq!(view.get(2, 1).copied(), Some(6));
    assert_eq!(view.get(0, 2).copied(), Some(8));
    assert!(view.get(3, 0).is_none());
    assert_eq!(view.as_slice(), data.as_slice());
}

#[test]
fn map_view_accepts_interleaved_layout() {
    let mut data = vec![0.0f32; 2 * 8];
    let map = ImageViewMut::with_step(&mut data, 4, 2, 2, 8).unwrap();
    assert_eq!((map.width(), map.height()), (4, 2));
    assert_eq!((map.step(), map.stride()), (2, 8));
    assert_eq!(map.get(3, 1).copied(), Some(0.0));
}

#[test]
fn owned_image_round_trips_through_view() {
    let img = OwnedImage::new(vec![1u8, 2, 3, 4, 5, 6], 3, 2).unwrap();
    let view = img.view();
    assert_eq!(view.width(), 3);
    assert_eq!(view.height(), 2);
    assert_eq!(view.get(1, 1).copied(), Some(5));

    let err = OwnedImage::new(vec![1u8, 2, 3], 2, 2).err().unwrap();
    assert_eq!(err, SsimError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn padded_image_replicates_borders() {
    let data = [10u8, 20, 30];
    let view = ImageView::from_slice(&data, 3, 1).unwrap();
    let img = PaddedImage::from_view_in(DefaultAllocator, view, 2).unwrap();

    assert_eq!(img.width(), 3);
    assert_eq!(img.margin(), 2);
    assert_eq!(img.get(-2, 0), 10.0);
    assert_eq!(img.get(-1, 0), 10.0);
    assert_eq!(img.get(3, 0), 30.0);
    assert_eq!(img.get(4, 0), 30.0);
    assert_eq!(
        img.padded_row(-1),
        &[10.0, 10.0, 10.0, 20.0, 30.0, 30.0, 30.0]
    );
}

#[test]
fn ssim_kernel_is_normalized() {
    let kernel = GaussianKernel::new(SSIM_RADIUS, SSIM_SIGMA).unwrap();
    assert_eq!(kernel.radius(), 5);
    assert_eq!(kernel.sigma(), 1.5);
    let sum: f64 = kernel.weights().iter().map(|&w| f64::from(w)).sum();
    assert!((sum - 1.0).abs() < 1e-6);

    let centre = kernel.weights()[5 * 11 + 5];
    let corner = kernel.weights()[0];
    assert!(centre > corner * 1000.0);
}
