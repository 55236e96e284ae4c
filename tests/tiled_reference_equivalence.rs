use ssimtile::{ImageView, ImageViewMut, Ssim};

fn make_pair(width: usize, height: usize) -> (Vec<u8>, Vec<u8>) {
    let mut a = Vec::with_capacity(width * height);
    let mut b = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let base = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            a.push(base as u8);
            let noise = (x * 7 + y * 13) % 23;
            b.push(((base * 3 / 4) + noise + 20).min(255) as u8);
        }
    }
    (a, b)
}

fn assert_paths_agree(width: usize, height: usize) {
    let (a, b) = make_pair(width, height);
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();
    let ssim = Ssim::new();

    let mut tiled_map = vec![0.0f32; width * height];
    let mut map = ImageViewMut::from_slice(&mut tiled_map, width, height).unwrap();
    let tiled = ssim.compute_with_map(va, vb, &mut map).unwrap();

    let mut reference_map = vec![0.0f32; width * height];
    let mut map = ImageViewMut::from_slice(&mut reference_map, width, height).unwrap();
    let reference = ssim.compute_reference(va, vb, Some(&mut map)).unwrap();

    assert!(
        (tiled - reference).abs() < 1e-6,
        "{width}x{height}: tiled {tiled} vs reference {reference}"
    );
    for (idx, (t, r)) in tiled_map.iter().zip(&reference_map).enumerate() {
        assert!(
            (t - r).abs() < 1e-6,
            "{width}x{height}: pixel ({}, {}) tiled {t} vs reference {r}",
            idx % width,
            idx / width
        );
    }
}

#[test]
fn tiled_matches_whole_image_across_tile_seams() {
    assert_paths_agree(150, 97);
}

#[test]
fn tiled_matches_whole_image_for_exact_tile_multiples() {
    assert_paths_agree(128, 64);
}

#[test]
fn tiled_matches_whole_image_for_images_smaller_than_margin() {
    assert_paths_agree(3, 2);
    assert_paths_agree(1, 70);
}

#[test]
fn reference_without_map_matches_tiled_score() {
    let (width, height) = (80, 40);
    let (a, b) = make_pair(width, height);
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();
    let ssim = Ssim::new();

    let tiled = ssim.compute(va, vb).unwrap();
    let reference = ssim.compute_reference(va, vb, None).unwrap();
    assert!((tiled - reference).abs() < 1e-6);
    assert!(tiled < 1.0);
}
