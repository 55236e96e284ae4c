use criterion::{criterion_group, criterion_main, Criterion};
use ssimtile::{ImageView, ImageViewMut, Ssim, SsimConfig};
use std::hint::black_box;

fn make_image(width: usize, height: usize, seed: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13 + seed) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn bench_ssim(c: &mut Criterion) {
    let width = 512;
    let height = 512;
    let a = make_image(width, height, 0);
    let b = make_image(width, height, 3);
    let view_a = ImageView::from_slice(&a, width, height).unwrap();
    let view_b = ImageView::from_slice(&b, width, height).unwrap();

    let serial = Ssim::new();
    c.bench_function("ssim_512_tiled", |bench| {
        bench.iter(|| black_box(serial.compute(view_a, view_b).unwrap()));
    });

    let mut map_data = vec![0.0f32; width * height];
    c.bench_function("ssim_512_tiled_map", |bench| {
        bench.iter(|| {
            let mut map = ImageViewMut::from_slice(&mut map_data, width, height).unwrap();
            black_box(serial.compute_with_map(view_a, view_b, &mut map).unwrap())
        });
    });

    if cfg!(feature = "rayon") {
        let parallel = Ssim::new().with_config(SsimConfig { parallel: true });
        c.bench_function("ssim_512_tiled_parallel", |bench| {
            bench.iter(|| black_box(parallel.compute(view_a, view_b).unwrap()));
        });
    }

    c.bench_function("ssim_512_reference", |bench| {
        bench.iter(|| black_box(serial.compute_reference(view_a, view_b, None).unwrap()));
    });
}

criterion_group!(benches, bench_ssim);
criterion_main!(benches);
