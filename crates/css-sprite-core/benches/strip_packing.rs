use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use css_sprite_core::prelude::*;
use std::hint::black_box;
use image::{DynamicImage, Rgba, RgbaImage};

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("icon_{}.png", i), w, h)
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_layout");
    for count in [10usize, 50, 200] {
        let sprites = generate_sprites(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));
        for direction in [Direction::Vertical, Direction::Horizontal] {
            group.bench_with_input(
                BenchmarkId::new(direction.as_str(), count),
                &sprites,
                |b, sprites| b.iter(|| black_box(pack_layout(sprites.clone(), direction))),
            );
        }
    }
    group.finish();
}

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_composite");
    for count in [10usize, 50] {
        let images: Vec<SourceImage> = generate_sprites(count, 16, 48)
            .into_iter()
            .map(|(key, w, h)| {
                let img = RgbaImage::from_pixel(w, h, Rgba([200, 120, 40, 255]));
                SourceImage::new(key, DynamicImage::ImageRgba8(img))
            })
            .collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("vertical", count), &images, |b, images| {
            b.iter(|| black_box(pack_images(images, Direction::Vertical)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_composite);
criterion_main!(benches);
