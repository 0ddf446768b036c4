//! Benchmarks for sniffhash
//!
//! Run: cargo bench
//! Run specific: cargo bench -- dhash
//! Compare: cargo bench -- --save-baseline v1 && cargo bench -- --baseline v1

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{DynamicImage, Rgb, RgbImage};

use sniffhash::hash::PixelSampler;
use sniffhash::HashAlgorithm;

// ============================================================================
// Signature Sniffing
// ============================================================================

fn benchmark_classify(c: &mut Criterion) {
    let mut mp4 = Vec::new();
    mp4.extend_from_slice(&24u32.to_be_bytes());
    mp4.extend_from_slice(b"ftypisom\x00\x00\x02\x00isommp41");

    let samples: Vec<(&str, Vec<u8>)> = vec![
        ("png", b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec()),
        ("html", b"   \n<!DOCTYPE html><html><body>".to_vec()),
        ("mp4", mp4),
        ("text_512", vec![b'x'; 512]),
        ("unknown", vec![0x01; 512]),
    ];

    let mut group = c.benchmark_group("classify");
    for (name, data) in &samples {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), data, |b, data| {
            b.iter(|| black_box(sniffhash::classify(black_box(data))))
        });
    }
    group.finish();
}

// ============================================================================
// Perceptual Hashing
// ============================================================================

fn photo_like(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x ^ y) as u8, (x * 3) as u8, (y * 5) as u8])
    }))
}

fn benchmark_fingerprints(c: &mut Criterion) {
    let image = photo_like(640, 480);
    let sampler = match PixelSampler::new(&image) {
        Ok(sampler) => sampler,
        Err(e) => panic!("sampler: {}", e),
    };

    let mut group = c.benchmark_group("fingerprint_640x480");
    for side in [8u32, 16, 32].iter() {
        for algorithm in [HashAlgorithm::Average, HashAlgorithm::Difference] {
            let id = BenchmarkId::new(algorithm.name(), side);
            group.bench_with_input(id, side, |b, &side| {
                b.iter(|| black_box(algorithm.compute_sampled(&sampler, side)))
            });
        }
    }
    group.finish();

    c.bench_function("grayscale_640x480", |b| {
        b.iter(|| black_box(PixelSampler::new(black_box(&image))))
    });
}

criterion_group!(benches, benchmark_classify, benchmark_fingerprints);
criterion_main!(benches);
