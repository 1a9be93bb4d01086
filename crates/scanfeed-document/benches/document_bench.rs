// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the scanfeed-document crate. Measures the page
// normalizer on a phone-camera-sized synthetic capture, which dominates the
// cost of an export run.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use scanfeed_document::PageNormalizer;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Normalize a 1600x1200 capture to an A4 page at 150 and 300 DPI.
fn bench_normalize(c: &mut Criterion) {
    let (width, height) = (1600u32, 1200u32);
    let color = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    let gray = DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        Luma([((x + y) % 256) as u8])
    }));

    for dpi in [300.0, 150.0] {
        let normalizer = PageNormalizer::new(dpi);
        c.bench_function(&format!("normalize rgb (1600x1200 @ {dpi} dpi)"), |b| {
            b.iter(|| black_box(normalizer.normalize(black_box(&color))));
        });
        c.bench_function(&format!("normalize luma (1600x1200 @ {dpi} dpi)"), |b| {
            b.iter(|| black_box(normalizer.normalize(black_box(&gray))));
        });
    }
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
