// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the geometry and warping engine in the
// richtwerk-document crate: minimum-area rectangle over a dense mask's
// foreground and the inverse perspective warp.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use richtwerk_core::Point;
use richtwerk_document::{minimum_area_rectangle, warp_perspective};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Minimum-area rectangle over every pixel of a rotated 300x200 block, the
/// point count a 512x512 mask with ~23% coverage produces.
fn bench_minimum_area_rectangle(c: &mut Criterion) {
    let (sin, cos) = 12.0f64.to_radians().sin_cos();
    let mut points = Vec::with_capacity(300 * 200);
    for y in 0..200 {
        for x in 0..300 {
            let (dx, dy) = (f64::from(x) - 150.0, f64::from(y) - 100.0);
            points.push(Point::new(256.0 + dx * cos - dy * sin, 256.0 + dx * sin + dy * cos));
        }
    }

    c.bench_function("minimum_area_rectangle (60k points)", |b| {
        b.iter(|| black_box(minimum_area_rectangle(black_box(&points))));
    });
}

/// Warp a tilted quadrilateral of a 1024x768 photo onto a 736x1024 canvas.
fn bench_warp_perspective(c: &mut Criterion) {
    let source = RgbaImage::from_fn(1024, 768, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]));
    let quad = [
        Point::new(180.0, 60.0),
        Point::new(860.0, 110.0),
        Point::new(900.0, 720.0),
        Point::new(120.0, 690.0),
    ];

    c.bench_function("warp_perspective (736x1024)", |b| {
        b.iter(|| black_box(warp_perspective(black_box(&source), &quad, 736, 1024)));
    });
}

criterion_group!(benches, bench_minimum_area_rectangle, bench_warp_perspective);
criterion_main!(benches);
