// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debug artifacts — mask heatmaps, outline overlays and before/after
// comparisons written as PNGs. Best effort: failures are logged, never
// returned.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use richtwerk_core::Point;
use tracing::{debug, warn};

use super::interpret::MaskPlane;

const OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 255]);
const OUTLINE_HALF_WIDTH: i32 = 1;
const GAP: u32 = 8;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique, ordered filename component: UTC time plus a process-wide counter.
pub fn next_stamp() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{seq:06}", Utc::now().format("%Y%m%dT%H%M%S%3fZ"))
}

/// Writer for debug PNGs under one directory.
#[derive(Debug, Clone)]
pub struct DebugArtifacts {
    dir: PathBuf,
}

impl DebugArtifacts {
    /// Create the directory if needed. `None` if it cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Option<Self> {
        let dir = dir.into();
        match std::fs::create_dir_all(&dir) {
            Ok(()) => Some(Self { dir }),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Cannot create debug directory; artifacts disabled");
                None
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_mask(&self, mask: &MaskPlane, stamp: &str) {
        self.save(&mask_heatmap(mask), "mask", stamp);
    }

    pub fn write_outline(&self, source: &RgbaImage, quad: &[Point; 4], stamp: &str) {
        self.save(&outlined(source, quad), "outline", stamp);
    }

    pub fn write_comparison(&self, source: &RgbaImage, quad: &[Point; 4], warped: &RgbaImage, stamp: &str) {
        self.save(&side_by_side(&outlined(source, quad), warped), "compare", stamp);
    }

    fn save(&self, image: &RgbaImage, kind: &str, stamp: &str) {
        let path = self.dir.join(format!("{kind}_{stamp}.png"));
        match image.save(&path) {
            Ok(()) => debug!(path = %path.display(), "Wrote debug artifact"),
            Err(err) => warn!(path = %path.display(), error = %err, "Failed to write debug artifact"),
        }
    }
}

/// Red-tinted visualisation of mask probabilities.
pub fn mask_heatmap(mask: &MaskPlane) -> RgbaImage {
    RgbaImage::from_fn(mask.width() as u32, mask.height() as u32, |x, y| {
        let v = (mask.value(x as usize, y as usize).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([v, v / 3, v / 3, 255])
    })
}

/// Copy of `source` with the closed quadrilateral drawn in red.
pub fn outlined(source: &RgbaImage, quad: &[Point; 4]) -> RgbaImage {
    let mut canvas = source.clone();
    for i in 0..4 {
        let (a, b) = (quad[i], quad[(i + 1) % 4]);
        for d in -OUTLINE_HALF_WIDTH..=OUTLINE_HALF_WIDTH {
            let d = d as f32;
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32 + d, a.y as f32),
                (b.x as f32 + d, b.y as f32),
                OUTLINE,
            );
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32, a.y as f32 + d),
                (b.x as f32, b.y as f32 + d),
                OUTLINE,
            );
        }
    }
    canvas
}

/// Place `left` and `right` next to each other, scaled to a common height.
pub fn side_by_side(left: &RgbaImage, right: &RgbaImage) -> RgbaImage {
    let height = left.height().max(right.height()).max(1);
    let fit = |img: &RgbaImage| {
        if img.height() == height || img.height() == 0 {
            img.clone()
        } else {
            let width = (u64::from(img.width()) * u64::from(height) / u64::from(img.height())).max(1) as u32;
            imageops::resize(img, width, height, FilterType::Triangle)
        }
    };
    let (left, right) = (fit(left), fit(right));

    let mut canvas = RgbaImage::from_pixel(left.width() + GAP + right.width(), height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &left, 0, 0);
    imageops::overlay(&mut canvas, &right, i64::from(left.width() + GAP), 0);
    canvas
}
