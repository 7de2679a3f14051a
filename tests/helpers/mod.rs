// Copyright 2025 Lars Brubaker
// Shared test utilities for vatti-clip tests.

#![allow(dead_code)]

use vatti_clip::{
    area, ClipOptions, ClipType, Clipper, FillType, LinearRing, MultiPolygon, Point, PolygonType,
};

/// Build a ring from `(x, y)` pairs.
pub fn ring(coords: &[(i64, i64)]) -> LinearRing<i64> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Axis-aligned rectangle, counter-clockwise in y-up axes.
pub fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> LinearRing<i64> {
    ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Sum of signed ring areas: exteriors count positive, holes negative.
pub fn total_area(polygons: &MultiPolygon<i64>) -> f64 {
    polygons.iter().flat_map(|p| p.iter()).map(|r| area(r)).sum()
}

pub fn ring_count(polygons: &MultiPolygon<i64>) -> usize {
    polygons.iter().map(|p| p.len()).sum()
}

/// Strictly simple clip; asserts success and a valid, self-touch free
/// result.
pub fn clip_simple(
    subjects: &[LinearRing<i64>],
    clips: &[LinearRing<i64>],
    clip_type: ClipType,
    fill: FillType,
) -> MultiPolygon<i64> {
    let mut c = Clipper::<i64>::with_options(ClipOptions {
        strictly_simple: true,
        ..ClipOptions::default()
    });
    for s in subjects {
        c.add_ring(s, PolygonType::Subject, true);
    }
    for s in clips {
        c.add_ring(s, PolygonType::Clip, true);
    }
    let mut out = Vec::new();
    assert!(c.execute(clip_type, &mut out, fill, fill), "{:?} failed", clip_type);
    verify_valid_output(&out);
    verify_no_repeated_vertex(&out);
    out
}

/// Clip and assert the operation succeeded.
pub fn clip(
    subjects: &[LinearRing<i64>],
    clips: &[LinearRing<i64>],
    clip_type: ClipType,
    subject_fill: FillType,
    clip_fill: FillType,
) -> MultiPolygon<i64> {
    let mut c = Clipper::<i64>::new();
    for s in subjects {
        c.add_ring(s, PolygonType::Subject, true);
    }
    for s in clips {
        c.add_ring(s, PolygonType::Clip, true);
    }
    let mut out = Vec::new();
    assert!(
        c.execute(clip_type, &mut out, subject_fill, clip_fill),
        "{:?} failed",
        clip_type
    );
    verify_valid_output(&out);
    out
}

/// Output contract: closed rings of at least three distinct points,
/// exteriors positive, holes negative, no consecutive duplicates.
pub fn verify_valid_output(polygons: &MultiPolygon<i64>) {
    for (pi, polygon) in polygons.iter().enumerate() {
        assert!(!polygon.is_empty(), "polygon {} has no rings", pi);
        for (ri, r) in polygon.iter().enumerate() {
            assert!(r.len() >= 4, "polygon {} ring {} has {} points", pi, ri, r.len());
            assert_eq!(r.first(), r.last(), "polygon {} ring {} is not closed", pi, ri);
            for w in r.windows(2) {
                assert_ne!(w[0], w[1], "polygon {} ring {} repeats {:?}", pi, ri, w[0]);
            }
            let a = area(r);
            if ri == 0 {
                assert!(a > 0.0, "exterior {} has area {}", pi, a);
            } else {
                assert!(a < 0.0, "hole {} of polygon {} has area {}", ri, pi, a);
            }
        }
    }
}

/// No ring visits the same location twice.
pub fn verify_no_repeated_vertex(polygons: &MultiPolygon<i64>) {
    for polygon in polygons {
        for r in polygon {
            let mut pts = normalise(r);
            let n = pts.len();
            pts.sort();
            pts.dedup();
            assert_eq!(pts.len(), n, "ring repeats a vertex: {:?}", r);
        }
    }
}

/// Distinct vertices of a closed ring, rotated to start at the smallest
/// point so rings can be compared regardless of their starting vertex.
pub fn normalise(r: &LinearRing<i64>) -> Vec<Point<i64>> {
    let mut pts: Vec<Point<i64>> = r.clone();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if let Some(min) = (0..pts.len()).min_by_key(|&i| pts[i]) {
        pts.rotate_left(min);
    }
    pts
}
