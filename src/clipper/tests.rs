// Copyright 2025 Lars Brubaker
// License: MIT

use super::*;
use crate::geom::area;

fn square(x: i64, y: i64, size: i64) -> LinearRing<i64> {
    vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
    ]
}

fn run(
    subjects: &[LinearRing<i64>],
    clips: &[LinearRing<i64>],
    clip_type: ClipType,
    fill: FillType,
) -> MultiPolygon<i64> {
    let mut c = Clipper::<i64>::new();
    for s in subjects {
        c.add_ring(s, PolygonType::Subject, true);
    }
    for s in clips {
        c.add_ring(s, PolygonType::Clip, true);
    }
    let mut out = Vec::new();
    assert!(c.execute(clip_type, &mut out, fill, fill));
    out
}

fn total_area(mp: &MultiPolygon<i64>) -> f64 {
    mp.iter().flat_map(|p| p.iter()).map(|r| area(r)).sum()
}

#[test]
fn single_square_survives_union() {
    let sq = vec![
        Point::new(0, 0),
        Point::new(0, 5),
        Point::new(5, 5),
        Point::new(5, 0),
        Point::new(0, 0),
    ];
    let out = run(&[sq], &[], ClipType::Union, FillType::EvenOdd);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 1);
    let ring = &out[0][0];
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert_eq!(area(ring), 25.0);
}

#[test]
fn overlapping_squares() {
    let a = square(0, 0, 10);
    let b = square(5, 5, 10);
    let cases = [
        (ClipType::Union, 175.0),
        (ClipType::Intersection, 25.0),
        (ClipType::Difference, 75.0),
        (ClipType::Xor, 150.0),
    ];
    for (clip_type, expected) in cases {
        let out = run(&[a.clone()], &[b.clone()], clip_type, FillType::NonZero);
        assert_eq!(total_area(&out), expected, "{clip_type:?}");
    }
}

#[test]
fn inner_square_becomes_a_hole() {
    let outer = square(0, 0, 20);
    let inner = square(5, 5, 10);
    for clip_type in [ClipType::Difference, ClipType::Xor] {
        let out = run(&[outer.clone()], &[inner.clone()], clip_type, FillType::EvenOdd);
        assert_eq!(out.len(), 1, "{clip_type:?}");
        assert_eq!(out[0].len(), 2, "{clip_type:?}");
        assert_eq!(area(&out[0][0]), 400.0);
        assert_eq!(area(&out[0][1]), -100.0);
    }
}

#[test]
fn disjoint_squares_stay_apart() {
    let out = run(&[square(0, 0, 4), square(10, 0, 4)], &[], ClipType::Union, FillType::NonZero);
    assert_eq!(out.len(), 2);
    assert_eq!(total_area(&out), 32.0);
}

#[test]
fn reverse_output_flips_orientation() {
    let mut c = Clipper::<i64>::with_options(ClipOptions {
        reverse_output: true,
        ..ClipOptions::default()
    });
    c.add_ring(&square(0, 0, 20), PolygonType::Subject, true);
    c.add_ring(&square(5, 5, 10), PolygonType::Clip, true);
    let mut out = Vec::new();
    assert!(c.execute(ClipType::Difference, &mut out, FillType::NonZero, FillType::NonZero));
    assert_eq!(area(&out[0][0]), -400.0);
    assert_eq!(area(&out[0][1]), 100.0);
}

#[test]
fn execute_can_run_repeatedly() {
    let mut c = Clipper::<i64>::new();
    c.add_ring(&square(0, 0, 10), PolygonType::Subject, true);
    c.add_ring(&square(5, 0, 10), PolygonType::Clip, true);
    let mut out = Vec::new();
    assert!(c.execute(ClipType::Intersection, &mut out, FillType::NonZero, FillType::NonZero));
    assert_eq!(total_area(&out), 50.0);
    assert!(c.execute(ClipType::Union, &mut out, FillType::NonZero, FillType::NonZero));
    assert_eq!(total_area(&out), 150.0);
    c.clear();
    assert!(c.execute(ClipType::Union, &mut out, FillType::NonZero, FillType::NonZero));
    assert!(out.is_empty());
}

#[test]
fn open_clip_path_is_refused() {
    let mut c = Clipper::<i64>::new();
    let line = vec![Point::new(0, 0), Point::new(5, 5)];
    assert_eq!(c.try_add_ring(&line, PolygonType::Clip, false), Err(ClipError::OpenClipPath));
    assert!(!c.add_ring(&line, PolygonType::Clip, false));
}

#[test]
fn out_of_range_coordinates_are_refused() {
    let mut c = Clipper::<i64>::new();
    let ring = vec![Point::new(0, 0), Point::new(i64::MAX, 0), Point::new(0, 5)];
    assert!(matches!(
        c.try_add_ring(&ring, PolygonType::Subject, true),
        Err(ClipError::CoordinateOutOfRange { value: i64::MAX, .. })
    ));
}

#[test]
fn narrow_output_type_reports_overflow() {
    let mut c = Clipper::<i64>::new();
    c.add_ring(&square(0, 0, 10), PolygonType::Subject, true);
    c.add_ring(&square(5, 5, 10), PolygonType::Clip, true);
    let ok = c.try_execute(ClipType::Union, FillType::NonZero, FillType::NonZero);
    assert!(ok.is_ok());

    let mut big = Clipper::<i64>::new();
    big.add_ring(&square(0, 0, 100_000), PolygonType::Subject, true);
    let engine_only: ClipResult<Solution<i16>> = {
        let e = &mut big.engine;
        e.clip_type = ClipType::Union;
        e.execute_internal().and_then(|()| e.build_solution::<i16>())
    };
    assert_eq!(engine_only, Err(ClipError::CoordinateOverflow { value: 100_000 }));
}

#[test]
fn rings_are_consistent_after_the_sweep() {
    let mut c = Clipper::<i64>::new();
    c.add_ring(&square(0, 0, 10), PolygonType::Subject, true);
    c.add_ring(&square(3, -2, 4), PolygonType::Clip, true);
    c.add_ring(&square(8, 8, 6), PolygonType::Clip, true);
    let e = &mut c.engine;
    e.clip_type = ClipType::Union;
    e.subject_fill = FillType::NonZero;
    e.clip_fill = FillType::NonZero;
    assert!(e.execute_internal().is_ok());
    assert!(e.rings.validate().is_ok());
    for r in 0..e.rings.rings.len() as crate::ring::RingIdx {
        let ring = e.rings.ring(r);
        if ring.index == r && ring.points != crate::ring::NO_POINT {
            assert!(e.rings.point_count(ring.points) >= 3);
        }
    }
}
