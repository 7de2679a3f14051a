// Copyright 2025 Lars Brubaker
// Degenerate input, bounds and input validation.

mod helpers;

use helpers::{rect, ring, total_area};
use vatti_clip::{BoundingBox, ClipError, ClipType, Clipper, FillType, Point, PolygonType};

fn bbox(x0: i64, y0: i64, x1: i64, y1: i64) -> BoundingBox<i64> {
    BoundingBox::new(Point::new(x0, y0), Point::new(x1, y1))
}

#[test]
fn bounds_of_nothing_is_a_zero_box() {
    let c = Clipper::<i64>::new();
    assert_eq!(c.get_bounds(), bbox(0, 0, 0, 0));
}

#[test]
fn bounds_of_one_square() {
    let mut c = Clipper::<i64>::new();
    c.add_ring(&ring(&[(0, 0), (0, 5), (5, 5), (5, 0), (0, 0)]), PolygonType::Subject, true);
    assert_eq!(c.get_bounds(), bbox(0, 0, 5, 5));
}

#[test]
fn bounds_span_subject_and_clip() {
    let mut c = Clipper::<i64>::new();
    c.add_ring(&rect(0, 0, 5, 5), PolygonType::Subject, true);
    c.add_ring(&rect(5, 5, 10, 10), PolygonType::Clip, true);
    assert_eq!(c.get_bounds(), bbox(0, 0, 10, 10));
    c.clear();
    assert_eq!(c.get_bounds(), bbox(0, 0, 0, 0));
}

#[test]
fn bounds_in_a_narrow_coordinate_type() {
    let mut c = Clipper::<i32>::new();
    let r = vec![Point::new(-3i32, 2), Point::new(7, 2), Point::new(7, 9)];
    assert!(c.add_ring(&r, PolygonType::Subject, true));
    assert_eq!(c.get_bounds(), BoundingBox::new(Point::new(-3, 2), Point::new(7, 9)));
}

#[test]
fn too_few_points_are_rejected() {
    let mut c = Clipper::<i64>::new();
    assert!(!c.add_ring(&[], PolygonType::Subject, true));
    assert!(!c.add_ring(&ring(&[(1, 1)]), PolygonType::Subject, true));
    assert!(!c.add_ring(&ring(&[(0, 0), (5, 5)]), PolygonType::Subject, true));
    assert!(!c.add_ring(&ring(&[(0, 0), (5, 5), (5, 5), (0, 0)]), PolygonType::Subject, true));
    assert_eq!(c.get_bounds(), bbox(0, 0, 0, 0));
}

#[test]
fn collinear_and_flat_rings_are_rejected() {
    let mut c = Clipper::<i64>::new();
    assert!(!c.add_ring(&ring(&[(0, 0), (5, 5), (10, 10)]), PolygonType::Subject, true));
    assert!(!c.add_ring(&ring(&[(0, 3), (5, 3), (9, 3)]), PolygonType::Subject, true));
    let mut out = Vec::new();
    assert!(c.execute(ClipType::Union, &mut out, FillType::NonZero, FillType::NonZero));
    assert!(out.is_empty());
}

#[test]
fn duplicate_points_do_not_change_the_result() {
    let noisy = ring(&[(0, 0), (0, 0), (10, 0), (10, 0), (10, 10), (5, 10), (0, 10), (0, 10)]);
    let out = helpers::clip(&[noisy], &[], ClipType::Union, FillType::NonZero, FillType::NonZero);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0][0].len(), 5);
    assert_eq!(total_area(&out), 100.0);
}

#[test]
fn add_polygon_reports_any_success() {
    let mut c = Clipper::<i64>::new();
    let polygon = vec![ring(&[(0, 0), (1, 1)]), rect(0, 0, 4, 4)];
    assert!(c.add_polygon(&polygon, PolygonType::Subject));
    let junk = vec![ring(&[(0, 0), (1, 1)])];
    assert!(!c.add_polygon(&junk, PolygonType::Subject));
}

#[test]
fn coordinates_beyond_the_limit_are_refused() {
    let mut c = Clipper::<i64>::new();
    let r = ring(&[(0, 0), (i64::MIN, 0), (0, 10)]);
    match c.try_add_ring(&r, PolygonType::Subject, true) {
        Err(ClipError::CoordinateOutOfRange { value, .. }) => assert_eq!(value, i64::MIN),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!ClipError::CoordinateOutOfRange { value: 0, limit: 0 }.is_fatal());
}

#[test]
fn large_coordinates_clip_exactly() {
    let big = 1_000_000_000_000i64;
    let out = helpers::clip(
        &[rect(-big, -big, big, big)],
        &[rect(0, 0, 2 * big, 2 * big)],
        ClipType::Intersection,
        FillType::NonZero,
        FillType::NonZero,
    );
    assert_eq!(out.len(), 1);
    assert_eq!(helpers::normalise(&out[0][0]), helpers::normalise(&rect(0, 0, big, big)));
}
