// Copyright 2025 Lars Brubaker
// Boolean operation correctness with area verification.

mod helpers;

use helpers::{clip, normalise, rect, ring, ring_count, total_area};
use vatti_clip::{area, ClipType, FillType, Point};

const NZ: FillType = FillType::NonZero;
const EO: FillType = FillType::EvenOdd;

#[test]
fn union_of_square_with_itself() {
    let sq = ring(&[(0, 0), (0, 5), (5, 5), (5, 0), (0, 0)]);
    let out = clip(&[sq.clone()], &[sq], ClipType::Union, EO, EO);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 1);
    assert_eq!(out[0][0].len(), 5);
    assert_eq!(area(&out[0][0]), 25.0);
}

#[test]
fn union_returns_the_input_square() {
    let sq = rect(0, 0, 5, 5);
    let out = clip(&[sq.clone()], &[], ClipType::Union, NZ, NZ);
    assert_eq!(normalise(&out[0][0]), normalise(&sq));
}

#[test]
fn overlapping_rectangles_all_operations() {
    let a = rect(0, 0, 10, 10);
    let b = rect(5, 5, 15, 15);
    assert_eq!(total_area(&clip(&[a.clone()], &[b.clone()], ClipType::Union, NZ, NZ)), 175.0);
    assert_eq!(total_area(&clip(&[a.clone()], &[b.clone()], ClipType::Intersection, NZ, NZ)), 25.0);
    assert_eq!(total_area(&clip(&[a.clone()], &[b.clone()], ClipType::Difference, NZ, NZ)), 75.0);
    assert_eq!(total_area(&clip(&[b.clone()], &[a.clone()], ClipType::Difference, NZ, NZ)), 75.0);
    assert_eq!(total_area(&clip(&[a], &[b], ClipType::Xor, NZ, NZ)), 150.0);
}

#[test]
fn intersection_is_the_overlap_rectangle() {
    let out = clip(&[rect(0, 0, 10, 10)], &[rect(5, 5, 15, 15)], ClipType::Intersection, NZ, NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(normalise(&out[0][0]), normalise(&rect(5, 5, 10, 10)));
}

#[test]
fn contained_clip_is_a_hole_of_the_difference() {
    let out = clip(&[rect(0, 0, 20, 20)], &[rect(5, 5, 15, 15)], ClipType::Difference, NZ, NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 2);
    assert_eq!(area(&out[0][0]), 400.0);
    assert_eq!(area(&out[0][1]), -100.0);
}

#[test]
fn xor_with_interior_square_detects_the_hole() {
    let out = clip(&[rect(0, 0, 20, 20)], &[rect(5, 5, 15, 15)], ClipType::Xor, EO, EO);
    assert_eq!(out.len(), 1);
    assert_eq!(ring_count(&out), 2);
    assert_eq!(total_area(&out), 300.0);
}

#[test]
fn intersection_of_disjoint_shapes_is_empty() {
    let out = clip(&[rect(0, 0, 4, 4)], &[rect(10, 10, 14, 14)], ClipType::Intersection, NZ, NZ);
    assert!(out.is_empty());
}

#[test]
fn union_of_edge_sharing_squares_merges_them() {
    let out = clip(&[rect(0, 0, 10, 10)], &[rect(10, 0, 20, 10)], ClipType::Union, NZ, NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 1);
    assert_eq!(area(&out[0][0]), 200.0);
    assert_eq!(normalise(&out[0][0]), normalise(&rect(0, 0, 20, 10)));
}

#[test]
fn triangle_clipped_by_rectangle() {
    let tri = ring(&[(0, 0), (20, 0), (10, 20)]);
    let out = clip(&[tri], &[rect(0, 0, 20, 10)], ClipType::Intersection, NZ, NZ);
    // trapezoid under y = 10: parallel sides 20 and 10
    assert_eq!(out.len(), 1);
    assert_eq!(total_area(&out), 150.0);
    let pts = normalise(&out[0][0]);
    assert_eq!(pts.len(), 4);
    assert!(pts.contains(&Point::new(5, 10)));
    assert!(pts.contains(&Point::new(15, 10)));
}

#[test]
fn difference_splits_a_bar_in_two() {
    let out = clip(&[rect(0, 0, 30, 10)], &[rect(10, -5, 20, 15)], ClipType::Difference, NZ, NZ);
    assert_eq!(out.len(), 2);
    assert_eq!(total_area(&out), 200.0);
}

#[test]
fn many_subjects_union() {
    let subjects: Vec<_> = (0..5).map(|i| rect(i * 8, 0, i * 8 + 10, 10)).collect();
    let out = clip(&subjects, &[], ClipType::Union, NZ, NZ);
    assert_eq!(out.len(), 1);
    assert_eq!(total_area(&out), 420.0);
}

#[test]
fn xor_drops_rings_whose_lobes_cancel() {
    let a = ring(&[(24, 35), (21, 14), (23, 29), (26, 30), (1, 0), (11, 7), (8, 37), (8, 5)]);
    let b = ring(&[(12, 13), (4, 36), (7, 38), (37, 9), (28, 39), (20, 37), (33, 35)]);
    let out = clip(&[a], &[b], ClipType::Xor, EO, EO);
    for polygon in &out {
        assert!(area(&polygon[0]) > 0.0);
    }
}
