// Copyright 2025 Lars Brubaker
// Property tests over random rectangles, triangles and tangled rings.

mod helpers;

use helpers::{
    clip, normalise, rect, ring, total_area, verify_no_repeated_vertex, verify_valid_output,
};
use proptest::prelude::*;
use vatti_clip::{area, ClipOptions, ClipType, Clipper, FillType, LinearRing, PolygonType};

const NZ: FillType = FillType::NonZero;

#[derive(Debug, Clone, Copy)]
struct Rect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Rect {
    fn area(&self) -> f64 {
        ((self.x1 - self.x0) * (self.y1 - self.y0)) as f64
    }

    fn overlap(&self, o: &Rect) -> f64 {
        let w = (self.x1.min(o.x1) - self.x0.max(o.x0)).max(0);
        let h = (self.y1.min(o.y1) - self.y0.max(o.y0)).max(0);
        (w * h) as f64
    }

    fn ring(&self) -> vatti_clip::LinearRing<i64> {
        rect(self.x0, self.y0, self.x1, self.y1)
    }
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-50i64..50, -50i64..50, 1i64..40, 1i64..40).prop_map(|(x, y, w, h)| Rect {
        x0: x,
        y0: y,
        x1: x + w,
        y1: y + h,
    })
}

/// Rings of three to eight vertices in a small box, so edges cross, overlap
/// and share vertices often.
fn tangled_ring() -> impl Strategy<Value = LinearRing<i64>> {
    prop::collection::vec((0i64..40, 0i64..40), 3..9).prop_map(|pts| ring(&pts))
}

fn any_clip_type() -> impl Strategy<Value = ClipType> {
    prop_oneof![
        Just(ClipType::Intersection),
        Just(ClipType::Union),
        Just(ClipType::Difference),
        Just(ClipType::Xor),
    ]
}

fn any_fill() -> impl Strategy<Value = FillType> {
    prop_oneof![Just(FillType::EvenOdd), Just(FillType::NonZero)]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn tangled_rings_give_oriented_output(
        a in tangled_ring(),
        b in tangled_ring(),
        clip_type in any_clip_type(),
        fill in any_fill(),
        strictly_simple in any::<bool>(),
    ) {
        let mut c = Clipper::<i64>::with_options(ClipOptions {
            strictly_simple,
            ..ClipOptions::default()
        });
        c.add_ring(&a, PolygonType::Subject, true);
        c.add_ring(&b, PolygonType::Clip, true);
        match c.try_execute(clip_type, fill, fill) {
            Ok(solution) => {
                verify_valid_output(&solution.polygons);
                if strictly_simple {
                    verify_no_repeated_vertex(&solution.polygons);
                }
            }
            Err(e) => prop_assert!(!e.is_fatal(), "{}", e),
        }
    }

    #[test]
    fn single_rectangle_round_trips(r in rect_strategy()) {
        let out = clip(&[r.ring()], &[], ClipType::Union, NZ, NZ);
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(normalise(&out[0][0]), normalise(&r.ring()));
    }

    #[test]
    fn two_rectangle_areas_add_up(a in rect_strategy(), b in rect_strategy()) {
        let overlap = a.overlap(&b);
        let union = total_area(&clip(&[a.ring()], &[b.ring()], ClipType::Union, NZ, NZ));
        let inter = total_area(&clip(&[a.ring()], &[b.ring()], ClipType::Intersection, NZ, NZ));
        let diff = total_area(&clip(&[a.ring()], &[b.ring()], ClipType::Difference, NZ, NZ));
        let xor = total_area(&clip(&[a.ring()], &[b.ring()], ClipType::Xor, NZ, NZ));
        prop_assert_eq!(inter, overlap);
        prop_assert_eq!(union, a.area() + b.area() - overlap);
        prop_assert_eq!(diff, a.area() - overlap);
        prop_assert_eq!(xor, a.area() + b.area() - 2.0 * overlap);
    }

    #[test]
    fn union_of_many_rectangles_is_bounded(rects in prop::collection::vec(rect_strategy(), 1..8)) {
        let rings: Vec<_> = rects.iter().map(Rect::ring).collect();
        let out = clip(&rings, &[], ClipType::Union, NZ, NZ);
        let got = total_area(&out);
        let largest = rects.iter().map(Rect::area).fold(0.0, f64::max);
        let sum: f64 = rects.iter().map(Rect::area).sum();
        prop_assert!(got >= largest, "union {} smaller than largest input {}", got, largest);
        prop_assert!(got <= sum, "union {} larger than input total {}", got, sum);
    }

    #[test]
    fn union_is_idempotent(rects in prop::collection::vec(rect_strategy(), 1..6)) {
        let rings: Vec<_> = rects.iter().map(Rect::ring).collect();
        let once = clip(&rings, &[], ClipType::Union, NZ, NZ);
        let flat: Vec<_> = once.iter().flat_map(|p| p.iter().cloned()).collect();
        let twice = clip(&flat, &[], ClipType::Union, NZ, NZ);
        prop_assert_eq!(total_area(&once), total_area(&twice));
    }

    #[test]
    fn triangle_area_is_preserved(
        a in (-100i64..100, -100i64..100),
        b in (-100i64..100, -100i64..100),
        c in (-100i64..100, -100i64..100),
    ) {
        let tri = ring(&[a, b, c]);
        let expected = area(&tri).abs();
        prop_assume!(expected > 0.0);
        let out = clip(&[tri], &[], ClipType::Union, NZ, NZ);
        prop_assert_eq!(total_area(&out), expected);
    }
}
