// Copyright 2025 Lars Brubaker
// License: MIT
//
// Geometry types and exact integer predicates.
//
// Public types are generic over the caller's integer width. The engine itself
// works on `IntPoint` (i64 coordinates) and evaluates every slope comparison
// with i128 cross products so results never depend on rounding. Doubles are
// only used transiently for inverse slopes and projected x positions.

use std::fmt::Debug;

use num_traits::{NumCast, PrimInt, Signed};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer types usable as coordinates: any signed primitive integer.
pub trait Coordinate: PrimInt + Signed + NumCast + Debug + 'static {}

impl<T> Coordinate for T where T: PrimInt + Signed + NumCast + Debug + 'static {}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

/// A closed ring (first point repeated last on output) or an open line.
pub type LinearRing<T> = Vec<Point<T>>;
/// Ring 0 is the exterior, any further rings are holes.
pub type Polygon<T> = Vec<LinearRing<T>>;
pub type MultiPolygon<T> = Vec<Polygon<T>>;
pub type LineString<T> = Vec<Point<T>>;
pub type MultiLineString<T> = Vec<LineString<T>>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl<T> BoundingBox<T> {
    pub const fn new(min: Point<T>, max: Point<T>) -> Self {
        BoundingBox { min, max }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointInRing {
    Outside,
    Inside,
    OnBoundary,
}

// ─────────────────────────── Engine-internal coordinates ─────────────────────

/// Engine coordinates.
pub type IntPoint = Point<i64>;

/// Largest accepted coordinate magnitude. Keeps doubled values and i128 cross
/// products of coordinate differences exact.
pub const COORD_LIMIT: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Inverse-slope sentinel for edges with no y extent.
pub(crate) const HORIZONTAL: f64 = -1.0e40;

#[inline]
pub(crate) fn to_int_point<T: Coordinate>(p: &Point<T>) -> Option<IntPoint> {
    Some(IntPoint::new(p.x.to_i64()?, p.y.to_i64()?))
}

/// Round half away from zero.
#[inline]
pub(crate) fn round(v: f64) -> i64 {
    v.round() as i64
}

/// Inverse slope (dx/dy) of the segment pt1 -> pt2.
#[inline]
pub(crate) fn get_dx(pt1: IntPoint, pt2: IntPoint) -> f64 {
    if pt1.y == pt2.y {
        HORIZONTAL
    } else {
        (pt2.x - pt1.x) as f64 / (pt2.y - pt1.y) as f64
    }
}

/// Segment p1-p2 is parallel to p2-p3.
#[inline]
pub(crate) fn slopes_equal3(p1: IntPoint, p2: IntPoint, p3: IntPoint) -> bool {
    (p1.y - p2.y) as i128 * (p2.x - p3.x) as i128 == (p1.x - p2.x) as i128 * (p2.y - p3.y) as i128
}

/// Segment p1-p2 is parallel to p3-p4.
#[inline]
pub(crate) fn slopes_equal4(p1: IntPoint, p2: IntPoint, p3: IntPoint, p4: IntPoint) -> bool {
    (p1.y - p2.y) as i128 * (p3.x - p4.x) as i128 == (p1.x - p2.x) as i128 * (p3.y - p4.y) as i128
}

/// pt2 lies strictly between pt1 and pt3 on their common line.
pub(crate) fn pt2_is_between_pt1_and_pt3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint) -> bool {
    if pt1 == pt3 || pt1 == pt2 || pt3 == pt2 {
        false
    } else if pt1.x != pt3.x {
        (pt2.x > pt1.x) == (pt2.x < pt3.x)
    } else {
        (pt2.y > pt1.y) == (pt2.y < pt3.y)
    }
}

/// Open intervals [a1,a2] and [b1,b2] (either order) share some length.
pub(crate) fn horz_segments_overlap(mut a1: i64, mut a2: i64, mut b1: i64, mut b2: i64) -> bool {
    if a1 > a2 {
        std::mem::swap(&mut a1, &mut a2);
    }
    if b1 > b2 {
        std::mem::swap(&mut b1, &mut b2);
    }
    a1 < b2 && b1 < a2
}

/// Overlap of two x intervals given in either order, if it has length.
pub(crate) fn get_overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> Option<(i64, i64)> {
    let (left, right) = if a1 < a2 {
        if b1 < b2 {
            (a1.max(b1), a2.min(b2))
        } else {
            (a1.max(b2), a2.min(b1))
        }
    } else if b1 < b2 {
        (a2.max(b1), a1.min(b2))
    } else {
        (a2.max(b2), a1.min(b1))
    };
    (left < right).then_some((left, right))
}

/// Sign of the cross product (a - p) x (b - p), computed exactly.
#[inline]
pub(crate) fn cross_sign(p: IntPoint, a: IntPoint, b: IntPoint) -> i32 {
    let d = (a.x - p.x) as i128 * (b.y - p.y) as i128 - (b.x - p.x) as i128 * (a.y - p.y) as i128;
    d.signum() as i32
}

/// Crossing-number test of `pt` against the closed polygon given by the
/// `(current, next)` vertex pairs yielded by `segments`.
pub(crate) fn point_in_segments<I>(pt: IntPoint, segments: I) -> PointInRing
where
    I: IntoIterator<Item = (IntPoint, IntPoint)>,
{
    let mut inside = false;
    for (a, b) in segments {
        if b.y == pt.y && (b.x == pt.x || (a.y == pt.y && ((b.x > pt.x) == (a.x < pt.x)))) {
            return PointInRing::OnBoundary;
        }
        if (a.y < pt.y) != (b.y < pt.y) {
            if a.x >= pt.x {
                if b.x > pt.x {
                    inside = !inside;
                } else {
                    let d = cross_sign(pt, a, b);
                    if d == 0 {
                        return PointInRing::OnBoundary;
                    }
                    if (d > 0) == (b.y > a.y) {
                        inside = !inside;
                    }
                }
            } else if b.x > pt.x {
                let d = cross_sign(pt, a, b);
                if d == 0 {
                    return PointInRing::OnBoundary;
                }
                if (d > 0) == (b.y > a.y) {
                    inside = !inside;
                }
            }
        }
    }
    if inside {
        PointInRing::Inside
    } else {
        PointInRing::Outside
    }
}

// ───────────────────────────── Public helpers ────────────────────────────────

/// Signed area by the shoelace formula; positive for counter-clockwise rings
/// in y-up axes. A repeated closing point contributes nothing.
pub fn area<T: Coordinate>(ring: &[Point<T>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut a = 0.0f64;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xj, yj) = (ring[j].x.to_f64().unwrap_or(0.0), ring[j].y.to_f64().unwrap_or(0.0));
        let (xi, yi) = (ring[i].x.to_f64().unwrap_or(0.0), ring[i].y.to_f64().unwrap_or(0.0));
        a += (xj + xi) * (yj - yi);
        j = i;
    }
    -a * 0.5
}

/// True when the ring winds counter-clockwise (non-negative area).
pub fn orientation<T: Coordinate>(ring: &[Point<T>]) -> bool {
    area(ring) >= 0.0
}

/// Locate `pt` relative to `ring`. The ring may or may not repeat its first
/// point.
pub fn point_in_ring<T: Coordinate>(pt: Point<T>, ring: &[Point<T>]) -> PointInRing {
    let pts: Vec<IntPoint> = ring.iter().filter_map(to_int_point).collect();
    let Some(p) = to_int_point(&pt) else {
        return PointInRing::Outside;
    };
    if pts.len() < 3 {
        return PointInRing::Outside;
    }
    let n = pts.len();
    point_in_segments(p, (0..n).map(|i| (pts[i], pts[(i + 1) % n])))
}
