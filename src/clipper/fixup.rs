// Copyright 2025 Lars Brubaker
// License: MIT

use super::Engine;
use crate::geom::{pt2_is_between_pt1_and_pt3, slopes_equal3};
use crate::ring::{RingIdx, NO_POINT};

impl Engine {
    /// Remove duplicate, spike and (unless preserved) collinear points from
    /// every live ring. Closed rings left with fewer than three points or no
    /// area are emptied.
    pub(crate) fn fixup_all_rings(&mut self) {
        for r in 0..self.rings.rings.len() as RingIdx {
            let ring = self.rings.ring(r);
            if ring.points == NO_POINT || ring.index != r {
                continue;
            }
            if ring.is_open {
                self.fixup_out_polyline(r);
            } else {
                self.fixup_out_polygon(r);
            }
        }
    }

    fn fixup_out_polygon(&mut self, r: RingIdx) {
        let preserve = self.options.preserve_collinear || self.options.strictly_simple;
        self.rings.ring_mut(r).bottom_point = NO_POINT;
        let rm = &mut self.rings;
        let mut last_ok = NO_POINT;
        let mut pp = rm.ring(r).points;
        loop {
            let (prev, next) = (rm.prev(pp), rm.next(pp));
            if prev == pp || prev == next {
                rm.dispose_points(pp);
                rm.ring_mut(r).points = NO_POINT;
                return;
            }
            let (a, b, c) = (rm.pt(prev), rm.pt(pp), rm.pt(next));
            let collinear =
                slopes_equal3(a, b, c) && (!preserve || !pt2_is_between_pt1_and_pt3(a, b, c));
            if b == c || b == a || collinear {
                last_ok = NO_POINT;
                rm.set_next(prev, next);
                rm.set_prev(next, prev);
                rm.points.free(pp);
                pp = prev;
            } else if pp == last_ok {
                break;
            } else {
                if last_ok == NO_POINT {
                    last_ok = pp;
                }
                pp = next;
            }
        }
        if rm.area2(pp) == 0 {
            // flat, or two lobes of opposite turn that cancel
            rm.dispose_points(pp);
            rm.ring_mut(r).points = NO_POINT;
            return;
        }
        rm.ring_mut(r).points = pp;
    }

    /// Open output only loses consecutive duplicates; a lone remaining point
    /// is dropped.
    fn fixup_out_polyline(&mut self, r: RingIdx) {
        let rm = &mut self.rings;
        let start = rm.ring(r).points;
        let mut pp = start;
        let mut last = rm.prev(start);
        while pp != last {
            pp = rm.next(pp);
            let prev = rm.prev(pp);
            if rm.pt(pp) == rm.pt(prev) {
                if pp == last {
                    last = rm.prev(pp);
                }
                let before = rm.prev(prev);
                rm.set_next(before, pp);
                rm.set_prev(pp, before);
                rm.points.free(prev);
            }
        }
        if pp == rm.prev(pp) {
            rm.dispose_points(pp);
            rm.ring_mut(r).points = NO_POINT;
        } else {
            // the start point may have been freed
            let first = rm.next(pp);
            rm.ring_mut(r).points = first;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::ClipOptions;
    use crate::geom::IntPoint;

    fn ring_with(e: &mut Engine, coords: &[(i64, i64)], open: bool) -> RingIdx {
        let rm = &mut e.rings;
        let r = rm.create_ring();
        rm.ring_mut(r).is_open = open;
        let first = rm.new_point(r, IntPoint::new(coords[0].0, coords[0].1));
        rm.ring_mut(r).points = first;
        let mut last = first;
        for &(x, y) in &coords[1..] {
            last = rm.dup_point(last, true);
            rm.points[last].pt = IntPoint::new(x, y);
        }
        r
    }

    #[test]
    fn collinear_and_duplicate_points_go() {
        let mut e = Engine::new(ClipOptions::default());
        let r = ring_with(&mut e, &[(0, 0), (5, 0), (10, 0), (10, 0), (10, 10), (0, 10)], false);
        e.fixup_all_rings();
        assert_eq!(e.rings.point_count(e.rings.ring(r).points), 4);
        assert!(e.rings.validate().is_ok());
    }

    #[test]
    fn preserved_collinear_points_stay() {
        let mut e = Engine::new(ClipOptions {
            preserve_collinear: true,
            ..ClipOptions::default()
        });
        let r = ring_with(&mut e, &[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)], false);
        e.fixup_all_rings();
        assert_eq!(e.rings.point_count(e.rings.ring(r).points), 5);
    }

    #[test]
    fn spikes_are_removed_even_when_preserving() {
        let mut e = Engine::new(ClipOptions {
            preserve_collinear: true,
            ..ClipOptions::default()
        });
        // (10, 0) -> (15, 0) -> (10, 0) is a spike
        let r = ring_with(&mut e, &[(0, 0), (10, 0), (15, 0), (10, 0), (10, 10), (0, 10)], false);
        e.fixup_all_rings();
        assert_eq!(e.rings.point_count(e.rings.ring(r).points), 4);
    }

    #[test]
    fn flat_ring_is_emptied() {
        let mut e = Engine::new(ClipOptions::default());
        let r = ring_with(&mut e, &[(0, 0), (5, 0), (10, 0)], false);
        e.fixup_all_rings();
        assert_eq!(e.rings.ring(r).points, NO_POINT);
        assert_eq!(e.rings.points.live_count(), 0);
    }

    #[test]
    fn cancelling_lobes_are_emptied() {
        let mut e = Engine::new(ClipOptions {
            preserve_collinear: true,
            ..ClipOptions::default()
        });
        // a figure eight through (1, 1) whose lobes turn opposite ways
        let r = ring_with(&mut e, &[(0, 0), (2, 0), (1, 1), (0, 2), (2, 2), (1, 1)], false);
        e.fixup_all_rings();
        assert_eq!(e.rings.ring(r).points, NO_POINT);
        assert_eq!(e.rings.points.live_count(), 0);
    }

    #[test]
    fn polyline_keeps_collinear_points() {
        let mut e = Engine::new(ClipOptions::default());
        let r = ring_with(&mut e, &[(0, 0), (5, 0), (5, 0), (10, 0)], true);
        e.fixup_all_rings();
        assert_eq!(e.rings.point_count(e.rings.ring(r).points), 3);
    }
}
