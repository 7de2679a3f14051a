// Copyright 2025 Lars Brubaker
// License: MIT
//
// Output point creation during the sweep, ring merging at local maxima, and
// the post-sweep pass that stitches or splits rings along recorded joins.

use super::{Engine, Join};
use crate::active::Direction;
use crate::edge::{EdgeIdx, EdgeSide, EDGE_UNASSIGNED, NIL};
use crate::geom::{get_overlap, slopes_equal3, slopes_equal4, IntPoint};
use crate::ring::{PointIdx, RingIdx, NO_POINT, NO_RING};

impl Engine {
    #[inline]
    fn edge_ring(&self, e: EdgeIdx) -> RingIdx {
        self.edges[e].ring as RingIdx
    }

    /// Add `pt` to the ring owned by `e`, creating the ring when `e` owns
    /// none. Left edges extend the front, right edges the back.
    pub(crate) fn add_out_pt(&mut self, e: EdgeIdx, pt: IntPoint) -> PointIdx {
        if !self.edges[e].owns_ring() {
            let r = self.rings.create_ring();
            let open = self.edges[e].is_open();
            self.rings.ring_mut(r).is_open = open;
            let p = self.rings.new_point(r, pt);
            self.rings.ring_mut(r).points = p;
            if !open {
                self.set_hole_state(e, r);
            }
            self.edges[e].ring = r as i32;
            return p;
        }
        let r = self.edge_ring(e);
        let op = self.rings.ring(r).points;
        let to_front = self.edges[e].side == EdgeSide::Left;
        if to_front && pt == self.rings.pt(op) {
            return op;
        }
        let back = self.rings.prev(op);
        if !to_front && pt == self.rings.pt(back) {
            return back;
        }
        let p = self.rings.dup_point(op, false);
        self.rings.points[p].pt = pt;
        self.rings.points[p].ring = r;
        if to_front {
            self.rings.ring_mut(r).points = p;
        }
        p
    }

    pub(crate) fn last_out_pt(&self, e: EdgeIdx) -> PointIdx {
        let r = self.edge_ring(e);
        let op = self.rings.ring(r).points;
        if self.edges[e].side == EdgeSide::Left {
            op
        } else {
            self.rings.prev(op)
        }
    }

    /// Nesting of a new ring from the contributing closed edges to the left
    /// of `e`: an odd number of distinct rings there makes it a hole.
    fn set_hole_state(&mut self, e: EdgeIdx, ring: RingIdx) {
        let mut e2 = self.edges[e].prev_in_ael;
        let mut tmp = NIL;
        while e2 != NIL {
            let edge = &self.edges[e2];
            if edge.owns_ring() && edge.winding_delta != 0 {
                if tmp == NIL {
                    tmp = e2;
                } else if self.edges[tmp].ring == edge.ring {
                    tmp = NIL;
                }
            }
            e2 = self.edges[e2].prev_in_ael;
        }
        if tmp == NIL {
            let r = self.rings.ring_mut(ring);
            r.first_left = NO_RING;
            r.is_hole = false;
        } else {
            let fl = self.edge_ring(tmp);
            let hole = !self.rings.ring(fl).is_hole;
            let r = self.rings.ring_mut(ring);
            r.first_left = fl;
            r.is_hole = hole;
        }
    }

    pub(crate) fn add_local_min_poly(
        &mut self,
        e1: EdgeIdx,
        e2: EdgeIdx,
        pt: IntPoint,
    ) -> PointIdx {
        let result;
        let e;
        let prev_e;
        if self.edges[e2].is_horizontal() || self.edges[e1].dx > self.edges[e2].dx {
            result = self.add_out_pt(e1, pt);
            self.edges[e2].ring = self.edges[e1].ring;
            self.edges[e1].side = EdgeSide::Left;
            self.edges[e2].side = EdgeSide::Right;
            e = e1;
            prev_e = if self.edges[e].prev_in_ael == e2 {
                self.edges[e2].prev_in_ael
            } else {
                self.edges[e].prev_in_ael
            };
        } else {
            result = self.add_out_pt(e2, pt);
            self.edges[e1].ring = self.edges[e2].ring;
            self.edges[e1].side = EdgeSide::Right;
            self.edges[e2].side = EdgeSide::Left;
            e = e2;
            prev_e = if self.edges[e].prev_in_ael == e1 {
                self.edges[e1].prev_in_ael
            } else {
                self.edges[e].prev_in_ael
            };
        }

        if prev_e != NIL
            && self.edges[prev_e].owns_ring()
            && self.edges[prev_e].top.y < pt.y
            && self.edges[e].top.y < pt.y
        {
            let x_prev = self.edges[prev_e].top_x(pt.y);
            let x_e = self.edges[e].top_x(pt.y);
            if x_prev == x_e
                && self.edges[e].winding_delta != 0
                && self.edges[prev_e].winding_delta != 0
                && slopes_equal4(
                    IntPoint::new(x_prev, pt.y),
                    self.edges[prev_e].top,
                    IntPoint::new(x_e, pt.y),
                    self.edges[e].top,
                )
            {
                let op = self.add_out_pt(prev_e, pt);
                let top = self.edges[e].top;
                self.add_join(result, op, top);
            }
        }
        result
    }

    pub(crate) fn add_local_max_poly(
        &mut self,
        e1: EdgeIdx,
        e2: EdgeIdx,
        pt: IntPoint,
    ) -> PointIdx {
        let result = self.add_out_pt(e1, pt);
        if self.edges[e2].winding_delta == 0 {
            self.add_out_pt(e2, pt);
        }
        let (r1, r2) = (self.edges[e1].ring, self.edges[e2].ring);
        if r1 == r2 {
            self.edges[e1].ring = EDGE_UNASSIGNED;
            self.edges[e2].ring = EDGE_UNASSIGNED;
        } else if r1 < r2 {
            self.append_polygon(e1, e2);
        } else {
            self.append_polygon(e2, e1);
        }
        result
    }

    /// Splice the ring of `e2` onto the ring of `e1` where the two edges
    /// meet at a local maximum.
    fn append_polygon(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let r1 = self.edge_ring(e1);
        let r2 = self.edge_ring(e2);

        let hole_state = if self.rings.ring1_right_of_ring2(r1, r2) {
            r2
        } else if self.rings.ring1_right_of_ring2(r2, r1) {
            r1
        } else {
            self.rings.lowermost_ring(r1, r2)
        };

        let p1_lft = self.rings.ring(r1).points;
        let p1_rt = self.rings.prev(p1_lft);
        let p2_lft = self.rings.ring(r2).points;
        let p2_rt = self.rings.prev(p2_lft);
        let rm = &mut self.rings;

        if self.edges[e1].side == EdgeSide::Left {
            if self.edges[e2].side == EdgeSide::Left {
                // z y x a b c
                rm.reverse_links(p2_lft);
                rm.set_next(p2_lft, p1_lft);
                rm.set_prev(p1_lft, p2_lft);
                rm.set_next(p1_rt, p2_rt);
                rm.set_prev(p2_rt, p1_rt);
                rm.ring_mut(r1).points = p2_rt;
            } else {
                // x y z a b c
                rm.set_next(p2_rt, p1_lft);
                rm.set_prev(p1_lft, p2_rt);
                rm.set_prev(p2_lft, p1_rt);
                rm.set_next(p1_rt, p2_lft);
                rm.ring_mut(r1).points = p2_lft;
            }
        } else if self.edges[e2].side == EdgeSide::Right {
            // a b c z y x
            rm.reverse_links(p2_lft);
            rm.set_next(p1_rt, p2_rt);
            rm.set_prev(p2_rt, p1_rt);
            rm.set_next(p2_lft, p1_lft);
            rm.set_prev(p1_lft, p2_lft);
        } else {
            // a b c x y z
            rm.set_next(p1_rt, p2_lft);
            rm.set_prev(p2_lft, p1_rt);
            rm.set_prev(p1_lft, p2_rt);
            rm.set_next(p2_rt, p1_lft);
        }

        rm.ring_mut(r1).bottom_point = NO_POINT;
        let fl2 = rm.ring(r2).first_left;
        if hole_state == r2 {
            let hole2 = rm.ring(r2).is_hole;
            if rm.parse_first_left(fl2) != r1 {
                rm.set_first_left(r1, fl2);
            }
            rm.ring_mut(r1).is_hole = hole2;
        }
        let obsolete = rm.ring_mut(r2);
        obsolete.points = NO_POINT;
        obsolete.bottom_point = NO_POINT;
        obsolete.first_left = r1;

        let ok_idx = self.edges[e1].ring;
        let obsolete_idx = self.edges[e2].ring;
        self.edges[e1].ring = EDGE_UNASSIGNED;
        self.edges[e2].ring = EDGE_UNASSIGNED;

        let side = self.edges[e1].side;
        let mut e = self.edges.active;
        while e != NIL {
            if self.edges[e].ring == obsolete_idx {
                self.edges[e].ring = ok_idx;
                self.edges[e].side = side;
                break;
            }
            e = self.edges.next_in_ael(e, Direction::LeftToRight);
        }
        let survivor = self.rings.ring(r1).index;
        self.rings.ring_mut(r2).index = survivor;
        self.rings.drop_self_parent(r1, fl2);
    }

    pub(crate) fn add_join(&mut self, p1: PointIdx, p2: PointIdx, off_pt: IntPoint) {
        self.joins.push(Join { p1, p2, off_pt });
    }

    pub(crate) fn add_ghost_join(&mut self, p: PointIdx, off_pt: IntPoint) {
        self.ghost_joins.push(Join {
            p1: p,
            p2: NO_POINT,
            off_pt,
        });
    }

    // ─────────────────────────── Post-sweep joins ────────────────────────────────

    pub(crate) fn join_common_edges(&mut self) {
        for i in 0..self.joins.len() {
            let mut join = self.joins[i];
            let r1 = self.rings.ring_of(join.p1);
            let mut r2 = self.rings.ring_of(join.p2);

            if self.rings.ring(r1).points == NO_POINT || self.rings.ring(r2).points == NO_POINT {
                continue;
            }
            if self.rings.ring(r1).is_open || self.rings.ring(r2).is_open {
                continue;
            }

            let hole_state = if r1 == r2 {
                r1
            } else if self.rings.ring1_right_of_ring2(r1, r2) {
                r2
            } else if self.rings.ring1_right_of_ring2(r2, r1) {
                r1
            } else {
                self.rings.lowermost_ring(r1, r2)
            };

            if !self.join_points(&mut join, r1, r2) {
                continue;
            }

            if r1 == r2 {
                // one ring became two
                self.rings.ring_mut(r1).points = join.p1;
                self.rings.ring_mut(r1).bottom_point = NO_POINT;
                r2 = self.rings.create_ring();
                self.rings.ring_mut(r2).points = join.p2;
                self.rings.update_point_rings(r2);
                self.classify_split(r1, r2);
            } else {
                // two rings became one
                let rm = &mut self.rings;
                let fl2 = rm.ring(r2).first_left;
                rm.ring_mut(r2).points = NO_POINT;
                rm.ring_mut(r2).bottom_point = NO_POINT;
                let survivor = rm.ring(r1).index;
                rm.ring_mut(r2).index = survivor;
                let hole = rm.ring(hole_state).is_hole;
                rm.ring_mut(r1).is_hole = hole;
                if hole_state == r2 {
                    rm.set_first_left(r1, fl2);
                }
                rm.ring_mut(r2).first_left = r1;
                rm.drop_self_parent(r1, fl2);
                self.fixup_first_lefts3(r2, r1);
            }
        }
    }

    /// Assign hole state and parents after `r1` was split into `r1` and the
    /// new ring `r2`, and orient whichever ring changed role.
    pub(crate) fn classify_split(&mut self, r1: RingIdx, r2: RingIdx) {
        let reverse = self.options.reverse_output;
        let (p1, p2) = (self.rings.ring(r1).points, self.rings.ring(r2).points);
        if self.rings.poly2_contains_poly1(p2, p1) {
            // r2 inside r1
            let hole = !self.rings.ring(r1).is_hole;
            self.rings.ring_mut(r2).is_hole = hole;
            self.rings.set_first_left(r2, r1);
            self.fixup_first_lefts2(r2, r1);
            if (hole ^ reverse) == (self.rings.ring_area(r2) > 0.0) {
                self.rings.reverse_links(p2);
            }
        } else if self.rings.poly2_contains_poly1(p1, p2) {
            // r1 inside r2
            let hole1 = self.rings.ring(r1).is_hole;
            let fl1 = self.rings.ring(r1).first_left;
            self.rings.ring_mut(r2).is_hole = hole1;
            self.rings.ring_mut(r1).is_hole = !hole1;
            self.rings.set_first_left(r2, fl1);
            self.rings.set_first_left(r1, r2);
            self.fixup_first_lefts2(r1, r2);
            if (!hole1 ^ reverse) == (self.rings.ring_area(r1) > 0.0) {
                self.rings.reverse_links(p1);
            }
        } else {
            let hole1 = self.rings.ring(r1).is_hole;
            let fl1 = self.rings.ring(r1).first_left;
            self.rings.ring_mut(r2).is_hole = hole1;
            self.rings.set_first_left(r2, fl1);
            self.fixup_first_lefts1(r1, r2);
        }
    }

    /// Splice along a join. Three kinds: strictly-simple touches (both points
    /// and the off point coincide), horizontal overlaps, and overlaps of
    /// collinear non-horizontal edges starting at a common bottom point.
    fn join_points(&mut self, join: &mut Join, r1: RingIdx, r2: RingIdx) -> bool {
        let mut op1 = join.p1;
        let mut op2 = join.p2;
        let off = join.off_pt;
        let rm = &mut self.rings;
        let is_horizontal = rm.pt(op1).y == off.y;

        if is_horizontal && off == rm.pt(op1) && off == rm.pt(op2) {
            if r1 != r2 {
                return false;
            }
            let mut op1b = rm.next(op1);
            while op1b != op1 && rm.pt(op1b) == off {
                op1b = rm.next(op1b);
            }
            let reverse1 = rm.pt(op1b).y > off.y;
            let mut op2b = rm.next(op2);
            while op2b != op2 && rm.pt(op2b) == off {
                op2b = rm.next(op2b);
            }
            let reverse2 = rm.pt(op2b).y > off.y;
            if reverse1 == reverse2 {
                return false;
            }
            join.p2 = self.cross_link(op1, op2, reverse1);
            return true;
        }

        if is_horizontal {
            // extend both points to the ends of their horizontal runs
            let mut op1b = op1;
            while rm.pt(rm.prev(op1)).y == rm.pt(op1).y
                && rm.prev(op1) != op1b
                && rm.prev(op1) != op2
            {
                op1 = rm.prev(op1);
            }
            while rm.pt(rm.next(op1b)).y == rm.pt(op1b).y
                && rm.next(op1b) != op1
                && rm.next(op1b) != op2
            {
                op1b = rm.next(op1b);
            }
            if rm.next(op1b) == op1 || rm.next(op1b) == op2 {
                return false;
            }
            let mut op2b = op2;
            while rm.pt(rm.prev(op2)).y == rm.pt(op2).y
                && rm.prev(op2) != op2b
                && rm.prev(op2) != op1b
            {
                op2 = rm.prev(op2);
            }
            while rm.pt(rm.next(op2b)).y == rm.pt(op2b).y
                && rm.next(op2b) != op2
                && rm.next(op2b) != op1
            {
                op2b = rm.next(op2b);
            }
            if rm.next(op2b) == op2 || rm.next(op2b) == op1 {
                return false;
            }

            let (a1, a1b, a2, a2b) = (rm.pt(op1), rm.pt(op1b), rm.pt(op2), rm.pt(op2b));
            let Some((left, right)) = get_overlap(a1.x, a1b.x, a2.x, a2b.x) else {
                return false;
            };

            // the spike created by the join is cut on the side away from op1
            // and op2, which other joins may still need
            let (pt, discard_left) = if a1.x >= left && a1.x <= right {
                (a1, a1.x > a1b.x)
            } else if a2.x >= left && a2.x <= right {
                (a2, a2.x > a2b.x)
            } else if a1b.x >= left && a1b.x <= right {
                (a1b, a1b.x > a1.x)
            } else {
                (a2b, a2b.x > a2.x)
            };
            join.p1 = op1;
            join.p2 = op2;
            return self.join_horz(op1, op1b, op2, op2b, pt, discard_left);
        }

        // both rings must run along the shared edge in opposite directions
        let mut op1b = rm.next(op1);
        while rm.pt(op1b) == rm.pt(op1) && op1b != op1 {
            op1b = rm.next(op1b);
        }
        let reverse1 = rm.pt(op1b).y > rm.pt(op1).y || !slopes_equal3(rm.pt(op1), rm.pt(op1b), off);
        if reverse1 {
            op1b = rm.prev(op1);
            while rm.pt(op1b) == rm.pt(op1) && op1b != op1 {
                op1b = rm.prev(op1b);
            }
            if rm.pt(op1b).y > rm.pt(op1).y || !slopes_equal3(rm.pt(op1), rm.pt(op1b), off) {
                return false;
            }
        }
        let mut op2b = rm.next(op2);
        while rm.pt(op2b) == rm.pt(op2) && op2b != op2 {
            op2b = rm.next(op2b);
        }
        let reverse2 = rm.pt(op2b).y > rm.pt(op2).y || !slopes_equal3(rm.pt(op2), rm.pt(op2b), off);
        if reverse2 {
            op2b = rm.prev(op2);
            while rm.pt(op2b) == rm.pt(op2) && op2b != op2 {
                op2b = rm.prev(op2b);
            }
            if rm.pt(op2b).y > rm.pt(op2).y || !slopes_equal3(rm.pt(op2), rm.pt(op2b), off) {
                return false;
            }
        }

        if op1b == op1 || op2b == op2 || op1b == op2b || (r1 == r2 && reverse1 == reverse2) {
            return false;
        }
        join.p2 = self.cross_link(op1, op2, reverse1);
        true
    }

    /// Duplicate `op1` and `op2` and cross-link the four points so the two
    /// cycles are exchanged at this location. Returns the duplicate of `op1`.
    fn cross_link(&mut self, op1: PointIdx, op2: PointIdx, reverse1: bool) -> PointIdx {
        let rm = &mut self.rings;
        if reverse1 {
            let op1b = rm.dup_point(op1, false);
            let op2b = rm.dup_point(op2, true);
            rm.set_prev(op1, op2);
            rm.set_next(op2, op1);
            rm.set_next(op1b, op2b);
            rm.set_prev(op2b, op1b);
            op1b
        } else {
            let op1b = rm.dup_point(op1, true);
            let op2b = rm.dup_point(op2, false);
            rm.set_next(op1, op2);
            rm.set_prev(op2, op1);
            rm.set_prev(op1b, op2b);
            rm.set_next(op2b, op1b);
            op1b
        }
    }

    /// Move along a horizontal run to `pt` and place a duplicate there, on
    /// the side that survives.
    fn horz_anchor(
        &mut self,
        mut op: PointIdx,
        opb: PointIdx,
        pt: IntPoint,
        discard_left: bool,
    ) -> (PointIdx, PointIdx) {
        let rm = &mut self.rings;
        let left_to_right = rm.pt(op).x <= rm.pt(opb).x;
        let insert_after;
        if left_to_right {
            while rm.pt(rm.next(op)).x <= pt.x
                && rm.pt(rm.next(op)).x >= rm.pt(op).x
                && rm.pt(rm.next(op)).y == pt.y
            {
                op = rm.next(op);
            }
            if discard_left && rm.pt(op).x != pt.x {
                op = rm.next(op);
            }
            insert_after = !discard_left;
        } else {
            while rm.pt(rm.next(op)).x >= pt.x
                && rm.pt(rm.next(op)).x <= rm.pt(op).x
                && rm.pt(rm.next(op)).y == pt.y
            {
                op = rm.next(op);
            }
            if !discard_left && rm.pt(op).x != pt.x {
                op = rm.next(op);
            }
            insert_after = discard_left;
        }
        let mut dup = rm.dup_point(op, insert_after);
        if rm.pt(dup) != pt {
            op = dup;
            rm.points[op].pt = pt;
            dup = rm.dup_point(op, insert_after);
        }
        (op, dup)
    }

    fn join_horz(
        &mut self,
        op1: PointIdx,
        op1b: PointIdx,
        op2: PointIdx,
        op2b: PointIdx,
        pt: IntPoint,
        discard_left: bool,
    ) -> bool {
        let dir1_ltr = self.rings.pt(op1).x <= self.rings.pt(op1b).x;
        let dir2_ltr = self.rings.pt(op2).x <= self.rings.pt(op2b).x;
        if dir1_ltr == dir2_ltr {
            return false;
        }
        let (op1, op1b) = self.horz_anchor(op1, op1b, pt, discard_left);
        let (op2, op2b) = self.horz_anchor(op2, op2b, pt, discard_left);

        let rm = &mut self.rings;
        if dir1_ltr == discard_left {
            rm.set_prev(op1, op2);
            rm.set_next(op2, op1);
            rm.set_next(op1b, op2b);
            rm.set_prev(op2b, op1b);
        } else {
            rm.set_next(op1, op2);
            rm.set_prev(op2, op1);
            rm.set_prev(op1b, op2b);
            rm.set_next(op2b, op1b);
        }
        true
    }

    // ─────────────────────────── Parent fixups ───────────────────────────────────

    /// After a split into separate rings: rings parented by `old` that lie in
    /// `new` move to `new`.
    pub(crate) fn fixup_first_lefts1(&mut self, old: RingIdx, new: RingIdx) {
        let new_pts = self.rings.ring(new).points;
        for i in 0..self.rings.rings.len() as RingIdx {
            let pts = self.rings.ring(i).points;
            if pts == NO_POINT || i == old || i == new {
                continue;
            }
            let fl = self.rings.parse_first_left(self.rings.ring(i).first_left);
            if fl == old && self.rings.poly2_contains_poly1(pts, new_pts) {
                self.rings.set_first_left(i, new);
            }
        }
    }

    /// After a split where `inner` now lies in `outer`: re-parent the rings
    /// that shared their container.
    pub(crate) fn fixup_first_lefts2(&mut self, inner: RingIdx, outer: RingIdx) {
        let orfl = self.rings.ring(outer).first_left;
        let (inner_pts, outer_pts) = (self.rings.ring(inner).points, self.rings.ring(outer).points);
        for i in 0..self.rings.rings.len() as RingIdx {
            let pts = self.rings.ring(i).points;
            if pts == NO_POINT || i == outer || i == inner {
                continue;
            }
            let fl = self.rings.parse_first_left(self.rings.ring(i).first_left);
            if fl != orfl && fl != inner && fl != outer {
                continue;
            }
            if self.rings.poly2_contains_poly1(pts, inner_pts) {
                self.rings.set_first_left(i, inner);
            } else if self.rings.poly2_contains_poly1(pts, outer_pts) {
                self.rings.set_first_left(i, outer);
            } else {
                let cur = self.rings.ring(i).first_left;
                if cur == inner || cur == outer {
                    self.rings.set_first_left(i, orfl);
                }
            }
        }
    }

    /// After `old` was merged into `new`: rings parented by either now point
    /// at `new` directly.
    pub(crate) fn fixup_first_lefts3(&mut self, old: RingIdx, new: RingIdx) {
        for i in 0..self.rings.rings.len() as RingIdx {
            if self.rings.ring(i).points == NO_POINT || i == old || i == new {
                continue;
            }
            let fl = self.rings.parse_first_left(self.rings.ring(i).first_left);
            if fl == old || fl == new {
                self.rings.set_first_left(i, new);
            }
        }
    }
}
