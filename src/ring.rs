// Copyright 2025 Lars Brubaker
// License: MIT
//
// Output rings.
//
// Points of every output ring live in one `Arena<OutPoint>` and form circular
// doubly-linked lists through `next`/`prev` indices. A `Ring` holds one of its
// points; `points` is the "left-most" end of a ring still under construction
// and `prev(points)` the right-most. When two rings merge, the obsolete one is
// redirected to the survivor through `index`, and `resolve_ring` follows
// those redirects with path compression, so points may keep a stale ring
// number.

use crate::arena::Arena;
use crate::error::{ClipError, ClipResult};
use crate::geom::{get_dx, point_in_segments, IntPoint, PointInRing};

pub type PointIdx = u32;
pub type RingIdx = u32;
pub const NO_POINT: PointIdx = u32::MAX;
pub const NO_RING: RingIdx = u32::MAX;

#[derive(Copy, Clone, Debug)]
pub struct OutPoint {
    pub pt: IntPoint,
    pub ring: RingIdx,
    pub next: PointIdx,
    pub prev: PointIdx,
}

#[derive(Clone, Debug)]
pub struct Ring {
    /// Self for a live ring, otherwise the ring it was merged into.
    pub index: RingIdx,
    pub is_hole: bool,
    pub is_open: bool,
    /// Nearest ring to the left at creation; the candidate parent.
    pub first_left: RingIdx,
    pub points: PointIdx,
    /// Cached lowest point; NO_POINT when stale.
    pub bottom_point: PointIdx,
}

pub struct RingManager {
    pub rings: Vec<Ring>,
    pub points: Arena<OutPoint>,
}

impl RingManager {
    pub fn new() -> Self {
        RingManager {
            rings: Vec::new(),
            points: Arena::new(),
        }
    }

    pub fn clear(&mut self) {
        self.rings.clear();
        self.points.clear();
    }

    pub fn create_ring(&mut self) -> RingIdx {
        let idx = self.rings.len() as RingIdx;
        self.rings.push(Ring {
            index: idx,
            is_hole: false,
            is_open: false,
            first_left: NO_RING,
            points: NO_POINT,
            bottom_point: NO_POINT,
        });
        idx
    }

    /// Follow merge redirects to the live ring, compressing the path.
    pub fn resolve_ring(&mut self, r: RingIdx) -> RingIdx {
        let mut root = r;
        while self.rings[root as usize].index != root {
            root = self.rings[root as usize].index;
        }
        let mut cur = r;
        while self.rings[cur as usize].index != root {
            let next = self.rings[cur as usize].index;
            self.rings[cur as usize].index = root;
            cur = next;
        }
        root
    }

    /// Live ring owning point `p`.
    #[inline]
    pub fn ring_of(&mut self, p: PointIdx) -> RingIdx {
        let r = self.points[p].ring;
        self.resolve_ring(r)
    }

    #[inline]
    pub fn ring(&self, r: RingIdx) -> &Ring {
        &self.rings[r as usize]
    }

    #[inline]
    pub fn ring_mut(&mut self, r: RingIdx) -> &mut Ring {
        &mut self.rings[r as usize]
    }

    #[inline]
    pub fn pt(&self, p: PointIdx) -> IntPoint {
        self.points[p].pt
    }

    #[inline]
    pub fn next(&self, p: PointIdx) -> PointIdx {
        self.points[p].next
    }

    #[inline]
    pub fn prev(&self, p: PointIdx) -> PointIdx {
        self.points[p].prev
    }

    #[inline]
    pub fn set_next(&mut self, p: PointIdx, n: PointIdx) {
        self.points[p].next = n;
    }

    #[inline]
    pub fn set_prev(&mut self, p: PointIdx, n: PointIdx) {
        self.points[p].prev = n;
    }

    /// A one-point cycle belonging to `ring`.
    pub fn new_point(&mut self, ring: RingIdx, pt: IntPoint) -> PointIdx {
        let p = self.points.alloc(OutPoint {
            pt,
            ring,
            next: NO_POINT,
            prev: NO_POINT,
        });
        self.points[p].next = p;
        self.points[p].prev = p;
        p
    }

    /// Insert a copy of `p` next to it, after or before.
    pub fn dup_point(&mut self, p: PointIdx, insert_after: bool) -> PointIdx {
        let OutPoint { pt, ring, next, prev } = self.points[p];
        let q = self.points.alloc(OutPoint {
            pt,
            ring,
            next: NO_POINT,
            prev: NO_POINT,
        });
        if insert_after {
            self.points[q].next = next;
            self.points[q].prev = p;
            self.points[next].prev = q;
            self.points[p].next = q;
        } else {
            self.points[q].prev = prev;
            self.points[q].next = p;
            self.points[prev].next = q;
            self.points[p].prev = q;
        }
        q
    }

    /// Free every point of the cycle through `p`.
    pub fn dispose_points(&mut self, p: PointIdx) {
        if p == NO_POINT {
            return;
        }
        let mut cur = self.next(p);
        while cur != p {
            let next = self.next(cur);
            self.points.free(cur);
            cur = next;
        }
        self.points.free(p);
    }

    pub fn reverse_links(&mut self, p: PointIdx) {
        if p == NO_POINT {
            return;
        }
        let mut cur = p;
        loop {
            let op = &mut self.points[cur];
            std::mem::swap(&mut op.next, &mut op.prev);
            let after = op.prev;
            cur = after;
            if cur == p {
                break;
            }
        }
    }

    /// Point this cycle's points at `ring`.
    pub fn update_point_rings(&mut self, ring: RingIdx) {
        let start = self.ring(ring).points;
        if start == NO_POINT {
            return;
        }
        let mut p = start;
        loop {
            self.points[p].ring = ring;
            p = self.next(p);
            if p == start {
                break;
            }
        }
    }

    pub fn point_count(&self, p: PointIdx) -> usize {
        if p == NO_POINT {
            return 0;
        }
        let mut n = 0;
        let mut cur = p;
        loop {
            n += 1;
            cur = self.next(cur);
            if cur == p {
                break;
            }
        }
        n
    }

    /// Vertices of the cycle through `p`, following `next`.
    pub fn cycle(&self, p: PointIdx) -> impl Iterator<Item = PointIdx> + '_ {
        let mut cur = p;
        let mut done = p == NO_POINT;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let out = cur;
            cur = self.next(cur);
            done = cur == p;
            Some(out)
        })
    }

    /// Doubled area of the cycle through `p`, measured along `next`. Positive
    /// when the cycle runs clockwise in y-up axes.
    pub fn area2(&self, p: PointIdx) -> i128 {
        let mut a: i128 = 0;
        for q in self.cycle(p) {
            let prev = self.pt(self.prev(q));
            let cur = self.pt(q);
            a += (prev.x as i128 + cur.x as i128) * (prev.y as i128 - cur.y as i128);
        }
        a
    }

    pub fn ring_area(&self, r: RingIdx) -> f64 {
        self.area2(self.ring(r).points) as f64 * 0.5
    }

    pub fn point_in_cycle(&self, pt: IntPoint, p: PointIdx) -> PointInRing {
        point_in_segments(pt, self.cycle(p).map(|q| (self.pt(q), self.pt(self.next(q)))))
    }

    /// The cycle through `inner` lies within the cycle through `outer`: no
    /// vertex of `inner` is outside `outer`.
    pub fn poly2_contains_poly1(&self, inner: PointIdx, outer: PointIdx) -> bool {
        for q in self.cycle(inner) {
            if self.point_in_cycle(self.pt(q), outer) == PointInRing::Outside {
                return false;
            }
        }
        true
    }

    /// Lowest (largest y, then smallest x) point of the cycle; ties between
    /// coincident vertices go to the one whose edges leave most steeply.
    pub fn bottom_point(&self, start: PointIdx) -> PointIdx {
        let mut pp = start;
        let mut dups = NO_POINT;
        let mut p = self.next(pp);
        while p != pp {
            let (pt, best) = (self.pt(p), self.pt(pp));
            if pt.y > best.y {
                pp = p;
                dups = NO_POINT;
            } else if pt.y == best.y && pt.x <= best.x {
                if pt.x < best.x {
                    dups = NO_POINT;
                    pp = p;
                } else if self.next(p) != pp && self.prev(p) != pp {
                    dups = p;
                }
            }
            p = self.next(p);
        }
        if dups != NO_POINT {
            // several vertices share the bottom location
            while dups != p {
                if !self.first_is_bottom_point(p, dups) {
                    pp = dups;
                }
                dups = self.next(dups);
                while self.pt(dups) != self.pt(pp) {
                    dups = self.next(dups);
                }
            }
        }
        pp
    }

    pub fn first_is_bottom_point(&self, b1: PointIdx, b2: PointIdx) -> bool {
        let dx1p = self.neighbour_dx(b1, false);
        let dx1n = self.neighbour_dx(b1, true);
        let dx2p = self.neighbour_dx(b2, false);
        let dx2n = self.neighbour_dx(b2, true);
        if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
            self.area2(b1) > 0
        } else {
            (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
        }
    }

    fn neighbour_dx(&self, b: PointIdx, forward: bool) -> f64 {
        let step = |q| if forward { self.next(q) } else { self.prev(q) };
        let mut p = step(b);
        while self.pt(p) == self.pt(b) && p != b {
            p = step(p);
        }
        get_dx(self.pt(b), self.pt(p)).abs()
    }

    /// Cached bottom point of a ring.
    pub fn ring_bottom(&mut self, r: RingIdx) -> PointIdx {
        if self.ring(r).bottom_point == NO_POINT {
            let b = self.bottom_point(self.ring(r).points);
            self.ring_mut(r).bottom_point = b;
        }
        self.ring(r).bottom_point
    }

    /// Of two rings, the one whose bottom point is lower; it carries the
    /// correct hole state for their union.
    pub fn lowermost_ring(&mut self, r1: RingIdx, r2: RingIdx) -> RingIdx {
        let b1 = self.ring_bottom(r1);
        let b2 = self.ring_bottom(r2);
        let (p1, p2) = (self.pt(b1), self.pt(b2));
        if p1.y > p2.y {
            r1
        } else if p1.y < p2.y {
            r2
        } else if p1.x < p2.x {
            r1
        } else if p1.x > p2.x {
            r2
        } else if self.next(b1) == b1 {
            r2
        } else if self.next(b2) == b2 {
            r1
        } else if self.first_is_bottom_point(b1, b2) {
            r1
        } else {
            r2
        }
    }

    /// Live ring a merged ring was folded into, without path compression.
    fn find(&self, mut r: RingIdx) -> RingIdx {
        while self.rings[r as usize].index != r {
            r = self.rings[r as usize].index;
        }
        r
    }

    /// `r2` appears in the first_left chain of `r1`.
    pub fn ring1_right_of_ring2(&self, r1: RingIdx, r2: RingIdx) -> bool {
        let mut r = self.ring(r1).first_left;
        for _ in 0..self.rings.len() {
            if r == NO_RING || r == r1 {
                return false;
            }
            if r == r2 {
                return true;
            }
            r = self.ring(r).first_left;
        }
        false
    }

    /// The live ring standing for `r` in a first_left chain. Merged rings
    /// resolve to their survivor and emptied rings defer to their own
    /// first_left.
    pub fn parse_first_left(&self, mut r: RingIdx) -> RingIdx {
        for _ in 0..=self.rings.len() {
            if r == NO_RING {
                return NO_RING;
            }
            r = self.find(r);
            if self.ring(r).points != NO_POINT {
                return r;
            }
            r = self.ring(r).first_left;
        }
        NO_RING
    }

    /// `target` is `from` or one of its live ancestors.
    fn chain_reaches(&self, from: RingIdx, target: RingIdx) -> bool {
        let mut r = from;
        for _ in 0..=self.rings.len() {
            if r == NO_RING {
                return false;
            }
            if r == target {
                return true;
            }
            r = self.parse_first_left(self.ring(r).first_left);
        }
        true
    }

    /// Make `parent` (resolved to a live ring) the first_left of `r`. A
    /// parent whose chain already leads back to `r` is refused and `r` keeps
    /// its current link.
    pub fn set_first_left(&mut self, r: RingIdx, parent: RingIdx) {
        let parent = self.parse_first_left(parent);
        if parent != NO_RING && self.chain_reaches(parent, r) {
            return;
        }
        self.ring_mut(r).first_left = parent;
    }

    /// After a merge into `r`: a first_left that now leads back to `r`
    /// itself is replaced by `fallback`, the merged ring's old parent.
    pub fn drop_self_parent(&mut self, r: RingIdx, fallback: RingIdx) {
        if self.parse_first_left(self.ring(r).first_left) == r {
            self.ring_mut(r).first_left = NO_RING;
            self.set_first_left(r, fallback);
        }
    }

    /// Check every point of every live ring: allocated, owned by the ring,
    /// and doubly linked (`next(prev(p)) == p`).
    pub fn validate(&mut self) -> ClipResult<()> {
        for r in 0..self.rings.len() as RingIdx {
            let start = self.ring(r).points;
            if start == NO_POINT || self.rings[r as usize].index != r {
                continue;
            }
            let mut p = start;
            let mut steps = 0usize;
            loop {
                if !self.points.is_live(p) {
                    return Err(ClipError::StalePoint { point: p });
                }
                let next = self.next(p);
                let prev = self.prev(p);
                for q in [next, prev] {
                    if !self.points.is_live(q) {
                        return Err(ClipError::StalePoint { point: q });
                    }
                }
                if self.next(prev) != p
                    || self.prev(next) != p
                    || self.ring_of(p) != r
                {
                    return Err(ClipError::StalePoint { point: p });
                }
                steps += 1;
                if steps > self.points.live_count() {
                    return Err(ClipError::StalePoint { point: p });
                }
                p = next;
                if p == start {
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Default for RingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_from(rm: &mut RingManager, coords: &[(i64, i64)]) -> RingIdx {
        let r = rm.create_ring();
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
    fn built_cycle_is_consistent() {
        let mut rm = RingManager::new();
        let r = ring_from(&mut rm, &[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(rm.point_count(rm.ring(r).points), 4);
        assert!(rm.validate().is_ok());
        let pts: Vec<_> = rm.cycle(rm.ring(r).points).map(|p| rm.pt(p)).collect();
        assert_eq!(pts[1], IntPoint::new(10, 0));
    }

    #[test]
    fn area_flips_with_reversal() {
        let mut rm = RingManager::new();
        let r = ring_from(&mut rm, &[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let a = rm.ring_area(r);
        assert_eq!(a.abs(), 100.0);
        rm.reverse_links(rm.ring(r).points);
        assert_eq!(rm.ring_area(r), -a);
        assert!(rm.validate().is_ok());
    }

    #[test]
    fn resolve_compresses_redirects() {
        let mut rm = RingManager::new();
        let a = rm.create_ring();
        let b = rm.create_ring();
        let c = rm.create_ring();
        rm.ring_mut(c).index = b;
        rm.ring_mut(b).index = a;
        assert_eq!(rm.resolve_ring(c), a);
        assert_eq!(rm.ring(c).index, a);
    }

    #[test]
    fn containment_needs_every_vertex() {
        let mut rm = RingManager::new();
        let outer = ring_from(&mut rm, &[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let inner = ring_from(&mut rm, &[(2, 2), (8, 2), (8, 8), (2, 8)]);
        let crossing = ring_from(&mut rm, &[(5, 5), (15, 5), (15, 8), (5, 8)]);
        let (o, i, c) = (rm.ring(outer).points, rm.ring(inner).points, rm.ring(crossing).points);
        assert!(rm.poly2_contains_poly1(i, o));
        assert!(!rm.poly2_contains_poly1(o, i));
        assert!(!rm.poly2_contains_poly1(c, o));
    }

    #[test]
    fn bottom_point_is_lowest_then_leftmost() {
        let mut rm = RingManager::new();
        let r = ring_from(&mut rm, &[(3, 0), (9, 7), (1, 7), (0, 3)]);
        let b = rm.ring_bottom(r);
        assert_eq!(rm.pt(b), IntPoint::new(1, 7));
    }

    #[test]
    fn lowermost_of_two_rings() {
        let mut rm = RingManager::new();
        let hi = ring_from(&mut rm, &[(0, 0), (4, 0), (4, 4), (0, 4)]);
        let lo = ring_from(&mut rm, &[(0, 5), (4, 5), (4, 9), (0, 9)]);
        assert_eq!(rm.lowermost_ring(hi, lo), lo);
        assert_eq!(rm.lowermost_ring(lo, hi), lo);
    }

    #[test]
    fn freed_point_is_reported_stale() {
        let mut rm = RingManager::new();
        let r = ring_from(&mut rm, &[(0, 0), (10, 0), (10, 10)]);
        let victim = rm.next(rm.ring(r).points);
        rm.points.free(victim);
        assert_eq!(rm.validate(), Err(ClipError::StalePoint { point: victim }));
    }

    #[test]
    fn first_left_chain_skips_empty_rings() {
        let mut rm = RingManager::new();
        let a = ring_from(&mut rm, &[(0, 0), (1, 0), (1, 1)]);
        let b = rm.create_ring();
        rm.ring_mut(b).first_left = a;
        let c = rm.create_ring();
        rm.ring_mut(c).first_left = b;
        assert_eq!(rm.parse_first_left(rm.ring(c).first_left), a);
        assert!(rm.ring1_right_of_ring2(c, a));
        assert!(!rm.ring1_right_of_ring2(a, c));
    }

    #[test]
    fn merged_parent_resolves_to_its_survivor() {
        let mut rm = RingManager::new();
        let outer = ring_from(&mut rm, &[(0, 0), (20, 0), (20, 20), (0, 20)]);
        let merged = rm.create_ring();
        rm.ring_mut(merged).index = outer;
        let hole = ring_from(&mut rm, &[(5, 5), (6, 5), (6, 6)]);
        rm.ring_mut(hole).first_left = merged;
        assert_eq!(rm.parse_first_left(rm.ring(hole).first_left), outer);
    }

    #[test]
    fn first_left_walks_stop_on_a_cycle() {
        let mut rm = RingManager::new();
        let a = ring_from(&mut rm, &[(0, 0), (1, 0), (1, 1)]);
        let b = ring_from(&mut rm, &[(2, 0), (3, 0), (3, 1)]);
        let c = rm.create_ring();
        rm.ring_mut(a).first_left = b;
        rm.ring_mut(b).first_left = a;
        rm.ring_mut(c).first_left = c;
        assert!(!rm.ring1_right_of_ring2(a, c));
        assert_eq!(rm.parse_first_left(c), NO_RING);
    }

    #[test]
    fn survivor_does_not_inherit_itself_as_parent() {
        let mut rm = RingManager::new();
        let outer = ring_from(&mut rm, &[(0, 0), (20, 0), (20, 20), (0, 20)]);
        let a = ring_from(&mut rm, &[(5, 5), (6, 5), (6, 6)]);
        let b = ring_from(&mut rm, &[(7, 5), (8, 5), (8, 6)]);
        rm.ring_mut(a).first_left = b;
        rm.ring_mut(b).first_left = outer;
        // b is folded into a
        rm.ring_mut(b).points = NO_POINT;
        rm.ring_mut(b).index = a;
        rm.drop_self_parent(a, outer);
        assert_eq!(rm.ring(a).first_left, outer);
    }

    #[test]
    fn parent_cycles_are_refused() {
        let mut rm = RingManager::new();
        let outer = ring_from(&mut rm, &[(0, 0), (20, 0), (20, 20), (0, 20)]);
        let inner = ring_from(&mut rm, &[(5, 5), (6, 5), (6, 6)]);
        rm.set_first_left(inner, outer);
        rm.set_first_left(outer, inner);
        rm.set_first_left(inner, inner);
        assert_eq!(rm.ring(inner).first_left, outer);
        assert_eq!(rm.ring(outer).first_left, NO_RING);
    }
}
