// Copyright 2025 Lars Brubaker
// License: MIT
//
// Strictly simple output. Rings that pass through the same location twice
// are split there. A hole touching another ring once is legal; when a chain
// of such touches closes a loop, the rings on the loop are spliced together
// and cut apart at the closing touch, which separates the enclosed region.

use std::collections::VecDeque;

use log::debug;

use super::Engine;
use crate::geom::IntPoint;
use crate::ring::{PointIdx, RingIdx, NO_POINT};

impl Engine {
    /// Split every ring at each location it passes through twice. Touches
    /// between a hole and another ring are kept unless they close a loop of
    /// touches, in which case the rings on the loop are spliced and then cut
    /// at the closing touch.
    pub(crate) fn do_simple_polygons(&mut self) {
        // touches between distinct rings that were legal when seen
        let mut deferred: Vec<(PointIdx, PointIdx)> = Vec::new();
        let max_splices = self.rings.points.live_count() + 8;
        let (mut splits, mut splices) = (0usize, 0usize);
        loop {
            // each split adds a ring and none are removed, so this ends
            let clusters = self.coincident_points();
            if self.split_self_touch(&clusters) {
                splits += 1;
                continue;
            }
            if splices >= max_splices || !self.splice_touch_loop(&clusters, &mut deferred) {
                break;
            }
            splices += 1;
        }
        debug!(
            "strictly simple: {splits} splits, {splices} splices, {} touches kept",
            deferred.len()
        );
    }

    /// Points of live closed rings grouped by location, groups of one left
    /// out.
    fn coincident_points(&self) -> Vec<Vec<PointIdx>> {
        let mut pts: Vec<(IntPoint, PointIdx)> = Vec::new();
        for r in 0..self.rings.rings.len() as RingIdx {
            let ring = self.rings.ring(r);
            if ring.points == NO_POINT || ring.index != r || ring.is_open {
                continue;
            }
            pts.extend(self.rings.cycle(ring.points).map(|p| (self.rings.pt(p), p)));
        }
        pts.sort_by_key(|&(pt, p)| (pt.y, pt.x, p));

        let mut clusters = Vec::new();
        let mut start = 0;
        while start < pts.len() {
            let mut end = start + 1;
            while end < pts.len() && pts[end].0 == pts[start].0 {
                end += 1;
            }
            if end - start > 1 {
                clusters.push(pts[start..end].iter().map(|&(_, p)| p).collect());
            }
            start = end;
        }
        clusters
    }

    /// Cut the first ring found passing twice through one location.
    fn split_self_touch(&mut self, clusters: &[Vec<PointIdx>]) -> bool {
        for group in clusters {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    let r = self.rings.ring_of(a);
                    if r != self.rings.ring_of(b) {
                        continue;
                    }
                    // adjacent duplicates are left to the fixup pass
                    if self.rings.next(b) != a && self.rings.prev(b) != a {
                        self.split_ring(r, a, b);
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Record touches between a hole and another ring. Returns true once one
    /// closes a loop of recorded touches and the loop has been spliced.
    fn splice_touch_loop(
        &mut self,
        clusters: &[Vec<PointIdx>],
        deferred: &mut Vec<(PointIdx, PointIdx)>,
    ) -> bool {
        for group in clusters {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    let ra = self.rings.ring_of(a);
                    let rb = self.rings.ring_of(b);
                    if ra == rb || (!self.rings.ring(ra).is_hole && !self.rings.ring(rb).is_hole) {
                        continue;
                    }
                    if deferred.iter().any(|&(p, q)| (p == a && q == b) || (p == b && q == a)) {
                        continue;
                    }
                    let Some(path) = self.touch_path(deferred, ra, rb) else {
                        deferred.push((a, b));
                        continue;
                    };
                    for &t in &path {
                        let (p, q) = deferred[t];
                        self.splice_rings(p, q);
                    }
                    let mut used = path;
                    used.sort_unstable_by(|x, y| y.cmp(x));
                    for t in used {
                        deferred.swap_remove(t);
                    }
                    let r = self.rings.ring_of(a);
                    if self.rings.ring_of(b) == r
                        && self.rings.next(b) != a
                        && self.rings.prev(b) != a
                    {
                        self.split_ring(r, a, b);
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Deferred touches linking `from` to `to`, in path order. Ring
    /// membership of each touch is resolved now, since earlier splits and
    /// splices may have moved its points.
    fn touch_path(
        &mut self,
        deferred: &[(PointIdx, PointIdx)],
        from: RingIdx,
        to: RingIdx,
    ) -> Option<Vec<usize>> {
        let links: Vec<(RingIdx, RingIdx)> = deferred
            .iter()
            .map(|&(p, q)| (self.rings.ring_of(p), self.rings.ring_of(q)))
            .collect();

        let mut via: Vec<Option<(RingIdx, usize)>> = vec![None; self.rings.rings.len()];
        let mut seen = vec![false; self.rings.rings.len()];
        seen[from as usize] = true;
        let mut queue = VecDeque::from([from]);
        while let Some(r) = queue.pop_front() {
            if r == to {
                break;
            }
            for (t, &(p, q)) in links.iter().enumerate() {
                if p == q {
                    continue;
                }
                let other = if p == r {
                    q
                } else if q == r {
                    p
                } else {
                    continue;
                };
                if !seen[other as usize] {
                    seen[other as usize] = true;
                    via[other as usize] = Some((r, t));
                    queue.push_back(other);
                }
            }
        }
        if !seen[to as usize] {
            return None;
        }
        let mut path = Vec::new();
        let mut r = to;
        while let Some((prev, t)) = via[r as usize] {
            path.push(t);
            r = prev;
        }
        path.reverse();
        Some(path)
    }

    /// Cut ring `r` at `a` and `b`, two non-adjacent points at the same
    /// location. The larger fragment keeps `r`.
    fn split_ring(&mut self, r: RingIdx, a: PointIdx, b: PointIdx) {
        let rm = &mut self.rings;
        let (pa, pb) = (rm.prev(a), rm.prev(b));
        rm.set_prev(a, pb);
        rm.set_next(pb, a);
        rm.set_prev(b, pa);
        rm.set_next(pa, b);

        let (keep, moved) = if rm.point_count(a) >= rm.point_count(b) { (a, b) } else { (b, a) };
        rm.ring_mut(r).points = keep;
        rm.ring_mut(r).bottom_point = NO_POINT;
        let r2 = rm.create_ring();
        rm.ring_mut(r2).points = moved;
        rm.update_point_rings(r2);
        self.classify_split(r, r2);
    }

    /// Join the rings of `p` and `q`, two points at the same location, into
    /// one cycle passing through that location twice.
    fn splice_rings(&mut self, p: PointIdx, q: PointIdx) {
        let rp = self.rings.ring_of(p);
        let rq = self.rings.ring_of(q);
        if rp == rq {
            return;
        }
        let rm = &mut self.rings;
        let (np, nq) = (rm.next(p), rm.next(q));
        rm.set_next(p, nq);
        rm.set_prev(nq, p);
        rm.set_next(q, np);
        rm.set_prev(np, q);

        let (keep, gone) = if rm.ring(rp).is_hole && !rm.ring(rq).is_hole {
            (rq, rp)
        } else {
            (rp, rq)
        };
        rm.ring_mut(keep).points = p;
        rm.ring_mut(keep).bottom_point = NO_POINT;
        let gone_parent = rm.ring(gone).first_left;
        let g = rm.ring_mut(gone);
        g.points = NO_POINT;
        g.bottom_point = NO_POINT;
        g.first_left = keep;
        g.index = keep;
        rm.drop_self_parent(keep, gone_parent);
        self.fixup_first_lefts3(gone, keep);
    }
}
