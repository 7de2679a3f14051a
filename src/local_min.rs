// Copyright 2025 Lars Brubaker
// License: MIT
//
// Local minima: input rings decomposed into bounds.
//
// Each input path is stored as a cycle of edges in the shared edge arena.
// After duplicate and collinear cleanup the cycle is cut into monotonic
// bounds; every pair of bounds meeting at a bottom vertex becomes one
// `LocalMinimum`. A bound is chained through `next_in_lml` from the minimum up
// to its maximum. Open paths use a skip edge (ring == EDGE_SKIP) to mark the
// gap between their last and first vertex.

use crate::active::EdgeList;
use crate::clipper::PolygonType;
use crate::edge::{Edge, EdgeIdx, EdgeSide, EDGE_SKIP, EDGE_UNASSIGNED, NIL};
use crate::geom::{pt2_is_between_pt1_and_pt3, slopes_equal3, BoundingBox, IntPoint};
use crate::scanbeam::Scanbeam;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocalMinimum {
    pub y: i64,
    /// NIL for the lone bound of an open path starting at a skip edge.
    pub left_bound: EdgeIdx,
    pub right_bound: EdgeIdx,
}

pub struct MinimaList {
    minima: Vec<LocalMinimum>,
    current: usize,
    pub has_open_paths: bool,
    bounds: Option<BoundingBox<i64>>,
}

impl MinimaList {
    pub fn new() -> Self {
        MinimaList {
            minima: Vec::new(),
            current: 0,
            has_open_paths: false,
            bounds: None,
        }
    }

    pub fn clear(&mut self) {
        self.minima.clear();
        self.current = 0;
        self.has_open_paths = false;
        self.bounds = None;
    }

    pub fn len(&self) -> usize {
        self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    /// Box of every vertex kept by `add_path`, None before any input.
    pub fn bounds(&self) -> Option<BoundingBox<i64>> {
        self.bounds
    }

    fn extend_bounds(&mut self, pt: IntPoint) {
        match &mut self.bounds {
            Some(b) => {
                b.min.x = b.min.x.min(pt.x);
                b.min.y = b.min.y.min(pt.y);
                b.max.x = b.max.x.max(pt.x);
                b.max.y = b.max.y.max(pt.y);
            }
            None => self.bounds = Some(BoundingBox::new(pt, pt)),
        }
    }

    /// Build the edges of one path and register its local minima. Returns
    /// false when nothing is left after cleanup; the edge arena is then left
    /// exactly as it was.
    pub fn add_path(
        &mut self,
        edges: &mut EdgeList,
        path: &[IntPoint],
        poly_type: PolygonType,
        closed: bool,
        preserve_collinear: bool,
    ) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut high = path.len() - 1;
        if closed {
            while high > 0 && path[high] == path[0] {
                high -= 1;
            }
        }
        while high > 0 && path[high] == path[high - 1] {
            high -= 1;
        }
        if (closed && high < 2) || (!closed && high < 1) {
            return false;
        }

        // 1. one edge per vertex, linked into a cycle
        let base = edges.edges.len() as EdgeIdx;
        let count = high as EdgeIdx + 1;
        for i in 0..count {
            let next = base + (i + 1) % count;
            let prev = base + (i + count - 1) % count;
            edges.edges.push(Edge::new(path[i as usize], next, prev));
        }

        // 2. drop duplicate vertices and, for closed paths, collinear ones
        let mut start = base;
        let mut e = start;
        let mut loop_stop = start;
        loop {
            let next = edges[e].next;
            if edges[e].curr == edges[next].curr && (closed || next != start) {
                if e == next {
                    break;
                }
                if e == start {
                    start = next;
                }
                e = remove_edge(edges, e);
                loop_stop = e;
                continue;
            }
            let prev = edges[e].prev;
            if prev == next {
                break;
            }
            if closed
                && slopes_equal3(edges[prev].curr, edges[e].curr, edges[next].curr)
                && (!preserve_collinear
                    || !pt2_is_between_pt1_and_pt3(
                        edges[prev].curr,
                        edges[e].curr,
                        edges[next].curr,
                    ))
            {
                if e == start {
                    start = next;
                }
                e = remove_edge(edges, e);
                e = edges[e].prev;
                loop_stop = e;
                continue;
            }
            e = edges[e].next;
            if e == loop_stop || (!closed && edges[e].next == start) {
                break;
            }
        }

        if (!closed && e == edges[e].next) || (closed && edges[e].prev == edges[e].next) {
            edges.edges.truncate(base as usize);
            return false;
        }

        if !closed {
            let last = edges[start].prev;
            edges[last].ring = EDGE_SKIP;
        }

        // 3. orient each segment
        let mut is_flat = true;
        e = start;
        loop {
            let next = edges[e].next;
            let next_pt = edges[next].curr;
            edges[e].init_segment(next_pt, poly_type);
            e = next;
            if is_flat && edges[e].curr.y != edges[start].curr.y {
                is_flat = false;
            }
            if e == start {
                break;
            }
        }

        if is_flat && closed {
            edges.edges.truncate(base as usize);
            return false;
        }

        let mut v = start;
        loop {
            let pt = edges[v].curr;
            self.extend_bounds(pt);
            v = edges[v].next;
            if v == start {
                break;
            }
        }

        if !closed {
            self.has_open_paths = true;
        }

        // 4. a totally flat open path is one horizontal bound
        if is_flat {
            let prev = edges[e].prev;
            edges[prev].ring = EDGE_SKIP;
            self.minima.push(LocalMinimum {
                y: edges[e].bot.y,
                left_bound: NIL,
                right_bound: e,
            });
            edges[e].side = EdgeSide::Right;
            edges[e].winding_delta = 0;
            loop {
                let prev = edges[e].prev;
                if edges[e].bot.x != edges[prev].top.x {
                    edges[e].reverse_horizontal();
                }
                let next = edges[e].next;
                if edges[next].ring == EDGE_SKIP {
                    break;
                }
                edges[e].next_in_lml = next;
                e = next;
            }
            return true;
        }

        // open paths whose ends meet would otherwise never find a minimum
        let prev = edges[e].prev;
        if edges[prev].bot == edges[prev].top {
            e = edges[e].next;
        }

        let mut e_min = NIL;
        loop {
            e = find_next_loc_min(edges, e);
            if e == e_min {
                break;
            }
            if e_min == NIL {
                e_min = e;
            }

            // e and e.prev meet at the minimum; the steeper one on the left
            let prev = edges[e].prev;
            let (mut left, mut right, left_is_forward) = if edges[e].dx < edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };
            let y = edges[e].bot.y;

            let delta = if !closed {
                0
            } else if edges[left].next == right {
                -1
            } else {
                1
            };
            edges[left].winding_delta = delta;
            edges[right].winding_delta = -delta;

            let mut e1 = self.process_bound(edges, left, left_is_forward);
            if edges[e1].ring == EDGE_SKIP {
                e1 = self.process_bound(edges, e1, left_is_forward);
            }
            let mut e2 = self.process_bound(edges, right, !left_is_forward);
            if edges[e2].ring == EDGE_SKIP {
                e2 = self.process_bound(edges, e2, !left_is_forward);
            }

            if edges[left].ring == EDGE_SKIP {
                left = NIL;
            } else if edges[right].ring == EDGE_SKIP {
                right = NIL;
            }
            self.minima.push(LocalMinimum {
                y,
                left_bound: left,
                right_bound: right,
            });
            e = if left_is_forward { e1 } else { e2 };
        }
        true
    }

    /// Chain the bound starting at `e` through `next_in_lml` and return the
    /// first edge past its top.
    fn process_bound(
        &mut self,
        edges: &mut EdgeList,
        mut e: EdgeIdx,
        next_is_forward: bool,
    ) -> EdgeIdx {
        let mut result = e;

        if edges[e].ring == EDGE_SKIP {
            // more edges beyond the skip edge form a bound of their own
            if next_is_forward {
                while edges[e].top.y == edges[edges[e].next].bot.y {
                    e = edges[e].next;
                }
                while e != result && edges[e].is_horizontal() {
                    e = edges[e].prev;
                }
            } else {
                while edges[e].top.y == edges[edges[e].prev].bot.y {
                    e = edges[e].prev;
                }
                while e != result && edges[e].is_horizontal() {
                    e = edges[e].next;
                }
            }

            if e == result {
                result = if next_is_forward { edges[e].next } else { edges[e].prev };
            } else {
                e = if next_is_forward { edges[result].next } else { edges[result].prev };
                let lm = LocalMinimum {
                    y: edges[e].bot.y,
                    left_bound: NIL,
                    right_bound: e,
                };
                edges[e].winding_delta = 0;
                result = self.process_bound(edges, e, next_is_forward);
                self.minima.push(lm);
            }
            return result;
        }

        if edges[e].is_horizontal() {
            // a horizontal at the bottom may lead in either direction
            let before = if next_is_forward { edges[e].prev } else { edges[e].next };
            if edges[before].is_horizontal() {
                if edges[before].bot.x != edges[e].bot.x && edges[before].top.x != edges[e].bot.x {
                    edges[e].reverse_horizontal();
                }
            } else if edges[before].bot.x != edges[e].bot.x {
                edges[e].reverse_horizontal();
            }
        }

        let bound_start = e;
        if next_is_forward {
            while edges[result].top.y == edges[edges[result].next].bot.y
                && edges[edges[result].next].ring != EDGE_SKIP
            {
                result = edges[result].next;
            }
            if edges[result].is_horizontal() && edges[edges[result].next].ring != EDGE_SKIP {
                // top horizontals join this bound only when entered from the left
                let mut horz = result;
                while edges[edges[horz].prev].is_horizontal() {
                    horz = edges[horz].prev;
                }
                if edges[edges[horz].prev].top.x > edges[edges[result].next].top.x {
                    result = edges[horz].prev;
                }
            }
            while e != result {
                edges[e].next_in_lml = edges[e].next;
                let prev = edges[e].prev;
                if edges[e].is_horizontal()
                    && e != bound_start
                    && edges[e].bot.x != edges[prev].top.x
                {
                    edges[e].reverse_horizontal();
                }
                e = edges[e].next;
            }
            let prev = edges[e].prev;
            if edges[e].is_horizontal() && e != bound_start && edges[e].bot.x != edges[prev].top.x {
                edges[e].reverse_horizontal();
            }
            result = edges[result].next;
        } else {
            while edges[result].top.y == edges[edges[result].prev].bot.y
                && edges[edges[result].prev].ring != EDGE_SKIP
            {
                result = edges[result].prev;
            }
            if edges[result].is_horizontal() && edges[edges[result].prev].ring != EDGE_SKIP {
                let mut horz = result;
                while edges[edges[horz].next].is_horizontal() {
                    horz = edges[horz].next;
                }
                if edges[edges[horz].next].top.x >= edges[edges[result].prev].top.x {
                    result = edges[horz].next;
                }
            }
            while e != result {
                edges[e].next_in_lml = edges[e].prev;
                let next = edges[e].next;
                if edges[e].is_horizontal()
                    && e != bound_start
                    && edges[e].bot.x != edges[next].top.x
                {
                    edges[e].reverse_horizontal();
                }
                e = edges[e].prev;
            }
            let next = edges[e].next;
            if edges[e].is_horizontal() && e != bound_start && edges[e].bot.x != edges[next].top.x {
                edges[e].reverse_horizontal();
            }
            result = edges[result].prev;
        }
        result
    }

    /// Order minima for the sweep, seed the scanbeam with their y values and
    /// put their first edges back in the starting state.
    pub fn reset(&mut self, edges: &mut EdgeList, scanbeam: &mut Scanbeam) {
        self.current = 0;
        scanbeam.clear();
        edges.active = NIL;
        edges.sorted = NIL;
        for edge in edges.edges.iter_mut() {
            edge.next_in_ael = NIL;
            edge.prev_in_ael = NIL;
            edge.next_in_sel = NIL;
            edge.prev_in_sel = NIL;
        }
        // larger y first; stable so equal minima keep insertion order
        self.minima.sort_by(|a, b| b.y.cmp(&a.y));
        for lm in &self.minima {
            scanbeam.insert(lm.y);
            if lm.left_bound != NIL {
                let e = &mut edges[lm.left_bound];
                e.curr = e.bot;
                e.side = EdgeSide::Left;
                e.ring = EDGE_UNASSIGNED;
            }
            if lm.right_bound != NIL {
                let e = &mut edges[lm.right_bound];
                e.curr = e.bot;
                e.side = EdgeSide::Right;
                e.ring = EDGE_UNASSIGNED;
            }
        }
    }

    /// Next minimum sitting exactly on `y`, if any.
    pub fn pop(&mut self, y: i64) -> Option<LocalMinimum> {
        let lm = *self.minima.get(self.current)?;
        if lm.y != y {
            return None;
        }
        self.current += 1;
        Some(lm)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalMinimum> {
        self.minima.iter()
    }
}

impl Default for MinimaList {
    fn default() -> Self {
        Self::new()
    }
}

/// Unlink `e` from its cycle and return its successor.
fn remove_edge(edges: &mut EdgeList, e: EdgeIdx) -> EdgeIdx {
    let (prev, next) = (edges[e].prev, edges[e].next);
    edges[prev].next = next;
    edges[next].prev = prev;
    next
}

/// Advance to the next edge that starts a local minimum (left-aligned when
/// the minimum is a horizontal run).
fn find_next_loc_min(edges: &EdgeList, mut e: EdgeIdx) -> EdgeIdx {
    loop {
        while edges[e].bot != edges[edges[e].prev].bot || edges[e].curr == edges[e].top {
            e = edges[e].next;
        }
        if !edges[e].is_horizontal() && !edges[edges[e].prev].is_horizontal() {
            break;
        }
        while edges[edges[e].prev].is_horizontal() {
            e = edges[e].prev;
        }
        let first_horz = e;
        while edges[e].is_horizontal() {
            e = edges[e].next;
        }
        if edges[e].top.y == edges[edges[e].prev].bot.y {
            continue; // an intermediate horizontal
        }
        if edges[edges[first_horz].prev].bot.x < edges[e].bot.x {
            e = first_horz;
        }
        break;
    }
    e
}
