// Copyright 2025 Lars Brubaker
// License: MIT
//
// Crossings inside a scanbeam. Edges are bubble-sorted by their x at the top
// of the beam; every swap is a crossing. Crossings are then executed bottom
// up, each one between edges that are adjacent in the AEL at that moment.

use super::winding::effective_count;
use super::{ClipType, Engine, IntersectNode, PolygonType};
use crate::edge::{intersection_point, EdgeIdx, EDGE_UNASSIGNED, NIL};
use crate::error::{ClipError, ClipResult};
use crate::geom::IntPoint;

impl Engine {
    pub(crate) fn process_intersections(&mut self, top_y: i64) -> ClipResult<()> {
        if self.edges.active == NIL {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        let result = match self.intersections.len() {
            0 => Ok(()),
            1 => {
                self.process_intersect_list();
                Ok(())
            }
            _ if self.fixup_intersection_order() => {
                self.process_intersect_list();
                Ok(())
            }
            _ => Err(ClipError::IntersectionOrder { y: top_y }),
        };
        self.intersections.clear();
        self.edges.sorted = NIL;
        result
    }

    fn build_intersect_list(&mut self, top_y: i64) {
        // SEL starts as a copy of the AEL with x at the top of the beam
        let mut e = self.edges.active;
        self.edges.sorted = e;
        while e != NIL {
            let x = self.edges[e].top_x(top_y);
            let edge = &mut self.edges[e];
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            edge.curr.x = x;
            e = edge.next_in_ael;
        }

        let mut modified = true;
        while modified && self.edges.sorted != NIL {
            modified = false;
            let mut e = self.edges.sorted;
            while self.edges[e].next_in_sel != NIL {
                let next = self.edges[e].next_in_sel;
                if self.edges[e].curr.x > self.edges[next].curr.x {
                    let mut pt = intersection_point(&self.edges[e], &self.edges[next]);
                    if pt.y < top_y {
                        pt = IntPoint::new(self.edges[e].top_x(top_y), top_y);
                    }
                    self.intersections.push(IntersectNode { e1: e, e2: next, pt });
                    self.edges.swap_positions_in_sel(e, next);
                    modified = true;
                } else {
                    e = next;
                }
            }
            // the last edge of each pass is in place
            let prev = self.edges[e].prev_in_sel;
            if prev == NIL {
                break;
            }
            self.edges[prev].next_in_sel = NIL;
        }
        self.edges.sorted = NIL;
    }

    /// Order crossings so each one is between AEL neighbours when it runs.
    /// Bottom-most first; ties go to the pair with the smaller combined
    /// second winding count. False when no valid order was found.
    fn fixup_intersection_order(&mut self) -> bool {
        self.edges.copy_ael_to_sel();
        let edges = &self.edges;
        self.intersections.sort_by(|a, b| {
            b.pt.y.cmp(&a.pt.y).then_with(|| {
                let sa = edges[a.e1].winding_count2 + edges[a.e2].winding_count2;
                let sb = edges[b.e1].winding_count2 + edges[b.e2].winding_count2;
                sa.cmp(&sb)
            })
        });

        let n = self.intersections.len();
        for i in 0..n {
            if !self.adjacent_in_sel(self.intersections[i]) {
                let Some(j) = (i + 1..n).find(|&j| self.adjacent_in_sel(self.intersections[j]))
                else {
                    return false;
                };
                self.intersections.swap(i, j);
            }
            let node = self.intersections[i];
            self.edges.swap_positions_in_sel(node.e1, node.e2);
        }
        true
    }

    fn adjacent_in_sel(&self, node: IntersectNode) -> bool {
        self.edges[node.e1].next_in_sel == node.e2 || self.edges[node.e1].prev_in_sel == node.e2
    }

    fn process_intersect_list(&mut self) {
        let nodes = std::mem::take(&mut self.intersections);
        for node in &nodes {
            self.intersect_edges(node.e1, node.e2, node.pt);
            self.edges.swap_positions_in_ael(node.e1, node.e2);
        }
        self.intersections = nodes;
        self.intersections.clear();
    }

    /// `e1` crosses `e2` (left to right) at `pt`: update winding counts and
    /// emit output points, starting, ending or swapping rings as needed.
    pub(crate) fn intersect_edges(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        let c1 = self.edges[e1].owns_ring();
        let c2 = self.edges[e2].owns_ring();

        if self.edges[e1].is_open() || self.edges[e2].is_open() {
            self.intersect_open(e1, e2, pt, c1, c2);
            return;
        }

        let (t1, t2) = (self.edges[e1].poly_type, self.edges[e2].poly_type);
        let (d1, d2) = (self.edges[e1].winding_delta, self.edges[e2].winding_delta);
        if t1 == t2 {
            if self.is_even_odd_fill(e1) {
                let a = self.edges[e1].winding_count;
                self.edges[e1].winding_count = self.edges[e2].winding_count;
                self.edges[e2].winding_count = a;
            } else {
                let wc1 = self.edges[e1].winding_count;
                self.edges[e1].winding_count = if wc1 + d2 == 0 { -wc1 } else { wc1 + d2 };
                let wc2 = self.edges[e2].winding_count;
                self.edges[e2].winding_count = if wc2 - d1 == 0 { -wc2 } else { wc2 - d1 };
            }
        } else {
            if self.is_even_odd_fill(e2) {
                let w = &mut self.edges[e1].winding_count2;
                *w = if *w == 0 { 1 } else { 0 };
            } else {
                self.edges[e1].winding_count2 += d2;
            }
            if self.is_even_odd_fill(e1) {
                let w = &mut self.edges[e2].winding_count2;
                *w = if *w == 0 { 1 } else { 0 };
            } else {
                self.edges[e2].winding_count2 -= d1;
            }
        }

        let (fill1, fill1_alt) = self.fill_types(t1);
        let (fill2, fill2_alt) = self.fill_types(t2);
        let e1wc = effective_count(fill1, self.edges[e1].winding_count);
        let e2wc = effective_count(fill2, self.edges[e2].winding_count);
        let unit = |w: i32| w == 0 || w == 1;

        if c1 && c2 {
            if !unit(e1wc) || !unit(e2wc) || (t1 != t2 && self.clip_type != ClipType::Xor) {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_rings(e1, e2);
            }
        } else if c1 {
            if unit(e2wc) {
                self.add_out_pt(e1, pt);
                self.swap_sides(e1, e2);
                self.swap_rings(e1, e2);
            }
        } else if c2 {
            if unit(e1wc) {
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_rings(e1, e2);
            }
        } else if unit(e1wc) && unit(e2wc) {
            // neither edge contributes yet: a crossing may start a ring
            let e1wc2 = effective_count(fill1_alt, self.edges[e1].winding_count2);
            let e2wc2 = effective_count(fill2_alt, self.edges[e2].winding_count2);
            if t1 != t2 {
                self.add_local_min_poly(e1, e2, pt);
            } else if e1wc == 1 && e2wc == 1 {
                let starts = match self.clip_type {
                    ClipType::Intersection => e1wc2 > 0 && e2wc2 > 0,
                    ClipType::Union => e1wc2 <= 0 && e2wc2 <= 0,
                    ClipType::Difference => {
                        (t1 == PolygonType::Clip && e1wc2 > 0 && e2wc2 > 0)
                            || (t1 == PolygonType::Subject && e1wc2 <= 0 && e2wc2 <= 0)
                    }
                    ClipType::Xor => true,
                };
                if starts {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
    }

    /// Crossings involving an open path. Open paths never change winding
    /// counts; they are cut where they enter or leave filled area.
    fn intersect_open(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint, c1: bool, c2: bool) {
        let (a, b) = (&self.edges[e1], &self.edges[e2]);
        if a.is_open() && b.is_open() {
            return;
        }
        if a.poly_type == b.poly_type {
            // an open subject crossing a closed subject only matters for union
            if a.winding_delta != b.winding_delta && self.clip_type == ClipType::Union {
                if a.is_open() {
                    if c2 {
                        self.cut_open(e1, pt, c1);
                    }
                } else if c1 {
                    self.cut_open(e2, pt, c2);
                }
            }
        } else if a.is_open() {
            if b.winding_count.abs() == 1
                && (self.clip_type != ClipType::Union || b.winding_count2 == 0)
            {
                self.cut_open(e1, pt, c1);
            }
        } else if a.winding_count.abs() == 1
            && (self.clip_type != ClipType::Union || a.winding_count2 == 0)
        {
            self.cut_open(e2, pt, c2);
        }
    }

    /// Add `pt` to the open path's output; ends the current piece when one
    /// was in progress.
    fn cut_open(&mut self, e: EdgeIdx, pt: IntPoint, owned: bool) {
        self.add_out_pt(e, pt);
        if owned {
            self.edges[e].ring = EDGE_UNASSIGNED;
        }
    }

    fn swap_sides(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let s = self.edges[e1].side;
        self.edges[e1].side = self.edges[e2].side;
        self.edges[e2].side = s;
    }

    fn swap_rings(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let r = self.edges[e1].ring;
        self.edges[e1].ring = self.edges[e2].ring;
        self.edges[e2].ring = r;
    }
}
