// Copyright 2025 Lars Brubaker
// License: MIT
//
// The scanbeam loop. Each beam runs from `bot_y` (larger) to `top_y`:
//   1. minima sitting on bot_y enter the AEL,
//   2. horizontals queued in the SEL are processed,
//   3. crossings inside the beam are found and executed in order,
//   4. edges reaching top_y are closed off or advanced.

use log::debug;

use super::Engine;
use crate::edge::{EdgeIdx, EDGE_UNASSIGNED, NIL};
use crate::error::{ClipError, ClipResult};
use crate::geom::{horz_segments_overlap, slopes_equal4};
use crate::ring::NO_POINT;

impl Engine {
    pub(crate) fn execute_internal(&mut self) -> ClipResult<()> {
        self.dispose_output();
        self.minima.reset(&mut self.edges, &mut self.scanbeam);
        self.maxima.clear();
        self.edges.sorted = NIL;

        let Some(mut bot_y) = self.scanbeam.pop() else {
            return Ok(());
        };
        let mut beams = 0usize;
        loop {
            self.insert_local_minima_into_ael(bot_y)?;
            self.process_horizontals()?;
            self.ghost_joins.clear();
            let Some(top_y) = self.scanbeam.pop() else {
                break;
            };
            beams += 1;
            self.process_intersections(top_y)?;
            self.process_edges_at_top_of_scanbeam(top_y)?;
            bot_y = top_y;
        }
        debug!("sweep finished after {beams} scanbeams with {} rings", self.rings.rings.len());

        self.fix_orientations();
        if !self.joins.is_empty() {
            self.join_common_edges();
        }
        self.fixup_all_rings();
        if self.options.strictly_simple {
            self.do_simple_polygons();
            self.fixup_all_rings();
        }
        // joins and splits may leave a ring turned against its role
        self.fix_orientations();
        self.joins.clear();
        self.ghost_joins.clear();
        Ok(())
    }

    /// Release all output of the previous run.
    pub(crate) fn dispose_output(&mut self) {
        self.rings.clear();
        self.joins.clear();
        self.ghost_joins.clear();
        self.intersections.clear();
        self.maxima.clear();
    }

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) -> ClipResult<()> {
        while let Some(lm) = self.minima.pop(bot_y) {
            let lb = lm.left_bound;
            let rb = lm.right_bound;
            let mut op1 = NO_POINT;

            if lb == NIL {
                // lone bound of an open path
                self.edges.insert_into_ael(rb, NIL);
                self.set_winding_count(rb);
                if self.is_contributing(rb) {
                    let bot = self.edges[rb].bot;
                    op1 = self.add_out_pt(rb, bot);
                }
            } else if rb == NIL {
                self.edges.insert_into_ael(lb, NIL);
                self.set_winding_count(lb);
                if self.is_contributing(lb) {
                    let bot = self.edges[lb].bot;
                    op1 = self.add_out_pt(lb, bot);
                }
                self.scanbeam.insert(self.edges[lb].top.y);
            } else {
                self.edges.insert_into_ael(lb, NIL);
                self.edges.insert_into_ael(rb, lb);
                self.set_winding_count(lb);
                self.edges[rb].winding_count = self.edges[lb].winding_count;
                self.edges[rb].winding_count2 = self.edges[lb].winding_count2;
                if self.is_contributing(lb) {
                    let bot = self.edges[lb].bot;
                    op1 = self.add_local_min_poly(lb, rb, bot);
                }
                self.scanbeam.insert(self.edges[lb].top.y);
            }

            if rb != NIL {
                if self.edges[rb].is_horizontal() {
                    self.edges.add_to_sel(rb);
                    let next = self.edges[rb].next_in_lml;
                    if next != NIL {
                        self.scanbeam.insert(self.edges[next].top.y);
                    }
                } else {
                    self.scanbeam.insert(self.edges[rb].top.y);
                }
            }

            if lb == NIL || rb == NIL {
                continue;
            }

            // a horizontal minimum over a ghost of an earlier horizontal
            if op1 != NO_POINT
                && self.edges[rb].is_horizontal()
                && self.edges[rb].winding_delta != 0
            {
                let (rb_bot, rb_top) = (self.edges[rb].bot.x, self.edges[rb].top.x);
                for i in 0..self.ghost_joins.len() {
                    let ghost = self.ghost_joins[i];
                    let ghost_x = self.rings.pt(ghost.p1).x;
                    if horz_segments_overlap(ghost_x, ghost.off_pt.x, rb_bot, rb_top) {
                        self.add_join(ghost.p1, op1, ghost.off_pt);
                    }
                }
            }

            let prev = self.edges[lb].prev_in_ael;
            if self.edges[lb].owns_ring()
                && prev != NIL
                && self.edges[prev].curr.x == self.edges[lb].bot.x
                && self.edges[prev].owns_ring()
                && slopes_equal4(
                    self.edges[prev].bot,
                    self.edges[prev].top,
                    self.edges[lb].curr,
                    self.edges[lb].top,
                )
                && self.edges[lb].winding_delta != 0
                && self.edges[prev].winding_delta != 0
            {
                let bot = self.edges[lb].bot;
                let op2 = self.add_out_pt(prev, bot);
                let top = self.edges[lb].top;
                self.add_join(op1, op2, top);
            }

            if self.edges[lb].next_in_ael != rb {
                let prev = self.edges[rb].prev_in_ael;
                if self.edges[rb].owns_ring()
                    && self.edges[prev].owns_ring()
                    && slopes_equal4(
                        self.edges[prev].curr,
                        self.edges[prev].top,
                        self.edges[rb].curr,
                        self.edges[rb].top,
                    )
                    && self.edges[rb].winding_delta != 0
                    && self.edges[prev].winding_delta != 0
                {
                    let bot = self.edges[rb].bot;
                    let op2 = self.add_out_pt(prev, bot);
                    let top = self.edges[rb].top;
                    self.add_join(op1, op2, top);
                }

                // edges between the new bounds cross the right bound here
                let mut e = self.edges[lb].next_in_ael;
                let pt = self.edges[lb].curr;
                while e != NIL && e != rb {
                    self.intersect_edges(rb, e, pt);
                    e = self.edges[e].next_in_ael;
                }
            }
        }
        Ok(())
    }

    fn process_edges_at_top_of_scanbeam(&mut self, top_y: i64) -> ClipResult<()> {
        let mut e = self.edges.active;
        while e != NIL {
            // maxima are treated as bent horizontals, except those that end
            // in a horizontal
            let mut is_maxima_edge = self.edges.is_maxima(e, top_y);
            if is_maxima_edge {
                let pair = self.edges.maxima_pair_ex(e);
                is_maxima_edge = pair == NIL || !self.edges[pair].is_horizontal();
            }

            if is_maxima_edge {
                if self.options.strictly_simple {
                    self.maxima.push(self.edges[e].top.x);
                }
                let prev = self.edges[e].prev_in_ael;
                self.do_maxima(e)?;
                e = if prev == NIL {
                    self.edges.active
                } else {
                    self.edges[prev].next_in_ael
                };
                continue;
            }

            if self.edges.is_intermediate(e, top_y)
                && self.edges[self.edges[e].next_in_lml].is_horizontal()
            {
                e = self.edges.update_edge_into_ael(e, &mut self.scanbeam)?;
                if self.edges[e].owns_ring() {
                    let bot = self.edges[e].bot;
                    self.add_out_pt(e, bot);
                }
                self.edges.add_to_sel(e);
            } else {
                let x = self.edges[e].top_x(top_y);
                let edge = &mut self.edges[e];
                edge.curr.x = x;
                edge.curr.y = top_y;
            }

            // strictly simple: touching edges both get a vertex here
            if self.options.strictly_simple {
                let prev = self.edges[e].prev_in_ael;
                if self.edges[e].owns_ring()
                    && self.edges[e].winding_delta != 0
                    && prev != NIL
                    && self.edges[prev].owns_ring()
                    && self.edges[prev].curr.x == self.edges[e].curr.x
                    && self.edges[prev].winding_delta != 0
                {
                    let pt = self.edges[e].curr;
                    let op = self.add_out_pt(prev, pt);
                    let op2 = self.add_out_pt(e, pt);
                    self.add_join(op, op2, pt);
                }
            }
            e = self.edges[e].next_in_ael;
        }

        self.maxima.sort_unstable();
        self.process_horizontals()?;
        self.maxima.clear();

        // promote intermediate vertices
        let mut e = self.edges.active;
        while e != NIL {
            if self.edges.is_intermediate(e, top_y) {
                let mut op = NO_POINT;
                if self.edges[e].owns_ring() {
                    let top = self.edges[e].top;
                    op = self.add_out_pt(e, top);
                }
                e = self.edges.update_edge_into_ael(e, &mut self.scanbeam)?;

                // shared edges with a neighbour need a join later
                let prev = self.edges[e].prev_in_ael;
                let next = self.edges[e].next_in_ael;
                if op != NO_POINT {
                    let partner = [prev, next].into_iter().find(|&n| self.shares_edge_with(e, n));
                    if let Some(n) = partner {
                        let bot = self.edges[e].bot;
                        let op2 = self.add_out_pt(n, bot);
                        let top = self.edges[e].top;
                        self.add_join(op, op2, top);
                    }
                }
            }
            e = self.edges[e].next_in_ael;
        }
        Ok(())
    }

    /// `n` runs through the bottom of `e` along the same line, both
    /// contributing to closed output.
    fn shares_edge_with(&self, e: EdgeIdx, n: EdgeIdx) -> bool {
        if n == NIL {
            return false;
        }
        let (a, b) = (&self.edges[e], &self.edges[n]);
        b.curr.x == a.bot.x
            && b.curr.y == a.bot.y
            && b.owns_ring()
            && b.curr.y > b.top.y
            && slopes_equal4(a.curr, a.top, b.curr, b.top)
            && a.winding_delta != 0
            && b.winding_delta != 0
    }

    fn do_maxima(&mut self, e: EdgeIdx) -> ClipResult<()> {
        let pair = self.edges.maxima_pair_ex(e);
        if pair == NIL {
            if self.edges[e].owns_ring() {
                let top = self.edges[e].top;
                self.add_out_pt(e, top);
            }
            self.edges.delete_from_ael(e);
            return Ok(());
        }

        let top = self.edges[e].top;
        let mut next = self.edges[e].next_in_ael;
        while next != NIL && next != pair {
            self.intersect_edges(e, next, top);
            self.edges.swap_positions_in_ael(e, next);
            next = self.edges[e].next_in_ael;
        }

        if self.edges[e].ring == EDGE_UNASSIGNED && self.edges[pair].ring == EDGE_UNASSIGNED {
            self.edges.delete_from_ael(e);
            self.edges.delete_from_ael(pair);
        } else if self.edges[e].owns_ring() && self.edges[pair].owns_ring() {
            self.add_local_max_poly(e, pair, top);
            self.edges.delete_from_ael(e);
            self.edges.delete_from_ael(pair);
        } else if self.edges[e].is_open() {
            if self.edges[e].owns_ring() {
                self.add_out_pt(e, top);
                self.edges[e].ring = EDGE_UNASSIGNED;
            }
            self.edges.delete_from_ael(e);
            if self.edges[pair].owns_ring() {
                self.add_out_pt(pair, top);
                self.edges[pair].ring = EDGE_UNASSIGNED;
            }
            self.edges.delete_from_ael(pair);
        } else {
            return Err(ClipError::InconsistentMaxima { edge: e });
        }
        Ok(())
    }
}
