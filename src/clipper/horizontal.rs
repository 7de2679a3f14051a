// Copyright 2025 Lars Brubaker
// License: MIT
//
// Horizontal edges are swept along their own length: every AEL edge whose x
// lies within the horizontal's span is crossed in order, consecutive
// horizontals of one bound are handled in a single pass, and overlapping
// horizontals record joins.

use super::Engine;
use crate::active::Direction;
use crate::edge::{EdgeIdx, NIL};
use crate::error::ClipResult;
use crate::geom::{horz_segments_overlap, slopes_equal4, IntPoint};
use crate::ring::{PointIdx, NO_POINT};

/// Direction of travel along a horizontal and its x extent.
fn horz_direction(bot_x: i64, top_x: i64) -> (Direction, i64, i64) {
    if bot_x < top_x {
        (Direction::LeftToRight, bot_x, top_x)
    } else {
        (Direction::RightToLeft, top_x, bot_x)
    }
}

impl Engine {
    pub(crate) fn process_horizontals(&mut self) -> ClipResult<()> {
        while let Some(e) = self.edges.pop_from_sel() {
            self.process_horizontal(e)?;
        }
        Ok(())
    }

    /// Join every output horizontal waiting in the SEL that overlaps `horz`
    /// to `op`, then remember `op` as a ghost for minima arriving later on
    /// this row.
    fn join_overlapping_horizontals(&mut self, horz: EdgeIdx, op: PointIdx, ghost_off: IntPoint) {
        let (bot_x, top_x) = (self.edges[horz].bot.x, self.edges[horz].top.x);
        let mut next = self.edges.sorted;
        while next != NIL {
            let n = &self.edges[next];
            if n.owns_ring() && horz_segments_overlap(bot_x, top_x, n.bot.x, n.top.x) {
                let off = n.top;
                let op2 = self.last_out_pt(next);
                self.add_join(op2, op, off);
            }
            next = self.edges[next].next_in_sel;
        }
        self.add_ghost_join(op, ghost_off);
    }

    fn process_horizontal(&mut self, mut horz: EdgeIdx) -> ClipResult<()> {
        let is_open = self.edges[horz].is_open();
        let (mut dir, mut horz_left, mut horz_right) =
            horz_direction(self.edges[horz].bot.x, self.edges[horz].top.x);

        let mut last_horz = horz;
        while self.edges[last_horz].next_in_lml != NIL
            && self.edges[self.edges[last_horz].next_in_lml].is_horizontal()
        {
            last_horz = self.edges[last_horz].next_in_lml;
        }
        let max_pair = if self.edges[last_horz].next_in_lml == NIL {
            self.edges.maxima_pair(last_horz)
        } else {
            NIL
        };

        // maxima on this row that the horizontal passes over (strictly simple)
        let maxima = std::mem::take(&mut self.maxima);
        let mut max_cursor: Vec<i64> = Vec::new();
        if !maxima.is_empty() {
            let bot_x = self.edges[horz].bot.x;
            let last_top_x = self.edges[last_horz].top.x;
            max_cursor = match dir {
                Direction::LeftToRight => {
                    let first = maxima.iter().position(|&x| x > bot_x).unwrap_or(maxima.len());
                    if first < maxima.len() && maxima[first] >= last_top_x {
                        Vec::new()
                    } else {
                        maxima[first..].to_vec()
                    }
                }
                Direction::RightToLeft => {
                    let mut rev: Vec<i64> = maxima.iter().rev().copied().collect();
                    let first = rev.iter().position(|&x| x <= bot_x).unwrap_or(rev.len());
                    if first < rev.len() && rev[first] <= last_top_x {
                        Vec::new()
                    } else {
                        rev.drain(..first);
                        rev
                    }
                }
            };
        }
        self.maxima = maxima;
        let mut max_pos = 0usize;

        let mut op1 = NO_POINT;
        loop {
            let is_last_horz = horz == last_horz;
            let mut e = self.edges.next_in_ael(horz, dir);
            while e != NIL {
                // add vertices where maxima touch the horizontal
                if !max_cursor.is_empty() {
                    let ex = self.edges[e].curr.x;
                    while max_pos < max_cursor.len()
                        && match dir {
                            Direction::LeftToRight => max_cursor[max_pos] < ex,
                            Direction::RightToLeft => max_cursor[max_pos] > ex,
                        }
                    {
                        if self.edges[horz].owns_ring() && !is_open {
                            let pt = IntPoint::new(max_cursor[max_pos], self.edges[horz].bot.y);
                            self.add_out_pt(horz, pt);
                        }
                        max_pos += 1;
                    }
                }

                let ex = self.edges[e].curr.x;
                if (dir == Direction::LeftToRight && ex > horz_right)
                    || (dir == Direction::RightToLeft && ex < horz_left)
                {
                    break;
                }

                // end of an intermediate horizontal: edges steeper than the
                // next segment stay on its far side
                let next_lml = self.edges[horz].next_in_lml;
                if ex == self.edges[horz].top.x
                    && next_lml != NIL
                    && self.edges[e].dx < self.edges[next_lml].dx
                {
                    break;
                }

                if self.edges[horz].owns_ring() && !is_open {
                    let curr = self.edges[e].curr;
                    op1 = self.add_out_pt(horz, curr);
                    let bot = self.edges[horz].bot;
                    self.join_overlapping_horizontals(horz, op1, bot);
                }

                if e == max_pair && is_last_horz {
                    if self.edges[horz].owns_ring() {
                        let top = self.edges[horz].top;
                        self.add_local_max_poly(horz, max_pair, top);
                    }
                    self.edges.delete_from_ael(horz);
                    self.edges.delete_from_ael(max_pair);
                    return Ok(());
                }

                let pt = IntPoint::new(self.edges[e].curr.x, self.edges[horz].curr.y);
                if dir == Direction::LeftToRight {
                    self.intersect_edges(horz, e, pt);
                } else {
                    self.intersect_edges(e, horz, pt);
                }
                let next = self.edges.next_in_ael(e, dir);
                self.edges.swap_positions_in_ael(horz, e);
                e = next;
            }

            let next_lml = self.edges[horz].next_in_lml;
            if next_lml == NIL || !self.edges[next_lml].is_horizontal() {
                break;
            }
            horz = self.edges.update_edge_into_ael(horz, &mut self.scanbeam)?;
            if self.edges[horz].owns_ring() {
                let bot = self.edges[horz].bot;
                self.add_out_pt(horz, bot);
            }
            (dir, horz_left, horz_right) =
                horz_direction(self.edges[horz].bot.x, self.edges[horz].top.x);
        }

        if self.edges[horz].owns_ring() && op1 == NO_POINT {
            let op = self.last_out_pt(horz);
            let top = self.edges[horz].top;
            self.join_overlapping_horizontals(horz, op, top);
        }

        if self.edges[horz].next_in_lml != NIL {
            if self.edges[horz].owns_ring() {
                let top = self.edges[horz].top;
                let op = self.add_out_pt(horz, top);
                horz = self.edges.update_edge_into_ael(horz, &mut self.scanbeam)?;
                if self.edges[horz].is_open() {
                    return Ok(());
                }
                // no longer horizontal; joins with a collinear neighbour
                let prev = self.edges[horz].prev_in_ael;
                let next = self.edges[horz].next_in_ael;
                let partner = [prev, next].into_iter().find(|&n| self.continues_along(horz, n));
                if let Some(n) = partner {
                    let bot = self.edges[horz].bot;
                    let op2 = self.add_out_pt(n, bot);
                    let top = self.edges[horz].top;
                    self.add_join(op, op2, top);
                }
            } else {
                self.edges.update_edge_into_ael(horz, &mut self.scanbeam)?;
            }
        } else {
            if self.edges[horz].owns_ring() {
                let top = self.edges[horz].top;
                self.add_out_pt(horz, top);
            }
            self.edges.delete_from_ael(horz);
        }
        Ok(())
    }

    /// `n` passes through the bottom of `e` on the same line and both are
    /// contributing closed edges.
    fn continues_along(&self, e: EdgeIdx, n: EdgeIdx) -> bool {
        if n == NIL {
            return false;
        }
        let (a, b) = (&self.edges[e], &self.edges[n]);
        b.curr.x == a.bot.x
            && b.curr.y == a.bot.y
            && b.winding_delta != 0
            && b.owns_ring()
            && b.curr.y > b.top.y
            && slopes_equal4(a.top, a.bot, b.top, b.bot)
    }
}
