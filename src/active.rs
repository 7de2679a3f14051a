// Copyright 2025 Lars Brubaker
// License: MIT
//
// Edge arena plus the two intrusive lists threaded through it:
//
//   AEL (active edge list): every edge crossing the sweep line, ordered left
//   to right by `curr.x`. `active` is its head.
//   SEL (sorted edge list): scratch list used for horizontal processing and
//   for ordering intersections. `sorted` is its head.
//
// Both are doubly-linked through index fields of `Edge`; NIL terminates.

use std::ops::{Index, IndexMut};

use crate::edge::{Edge, EdgeIdx, NIL};
use crate::error::{ClipError, ClipResult};
use crate::scanbeam::Scanbeam;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

pub struct EdgeList {
    pub edges: Vec<Edge>,
    pub active: EdgeIdx,
    pub sorted: EdgeIdx,
}

impl Index<EdgeIdx> for EdgeList {
    type Output = Edge;
    #[inline]
    fn index(&self, idx: EdgeIdx) -> &Edge {
        &self.edges[idx as usize]
    }
}

impl IndexMut<EdgeIdx> for EdgeList {
    #[inline]
    fn index_mut(&mut self, idx: EdgeIdx) -> &mut Edge {
        &mut self.edges[idx as usize]
    }
}

impl EdgeList {
    pub fn new() -> Self {
        EdgeList {
            edges: Vec::new(),
            active: NIL,
            sorted: NIL,
        }
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.active = NIL;
        self.sorted = NIL;
    }

    /// True when `e2` belongs left of `e1` at the current sweep line. Ties on
    /// `curr.x` compare the edges at the lower of the two tops.
    pub fn e2_inserts_before_e1(&self, e1: EdgeIdx, e2: EdgeIdx) -> bool {
        let (a, b) = (&self[e1], &self[e2]);
        if b.curr.x == a.curr.x {
            if b.top.y > a.top.y {
                b.top.x < a.top_x(b.top.y)
            } else {
                a.top.x > b.top_x(a.top.y)
            }
        } else {
            b.curr.x < a.curr.x
        }
    }

    /// Insertion-sort `edge` into the AEL, scanning right from `start` (or
    /// from the head when `start` is NIL).
    pub fn insert_into_ael(&mut self, edge: EdgeIdx, start: EdgeIdx) {
        if self.active == NIL {
            self[edge].prev_in_ael = NIL;
            self[edge].next_in_ael = NIL;
            self.active = edge;
        } else if start == NIL && self.e2_inserts_before_e1(self.active, edge) {
            let head = self.active;
            self[edge].prev_in_ael = NIL;
            self[edge].next_in_ael = head;
            self[head].prev_in_ael = edge;
            self.active = edge;
        } else {
            let mut s = if start == NIL { self.active } else { start };
            while self[s].next_in_ael != NIL
                && !self.e2_inserts_before_e1(self[s].next_in_ael, edge)
            {
                s = self[s].next_in_ael;
            }
            let next = self[s].next_in_ael;
            self[edge].next_in_ael = next;
            if next != NIL {
                self[next].prev_in_ael = edge;
            }
            self[edge].prev_in_ael = s;
            self[s].next_in_ael = edge;
        }
    }

    pub fn delete_from_ael(&mut self, e: EdgeIdx) {
        let prev = self[e].prev_in_ael;
        let next = self[e].next_in_ael;
        if prev == NIL && next == NIL && e != self.active {
            return; // already removed
        }
        if prev != NIL {
            self[prev].next_in_ael = next;
        } else {
            self.active = next;
        }
        if next != NIL {
            self[next].prev_in_ael = prev;
        }
        self[e].next_in_ael = NIL;
        self[e].prev_in_ael = NIL;
    }

    pub fn delete_from_sel(&mut self, e: EdgeIdx) {
        let prev = self[e].prev_in_sel;
        let next = self[e].next_in_sel;
        if prev == NIL && next == NIL && e != self.sorted {
            return;
        }
        if prev != NIL {
            self[prev].next_in_sel = next;
        } else {
            self.sorted = next;
        }
        if next != NIL {
            self[next].prev_in_sel = prev;
        }
        self[e].next_in_sel = NIL;
        self[e].prev_in_sel = NIL;
    }

    /// Push onto the front of the SEL.
    pub fn add_to_sel(&mut self, e: EdgeIdx) {
        let head = self.sorted;
        self[e].prev_in_sel = NIL;
        self[e].next_in_sel = head;
        if head != NIL {
            self[head].prev_in_sel = e;
        }
        self.sorted = e;
    }

    pub fn pop_from_sel(&mut self) -> Option<EdgeIdx> {
        if self.sorted == NIL {
            return None;
        }
        let e = self.sorted;
        self.delete_from_sel(e);
        Some(e)
    }

    pub fn copy_ael_to_sel(&mut self) {
        let mut e = self.active;
        self.sorted = e;
        while e != NIL {
            self[e].prev_in_sel = self[e].prev_in_ael;
            self[e].next_in_sel = self[e].next_in_ael;
            e = self[e].next_in_ael;
        }
    }

    /// Exchange two edges' AEL positions. Does nothing if either edge has
    /// already left the AEL.
    pub fn swap_positions_in_ael(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        if self[e1].next_in_ael == self[e1].prev_in_ael
            || self[e2].next_in_ael == self[e2].prev_in_ael
        {
            return;
        }
        if self[e1].next_in_ael == e2 {
            let next = self[e2].next_in_ael;
            if next != NIL {
                self[next].prev_in_ael = e1;
            }
            let prev = self[e1].prev_in_ael;
            if prev != NIL {
                self[prev].next_in_ael = e2;
            }
            self[e2].prev_in_ael = prev;
            self[e2].next_in_ael = e1;
            self[e1].prev_in_ael = e2;
            self[e1].next_in_ael = next;
        } else if self[e2].next_in_ael == e1 {
            let next = self[e1].next_in_ael;
            if next != NIL {
                self[next].prev_in_ael = e2;
            }
            let prev = self[e2].prev_in_ael;
            if prev != NIL {
                self[prev].next_in_ael = e1;
            }
            self[e1].prev_in_ael = prev;
            self[e1].next_in_ael = e2;
            self[e2].prev_in_ael = e1;
            self[e2].next_in_ael = next;
        } else {
            let next = self[e1].next_in_ael;
            let prev = self[e1].prev_in_ael;
            self[e1].next_in_ael = self[e2].next_in_ael;
            let n = self[e1].next_in_ael;
            if n != NIL {
                self[n].prev_in_ael = e1;
            }
            self[e1].prev_in_ael = self[e2].prev_in_ael;
            let p = self[e1].prev_in_ael;
            if p != NIL {
                self[p].next_in_ael = e1;
            }
            self[e2].next_in_ael = next;
            if next != NIL {
                self[next].prev_in_ael = e2;
            }
            self[e2].prev_in_ael = prev;
            if prev != NIL {
                self[prev].next_in_ael = e2;
            }
        }
        if self[e1].prev_in_ael == NIL {
            self.active = e1;
        } else if self[e2].prev_in_ael == NIL {
            self.active = e2;
        }
    }

    pub fn swap_positions_in_sel(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        if self[e1].next_in_sel == NIL && self[e1].prev_in_sel == NIL {
            return;
        }
        if self[e2].next_in_sel == NIL && self[e2].prev_in_sel == NIL {
            return;
        }
        if self[e1].next_in_sel == e2 {
            let next = self[e2].next_in_sel;
            if next != NIL {
                self[next].prev_in_sel = e1;
            }
            let prev = self[e1].prev_in_sel;
            if prev != NIL {
                self[prev].next_in_sel = e2;
            }
            self[e2].prev_in_sel = prev;
            self[e2].next_in_sel = e1;
            self[e1].prev_in_sel = e2;
            self[e1].next_in_sel = next;
        } else if self[e2].next_in_sel == e1 {
            let next = self[e1].next_in_sel;
            if next != NIL {
                self[next].prev_in_sel = e2;
            }
            let prev = self[e2].prev_in_sel;
            if prev != NIL {
                self[prev].next_in_sel = e1;
            }
            self[e1].prev_in_sel = prev;
            self[e1].next_in_sel = e2;
            self[e2].prev_in_sel = e1;
            self[e2].next_in_sel = next;
        } else {
            let next = self[e1].next_in_sel;
            let prev = self[e1].prev_in_sel;
            self[e1].next_in_sel = self[e2].next_in_sel;
            let n = self[e1].next_in_sel;
            if n != NIL {
                self[n].prev_in_sel = e1;
            }
            self[e1].prev_in_sel = self[e2].prev_in_sel;
            let p = self[e1].prev_in_sel;
            if p != NIL {
                self[p].next_in_sel = e1;
            }
            self[e2].next_in_sel = next;
            if next != NIL {
                self[next].prev_in_sel = e2;
            }
            self[e2].prev_in_sel = prev;
            if prev != NIL {
                self[prev].next_in_sel = e2;
            }
        }
        if self[e1].prev_in_sel == NIL {
            self.sorted = e1;
        } else if self[e2].prev_in_sel == NIL {
            self.sorted = e2;
        }
    }

    /// Replace `e` in the AEL by the next edge of its bound, carrying over
    /// the output ring, side and winding state. Returns the new edge.
    pub fn update_edge_into_ael(
        &mut self,
        e: EdgeIdx,
        scanbeam: &mut Scanbeam,
    ) -> ClipResult<EdgeIdx> {
        let next = self[e].next_in_lml;
        if next == NIL {
            return Err(ClipError::NoNextInBound { edge: e });
        }
        let prev_ael = self[e].prev_in_ael;
        let next_ael = self[e].next_in_ael;
        if prev_ael != NIL {
            self[prev_ael].next_in_ael = next;
        } else {
            self.active = next;
        }
        if next_ael != NIL {
            self[next_ael].prev_in_ael = next;
        }
        let (ring, side, wd, wc, wc2) = {
            let old = &self[e];
            (old.ring, old.side, old.winding_delta, old.winding_count, old.winding_count2)
        };
        let n = &mut self[next];
        n.ring = ring;
        n.side = side;
        n.winding_delta = wd;
        n.winding_count = wc;
        n.winding_count2 = wc2;
        n.curr = n.bot;
        n.prev_in_ael = prev_ael;
        n.next_in_ael = next_ael;
        if !n.is_horizontal() {
            scanbeam.insert(n.top.y);
        }
        Ok(next)
    }

    #[inline]
    pub fn next_in_ael(&self, e: EdgeIdx, dir: Direction) -> EdgeIdx {
        match dir {
            Direction::LeftToRight => self[e].next_in_ael,
            Direction::RightToLeft => self[e].prev_in_ael,
        }
    }

    /// The edge meeting `e` at its top that also ends its bound there.
    pub fn maxima_pair(&self, e: EdgeIdx) -> EdgeIdx {
        let edge = &self[e];
        let next = &self[edge.next];
        if next.top == edge.top && next.next_in_lml == NIL {
            return edge.next;
        }
        let prev = &self[edge.prev];
        if prev.top == edge.top && prev.next_in_lml == NIL {
            return edge.prev;
        }
        NIL
    }

    /// As `maxima_pair`, but NIL unless the pair is in the AEL (a horizontal
    /// pair may still be waiting in the SEL).
    pub fn maxima_pair_ex(&self, e: EdgeIdx) -> EdgeIdx {
        let pair = self.maxima_pair(e);
        if pair == NIL {
            return NIL;
        }
        let p = &self[pair];
        if p.ring == crate::edge::EDGE_SKIP
            || (p.next_in_ael == p.prev_in_ael && !p.is_horizontal())
        {
            return NIL;
        }
        pair
    }

    #[inline]
    pub fn is_maxima(&self, e: EdgeIdx, y: i64) -> bool {
        e != NIL && self[e].top.y == y && self[e].next_in_lml == NIL
    }

    #[inline]
    pub fn is_intermediate(&self, e: EdgeIdx, y: i64) -> bool {
        self[e].top.y == y && self[e].next_in_lml != NIL
    }

    /// Iterate the AEL from left to right.
    pub fn ael_iter(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        std::iter::successors((self.active != NIL).then_some(self.active), move |&e| {
            let n = self[e].next_in_ael;
            (n != NIL).then_some(n)
        })
    }
}

impl Default for EdgeList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::PolygonType;
    use crate::geom::IntPoint;

    fn push_edge(list: &mut EdgeList, a: (i64, i64), b: (i64, i64)) -> EdgeIdx {
        let mut e = Edge::new(IntPoint::new(a.0, a.1), NIL, NIL);
        e.init_segment(IntPoint::new(b.0, b.1), PolygonType::Subject);
        e.curr = e.bot;
        list.edges.push(e);
        (list.edges.len() - 1) as EdgeIdx
    }

    #[test]
    fn insertion_keeps_left_to_right_order() {
        let mut list = EdgeList::new();
        let a = push_edge(&mut list, (5, 0), (5, 10));
        let b = push_edge(&mut list, (0, 0), (0, 10));
        let c = push_edge(&mut list, (9, 0), (9, 10));
        list.insert_into_ael(a, NIL);
        list.insert_into_ael(b, NIL);
        list.insert_into_ael(c, NIL);
        assert_eq!(list.ael_iter().collect::<Vec<_>>(), vec![b, a, c]);
    }

    #[test]
    fn ties_break_on_projected_top() {
        let mut list = EdgeList::new();
        // both start at (5,10); one leans left, the other right
        let right = push_edge(&mut list, (5, 10), (9, 0));
        let left = push_edge(&mut list, (5, 10), (1, 0));
        list.insert_into_ael(right, NIL);
        list.insert_into_ael(left, NIL);
        assert_eq!(list.ael_iter().collect::<Vec<_>>(), vec![left, right]);
    }

    #[test]
    fn swap_and_delete() {
        let mut list = EdgeList::new();
        let ids: Vec<_> = (0..4).map(|i| push_edge(&mut list, (i * 2, 0), (i * 2, 10))).collect();
        for &e in &ids {
            list.insert_into_ael(e, NIL);
        }
        list.swap_positions_in_ael(ids[0], ids[1]);
        assert_eq!(list.ael_iter().collect::<Vec<_>>(), vec![ids[1], ids[0], ids[2], ids[3]]);
        list.swap_positions_in_ael(ids[1], ids[3]);
        assert_eq!(list.ael_iter().collect::<Vec<_>>(), vec![ids[3], ids[0], ids[2], ids[1]]);
        list.delete_from_ael(ids[3]);
        list.delete_from_ael(ids[3]);
        assert_eq!(list.active, ids[0]);
        assert_eq!(list.ael_iter().count(), 3);
    }

    #[test]
    fn sel_copy_pop_and_swap() {
        let mut list = EdgeList::new();
        let ids: Vec<_> = (0..3).map(|i| push_edge(&mut list, (i, 0), (i, 10))).collect();
        for &e in &ids {
            list.insert_into_ael(e, NIL);
        }
        list.copy_ael_to_sel();
        list.swap_positions_in_sel(ids[1], ids[2]);
        assert_eq!(list[ids[0]].next_in_sel, ids[2]);
        assert_eq!(list.pop_from_sel(), Some(ids[0]));
        assert_eq!(list.pop_from_sel(), Some(ids[2]));
        assert_eq!(list.pop_from_sel(), Some(ids[1]));
        assert_eq!(list.pop_from_sel(), None);
    }

    #[test]
    fn advancing_past_bound_end_is_an_error() {
        let mut list = EdgeList::new();
        let e = push_edge(&mut list, (0, 0), (0, 10));
        list.insert_into_ael(e, NIL);
        let mut sb = Scanbeam::new();
        assert_eq!(
            list.update_edge_into_ael(e, &mut sb),
            Err(ClipError::NoNextInBound { edge: e })
        );
    }

    #[test]
    fn advancing_carries_state_to_the_next_segment() {
        let mut list = EdgeList::new();
        let lower = push_edge(&mut list, (0, 10), (2, 5));
        let upper = push_edge(&mut list, (2, 5), (3, 0));
        list[lower].next_in_lml = upper;
        list[lower].ring = 4;
        list[lower].winding_count = 2;
        list.insert_into_ael(lower, NIL);
        let mut sb = Scanbeam::new();
        let e = list.update_edge_into_ael(lower, &mut sb).expect("has successor");
        assert_eq!(e, upper);
        assert_eq!(list.active, upper);
        assert_eq!(list[upper].ring, 4);
        assert_eq!(list[upper].winding_count, 2);
        assert_eq!(list[upper].curr, IntPoint::new(2, 5));
        assert_eq!(sb.pop(), Some(0));
    }
}
