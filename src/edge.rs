// Copyright 2025 Lars Brubaker
// License: MIT
//
// Edges of the input geometry.
//
// Every input ring becomes a cycle of edges stored contiguously in the edge
// arena (`next`/`prev` follow the input order). Coordinates use the sweep's
// convention: y grows downward, `bot` is the endpoint with the larger y and
// `top` the one with the smaller y. `dx` is the inverse slope (dx/dy) and is
// the HORIZONTAL sentinel for edges without y extent.

use crate::clipper::PolygonType;
use crate::geom::{round, IntPoint, HORIZONTAL};

/// Index into the edge arena.
pub type EdgeIdx = u32;
/// Null edge link.
pub const NIL: EdgeIdx = u32::MAX;

/// Edge does not currently own an output ring.
pub const EDGE_UNASSIGNED: i32 = -1;
/// First edge of an open path; never enters the sweep.
pub const EDGE_SKIP: i32 = -2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeSide {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub bot: IntPoint,
    /// Position at the current sweep line.
    pub curr: IntPoint,
    pub top: IntPoint,
    pub dx: f64,
    pub poly_type: PolygonType,
    pub side: EdgeSide,
    /// +1 / -1 by the bound's direction, 0 for open paths.
    pub winding_delta: i32,
    pub winding_count: i32,
    /// Winding count of the opposite polygon type.
    pub winding_count2: i32,
    /// Owning output ring, or EDGE_UNASSIGNED / EDGE_SKIP.
    pub ring: i32,
    pub next: EdgeIdx,
    pub prev: EdgeIdx,
    /// Next edge of the same bound, toward its local maximum.
    pub next_in_lml: EdgeIdx,
    pub next_in_ael: EdgeIdx,
    pub prev_in_ael: EdgeIdx,
    pub next_in_sel: EdgeIdx,
    pub prev_in_sel: EdgeIdx,
}

impl Edge {
    /// First-stage initialisation: only the vertex and ring links are known.
    pub fn new(curr: IntPoint, next: EdgeIdx, prev: EdgeIdx) -> Self {
        Edge {
            bot: IntPoint::default(),
            curr,
            top: IntPoint::default(),
            dx: 0.0,
            poly_type: PolygonType::Subject,
            side: EdgeSide::Left,
            winding_delta: 0,
            winding_count: 0,
            winding_count2: 0,
            ring: EDGE_UNASSIGNED,
            next,
            prev,
            next_in_lml: NIL,
            next_in_ael: NIL,
            prev_in_ael: NIL,
            next_in_sel: NIL,
            prev_in_sel: NIL,
        }
    }

    /// Second-stage initialisation once duplicates are gone: orient the
    /// segment from `curr` to the following vertex.
    pub fn init_segment(&mut self, next_pt: IntPoint, poly_type: PolygonType) {
        if self.curr.y >= next_pt.y {
            self.bot = self.curr;
            self.top = next_pt;
        } else {
            self.top = self.curr;
            self.bot = next_pt;
        }
        self.set_dx();
        self.poly_type = poly_type;
    }

    pub fn set_dx(&mut self) {
        let dy = self.top.y - self.bot.y;
        self.dx = if dy == 0 {
            HORIZONTAL
        } else {
            (self.top.x - self.bot.x) as f64 / dy as f64
        };
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.dx == HORIZONTAL
    }

    #[inline]
    pub fn owns_ring(&self) -> bool {
        self.ring >= 0
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.winding_delta == 0
    }

    /// Swap the x ends so a horizontal is traversed in bound order.
    pub fn reverse_horizontal(&mut self) {
        std::mem::swap(&mut self.top.x, &mut self.bot.x);
    }

    /// X of the edge at sweep line `y`, rounded to the lattice.
    #[inline]
    pub fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y {
            self.top.x
        } else {
            self.bot.x + round(self.dx * (y - self.bot.y) as f64)
        }
    }

    /// Smallest lattice x at or right of the edge on row `y`.
    fn ceil_x_at(&self, y: i64) -> i64 {
        let (num, den) = self.x_offset_at(y);
        self.bot.x + ceil_div(num, den) as i64
    }

    /// Largest lattice x at or left of the edge on row `y`.
    fn floor_x_at(&self, y: i64) -> i64 {
        let (num, den) = self.x_offset_at(y);
        self.bot.x + floor_div(num, den) as i64
    }

    fn x_offset_at(&self, y: i64) -> (i128, i128) {
        let num = (y - self.bot.y) as i128 * (self.top.x - self.bot.x) as i128;
        let den = (self.top.y - self.bot.y) as i128;
        (num, den)
    }

    /// Smallest lattice y at or below (toward bot) the edge in column `x`.
    fn ceil_y_at(&self, x: i64) -> i64 {
        let num = (x - self.bot.x) as i128 * (self.top.y - self.bot.y) as i128;
        let den = (self.top.x - self.bot.x) as i128;
        self.bot.y + ceil_div(num, den) as i64
    }
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

/// Lattice point where `e1` and `e2` cross, biased toward the edges' bottoms
/// and clamped to the current scanbeam: never above the lower of the two
/// tops, never below the sweep line (`e1.curr.y`).
pub(crate) fn intersection_point(e1: &Edge, e2: &Edge) -> IntPoint {
    let mut ip;
    if e1.dx == e2.dx {
        let y = e1.curr.y;
        return IntPoint::new(e1.top_x(y), y);
    } else if e1.dx == 0.0 {
        ip = IntPoint::new(e1.bot.x, 0);
        ip.y = if e2.is_horizontal() {
            e2.bot.y
        } else {
            let b2 = e2.bot.y as f64 - e2.bot.x as f64 / e2.dx;
            round(ip.x as f64 / e2.dx + b2)
        };
    } else if e2.dx == 0.0 {
        ip = IntPoint::new(e2.bot.x, 0);
        ip.y = if e1.is_horizontal() {
            e1.bot.y
        } else {
            let b1 = e1.bot.y as f64 - e1.bot.x as f64 / e1.dx;
            round(ip.x as f64 / e1.dx + b1)
        };
    } else {
        let b1 = e1.bot.x as f64 - e1.bot.y as f64 * e1.dx;
        let b2 = e2.bot.x as f64 - e2.bot.y as f64 * e2.dx;
        let q = (b2 - b1) / (e1.dx - e2.dx);
        let x = if e1.dx.abs() < e2.dx.abs() {
            e1.dx * q + b1
        } else {
            e2.dx * q + b2
        };
        ip = IntPoint::new(round(x), round(q));
        if !e1.is_horizontal() && !e2.is_horizontal() {
            let shallow = if e1.dx.abs() > e2.dx.abs() { e1 } else { e2 };
            ip = if shallow.dx.abs() > 1.0 {
                nearest_along_x_dimension(e1, e2, ip, shallow.dx)
            } else {
                nearest_along_y_dimension(e1, e2, ip)
            };
        }
    }

    if ip.y < e1.top.y || ip.y < e2.top.y {
        ip.y = e1.top.y.max(e2.top.y);
        ip.x = if e1.dx.abs() < e2.dx.abs() {
            e1.top_x(ip.y)
        } else {
            e2.top_x(ip.y)
        };
    }
    if ip.y > e1.curr.y {
        ip.y = e1.curr.y;
        // the more vertical edge gives the better x
        ip.x = if e1.dx.abs() > e2.dx.abs() {
            e2.top_x(ip.y)
        } else {
            e1.top_x(ip.y)
        };
    }
    ip
}

/// Keep the row, move x toward the bottoms until the point is at or beyond
/// both edges on that row.
pub(crate) fn nearest_along_x_dimension(
    e1: &Edge,
    e2: &Edge,
    mut ip: IntPoint,
    dx: f64,
) -> IntPoint {
    if dx > 0.0 {
        let target = e1.ceil_x_at(ip.y).max(e2.ceil_x_at(ip.y));
        ip.x = ip.x.max(target);
    } else {
        let target = e1.floor_x_at(ip.y).min(e2.floor_x_at(ip.y));
        ip.x = ip.x.min(target);
    }
    ip
}

/// Keep the column, move y toward the bottoms until the point is at or
/// below both edges in that column.
pub(crate) fn nearest_along_y_dimension(e1: &Edge, e2: &Edge, mut ip: IntPoint) -> IntPoint {
    let target = e1.ceil_y_at(ip.x).max(e2.ceil_y_at(ip.x));
    ip.y = ip.y.max(target);
    ip
}
