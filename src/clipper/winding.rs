// Copyright 2025 Lars Brubaker
// License: MIT

use super::{ClipType, Engine, FillType, PolygonType};
use crate::edge::{EdgeIdx, NIL};

impl Engine {
    /// Fill rule of the edge's own polygon type, and of the other type.
    pub(crate) fn fill_types(&self, poly_type: PolygonType) -> (FillType, FillType) {
        match poly_type {
            PolygonType::Subject => (self.subject_fill, self.clip_fill),
            PolygonType::Clip => (self.clip_fill, self.subject_fill),
        }
    }

    #[inline]
    pub(crate) fn is_even_odd_fill(&self, e: EdgeIdx) -> bool {
        self.fill_types(self.edges[e].poly_type).0 == FillType::EvenOdd
    }

    #[inline]
    pub(crate) fn is_even_odd_alt_fill(&self, e: EdgeIdx) -> bool {
        self.fill_types(self.edges[e].poly_type).1 == FillType::EvenOdd
    }

    /// Seed `winding_count` from the nearest same-type edge to the left, then
    /// accumulate `winding_count2` over the opposite-type edges between.
    pub(crate) fn set_winding_count(&mut self, edge: EdgeIdx) {
        let poly_type = self.edges[edge].poly_type;
        let delta = self.edges[edge].winding_delta;
        let mut e = self.edges[edge].prev_in_ael;
        while e != NIL
            && (self.edges[e].poly_type != poly_type || self.edges[e].winding_delta == 0)
        {
            e = self.edges[e].prev_in_ael;
        }

        if e == NIL {
            let count = if delta == 0 {
                if self.fill_types(poly_type).0 == FillType::Negative {
                    -1
                } else {
                    1
                }
            } else {
                delta
            };
            self.edges[edge].winding_count = count;
            self.edges[edge].winding_count2 = 0;
            e = self.edges.active;
        } else if delta == 0 && self.clip_type != ClipType::Union {
            self.edges[edge].winding_count = 1;
            self.edges[edge].winding_count2 = self.edges[e].winding_count2;
            e = self.edges[e].next_in_ael;
        } else if self.is_even_odd_fill(edge) {
            let count = if delta == 0 {
                // an open path: inside a polygon of its own type?
                let mut inside = true;
                let mut e2 = self.edges[e].prev_in_ael;
                while e2 != NIL {
                    if self.edges[e2].poly_type == self.edges[e].poly_type
                        && self.edges[e2].winding_delta != 0
                    {
                        inside = !inside;
                    }
                    e2 = self.edges[e2].prev_in_ael;
                }
                if inside {
                    0
                } else {
                    1
                }
            } else {
                delta
            };
            self.edges[edge].winding_count = count;
            self.edges[edge].winding_count2 = self.edges[e].winding_count2;
            e = self.edges[e].next_in_ael;
        } else {
            let (wc, wd) = (self.edges[e].winding_count, self.edges[e].winding_delta);
            let count = if wc * wd < 0 {
                // left of us the count is falling toward zero
                if wc.abs() > 1 {
                    if wd * delta < 0 {
                        wc
                    } else {
                        wc + delta
                    }
                } else if delta == 0 {
                    1
                } else {
                    delta
                }
            } else if delta == 0 {
                if wc < 0 {
                    wc - 1
                } else {
                    wc + 1
                }
            } else if wd * delta < 0 {
                wc
            } else {
                wc + delta
            };
            self.edges[edge].winding_count = count;
            self.edges[edge].winding_count2 = self.edges[e].winding_count2;
            e = self.edges[e].next_in_ael;
        }

        if self.is_even_odd_alt_fill(edge) {
            while e != edge && e != NIL {
                if self.edges[e].winding_delta != 0 {
                    let wc2 = &mut self.edges[edge].winding_count2;
                    *wc2 = if *wc2 == 0 { 1 } else { 0 };
                }
                e = self.edges[e].next_in_ael;
            }
        } else {
            while e != edge && e != NIL {
                let d = self.edges[e].winding_delta;
                self.edges[edge].winding_count2 += d;
                e = self.edges[e].next_in_ael;
            }
        }
    }

    /// Whether the edge currently bounds the result.
    pub(crate) fn is_contributing(&self, e: EdgeIdx) -> bool {
        let edge = &self.edges[e];
        let (fill, fill2) = self.fill_types(edge.poly_type);
        let wc = edge.winding_count;
        let wc2 = edge.winding_count2;

        let inside_own = match fill {
            FillType::EvenOdd => !(edge.winding_delta == 0 && wc != 1),
            FillType::NonZero => wc.abs() == 1,
            FillType::Positive => wc == 1,
            FillType::Negative => wc == -1,
        };
        if !inside_own {
            return false;
        }

        let inside_other = || match fill2 {
            FillType::EvenOdd | FillType::NonZero => wc2 != 0,
            FillType::Positive => wc2 > 0,
            FillType::Negative => wc2 < 0,
        };
        let outside_other = || match fill2 {
            FillType::EvenOdd | FillType::NonZero => wc2 == 0,
            FillType::Positive => wc2 <= 0,
            FillType::Negative => wc2 >= 0,
        };

        match self.clip_type {
            ClipType::Intersection => inside_other(),
            ClipType::Union => outside_other(),
            ClipType::Difference => {
                if edge.poly_type == PolygonType::Subject {
                    outside_other()
                } else {
                    inside_other()
                }
            }
            ClipType::Xor => {
                if edge.winding_delta == 0 {
                    outside_other()
                } else {
                    true
                }
            }
        }
    }
}

/// Winding count as seen by a fill rule: signed for positive / negative,
/// magnitude otherwise.
pub(crate) fn effective_count(fill: FillType, count: i32) -> i32 {
    match fill {
        FillType::Positive => count,
        FillType::Negative => -count,
        FillType::EvenOdd | FillType::NonZero => count.abs(),
    }
}
