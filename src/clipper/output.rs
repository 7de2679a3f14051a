// Copyright 2025 Lars Brubaker
// License: MIT

use log::warn;

use super::{Engine, Solution};
use crate::error::{ClipError, ClipResult};
use crate::geom::{Coordinate, IntPoint, LinearRing, Point, Polygon};
use crate::ring::{RingIdx, NO_POINT, NO_RING};

impl Engine {
    /// Orient every closed ring: exteriors one way, holes the other.
    pub(crate) fn fix_orientations(&mut self) {
        let reverse = self.options.reverse_output;
        for r in 0..self.rings.rings.len() as RingIdx {
            let ring = self.rings.ring(r);
            if ring.points == NO_POINT || ring.index != r || ring.is_open {
                continue;
            }
            if (ring.is_hole ^ reverse) == (self.rings.ring_area(r) > 0.0) {
                let p = ring.points;
                self.rings.reverse_links(p);
            }
        }
    }

    /// Nearest enclosing ring of the opposite kind, skipping emptied rings
    /// and rings of the same kind.
    fn fix_hole_linkage(&mut self, r: RingIdx) {
        let is_hole = self.rings.ring(r).is_hole;
        let mut fl = self.rings.parse_first_left(self.rings.ring(r).first_left);
        for _ in 0..self.rings.rings.len() {
            if fl == NO_RING || (fl != r && self.rings.ring(fl).is_hole != is_hole) {
                self.rings.ring_mut(r).first_left = fl;
                return;
            }
            fl = self.rings.parse_first_left(self.rings.ring(fl).first_left);
        }
        self.rings.ring_mut(r).first_left = NO_RING;
    }

    /// Convert the finished rings to caller coordinates. Holes are attached
    /// to their exterior; open rings become lines.
    pub(crate) fn build_solution<T: Coordinate>(&mut self) -> ClipResult<Solution<T>> {
        self.rings.validate()?;

        let count = self.rings.rings.len() as RingIdx;
        let mut live = Vec::new();
        for r in 0..count {
            let ring = self.rings.ring(r);
            if ring.points == NO_POINT || ring.index != r {
                continue;
            }
            let min = if ring.is_open { 2 } else { 3 };
            if self.rings.point_count(ring.points) < min {
                continue;
            }
            live.push(r);
        }
        for &r in &live {
            if !self.rings.ring(r).is_open {
                self.fix_hole_linkage(r);
            }
        }

        let mut solution = Solution {
            polygons: Vec::new(),
            lines: Vec::new(),
        };
        // polygon slot of every exterior ring
        let mut slot: Vec<Option<usize>> = vec![None; count as usize];
        for &r in &live {
            let ring = self.rings.ring(r);
            if ring.is_open {
                let mut line = self.contour::<T>(r)?;
                line.pop();
                solution.lines.push(line);
            } else if !ring.is_hole {
                slot[r as usize] = Some(solution.polygons.len());
                solution.polygons.push(vec![self.contour::<T>(r)?]);
            }
        }
        for &r in &live {
            let ring = self.rings.ring(r);
            if ring.is_open || !ring.is_hole {
                continue;
            }
            let parent = ring.first_left;
            let target = if parent == NO_RING { None } else { slot[parent as usize] };
            let contour = self.contour::<T>(r)?;
            match target {
                Some(i) => solution.polygons[i].push(contour),
                None => {
                    warn!("hole ring {r} has no enclosing exterior; emitting it as a polygon");
                    let mut outer = contour;
                    outer.reverse();
                    let polygon: Polygon<T> = vec![outer];
                    solution.polygons.push(polygon);
                }
            }
        }
        Ok(solution)
    }

    /// The ring's points walked backward from the last point, closed by
    /// repeating the first.
    fn contour<T: Coordinate>(&self, r: RingIdx) -> ClipResult<LinearRing<T>> {
        let start = self.rings.prev(self.rings.ring(r).points);
        let mut out = Vec::with_capacity(self.rings.point_count(start) + 1);
        let mut p = start;
        loop {
            out.push(convert::<T>(self.rings.pt(p))?);
            p = self.rings.prev(p);
            if p == start {
                break;
            }
        }
        out.push(out[0]);
        Ok(out)
    }
}

fn convert<T: Coordinate>(p: IntPoint) -> ClipResult<Point<T>> {
    let x = T::from(p.x).ok_or(ClipError::CoordinateOverflow { value: p.x })?;
    let y = T::from(p.y).ok_or(ClipError::CoordinateOverflow { value: p.y })?;
    Ok(Point::new(x, y))
}
