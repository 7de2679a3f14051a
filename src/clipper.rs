// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public clipping API and the engine state shared by the sweep.
//
// The engine is split over child modules by phase:
//   winding       fill rules, winding counts, contribution test
//   sweep         main scanbeam loop, minima insertion, maxima, edges at top
//   horizontal    horizontal edge processing
//   intersections intersection list building, ordering and execution
//   joins         output point creation, ring merging, common-edge joins
//   fixup         degenerate point removal on finished rings
//   simple        splitting of rings that touch themselves or each other
//   output        orientation, validation and conversion to caller types

use std::marker::PhantomData;

use log::{debug, error, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::active::EdgeList;
use crate::edge::EdgeIdx;
use crate::error::{ClipError, ClipResult};
use crate::geom::{
    to_int_point, BoundingBox, Coordinate, IntPoint, LinearRing, MultiLineString, MultiPolygon,
    Point, Polygon,
    COORD_LIMIT,
};
use crate::local_min::MinimaList;
use crate::ring::{PointIdx, RingManager};
use crate::scanbeam::Scanbeam;

mod fixup;
mod horizontal;
mod intersections;
mod joins;
mod output;
mod simple;
mod sweep;
mod winding;

#[cfg(test)]
mod tests;

// ─────────────────────────────── Public types ──────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    Xor,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FillType {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolygonType {
    Subject,
    Clip,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipOption {
    /// Keep collinear vertices of closed input and output rings.
    PreserveCollinear,
    /// Guarantee output rings neither touch themselves nor each other except
    /// at single points between exterior and hole.
    StrictlySimple,
    /// Emit exteriors clockwise and holes counter-clockwise.
    ReverseOutput,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClipOptions {
    pub preserve_collinear: bool,
    pub strictly_simple: bool,
    pub reverse_output: bool,
}

/// Result of one clip: polygons plus the clipped open paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution<T> {
    pub polygons: MultiPolygon<T>,
    pub lines: MultiLineString<T>,
}

// ─────────────────────────── Engine state ─────────────────────────────────────

/// Two output points to be stitched or split after the sweep. `off_pt` is a
/// second point on the shared edge.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Join {
    pub p1: PointIdx,
    pub p2: PointIdx,
    pub off_pt: IntPoint,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct IntersectNode {
    pub e1: EdgeIdx,
    pub e2: EdgeIdx,
    pub pt: IntPoint,
}

/// Coordinate-independent clipping state on i64 points.
pub(crate) struct Engine {
    pub edges: EdgeList,
    pub minima: MinimaList,
    pub scanbeam: Scanbeam,
    pub rings: RingManager,
    pub joins: Vec<Join>,
    pub ghost_joins: Vec<Join>,
    pub intersections: Vec<IntersectNode>,
    /// x of maxima on the current scanbeam top, for strictly simple output.
    pub maxima: Vec<i64>,
    pub options: ClipOptions,
    pub clip_type: ClipType,
    pub subject_fill: FillType,
    pub clip_fill: FillType,
}

impl Engine {
    fn new(options: ClipOptions) -> Self {
        Engine {
            edges: EdgeList::new(),
            minima: MinimaList::new(),
            scanbeam: Scanbeam::new(),
            rings: RingManager::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            intersections: Vec::new(),
            maxima: Vec::new(),
            options,
            clip_type: ClipType::Union,
            subject_fill: FillType::EvenOdd,
            clip_fill: FillType::EvenOdd,
        }
    }

    fn add_path(&mut self, path: &[IntPoint], poly_type: PolygonType, closed: bool) -> bool {
        let preserve = self.options.preserve_collinear;
        self.minima.add_path(&mut self.edges, path, poly_type, closed, preserve)
    }
}

// ─────────────────────────── Clipper ──────────────────────────────────────────

/// Boolean operations on integer polygons.
///
/// Subject and clip rings are added first, then `execute` runs one sweep per
/// call; input is kept, so several clip types may be run over the same data.
pub struct Clipper<T: Coordinate = i64> {
    engine: Engine,
    _coord: PhantomData<T>,
}

impl<T: Coordinate> Clipper<T> {
    pub fn new() -> Self {
        Self::with_options(ClipOptions::default())
    }

    pub fn with_options(options: ClipOptions) -> Self {
        Clipper {
            engine: Engine::new(options),
            _coord: PhantomData,
        }
    }

    pub fn set_option(&mut self, option: ClipOption, value: bool) {
        let o = &mut self.engine.options;
        match option {
            ClipOption::PreserveCollinear => o.preserve_collinear = value,
            ClipOption::StrictlySimple => o.strictly_simple = value,
            ClipOption::ReverseOutput => o.reverse_output = value,
        }
    }

    pub fn options(&self) -> ClipOptions {
        self.engine.options
    }

    /// Add one ring (or open path when `closed` is false). Returns false when
    /// the input is degenerate or invalid and was ignored.
    pub fn add_ring(&mut self, ring: &[Point<T>], poly_type: PolygonType, closed: bool) -> bool {
        match self.try_add_ring(ring, poly_type, closed) {
            Ok(added) => added,
            Err(e) => {
                warn!("ring rejected: {e}");
                false
            }
        }
    }

    /// As `add_ring`, reporting why invalid input was refused. Degenerate
    /// input is not an error: it yields `Ok(false)`.
    pub fn try_add_ring(
        &mut self,
        ring: &[Point<T>],
        poly_type: PolygonType,
        closed: bool,
    ) -> ClipResult<bool> {
        if !closed && poly_type == PolygonType::Clip {
            return Err(ClipError::OpenClipPath);
        }
        let path = ring
            .iter()
            .map(|p| {
                let ip = to_int_point(p).ok_or(ClipError::CoordinateConversion)?;
                for v in [ip.x, ip.y] {
                    if v > COORD_LIMIT || v < -COORD_LIMIT {
                        return Err(ClipError::CoordinateOutOfRange {
                            value: v,
                            limit: COORD_LIMIT,
                        });
                    }
                }
                Ok(ip)
            })
            .collect::<ClipResult<Vec<IntPoint>>>()?;
        Ok(self.engine.add_path(&path, poly_type, closed))
    }

    /// Add an exterior ring and its holes. True if any ring was added.
    pub fn add_polygon(&mut self, polygon: &[LinearRing<T>], poly_type: PolygonType) -> bool {
        let mut any = false;
        for ring in polygon {
            any |= self.add_ring(ring, poly_type, true);
        }
        any
    }

    pub fn add_multi_polygon(&mut self, polygons: &[Polygon<T>], poly_type: PolygonType) -> bool {
        let mut any = false;
        for polygon in polygons {
            any |= self.add_polygon(polygon, poly_type);
        }
        any
    }

    /// Subject line strings; clipped results come back from
    /// `execute_with_lines`.
    pub fn add_line(&mut self, line: &[Point<T>]) -> bool {
        self.add_ring(line, PolygonType::Subject, false)
    }

    /// Box of all accepted input; all zero when nothing was added.
    pub fn get_bounds(&self) -> BoundingBox<T> {
        let origin = Point::new(T::zero(), T::zero());
        let zero = BoundingBox::new(origin, origin);
        let Some(b) = self.engine.minima.bounds() else {
            return zero;
        };
        let conv = |p: IntPoint| -> Option<Point<T>> {
            Some(Point::new(T::from(p.x)?, T::from(p.y)?))
        };
        match (conv(b.min), conv(b.max)) {
            (Some(min), Some(max)) => BoundingBox::new(min, max),
            _ => zero,
        }
    }

    /// Drop all input.
    pub fn clear(&mut self) {
        let e = &mut self.engine;
        e.edges.clear();
        e.minima.clear();
        e.scanbeam.clear();
        e.rings.clear();
        e.joins.clear();
        e.ghost_joins.clear();
        e.intersections.clear();
        e.maxima.clear();
    }

    /// Run the clip and replace `out` with the resulting polygons. Returns
    /// false when the input could not be clipped; `out` is then empty.
    pub fn execute(
        &mut self,
        clip_type: ClipType,
        out: &mut MultiPolygon<T>,
        subject_fill: FillType,
        clip_fill: FillType,
    ) -> bool {
        out.clear();
        match self.try_execute(clip_type, subject_fill, clip_fill) {
            Ok(solution) => {
                *out = solution.polygons;
                true
            }
            Err(e) => {
                log_failure(&e);
                false
            }
        }
    }

    /// As `execute`, also returning the clipped open paths.
    pub fn execute_with_lines(
        &mut self,
        clip_type: ClipType,
        out: &mut MultiPolygon<T>,
        lines: &mut MultiLineString<T>,
        subject_fill: FillType,
        clip_fill: FillType,
    ) -> bool {
        out.clear();
        lines.clear();
        match self.try_execute(clip_type, subject_fill, clip_fill) {
            Ok(solution) => {
                *out = solution.polygons;
                *lines = solution.lines;
                true
            }
            Err(e) => {
                log_failure(&e);
                false
            }
        }
    }

    pub fn try_execute(
        &mut self,
        clip_type: ClipType,
        subject_fill: FillType,
        clip_fill: FillType,
    ) -> ClipResult<Solution<T>> {
        let e = &mut self.engine;
        e.clip_type = clip_type;
        e.subject_fill = subject_fill;
        e.clip_fill = clip_fill;
        debug!(
            "execute {:?} ({:?}/{:?}) over {} local minima",
            clip_type,
            subject_fill,
            clip_fill,
            e.minima.len()
        );
        let result = e.execute_internal().and_then(|()| e.build_solution::<T>());
        e.dispose_output();
        let solution = result?;
        debug!(
            "execute produced {} polygons and {} lines",
            solution.polygons.len(),
            solution.lines.len()
        );
        Ok(solution)
    }
}

fn log_failure(e: &ClipError) {
    if e.is_fatal() {
        error!("clipping aborted: {e}");
    } else {
        warn!("clipping failed: {e}");
    }
}

impl<T: Coordinate> Default for Clipper<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────── Simplification ───────────────────────────────────

/// Resolve self-intersections of one polygon under `fill`, producing simple
/// polygons.
pub fn simplify_polygon<T: Coordinate>(
    polygon: &[LinearRing<T>],
    fill: FillType,
) -> MultiPolygon<T> {
    let mut clipper = Clipper::<T>::with_options(ClipOptions {
        strictly_simple: true,
        ..ClipOptions::default()
    });
    clipper.add_polygon(polygon, PolygonType::Subject);
    let mut out = Vec::new();
    clipper.execute(ClipType::Union, &mut out, fill, fill);
    out
}

pub fn simplify_polygons<T: Coordinate>(
    polygons: &[Polygon<T>],
    fill: FillType,
) -> MultiPolygon<T> {
    let mut clipper = Clipper::<T>::with_options(ClipOptions {
        strictly_simple: true,
        ..ClipOptions::default()
    });
    clipper.add_multi_polygon(polygons, PolygonType::Subject);
    let mut out = Vec::new();
    clipper.execute(ClipType::Union, &mut out, fill, fill);
    out
}
