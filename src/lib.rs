// vatti-clip: integer polygon clipping by Vatti scanline sweep
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod active;
pub mod arena;
pub mod clipper;
pub mod edge;
pub mod error;
pub mod geom;
pub mod local_min;
pub mod ring;
pub mod scanbeam;

pub use clipper::{
    simplify_polygon, simplify_polygons, ClipOption, ClipOptions, ClipType, Clipper, FillType,
    PolygonType, Solution,
};
pub use error::{ClipError, ClipResult};
pub use geom::{
    area, orientation, point_in_ring, BoundingBox, Coordinate, LineString, LinearRing,
    MultiLineString, MultiPolygon,
    Point, PointInRing, Polygon, COORD_LIMIT,
};
