// Copyright 2025 Lars Brubaker
// WASM bindings for vatti-clip

use vatti_clip::{
    ClipOption, ClipType, Clipper, FillType, LinearRing, MultiPolygon, Point, PolygonType,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A stateful clipper that accumulates subject and clip rings then executes.
///
/// Results are returned as flat arrays: `get_coordinates` gives
/// [x0,y0, x1,y1, ...] for every output ring back to back, `get_ring_lengths`
/// the point count of each ring, and `get_polygon_sizes` how many consecutive
/// rings make up each polygon (exterior first).
#[wasm_bindgen]
pub struct ClipperJs {
    inner: Clipper<i32>,
    polygons: MultiPolygon<i32>,
    lines: Vec<Vec<Point<i32>>>,
}

#[wasm_bindgen]
impl ClipperJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ClipperJs {
        ClipperJs {
            inner: Clipper::new(),
            polygons: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Add a closed ring from a flat [x0,y0, x1,y1, ...] Int32Array.
    /// poly_type: 0=Subject 1=Clip
    pub fn add_ring(&mut self, coords: &[i32], poly_type: u32) -> bool {
        let pt = if poly_type == 1 { PolygonType::Clip } else { PolygonType::Subject };
        self.inner.add_ring(&points(coords), pt, true)
    }

    /// Add an open subject path from a flat [x0,y0, x1,y1, ...] Int32Array.
    pub fn add_line(&mut self, coords: &[i32]) -> bool {
        self.inner.add_line(&points(coords))
    }

    /// Set an option (0 = PreserveCollinear, 1 = StrictlySimple, 2 = ReverseOutput).
    pub fn set_option(&mut self, option: u32, value: bool) {
        let opt = match option {
            0 => ClipOption::PreserveCollinear,
            1 => ClipOption::StrictlySimple,
            2 => ClipOption::ReverseOutput,
            _ => return,
        };
        self.inner.set_option(opt, value);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.polygons.clear();
        self.lines.clear();
    }

    /// Execute and return true on success.
    /// clip_type: 0=Intersection 1=Union 2=Difference 3=Xor
    /// fill: 0=EvenOdd 1=NonZero 2=Positive 3=Negative
    pub fn execute(&mut self, clip_type: u32, subject_fill: u32, clip_fill: u32) -> bool {
        let ct = match clip_type {
            0 => ClipType::Intersection,
            2 => ClipType::Difference,
            3 => ClipType::Xor,
            _ => ClipType::Union,
        };
        self.inner.execute_with_lines(
            ct,
            &mut self.polygons,
            &mut self.lines,
            fill_type(subject_fill),
            fill_type(clip_fill),
        )
    }

    pub fn polygon_count(&self) -> u32 {
        self.polygons.len() as u32
    }

    pub fn get_polygon_sizes(&self) -> Vec<u32> {
        self.polygons.iter().map(|p| p.len() as u32).collect()
    }

    pub fn get_ring_lengths(&self) -> Vec<u32> {
        self.polygons.iter().flatten().map(|r| r.len() as u32).collect()
    }

    pub fn get_coordinates(&self) -> Vec<i32> {
        flatten(self.polygons.iter().flatten())
    }

    pub fn get_line_lengths(&self) -> Vec<u32> {
        self.lines.iter().map(|l| l.len() as u32).collect()
    }

    pub fn get_line_coordinates(&self) -> Vec<i32> {
        flatten(self.lines.iter())
    }
}

impl Default for ClipperJs {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_type(fill: u32) -> FillType {
    match fill {
        1 => FillType::NonZero,
        2 => FillType::Positive,
        3 => FillType::Negative,
        _ => FillType::EvenOdd,
    }
}

fn points(coords: &[i32]) -> LinearRing<i32> {
    coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

fn flatten<'a, I>(rings: I) -> Vec<i32>
where
    I: Iterator<Item = &'a Vec<Point<i32>>>,
{
    rings.flat_map(|r| r.iter().flat_map(|p| [p.x, p.y])).collect()
}

/// Convenience: union of every ring in a flat coordinate array split by
/// `ring_lengths`. Returns the flat output coordinates.
#[wasm_bindgen]
pub fn union_rings(coords: &[i32], ring_lengths: &[u32], fill: u32) -> Vec<i32> {
    let mut c = ClipperJs::new();
    let mut start = 0usize;
    for &n in ring_lengths {
        let end = (start + 2 * n as usize).min(coords.len());
        c.add_ring(&coords[start..end], 0);
        start = end;
    }
    if !c.execute(1, fill, fill) {
        return Vec::new();
    }
    c.get_coordinates()
}
