//! Voronoi cell structures
//!
//! A [`VoronoiCell`] is the raw cell of one seed restricted to the bounds
//! rectangle. A [`ClippedCell`] is what remains after clipping against the
//! region of interest and may consist of several disjoint pieces.

use geo::{Area, Coord, LineString, MultiPolygon, Polygon};
use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The Voronoi cell of one seed, restricted to the bounds rectangle
///
/// The polygon is stored open (the closing edge from the last vertex back to
/// the first is implied) and wound counter-clockwise in y-up coordinates.
/// Cells are convex. An empty polygon marks a seed that received no area,
/// such as a later copy of a coincident seed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the seed in the projected point sequence
    pub seed_index: usize,

    /// Cell outline, implicitly closed
    pub polygon: Vec<DVec2>,
}

impl VoronoiCell {
    /// Create a cell
    ///
    /// This is typically called during tessellation, not by user code.
    pub fn new(seed_index: usize, polygon: Vec<DVec2>) -> Self {
        Self { seed_index, polygon }
    }

    /// A cell with no area
    pub fn empty(seed_index: usize) -> Self {
        Self::new(seed_index, Vec::new())
    }

    /// Whether the cell has no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygon.len() < 3
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Planar area of the cell
    pub fn area(&self) -> f64 {
        signed_area(&self.polygon).abs()
    }

    /// Whether a point lies inside or on the cell, with tolerance
    ///
    /// Relies on the cell being convex and counter-clockwise.
    pub fn contains(&self, point: DVec2, tolerance: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        let n = self.polygon.len();
        (0..n).all(|i| {
            let a = self.polygon[i];
            let b = self.polygon[(i + 1) % n];
            let edge = b - a;
            let length = edge.length();
            length == 0.0 || edge.perp_dot(point - a) / length >= -tolerance
        })
    }

    /// Outline with the first vertex repeated at the end
    pub fn closed_ring(&self) -> Vec<DVec2> {
        let mut ring = self.polygon.clone();
        if let Some(&first) = self.polygon.first() {
            ring.push(first);
        }
        ring
    }

    /// Convert to a `geo` polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .polygon
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        Polygon::new(LineString::new(coords), Vec::new())
    }
}

/// A Voronoi cell after clipping to the region of interest
///
/// Owns zero, one or several polygons: clipping against a multi-part or
/// non-convex boundary can split a cell, and a cell that misses the boundary
/// entirely keeps no geometry at all. Rings are closed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedCell {
    /// Index of the seed in the projected point sequence
    pub seed_index: usize,

    /// Clipped geometry in viewport coordinates
    pub pieces: MultiPolygon<f64>,
}

impl ClippedCell {
    pub fn new(seed_index: usize, pieces: MultiPolygon<f64>) -> Self {
        Self { seed_index, pieces }
    }

    /// A cell with no geometry
    pub fn empty(seed_index: usize) -> Self {
        Self::new(seed_index, MultiPolygon::new(Vec::new()))
    }

    /// Wrap a raw cell unchanged
    pub fn from_cell(cell: &VoronoiCell) -> Self {
        if cell.is_empty() {
            Self::empty(cell.seed_index)
        } else {
            Self::new(cell.seed_index, MultiPolygon::new(vec![cell.to_polygon()]))
        }
    }

    /// Whether nothing of the cell survived clipping
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.0.is_empty()
    }

    /// Number of disjoint polygons
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.0.len()
    }

    /// Every ring, exteriors followed by their holes
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> + '_ {
        self.pieces
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
    }

    /// Total planar area
    pub fn area(&self) -> f64 {
        self.pieces.unsigned_area()
    }
}

/// Shoelace area; positive for counter-clockwise rings (y up)
///
/// Vertices are taken relative to the first one so large coordinate offsets
/// do not cancel out the result.
pub(crate) fn signed_area(polygon: &[DVec2]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let origin = polygon[0];
    (1..n - 1)
        .map(|i| (polygon[i] - origin).perp_dot(polygon[i + 1] - origin))
        .sum::<f64>()
        / 2.0
}
