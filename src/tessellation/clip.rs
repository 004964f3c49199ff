//! Clipping Voronoi cells to the region of interest

use geo::{Area, BooleanOps, MultiPolygon};

use crate::bounds::Bounds;
use crate::cell::{ClippedCell, VoronoiCell};

use super::voronoi::{clip_to_rect, normalize};

/// Pieces smaller than this fraction of the unclipped cell are dropped
const SLIVER_RATIO: f64 = 1e-12;

/// Intersect a cell with a planar boundary
///
/// The boundary may be non-convex, have holes and consist of several
/// polygons, so the result can be split into several pieces. A cell that
/// does not overlap the boundary comes back with no pieces.
pub fn clip(cell: &VoronoiCell, boundary: &MultiPolygon<f64>) -> ClippedCell {
    if cell.is_empty() || boundary.0.is_empty() {
        return ClippedCell::empty(cell.seed_index);
    }

    let intersection = cell.to_polygon().intersection(boundary);
    let min_area = cell.area() * SLIVER_RATIO;
    let pieces: Vec<_> = intersection
        .0
        .into_iter()
        .filter(|piece| piece.unsigned_area() > min_area)
        .collect();

    ClippedCell::new(cell.seed_index, MultiPolygon::new(pieces))
}

/// Restrict a cell to a rectangle
///
/// Cells produced by the tessellator already lie inside their bounds; this
/// matters when re-clipping to a tighter rectangle.
pub fn clip_to_bounds(cell: &VoronoiCell, bounds: &Bounds) -> ClippedCell {
    let tolerance = 1e-9 * bounds.width().max(bounds.height());
    let polygon = normalize(clip_to_rect(&cell.polygon, bounds), tolerance);
    ClippedCell::from_cell(&VoronoiCell::new(cell.seed_index, polygon))
}
