//! Planar tessellation
//!
//! Delaunay triangulation of the projected seeds, the dual Voronoi cells
//! restricted to a bounds rectangle, and clipping of those cells to the
//! region of interest.

pub mod clip;
pub mod delaunay;
pub mod voronoi;

pub use clip::{clip, clip_to_bounds};
pub use delaunay::{triangulate, Triangulation};
pub use voronoi::voronoi;
