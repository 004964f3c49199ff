//! Service-area maps from station locations
//!
//! Projects geographic station points and a region boundary onto a screen
//! plane, partitions the plane into Voronoi cells seeded by the stations,
//! clips every cell to the region and renders the result.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_coverage::*;
//!
//! let boundary = io::load_boundary("winnipeg.geojson").unwrap();
//! let stations = io::load_points("fire_stations.json").unwrap();
//!
//! let config = MapConfigBuilder::new()
//!     .clip_mode(ClipMode::Boundary)
//!     .build().unwrap();
//!
//! let map = CoverageMap::compute(config, &stations, &boundary).unwrap();
//! for diagnostic in map.diagnostics() {
//!     eprintln!("{:?}", diagnostic);
//! }
//!
//! std::fs::write("coverage.svg", map.to_svg(&DefaultStyle)).unwrap();
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) location-to-station lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, cells and draw commands

// Modules
pub mod error;
pub mod config;
pub mod point;
pub mod boundary;
pub mod projection;
pub mod bounds;
pub mod cell;
pub mod tessellation;
pub mod map;
pub mod render;
pub mod io;
mod util;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{CoverageError, Result, Diagnostic, Degeneracy};
pub use config::{MapConfig, MapConfigBuilder, ProjectionFamily, ProjectionMode, BoundsPolicy, ClipMode};
pub use point::{GeoPoint, Station};
pub use boundary::Boundary;
pub use projection::Projection;
pub use bounds::Bounds;
pub use cell::{VoronoiCell, ClippedCell};
pub use map::CoverageMap;
pub use render::{render, to_svg, DrawCommand, MapStyle, DefaultStyle, PaletteStyle, PathStyle, MarkerStyle};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
