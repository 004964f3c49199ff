//! CoverageMap main structure

use geo::MultiPolygon;
use glam::DVec2;

use crate::boundary::Boundary;
use crate::bounds::Bounds;
use crate::cell::ClippedCell;
use crate::config::{ClipMode, MapConfig};
use crate::error::{Degeneracy, Diagnostic, Result};
use crate::point::{GeoPoint, Station};
use crate::projection::Projection;
use crate::render::{self, DrawCommand, MapStyle};
use crate::tessellation::{clip, clip_to_bounds, triangulate, voronoi};
use crate::util::Timed;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A computed coverage map: stations, their service areas, and the region
///
/// Every derived value is recomputed from the inputs by [`compute`], so a
/// map is an immutable snapshot. Stations and cells share one index space:
/// `cells()[i]` is the area served by `stations()[i]`.
///
/// [`compute`]: CoverageMap::compute
///
/// # Examples
///
/// ```
/// use voronoi_coverage::*;
///
/// let boundary = Boundary::from_rings(&[vec![
///     GeoPoint::new(-97.325875, 49.766204),
///     GeoPoint::new(-97.325875, 49.99275),
///     GeoPoint::new(-96.953987, 49.99275),
///     GeoPoint::new(-96.953987, 49.766204),
/// ]])
/// .unwrap();
///
/// let stations = vec![
///     GeoPoint::new(-97.14, 49.89).with_label("Station 1"),
///     GeoPoint::new(-97.05, 49.85),
///     GeoPoint::new(-97.25, 49.93),
/// ];
///
/// let map = CoverageMap::compute(MapConfig::default(), &stations, &boundary).unwrap();
/// assert_eq!(map.station_count(), 3);
/// assert_eq!(map.cells().len(), 3);
/// assert!(map.diagnostics().is_empty());
/// ```
#[derive(Clone)]
pub struct CoverageMap {
    config: MapConfig,
    projection: Projection,
    boundary_name: Option<String>,

    /// Region outline in viewport coordinates
    boundary: MultiPolygon<f64>,

    bounds: Bounds,
    stations: Vec<Station>,

    /// Clipped cells in station order
    cells: Vec<ClippedCell>,

    /// Delaunay neighbors per station
    neighbors: Vec<Vec<usize>>,

    diagnostics: Vec<Diagnostic>,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl CoverageMap {
    /// Run the full pipeline
    ///
    /// Projects the boundary and points, tessellates the projected stations
    /// inside the configured bounds and clips every cell according to the
    /// clip mode. Points outside the projection domain are skipped and
    /// recorded as [`Diagnostic::PointDropped`]; the rest of the map is
    /// still computed.
    ///
    /// # Errors
    ///
    /// Fails before any computation on an invalid config, and with
    /// `InvalidBoundary` when the boundary cannot be projected.
    pub fn compute(config: MapConfig, points: &[GeoPoint], boundary: &Boundary) -> Result<Self> {
        let _t = Timed::info("coverage map");
        config.validate()?;

        let projection = Projection::from_config(&config, boundary)?;
        let planar_boundary = projection.project_boundary(boundary)?;
        let bounds = Bounds::for_policy(&config, &planar_boundary)?;

        let mut diagnostics = Vec::new();
        let mut report = |diagnostic: Diagnostic| {
            diagnostic.log();
            diagnostics.push(diagnostic);
        };

        let stations = {
            let _t = Timed::debug("project stations");
            let mut stations = Vec::with_capacity(points.len());
            for (source_index, point) in points.iter().enumerate() {
                match projection.project(point) {
                    Ok(position) => stations.push(Station {
                        source_index,
                        location: point.clone(),
                        position,
                    }),
                    Err(error) => report(Diagnostic::PointDropped { source_index, error }),
                }
            }
            stations
        };
        if stations.is_empty() {
            report(Diagnostic::EmptyInput);
        }

        let positions: Vec<DVec2> = stations.iter().map(|s| s.position).collect();
        let triangulation = {
            let _t = Timed::debug("triangulate");
            triangulate(&positions)
        };

        if positions.len() >= 3 && triangulation.is_collinear() {
            report(Diagnostic::DegenerateGeometry {
                seed_index: None,
                kind: Degeneracy::Collinear,
            });
        }
        for seed in 0..positions.len() {
            if triangulation.is_placed(seed) {
                continue;
            }
            let kind = match triangulation.duplicate_of(seed) {
                Some(first) => Degeneracy::Coincident { first },
                None => Degeneracy::Unplaced,
            };
            report(Diagnostic::DegenerateGeometry {
                seed_index: Some(seed),
                kind,
            });
        }

        let raw_cells = {
            let _t = Timed::debug("voronoi");
            voronoi(&triangulation, &bounds)
        };

        let cells: Vec<ClippedCell> = {
            let _t = Timed::debug("clip");
            raw_cells
                .iter()
                .map(|cell| {
                    let placed = triangulation.is_placed(cell.seed_index);
                    if placed && cell.is_empty() {
                        report(Diagnostic::DegenerateGeometry {
                            seed_index: Some(cell.seed_index),
                            kind: Degeneracy::EmptyCell,
                        });
                    }

                    let clipped = match config.clip_mode {
                        ClipMode::Rectangle => clip_to_bounds(cell, &bounds),
                        ClipMode::Boundary => clip(cell, &planar_boundary),
                    };
                    if !cell.is_empty() && clipped.is_empty() {
                        report(Diagnostic::ClipMismatch {
                            seed_index: cell.seed_index,
                        });
                    }
                    clipped
                })
                .collect()
        };

        let neighbors = (0..positions.len())
            .map(|seed| triangulation.neighbors(seed))
            .collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::from_entries(
            positions
                .iter()
                .enumerate()
                .filter(|&(seed, _)| triangulation.is_placed(seed))
                .map(|(seed, &p)| (seed, p)),
        );

        log::info!(
            "computed {} cells from {} points ({} diagnostics)",
            cells.len(),
            points.len(),
            diagnostics.len()
        );

        Ok(Self {
            config,
            projection,
            boundary_name: boundary.name().map(str::to_string),
            boundary: planar_boundary,
            bounds,
            stations,
            cells,
            neighbors,
            diagnostics,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to compute this map
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The projection every coordinate went through
    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The rectangle raw cells were restricted to
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Region outline in viewport coordinates
    #[inline]
    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    #[inline]
    pub fn boundary_name(&self) -> Option<&str> {
        self.boundary_name.as_deref()
    }

    /// Projected stations in seed order
    #[inline]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    #[inline]
    pub fn station(&self, seed_index: usize) -> Option<&Station> {
        self.stations.get(seed_index)
    }

    #[inline]
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Clipped cells, one per station
    #[inline]
    pub fn cells(&self) -> &[ClippedCell] {
        &self.cells
    }

    /// Get a cell by seed index
    ///
    /// Returns `None` if the index is out of range.
    #[inline]
    pub fn cell(&self, seed_index: usize) -> Option<&ClippedCell> {
        self.cells.get(seed_index)
    }

    /// Stations whose cells share an edge with this one
    ///
    /// Returns an empty slice for an invalid index or an unplaced station.
    pub fn neighbors(&self, seed_index: usize) -> &[usize] {
        self.neighbors
            .get(seed_index)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Every non-fatal condition met while computing
    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Input indices of the points that were skipped
    pub fn dropped_points(&self) -> Vec<usize> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::PointDropped { source_index, .. } => Some(*source_index),
                _ => None,
            })
            .collect()
    }

    /// Find the station serving a viewport position (requires spatial-index feature)
    ///
    /// The nearest placed station owns the Voronoi cell containing the
    /// position. Positions outside the boundary still resolve to a station;
    /// returns `None` only when the map has no stations.
    #[cfg(feature = "spatial-index")]
    pub fn find_station(&self, position: DVec2) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }

    /// Find the station serving a geographic location (requires spatial-index feature)
    ///
    /// Returns `None` for locations outside the projection domain.
    #[cfg(feature = "spatial-index")]
    pub fn find_station_geo(&self, location: &GeoPoint) -> Option<usize> {
        let position = self.projection.project(location).ok()?;
        self.find_station(position)
    }

    /// Draw commands for this map
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        render::render(
            &self.boundary,
            self.boundary_name(),
            &self.cells,
            &self.stations,
            &self.config.station_kind,
        )
    }

    /// Render this map as an SVG document sized to the viewport
    pub fn to_svg(&self, style: &impl MapStyle) -> String {
        render::to_svg(
            &self.draw_commands(),
            self.config.width,
            self.config.height,
            style,
        )
    }
}
