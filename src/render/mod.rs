//! Rendering of coverage maps
//!
//! [`render`] turns pipeline output into an ordered list of backend-agnostic
//! [`DrawCommand`]s: the region outline first, then every non-empty cell,
//! then the station markers on top. [`to_svg`] serializes such a list.
//! Both are pure functions.

mod style;
mod svg;

pub use style::{hex, DefaultStyle, MapStyle, MarkerStyle, PaletteStyle, PathStyle, Rgb};
pub use svg::to_svg;

use geo::{LineString, MultiPolygon, Polygon};
use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::ClippedCell;
use crate::point::Station;

/// One closed outline; the first vertex is repeated at the end
pub type Ring = Vec<DVec2>;

/// A backend-agnostic drawing instruction in viewport coordinates
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The region of interest; rings are filled with the even-odd rule
    Boundary {
        name: Option<String>,
        rings: Vec<Ring>,
    },
    /// A clipped Voronoi cell
    Cell { seed_index: usize, rings: Vec<Ring> },
    /// A station dot with its hover text
    Marker {
        seed_index: usize,
        position: DVec2,
        title: String,
    },
}

/// Build the draw list for a map
///
/// `station_kind` names the facility in fallback tooltips, as in
/// `"Fire Station at -97.1, 49.9"`. Cells with no geometry left after
/// clipping produce no command; every station still gets a marker.
pub fn render(
    boundary: &MultiPolygon<f64>,
    boundary_name: Option<&str>,
    cells: &[ClippedCell],
    stations: &[Station],
    station_kind: &str,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(1 + cells.len() + stations.len());

    commands.push(DrawCommand::Boundary {
        name: boundary_name.map(str::to_string),
        rings: multi_polygon_rings(boundary),
    });

    commands.extend(cells.iter().filter(|c| !c.is_empty()).map(|cell| {
        DrawCommand::Cell {
            seed_index: cell.seed_index,
            rings: multi_polygon_rings(&cell.pieces),
        }
    }));

    commands.extend(stations.iter().enumerate().map(|(i, station)| {
        DrawCommand::Marker {
            seed_index: i,
            position: station.position,
            title: station.tooltip(station_kind),
        }
    }));

    commands
}

fn multi_polygon_rings(geometry: &MultiPolygon<f64>) -> Vec<Ring> {
    geometry.0.iter().flat_map(polygon_rings).collect()
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Ring> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .filter(|ring| ring.0.len() >= 3)
        .map(ring_points)
        .collect()
}

fn ring_points(ring: &LineString<f64>) -> Ring {
    let mut points: Ring = ring.coords().map(|c| DVec2::new(c.x, c.y)).collect();
    if points.first() != points.last() {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }
    points
}
