//! Region-of-interest boundary in geographic coordinates

use geo::{Area, Coord, Intersects, Line, LineString, MultiPolygon, Polygon};
use rstar::{RTree, RTreeObject, AABB};
use serde_json::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoverageError, Result};
use crate::point::GeoPoint;

/// A validated boundary polygon (x = longitude, y = latitude)
///
/// Rings do not need to be explicitly closed; `geo` closes them on
/// construction. Construction rejects geometry that cannot be drawn or
/// clipped against: empty input, rings with fewer than three distinct
/// vertices, coordinates outside the geographic ranges, self-intersecting
/// rings and zero-area outlines.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    name: Option<String>,
    geometry: MultiPolygon<f64>,
}

impl Boundary {
    /// Validate and wrap a lon/lat multipolygon
    pub fn new(geometry: MultiPolygon<f64>) -> Result<Self> {
        validate(&geometry)?;
        Ok(Self { name: None, geometry })
    }

    /// Build a boundary from plain rings, one polygon part per ring
    pub fn from_rings(rings: &[Vec<GeoPoint>]) -> Result<Self> {
        let polygons = rings
            .iter()
            .map(|ring| {
                let coords: Vec<Coord<f64>> = ring
                    .iter()
                    .map(|p| Coord { x: p.longitude, y: p.latitude })
                    .collect();
                Polygon::new(LineString::new(coords), Vec::new())
            })
            .collect();
        Self::new(MultiPolygon::new(polygons))
    }

    /// Parse a GeoJSON document
    ///
    /// Accepts a FeatureCollection, a single Feature or a bare geometry. The
    /// first `Polygon` or `MultiPolygon` geometry found is used and the
    /// feature's `name` property, if any, is kept. Other properties are ignored.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CoverageError::InvalidBoundary(format!("malformed GeoJSON: {}", e)))?;
        Self::from_geojson_value(&value)
    }

    /// Parse an already-decoded GeoJSON value
    pub fn from_geojson_value(value: &Value) -> Result<Self> {
        let (name, geometry) = find_polygonal(value)?.ok_or_else(|| {
            CoverageError::InvalidBoundary("no Polygon or MultiPolygon geometry found".into())
        })?;
        let mut boundary = Self::new(geometry)?;
        boundary.name = name;
        Ok(boundary)
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name from the source feature
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Underlying lon/lat geometry
    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Number of rings, exteriors and holes together
    pub fn ring_count(&self) -> usize {
        self.geometry
            .0
            .iter()
            .map(|polygon| 1 + polygon.interiors().len())
            .sum()
    }
}

fn validate(geometry: &MultiPolygon<f64>) -> Result<()> {
    if geometry.0.is_empty() {
        return Err(CoverageError::InvalidBoundary("boundary has no polygons".into()));
    }

    for (part, polygon) in geometry.0.iter().enumerate() {
        validate_ring(polygon.exterior(), part, "exterior")?;
        for hole in polygon.interiors() {
            validate_ring(hole, part, "hole")?;
        }
    }

    if geometry.unsigned_area() <= 0.0 {
        return Err(CoverageError::InvalidBoundary("boundary encloses no area".into()));
    }
    Ok(())
}

fn validate_ring(ring: &LineString<f64>, part: usize, role: &str) -> Result<()> {
    for coord in ring.coords() {
        let point = GeoPoint::new(coord.x, coord.y);
        if !point.is_valid() {
            return Err(CoverageError::InvalidBoundary(format!(
                "polygon {} {} has invalid coordinate ({}, {})",
                part, role, coord.x, coord.y
            )));
        }
    }

    let mut vertices: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for &coord in ring.coords() {
        if vertices.last() != Some(&coord) {
            vertices.push(coord);
        }
    }
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    if vertices.len() < 3 {
        return Err(CoverageError::InvalidBoundary(format!(
            "polygon {} {} needs at least 3 distinct vertices (got {})",
            part,
            role,
            vertices.len()
        )));
    }

    if ring_self_intersects(&vertices) {
        return Err(CoverageError::InvalidBoundary(format!(
            "polygon {} {} intersects itself",
            part, role
        )));
    }
    Ok(())
}

/// Ring edge keyed by its position in the ring
struct RingEdge {
    index: usize,
    line: Line<f64>,
}

impl RTreeObject for RingEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.line.start.into(), self.line.end.into())
    }
}

/// Check non-adjacent edges of an implicitly closed ring for intersections
///
/// Only edges whose bounding boxes overlap are compared, so long outlines
/// stay close to `O(n log n)`.
fn ring_self_intersects(vertices: &[Coord<f64>]) -> bool {
    let n = vertices.len();
    let edges: Vec<RingEdge> = (0..n)
        .map(|index| RingEdge {
            index,
            line: Line::new(vertices[index], vertices[(index + 1) % n]),
        })
        .collect();
    let adjacent = |a: usize, b: usize| {
        let gap = a.abs_diff(b);
        gap <= 1 || gap == n - 1
    };

    let tree = RTree::bulk_load(edges);
    let crossing = tree.iter().any(|edge| {
        tree.locate_in_envelope_intersecting(&edge.envelope())
            .any(|other| {
                other.index > edge.index
                    && !adjacent(edge.index, other.index)
                    && edge.line.intersects(&other.line)
            })
    });
    crossing
}

/// Depth-first search for the first polygonal geometry in a GeoJSON value
fn find_polygonal(value: &Value) -> Result<Option<(Option<String>, MultiPolygon<f64>)>> {
    match value["type"].as_str() {
        Some("FeatureCollection") => {
            let features = value["features"].as_array().ok_or_else(|| {
                CoverageError::InvalidBoundary("FeatureCollection without features".into())
            })?;
            for feature in features {
                if let Some(found) = find_polygonal(feature)? {
                    return Ok(Some(found));
                }
            }
            Ok(None)
        }
        Some("Feature") => {
            let name = value["properties"]["name"].as_str().map(str::to_string);
            Ok(parse_geometry(&value["geometry"])?.map(|geometry| (name, geometry)))
        }
        Some(_) => Ok(parse_geometry(value)?.map(|geometry| (None, geometry))),
        None => Err(CoverageError::InvalidBoundary("GeoJSON object has no type".into())),
    }
}

fn parse_geometry(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    let coords = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Some(MultiPolygon::new(vec![parse_polygon(coords)?]))),
        Some("MultiPolygon") => {
            let parts = coords.as_array().ok_or_else(|| {
                CoverageError::InvalidBoundary("MultiPolygon coordinates must be an array".into())
            })?;
            let polygons = parts.iter().map(parse_polygon).collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon::new(polygons)))
        }
        _ => Ok(None),
    }
}

/// Parse `[exterior, hole, hole, ...]`
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let rings = value
        .as_array()
        .ok_or_else(|| CoverageError::InvalidBoundary("polygon must be an array of rings".into()))?;
    let mut rings = rings.iter().map(parse_ring);
    let exterior = rings
        .next()
        .ok_or_else(|| CoverageError::InvalidBoundary("polygon has no exterior ring".into()))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> Result<LineString<f64>> {
    let positions = value
        .as_array()
        .ok_or_else(|| CoverageError::InvalidBoundary("ring must be an array of positions".into()))?;
    positions
        .iter()
        .map(|position| match (position[0].as_f64(), position[1].as_f64()) {
            (Some(x), Some(y)) => Ok(Coord { x, y }),
            _ => Err(CoverageError::InvalidBoundary(format!(
                "invalid position {}",
                position
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINNIPEG: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[[
                    [-97.325875, 49.766204],
                    [-97.325875, 49.99275],
                    [-96.953987, 49.99275],
                    [-96.953987, 49.766204],
                    [-97.325875, 49.766204]
                ]]]
            },
            "properties": { "name": "Winnipeg" }
        }]
    }"#;

    fn ring(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(x, y)| GeoPoint::new(x, y)).collect()
    }

    #[test]
    fn test_parse_feature_collection() {
        let boundary = Boundary::from_geojson_str(WINNIPEG).unwrap();
        assert_eq!(boundary.name(), Some("Winnipeg"));
        assert_eq!(boundary.geometry().0.len(), 1);
        assert_eq!(boundary.ring_count(), 1);
    }

    #[test]
    fn test_parse_bare_polygon_with_hole() {
        let text = r#"{
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 10]],
                [[2, 2], [4, 2], [4, 4], [2, 4]]
            ]
        }"#;
        let boundary = Boundary::from_geojson_str(text).unwrap();
        assert_eq!(boundary.name(), None);
        assert_eq!(boundary.ring_count(), 2);
        // rings are closed implicitly
        let exterior = boundary.geometry().0[0].exterior();
        assert_eq!(exterior.0.first(), exterior.0.last());
    }

    #[test]
    fn test_skips_non_polygonal_features() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0, 0] }, "properties": {} },
                { "type": "Feature", "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]] },
                  "properties": { "name": "Tri" } }
            ]
        }"#;
        let boundary = Boundary::from_geojson_str(text).unwrap();
        assert_eq!(boundary.name(), Some("Tri"));
    }

    #[test]
    fn test_rejects_missing_geometry() {
        let text = r#"{ "type": "FeatureCollection", "features": [] }"#;
        assert!(matches!(
            Boundary::from_geojson_str(text),
            Err(CoverageError::InvalidBoundary(_))
        ));
        assert!(Boundary::from_geojson_str("not json").is_err());
    }

    #[test]
    fn test_rejects_degenerate_rings() {
        let result = Boundary::from_rings(&[ring(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)])]);
        assert!(result.is_err());

        // collinear ring has no area
        let result = Boundary::from_rings(&[ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])]);
        assert!(result.is_err());

        assert!(Boundary::from_rings(&[]).is_err());
    }

    #[test]
    fn test_rejects_self_intersection() {
        let bowtie = ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        let result = Boundary::from_rings(&[bowtie]);
        assert!(matches!(result, Err(CoverageError::InvalidBoundary(msg)) if msg.contains("intersects")));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let result = Boundary::from_rings(&[ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 95.0)])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_accepts_unclosed_and_non_convex() {
        let l_shape = ring(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);
        let boundary = Boundary::from_rings(&[l_shape]).unwrap();
        assert!((boundary.geometry().unsigned_area() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_geojson_ring_without_closing_coordinate() {
        let open = r#"{ "type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 3], [0, 3]]] }"#;
        let boundary = Boundary::from_geojson_str(open).unwrap();

        let exterior = boundary.geometry().0[0].exterior();
        assert_eq!(exterior.0.len(), 5);
        assert_eq!(exterior.0.first(), exterior.0.last());
        assert!((boundary.geometry().unsigned_area() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_long_ring_is_checked_against_distant_edges() {
        // a 2000-vertex circle-like ring whose last edge crosses the first quarter
        let mut points: Vec<(f64, f64)> = (0..2000)
            .map(|i| {
                let angle = i as f64 / 2000.0 * std::f64::consts::TAU;
                (10.0 * angle.cos(), 10.0 * angle.sin())
            })
            .collect();
        let valid = Boundary::from_rings(&[ring(&points)]);
        assert!(valid.is_ok());

        points.push((12.0, 5.0));
        points.push((5.0, -12.0));
        let crossed = Boundary::from_rings(&[ring(&points)]);
        assert!(matches!(crossed, Err(CoverageError::InvalidBoundary(msg)) if msg.contains("intersects")));
    }
}
