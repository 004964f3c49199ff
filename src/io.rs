//! Loading stations and boundaries from disk
//!
//! Point files are JSON arrays of records such as
//!
//! ```json
//! [{ "Longitude": -97.14, "Latitude": 49.89, "Station_Location": "Station 1" }]
//! ```
//!
//! Keys are matched case-insensitively, coordinates may be numbers or numeric
//! strings, and the name may be given as `name`, `label` or
//! `station_location`. Range checking is left to the projection, so a record
//! with latitude 91 loads fine and is dropped later with a diagnostic.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::boundary::Boundary;
use crate::error::{CoverageError, Result};
use crate::point::GeoPoint;

const NAME_KEYS: [&str; 3] = ["name", "label", "station_location"];

/// Read station points from a JSON file
pub fn load_points(path: impl AsRef<Path>) -> Result<Vec<GeoPoint>> {
    parse_points(&read(path.as_ref())?)
}

/// Read a boundary from a GeoJSON file
pub fn load_boundary(path: impl AsRef<Path>) -> Result<Boundary> {
    Boundary::from_geojson_str(&read(path.as_ref())?)
}

/// Parse station points from JSON text
///
/// # Errors
///
/// Returns `InvalidInput` naming the record index when a record is not an
/// object or has a missing or non-numeric coordinate.
pub fn parse_points(text: &str) -> Result<Vec<GeoPoint>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CoverageError::InvalidInput(format!("points are not valid JSON: {}", e)))?;
    let records = value
        .as_array()
        .ok_or_else(|| CoverageError::InvalidInput("points must be a JSON array".into()))?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let fields = record.as_object().ok_or_else(|| {
                CoverageError::InvalidInput(format!("record {} is not an object", index))
            })?;
            parse_record(index, fields)
        })
        .collect()
}

fn parse_record(index: usize, fields: &Map<String, Value>) -> Result<GeoPoint> {
    let longitude = coordinate(index, fields, "longitude")?;
    let latitude = coordinate(index, fields, "latitude")?;
    let mut point = GeoPoint::new(longitude, latitude);

    let name = NAME_KEYS
        .iter()
        .find_map(|key| field(fields, key))
        .and_then(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty());
    if let Some(name) = name {
        point = point.with_label(name);
    }
    Ok(point)
}

fn coordinate(index: usize, fields: &Map<String, Value>, key: &str) -> Result<f64> {
    let value = field(fields, key).ok_or_else(|| {
        CoverageError::InvalidInput(format!("record {} has no {}", index, key))
    })?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        CoverageError::InvalidInput(format!("record {} has a malformed {}: {}", index, key, value))
    })
}

/// Case-insensitive key lookup
fn field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CoverageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points() {
        let text = r#"[
            { "Longitude": -97.14, "Latitude": 49.89, "Station_Location": "Station 1" },
            { "longitude": "-97.2", "latitude": " 49.8 " },
            { "LONGITUDE": -97.0, "LATITUDE": 91, "name": "" }
        ]"#;
        let points = parse_points(text).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], GeoPoint::new(-97.14, 49.89).with_label("Station 1"));
        assert_eq!(points[1], GeoPoint::new(-97.2, 49.8));
        assert_eq!(points[2].latitude, 91.0);
        assert_eq!(points[2].label, None);
    }

    #[test]
    fn test_malformed_records() {
        let err = parse_points(r#"[{ "longitude": 1, "latitude": 2 }, { "longitude": "east", "latitude": 2 }]"#)
            .unwrap_err();
        assert!(matches!(err, CoverageError::InvalidInput(ref m) if m.starts_with("record 1")));

        let err = parse_points(r#"[{ "latitude": 2 }]"#).unwrap_err();
        assert!(matches!(err, CoverageError::InvalidInput(ref m) if m.contains("no longitude")));

        assert!(parse_points(r#"[42]"#).is_err());
        assert!(parse_points(r#"{ "longitude": 1 }"#).is_err());
        assert!(parse_points("not json").is_err());
        assert_eq!(parse_points("[]").unwrap(), Vec::new());
    }

    #[test]
    fn test_missing_file() {
        let err = load_points("/nonexistent/stations.json").unwrap_err();
        assert!(matches!(err, CoverageError::Io { ref path, .. } if path.contains("stations.json")));
        assert!(load_boundary("/nonexistent/boundary.geojson").is_err());
    }
}
