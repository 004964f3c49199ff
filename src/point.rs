//! Geographic input points and projected stations

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named location in geographic coordinates (decimal degrees)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees, expected in [-180, 180]
    pub longitude: f64,
    /// Latitude in degrees, expected in [-90, 90]
    pub latitude: f64,
    /// Optional display name
    pub label: Option<String>,
}

impl GeoPoint {
    /// Create an unlabeled point
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            label: None,
        }
    }

    /// Attach a display name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether both coordinates are finite and inside the geographic ranges
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude.abs() <= 180.0
            && self.latitude.abs() <= 90.0
    }
}

/// A seed point that survived projection
///
/// Stations are stored in seed order, so the station at index `i` owns cell `i`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Index of the originating record in the caller's input slice
    pub source_index: usize,
    /// Original geographic location
    pub location: GeoPoint,
    /// Projected position in viewport coordinates
    pub position: DVec2,
}

impl Station {
    /// Tooltip text for this station
    ///
    /// Uses the point's label, falling back to `"<kind> at <lon>, <lat>"`.
    pub fn tooltip(&self, kind: &str) -> String {
        match self.location.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!(
                "{} at {}, {}",
                kind, self.location.longitude, self.location.latitude
            ),
        }
    }
}
