//! Axis-aligned clipping rectangle

use geo::{coord, BoundingRect, MultiPolygon, Rect};
use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{BoundsPolicy, MapConfig};
use crate::error::{CoverageError, Result};

/// Rectangle every Voronoi cell is restricted to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from corner coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a coordinate is not finite or the rectangle
    /// has no area.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x >= max_x || min_y >= max_y {
            return Err(CoverageError::InvalidConfig(format!(
                "bounds [{}, {}, {}, {}] do not form a rectangle",
                min_x, min_y, max_x, max_y
            )));
        }
        Ok(Self { min_x, min_y, max_x, max_y })
    }

    /// The full viewport `[0, 0, width, height]`
    pub fn viewport(width: f64, height: f64) -> Result<Self> {
        Self::new(0.0, 0.0, width, height)
    }

    /// Bounding box of a planar boundary, grown by `margin` on every side
    pub fn around(boundary: &MultiPolygon<f64>, margin: f64) -> Result<Self> {
        let rect = boundary.bounding_rect().ok_or_else(|| {
            CoverageError::InvalidBoundary("projected boundary is empty".into())
        })?;
        Self::new(
            rect.min().x - margin,
            rect.min().y - margin,
            rect.max().x + margin,
            rect.max().y + margin,
        )
    }

    /// Bounds chosen by the config's sizing policy
    pub fn for_policy(config: &MapConfig, planar_boundary: &MultiPolygon<f64>) -> Result<Self> {
        match config.bounds_policy {
            BoundsPolicy::Padded { margin } => Self::around(planar_boundary, margin),
            BoundsPolicy::Viewport => Self::viewport(config.width, config.height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn min(&self) -> DVec2 {
        DVec2::new(self.min_x, self.min_y)
    }

    pub fn max(&self) -> DVec2 {
        DVec2::new(self.max_x, self.max_y)
    }

    /// Whether a point lies inside or on the rectangle, with tolerance
    pub fn contains(&self, point: DVec2, tolerance: f64) -> bool {
        point.x >= self.min_x - tolerance
            && point.x <= self.max_x + tolerance
            && point.y >= self.min_y - tolerance
            && point.y <= self.max_y + tolerance
    }

    /// Corners in counter-clockwise order (y up)
    pub fn corners(&self) -> Vec<DVec2> {
        vec![
            DVec2::new(self.min_x, self.min_y),
            DVec2::new(self.max_x, self.min_y),
            DVec2::new(self.max_x, self.max_y),
            DVec2::new(self.min_x, self.max_y),
        ]
    }

    /// As a `geo` rectangle
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
    }
}
