//! Geographic to planar projection
//!
//! A [`Projection`] is a raw projection family (Mercator or plate carrée)
//! followed by a uniform scale, a vertical flip and a translation, the same
//! composition web map libraries use:
//!
//! ```text
//! x' = tx + k * (x(λ) - x(λc))
//! y' = ty - k * (y(φ) - y(φc))
//! ```
//!
//! with angles in radians, so `k` is in pixels per radian.

use std::f64::consts::FRAC_PI_4;

use geo::{Coord, MapCoords, MultiPolygon};
use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::boundary::Boundary;
use crate::config::{MapConfig, ProjectionFamily, ProjectionMode};
use crate::error::{CoverageError, Result};
use crate::point::GeoPoint;

impl ProjectionFamily {
    /// Raw forward projection of a lon/lat pair in degrees
    ///
    /// Returns `None` outside the family's domain.
    fn forward(self, longitude: f64, latitude: f64) -> Option<DVec2> {
        if !longitude.is_finite()
            || !latitude.is_finite()
            || longitude.abs() > 180.0
            || latitude.abs() > 90.0
        {
            return None;
        }

        let lambda = longitude.to_radians();
        let phi = latitude.to_radians();
        let raw = match self {
            ProjectionFamily::Mercator => {
                if latitude.abs() >= 90.0 {
                    return None;
                }
                DVec2::new(lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
            }
            ProjectionFamily::Equirectangular => DVec2::new(lambda, phi),
        };
        raw.is_finite().then_some(raw)
    }

    /// Raw inverse projection, returning (longitude, latitude) in degrees
    fn inverse(self, raw: DVec2) -> (f64, f64) {
        let phi = match self {
            ProjectionFamily::Mercator => 2.0 * raw.y.exp().atan() - 2.0 * FRAC_PI_4,
            ProjectionFamily::Equirectangular => raw.y,
        };
        (raw.x.to_degrees(), phi.to_degrees())
    }
}

/// An immutable geographic to viewport mapping
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    family: ProjectionFamily,
    /// Raw-projected center
    origin: DVec2,
    /// Pixels per radian
    scale: f64,
    /// Pixel position of the center
    translate: DVec2,
}

impl Projection {
    /// Build a projection with explicit framing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the center is outside the family's domain or
    /// the scale is not positive.
    pub fn fixed(
        family: ProjectionFamily,
        center: (f64, f64),
        scale: f64,
        translate: (f64, f64),
    ) -> Result<Self> {
        let origin = family.forward(center.0, center.1).ok_or_else(|| {
            CoverageError::InvalidConfig(format!(
                "projection center ({}, {}) is outside the projection domain",
                center.0, center.1
            ))
        })?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CoverageError::InvalidConfig(format!(
                "projection scale must be positive (got {})",
                scale
            )));
        }
        Ok(Self {
            family,
            origin,
            scale,
            translate: DVec2::new(translate.0, translate.1),
        })
    }

    /// Fit the projection so the boundary's projected extent is maximally
    /// inscribed in a `width` x `height` viewport inset by `padding`
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundary` if a boundary vertex is outside the domain or
    /// the boundary has no extent.
    pub fn fit(
        family: ProjectionFamily,
        width: f64,
        height: f64,
        padding: f64,
        boundary: &Boundary,
    ) -> Result<Self> {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for coord in boundary.geometry().0.iter().flat_map(|polygon| {
            polygon
                .exterior()
                .coords()
                .chain(polygon.interiors().iter().flat_map(|ring| ring.coords()))
        }) {
            let raw = family.forward(coord.x, coord.y).ok_or_else(|| {
                CoverageError::InvalidBoundary(format!(
                    "vertex ({}, {}) is outside the projection domain",
                    coord.x, coord.y
                ))
            })?;
            min = min.min(raw);
            max = max.max(raw);
        }

        let extent = max - min;
        let available = DVec2::new(width - 2.0 * padding, height - 2.0 * padding);
        let scale = match (extent.x > 0.0, extent.y > 0.0) {
            (true, true) => (available.x / extent.x).min(available.y / extent.y),
            (true, false) => available.x / extent.x,
            (false, true) => available.y / extent.y,
            (false, false) => {
                return Err(CoverageError::InvalidBoundary(
                    "boundary has no projected extent to fit".into(),
                ))
            }
        };

        Ok(Self {
            family,
            origin: (min + max) / 2.0,
            scale,
            translate: DVec2::new(width / 2.0, height / 2.0),
        })
    }

    /// Build the projection a config asks for
    pub fn from_config(config: &MapConfig, boundary: &Boundary) -> Result<Self> {
        match config.mode {
            ProjectionMode::Fixed { center, scale, .. } => {
                Self::fixed(config.family, center, scale, config.translate())
            }
            ProjectionMode::Fit { padding } => {
                Self::fit(config.family, config.width, config.height, padding, boundary)
            }
        }
    }

    /// Projection family
    pub fn family(&self) -> ProjectionFamily {
        self.family
    }

    /// Pixels per radian
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel position of the projection center
    pub fn translate(&self) -> DVec2 {
        self.translate
    }

    /// Geographic center as (longitude, latitude) in degrees
    pub fn center(&self) -> (f64, f64) {
        self.family.inverse(self.origin)
    }

    /// Project a geographic point into viewport coordinates
    ///
    /// # Errors
    ///
    /// Returns `ProjectionDomain` for non-finite or out-of-range coordinates,
    /// including |latitude| >= 90 under Mercator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use voronoi_coverage::*;
    ///
    /// let projection =
    ///     Projection::fixed(ProjectionFamily::Mercator, (-97.15, 49.85), 90_000.0, (514.0, 360.0))
    ///         .unwrap();
    ///
    /// let center = projection.project(&GeoPoint::new(-97.15, 49.85)).unwrap();
    /// assert!((center.x - 514.0).abs() < 1e-9 && (center.y - 360.0).abs() < 1e-9);
    ///
    /// assert!(projection.project(&GeoPoint::new(-97.15, 91.0)).is_err());
    /// ```
    pub fn project(&self, point: &GeoPoint) -> Result<DVec2> {
        self.project_lon_lat(point.longitude, point.latitude)
    }

    /// Project a raw (longitude, latitude) pair
    pub fn project_lon_lat(&self, longitude: f64, latitude: f64) -> Result<DVec2> {
        let raw = self
            .family
            .forward(longitude, latitude)
            .ok_or(CoverageError::ProjectionDomain { longitude, latitude })?;
        let offset = (raw - self.origin) * self.scale;
        let planar = DVec2::new(self.translate.x + offset.x, self.translate.y - offset.y);
        if planar.is_finite() {
            Ok(planar)
        } else {
            Err(CoverageError::ProjectionDomain { longitude, latitude })
        }
    }

    /// Map a viewport position back to geographic coordinates
    pub fn invert(&self, position: DVec2) -> GeoPoint {
        let raw = DVec2::new(
            self.origin.x + (position.x - self.translate.x) / self.scale,
            self.origin.y - (position.y - self.translate.y) / self.scale,
        );
        let (longitude, latitude) = self.family.inverse(raw);
        GeoPoint::new(longitude, latitude)
    }

    /// Project every ring of a boundary
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundary` if any vertex falls outside the domain, since
    /// a partially projected outline cannot be drawn or clipped against.
    pub fn project_boundary(&self, boundary: &Boundary) -> Result<MultiPolygon<f64>> {
        boundary.geometry().try_map_coords(|coord: Coord<f64>| {
            self.project_lon_lat(coord.x, coord.y)
                .map(|p| Coord { x: p.x, y: p.y })
                .map_err(|e| CoverageError::InvalidBoundary(e.to_string()))
        })
    }
}
