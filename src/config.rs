//! Coverage map configuration and builder
//!
//! Everything here is fixed at construction time. A [`MapConfig`] is validated
//! once by [`MapConfigBuilder::build`] and again when a map is computed, so a
//! hand-edited config fails before any geometry work starts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoverageError, Result};

/// Viewport used by the fixed Winnipeg framing
pub const FIXED_VIEWPORT: (f64, f64) = (1028.0, 720.0);

/// Viewport used when fitting the projection to the boundary
pub const FIT_VIEWPORT: (f64, f64) = (975.0, 610.0);

/// Default projection center (longitude, latitude) in degrees
pub const DEFAULT_CENTER: (f64, f64) = (-97.15, 49.85);

/// Default projection scale in pixels per radian
pub const DEFAULT_SCALE: f64 = 90_000.0;

/// Default margin added around the projected boundary extent
pub const DEFAULT_MARGIN: f64 = 1.0;

/// Default label used in tooltips of unnamed stations
pub const DEFAULT_STATION_KIND: &str = "Fire Station";

/// Map projection family
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionFamily {
    /// Spherical Mercator (conformal, undefined at the poles)
    #[default]
    Mercator,
    /// Plate carrée: longitude and latitude mapped linearly
    Equirectangular,
}

/// How the projection is framed in the viewport
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    /// Explicit framing
    Fixed {
        /// Geographic center (longitude, latitude) in degrees
        center: (f64, f64),
        /// Pixels per radian
        scale: f64,
        /// Pixel position of the center; `None` means the viewport center
        translate: Option<(f64, f64)>,
    },
    /// Derive center, scale and translate so the boundary fills the viewport
    Fit {
        /// Inset in pixels kept free on every side
        padding: f64,
    },
}

impl Default for ProjectionMode {
    fn default() -> Self {
        ProjectionMode::Fixed {
            center: DEFAULT_CENTER,
            scale: DEFAULT_SCALE,
            translate: None,
        }
    }
}

/// How the Voronoi bounding rectangle is sized
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsPolicy {
    /// The projected boundary's bounding box grown by `margin` on each side
    Padded {
        /// Margin in pixels
        margin: f64,
    },
    /// The full viewport `[0, 0, width, height]`
    Viewport,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        BoundsPolicy::Padded {
            margin: DEFAULT_MARGIN,
        }
    }
}

/// How strictly cells are clipped
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Only clip to the bounding rectangle
    Rectangle,
    /// Intersect each cell with the projected boundary outline
    #[default]
    Boundary,
}

/// Configuration for one coverage map render pass
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Projection family
    pub family: ProjectionFamily,
    /// Projection framing
    pub mode: ProjectionMode,
    /// Voronoi bounds sizing
    pub bounds_policy: BoundsPolicy,
    /// Cell clipping strictness
    pub clip_mode: ClipMode,
    /// Noun used in fallback tooltips, e.g. "Fire Station"
    pub station_kind: String,
}

impl MapConfig {
    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        check_positive("viewport width", self.width)?;
        check_positive("viewport height", self.height)?;

        match self.mode {
            ProjectionMode::Fixed { center, scale, translate } => {
                let (lon, lat) = center;
                if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
                    return Err(CoverageError::InvalidConfig(format!(
                        "projection center ({}, {}) is not a valid coordinate",
                        lon, lat
                    )));
                }
                if self.family == ProjectionFamily::Mercator && lat.abs() >= 90.0 {
                    return Err(CoverageError::InvalidConfig(format!(
                        "Mercator center latitude must be inside (-90, 90) (got {})",
                        lat
                    )));
                }
                check_positive("projection scale", scale)?;
                if let Some((x, y)) = translate {
                    if !x.is_finite() || !y.is_finite() {
                        return Err(CoverageError::InvalidConfig(format!(
                            "translate must be finite (got {}, {})",
                            x, y
                        )));
                    }
                }
            }
            ProjectionMode::Fit { padding } => {
                check_non_negative("fit padding", padding)?;
                if 2.0 * padding >= self.width || 2.0 * padding >= self.height {
                    return Err(CoverageError::InvalidConfig(format!(
                        "fit padding {} leaves no room in a {}x{} viewport",
                        padding, self.width, self.height
                    )));
                }
            }
        }

        if let BoundsPolicy::Padded { margin } = self.bounds_policy {
            check_non_negative("bounds margin", margin)?;
        }

        Ok(())
    }

    /// Pixel position the projection center maps to
    pub fn translate(&self) -> (f64, f64) {
        match self.mode {
            ProjectionMode::Fixed { translate: Some(t), .. } => t,
            _ => (self.width / 2.0, self.height / 2.0),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        let (width, height) = FIXED_VIEWPORT;
        Self {
            width,
            height,
            family: ProjectionFamily::default(),
            mode: ProjectionMode::default(),
            bounds_policy: BoundsPolicy::default(),
            clip_mode: ClipMode::default(),
            station_kind: DEFAULT_STATION_KIND.to_string(),
        }
    }
}

fn check_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoverageError::InvalidConfig(format!(
            "{} must be positive (got {})",
            what, value
        )))
    }
}

fn check_non_negative(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoverageError::InvalidConfig(format!(
            "{} must be >= 0 (got {})",
            what, value
        )))
    }
}

/// Builder for creating MapConfig with validation
///
/// When no viewport is given the default depends on the projection mode:
/// 1028x720 for fixed framing, 975x610 for fit-to-boundary.
///
/// # Example
///
/// ```rust
/// use voronoi_coverage::*;
///
/// let config = MapConfigBuilder::new()
///     .fit_to_boundary(10.0)
///     .unwrap()
///     .bounds_policy(BoundsPolicy::Viewport)
///     .build()
///     .unwrap();
///
/// assert_eq!((config.width, config.height), (975.0, 610.0));
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    viewport: Option<(f64, f64)>,
    family: ProjectionFamily,
    mode: ProjectionMode,
    bounds_policy: BoundsPolicy,
    clip_mode: ClipMode,
    station_kind: String,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - projection: Mercator, fixed on (-97.15, 49.85) at scale 90000
    /// - bounds: boundary extent padded by 1 pixel
    /// - clipping: against the boundary outline
    /// - station kind: "Fire Station"
    pub fn new() -> Self {
        Self {
            viewport: None,
            family: ProjectionFamily::default(),
            mode: ProjectionMode::default(),
            bounds_policy: BoundsPolicy::default(),
            clip_mode: ClipMode::default(),
            station_kind: DEFAULT_STATION_KIND.to_string(),
        }
    }

    /// Set the viewport size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not a positive number
    pub fn viewport(mut self, width: f64, height: f64) -> Result<Self> {
        check_positive("viewport width", width)?;
        check_positive("viewport height", height)?;
        self.viewport = Some((width, height));
        Ok(self)
    }

    /// Set the projection family
    pub fn projection_family(mut self, family: ProjectionFamily) -> Self {
        self.family = family;
        self
    }

    /// Use an explicit center and scale
    ///
    /// The center is placed at the viewport center unless [`translate`](Self::translate)
    /// is called afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the scale is not positive
    pub fn fixed_projection(mut self, longitude: f64, latitude: f64, scale: f64) -> Result<Self> {
        check_positive("projection scale", scale)?;
        self.mode = ProjectionMode::Fixed {
            center: (longitude, latitude),
            scale,
            translate: None,
        };
        Ok(self)
    }

    /// Place the projection center at a pixel position
    ///
    /// Only meaningful in fixed mode; switches to fixed mode with the default
    /// center and scale if fit mode was selected.
    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.mode = match self.mode {
            ProjectionMode::Fixed { center, scale, .. } => ProjectionMode::Fixed {
                center,
                scale,
                translate: Some((x, y)),
            },
            ProjectionMode::Fit { .. } => ProjectionMode::Fixed {
                center: DEFAULT_CENTER,
                scale: DEFAULT_SCALE,
                translate: Some((x, y)),
            },
        };
        self
    }

    /// Fit the projection to the boundary, keeping `padding` pixels free
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if padding is negative
    pub fn fit_to_boundary(mut self, padding: f64) -> Result<Self> {
        check_non_negative("fit padding", padding)?;
        self.mode = ProjectionMode::Fit { padding };
        Ok(self)
    }

    /// Choose how the Voronoi bounds are sized
    pub fn bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        self.bounds_policy = policy;
        self
    }

    /// Use the padded-boundary policy with a custom margin
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if margin is negative
    pub fn padded_bounds(mut self, margin: f64) -> Result<Self> {
        check_non_negative("bounds margin", margin)?;
        self.bounds_policy = BoundsPolicy::Padded { margin };
        Ok(self)
    }

    /// Choose the clipping strictness
    pub fn clip_mode(mut self, mode: ClipMode) -> Self {
        self.clip_mode = mode;
        self
    }

    /// Set the noun used in fallback tooltips
    pub fn station_kind(mut self, kind: impl Into<String>) -> Self {
        self.station_kind = kind.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<MapConfig> {
        let (width, height) = self.viewport.unwrap_or(match self.mode {
            ProjectionMode::Fixed { .. } => FIXED_VIEWPORT,
            ProjectionMode::Fit { .. } => FIT_VIEWPORT,
        });

        let config = MapConfig {
            width,
            height,
            family: self.family,
            mode: self.mode,
            bounds_policy: self.bounds_policy,
            clip_mode: self.clip_mode,
            station_kind: self.station_kind,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
