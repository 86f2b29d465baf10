//! Runtime configuration for a targeting controller.

use crate::constants::{default_crosshair_vec3, ZOOM_MAX, ZOOM_MIN, ZOOM_SENSITIVITY};
use crate::error::ConfigError;
use crate::geometry::ReferencePlane;
use glam::Vec3;

/// Exclusive zoom bounds and the divisor applied to zoom trigger magnitudes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    pub sensitivity: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: ZOOM_MIN,
            max: ZOOM_MAX,
            sensitivity: ZOOM_SENSITIVITY,
        }
    }
}

impl ZoomLimits {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            ..Default::default()
        }
    }

    #[inline]
    pub fn admits(&self, zoom: f32) -> bool {
        zoom > self.min && zoom < self.max
    }

    /// Zoom after applying `magnitude`, or `None` if that leaves the bounds.
    pub fn step(&self, current: f32, magnitude: f32) -> Option<f32> {
        let candidate = current + magnitude / self.sensitivity;
        self.admits(candidate).then_some(candidate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(ConfigError::InvalidZoomBounds {
                min: self.min,
                max: self.max,
            });
        }
        if !self.sensitivity.is_finite() || self.sensitivity == 0.0 {
            return Err(ConfigError::InvalidZoomSensitivity(self.sensitivity));
        }
        Ok(())
    }
}

/// Settings fixed for the lifetime of one controller.
///
/// - `plane`: the only surface pointer rays are intersected with
/// - `maintain_cam`: integrate pointer deltas onto the crosshair's screen
///   projection instead of reading the absolute pointer position
/// - `zoom`: limits for the camera zoom parameter
/// - `initial_crosshair`: crosshair position until the first successful pick
/// - `claim_primary`: register as the registry's primary controller
#[derive(Clone, Debug, PartialEq)]
pub struct TargetingConfig {
    pub plane: ReferencePlane,
    pub maintain_cam: bool,
    pub zoom: ZoomLimits,
    pub initial_crosshair: Vec3,
    pub claim_primary: bool,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            plane: ReferencePlane::ground(),
            maintain_cam: false,
            zoom: ZoomLimits::default(),
            initial_crosshair: default_crosshair_vec3(),
            claim_primary: true,
        }
    }
}

impl TargetingConfig {
    pub fn with_plane(mut self, plane: ReferencePlane) -> Self {
        self.plane = plane;
        self
    }

    pub fn with_maintain_cam(mut self, maintain_cam: bool) -> Self {
        self.maintain_cam = maintain_cam;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomLimits) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_initial_crosshair(mut self, position: Vec3) -> Self {
        self.initial_crosshair = position;
        self
    }

    pub fn with_claim_primary(mut self, claim: bool) -> Self {
        self.claim_primary = claim;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zoom.validate()?;
        if !self.initial_crosshair.is_finite() {
            return Err(ConfigError::NonFiniteCrosshair);
        }
        Ok(())
    }

    pub fn mode_name(&self) -> &'static str {
        if self.maintain_cam {
            "delta"
        } else {
            "direct"
        }
    }
}
