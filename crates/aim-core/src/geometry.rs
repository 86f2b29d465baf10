//! Rays, the reference plane and screen-space clamping.

use crate::constants::PARALLEL_EPSILON;
use crate::error::ConfigError;
use glam::{Vec2, Vec3};

/// World-space ray with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; `direction` is normalized, so it must be non-zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Viewport size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is non-positive or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        let extent = self.extent();
        extent.x / extent.y
    }

    /// Size used for screen/NDC conversion: each side at least one pixel.
    pub fn extent(&self) -> Vec2 {
        self.size().max(Vec2::ONE)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Infinite plane `n·p = d` with a unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferencePlane {
    normal: Vec3,
    offset: f32,
}

impl ReferencePlane {
    /// Plane with the given normal at signed distance `offset` from the origin
    /// along that normal.
    pub fn new(normal: Vec3, offset: f32) -> Result<Self, ConfigError> {
        if !normal.is_finite() || !offset.is_finite() {
            return Err(ConfigError::InvalidPlaneNormal);
        }
        let normal = normal.try_normalize().ok_or(ConfigError::InvalidPlaneNormal)?;
        Ok(Self { normal, offset })
    }

    pub fn through_point(normal: Vec3, point: Vec3) -> Result<Self, ConfigError> {
        let unit = normal.try_normalize().ok_or(ConfigError::InvalidPlaneNormal)?;
        Self::new(unit, unit.dot(point))
    }

    /// Horizontal ground plane through the origin.
    pub fn ground() -> Self {
        Self {
            normal: Vec3::Y,
            offset: 0.0,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Signed distance from `point` to the plane (positive on the normal side).
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }

    /// Where `ray` meets the plane, or `None` if it runs parallel to it or the
    /// plane lies behind the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.offset - self.normal.dot(ray.origin)) / denom;
        (t >= 0.0).then(|| ray.at(t))
    }
}

impl Default for ReferencePlane {
    fn default() -> Self {
        Self::ground()
    }
}

#[inline]
pub fn clamp_to_viewport(point: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        point.x.clamp(0.0, viewport.width.max(0.0)),
        point.y.clamp(0.0, viewport.height.max(0.0)),
    )
}
