//! Camera abstraction consumed by the targeting controller.
//!
//! The controller only needs four things from a camera: build a ray through a
//! screen point, project a world point back to the screen, and read or write
//! the zoom parameter. [`CameraRig`] captures exactly that, so hosts can plug in
//! their own camera. [`Camera`] is a self-contained right-handed implementation
//! with orthographic or perspective projection.

use crate::constants::{CAMERA_ZFAR, CAMERA_ZNEAR};
use crate::geometry::{Ray, Viewport};
use glam::{Mat4, Vec2, Vec3, Vec4};

pub trait CameraRig {
    /// World-space ray through a screen position in pixels (origin top-left).
    fn screen_point_to_ray(&self, screen: Vec2) -> Option<Ray>;
    /// Screen position of a world point, `None` if it cannot be projected.
    fn world_to_screen_point(&self, world: Vec3) -> Option<Vec2>;
    fn zoom(&self) -> f32;
    fn set_zoom(&mut self, zoom: f32);
    fn viewport(&self) -> Viewport;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Orthographic,
    Perspective { fovy_radians: f32 },
}

/// Look-at camera. `ortho_size` is the vertical half-extent of the view volume
/// and is the value adjusted by zoom; it only shapes the image while the
/// projection is orthographic.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    pub ortho_size: f32,
    pub znear: f32,
    pub zfar: f32,
    viewport: Viewport,
}

impl Camera {
    pub fn orthographic(eye: Vec3, target: Vec3, ortho_size: f32, viewport: Viewport) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            projection: Projection::Orthographic,
            ortho_size,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
            viewport,
        }
    }

    pub fn perspective(eye: Vec3, target: Vec3, fovy_radians: f32, viewport: Viewport) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            projection: Projection::Perspective { fovy_radians },
            ortho_size: 5.0,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
            viewport,
        }
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = self.viewport.aspect();
        match self.projection {
            Projection::Orthographic => {
                let half_h = self.ortho_size;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.znear, self.zfar)
            }
            Projection::Perspective { fovy_radians } => {
                Mat4::perspective_rh(fovy_radians, aspect, self.znear, self.zfar)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        let extent = self.viewport.extent();
        Vec2::new(
            (2.0 * screen.x / extent.x) - 1.0,
            1.0 - (2.0 * screen.y / extent.y),
        )
    }
}

impl CameraRig for Camera {
    fn screen_point_to_ray(&self, screen: Vec2) -> Option<Ray> {
        let ndc = self.screen_to_ndc(screen);
        let inv = self.view_projection().inverse();
        if !inv.is_finite() {
            return None;
        }
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        let dir = (far - near).try_normalize()?;
        Some(Ray {
            origin: near,
            direction: dir,
        })
    }

    fn world_to_screen_point(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let extent = self.viewport.extent();
        let sx = (ndc.x + 1.0) * 0.5 * extent.x;
        let sy = (1.0 - ndc.y) * 0.5 * extent.y;
        let screen = Vec2::new(sx, sy);
        screen.is_finite().then_some(screen)
    }

    fn zoom(&self) -> f32 {
        self.ortho_size
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.ortho_size = zoom;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
