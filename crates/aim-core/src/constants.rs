use glam::Vec3;

// Shared tuning constants for the targeting controller and its consumers.

// Zoom (orthographic half-height) limits, both exclusive
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 100.0;
pub const ZOOM_SENSITIVITY: f32 = 100.0; // trigger magnitude is divided by this

// Picking
pub const PARALLEL_EPSILON: f32 = 1e-6; // |n·dir| below this counts as parallel to the plane

// Default clip planes for the built-in camera
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Scheduling: lower runs earlier within a tick
pub const CONTROLLER_PRIORITY: i32 = -100;
pub const DEFAULT_PRIORITY: i32 = 0;

// Crosshair position before the first successful pick
pub const DEFAULT_CROSSHAIR: [f32; 3] = [0.0, 0.0, 0.0];

#[inline]
pub fn default_crosshair_vec3() -> Vec3 {
    Vec3::from(DEFAULT_CROSSHAIR)
}
