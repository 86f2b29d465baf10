// Shared fixtures for host-side tests.

#![allow(dead_code)]

use aim_core::{
    CameraRig, ControllerId, ControllerRegistry, Ray, TargetingConfig, TargetingController,
    Viewport,
};
use glam::{Vec2, Vec3};
use std::cell::Cell;
use std::rc::Rc;

pub const EPS: f32 = 1e-4;

/// Top-down camera: screen pixel (x, y) looks straight down onto world (x, _, y).
/// Records the last screen point a ray was requested for.
#[derive(Clone, Debug)]
pub struct TopDownCamera {
    pub height: f32,
    pub zoom: f32,
    pub viewport: Viewport,
    pub last_ray_screen: Rc<Cell<Option<Vec2>>>,
}

impl TopDownCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            height: 10.0,
            zoom: 5.0,
            viewport: Viewport::new(width, height),
            last_ray_screen: Rc::new(Cell::new(None)),
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }
}

impl CameraRig for TopDownCamera {
    fn screen_point_to_ray(&self, screen: Vec2) -> Option<Ray> {
        self.last_ray_screen.set(Some(screen));
        Some(Ray::new(
            Vec3::new(screen.x, self.height, screen.y),
            Vec3::NEG_Y,
        ))
    }

    fn world_to_screen_point(&self, world: Vec3) -> Option<Vec2> {
        Some(Vec2::new(world.x, world.z))
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

pub fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPS
}

pub fn controller_with(
    id: u32,
    config: TargetingConfig,
    camera: TopDownCamera,
    registry: &ControllerRegistry,
) -> TargetingController<TopDownCamera> {
    TargetingController::activate(ControllerId::new(id), config, camera, registry)
        .expect("activation")
}

pub fn controller(id: u32, registry: &ControllerRegistry) -> TargetingController<TopDownCamera> {
    controller_with(
        id,
        TargetingConfig::default(),
        TopDownCamera::new(800.0, 600.0),
        registry,
    )
}
