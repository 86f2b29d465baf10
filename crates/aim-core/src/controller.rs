//! The targeting controller.
//!
//! Each tick the controller maps pointer input onto the reference plane to
//! move the crosshair, commits the crosshair as the target when select fires,
//! and steps the camera zoom within its limits, in that order.

use crate::camera::CameraRig;
use crate::config::TargetingConfig;
use crate::constants::CONTROLLER_PRIORITY;
use crate::error::ActivationError;
use crate::events::{SubscriptionId, TargetObservers, TargetSelected};
use crate::geometry::clamp_to_viewport;
use crate::input::InputSnapshot;
use crate::registry::{ControllerHandle, ControllerId, ControllerRegistry, Registration};
use crate::schedule::{Frame, Tick};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

/// Last committed target. `active` stays false until the first commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetState {
    pub position: Vec3,
    pub active: bool,
}

impl TargetState {
    pub fn inactive() -> Self {
        Self {
            position: Vec3::ZERO,
            active: false,
        }
    }
}

/// State shared with [`ControllerHandle`]s.
#[derive(Clone, Debug)]
pub(crate) struct ControllerState {
    pub(crate) crosshair: Vec3,
    pub(crate) target: TargetState,
    pub(crate) zoom: f32,
    pub(crate) commits: u64,
}

impl ControllerState {
    fn new(crosshair: Vec3, zoom: f32) -> Self {
        Self {
            crosshair,
            target: TargetState::inactive(),
            zoom,
            commits: 0,
        }
    }
}

/// What happened during one [`TargetingController::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdateReport {
    pub crosshair_moved: bool,
    pub selected: Option<TargetSelected>,
    pub zoom_changed: bool,
}

pub struct TargetingController<C: CameraRig> {
    id: ControllerId,
    config: TargetingConfig,
    camera: C,
    state: Rc<RefCell<ControllerState>>,
    observers: TargetObservers,
    registration: Option<Registration>,
    input_enabled: bool,
}

impl<C: CameraRig> TargetingController<C> {
    pub fn builder(id: ControllerId) -> ControllerBuilder<C> {
        ControllerBuilder::new(id)
    }

    /// Validate the setup, initialise crosshair and target, and register with
    /// `registry`.
    pub fn activate(
        id: ControllerId,
        config: TargetingConfig,
        camera: C,
        registry: &ControllerRegistry,
    ) -> Result<Self, ActivationError> {
        config.validate()?;
        let viewport = camera.viewport();
        if viewport.is_degenerate() {
            return Err(ActivationError::DegenerateViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let state = Rc::new(RefCell::new(ControllerState::new(
            config.initial_crosshair,
            camera.zoom(),
        )));
        let observers = TargetObservers::new();
        let handle = ControllerHandle::new(id, &state, observers.clone());
        let registration = registry.register(handle, config.claim_primary);

        log::info!(
            "[targeting] {} activated ({} mode, zoom {:.2})",
            id,
            config.mode_name(),
            camera.zoom()
        );

        Ok(Self {
            id,
            config,
            camera,
            state,
            observers,
            registration: Some(registration),
            input_enabled: true,
        })
    }

    /// Stop reading input, release the registry entry and discard crosshair
    /// and target state. Calling it again does nothing.
    pub fn deactivate(&mut self) {
        let Some(registration) = self.registration.take() else {
            return;
        };
        drop(registration);
        self.input_enabled = false;
        self.observers.clear();
        // Fresh state so outstanding handles stop observing this controller
        self.state = Rc::new(RefCell::new(ControllerState::new(
            self.config.initial_crosshair,
            self.camera.zoom(),
        )));
        log::info!("[targeting] {} deactivated", self.id);
    }

    pub fn is_active(&self) -> bool {
        self.registration.is_some()
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled && self.is_active();
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn crosshair_position(&self) -> Vec3 {
        self.state.borrow().crosshair
    }

    pub fn target(&self) -> TargetState {
        self.state.borrow().target
    }

    /// Read-only view of this controller. Taken after deactivation it reads
    /// absent, like every handle taken before.
    pub fn handle(&self) -> ControllerHandle {
        if self.is_active() {
            ControllerHandle::new(self.id, &self.state, self.observers.clone())
        } else {
            ControllerHandle::detached(self.id, self.observers.clone())
        }
    }

    pub fn observers(&self) -> &TargetObservers {
        &self.observers
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&TargetSelected) + 'static,
    {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Run one tick: crosshair, then selection, then zoom.
    pub fn update(&mut self, input: &InputSnapshot) -> UpdateReport {
        if !self.input_enabled {
            return UpdateReport::default();
        }
        let report = UpdateReport {
            crosshair_moved: self.move_crosshair(input),
            selected: self.select_target(input),
            zoom_changed: self.check_zoom(input),
        };
        // Camera may have been changed by the host since the last tick
        self.state.borrow_mut().zoom = self.camera.zoom();
        report
    }

    /// Move the crosshair to where the pointer meets the reference plane.
    /// Leaves it in place when there is no intersection.
    pub fn move_crosshair(&mut self, input: &InputSnapshot) -> bool {
        let Some(screen) = self.pointer_screen_position(input) else {
            log::trace!("[targeting] {} crosshair off screen; holding", self.id);
            return false;
        };
        let Some(ray) = self.camera.screen_point_to_ray(screen) else {
            return false;
        };
        match self.config.plane.intersect(&ray) {
            Some(hit) if hit.is_finite() => {
                self.state.borrow_mut().crosshair = hit;
                true
            }
            _ => {
                log::trace!("[targeting] {} pointer ray misses plane; holding", self.id);
                false
            }
        }
    }

    /// Screen point the pick ray goes through for this tick.
    fn pointer_screen_position(&self, input: &InputSnapshot) -> Option<Vec2> {
        if !self.config.maintain_cam {
            return Some(input.pointer_position);
        }
        let projected = self
            .camera
            .world_to_screen_point(self.crosshair_position())?;
        Some(clamp_to_viewport(
            projected + input.pointer_delta,
            self.camera.viewport(),
        ))
    }

    /// Commit the crosshair as the target and notify subscribers when select
    /// fired this tick.
    pub fn select_target(&mut self, input: &InputSnapshot) -> Option<TargetSelected> {
        if !input.select {
            return None;
        }
        let event = {
            let mut state = self.state.borrow_mut();
            state.target = TargetState {
                position: state.crosshair,
                active: true,
            };
            state.commits += 1;
            TargetSelected {
                controller: self.id,
                position: state.target.position,
                sequence: state.commits,
            }
        };
        let notified = self.observers.dispatch(&event);
        log::debug!(
            "[targeting] {} target #{} at ({:.2},{:.2},{:.2}) -> {} subscriber(s)",
            self.id,
            event.sequence,
            event.position.x,
            event.position.y,
            event.position.z,
            notified
        );
        Some(event)
    }

    /// Apply the zoom trigger if the result stays strictly inside the limits.
    pub fn check_zoom(&mut self, input: &InputSnapshot) -> bool {
        let Some(magnitude) = input.zoom else {
            return false;
        };
        let current = self.camera.zoom();
        match self.config.zoom.step(current, magnitude) {
            Some(zoom) => {
                self.camera.set_zoom(zoom);
                self.state.borrow_mut().zoom = zoom;
                true
            }
            None => {
                log::debug!(
                    "[targeting] {} zoom step {:+.3} from {:.3} rejected",
                    self.id,
                    magnitude / self.config.zoom.sensitivity,
                    current
                );
                false
            }
        }
    }
}

/// Handlers may hold handles back to this controller; clearing them on drop
/// breaks that cycle.
impl<C: CameraRig> Drop for TargetingController<C> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl<C: CameraRig> Tick for TargetingController<C> {
    fn priority(&self) -> i32 {
        CONTROLLER_PRIORITY
    }

    fn tick(&mut self, frame: &Frame) {
        self.update(frame.input_for(self.id));
    }
}

/// Assembles a controller; activation fails if no camera was given.
pub struct ControllerBuilder<C> {
    id: ControllerId,
    config: TargetingConfig,
    camera: Option<C>,
}

impl<C: CameraRig> ControllerBuilder<C> {
    pub fn new(id: ControllerId) -> Self {
        Self {
            id,
            config: TargetingConfig::default(),
            camera: None,
        }
    }

    pub fn config(mut self, config: TargetingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn camera(mut self, camera: C) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn activate(
        self,
        registry: &ControllerRegistry,
    ) -> Result<TargetingController<C>, ActivationError> {
        let camera = self.camera.ok_or(ActivationError::MissingCamera)?;
        TargetingController::activate(self.id, self.config, camera, registry)
    }
}
