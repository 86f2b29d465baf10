//! Per-tick input: the snapshot a controller consumes and the sampler that
//! builds it from raw device events.

use glam::Vec2;

/// Everything a controller reads from input for one tick.
///
/// `select` is already edge-detected: it is true only on the tick the select
/// action went from released to pressed. `zoom` is `Some(magnitude)` on ticks
/// where the zoom action fired.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub pointer_position: Vec2,
    pub pointer_delta: Vec2,
    pub select: bool,
    pub zoom: Option<f32>,
}

impl InputSnapshot {
    pub fn at(pointer_position: Vec2) -> Self {
        Self {
            pointer_position,
            ..Default::default()
        }
    }

    pub fn with_delta(mut self, delta: Vec2) -> Self {
        self.pointer_delta = delta;
        self
    }

    pub fn with_select(mut self, select: bool) -> Self {
        self.select = select;
        self
    }

    pub fn with_zoom(mut self, magnitude: f32) -> Self {
        self.zoom = Some(magnitude);
        self
    }
}

/// Collects raw device events between ticks and turns them into snapshots.
///
/// Held state for the select button lives here so the controller stays a pure
/// function of its snapshot.
#[derive(Clone, Debug, Default)]
pub struct InputSampler {
    pointer_position: Vec2,
    pointer_delta: Vec2,
    zoom_accum: f32,
    zoom_fired: bool,
    select_held: bool,
    select_pressed_since_tick: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer_position = position;
    }

    pub fn pointer_motion(&mut self, delta: Vec2) {
        self.pointer_delta += delta;
    }

    pub fn select_pressed(&mut self) {
        if !self.select_held {
            self.select_pressed_since_tick = true;
        }
        self.select_held = true;
    }

    pub fn select_released(&mut self) {
        self.select_held = false;
    }

    pub fn zoom(&mut self, magnitude: f32) {
        self.zoom_accum += magnitude;
        self.zoom_fired = true;
    }

    pub fn pointer_position(&self) -> Vec2 {
        self.pointer_position
    }

    pub fn is_select_held(&self) -> bool {
        self.select_held
    }

    /// Produce this tick's snapshot and reset per-tick accumulators.
    pub fn snapshot(&mut self) -> InputSnapshot {
        // A press and release inside one tick still counts as one rising edge
        let snap = InputSnapshot {
            pointer_position: self.pointer_position,
            pointer_delta: self.pointer_delta,
            select: self.select_pressed_since_tick,
            zoom: self.zoom_fired.then_some(self.zoom_accum),
        };
        self.select_pressed_since_tick = false;
        self.pointer_delta = Vec2::ZERO;
        self.zoom_accum = 0.0;
        self.zoom_fired = false;
        snap
    }
}
