//! Midpoint follower: sits halfway between two tracked positions.

use crate::registry::ControllerHandle;
use crate::schedule::{Frame, Tick};
use glam::Vec3;
use std::cell::Cell;
use std::rc::Rc;

/// Something with a world position that may be absent.
pub trait PositionSource {
    fn world_position(&self) -> Option<Vec3>;
}

impl PositionSource for Vec3 {
    fn world_position(&self) -> Option<Vec3> {
        Some(*self)
    }
}

impl<S: PositionSource> PositionSource for Option<S> {
    fn world_position(&self) -> Option<Vec3> {
        self.as_ref().and_then(PositionSource::world_position)
    }
}

impl PositionSource for Rc<Cell<Vec3>> {
    fn world_position(&self) -> Option<Vec3> {
        Some(self.get())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackedPoint {
    /// Last committed target; absent until the first selection.
    Target,
    Crosshair,
}

/// A point of a targeting controller, read through its handle.
#[derive(Clone, Debug)]
pub struct Tracked {
    handle: ControllerHandle,
    point: TrackedPoint,
}

impl Tracked {
    pub fn new(handle: ControllerHandle, point: TrackedPoint) -> Self {
        Self { handle, point }
    }
}

impl PositionSource for Tracked {
    fn world_position(&self) -> Option<Vec3> {
        match self.point {
            TrackedPoint::Crosshair => self.handle.crosshair_position(),
            TrackedPoint::Target => self
                .handle
                .target()
                .and_then(|t| t.active.then_some(t.position)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MidpointFollower<A, B> {
    a: A,
    b: B,
    position: Vec3,
}

impl<A: PositionSource, B: PositionSource> MidpointFollower<A, B> {
    pub fn new(a: A, b: B, initial: Vec3) -> Self {
        Self {
            a,
            b,
            position: initial,
        }
    }

    /// Move to the mean of both sources; hold position if either is absent.
    pub fn update(&mut self) -> bool {
        match (self.a.world_position(), self.b.world_position()) {
            (Some(a), Some(b)) => {
                self.position = (a + b) / 2.0;
                true
            }
            _ => false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl<A: PositionSource, B: PositionSource> Tick for MidpointFollower<A, B> {
    fn tick(&mut self, _frame: &Frame) {
        self.update();
    }
}
