//! Point-and-click targeting for a 3D scene.
//!
//! A [`TargetingController`] turns pointer input into a crosshair position on
//! a reference plane, commits that position as a target on select and
//! publishes [`TargetSelected`] to its subscribers. A [`MidpointFollower`]
//! consumes two tracked positions. Everything here is single-threaded and
//! driven one tick at a time through a [`FrameSchedule`].

pub mod camera;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod events;
pub mod follower;
pub mod geometry;
pub mod input;
pub mod registry;
pub mod schedule;

pub use camera::*;
pub use config::*;
pub use constants::*;
pub use controller::{ControllerBuilder, TargetState, TargetingController, UpdateReport};
pub use error::*;
pub use events::*;
pub use follower::*;
pub use geometry::*;
pub use input::*;
pub use registry::*;
pub use schedule::*;
