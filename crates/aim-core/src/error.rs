//! Error types for configuration and controller activation.
//!
//! Per-frame operations never fail: a missed pick or a rejected zoom step is a
//! normal outcome, not an error. Only setting a controller up can go wrong.

use thiserror::Error;

/// Invalid values in a [`crate::TargetingConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("reference plane normal must be finite and non-zero")]
    InvalidPlaneNormal,
    #[error("zoom bounds must be finite with min < max (got min={min}, max={max})")]
    InvalidZoomBounds { min: f32, max: f32 },
    #[error("zoom sensitivity must be finite and non-zero (got {0})")]
    InvalidZoomSensitivity(f32),
    #[error("initial crosshair position must be finite")]
    NonFiniteCrosshair,
}

/// Reasons a controller refuses to activate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActivationError {
    #[error("targeting controller requires a camera")]
    MissingCamera,
    #[error("camera viewport is degenerate ({width}x{height})")]
    DegenerateViewport { width: f32, height: f32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
