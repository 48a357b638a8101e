//! Transform rules driven by stick deflection
//!
//! Each rule is applied once per frame, so the per-frame step sizes are the
//! whole story: there is no time scaling.

use glam::Vec3;

use crate::config::ControlsConfig;
use crate::scene::Transform;

/// Per-frame step sizes at full stick deflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub zoom_step: f32,
    /// Radians
    pub rotate_step: f32,
    pub translate_step: f32,
}

impl Default for Gains {
    fn default() -> Self {
        Self::from(&ControlsConfig::default())
    }
}

impl From<&ControlsConfig> for Gains {
    fn from(config: &ControlsConfig) -> Self {
        Self {
            zoom_step: config.zoom_step,
            rotate_step: config.rotate_step_deg.to_radians(),
            translate_step: config.translate_step,
        }
    }
}

/// Next uniform scale for a zoom step
///
/// At or above unit scale the change is linear. Below it the step is taken
/// on the reciprocal, which keeps zooming out smooth as the scale shrinks
/// and keeps the result positive.
pub fn zoom_scale(scale: f32, delta_y: f32, step: f32) -> f32 {
    if scale >= 1.0 {
        scale - step * delta_y
    } else {
        1.0 / (1.0 / scale + step * delta_y)
    }
}

/// Rotate in the node's local frame: yaw by `delta_x`, then roll by `delta_y`
pub fn rotate(transform: &mut Transform, delta_x: f32, delta_y: f32, step: f32) {
    transform.rotate_local_y(step * delta_x);
    transform.rotate_local_z(step * delta_y);
}

/// Drag across the floor plane; stick Y moves along depth
pub fn translate(transform: &mut Transform, delta_x: f32, delta_y: f32, step: f32) {
    transform.position += Vec3::new(step * delta_x, 0.0, step * delta_y);
}
