//! Per-hand action dispatch

use serde::Serialize;

use super::rules::{self, Gains};
use crate::input::HandSample;
use crate::scene::Transform;
use crate::xr::Handedness;

/// What one hand's sample does to the target this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum HandAction {
    /// Right hand, button held: change uniform scale
    Zoom { delta_y: f32 },
    /// Right hand, button released: yaw and roll in the local frame
    Rotate { delta_x: f32, delta_y: f32 },
    /// Left hand, button released: drag along the floor plane
    Translate { delta_x: f32, delta_y: f32 },
    /// Left hand with button held, or an unhanded source
    NoOp,
}

impl HandAction {
    pub fn from_sample(sample: &HandSample) -> Self {
        let HandSample {
            delta_x,
            delta_y,
            button_pressed,
            ..
        } = *sample;

        match (sample.handedness, button_pressed) {
            (Handedness::Right, true) => HandAction::Zoom { delta_y },
            (Handedness::Right, false) => HandAction::Rotate { delta_x, delta_y },
            // Reserved for a future left-hand gesture
            (Handedness::Left, true) => HandAction::NoOp,
            (Handedness::Left, false) => HandAction::Translate { delta_x, delta_y },
            (Handedness::None, _) => HandAction::NoOp,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, HandAction::NoOp)
    }

    /// Apply the action to `transform`
    pub fn apply(&self, transform: &mut Transform, gains: &Gains) {
        match *self {
            HandAction::Zoom { delta_y } => {
                transform.scale = rules::zoom_scale(transform.scale, delta_y, gains.zoom_step);
            }
            HandAction::Rotate { delta_x, delta_y } => {
                rules::rotate(transform, delta_x, delta_y, gains.rotate_step);
            }
            HandAction::Translate { delta_x, delta_y } => {
                rules::translate(transform, delta_x, delta_y, gains.translate_step);
            }
            HandAction::NoOp => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn sample(hand: Handedness, pressed: bool) -> HandSample {
        HandSample::new(hand, 0.5, -0.5, pressed)
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(
            HandAction::from_sample(&sample(Handedness::Right, true)),
            HandAction::Zoom { delta_y: -0.5 }
        );
        assert_eq!(
            HandAction::from_sample(&sample(Handedness::Right, false)),
            HandAction::Rotate {
                delta_x: 0.5,
                delta_y: -0.5
            }
        );
        assert_eq!(
            HandAction::from_sample(&sample(Handedness::Left, true)),
            HandAction::NoOp
        );
        assert_eq!(
            HandAction::from_sample(&sample(Handedness::Left, false)),
            HandAction::Translate {
                delta_x: 0.5,
                delta_y: -0.5
            }
        );
        assert!(HandAction::from_sample(&sample(Handedness::None, false)).is_noop());
    }

    #[test]
    fn test_apply_zoom() {
        let mut t = Transform::new(Vec3::ZERO, 2.0);
        HandAction::Zoom { delta_y: -1.0 }.apply(&mut t, &Gains::default());
        assert!((t.scale - 2.1).abs() < 1e-6);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_apply_translate() {
        let mut t = Transform::new(Vec3::new(0.0, 0.5, -1.0), 1.0);
        HandAction::Translate {
            delta_x: 1.0,
            delta_y: 1.0,
        }
        .apply(&mut t, &Gains::default());
        assert!(t.position.abs_diff_eq(Vec3::new(0.05, 0.5, -0.95), 1e-6));
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_noop_leaves_transform() {
        let mut t = Transform::new(Vec3::ONE, 1.5);
        let before = t;
        HandAction::NoOp.apply(&mut t, &Gains::default());
        assert_eq!(t, before);
    }
}
