//! XR platform input model
//!
//! Mirrors the shape of the device API the controller consumes: a list of
//! active input sources, each with a handedness, capability profiles, a
//! target ray mode and an optional gamepad. Field names serialize the way
//! the platform names them so diagnostic snapshots read like the device
//! reports.

pub mod script;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use script::{IdleSession, ScriptedSession};

/// Gamepad mapping string reported by devices using the standard XR layout
pub const XR_STANDARD_MAPPING: &str = "xr-standard";

/// Which hand an input source is held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    None,
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::None => write!(f, "none"),
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
        }
    }
}

/// How an input source points into the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TargetRayMode {
    Gaze,
    #[default]
    TrackedPointer,
    Screen,
    TransientPointer,
}

/// One gamepad button state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GamepadButton {
    pub pressed: bool,
    #[serde(default)]
    pub touched: bool,
    #[serde(default)]
    pub value: f32,
}

impl GamepadButton {
    pub fn pressed() -> Self {
        Self {
            pressed: true,
            touched: true,
            value: 1.0,
        }
    }

    pub fn released() -> Self {
        Self::default()
    }
}

/// Gamepad attached to an input source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Gamepad {
    #[serde(default)]
    pub axes: Vec<f32>,
    #[serde(default)]
    pub buttons: Vec<GamepadButton>,
    #[serde(default)]
    pub mapping: String,
}

impl Gamepad {
    /// Whether the device reports the standard XR gamepad layout
    pub fn is_xr_standard(&self) -> bool {
        self.mapping == XR_STANDARD_MAPPING
    }
}

/// An active XR input source (controller, hand, gaze)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InputSource {
    #[serde(default)]
    pub handedness: Handedness,
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub target_ray_mode: TargetRayMode,
    #[serde(default)]
    pub gamepad: Option<Gamepad>,
}

/// Platform side of an XR session, polled once per frame
///
/// Implementations are driven from the frame loop only, so they need no
/// interior locking.
pub trait XrPlatform {
    /// Advance the platform to the state of the next frame
    fn begin_frame(&mut self) {}

    /// Whether an immersive session is currently presenting
    fn is_presenting(&self) -> bool;

    /// Input sources active for the current frame
    fn input_sources(&self) -> &[InputSource];

    /// Drain grip squeeze-start events delivered since the last call
    fn take_squeeze_events(&mut self) -> Vec<Handedness>;

    /// Whether the platform has nothing more to deliver
    fn finished(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_serializes_with_platform_names() {
        let source = InputSource {
            handedness: Handedness::Right,
            profiles: vec!["generic-trigger-squeeze-thumbstick".to_string()],
            target_ray_mode: TargetRayMode::TrackedPointer,
            gamepad: Some(Gamepad {
                axes: vec![0.0, 0.0, 0.5, -0.25],
                buttons: vec![GamepadButton::pressed()],
                mapping: XR_STANDARD_MAPPING.to_string(),
            }),
        };

        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["handedness"], "right");
        assert_eq!(json["targetRayMode"], "tracked-pointer");
        assert_eq!(json["gamepad"]["mapping"], "xr-standard");
        assert_eq!(json["gamepad"]["buttons"][0]["pressed"], true);
    }

    #[test]
    fn test_input_source_defaults_from_sparse_yaml() {
        let source: InputSource = serde_yaml::from_str("handedness: left").unwrap();
        assert_eq!(source.handedness, Handedness::Left);
        assert!(source.profiles.is_empty());
        assert_eq!(source.target_ray_mode, TargetRayMode::TrackedPointer);
        assert!(source.gamepad.is_none());
    }

    #[test]
    fn test_xr_standard_detection() {
        let mut gamepad = Gamepad::default();
        assert!(!gamepad.is_xr_standard());
        gamepad.mapping = "xr-standard".to_string();
        assert!(gamepad.is_xr_standard());
    }
}
