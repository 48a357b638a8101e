//! Per-hand input samples

use serde::Serialize;

use super::classify::InputLayout;
use crate::error::InputError;
use crate::xr::{Handedness, InputSource};

/// Snapshot of one hand's stick deflection and select button for a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandSample {
    pub handedness: Handedness,
    pub delta_x: f32,
    pub delta_y: f32,
    pub button_pressed: bool,
}

impl HandSample {
    pub fn new(handedness: Handedness, delta_x: f32, delta_y: f32, button_pressed: bool) -> Self {
        Self {
            handedness,
            delta_x,
            delta_y,
            button_pressed,
        }
    }

    /// Read the axis pair and button selected by `layout` from a source's gamepad
    pub fn read(source: &InputSource, layout: InputLayout) -> Result<Self, InputError> {
        let handedness = source.handedness;
        let gamepad = source
            .gamepad
            .as_ref()
            .ok_or(InputError::NoGamepad { handedness })?;

        let axis = |index: usize| {
            gamepad
                .axes
                .get(index)
                .copied()
                .ok_or(InputError::MissingAxis {
                    handedness,
                    index,
                    available: gamepad.axes.len(),
                })
        };

        let offset = layout.axis_offset();
        let delta_x = axis(offset)?;
        let delta_y = axis(offset + 1)?;

        let button_index = layout.button_index();
        let button_pressed = gamepad
            .buttons
            .get(button_index)
            .map(|button| button.pressed)
            .ok_or(InputError::MissingButton {
                handedness,
                index: button_index,
                available: gamepad.buttons.len(),
            })?;

        Ok(Self::new(handedness, delta_x, delta_y, button_pressed))
    }
}
