//! Per-frame input-to-transform mapping

use serde::Serialize;
use tracing::trace;

use super::action::HandAction;
use super::rules::Gains;
use crate::config::ControlsConfig;
use crate::error::InputError;
use crate::input::{HandSample, InputLayout};
use crate::scene::Scene;
use crate::xr::{Handedness, InputSource};

/// One hand's contribution to a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppliedAction {
    pub sample: HandSample,
    pub action: HandAction,
    /// Whether the target model was present to receive the action
    pub reached_model: bool,
}

/// Maps hand samples onto indicator markers and the target model
#[derive(Debug, Clone)]
pub struct TransformMapper {
    gains: Gains,
}

impl TransformMapper {
    pub fn new(controls: &ControlsConfig) -> Self {
        Self {
            gains: Gains::from(controls),
        }
    }

    pub fn gains(&self) -> &Gains {
        &self.gains
    }

    pub fn set_gains(&mut self, controls: &ControlsConfig) {
        self.gains = Gains::from(controls);
    }

    /// Map every handed source for this frame
    ///
    /// Markers always follow the sticks. The model is only touched once it
    /// has loaded. The first unreadable gamepad aborts the rest of the frame;
    /// changes already made by earlier sources stay in place.
    pub fn map_frame(
        &self,
        sources: &[InputSource],
        layout: InputLayout,
        scene: &mut Scene,
    ) -> Result<Vec<AppliedAction>, InputError> {
        let mut applied = Vec::with_capacity(sources.len());

        for source in sources {
            if source.handedness == Handedness::None {
                continue;
            }

            let sample = HandSample::read(source, layout)?;
            if let Some(marker) = scene.marker_mut(sample.handedness) {
                marker.update(&sample);
            }

            let action = HandAction::from_sample(&sample);
            let reached_model = scene
                .model
                .with_model_mut(|model| action.apply(&mut model.transform, &self.gains))
                .is_some();

            trace!(
                "{} hand: dx={:.3} dy={:.3} pressed={} -> {:?}",
                sample.handedness,
                sample.delta_x,
                sample.delta_y,
                sample.button_pressed,
                action
            );

            applied.push(AppliedAction {
                sample,
                action,
                reached_model,
            });
        }

        Ok(applied)
    }
}
