//! Grip squeeze reset

use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::scene::ModelSlot;
use crate::xr::Handedness;

/// What a squeeze-start event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    /// Only the right grip resets the model
    IgnoredHand,
    NotLoaded,
}

/// Restore the model's initial scale and position on a right grip squeeze
///
/// Rotation is left as is.
pub fn reset_on_squeeze(hand: Handedness, initial: &ModelConfig, slot: &ModelSlot) -> ResetOutcome {
    if hand != Handedness::Right {
        debug!("Ignoring squeeze from {} controller", hand);
        return ResetOutcome::IgnoredHand;
    }

    let reset = slot.with_model_mut(|model| {
        model.transform.scale = initial.scale;
        model.transform.position = initial.position;
    });

    match reset {
        Some(()) => {
            info!(
                "🔄 Model reset to position {:?}, scale {}",
                initial.position, initial.scale
            );
            ResetOutcome::Reset
        }
        None => {
            debug!("Squeeze before model loaded, nothing to reset");
            ResetOutcome::NotLoaded
        }
    }
}
