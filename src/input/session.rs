//! Per-session classification state
//!
//! Holds the interaction mode and the slow classification timer. The frame
//! loop ticks the timer with each frame's `dt`; once the interval elapses
//! the next frame reclassifies instead of mapping.

use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::classify::{classify, InteractionMode};
use crate::xr::InputSource;

/// Diagnostic dump of the input sources seen on a classification frame
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    pub captured_at: DateTime<Local>,
    pub source_count: usize,
    pub mode: InteractionMode,
    /// JSON array of `{gamepad, handedness, profiles, targetRayMode}`
    pub json: String,
}

/// Classification state for one XR session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: InteractionMode,
    interval: f32,
    elapsed: f32,
    rescan_pending: bool,
    last_snapshot: Option<InputSnapshot>,
}

impl SessionState {
    pub fn new(interval: Duration) -> Self {
        Self {
            mode: InteractionMode::default(),
            interval: interval.as_secs_f32(),
            elapsed: 0.0,
            rescan_pending: true,
            last_snapshot: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.as_secs_f32();
    }

    /// Forget the current mode and classify on the next frame
    pub fn restart(&mut self) {
        self.mode = InteractionMode::default();
        self.elapsed = 0.0;
        self.rescan_pending = true;
    }

    /// Advance the classification timer by one frame
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed > self.interval {
            self.rescan_pending = true;
            self.elapsed = 0.0;
        }
    }

    pub fn rescan_pending(&self) -> bool {
        self.rescan_pending
    }

    pub fn last_snapshot(&self) -> Option<&InputSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Reclassify from the current input sources and record a snapshot
    ///
    /// Clears the pending flag, so the snapshot is emitted once per tick.
    pub fn classify(&mut self, sources: &[InputSource]) -> &InputSnapshot {
        let mode = classify(sources);
        if mode != self.mode {
            debug!("Interaction mode changed: {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.rescan_pending = false;

        let json = match serde_json::to_string(sources) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize input sources: {}", e);
                String::from("[]")
            }
        };
        info!(target: "xr_stick_control::input", "{}", json);

        self.last_snapshot.insert(InputSnapshot {
            captured_at: Local::now(),
            source_count: sources.len(),
            mode,
            json,
        })
    }
}
