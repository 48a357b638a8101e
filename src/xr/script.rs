//! Scripted XR sessions
//!
//! Replays a YAML timeline of input-source states so the controller can be
//! driven without a headset. A script is a list of frame steps; each step
//! holds for `repeat` frames and may fire grip squeeze-start events on its
//! first frame.
//!
//! ```yaml
//! frames:
//!   - repeat: 36
//!     sources:
//!       - handedness: right
//!         profiles: [oculus-touch-v3, generic-trigger-squeeze-thumbstick]
//!         gamepad:
//!           mapping: xr-standard
//!           axes: [0, 0, 0.5, 0]
//!           buttons: [{pressed: false}, {pressed: false}, {pressed: false}, {pressed: false}]
//!   - squeeze: [right]
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use super::{Handedness, InputSource, XrPlatform};
use crate::error::ScriptError;

fn default_true() -> bool {
    true
}

fn default_repeat() -> u32 {
    1
}

/// Parsed input script
#[derive(Debug, Clone, Deserialize)]
pub struct InputScript {
    #[serde(default = "default_true")]
    pub presenting: bool,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub frames: Vec<FrameStep>,
}

/// One step of an input script
#[derive(Debug, Clone, Deserialize)]
pub struct FrameStep {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Overrides the script-level presenting flag for this step
    #[serde(default)]
    pub presenting: Option<bool>,
    #[serde(default)]
    pub sources: Vec<InputSource>,
    #[serde(default)]
    pub squeeze: Vec<Handedness>,
}

impl InputScript {
    pub fn from_yaml(contents: &str) -> Result<Self, ScriptError> {
        let script: InputScript = serde_yaml::from_str(contents)?;
        if let Some(index) = script.frames.iter().position(|step| step.repeat == 0) {
            return Err(ScriptError::ZeroRepeat(index));
        }
        Ok(script)
    }

    /// Total number of frames the script covers in one pass
    pub fn frame_count(&self) -> u64 {
        self.frames.iter().map(|step| u64::from(step.repeat)).sum()
    }
}

/// Platform that replays an [`InputScript`] one frame at a time
#[derive(Debug)]
pub struct ScriptedSession {
    script: InputScript,
    step: usize,
    repeat: u32,
    started: bool,
    finished: bool,
    pending_squeeze: Vec<Handedness>,
}

impl ScriptedSession {
    pub fn new(script: InputScript) -> Self {
        let finished = script.frames.is_empty();
        Self {
            script,
            step: 0,
            repeat: 0,
            started: false,
            finished,
            pending_squeeze: Vec::new(),
        }
    }

    /// Load a script from a YAML file
    pub async fn load(path: &str) -> Result<Self, ScriptError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScriptError::Io {
                path: path.to_string(),
                source,
            })?;
        let script = InputScript::from_yaml(&contents)?;
        info!(
            "Loaded input script '{}' ({} steps, {} frames{})",
            path,
            script.frames.len(),
            script.frame_count(),
            if script.looping { ", looping" } else { "" }
        );
        Ok(Self::new(script))
    }

    fn current(&self) -> Option<&FrameStep> {
        if self.finished || !self.started {
            return None;
        }
        self.script.frames.get(self.step)
    }

    fn enter_step(&mut self) {
        if let Some(step) = self.script.frames.get(self.step) {
            self.pending_squeeze.extend(step.squeeze.iter().copied());
            debug!("Input script step {} ({} frames)", self.step, step.repeat);
        }
    }
}

impl XrPlatform for ScriptedSession {
    fn begin_frame(&mut self) {
        if self.finished {
            return;
        }

        if !self.started {
            self.started = true;
            self.enter_step();
            return;
        }

        self.repeat += 1;
        let step_len = self.script.frames[self.step].repeat;
        if self.repeat < step_len {
            return;
        }

        self.repeat = 0;
        self.step += 1;
        if self.step >= self.script.frames.len() {
            if self.script.looping {
                self.step = 0;
            } else {
                debug!("Input script finished");
                self.finished = true;
                return;
            }
        }
        self.enter_step();
    }

    fn is_presenting(&self) -> bool {
        self.current()
            .and_then(|step| step.presenting)
            .unwrap_or(self.script.presenting)
    }

    fn input_sources(&self) -> &[InputSource] {
        self.current().map(|step| step.sources.as_slice()).unwrap_or(&[])
    }

    fn take_squeeze_events(&mut self) -> Vec<Handedness> {
        std::mem::take(&mut self.pending_squeeze)
    }

    fn finished(&self) -> bool {
        self.finished
    }
}

/// Platform that presents with no input sources
#[derive(Debug, Default)]
pub struct IdleSession;

impl XrPlatform for IdleSession {
    fn is_presenting(&self) -> bool {
        true
    }

    fn input_sources(&self) -> &[InputSource] {
        &[]
    }

    fn take_squeeze_events(&mut self) -> Vec<Handedness> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
frames:
  - repeat: 2
    sources:
      - handedness: right
        profiles: [generic-trigger-squeeze-thumbstick]
  - squeeze: [right]
    presenting: false
"#;

    #[test]
    fn test_replays_steps_with_repeat_counts() {
        let script = InputScript::from_yaml(SCRIPT).unwrap();
        assert_eq!(script.frame_count(), 3);

        let mut session = ScriptedSession::new(script);
        assert!(session.input_sources().is_empty());

        session.begin_frame();
        assert_eq!(session.input_sources().len(), 1);
        assert!(session.is_presenting());
        assert!(session.take_squeeze_events().is_empty());

        session.begin_frame();
        assert_eq!(session.input_sources().len(), 1);

        session.begin_frame();
        assert!(session.input_sources().is_empty());
        assert!(!session.is_presenting());
        assert_eq!(session.take_squeeze_events(), vec![Handedness::Right]);
        // Drained
        assert!(session.take_squeeze_events().is_empty());
        assert!(!session.finished());

        session.begin_frame();
        assert!(session.finished());
        assert!(session.input_sources().is_empty());
    }

    #[test]
    fn test_looping_script_restarts() {
        let yaml = "loop: true\nframes:\n  - squeeze: [left]\n  - repeat: 1\n";
        let mut session = ScriptedSession::new(InputScript::from_yaml(yaml).unwrap());

        session.begin_frame();
        assert_eq!(session.take_squeeze_events(), vec![Handedness::Left]);
        session.begin_frame();
        assert!(session.take_squeeze_events().is_empty());
        session.begin_frame();
        assert_eq!(session.take_squeeze_events(), vec![Handedness::Left]);
        assert!(!session.finished());
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let yaml = "frames:\n  - repeat: 1\n  - repeat: 0\n";
        assert!(matches!(
            InputScript::from_yaml(yaml),
            Err(ScriptError::ZeroRepeat(1))
        ));
    }

    #[test]
    fn test_empty_script_is_finished() {
        let session = ScriptedSession::new(InputScript::from_yaml("frames: []").unwrap());
        assert!(session.finished());
    }

    #[test]
    fn test_bundled_demo_parses() {
        let script = InputScript::from_yaml(include_str!("../../demos/orbit-and-reset.yaml")).unwrap();
        assert_eq!(script.frames.len(), 3);
        assert_eq!(script.frame_count(), 72);
        assert_eq!(script.frames[2].squeeze, vec![Handedness::Right]);
        assert!(script.frames[1].sources[0].gamepad.as_ref().unwrap().buttons[3].pressed);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ScriptedSession::load("/nonexistent/script.yaml").await.unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }
}
