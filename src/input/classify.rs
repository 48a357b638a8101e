//! Input-source classification
//!
//! Decides, from the gamepad mapping and capability profile strings, whether
//! the controllers use the standard XR layout and which physical stick
//! layout (touchpad or thumbstick) their axes follow.

use serde::Serialize;

use crate::xr::InputSource;

/// Physical layout of the primary 2D input on a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputLayout {
    /// Axes 0/1, select button 2
    Touchpad,
    /// Axes 2/3, select button 3
    Thumbstick,
}

impl InputLayout {
    /// Index of the X axis; Y follows at `axis_offset() + 1`
    pub fn axis_offset(self) -> usize {
        match self {
            InputLayout::Touchpad => 0,
            InputLayout::Thumbstick => 2,
        }
    }

    /// Index of the button read as "pressed" for this layout
    pub fn button_index(self) -> usize {
        match self {
            InputLayout::Touchpad => 2,
            InputLayout::Thumbstick => 3,
        }
    }

    /// Scan profile strings for layout markers
    ///
    /// Each profile is checked for `touchpad` and then for `thumbstick`, and
    /// every hit overwrites the previous result. A later match therefore
    /// wins, and a single profile naming both resolves to `Thumbstick`.
    pub fn from_profiles<S: AsRef<str>>(profiles: &[S]) -> Option<Self> {
        let mut layout = None;
        for profile in profiles {
            let profile = profile.as_ref();
            if profile.contains("touchpad") {
                layout = Some(InputLayout::Touchpad);
            }
            if profile.contains("thumbstick") {
                layout = Some(InputLayout::Thumbstick);
            }
        }
        layout
    }
}

/// Result of a classification pass
///
/// Transform mapping only runs when [`InteractionMode::is_active`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InteractionMode {
    pub use_standard: bool,
    pub layout: Option<InputLayout>,
}

impl InteractionMode {
    pub fn is_active(&self) -> bool {
        self.use_standard && self.layout.is_some()
    }

    /// Active layout, if mapping is allowed
    pub fn active_layout(&self) -> Option<InputLayout> {
        if self.use_standard {
            self.layout
        } else {
            None
        }
    }

    /// Mode contributed by a single input source
    pub fn of_source(source: &InputSource) -> Self {
        Self {
            use_standard: source
                .gamepad
                .as_ref()
                .is_some_and(|gamepad| gamepad.is_xr_standard()),
            layout: InputLayout::from_profiles(&source.profiles),
        }
    }
}

/// Classify a list of input sources
///
/// Sources are visited in order and each one replaces the mode outright,
/// so the last source decides. An empty list yields the inactive mode.
pub fn classify(sources: &[InputSource]) -> InteractionMode {
    sources
        .iter()
        .map(InteractionMode::of_source)
        .last()
        .unwrap_or_default()
}
