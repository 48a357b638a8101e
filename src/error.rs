//! Typed errors for input extraction, model loading and input scripts

use thiserror::Error;

use crate::xr::Handedness;

/// Errors raised while reading a hand sample from a gamepad
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    /// The input source exposes no gamepad object
    #[error("{handedness} input source has no gamepad")]
    NoGamepad { handedness: Handedness },

    /// The gamepad reports fewer axes than the layout needs
    #[error("{handedness} gamepad has no axis {index} (only {available} axes)")]
    MissingAxis {
        handedness: Handedness,
        index: usize,
        available: usize,
    },

    /// The gamepad reports fewer buttons than the layout needs
    #[error("{handedness} gamepad has no button {index} (only {available} buttons)")]
    MissingButton {
        handedness: Handedness,
        index: usize,
        available: usize,
    },
}

/// Errors raised while loading a model asset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glTF asset: {0}")]
    Gltf(#[from] gltf::Error),
}

/// Errors raised while loading a scripted input session
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input script: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("frame step {0} has repeat = 0")]
    ZeroRepeat(usize),
}
