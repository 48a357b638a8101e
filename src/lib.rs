//! XR Stick Control
//!
//! Maps VR controller joystick and trigger input to scale, rotate and
//! translate edits on a scene model, with two indicator markers mirroring
//! each hand's stick. The XR device API and the model loader sit behind
//! the [`xr::XrPlatform`] and [`scene::ModelLoader`] traits.

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod scene;
pub mod xr;

pub use app::{App, FrameReport};
pub use config::AppConfig;
