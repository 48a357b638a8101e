//! Input-driven transform control
//!
//! Turns hand samples into [`HandAction`]s and applies them to the scene,
//! plus the grip-squeeze reset.

pub mod action;
pub mod mapper;
pub mod reset;
pub mod rules;

pub use action::HandAction;
pub use mapper::{AppliedAction, TransformMapper};
pub use reset::{reset_on_squeeze, ResetOutcome};
pub use rules::Gains;
