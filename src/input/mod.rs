//! Controller input: classification, session state and per-hand samples

pub mod classify;
pub mod sample;
pub mod session;

pub use classify::{classify, InputLayout, InteractionMode};
pub use sample::HandSample;
pub use session::{InputSnapshot, SessionState};
