//! Camera and per-frame scene state.

pub mod camera;
pub mod state;

pub use camera::{CursorCommand, CursorCommands, FlyCamera};
pub use state::{BOB_AMPLITUDE, FrameState, Selector, SessionState, Technique, UpdateOutcome};
