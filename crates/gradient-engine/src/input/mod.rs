//! Keyboard and focus input.
//!
//! The public types do not expose winit; `platform` translates window events.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
