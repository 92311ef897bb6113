//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Host code translates platform events into `InputEvent`s (see
//! [`platform::winit`]) and drains per-frame deltas out of [`InputFrame`]
//! after each HUD frame.

mod frame;
mod state;
mod types;

pub mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
};
