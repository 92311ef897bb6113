//! Event dispatch primitives.
//!
//! Mouse events originate on the picked node and bubble toward the root
//! until a handler consumes them; key events go only to the focused node.
//! Per-button gesture state (click vs long-press vs drag) is tracked by the
//! Hud in [`ButtonTracker`] slots; nodes only see the resulting transitions.

mod drag;
mod keyboard;
mod mouse;

pub use drag::{DragDrop, DragEvent};
pub use keyboard::{KeyInput, KeyListener, KeyRepeatConfig};
pub use mouse::{EventResult, MouseEvent, MouseEventKind, MouseListener, MouseState};

pub(crate) use mouse::ButtonTracker;
