//! Coordinate primitives.
//!
//! The HUD layer works in *normalized window units*: `x`/`y`/`w`/`h` in
//! `[0, 1]` relative to the window, with pixel offsets applied after layout.
//! `Vec2`/`Rect` are unit-agnostic; which space a value lives in is a
//! property of the API that hands it out.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
