//! Paint primitives shared with the renderer collaborator.

mod color;

pub use color::Color;
