//! Platform translators producing platform-agnostic [`crate::input::InputEvent`]s.

pub mod winit;
