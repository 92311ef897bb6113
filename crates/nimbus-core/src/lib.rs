//! Nimbus core crate.
//!
//! Platform-agnostic foundation shared by the HUD layer: coordinate and
//! color primitives, the input model (with a winit translator), frame
//! timing, logging bootstrap, and font metrics.

pub mod coords;
pub mod input;
pub mod logging;
pub mod paint;
pub mod text;
pub mod time;
