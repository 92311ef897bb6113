//! Font loading and text measurement.
//!
//! The HUD core never rasterizes glyphs; it only needs the metrics that feed
//! text-driven size constraints (line count, maximum glyph advance, line
//! height). Glyph rasterization belongs to the renderer collaborator.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, TextMetrics};
