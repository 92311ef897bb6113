//! Nimbus HUD — retained overlay UI on top of `nimbus-core`.
//!
//! A tree of components positioned by per-axis constraints, hit-tested
//! through a GPU-stamped pick-id buffer, with bubbling mouse events,
//! focused key input, and frame-based property animations. The host loop
//! calls three entry points in order every frame:
//!
//! ```rust,ignore
//! use nimbus_hud::prelude::*;
//!
//! let mut hud = Hud::new(Viewport::new(1280.0, 720.0));
//! let button = hud.insert(
//!     Component::new()
//!         .with_position(PositionConstraint::center(0.0), PositionConstraint::mirror(0.05))
//!         .with_size(SizeConstraint::pixels(160.0), SizeConstraint::pixels(40.0))?
//!         .with_content(Content::Shape { color: Color::from_straight(0.2, 0.5, 1.0, 0.9) })
//!         .on_mouse(|event, actions| match event.kind {
//!             MouseEventKind::ClickReleased => {
//!                 actions.request_render();
//!                 EventResult::Consumed
//!             }
//!             _ => EventResult::Ignored,
//!         }),
//! );
//! hud.add_component(hud.root(), button)?;
//!
//! // In the frame callback:
//! hud.input(&input_state, &input_frame, &pick_buffer);
//! hud.update(frame_time.dt);
//! if hud.needs_next_rendering() {
//!     hud.render(&mut renderer);
//! }
//! ```
//!
//! Rendering is a seam: implement [`render::HudRenderer`] over your GPU
//! backend, or use [`pick::CpuPickBuffer`] headless (it is both a renderer
//! and a [`pick::PickSource`]).

pub mod animation;
pub mod constraint;
pub mod error;
pub mod event;
pub mod hud;
pub mod pick;
pub mod render;
pub mod tree;

pub use error::HudError;
pub use hud::{Hud, HudActions};

/// Everything needed to build and drive a HUD.
pub mod prelude {
    pub use crate::animation::{
        Animation, ColorProperty, CompositeAnimation, ScalarProperty, ScheduledAnimation,
        StepResult, VectorProperty,
    };
    pub use crate::constraint::{Axis, PositionConstraint, SizeConstraint};
    pub use crate::error::HudError;
    pub use crate::event::{
        DragDrop, DragEvent, EventResult, KeyInput, KeyListener, KeyRepeatConfig, MouseEvent,
        MouseEventKind,
    };
    pub use crate::hud::{Hud, HudActions};
    pub use crate::pick::{CpuPickBuffer, PickId, PickSource};
    pub use crate::render::{HudRenderer, NodeDraw};
    pub use crate::tree::{Component, ComponentTree, Content, NodeId};

    // Re-export the core primitives everyone needs.
    pub use nimbus_core::coords::{Rect, Vec2, Viewport};
    pub use nimbus_core::input::{InputFrame, InputState, Key, Modifiers, MouseButton};
    pub use nimbus_core::paint::Color;
    pub use nimbus_core::text::{FontSystem, TextMetrics};
}
