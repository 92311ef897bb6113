//! Frame-based property animations.
//!
//! An [`Animation`] tweens one node property from a start to an end value
//! over a fixed number of frames, with the per-step delta computed once up
//! front. The Hud schedules animations through a three-phase per-frame merge
//! (drop finished, admit newly started, step active) so starting or
//! finishing an animation from inside a step can never corrupt the list
//! being iterated.

mod scheduler;
mod tween;
mod value;

pub use tween::{
    Animation, ColorProperty, CompositeAnimation, Property, ScalarProperty, ScheduledAnimation,
    StepResult, VectorProperty,
};
pub use value::Animate;

pub(crate) use scheduler::AnimationScheduler;
