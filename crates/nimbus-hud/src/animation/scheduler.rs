use crate::hud::HudActions;
use crate::tree::ComponentTree;

use super::{ScheduledAnimation, StepResult};

struct ActiveAnim {
    anim: Box<dyn ScheduledAnimation>,
    finished: bool,
}

/// Per-frame animation driver, owned by the Hud.
///
/// Newly started animations wait in `pending` until the next frame's merge,
/// so an animation started from inside a step (or an event callback) is
/// never stepped twice in its first frame, and removal never happens while
/// the active list is being iterated.
#[derive(Default)]
pub(crate) struct AnimationScheduler {
    active: Vec<ActiveAnim>,
    pending: Vec<Box<dyn ScheduledAnimation>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an animation; it becomes active on the next frame.
    pub fn start(&mut self, anim: Box<dyn ScheduledAnimation>) {
        self.pending.push(anim);
    }

    /// Anything still running or waiting to run?
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.active.is_empty() || !self.pending.is_empty()
    }

    /// One frame: drop finished, admit pending, step active.
    pub fn step_frame(&mut self, tree: &mut ComponentTree, actions: &mut HudActions) {
        self.active.retain(|a| !a.finished);
        for anim in self.pending.drain(..) {
            self.active.push(ActiveAnim { anim, finished: false });
        }
        for entry in &mut self.active {
            if entry.anim.make_step(tree, actions) == StepResult::Finished {
                entry.finished = true;
            }
        }
    }
}
