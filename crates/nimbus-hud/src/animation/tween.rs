use std::rc::Rc;

use nimbus_core::coords::Vec2;
use nimbus_core::paint::Color;

use crate::constraint::Axis;
use crate::hud::HudActions;
use crate::tree::{ComponentTree, NodeId};

use super::Animate;

/// Outcome of one animation step.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepResult {
    Running,
    /// The end value was written; the scheduler drops the animation at the
    /// start of the next frame.
    Finished,
}

/// A node property an animation of value type `T` can write.
pub trait Property<T: Animate>: Copy + 'static {
    fn write(self, tree: &mut ComponentTree, node: NodeId, value: T);
}

/// Scalar targets: constraint values and the pixel-offset components.
///
/// Constraint writes relayout the node's subtree immediately so the new
/// value is visible the same frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScalarProperty {
    PositionValue(Axis),
    SizeValue(Axis),
    OffsetX,
    OffsetY,
}

impl Property<f32> for ScalarProperty {
    fn write(self, tree: &mut ComponentTree, node: NodeId, value: f32) {
        match self {
            ScalarProperty::PositionValue(axis) => {
                if let Some(n) = tree.node_mut(node) {
                    n.set_position_value(axis, value);
                    tree.update_bounds_from(node);
                }
            }
            ScalarProperty::SizeValue(axis) => {
                if let Some(n) = tree.node_mut(node) {
                    n.set_size_value(axis, value);
                    tree.update_bounds_from(node);
                }
            }
            ScalarProperty::OffsetX => {
                if let Some(n) = tree.node_mut(node) {
                    let mut offset = n.offset_px();
                    offset.x = value;
                    n.set_offset_px(offset);
                }
            }
            ScalarProperty::OffsetY => {
                if let Some(n) = tree.node_mut(node) {
                    let mut offset = n.offset_px();
                    offset.y = value;
                    n.set_offset_px(offset);
                }
            }
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VectorProperty {
    /// The node's pixel offset as one value.
    Offset,
}

impl Property<Vec2> for VectorProperty {
    fn write(self, tree: &mut ComponentTree, node: NodeId, value: Vec2) {
        if let Some(n) = tree.node_mut(node) {
            match self {
                VectorProperty::Offset => n.set_offset_px(value),
            }
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorProperty {
    /// The content's fill/text color.
    Content,
}

impl Property<Color> for ColorProperty {
    fn write(self, tree: &mut ComponentTree, node: NodeId, value: Color) {
        if let Some(n) = tree.node_mut(node) {
            match self {
                ColorProperty::Content => n.set_content_color(value),
            }
        }
    }
}

type CompletionHandler = Rc<dyn Fn(&mut HudActions)>;

/// Object-safe surface the scheduler drives.
///
/// `boxed_clone` and `inverted` exist so composites stay one logical unit:
/// copying or reversing a composite copies/reverses every constituent.
pub trait ScheduledAnimation {
    fn make_step(&mut self, tree: &mut ComponentTree, actions: &mut HudActions) -> StepResult;
    fn boxed_clone(&self) -> Box<dyn ScheduledAnimation>;
    /// A fresh animation travelling the opposite way (start and end swapped,
    /// progress rewound).
    fn inverted(&self) -> Box<dyn ScheduledAnimation>;
}

/// Tweens one property of one node over `duration` frames.
///
/// The per-step delta `(end - start) / duration` is fixed at construction
/// (and on [`set_duration`](Self::set_duration)); stepping either advances
/// by one delta or, on the final frame or early arrival, snaps exactly to
/// the end value. A zero duration snaps on the first step.
///
/// Detached from the Hud this is a plain value: copy it, invert it, or
/// discard it freely. Ownership transfers to the Hud only for the frames it
/// is scheduled, via [`HudActions::start_animation`].
#[derive(Clone)]
pub struct Animation<T: Animate, P: Property<T>> {
    node: NodeId,
    property: P,
    start: T,
    end: T,
    duration: u32,
    delta: T,
    progress: T,
    remaining: u32,
    on_complete: Option<CompletionHandler>,
}

impl<T: Animate, P: Property<T>> Animation<T, P> {
    pub fn new(node: NodeId, property: P, start: T, end: T, duration: u32) -> Self {
        Self {
            node,
            property,
            start,
            end,
            duration,
            delta: T::step_delta(start, end, duration.max(1)),
            progress: start,
            remaining: duration,
            on_complete: None,
        }
    }

    /// Fired exactly once, on the step that writes the end value.
    pub fn with_completion<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut HudActions) + 'static,
    {
        self.on_complete = Some(Rc::new(handler));
        self
    }

    /// Rescales the tween to a new frame count, keeping current progress.
    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = duration;
        self.delta = T::step_delta(self.progress, self.end, duration.max(1));
    }

    /// The same tween running backwards, rewound to its (new) start.
    pub fn get_inverted(&self) -> Self {
        let mut inv = self.clone();
        inv.start = self.end;
        inv.end = self.start;
        inv.progress = inv.start;
        inv.remaining = inv.duration;
        inv.delta = T::step_delta(inv.start, inv.end, inv.duration.max(1));
        inv
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    pub fn value(&self) -> T {
        self.progress
    }

    fn finish(&mut self, tree: &mut ComponentTree, actions: &mut HudActions) -> StepResult {
        self.progress = self.end;
        self.remaining = 0;
        self.property.write(tree, self.node, self.end);
        if let Some(handler) = &self.on_complete {
            handler(actions);
        }
        StepResult::Finished
    }
}

impl<T: Animate + 'static, P: Property<T>> ScheduledAnimation for Animation<T, P> {
    fn make_step(&mut self, tree: &mut ComponentTree, actions: &mut HudActions) -> StepResult {
        if self.remaining == 0 {
            // Zero-duration tween (or a stray extra step): snap, never divide.
            return self.finish(tree, actions);
        }
        self.remaining -= 1;
        if self.remaining == 0 || self.progress.arrives(self.delta, self.end) {
            return self.finish(tree, actions);
        }
        self.progress = self.progress.advanced(self.delta);
        self.property.write(tree, self.node, self.progress);
        StepResult::Running
    }

    fn boxed_clone(&self) -> Box<dyn ScheduledAnimation> {
        Box::new(self.clone())
    }

    fn inverted(&self) -> Box<dyn ScheduledAnimation> {
        Box::new(self.get_inverted())
    }
}

struct Part {
    anim: Box<dyn ScheduledAnimation>,
    done: bool,
}

/// Several animations driven as one logical unit.
///
/// Steps fan out to every constituent each frame; the composite finishes
/// when the last constituent does. Cloning or inverting the composite
/// clones/inverts all parts together.
#[derive(Default)]
pub struct CompositeAnimation {
    parts: Vec<Part>,
    on_complete: Option<CompletionHandler>,
}

impl CompositeAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<A: ScheduledAnimation + 'static>(mut self, anim: A) -> Self {
        self.parts.push(Part { anim: Box::new(anim), done: false });
        self
    }

    pub fn with_completion<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut HudActions) + 'static,
    {
        self.on_complete = Some(Rc::new(handler));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl ScheduledAnimation for CompositeAnimation {
    fn make_step(&mut self, tree: &mut ComponentTree, actions: &mut HudActions) -> StepResult {
        let mut all_done = true;
        for part in &mut self.parts {
            if part.done {
                continue;
            }
            if part.anim.make_step(tree, actions) == StepResult::Finished {
                part.done = true;
            } else {
                all_done = false;
            }
        }
        if all_done {
            if let Some(handler) = &self.on_complete {
                handler(actions);
            }
            StepResult::Finished
        } else {
            StepResult::Running
        }
    }

    fn boxed_clone(&self) -> Box<dyn ScheduledAnimation> {
        Box::new(CompositeAnimation {
            parts: self
                .parts
                .iter()
                .map(|p| Part { anim: p.anim.boxed_clone(), done: p.done })
                .collect(),
            on_complete: self.on_complete.clone(),
        })
    }

    fn inverted(&self) -> Box<dyn ScheduledAnimation> {
        Box::new(CompositeAnimation {
            parts: self
                .parts
                .iter()
                .map(|p| Part { anim: p.anim.inverted(), done: false })
                .collect(),
            on_complete: self.on_complete.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use nimbus_core::coords::Viewport;

    use crate::constraint::{PositionConstraint, SizeConstraint};
    use crate::tree::Component;

    use super::*;

    fn fixture() -> (ComponentTree, NodeId) {
        let mut tree = ComponentTree::new(Viewport::new(1000.0, 1000.0));
        let node = tree.insert(
            Component::new()
                .with_position(PositionConstraint::screen(0.0), PositionConstraint::screen(0.0))
                .with_size(SizeConstraint::screen(0.0), SizeConstraint::screen(0.5))
                .unwrap(),
        );
        tree.add_component(tree.root(), node).unwrap();
        (tree, node)
    }

    // ── convergence ───────────────────────────────────────────────────────

    #[test]
    fn converges_in_exactly_duration_steps() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let mut anim =
            Animation::new(node, ScalarProperty::SizeValue(Axis::X), 0.0, 0.9f32, 9);

        for step in 1..=9 {
            let result = anim.make_step(&mut tree, &mut actions);
            if step < 9 {
                assert_eq!(result, StepResult::Running, "step {step}");
            } else {
                assert_eq!(result, StepResult::Finished);
            }
        }
        // Snapped exactly, no float residue.
        assert_eq!(tree.bounds(node).unwrap().size.x, 0.9);
    }

    #[test]
    fn zero_duration_snaps_on_first_step() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let mut anim =
            Animation::new(node, ScalarProperty::SizeValue(Axis::X), 0.0, 0.7f32, 0);

        assert_eq!(anim.make_step(&mut tree, &mut actions), StepResult::Finished);
        assert_eq!(tree.bounds(node).unwrap().size.x, 0.7);
    }

    #[test]
    fn completion_fires_once_at_the_end() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut anim = Animation::new(node, ScalarProperty::OffsetX, 0.0, 10.0f32, 3)
            .with_completion(move |_| counter.set(counter.get() + 1));

        while anim.make_step(&mut tree, &mut actions) == StepResult::Running {}
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn inverted_travels_back_to_start() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let anim = Animation::new(node, ScalarProperty::OffsetX, 0.0, 12.0f32, 4);
        let mut back = anim.get_inverted();

        while back.make_step(&mut tree, &mut actions) == StepResult::Running {}
        assert_eq!(tree.node(node).unwrap().offset_px().x, 0.0);
    }

    #[test]
    fn set_duration_rescales_from_current_progress() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let mut anim = Animation::new(node, ScalarProperty::OffsetX, 0.0, 10.0f32, 5);
        anim.set_duration(2);

        assert_eq!(anim.make_step(&mut tree, &mut actions), StepResult::Running);
        assert_eq!(tree.node(node).unwrap().offset_px().x, 5.0);
        assert_eq!(anim.make_step(&mut tree, &mut actions), StepResult::Finished);
        assert_eq!(tree.node(node).unwrap().offset_px().x, 10.0);
    }

    // ── composite ─────────────────────────────────────────────────────────

    #[test]
    fn composite_finishes_with_its_longest_part() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let mut composite = CompositeAnimation::new()
            .with(Animation::new(node, ScalarProperty::OffsetX, 0.0, 4.0f32, 2))
            .with(Animation::new(node, ScalarProperty::OffsetY, 0.0, 8.0f32, 4));

        let mut steps = 0;
        loop {
            steps += 1;
            if composite.make_step(&mut tree, &mut actions) == StepResult::Finished {
                break;
            }
        }
        assert_eq!(steps, 4);
        assert_eq!(tree.node(node).unwrap().offset_px(), Vec2::new(4.0, 8.0));
    }

    #[test]
    fn composite_inverts_as_one_unit() {
        let (mut tree, node) = fixture();
        let mut actions = HudActions::new();
        let composite = CompositeAnimation::new()
            .with(Animation::new(node, ScalarProperty::OffsetX, 0.0, 4.0f32, 2))
            .with(Animation::new(node, ScalarProperty::OffsetY, 0.0, 6.0f32, 2));
        let mut back = composite.inverted();

        while back.make_step(&mut tree, &mut actions) == StepResult::Running {}
        assert_eq!(tree.node(node).unwrap().offset_px(), Vec2::zero());
    }
}
