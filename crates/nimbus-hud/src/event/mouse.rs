use nimbus_core::coords::Vec2;
use nimbus_core::input::MouseButton;

use crate::hud::HudActions;
use crate::tree::NodeId;

/// What happened, from the receiving node's point of view.
///
/// Button gestures resolve into exactly one `*Started` / `*Released` pair:
/// a press starts as a click, upgrades to a long-press when the hold timer
/// crosses the threshold, or to a drag when the pointer moves; the release
/// kind matches whichever state was active.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseEventKind {
    /// Pointer moved onto this node (or a descendant).
    Entered,
    /// Pointer left this node's subtree.
    Exited,
    /// Fired every frame on the picked node while the pointer rests on it.
    Action,
    ClickStarted,
    /// Hold timer crossed the long-press threshold without movement.
    PressStarted,
    /// Movement while pressed, and the button's drag slot was free.
    DragStarted,
    ClickReleased,
    PressReleased,
    DragReleased,
    Scroll,
}

/// A mouse event offered to a node's listeners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Set for button transitions, `None` for enter/exit/action/scroll.
    pub button: Option<MouseButton>,
    /// Pointer position in logical pixels.
    pub position: Vec2,
    /// Scroll delta in lines; nonzero only for [`MouseEventKind::Scroll`].
    pub scroll: Vec2,
    /// The picked node the event originated on.
    pub target: NodeId,
    /// The node whose listeners are currently being offered the event;
    /// walks from `target` toward the root as the event bubbles.
    pub node: NodeId,
}

/// Handler verdict: `Consumed` stops bubbling, `Ignored` offers the event to
/// the next handler and then the parent node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

type MouseHandler = Box<dyn FnMut(&MouseEvent, &mut HudActions) -> EventResult>;

/// Ordered list of mouse handlers on one node.
///
/// Handlers run in registration order; the first `Consumed` verdict stops
/// both the remaining handlers and upward propagation.
#[derive(Default)]
pub struct MouseListener {
    handlers: Vec<MouseHandler>,
}

impl MouseListener {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn push<F>(&mut self, handler: F)
    where
        F: FnMut(&MouseEvent, &mut HudActions) -> EventResult + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Appends another listener's handlers after this one's.
    pub(crate) fn absorb(&mut self, mut other: MouseListener) {
        self.handlers.append(&mut other.handlers);
    }

    /// Offers `event` to each handler in order.
    pub(crate) fn dispatch(&mut self, event: &MouseEvent, actions: &mut HudActions) -> EventResult {
        for handler in &mut self.handlers {
            if handler(event, actions) == EventResult::Consumed {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }
}

/// Per-node hover bookkeeping, reset when the node detaches.
#[derive(Debug, Default, Copy, Clone)]
pub struct MouseState {
    /// The pointer is currently inside this node's subtree.
    pub(crate) inside: bool,
    /// Scratch flag set top-down before the exit walk: this node remains an
    /// ancestor of the newly picked node and must not exit.
    pub(crate) still_inside: bool,
}

// ── per-button gesture tracking ───────────────────────────────────────────

/// Hold time after which a motionless press becomes a long-press.
pub(crate) const LONG_PRESS_SECS: f32 = 0.5;
/// Pointer travel (logical pixels) after which a press becomes a drag.
pub(crate) const DRAG_THRESHOLD_PX: f32 = 4.0;

/// Gesture state for one of the eight button slots, owned by the Hud.
///
/// The tracker decides *which* transition a frame produces; the Hud decides
/// where it is delivered (the node picked at press time) and whether a drag
/// start is honored (the button's drag slot must be free).
#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct ButtonTracker {
    pub held: bool,
    pub held_time: f32,
    pub press_pos: Vec2,
    /// Node picked when the press began; transitions are delivered here.
    pub origin: Option<NodeId>,
    pub long_press: bool,
    pub dragging: bool,
    moved: bool,
}

impl ButtonTracker {
    /// Begins a press gesture. The frame's transition is `ClickStarted`.
    pub fn begin(&mut self, origin: Option<NodeId>, pos: Vec2) {
        *self = ButtonTracker { held: true, press_pos: pos, origin, ..ButtonTracker::default() };
    }

    /// Advances the hold timer and movement detection for one frame.
    ///
    /// Returns the transition this frame produced, if any. `DragStarted` is
    /// only returned while the tracker is not already dragging; the caller
    /// marks [`dragging`](Self::dragging) once it accepts the drag.
    pub fn tick(&mut self, dt: f32, pos: Vec2) -> Option<MouseEventKind> {
        if !self.held {
            return None;
        }
        self.held_time += dt;
        if !self.moved && pos.distance(self.press_pos) > DRAG_THRESHOLD_PX {
            self.moved = true;
        }
        if self.moved && !self.dragging && !self.long_press {
            return Some(MouseEventKind::DragStarted);
        }
        if !self.moved && !self.long_press && self.held_time >= LONG_PRESS_SECS {
            self.long_press = true;
            return Some(MouseEventKind::PressStarted);
        }
        None
    }

    /// Ends the gesture, returning the matching release kind.
    pub fn release(&mut self) -> MouseEventKind {
        let kind = if self.dragging {
            MouseEventKind::DragReleased
        } else if self.long_press {
            MouseEventKind::PressReleased
        } else {
            MouseEventKind::ClickReleased
        };
        *self = ButtonTracker::default();
        kind
    }
}
