use nimbus_core::coords::Vec2;
use nimbus_core::input::MouseButton;

use crate::hud::HudActions;
use crate::tree::NodeId;

/// Where and how a drag ended.
#[derive(Debug, Copy, Clone)]
pub struct DragDrop {
    /// Node that started the drag.
    pub source: NodeId,
    /// Picked node under the pointer at drop time, if any.
    pub target: Option<NodeId>,
    /// Pointer position in logical pixels at drop time.
    pub position: Vec2,
    /// True when the drag was cancelled rather than released.
    pub cancelled: bool,
}

type DropHandler = Box<dyn FnOnce(DragDrop, &mut HudActions)>;

/// An in-progress pointer drag, owned by the Hud while active.
///
/// At most one exists per mouse button. Created by a `DragStarted` handler
/// via [`HudActions::start_drag`](crate::hud::HudActions::start_drag) and
/// destroyed on release or cancellation; it never outlives one gesture.
/// The drop handler always runs, even if the source node was removed
/// mid-drag — handlers must tolerate a now-detached source.
pub struct DragEvent {
    button: MouseButton,
    source: NodeId,
    visual: Option<NodeId>,
    /// Pointer-to-visual-origin offset, so the visual doesn't jump on grab.
    grab_offset: Vec2,
    on_drop: Option<DropHandler>,
}

impl DragEvent {
    pub fn new(button: MouseButton, source: NodeId) -> Self {
        Self { button, source, visual: None, grab_offset: Vec2::zero(), on_drop: None }
    }

    /// Attaches a node that follows the pointer while the drag is live.
    ///
    /// The Hud moves it each frame via its pixel offset; the node should be
    /// positioned at the window origin so the offset is the pointer position.
    pub fn with_visual(mut self, visual: NodeId, grab_offset: Vec2) -> Self {
        self.visual = Some(visual);
        self.grab_offset = grab_offset;
        self
    }

    pub fn on_drop<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(DragDrop, &mut HudActions) + 'static,
    {
        self.on_drop = Some(Box::new(handler));
        self
    }

    #[inline]
    pub fn button(&self) -> MouseButton {
        self.button
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    #[inline]
    pub fn visual(&self) -> Option<NodeId> {
        self.visual
    }

    #[inline]
    pub(crate) fn grab_offset(&self) -> Vec2 {
        self.grab_offset
    }

    /// Consumes the drag and fires its drop handler.
    pub(crate) fn finish(
        self,
        target: Option<NodeId>,
        position: Vec2,
        cancelled: bool,
        actions: &mut HudActions,
    ) {
        if let Some(handler) = self.on_drop {
            handler(DragDrop { source: self.source, target, position, cancelled }, actions);
        }
    }
}
