use nimbus_core::coords::{Rect, Vec2};
use nimbus_core::paint::Color;
use nimbus_core::text::TextMetrics;

use crate::constraint::{Axis, PositionConstraint, SizeConstraint};
use crate::error::HudError;
use crate::event::{MouseListener, MouseState, KeyListener};
use crate::pick::PickId;

use super::NodeId;

/// What a node paints, if anything.
///
/// Capability composition instead of an inheritance chain: a bare node is a
/// container, `Shape` nodes fill their bounds, `Text`/`Texture` nodes carry
/// the content metrics their size constraints may read. Metrics are supplied
/// by whoever builds the node (e.g. measured through
/// `nimbus_core::text::FontSystem`); the core never shapes text itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Pure container; nothing painted, still pickable while visible.
    None,
    Shape { color: Color },
    Text { metrics: TextMetrics, color: Color },
    Texture { width: f32, height: f32 },
}

impl Content {
    #[inline]
    pub fn has_shape(&self) -> bool {
        !matches!(self, Content::None)
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Content::Shape { color } | Content::Text { color, .. } => Some(*color),
            _ => None,
        }
    }
}

/// One node of the HUD scene graph.
///
/// Constructed detached via the builder methods, then attached with
/// [`ComponentTree::add_component`](super::ComponentTree::add_component).
/// Bounds are normalized window units and defined only while attached.
pub struct Component {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attached: bool,
    pub(crate) pending_removal: bool,
    pub(crate) visible: bool,
    /// Children render and pick only inside this node's bounds.
    pub(crate) masks_children: bool,

    pub(crate) bounds: Rect,
    /// Pixel offset applied after layout (bounds stay normalized).
    pub(crate) offset_px: Vec2,

    pub(crate) pick_id: PickId,

    pub(crate) position: [PositionConstraint; 2],
    pub(crate) size: [SizeConstraint; 2],

    pub(crate) content: Content,
    pub(crate) mouse: MouseListener,
    pub(crate) key: Option<KeyListener>,
    pub(crate) mouse_state: MouseState,
}

impl Component {
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            attached: false,
            pending_removal: false,
            visible: true,
            masks_children: false,
            bounds: Rect::default(),
            offset_px: Vec2::zero(),
            pick_id: PickId::NONE,
            position: [PositionConstraint::default(); 2],
            size: [SizeConstraint::default(); 2],
            content: Content::None,
            mouse: MouseListener::new(),
            key: None,
            mouse_state: MouseState::default(),
        }
    }

    // ── builder ───────────────────────────────────────────────────────────

    pub fn with_position(mut self, x: PositionConstraint, y: PositionConstraint) -> Self {
        self.position = [x, y];
        self
    }

    /// Sets both size constraints.
    ///
    /// Rejects aspect-driven kinds on both axes — that pairing has no
    /// well-defined resolution order (each axis would wait on the other).
    pub fn with_size(mut self, x: SizeConstraint, y: SizeConstraint) -> Result<Self, HudError> {
        if x.is_aspect_driven() && y.is_aspect_driven() {
            return Err(HudError::AspectOnBothAxes);
        }
        self.size = [x, y];
        Ok(self)
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Marks this node as a mask: children only render and pick inside it.
    pub fn with_mask(mut self) -> Self {
        self.masks_children = true;
        self
    }

    pub fn with_offset_px(mut self, offset: Vec2) -> Self {
        self.offset_px = offset;
        self
    }

    /// Registers a mouse handler; handlers run in registration order until
    /// one consumes the event.
    pub fn on_mouse<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&crate::event::MouseEvent, &mut crate::hud::HudActions) -> crate::event::EventResult
            + 'static,
    {
        self.mouse.push(handler);
        self
    }

    pub fn with_key_listener(mut self, listener: KeyListener) -> Self {
        self.key = Some(listener);
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn pending_removal(&self) -> bool {
        self.pending_removal
    }

    #[inline]
    pub fn attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn pick_id(&self) -> PickId {
        self.pick_id
    }

    #[inline]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[inline]
    pub fn content_mut(&mut self) -> &mut Content {
        &mut self.content
    }

    #[inline]
    pub fn offset_px(&self) -> Vec2 {
        self.offset_px
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    // ── mutation (used by animations and widget code) ─────────────────────

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn set_offset_px(&mut self, offset: Vec2) {
        self.offset_px = offset;
    }

    /// Overwrites the adjustable scalar of the position constraint on `axis`.
    #[inline]
    pub fn set_position_value(&mut self, axis: Axis, value: f32) {
        self.position[axis.index()].value = value;
    }

    /// Overwrites the adjustable scalar of the size constraint on `axis`.
    #[inline]
    pub fn set_size_value(&mut self, axis: Axis, value: f32) {
        self.size[axis.index()].value = value;
    }

    #[inline]
    pub fn position_constraint(&self, axis: Axis) -> PositionConstraint {
        self.position[axis.index()]
    }

    #[inline]
    pub fn size_constraint(&self, axis: Axis) -> SizeConstraint {
        self.size[axis.index()]
    }

    /// Replaces the content color, if the content carries one.
    pub fn set_content_color(&mut self, color: Color) {
        match &mut self.content {
            Content::Shape { color: c } | Content::Text { color: c, .. } => *c = color,
            _ => {}
        }
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}
