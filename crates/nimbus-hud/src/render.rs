//! Renderer seam.
//!
//! The core walks the tree in draw order and emits one [`NodeDraw`] per
//! visible node; a [`HudRenderer`] turns those into GPU work (color pass +
//! id attachment) or, for tests and headless runs, into CPU stamps on a
//! [`CpuPickBuffer`]. Masks map onto the backend's stencil/scissor state.

use nimbus_core::coords::{Rect, Viewport};

use crate::pick::{CpuPickBuffer, PickId};
use crate::tree::{ComponentTree, Content, NodeId};

/// One node's draw request: resolved pixel rect, pick id, and what to paint.
pub struct NodeDraw<'a> {
    /// Bounds in logical pixels, pixel offset already applied.
    pub rect: Rect,
    pub pick: PickId,
    pub content: &'a Content,
}

/// Backend contract for one HUD frame.
///
/// Calls arrive strictly in draw order, `push_mask`/`pop_mask` balanced, so
/// a backend can translate them 1:1 into command-encoder state without
/// reordering.
pub trait HudRenderer {
    fn begin_frame(&mut self, viewport: Viewport);
    fn draw_node(&mut self, draw: NodeDraw<'_>);
    /// Clips subsequent draws (and their pick ids) to `rect`, intersected
    /// with enclosing masks.
    fn push_mask(&mut self, rect: Rect);
    fn pop_mask(&mut self);
    fn end_frame(&mut self) {}
}

/// Emits the whole tree to `renderer`, parents before children.
///
/// Invisible nodes drop their entire subtree, from painting and from
/// picking both.
pub fn render_tree(tree: &ComponentTree, renderer: &mut dyn HudRenderer) {
    renderer.begin_frame(tree.viewport());
    render_node(tree, tree.root(), renderer);
    renderer.end_frame();
}

fn render_node(tree: &ComponentTree, id: NodeId, renderer: &mut dyn HudRenderer) {
    let Some(node) = tree.node(id) else { return };
    if !node.visible() {
        return;
    }
    let Some(rect) = tree.pixel_bounds(id) else { return };

    renderer.draw_node(NodeDraw { rect, pick: node.pick_id(), content: node.content() });

    let masked = node.masks_children;
    if masked {
        renderer.push_mask(rect);
    }
    for &child in node.children() {
        render_node(tree, child, renderer);
    }
    if masked {
        renderer.pop_mask();
    }
}

impl HudRenderer for CpuPickBuffer {
    fn begin_frame(&mut self, viewport: Viewport) {
        let (w, h) = (viewport.width.max(0.0) as u32, viewport.height.max(0.0) as u32);
        if (w, h) != (self.width(), self.height()) {
            self.resize(w, h);
        } else {
            self.clear();
        }
    }

    fn draw_node(&mut self, draw: NodeDraw<'_>) {
        self.stamp(draw.rect, draw.pick);
    }

    fn push_mask(&mut self, rect: Rect) {
        CpuPickBuffer::push_mask(self, rect);
    }

    fn pop_mask(&mut self) {
        CpuPickBuffer::pop_mask(self);
    }
}

#[cfg(test)]
mod tests {
    use nimbus_core::coords::Viewport;

    use crate::constraint::{PositionConstraint, SizeConstraint};
    use crate::pick::PickSource;
    use crate::tree::Component;

    use super::*;

    fn quarter(x: f32, y: f32) -> Component {
        Component::new()
            .with_position(PositionConstraint::screen(x), PositionConstraint::screen(y))
            .with_size(SizeConstraint::screen(0.5), SizeConstraint::screen(0.5))
            .unwrap()
    }

    #[test]
    fn later_siblings_pick_on_top() {
        let mut tree = ComponentTree::new(Viewport::new(100.0, 100.0));
        let a = tree.insert(quarter(0.0, 0.0));
        let b = tree.insert(quarter(0.25, 0.25)); // overlaps a's lower right
        tree.add_component(tree.root(), a).unwrap();
        tree.add_component(tree.root(), b).unwrap();

        let mut buf = CpuPickBuffer::new(100, 100);
        render_tree(&tree, &mut buf);

        let pick_a = tree.node(a).unwrap().pick_id();
        let pick_b = tree.node(b).unwrap().pick_id();
        assert_eq!(buf.pick_at(10, 10), pick_a);
        assert_eq!(buf.pick_at(40, 40), pick_b); // overlap region: b painted last
        assert_eq!(tree.node_by_pick(buf.pick_at(40, 40)), Some(b));
    }

    #[test]
    fn invisible_subtree_is_unpickable() {
        let mut tree = ComponentTree::new(Viewport::new(100.0, 100.0));
        let panel = tree.insert(quarter(0.0, 0.0).with_visible(false));
        let inner = tree.insert(quarter(0.0, 0.0));
        tree.add_component(tree.root(), panel).unwrap();
        tree.add_component(panel, inner).unwrap();

        let mut buf = CpuPickBuffer::new(100, 100);
        render_tree(&tree, &mut buf);

        // Only the root remains under the cursor.
        assert_eq!(tree.node_by_pick(buf.pick_at(10, 10)), Some(tree.root()));
    }

    #[test]
    fn mask_clips_children_for_picking() {
        let mut tree = ComponentTree::new(Viewport::new(100.0, 100.0));
        let clip = tree.insert(quarter(0.0, 0.0).with_mask());
        // Child spans the full window but must only pick inside the mask.
        let child = tree.insert(
            Component::new()
                .with_position(PositionConstraint::screen(0.0), PositionConstraint::screen(0.0))
                .with_size(SizeConstraint::screen(1.0), SizeConstraint::screen(1.0))
                .unwrap(),
        );
        tree.add_component(tree.root(), clip).unwrap();
        tree.add_component(clip, child).unwrap();

        let mut buf = CpuPickBuffer::new(100, 100);
        render_tree(&tree, &mut buf);

        let pick_child = tree.node(child).unwrap().pick_id();
        assert_eq!(buf.pick_at(20, 20), pick_child);
        assert_eq!(tree.node_by_pick(buf.pick_at(80, 80)), Some(tree.root()));
    }
}
