use crate::tree::{ComponentTree, NodeId};

use super::{axis_extent, axis_origin, Axis};

/// How a position constraint turns its scalar into a screen coordinate.
///
/// All results are normalized window units. Kinds that need the node's own
/// extent (`Center`, `Mirror`) read the size resolved earlier in the same
/// layout pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PositionKind {
    /// `value` is the coordinate, relative to the window.
    Screen,
    /// `value` is a fraction of the parent extent, from the parent's origin.
    Parent,
    /// Centered in the parent; `value` is an additional window-relative offset.
    Center,
    /// `value` is a pixel distance from the window origin.
    Pixel,
    /// Anchored to the parent's far edge; `value` is the fraction of the
    /// parent extent between the node's far edge and the parent's.
    Mirror,
}

/// Position constraint for one axis: a kind plus one adjustable scalar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionConstraint {
    pub kind: PositionKind,
    pub value: f32,
}

impl PositionConstraint {
    #[inline]
    pub const fn new(kind: PositionKind, value: f32) -> Self {
        Self { kind, value }
    }

    #[inline]
    pub const fn screen(value: f32) -> Self {
        Self::new(PositionKind::Screen, value)
    }

    #[inline]
    pub const fn parent(value: f32) -> Self {
        Self::new(PositionKind::Parent, value)
    }

    #[inline]
    pub const fn center(value: f32) -> Self {
        Self::new(PositionKind::Center, value)
    }

    #[inline]
    pub const fn pixels(value: f32) -> Self {
        Self::new(PositionKind::Pixel, value)
    }

    #[inline]
    pub const fn mirror(value: f32) -> Self {
        Self::new(PositionKind::Mirror, value)
    }

    /// Resolves the coordinate for `node` on `axis`.
    ///
    /// Pure; reads only the parent's already-resolved bounds, the viewport,
    /// and the node's own already-resolved extent. Callers guard against
    /// detached nodes — evaluating one is undefined and layout skips them.
    pub fn evaluate(&self, tree: &ComponentTree, node: NodeId, axis: Axis) -> f32 {
        let parent = tree.parent_bounds(node);
        match self.kind {
            PositionKind::Screen => self.value,
            PositionKind::Parent => {
                axis_origin(parent, axis) + self.value * axis_extent(parent, axis)
            }
            PositionKind::Center => {
                let own = tree.resolved_extent(node, axis);
                axis_origin(parent, axis) + (axis_extent(parent, axis) - own) * 0.5 + self.value
            }
            PositionKind::Pixel => {
                tree.viewport().pixels_to_normalized(self.value, axis.is_horizontal())
            }
            PositionKind::Mirror => {
                let own = tree.resolved_extent(node, axis);
                axis_origin(parent, axis) + axis_extent(parent, axis)
                    - own
                    - self.value * axis_extent(parent, axis)
            }
        }
    }
}

impl Default for PositionConstraint {
    /// Fills from the parent's origin.
    fn default() -> Self {
        Self::parent(0.0)
    }
}

#[cfg(test)]
mod tests {
    use nimbus_core::coords::Viewport;

    use crate::constraint::{SizeConstraint};
    use crate::tree::{Component, ComponentTree};

    use super::*;

    fn tree_with_child(
        pos: [PositionConstraint; 2],
        size: [SizeConstraint; 2],
    ) -> (ComponentTree, NodeId) {
        let mut tree = ComponentTree::new(Viewport::new(1000.0, 500.0));
        let child = tree.insert(
            Component::new()
                .with_position(pos[0], pos[1])
                .with_size(size[0], size[1])
                .unwrap(),
        );
        tree.add_component(tree.root(), child).unwrap();
        (tree, child)
    }

    // ── screen / parent / pixel ───────────────────────────────────────────

    #[test]
    fn screen_is_the_raw_value() {
        let (tree, child) = tree_with_child(
            [PositionConstraint::screen(0.25), PositionConstraint::screen(0.75)],
            [SizeConstraint::parent(0.1), SizeConstraint::parent(0.1)],
        );
        let b = tree.bounds(child).unwrap();
        assert_eq!(b.origin.x, 0.25);
        assert_eq!(b.origin.y, 0.75);
    }

    #[test]
    fn parent_offsets_into_parent_extent() {
        // Root spans the window, so parent == screen at the first level.
        let (tree, child) = tree_with_child(
            [PositionConstraint::parent(0.5), PositionConstraint::parent(0.25)],
            [SizeConstraint::parent(0.1), SizeConstraint::parent(0.1)],
        );
        let b = tree.bounds(child).unwrap();
        assert_eq!(b.origin.x, 0.5);
        assert_eq!(b.origin.y, 0.25);
    }

    #[test]
    fn pixel_converts_through_viewport() {
        let (tree, child) = tree_with_child(
            [PositionConstraint::pixels(100.0), PositionConstraint::pixels(100.0)],
            [SizeConstraint::parent(0.1), SizeConstraint::parent(0.1)],
        );
        let b = tree.bounds(child).unwrap();
        assert_eq!(b.origin.x, 0.1); // 100 / 1000
        assert_eq!(b.origin.y, 0.2); // 100 / 500
    }

    // ── center / mirror ───────────────────────────────────────────────────

    #[test]
    fn center_uses_resolved_own_extent() {
        let (tree, child) = tree_with_child(
            [PositionConstraint::center(0.0), PositionConstraint::center(0.1)],
            [SizeConstraint::parent(0.5), SizeConstraint::parent(0.25)],
        );
        let b = tree.bounds(child).unwrap();
        assert_eq!(b.origin.x, 0.25);           // (1 - 0.5) / 2
        assert!((b.origin.y - 0.475).abs() < 1e-6); // (1 - 0.25) / 2 + 0.1
    }

    #[test]
    fn mirror_anchors_to_far_edge() {
        let (tree, child) = tree_with_child(
            [PositionConstraint::mirror(0.1), PositionConstraint::mirror(0.0)],
            [SizeConstraint::parent(0.2), SizeConstraint::parent(0.2)],
        );
        let b = tree.bounds(child).unwrap();
        assert!((b.origin.x - 0.7).abs() < 1e-6); // 1 - 0.2 - 0.1
        assert!((b.origin.y - 0.8).abs() < 1e-6); // 1 - 0.2
    }

    // ── nested parents ────────────────────────────────────────────────────

    #[test]
    fn parent_relative_nests() {
        let mut tree = ComponentTree::new(Viewport::new(1000.0, 1000.0));
        let panel = tree.insert(
            Component::new()
                .with_position(PositionConstraint::screen(0.5), PositionConstraint::screen(0.5))
                .with_size(SizeConstraint::screen(0.4), SizeConstraint::screen(0.4))
                .unwrap(),
        );
        let inner = tree.insert(
            Component::new()
                .with_position(PositionConstraint::parent(0.5), PositionConstraint::parent(0.0))
                .with_size(SizeConstraint::parent(0.5), SizeConstraint::parent(0.5))
                .unwrap(),
        );
        tree.add_component(tree.root(), panel).unwrap();
        tree.add_component(panel, inner).unwrap();

        let b = tree.bounds(inner).unwrap();
        assert!((b.origin.x - 0.7).abs() < 1e-6); // 0.5 + 0.5 * 0.4
        assert!((b.origin.y - 0.5).abs() < 1e-6);
        assert!((b.size.x - 0.2).abs() < 1e-6);
    }
}
