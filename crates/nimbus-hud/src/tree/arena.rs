use nimbus_core::coords::{Rect, Vec2, Viewport};

use crate::constraint::{Axis, PositionConstraint, SizeConstraint};
use crate::error::HudError;
use crate::pick::PickId;

use super::node::{Component, Content};

/// Generational handle into a [`ComponentTree`].
///
/// Stale handles (the slot was reused after a destroy) fail validation
/// instead of aliasing a different node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    node: Option<Component>,
}

static DETACHED_CONTENT: Content = Content::None;

/// Arena-backed scene graph with a fixed root spanning the window.
///
/// The root plays the role of the scene component: always attached, bounds
/// pinned to the full window. All other nodes are inserted detached and
/// become live through [`add_component`](Self::add_component).
///
/// Pick ids stay dense: after every structural change the live tree is
/// renumbered `1..=N` in draw order, so the 24-bit id space never grows
/// across long sessions of add/remove cycles.
pub struct ComponentTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    viewport: Viewport,
    /// `pick_table[i]` is the node holding pick id `i + 1`.
    pick_table: Vec<NodeId>,
}

impl ComponentTree {
    pub fn new(viewport: Viewport) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
            viewport,
            pick_table: Vec::new(),
        };

        let mut root = Component::new();
        root.attached = true;
        root.bounds = Rect::new(0.0, 0.0, 1.0, 1.0);
        tree.root = tree.insert_raw(root);
        tree.compact_pick_ids();
        tree
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the window viewport and relayouts the whole tree.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.update_bounds();
    }

    pub fn node(&self, id: NodeId) -> Option<&Component> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Component> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Number of live (attached) nodes, root included.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.pick_table.len()
    }

    /// Reverse lookup from a pick id read out of the id buffer.
    ///
    /// Ids outside the current dense range are stale (rendered before the
    /// last structural change) and resolve to `None`.
    pub fn node_by_pick(&self, pick: PickId) -> Option<NodeId> {
        if pick.is_none() {
            return None;
        }
        self.pick_table.get(pick.raw() as usize - 1).copied()
    }

    /// Bounds in normalized window units; `None` while detached.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        let n = self.node(id)?;
        n.attached.then_some(n.bounds)
    }

    /// Bounds in pixels with the node's pixel offset applied.
    pub fn pixel_bounds(&self, id: NodeId) -> Option<Rect> {
        let n = self.node(id)?;
        if !n.attached {
            return None;
        }
        let vp = self.viewport;
        Some(Rect::new(
            n.bounds.origin.x * vp.width + n.offset_px.x,
            n.bounds.origin.y * vp.height + n.offset_px.y,
            n.bounds.size.x * vp.width,
            n.bounds.size.y * vp.height,
        ))
    }

    // ── construction / structure ──────────────────────────────────────────

    /// Stores a freshly-built component in the arena, detached.
    pub fn insert(&mut self, mut component: Component) -> NodeId {
        component.parent = None;
        component.children.clear();
        component.attached = false;
        component.pending_removal = false;
        component.pick_id = PickId::NONE;
        self.insert_raw(component)
    }

    fn insert_raw(&mut self, component: Component) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(component);
            NodeId { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, node: Some(component) });
            NodeId { index, generation: 0 }
        }
    }

    /// Attaches `child` under `parent`.
    ///
    /// If the parent is live this assigns pick ids to the whole new subtree
    /// and recomputes its bounds immediately. Linking under a detached
    /// parent is allowed; the subtree goes live when that parent does.
    pub fn add_component(&mut self, parent: NodeId, child: NodeId) -> Result<(), HudError> {
        if child == self.root {
            return Err(HudError::IsRoot);
        }
        if self.node(parent).is_none() || self.node(child).is_none() {
            return Err(HudError::InvalidNode);
        }
        if self.node(child).is_some_and(|c| c.parent.is_some() || c.attached) {
            return Err(HudError::AlreadyParented);
        }
        // Reject attaching a subtree under one of its own descendants.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(HudError::WouldCycle);
            }
            cursor = self.node(id).and_then(|n| n.parent);
        }

        self.node_mut(parent).expect("validated").children.push(child);
        self.node_mut(child).expect("validated").parent = Some(parent);

        if self.node(parent).is_some_and(|p| p.attached) {
            self.mark_attached(child, true);
            self.compact_pick_ids();
            self.update_bounds_from(child);
        }
        Ok(())
    }

    /// Immediately unlinks `child` from its parent and detaches its subtree.
    ///
    /// Live-tree callers must not do this mid-traversal; the Hud funnels it
    /// through the end-of-frame drain (`save_remove_component`).
    pub fn detach(&mut self, child: NodeId) -> Result<(), HudError> {
        if child == self.root {
            return Err(HudError::IsRoot);
        }
        let Some(node) = self.node(child) else {
            return Err(HudError::InvalidNode);
        };
        let Some(parent) = node.parent else {
            return Err(HudError::NotAttached);
        };

        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        self.node_mut(child).expect("validated").parent = None;
        self.mark_attached(child, false);
        self.compact_pick_ids();
        Ok(())
    }

    /// Frees a detached, parentless subtree. Slots are recycled.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), HudError> {
        if id == self.root {
            return Err(HudError::IsRoot);
        }
        let Some(node) = self.node(id) else {
            return Err(HudError::InvalidNode);
        };
        if node.attached || node.parent.is_some() {
            return Err(HudError::StillAttached);
        }

        for child in self.collect_subtree(id) {
            let slot = &mut self.slots[child.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(child.index);
        }
        Ok(())
    }

    /// The subtree rooted at `id`, in depth-first draw order (`id` first).
    pub fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_into(id, &mut out);
        out
    }

    fn collect_into(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if self.node(id).is_none() {
            return;
        }
        out.push(id);
        let children = self.node(id).expect("checked").children.clone();
        for child in children {
            self.collect_into(child, out);
        }
    }

    fn mark_attached(&mut self, id: NodeId, attached: bool) {
        for node_id in self.collect_subtree(id) {
            let Some(n) = self.node_mut(node_id) else { continue };
            n.attached = attached;
            if !attached {
                n.pick_id = PickId::NONE;
                n.pending_removal = false;
                n.bounds = Rect::default();
                n.mouse_state = Default::default();
            }
        }
    }

    /// Renumbers live pick ids `1..=N` in draw order and rebuilds the
    /// reverse lookup table.
    fn compact_pick_ids(&mut self) {
        let live = self.collect_subtree(self.root);
        self.pick_table.clear();
        for id in live {
            if self.node(id).is_some_and(|n| n.attached) {
                self.pick_table.push(id);
                let pick = PickId::from_index(self.pick_table.len() - 1);
                self.node_mut(id).expect("live").pick_id = pick;
            }
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    /// Resolves bounds for every attached node in a single top-down pass.
    ///
    /// Idempotent: with no intervening mutation, a second call produces
    /// identical bounds.
    pub fn update_bounds(&mut self) {
        self.node_mut(self.root).expect("root lives forever").bounds =
            Rect::new(0.0, 0.0, 1.0, 1.0);
        let children = self.node(self.root).expect("root").children.clone();
        for child in children {
            self.update_bounds_from(child);
        }
    }

    /// Resolves bounds for the subtree rooted at `id`.
    ///
    /// Detached subtrees are skipped; their bounds are undefined by contract.
    pub fn update_bounds_from(&mut self, id: NodeId) {
        if !self.node(id).is_some_and(|n| n.attached) {
            return;
        }
        if id != self.root {
            self.layout_node(id);
        }
        let children = self.node(id).expect("attached").children.clone();
        for child in children {
            self.update_bounds_from(child);
        }
    }

    fn layout_node(&mut self, id: NodeId) {
        // Sizes before positions, aspect-driven axis last, so every
        // constraint only ever reads already-resolved values.
        let size_order = {
            let n = self.node(id).expect("attached");
            if n.size[Axis::X.index()].is_aspect_driven() {
                [Axis::Y, Axis::X]
            } else {
                [Axis::X, Axis::Y]
            }
        };

        for axis in size_order {
            let constraint = self.node(id).expect("attached").size[axis.index()];
            let extent = constraint.evaluate(self, id, axis);
            let n = self.node_mut(id).expect("attached");
            match axis {
                Axis::X => n.bounds.size.x = extent,
                Axis::Y => n.bounds.size.y = extent,
            }
        }

        for axis in [Axis::X, Axis::Y] {
            let constraint = self.node(id).expect("attached").position[axis.index()];
            let coord = constraint.evaluate(self, id, axis);
            let n = self.node_mut(id).expect("attached");
            match axis {
                Axis::X => n.bounds.origin.x = coord,
                Axis::Y => n.bounds.origin.y = coord,
            }
        }
    }

    // ── constraint access (evaluation support) ────────────────────────────

    /// Resolved bounds of the node's parent; the window rect when the
    /// parent is the root or missing.
    pub(crate) fn parent_bounds(&self, id: NodeId) -> Rect {
        self.node(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.node(p))
            .map(|p| p.bounds)
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    /// The node's resolved extent on `axis` as of this layout pass.
    pub(crate) fn resolved_extent(&self, id: NodeId, axis: Axis) -> f32 {
        self.node(id)
            .map(|n| match axis {
                Axis::X => n.bounds.size.x,
                Axis::Y => n.bounds.size.y,
            })
            .unwrap_or(0.0)
    }

    pub(crate) fn content(&self, id: NodeId) -> &Content {
        self.node(id).map(|n| &n.content).unwrap_or(&DETACHED_CONTENT)
    }

    // ── constraint setters ────────────────────────────────────────────────

    /// Swaps the position constraints of `id` and relayouts its subtree.
    pub fn set_position_constraints(
        &mut self,
        id: NodeId,
        x: PositionConstraint,
        y: PositionConstraint,
    ) -> Result<(), HudError> {
        let Some(n) = self.node_mut(id) else {
            return Err(HudError::InvalidNode);
        };
        n.position = [x, y];
        self.update_bounds_from(id);
        Ok(())
    }

    /// Swaps the size constraints of `id` and relayouts its subtree.
    ///
    /// Same both-axes-aspect rejection as
    /// [`Component::with_size`](super::Component::with_size).
    pub fn set_size_constraints(
        &mut self,
        id: NodeId,
        x: SizeConstraint,
        y: SizeConstraint,
    ) -> Result<(), HudError> {
        if x.is_aspect_driven() && y.is_aspect_driven() {
            return Err(HudError::AspectOnBothAxes);
        }
        let Some(n) = self.node_mut(id) else {
            return Err(HudError::InvalidNode);
        };
        n.size = [x, y];
        self.update_bounds_from(id);
        Ok(())
    }

    /// Moves a node by pixel offset without touching its constraints.
    pub fn set_offset_px(&mut self, id: NodeId, offset: Vec2) -> Result<(), HudError> {
        let Some(n) = self.node_mut(id) else {
            return Err(HudError::InvalidNode);
        };
        n.offset_px = offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{PositionConstraint, SizeConstraint};

    fn tree() -> ComponentTree {
        ComponentTree::new(Viewport::new(1000.0, 500.0))
    }

    fn leaf(tree: &mut ComponentTree) -> NodeId {
        tree.insert(
            Component::new()
                .with_position(PositionConstraint::parent(0.1), PositionConstraint::parent(0.1))
                .with_size(SizeConstraint::parent(0.5), SizeConstraint::parent(0.5))
                .unwrap(),
        )
    }

    /// Live pick ids must always be exactly `1..=N` in draw order.
    fn assert_dense_ids(tree: &ComponentTree) {
        let live = tree.collect_subtree(tree.root());
        let mut ids: Vec<u32> = live
            .iter()
            .filter_map(|&id| tree.node(id))
            .filter(|n| n.attached())
            .map(|n| n.pick_id().raw())
            .collect();
        ids.sort_unstable();
        let expect: Vec<u32> = (1..=tree.live_count() as u32).collect();
        assert_eq!(ids, expect);
    }

    // ── id density & recycling ────────────────────────────────────────────

    #[test]
    fn ids_stay_dense_through_add_remove_cycles() {
        let mut t = tree();
        let root = t.root();

        let a = leaf(&mut t);
        let b = leaf(&mut t);
        let c = leaf(&mut t);
        t.add_component(root, a).unwrap();
        t.add_component(a, b).unwrap();
        t.add_component(root, c).unwrap();
        assert_eq!(t.live_count(), 4);
        assert_dense_ids(&t);

        // Remove the middle subtree; ids must compact back to 1..=2.
        t.detach(a).unwrap();
        assert_eq!(t.live_count(), 2);
        assert_dense_ids(&t);
        assert!(t.node(a).unwrap().pick_id().is_none());
        assert!(t.node(b).unwrap().pick_id().is_none());

        // Re-attach; dense again, no gaps from the earlier cycle.
        t.add_component(c, a).unwrap();
        assert_eq!(t.live_count(), 4);
        assert_dense_ids(&t);
    }

    #[test]
    fn pick_lookup_round_trips_and_rejects_stale() {
        let mut t = tree();
        let a = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();

        let pick = t.node(a).unwrap().pick_id();
        assert_eq!(t.node_by_pick(pick), Some(a));

        t.detach(a).unwrap();
        // Id 2 no longer exists; a stale read maps to nothing.
        assert_eq!(t.node_by_pick(pick), None);
    }

    // ── structure guards ──────────────────────────────────────────────────

    #[test]
    fn double_parenting_is_rejected() {
        let mut t = tree();
        let a = leaf(&mut t);
        let b = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();
        t.add_component(t.root(), b).unwrap();
        assert_eq!(t.add_component(b, a), Err(HudError::AlreadyParented));
    }

    #[test]
    fn cycle_is_rejected() {
        let mut t = tree();
        let a = leaf(&mut t);
        let b = leaf(&mut t);
        // Build a detached chain a → b, then try to hang a under b.
        t.add_component(a, b).unwrap();
        assert_eq!(t.add_component(b, a), Err(HudError::WouldCycle));
    }

    #[test]
    fn root_cannot_be_reparented_or_detached() {
        let mut t = tree();
        let a = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();
        assert_eq!(t.add_component(a, t.root()), Err(HudError::IsRoot));
        assert_eq!(t.detach(t.root()), Err(HudError::IsRoot));
    }

    #[test]
    fn destroy_requires_detached() {
        let mut t = tree();
        let a = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();
        assert_eq!(t.destroy(a), Err(HudError::StillAttached));

        t.detach(a).unwrap();
        t.destroy(a).unwrap();
        assert!(t.node(a).is_none());

        // Slot reuse bumps the generation; the old id stays dead.
        let b = leaf(&mut t);
        assert_ne!(a, b);
        assert!(t.node(a).is_none());
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn attach_resolves_bounds_immediately() {
        let mut t = tree();
        let a = leaf(&mut t);
        assert_eq!(t.bounds(a), None);

        t.add_component(t.root(), a).unwrap();
        let b = t.bounds(a).unwrap();
        assert_eq!(b, Rect::new(0.1, 0.1, 0.5, 0.5));
    }

    #[test]
    fn update_bounds_is_idempotent() {
        let mut t = tree();
        let a = leaf(&mut t);
        let b = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();
        t.add_component(a, b).unwrap();

        t.update_bounds();
        let first: Vec<Rect> = [a, b].iter().map(|&id| t.bounds(id).unwrap()).collect();
        t.update_bounds();
        let second: Vec<Rect> = [a, b].iter().map(|&id| t.bounds(id).unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn detach_undefines_bounds() {
        let mut t = tree();
        let a = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();
        assert!(t.bounds(a).is_some());

        t.detach(a).unwrap();
        assert_eq!(t.bounds(a), None);
    }

    #[test]
    fn pixel_bounds_applies_offset() {
        let mut t = tree();
        let a = leaf(&mut t);
        t.add_component(t.root(), a).unwrap();
        t.set_offset_px(a, Vec2::new(5.0, -3.0)).unwrap();

        let px = t.pixel_bounds(a).unwrap();
        assert_eq!(px, Rect::new(105.0, 47.0, 500.0, 250.0));
    }

    #[test]
    fn viewport_change_relayouts() {
        let mut t = tree();
        let a = t.insert(
            Component::new()
                .with_size(SizeConstraint::pixels(100.0), SizeConstraint::pixels(100.0))
                .unwrap(),
        );
        t.add_component(t.root(), a).unwrap();
        assert_eq!(t.bounds(a).unwrap().size.x, 0.1);

        t.set_viewport(Viewport::new(2000.0, 500.0));
        assert_eq!(t.bounds(a).unwrap().size.x, 0.05);
    }
}
