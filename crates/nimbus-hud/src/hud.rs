//! Frame orchestration.
//!
//! [`Hud`] owns the component tree, the animation scheduler, the per-button
//! gesture trackers, the active drags and the key focus, and drives the
//! fixed per-frame protocol: `input()` → `update(dt)` → `render()`. Event
//! handlers never touch the tree directly; they queue work on a
//! [`HudActions`] that the Hud applies at safe points, so no callback can
//! mutate a list the dispatcher is walking.

use log::warn;
use nimbus_core::coords::{Vec2, Viewport};
use nimbus_core::input::{InputFrame, InputState, Key, Modifiers, MouseButton};

use crate::animation::{AnimationScheduler, ScheduledAnimation};
use crate::error::HudError;
use crate::event::{
    ButtonTracker, DragEvent, EventResult, KeyListener, MouseEvent, MouseEventKind, MouseListener,
};
use crate::pick::PickSource;
use crate::render::{render_tree, HudRenderer};
use crate::tree::{Component, ComponentTree, NodeId};

type DeferredAction = Box<dyn FnOnce(&mut Hud)>;

/// Work queued by event handlers and animation callbacks.
///
/// Handlers receive `&mut HudActions` instead of the Hud itself; everything
/// they request is applied by the Hud once the current traversal is done.
/// Structural removals additionally wait for the end-of-frame drain.
#[derive(Default)]
pub struct HudActions {
    deferred: Vec<DeferredAction>,
    animations: Vec<Box<dyn ScheduledAnimation>>,
    drags: Vec<DragEvent>,
    focus: Option<Option<NodeId>>,
    removals: Vec<NodeId>,
    render: bool,
}

impl HudActions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the Hud at the next deferred-action drain.
    pub fn defer<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Hud) + 'static,
    {
        self.deferred.push(Box::new(f));
    }

    /// Enqueues an animation; it becomes active next frame.
    pub fn start_animation<A: ScheduledAnimation + 'static>(&mut self, anim: A) {
        self.animations.push(Box::new(anim));
    }

    /// Requests ownership of a drag. Rejected (with a cancelled drop) if the
    /// button already has one.
    pub fn start_drag(&mut self, drag: DragEvent) {
        self.drags.push(drag);
    }

    /// Moves key focus to `node`; the previous holder gets `deselected`.
    pub fn focus(&mut self, node: NodeId) {
        self.focus = Some(Some(node));
    }

    pub fn clear_focus(&mut self) {
        self.focus = Some(None);
    }

    /// Marks `node` pending-removal; the unlink happens at end of frame.
    pub fn remove_component(&mut self, node: NodeId) {
        self.removals.push(node);
    }

    /// One-shot request for another render even if nothing else is moving.
    pub fn request_render(&mut self) {
        self.render = true;
    }

    fn is_empty(&self) -> bool {
        self.deferred.is_empty()
            && self.animations.is_empty()
            && self.drags.is_empty()
            && self.focus.is_none()
            && self.removals.is_empty()
            && !self.render
    }
}

/// The HUD: scene graph, dispatcher, scheduler, and frame protocol in one
/// single-threaded owner.
pub struct Hud {
    tree: ComponentTree,
    scheduler: AnimationScheduler,

    trackers: [ButtonTracker; MouseButton::SLOTS],
    drags: [Option<DragEvent>; MouseButton::SLOTS],

    picked: Option<NodeId>,
    pointer: Vec2,
    keys_held: Vec<Key>,
    modifiers: Modifiers,
    focus: Option<NodeId>,

    deferred: Vec<DeferredAction>,
    end_of_frame: Vec<DeferredAction>,

    render_requested: bool,
    needs_render: bool,
    rendered: bool,
}

impl Hud {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            tree: ComponentTree::new(viewport),
            scheduler: AnimationScheduler::new(),
            trackers: Default::default(),
            drags: Default::default(),
            picked: None,
            pointer: Vec2::zero(),
            keys_held: Vec::new(),
            modifiers: Modifiers::default(),
            focus: None,
            deferred: Vec::new(),
            end_of_frame: Vec::new(),
            render_requested: true,
            needs_render: true,
            rendered: false,
        }
    }

    // ── tree access ───────────────────────────────────────────────────────

    #[inline]
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn insert(&mut self, component: Component) -> NodeId {
        self.tree.insert(component)
    }

    /// Immediate attach; safe from application code between frames.
    pub fn add_component(&mut self, parent: NodeId, child: NodeId) -> Result<(), HudError> {
        self.request_render();
        self.tree.add_component(parent, child)
    }

    /// Deferred removal: the node is marked pending-removal now and unlinked
    /// at the end-of-frame drain, never mid-traversal. If it was hovered it
    /// receives a final `Exited` before detaching.
    pub fn save_remove_component(&mut self, node: NodeId) {
        self.queue_removal(node);
    }

    /// Adds a mouse handler to an existing node.
    pub fn add_mouse_handler<F>(&mut self, node: NodeId, handler: F) -> Result<(), HudError>
    where
        F: FnMut(&MouseEvent, &mut HudActions) -> EventResult + 'static,
    {
        match self.tree.node_mut(node) {
            Some(n) => {
                n.mouse.push(handler);
                Ok(())
            }
            None => Err(HudError::InvalidNode),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.tree.set_viewport(viewport);
        self.request_render();
    }

    // ── focus / picking ───────────────────────────────────────────────────

    #[inline]
    pub fn picked(&self) -> Option<NodeId> {
        self.picked
    }

    #[inline]
    pub fn focused(&self) -> Option<NodeId> {
        self.focus
    }

    /// Gives `node` key focus; the previous holder gets its `deselected`
    /// callback.
    pub fn select(&mut self, node: NodeId) {
        self.apply_focus(Some(node));
    }

    pub fn deselect(&mut self) {
        self.apply_focus(None);
    }

    // ── animation ─────────────────────────────────────────────────────────

    pub fn start_animation<A: ScheduledAnimation + 'static>(&mut self, anim: A) {
        self.scheduler.start(Box::new(anim));
    }

    // ── render handshake ──────────────────────────────────────────────────

    #[inline]
    pub fn request_render(&mut self) {
        self.render_requested = true;
        self.needs_render = true;
    }

    /// Whether the host loop should render this frame. False means the last
    /// frame is still valid and the window may idle.
    #[inline]
    pub fn needs_next_rendering(&self) -> bool {
        self.needs_render
    }

    #[inline]
    pub fn was_rendered(&self) -> bool {
        self.rendered
    }

    /// Emits the frame to `renderer` and acknowledges the render request.
    pub fn render(&mut self, renderer: &mut dyn HudRenderer) {
        render_tree(&self.tree, renderer);
        self.render_requested = false;
        self.needs_render = false;
        self.rendered = true;
    }

    // ── per-frame input ───────────────────────────────────────────────────

    /// Consumes this frame's input: reads the picked node from `picker`,
    /// fires enter/exit diffs, button edges, scroll and the per-frame
    /// `Action`, and snapshots held keys for `update`.
    ///
    /// The pick read reflects the last rendered frame; after a structural or
    /// layout change the result is one frame stale, and stale ids simply
    /// resolve to no node.
    pub fn input(&mut self, state: &InputState, frame: &InputFrame, picker: &dyn PickSource) {
        let mut actions = HudActions::new();

        let pointer = state.pointer_pos.map(|(x, y)| Vec2::new(x, y));
        if let Some(p) = pointer {
            self.pointer = p;
        }

        let new_pick = pointer.and_then(|p| {
            if p.x < 0.0 || p.y < 0.0 {
                return None;
            }
            self.tree.node_by_pick(picker.pick_at(p.x as u32, p.y as u32))
        });

        if new_pick != self.picked {
            self.fire_enter_exit(self.picked, new_pick, &mut actions);
            self.picked = new_pick;
        }

        for &button in &frame.buttons_pressed {
            self.trackers[button.slot()].begin(new_pick, self.pointer);
            if let Some(target) = new_pick {
                self.bubble(target, MouseEventKind::ClickStarted, Some(button), &mut actions);
            }
        }

        for &button in &frame.buttons_released {
            let slot = button.slot();
            let origin = self.trackers[slot].origin;
            let kind = self.trackers[slot].release();
            if kind == MouseEventKind::DragReleased {
                if let Some(drag) = self.drags[slot].take() {
                    drag.finish(new_pick, self.pointer, false, &mut actions);
                }
            }
            if let Some(target) = origin {
                self.bubble(target, kind, Some(button), &mut actions);
            }
        }

        if frame.scroll_x != 0.0 || frame.scroll_y != 0.0 {
            if let Some(target) = new_pick {
                let event = MouseEvent {
                    kind: MouseEventKind::Scroll,
                    button: None,
                    position: self.pointer,
                    scroll: Vec2::new(frame.scroll_x, frame.scroll_y),
                    target,
                    node: target,
                };
                self.bubble_event(event, &mut actions);
            }
        }

        if let Some(target) = new_pick {
            self.bubble(target, MouseEventKind::Action, None, &mut actions);
        }

        self.keys_held.clear();
        self.keys_held.extend(state.keys_down.iter().copied());
        self.modifiers = state.modifiers;

        self.apply_actions(actions);
    }

    // ── per-frame update ──────────────────────────────────────────────────

    /// Advances one frame: drains deferred actions, resolves press/drag
    /// transitions, steps animations, moves drag visuals, ticks key repeat,
    /// recomputes the needs-render flag, then drains end-of-frame
    /// structural actions.
    pub fn update(&mut self, dt: f32) {
        self.rendered = false;

        // (1) deferred actions from the previous frame and event callbacks
        for action in std::mem::take(&mut self.deferred) {
            action(self);
        }

        // (2a) gesture timers: long-press and drag-start transitions
        let mut actions = HudActions::new();
        for slot in 0..MouseButton::SLOTS {
            let Some(kind) = self.trackers[slot].tick(dt, self.pointer) else { continue };
            if kind == MouseEventKind::DragStarted && self.drags[slot].is_some() {
                continue; // the button's drag slot is occupied
            }
            if let Some(target) = self.trackers[slot].origin {
                self.bubble(target, kind, Some(slot_button(slot)), &mut actions);
            }
        }
        self.apply_actions(actions);

        // (2b) animations
        let mut actions = HudActions::new();
        self.scheduler.step_frame(&mut self.tree, &mut actions);
        self.apply_actions(actions);

        // (3) drag visuals follow the pointer
        for drag in self.drags.iter().flatten() {
            if let Some(visual) = drag.visual() {
                if let Err(err) = self.tree.set_offset_px(visual, self.pointer - drag.grab_offset())
                {
                    // The visual was destroyed under the drag; the drag itself
                    // stays alive and its drop handler still runs.
                    warn!("drag visual unavailable: {err}");
                }
            }
        }

        // key repeat for the focused node
        self.tick_key_focus(dt);

        // (4) power-saving handshake
        let any_drag = self.drags.iter().any(Option::is_some);
        self.needs_render = self.scheduler.is_active()
            || !self.keys_held.is_empty()
            || any_drag
            || self.render_requested;

        // (5) structural changes, at the single safe point
        for action in std::mem::take(&mut self.end_of_frame) {
            action(self);
        }
    }

    /// Cancels the active drag on `button`, if any; its drop handler runs
    /// with `cancelled` set.
    pub fn cancel_drag(&mut self, button: MouseButton) {
        let slot = button.slot();
        if let Some(drag) = self.drags[slot].take() {
            let mut actions = HudActions::new();
            drag.finish(None, self.pointer, true, &mut actions);
            self.trackers[slot].dragging = false;
            self.apply_actions(actions);
        }
    }

    // ── dispatch internals ────────────────────────────────────────────────

    fn bubble(
        &mut self,
        target: NodeId,
        kind: MouseEventKind,
        button: Option<MouseButton>,
        actions: &mut HudActions,
    ) {
        let event = MouseEvent {
            kind,
            button,
            position: self.pointer,
            scroll: Vec2::zero(),
            target,
            node: target,
        };
        self.bubble_event(event, actions);
    }

    /// Offers `event` to the target's listeners, then each ancestor's, until
    /// consumed. Listeners are swapped out of the node while they run so a
    /// handler can never alias the tree.
    fn bubble_event(&mut self, mut event: MouseEvent, actions: &mut HudActions) {
        let mut cursor = Some(event.target);
        while let Some(id) = cursor {
            event.node = id;
            if self.deliver(id, &event, actions) == EventResult::Consumed {
                return;
            }
            cursor = self.tree.node(id).and_then(|n| n.parent());
        }
    }

    /// Runs one node's listeners for `event`, no propagation.
    fn deliver(&mut self, id: NodeId, event: &MouseEvent, actions: &mut HudActions) -> EventResult {
        let Some(node) = self.tree.node_mut(id) else {
            return EventResult::Ignored;
        };
        let mut listener = std::mem::take(&mut node.mouse);
        let verdict = listener.dispatch(event, actions);
        if let Some(node) = self.tree.node_mut(id) {
            // A handler may have replaced the listener; keep any additions.
            restore_listener(&mut node.mouse, listener);
        }
        verdict
    }

    /// Fires `Exited` up the old chain and `Entered` down the new one.
    ///
    /// Ancestors shared with the new pick are flagged top-down first and do
    /// not exit; exits run deepest-first, enters root-first.
    fn fire_enter_exit(
        &mut self,
        old: Option<NodeId>,
        new: Option<NodeId>,
        actions: &mut HudActions,
    ) {
        let new_chain = self.chain_to_root(new);

        for &id in &new_chain {
            if let Some(n) = self.tree.node_mut(id) {
                n.mouse_state.still_inside = true;
            }
        }

        // Exits: walk up from the old target; common ancestors stay inside.
        for id in self.chain_to_root(old) {
            let Some(n) = self.tree.node_mut(id) else { continue };
            if n.mouse_state.still_inside || !n.mouse_state.inside {
                continue;
            }
            n.mouse_state.inside = false;
            let event = exit_enter_event(MouseEventKind::Exited, self.pointer, id);
            self.deliver(id, &event, actions);
        }

        // Enters: root-first so containers hear about the pointer before
        // their children do.
        for &id in new_chain.iter().rev() {
            let Some(n) = self.tree.node_mut(id) else { continue };
            n.mouse_state.still_inside = false;
            if n.mouse_state.inside {
                continue;
            }
            n.mouse_state.inside = true;
            let event = exit_enter_event(MouseEventKind::Entered, self.pointer, id);
            self.deliver(id, &event, actions);
        }
    }

    /// Target-to-root ancestor chain, target first.
    fn chain_to_root(&self, from: Option<NodeId>) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = from;
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.tree.node(id).and_then(|n| n.parent());
        }
        chain
    }

    // ── action application ────────────────────────────────────────────────

    fn apply_actions(&mut self, mut actions: HudActions) {
        if actions.is_empty() {
            return;
        }
        self.deferred.append(&mut actions.deferred);
        for anim in actions.animations.drain(..) {
            self.scheduler.start(anim);
        }
        for drag in actions.drags.drain(..) {
            self.install_drag(drag);
        }
        if let Some(focus) = actions.focus.take() {
            self.apply_focus(focus);
        }
        for node in actions.removals.drain(..) {
            self.queue_removal(node);
        }
        if actions.render {
            self.request_render();
        }
    }

    fn install_drag(&mut self, drag: DragEvent) {
        let slot = drag.button().slot();
        if self.drags[slot].is_some() {
            warn!("drag rejected: {}", HudError::DragSlotOccupied(drag.button()));
            let mut actions = HudActions::new();
            drag.finish(None, self.pointer, true, &mut actions);
            self.apply_actions(actions);
            return;
        }
        self.trackers[slot].dragging = true;
        self.drags[slot] = Some(drag);
    }

    fn apply_focus(&mut self, new: Option<NodeId>) {
        if self.focus == new {
            return;
        }
        let mut actions = HudActions::new();
        if let Some(old) = self.focus.take() {
            if let Some(mut listener) = self.take_key_listener(old) {
                listener.deselected(&mut actions);
                self.put_key_listener(old, listener);
            }
        }
        self.focus = new;
        if let Some(id) = new {
            if let Some(mut listener) = self.take_key_listener(id) {
                listener.reset();
                self.put_key_listener(id, listener);
            }
        }
        self.apply_actions(actions);
    }

    fn tick_key_focus(&mut self, dt: f32) {
        let Some(id) = self.focus else { return };
        let Some(mut listener) = self.take_key_listener(id) else { return };
        let mut actions = HudActions::new();
        let held = std::mem::take(&mut self.keys_held);
        listener.tick(&held, self.modifiers, dt, &mut actions);
        self.keys_held = held;
        self.put_key_listener(id, listener);
        self.apply_actions(actions);
    }

    fn take_key_listener(&mut self, id: NodeId) -> Option<KeyListener> {
        self.tree.node_mut(id).and_then(|n| n.key.take())
    }

    fn put_key_listener(&mut self, id: NodeId, listener: KeyListener) {
        if let Some(n) = self.tree.node_mut(id) {
            if n.key.is_none() {
                n.key = Some(listener);
            }
        }
    }

    // ── deferred removal ──────────────────────────────────────────────────

    fn queue_removal(&mut self, node: NodeId) {
        match self.tree.node_mut(node) {
            Some(n) if n.attached() => {
                if n.pending_removal {
                    return;
                }
                n.pending_removal = true;
            }
            Some(_) => {
                warn!("removal rejected: {}", HudError::NotAttached);
                return;
            }
            None => {
                warn!("removal rejected: {}", HudError::InvalidNode);
                return;
            }
        }
        self.end_of_frame.push(Box::new(move |hud| hud.apply_removal(node)));
    }

    fn apply_removal(&mut self, node: NodeId) {
        if !self.tree.node(node).is_some_and(|n| n.attached()) {
            return;
        }
        let subtree = self.tree.collect_subtree(node);

        // Final exits for anything hovered inside the doomed subtree.
        let mut actions = HudActions::new();
        for &id in &subtree {
            let Some(n) = self.tree.node_mut(id) else { continue };
            if !n.mouse_state.inside {
                continue;
            }
            n.mouse_state.inside = false;
            let event = exit_enter_event(MouseEventKind::Exited, self.pointer, id);
            self.deliver(id, &event, &mut actions);
        }

        if self.picked.is_some_and(|p| subtree.contains(&p)) {
            self.picked = None;
        }
        if self.focus.is_some_and(|f| subtree.contains(&f)) {
            self.apply_focus(None);
        }
        for tracker in &mut self.trackers {
            if tracker.origin.is_some_and(|o| subtree.contains(&o)) {
                tracker.origin = None;
            }
        }
        // Active drags keep their (now detached) source; the drop handler
        // still runs and must tolerate it.

        if let Err(err) = self.tree.detach(node) {
            warn!("deferred removal failed: {err}");
        }
        self.request_render();
        self.apply_actions(actions);
    }
}

#[inline]
fn exit_enter_event(kind: MouseEventKind, pointer: Vec2, id: NodeId) -> MouseEvent {
    MouseEvent { kind, button: None, position: pointer, scroll: Vec2::zero(), target: id, node: id }
}

/// Keeps handlers a callback registered on its own node while its listener
/// was checked out for dispatch.
fn restore_listener(slot: &mut MouseListener, mut original: MouseListener) {
    std::mem::swap(slot, &mut original);
    // `original` now holds handlers added during dispatch, if any.
    slot.absorb(original);
}

fn slot_button(slot: usize) -> MouseButton {
    match slot {
        0 => MouseButton::Left,
        1 => MouseButton::Right,
        2 => MouseButton::Middle,
        3 => MouseButton::Back,
        4 => MouseButton::Forward,
        other => MouseButton::Other((other - 5) as u16),
    }
}
