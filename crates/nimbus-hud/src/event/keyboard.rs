use nimbus_core::input::{Key, Modifiers};

use crate::hud::HudActions;

/// Auto-repeat cadence for held keys, in seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyRepeatConfig {
    /// Delay between the first fire and the first repeat.
    pub initial_delay: f32,
    /// Delay between subsequent repeats.
    pub interval: f32,
}

impl Default for KeyRepeatConfig {
    fn default() -> Self {
        Self { initial_delay: 0.4, interval: 0.05 }
    }
}

/// Tolerance when deciding a repeat timer is due, covering accumulated
/// rounding from per-frame dt subtraction.
const TIMER_SLOP: f32 = 1e-4;

/// One key fire delivered to the focused node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyInput {
    pub key: Key,
    /// Printable equivalent under the current modifiers, for text entry.
    pub text: Option<char>,
    pub modifiers: Modifiers,
    /// False on auto-repeat fires.
    pub first: bool,
}

type KeyHandler = Box<dyn FnMut(&KeyInput, &mut HudActions)>;
type DeselectHandler = Box<dyn FnMut(&mut HudActions)>;

/// Key handling for one node.
///
/// Only the node holding input focus (set through
/// [`HudActions::focus`](crate::hud::HudActions::focus)) is ticked. Held
/// keys fire once immediately, then auto-repeat on the configured cadence
/// instead of re-triggering every frame.
pub struct KeyListener {
    handler: KeyHandler,
    on_deselected: Option<DeselectHandler>,
    repeat: KeyRepeatConfig,
    /// Seconds until each held key fires again.
    timers: Vec<(Key, f32)>,
}

impl KeyListener {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&KeyInput, &mut HudActions) + 'static,
    {
        Self {
            handler: Box::new(handler),
            on_deselected: None,
            repeat: KeyRepeatConfig::default(),
            timers: Vec::new(),
        }
    }

    pub fn with_repeat(mut self, repeat: KeyRepeatConfig) -> Self {
        self.repeat = repeat;
        self
    }

    /// Called once when this node loses input focus.
    pub fn on_deselected<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut HudActions) + 'static,
    {
        self.on_deselected = Some(Box::new(handler));
        self
    }

    /// Forgets held-key timers; called when the node gains focus so stale
    /// repeat state from a previous focus stint cannot leak in.
    pub(crate) fn reset(&mut self) {
        self.timers.clear();
    }

    pub(crate) fn deselected(&mut self, actions: &mut HudActions) {
        if let Some(handler) = &mut self.on_deselected {
            handler(actions);
        }
    }

    /// Advances repeat timers for the currently-held keys and fires the
    /// handler for each key that is due this frame.
    pub(crate) fn tick(
        &mut self,
        held: &[Key],
        modifiers: Modifiers,
        dt: f32,
        actions: &mut HudActions,
    ) {
        self.timers.retain(|(key, _)| held.contains(key));

        for &key in held {
            let (fire, first) = match self.timers.iter_mut().find(|(k, _)| *k == key) {
                None => {
                    self.timers.push((key, self.repeat.initial_delay));
                    (true, true)
                }
                Some((_, timer)) => {
                    *timer -= dt;
                    // Float slop: summing frame dts toward the delay leaves a
                    // tiny positive residue that must still count as due.
                    if *timer <= TIMER_SLOP {
                        // Carry the overshoot into the next interval so the
                        // cadence does not drift, but never owe more than one
                        // whole interval.
                        *timer = (*timer + self.repeat.interval).max(0.0);
                        (true, false)
                    } else {
                        (false, false)
                    }
                }
            };
            if fire {
                let input =
                    KeyInput { key, text: key.text_equivalent(modifiers.shift), modifiers, first };
                (self.handler)(&input, actions);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn counting_listener(repeat: KeyRepeatConfig) -> (KeyListener, Rc<RefCell<Vec<KeyInput>>>) {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let listener =
            KeyListener::new(move |input, _| sink.borrow_mut().push(*input)).with_repeat(repeat);
        (listener, fired)
    }

    #[test]
    fn held_key_fires_then_repeats_on_cadence() {
        let repeat = KeyRepeatConfig { initial_delay: 0.4, interval: 0.05 };
        let (mut listener, fired) = counting_listener(repeat);
        let mut actions = HudActions::new();
        let held = [Key::A];

        // Immediate fire on the first held frame.
        listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        assert_eq!(fired.borrow().len(), 1);
        assert!(fired.borrow()[0].first);

        // Silent until the initial delay elapses (3 × 0.1 < 0.4).
        for _ in 0..3 {
            listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        }
        assert_eq!(fired.borrow().len(), 1);

        // Delay crossed: repeat fires, then every frame at this dt.
        listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        assert_eq!(fired.borrow().len(), 2);
        assert!(!fired.borrow()[1].first);
        listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        assert_eq!(fired.borrow().len(), 3);
    }

    #[test]
    fn repeat_cadence_does_not_drift_at_matching_dt() {
        // dt equal to the interval: once repeating, every tick fires, and
        // rounding residue from the dt sum must not push fires a frame late.
        let repeat = KeyRepeatConfig { initial_delay: 0.3, interval: 0.1 };
        let (mut listener, fired) = counting_listener(repeat);
        let mut actions = HudActions::new();
        let held = [Key::A];

        listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        for _ in 0..3 {
            listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        }
        // First repeat lands exactly when the delay elapses.
        assert_eq!(fired.borrow().len(), 2);
        for _ in 0..4 {
            listener.tick(&held, Modifiers::default(), 0.1, &mut actions);
        }
        assert_eq!(fired.borrow().len(), 6);
    }

    #[test]
    fn releasing_and_repressing_restarts_the_delay() {
        let repeat = KeyRepeatConfig { initial_delay: 0.4, interval: 0.05 };
        let (mut listener, fired) = counting_listener(repeat);
        let mut actions = HudActions::new();

        listener.tick(&[Key::A], Modifiers::default(), 0.1, &mut actions);
        listener.tick(&[], Modifiers::default(), 0.1, &mut actions);
        listener.tick(&[Key::A], Modifiers::default(), 0.1, &mut actions);

        let fired = fired.borrow();
        assert_eq!(fired.len(), 2);
        assert!(fired[1].first);
    }

    #[test]
    fn text_equivalent_tracks_shift() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let mut listener = KeyListener::new(move |input, _| sink.borrow_mut().push(input.text));
        let mut actions = HudActions::new();

        listener.tick(&[Key::A], Modifiers::default(), 0.1, &mut actions);
        listener.reset();
        listener.tick(
            &[Key::A],
            Modifiers { shift: true, ..Modifiers::default() },
            0.1,
            &mut actions,
        );
        assert_eq!(*fired.borrow(), vec![Some('a'), Some('A')]);
    }
}
