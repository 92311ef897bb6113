use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
};

/// Pixel-delta scrolls convert to lines at this many pixels per line, so the
/// HUD sees a single scroll unit regardless of input device.
const PIXELS_PER_LINE: f32 = 20.0;

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels. `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and
    /// writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss the platform stops reporting releases, so
                    // synthesize them: everything held drains into the frame's
                    // released sets. Consumers see an ordinary release frame
                    // and can resolve in-flight gestures instead of leaving
                    // them stuck mid-press.
                    frame.keys_released.extend(self.keys_down.drain());
                    frame.buttons_released.extend(self.buttons_down.drain());
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                let (dx, dy) = match delta {
                    MouseWheelDelta::Line { x, y } => (*x, *y),
                    MouseWheelDelta::Pixel { x, y } => (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE),
                };
                frame.scroll_x += dx;
                frame.scroll_y += dy;
            }

            InputEvent::Text(TextEvent { text: _ }) => {
                // No persistent state update; text is a per-frame stream.
            }
        }

        if let InputEvent::Text(t) = &ev {
            frame.text.push(t.clone());
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }

    fn release(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Released,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }

    // ── key transitions ───────────────────────────────────────────────────

    #[test]
    fn key_press_records_transition_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::A));
        state.apply_event(&mut frame, press(Key::A)); // OS repeat

        assert!(state.key_down(Key::A));
        assert_eq!(frame.keys_pressed.len(), 1);
    }

    #[test]
    fn key_release_clears_down_state() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::A));
        state.apply_event(&mut frame, release(Key::A));

        assert!(!state.key_down(Key::A));
        assert!(frame.keys_released.contains(&Key::A));
    }

    // ── buttons ───────────────────────────────────────────────────────────

    #[test]
    fn button_press_updates_pointer_and_down_set() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 3.0,
            y: 4.0,
            modifiers: Modifiers::default(),
        }));

        assert!(state.button_down(MouseButton::Left));
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));
        assert!(frame.buttons_pressed.contains(&MouseButton::Left));
    }

    // ── focus loss ────────────────────────────────────────────────────────

    #[test]
    fn focus_loss_clears_held_sets_and_records_releases() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::W));
        state.apply_event(&mut frame, InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 1.0,
            y: 1.0,
            modifiers: Modifiers::default(),
        }));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(state.keys_down.is_empty());
        assert!(state.buttons_down.is_empty());
        // The frame carries the synthesized transitions.
        assert!(frame.keys_released.contains(&Key::W));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
    }

    // ── scroll accumulation ───────────────────────────────────────────────

    #[test]
    fn scroll_accumulates_lines_and_pixels() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        });
        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 40.0, y: 20.0 },
            modifiers: Modifiers::default(),
        });

        assert_eq!(frame.scroll_x, 2.0);
        assert_eq!(frame.scroll_y, 2.0);
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        state.apply_event(&mut frame, InputEvent::PointerLeft);

        assert_eq!(state.pointer_pos, None);
    }
}
