use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent, TextEvent,
};

/// Translates a winit `WindowEvent` into a nimbus [`InputEvent`].
///
/// `scale_factor` converts physical positions to logical pixels; pass the
/// window's current value (it changes on monitor moves, so read it per
/// event batch rather than caching it at startup). winit 0.30 exposes no
/// modifier or cursor queries on the window, so button and wheel events
/// borrow those from the tracked `state`.
///
/// Returns `None` for events the input subsystem has no interest in.
pub fn translate_window_event(
    scale_factor: f64,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let event = match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let (key, code) = match event.physical_key {
                PhysicalKey::Code(code) => (map_keycode(code), code as u32),
                // No stable numeric identity for unidentified native codes.
                PhysicalKey::Unidentified(_) => (Key::Unknown(0), 0),
            };
            InputEvent::Key {
                key,
                state: match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                },
                modifiers: state.modifiers,
                code,
                repeat: event.repeat,
            }
        }

        WindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => {
            InputEvent::Text(TextEvent { text: text.clone() })
        }

        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f64>(scale_factor);
            InputEvent::PointerMoved(PointerMoveEvent {
                x: logical.x as f32,
                y: logical.y as f32,
            })
        }

        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,

        WindowEvent::MouseInput { state: element_state, button, .. } => {
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));
            InputEvent::PointerButton(PointerButtonEvent {
                button: map_button(*button),
                state: match element_state {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                },
                x,
                y,
                modifiers: state.modifiers,
            })
        }

        WindowEvent::MouseWheel { delta, .. } => InputEvent::MouseWheel {
            delta: match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(pos) => {
                    let logical = pos.to_logical::<f64>(scale_factor);
                    MouseWheelDelta::Pixel { x: logical.x as f32, y: logical.y as f32 }
                }
            },
            modifiers: state.modifiers,
        },

        WindowEvent::ModifiersChanged(m) => InputEvent::ModifiersChanged(map_modifiers(m.state())),

        WindowEvent::Focused(f) => InputEvent::Focused(*f),

        _ => return None,
    };
    Some(event)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_button(b: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as W;
    match b {
        W::Left => MouseButton::Left,
        W::Right => MouseButton::Right,
        W::Middle => MouseButton::Middle,
        W::Back => MouseButton::Back,
        W::Forward => MouseButton::Forward,
        W::Other(v) => MouseButton::Other(v),
    }
}

fn map_keycode(code: KeyCode) -> Key {
    use KeyCode as C;
    use Key as K;
    match code {
        // Editing and navigation.
        C::Escape => K::Escape,
        C::Enter => K::Enter,
        C::Tab => K::Tab,
        C::Backspace => K::Backspace,
        C::Space => K::Space,
        C::Insert => K::Insert,
        C::Delete => K::Delete,
        C::Home => K::Home,
        C::End => K::End,
        C::PageUp => K::PageUp,
        C::PageDown => K::PageDown,
        C::ArrowUp => K::ArrowUp,
        C::ArrowDown => K::ArrowDown,
        C::ArrowLeft => K::ArrowLeft,
        C::ArrowRight => K::ArrowRight,

        // Left/right modifier pairs collapse to one logical key.
        C::ShiftLeft | C::ShiftRight => K::Shift,
        C::ControlLeft | C::ControlRight => K::Control,
        C::AltLeft | C::AltRight => K::Alt,
        C::SuperLeft | C::SuperRight => K::Meta,

        // Writing system rows.
        C::KeyA => K::A, C::KeyB => K::B, C::KeyC => K::C, C::KeyD => K::D,
        C::KeyE => K::E, C::KeyF => K::F, C::KeyG => K::G, C::KeyH => K::H,
        C::KeyI => K::I, C::KeyJ => K::J, C::KeyK => K::K, C::KeyL => K::L,
        C::KeyM => K::M, C::KeyN => K::N, C::KeyO => K::O, C::KeyP => K::P,
        C::KeyQ => K::Q, C::KeyR => K::R, C::KeyS => K::S, C::KeyT => K::T,
        C::KeyU => K::U, C::KeyV => K::V, C::KeyW => K::W, C::KeyX => K::X,
        C::KeyY => K::Y, C::KeyZ => K::Z,
        C::Digit0 => K::Digit0, C::Digit1 => K::Digit1, C::Digit2 => K::Digit2,
        C::Digit3 => K::Digit3, C::Digit4 => K::Digit4, C::Digit5 => K::Digit5,
        C::Digit6 => K::Digit6, C::Digit7 => K::Digit7, C::Digit8 => K::Digit8,
        C::Digit9 => K::Digit9,

        // Function row.
        C::F1 => K::F1, C::F2 => K::F2, C::F3 => K::F3, C::F4 => K::F4,
        C::F5 => K::F5, C::F6 => K::F6, C::F7 => K::F7, C::F8 => K::F8,
        C::F9 => K::F9, C::F10 => K::F10, C::F11 => K::F11, C::F12 => K::F12,

        other => K::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_pairs_collapse_to_logical_keys() {
        assert_eq!(map_keycode(KeyCode::ShiftLeft), Key::Shift);
        assert_eq!(map_keycode(KeyCode::ShiftRight), Key::Shift);
        assert_eq!(map_keycode(KeyCode::SuperLeft), Key::Meta);
    }

    #[test]
    fn unmapped_keycodes_keep_their_numeric_identity() {
        let key = map_keycode(KeyCode::NumpadAdd);
        assert_eq!(key, Key::Unknown(KeyCode::NumpadAdd as u32));
    }

    #[test]
    fn modifier_state_translates_per_flag() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert!(m.shift && m.meta);
        assert!(!m.ctrl && !m.alt);
    }

    #[test]
    fn extra_buttons_pass_through() {
        assert_eq!(map_button(winit::event::MouseButton::Back), MouseButton::Back);
        assert_eq!(map_button(winit::event::MouseButton::Other(7)), MouseButton::Other(7));
    }
}
