use std::fmt;

/// Keyboard key identifier.
///
/// The platform layer maps scancodes/keycodes into these variants where
/// possible; anything unsupported becomes `Key::Unknown(u32)` with a stable
/// platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys (useful for focus/navigation policies)
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl Key {
    /// Text equivalent for character input, if the key produces one.
    ///
    /// `shift` selects the upper-case / shifted variant. This is a fallback
    /// for hosts without IME commit events; committed [`TextEvent`]s take
    /// precedence when both are available.
    pub fn text_equivalent(self, shift: bool) -> Option<char> {
        use Key::*;
        let c = match self {
            Space => ' ',
            A => 'a', B => 'b', C => 'c', D => 'd', E => 'e', F => 'f',
            G => 'g', H => 'h', I => 'i', J => 'j', K => 'k', L => 'l',
            M => 'm', N => 'n', O => 'o', P => 'p', Q => 'q', R => 'r',
            S => 's', T => 't', U => 'u', V => 'v', W => 'w', X => 'x',
            Y => 'y', Z => 'z',
            Digit0 => '0', Digit1 => '1', Digit2 => '2', Digit3 => '3',
            Digit4 => '4', Digit5 => '5', Digit6 => '6', Digit7 => '7',
            Digit8 => '8', Digit9 => '9',
            _ => return None,
        };
        Some(if shift { c.to_ascii_uppercase() } else { c })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Number of per-button tracking slots carried by downstream state.
    pub const SLOTS: usize = 8;

    /// Stable slot index in `0..SLOTS`.
    ///
    /// `Other` buttons fold into the remaining three slots; collisions are
    /// acceptable there since such buttons are rare and never concurrent in
    /// practice.
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(v) => 5 + (v as usize % 3),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event.
///
/// Coordinates are included so event processing does not depend on an
/// external "current pointer position".
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Text input event (committed text, not IME composition).
#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    pub text: String,
}

/// Platform-agnostic input events emitted by the host loop.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Stable platform code when available (e.g. scancode).
        code: u32,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    Text(TextEvent),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
