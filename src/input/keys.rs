//! Physical key identifiers

use std::fmt;

use winit::keyboard::{KeyCode as WinitKey, NativeKeyCode, PhysicalKey};

use super::modifiers::ModifierSet;

/// Raw, device-specific key identifier.
///
/// Forwarded to listeners unchanged; the dispatcher never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ScanCode(pub u32);

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Layout-independent identifier for a physical key
///
/// winit keys without a variant of their own are carried as [`KeyCode::Other`],
/// and keys winit could not identify as [`KeyCode::Native`]. Both keep the
/// backend's own code, so distinct unknown keys keep distinct state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Common keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Navigation
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Punctuation
    Backquote,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,
    CapsLock,
    NumLock,

    /// winit key code without a named variant here (numpad, F13-F24, media)
    Other(WinitKey),
    /// Key winit could not identify, tagged with its platform
    Native(NativeKeyCode),
}

impl KeyCode {
    /// Every named key, in declaration order
    pub const KNOWN: &'static [KeyCode] = &[
        Self::Space,
        Self::Enter,
        Self::Escape,
        Self::Backspace,
        Self::Tab,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::V,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Num0,
        Self::Num1,
        Self::Num2,
        Self::Num3,
        Self::Num4,
        Self::Num5,
        Self::Num6,
        Self::Num7,
        Self::Num8,
        Self::Num9,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::F9,
        Self::F10,
        Self::F11,
        Self::F12,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Insert,
        Self::Delete,
        Self::Home,
        Self::End,
        Self::PageUp,
        Self::PageDown,
        Self::Backquote,
        Self::Minus,
        Self::Equal,
        Self::BracketLeft,
        Self::BracketRight,
        Self::Backslash,
        Self::Semicolon,
        Self::Quote,
        Self::Comma,
        Self::Period,
        Self::Slash,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::ControlLeft,
        Self::ControlRight,
        Self::AltLeft,
        Self::AltRight,
        Self::SuperLeft,
        Self::SuperRight,
        Self::CapsLock,
        Self::NumLock,
    ];

    /// Modifier bit held while this key is down, if it is a held modifier
    ///
    /// Lock keys return `None`: their bits toggle on press rather than
    /// following the physical key state.
    pub fn held_modifier(self) -> Option<ModifierSet> {
        match self {
            Self::ShiftLeft | Self::ShiftRight => Some(ModifierSet::SHIFT),
            Self::ControlLeft | Self::ControlRight => Some(ModifierSet::CONTROL),
            Self::AltLeft | Self::AltRight => Some(ModifierSet::ALT),
            Self::SuperLeft | Self::SuperRight => Some(ModifierSet::SUPER),
            _ => None,
        }
    }

    /// Lock bit toggled by pressing this key, if any
    pub fn lock_modifier(self) -> Option<ModifierSet> {
        match self {
            Self::CapsLock => Some(ModifierSet::CAPS_LOCK),
            Self::NumLock => Some(ModifierSet::NUM_LOCK),
            _ => None,
        }
    }

    /// Returns true for keys that carry a modifier bit
    pub fn is_modifier(self) -> bool {
        self.held_modifier().is_some() || self.lock_modifier().is_some()
    }

    /// Returns true if this key has a named variant
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Other(_) | Self::Native(_))
    }

    /// Maps a winit key code onto a named key
    ///
    /// Returns `None` for codes without a named variant.
    pub fn from_winit(key: WinitKey) -> Option<Self> {
        use WinitKey as WK;
        let key = match key {
            WK::Space => Self::Space,
            WK::Enter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            WK::Insert => Self::Insert,
            WK::Delete => Self::Delete,
            WK::Home => Self::Home,
            WK::End => Self::End,
            WK::PageUp => Self::PageUp,
            WK::PageDown => Self::PageDown,

            WK::Backquote => Self::Backquote,
            WK::Minus => Self::Minus,
            WK::Equal => Self::Equal,
            WK::BracketLeft => Self::BracketLeft,
            WK::BracketRight => Self::BracketRight,
            WK::Backslash => Self::Backslash,
            WK::Semicolon => Self::Semicolon,
            WK::Quote => Self::Quote,
            WK::Comma => Self::Comma,
            WK::Period => Self::Period,
            WK::Slash => Self::Slash,

            WK::ShiftLeft => Self::ShiftLeft,
            WK::ShiftRight => Self::ShiftRight,
            WK::ControlLeft => Self::ControlLeft,
            WK::ControlRight => Self::ControlRight,
            WK::AltLeft => Self::AltLeft,
            WK::AltRight => Self::AltRight,
            WK::SuperLeft => Self::SuperLeft,
            WK::SuperRight => Self::SuperRight,
            WK::CapsLock => Self::CapsLock,
            WK::NumLock => Self::NumLock,

            _ => return None,
        };
        Some(key)
    }
}

impl From<WinitKey> for KeyCode {
    fn from(key: WinitKey) -> Self {
        Self::from_winit(key).unwrap_or(Self::Other(key))
    }
}

impl From<NativeKeyCode> for KeyCode {
    fn from(native: NativeKeyCode) -> Self {
        Self::Native(native)
    }
}

impl From<PhysicalKey> for KeyCode {
    fn from(physical: PhysicalKey) -> Self {
        match physical {
            PhysicalKey::Code(code) => Self::from(code),
            PhysicalKey::Unidentified(native) => Self::from(native),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for key in KeyCode::KNOWN {
            assert!(seen.insert(*key), "duplicate key {:?}", key);
            assert!(key.is_known());
        }
    }

    #[test]
    fn test_modifier_bits() {
        assert_eq!(KeyCode::ShiftRight.held_modifier(), Some(ModifierSet::SHIFT));
        assert_eq!(KeyCode::SuperLeft.held_modifier(), Some(ModifierSet::SUPER));
        assert_eq!(KeyCode::CapsLock.held_modifier(), None);
        assert_eq!(KeyCode::CapsLock.lock_modifier(), Some(ModifierSet::CAPS_LOCK));
        assert!(KeyCode::NumLock.is_modifier());
        assert!(!KeyCode::A.is_modifier());
    }

    #[test]
    fn test_from_winit_named_and_unnamed() {
        assert_eq!(KeyCode::from_winit(WinitKey::KeyA), Some(KeyCode::A));
        assert_eq!(KeyCode::from_winit(WinitKey::ArrowUp), Some(KeyCode::Up));
        assert_eq!(
            KeyCode::from_winit(WinitKey::ControlRight),
            Some(KeyCode::ControlRight)
        );
        assert_eq!(KeyCode::from_winit(WinitKey::F24), None);
    }

    #[test]
    fn test_native_codes_stay_distinct() {
        let a = KeyCode::from(NativeKeyCode::Xkb(0x1008ff13));
        let b = KeyCode::from(NativeKeyCode::Xkb(0x1008ff11));
        assert_ne!(a, b);
        assert!(!a.is_known());
    }

    #[test]
    fn test_unnamed_winit_keys_keep_their_code() {
        let one = KeyCode::from(WinitKey::Numpad1);
        let two = KeyCode::from(WinitKey::Numpad2);
        assert_eq!(one, KeyCode::Other(WinitKey::Numpad1));
        assert_ne!(one, two);
        assert!(!one.is_known());
        assert_eq!(KeyCode::from(WinitKey::KeyA), KeyCode::A);
    }

    #[test]
    fn test_native_code_never_equals_winit_code() {
        let f13 = KeyCode::from(PhysicalKey::Code(WinitKey::F13));
        let windows = KeyCode::from(PhysicalKey::Unidentified(NativeKeyCode::Windows(0x64)));
        assert_ne!(f13, windows);
        assert_ne!(
            KeyCode::from(NativeKeyCode::Windows(0x64)),
            KeyCode::from(NativeKeyCode::MacOS(0x64))
        );
    }
}
