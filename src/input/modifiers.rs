//! Keyboard modifier state

use bitflags::bitflags;
use winit::keyboard::ModifiersState;

bitflags! {
    /// Modifier keys held (or lock states active) at the instant of an event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierSet: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        /// Super / Meta / Command / Windows key
        const SUPER = 1 << 3;
        const CAPS_LOCK = 1 << 4;
        const NUM_LOCK = 1 << 5;
    }
}

impl ModifierSet {
    /// Bits that follow physically held keys
    pub const HELD: Self = Self::SHIFT
        .union(Self::CONTROL)
        .union(Self::ALT)
        .union(Self::SUPER);

    /// Bits that toggle on key press
    ///
    /// Inferred from observed presses; see `WinitKeyboardAdapter::modifiers`.
    pub const LOCKS: Self = Self::CAPS_LOCK.union(Self::NUM_LOCK);

    pub fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn control(self) -> bool {
        self.contains(Self::CONTROL)
    }

    pub fn alt(self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn super_key(self) -> bool {
        self.contains(Self::SUPER)
    }

    /// Replaces the held bits, keeping the lock bits
    pub fn with_held(self, held: ModifierSet) -> Self {
        (self & Self::LOCKS) | (held & Self::HELD)
    }
}

/// winit reports held modifiers only; lock bits are left clear
impl From<ModifiersState> for ModifierSet {
    fn from(state: ModifiersState) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::SHIFT, state.shift_key());
        mods.set(Self::CONTROL, state.control_key());
        mods.set(Self::ALT, state.alt_key());
        mods.set(Self::SUPER, state.super_key());
        mods
    }
}
