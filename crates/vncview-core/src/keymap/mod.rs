//! Local key to X11 keysym translation.
//!
//! The RFB protocol identifies keys with X11 keysyms, independent of the
//! local keyboard layout or UI toolkit.  The presentation adapter converts
//! its toolkit's key events into a [`LocalKey`] (either the produced
//! character or a named non-printing key) and this module maps that onto the
//! keysym carried in the protocol key event.

pub mod x11;

/// A toolkit-independent local key representation.
///
/// Printable keys are identified by the character they produce (so the
/// mapping respects the user's layout); non-printing keys by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalKey {
    /// A key that produced text.
    Char(char),
    /// A non-printing key.
    Named(NamedKey),
}

/// Non-printing keys with dedicated keysyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Tab,
    Backspace,
    Return,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Up,
    Right,
    Down,
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
    ScrollLock,
    Print,
    Pause,
    Menu,
    KeypadEnter,
}

/// Translates a [`LocalKey`] to the X11 keysym sent in protocol key events.
///
/// Returns 0 for keys that have no keysym (unmapped control characters);
/// callers should not send an event for those.
pub fn to_keysym(key: LocalKey) -> u32 {
    match key {
        LocalKey::Named(named) => x11::named_keysym(named),
        LocalKey::Char(c) => x11::char_keysym(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_letters_map_to_their_codepoint() {
        assert_eq!(to_keysym(LocalKey::Char('a')), 0x0061);
        assert_eq!(to_keysym(LocalKey::Char('Z')), 0x005A);
        assert_eq!(to_keysym(LocalKey::Char('5')), 0x0035);
        assert_eq!(to_keysym(LocalKey::Char(' ')), 0x0020);
    }

    #[test]
    fn test_latin1_characters_map_directly() {
        assert_eq!(to_keysym(LocalKey::Char('é')), 0x00E9);
        assert_eq!(to_keysym(LocalKey::Char('ß')), 0x00DF);
    }

    #[test]
    fn test_unicode_characters_use_the_offset_rule() {
        // X11 maps Unicode codepoints >= 0x100 to 0x01000000 + codepoint.
        assert_eq!(to_keysym(LocalKey::Char('€')), 0x0100_0000 + 0x20AC);
        assert_eq!(to_keysym(LocalKey::Char('я')), 0x0100_0000 + 0x044F);
    }

    #[test]
    fn test_control_characters_map_to_editing_keysyms() {
        assert_eq!(to_keysym(LocalKey::Char('\r')), 0xFF0D);
        assert_eq!(to_keysym(LocalKey::Char('\n')), 0xFF0D);
        assert_eq!(to_keysym(LocalKey::Char('\t')), 0xFF09);
        assert_eq!(to_keysym(LocalKey::Char('\u{8}')), 0xFF08);
        assert_eq!(to_keysym(LocalKey::Char('\u{1b}')), 0xFF1B);
        assert_eq!(to_keysym(LocalKey::Char('\u{7f}')), 0xFFFF);
    }

    #[test]
    fn test_unmapped_control_characters_yield_zero() {
        assert_eq!(to_keysym(LocalKey::Char('\u{1}')), 0);
        assert_eq!(to_keysym(LocalKey::Char('\u{90}')), 0);
    }

    #[test]
    fn test_named_keys_map_to_function_keysyms() {
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::Return)), 0xFF0D);
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::Escape)), 0xFF1B);
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::F1)), 0xFFBE);
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::F12)), 0xFFC9);
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::Left)), 0xFF51);
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::ShiftLeft)), 0xFFE1);
        assert_eq!(to_keysym(LocalKey::Named(NamedKey::KeypadEnter)), 0xFF8D);
    }
}
