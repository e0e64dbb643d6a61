//! X11 keysym translation tables.
//!
//! Keysym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! Three rules cover the whole space:
//!
//! - Printable Latin-1 characters (0x20–0x7E and 0xA0–0xFF) use their
//!   codepoint as the keysym (`XK_a` = 0x0061 = 'a').
//! - Other Unicode characters use `0x01000000 + codepoint`, per the keysym
//!   extension for Unicode.
//! - Non-printing keys have dedicated keysyms in the 0xFFxx function-key
//!   range.

use super::NamedKey;

/// Keysym for a character-producing key.
///
/// ASCII control characters that have a function-key equivalent (Enter, Tab,
/// Backspace, Escape, Delete) translate to it; other control characters have
/// no keysym and yield 0.
pub fn char_keysym(c: char) -> u32 {
    let code = c as u32;
    match code {
        // Printable Latin-1 maps directly.
        0x20..=0x7E | 0xA0..=0xFF => code,
        // Control characters with editing-key equivalents.
        0x08 => 0xFF08,        // XK_BackSpace
        0x09 => 0xFF09,        // XK_Tab
        0x0A | 0x0D => 0xFF0D, // XK_Return
        0x1B => 0xFF1B,        // XK_Escape
        0x7F => 0xFFFF,        // XK_Delete
        // Remaining control range has no keysym.
        0x00..=0x1F | 0x80..=0x9F => 0,
        // Unicode rule for everything else.
        _ => 0x0100_0000 + code,
    }
}

/// Keysym for a non-printing key.
pub fn named_keysym(key: NamedKey) -> u32 {
    match key {
        NamedKey::Escape => 0xFF1B,       // XK_Escape
        NamedKey::Tab => 0xFF09,          // XK_Tab
        NamedKey::Backspace => 0xFF08,    // XK_BackSpace
        NamedKey::Return => 0xFF0D,       // XK_Return
        NamedKey::Insert => 0xFF63,       // XK_Insert
        NamedKey::Delete => 0xFFFF,       // XK_Delete
        NamedKey::Home => 0xFF50,         // XK_Home
        NamedKey::End => 0xFF57,          // XK_End
        NamedKey::PageUp => 0xFF55,       // XK_Page_Up
        NamedKey::PageDown => 0xFF56,     // XK_Page_Down
        NamedKey::Left => 0xFF51,         // XK_Left
        NamedKey::Up => 0xFF52,           // XK_Up
        NamedKey::Right => 0xFF53,        // XK_Right
        NamedKey::Down => 0xFF54,         // XK_Down
        NamedKey::F1 => 0xFFBE,           // XK_F1
        NamedKey::F2 => 0xFFBF,           // XK_F2
        NamedKey::F3 => 0xFFC0,           // XK_F3
        NamedKey::F4 => 0xFFC1,           // XK_F4
        NamedKey::F5 => 0xFFC2,           // XK_F5
        NamedKey::F6 => 0xFFC3,           // XK_F6
        NamedKey::F7 => 0xFFC4,           // XK_F7
        NamedKey::F8 => 0xFFC5,           // XK_F8
        NamedKey::F9 => 0xFFC6,           // XK_F9
        NamedKey::F10 => 0xFFC7,          // XK_F10
        NamedKey::F11 => 0xFFC8,          // XK_F11
        NamedKey::F12 => 0xFFC9,          // XK_F12
        NamedKey::ShiftLeft => 0xFFE1,    // XK_Shift_L
        NamedKey::ShiftRight => 0xFFE2,   // XK_Shift_R
        NamedKey::ControlLeft => 0xFFE3,  // XK_Control_L
        NamedKey::ControlRight => 0xFFE4, // XK_Control_R
        NamedKey::AltLeft => 0xFFE9,      // XK_Alt_L
        NamedKey::AltRight => 0xFFEA,     // XK_Alt_R
        NamedKey::SuperLeft => 0xFFEB,    // XK_Super_L
        NamedKey::SuperRight => 0xFFEC,   // XK_Super_R
        NamedKey::CapsLock => 0xFFE5,     // XK_Caps_Lock
        NamedKey::NumLock => 0xFF7F,      // XK_Num_Lock
        NamedKey::ScrollLock => 0xFF14,   // XK_Scroll_Lock
        NamedKey::Print => 0xFF61,        // XK_Print
        NamedKey::Pause => 0xFF13,        // XK_Pause
        NamedKey::Menu => 0xFF67,         // XK_Menu
        NamedKey::KeypadEnter => 0xFF8D,  // XK_KP_Enter
    }
}
