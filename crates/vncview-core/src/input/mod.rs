//! Protocol-space input events and the pointer button-mask state machine.
//!
//! # How RFB pointer input works (for beginners)
//!
//! The RFB protocol does not have separate "press", "release", and "move"
//! messages.  Every pointer event carries the cursor position *and* a bitmask
//! of all currently pressed buttons:
//!
//! | Mask bit | RFB button | Meaning      |
//! |----------|------------|--------------|
//! | 0        | 1          | Left         |
//! | 1        | 2          | Middle       |
//! | 2        | 3          | Right        |
//! | 3        | 4          | Wheel up     |
//! | 4        | 5          | Wheel down   |
//! | 5        | 6          | Wheel left   |
//! | 6        | 7          | Wheel right  |
//! | 7        | 8          | Extra/back   |
//!
//! A press is "the bit turned on", a release is "the bit turned off", and a
//! drag is "moves with the bit still on".  The viewer therefore has to
//! *accumulate* mask state across discrete local events: the mask persists
//! across move events and changes only on explicit press/release.  Wheel
//! rotation is expressed as a momentary press-then-release of buttons 4–7.
//!
//! [`InputEncoder`] holds no state itself.  It provides the pure transition
//! and translation functions; the session owns the mask and resets it to
//! empty at teardown.

use serde::{Deserialize, Serialize};

/// Bitmask of currently pressed pointer buttons, as carried in every RFB
/// pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ButtonMask(u8);

impl ButtonMask {
    /// No buttons pressed.
    pub const EMPTY: ButtonMask = ButtonMask(0);

    /// Builds a mask from raw protocol bits.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw protocol bits.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the given button's bit is set.
    pub fn contains(self, button: PointerButton) -> bool {
        self.0 & button.bit() != 0
    }

    /// Whether no buttons are pressed.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// RFB pointer buttons 1–8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    Extra,
}

impl PointerButton {
    /// The button's bit within a [`ButtonMask`].
    pub fn bit(self) -> u8 {
        1 << self.index()
    }

    /// RFB button number (1-based).
    pub fn number(self) -> u8 {
        self.index() + 1
    }

    fn index(self) -> u8 {
        match self {
            PointerButton::Left => 0,
            PointerButton::Middle => 1,
            PointerButton::Right => 2,
            PointerButton::WheelUp => 3,
            PointerButton::WheelDown => 4,
            PointerButton::WheelLeft => 5,
            PointerButton::WheelRight => 6,
            PointerButton::Extra => 7,
        }
    }
}

/// A protocol-level pointer event: position in remote pixel space plus the
/// full button mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: u16,
    pub y: u16,
    pub buttons: ButtonMask,
}

/// A protocol-level key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// X11 keysym identifying the key.
    pub keysym: u32,
    /// `true` on press, `false` on release.
    pub down: bool,
}

/// Either kind of input message sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

/// Stateless translator from discrete local input events to protocol-level
/// pointer/key events.
///
/// The button mask is session-scoped mutable state owned by the caller;
/// [`InputEncoder::on_pointer_button`] is a pure transition function over it.
pub struct InputEncoder;

impl InputEncoder {
    /// Sets or clears one button's bit, leaving all other bits untouched.
    pub fn on_pointer_button(
        button: PointerButton,
        pressed: bool,
        mask: ButtonMask,
    ) -> ButtonMask {
        if pressed {
            ButtonMask(mask.0 | button.bit())
        } else {
            ButtonMask(mask.0 & !button.bit())
        }
    }

    /// A move event carrying the caller's current mask unchanged.
    pub fn on_pointer_move(x: u16, y: u16, mask: ButtonMask) -> PointerEvent {
        PointerEvent { x, y, buttons: mask }
    }

    /// Stateless passthrough from keysym + direction to a protocol key event.
    pub fn on_key(keysym: u32, down: bool) -> KeyEvent {
        KeyEvent { keysym, down }
    }

    /// One wheel detent: the RFB convention is a momentary press of the
    /// wheel button followed by its release, both at the current position
    /// and on top of whatever buttons are already held.
    pub fn wheel_click(
        wheel: PointerButton,
        x: u16,
        y: u16,
        mask: ButtonMask,
    ) -> [PointerEvent; 2] {
        let pressed = Self::on_pointer_button(wheel, true, mask);
        [
            PointerEvent { x, y, buttons: pressed },
            PointerEvent { x, y, buttons: mask },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_bits_match_rfb_numbering() {
        assert_eq!(PointerButton::Left.bit(), 0b0000_0001);
        assert_eq!(PointerButton::Middle.bit(), 0b0000_0010);
        assert_eq!(PointerButton::Right.bit(), 0b0000_0100);
        assert_eq!(PointerButton::WheelUp.bit(), 0b0000_1000);
        assert_eq!(PointerButton::WheelDown.bit(), 0b0001_0000);
        assert_eq!(PointerButton::Extra.number(), 8);
    }

    #[test]
    fn test_press_sets_only_the_pressed_bit() {
        let mask = InputEncoder::on_pointer_button(
            PointerButton::Right,
            true,
            ButtonMask::EMPTY,
        );
        assert_eq!(mask.bits(), 0b0000_0100);
        assert!(mask.contains(PointerButton::Right));
        assert!(!mask.contains(PointerButton::Left));
    }

    #[test]
    fn test_release_clears_only_the_released_bit() {
        let mask = ButtonMask::from_bits(0b0000_0111);
        let mask = InputEncoder::on_pointer_button(PointerButton::Middle, false, mask);
        assert_eq!(mask.bits(), 0b0000_0101);
    }

    #[test]
    fn test_redundant_press_and_release_are_idempotent() {
        let once = InputEncoder::on_pointer_button(PointerButton::Left, true, ButtonMask::EMPTY);
        let twice = InputEncoder::on_pointer_button(PointerButton::Left, true, once);
        assert_eq!(once, twice);

        let cleared = InputEncoder::on_pointer_button(PointerButton::Left, false, twice);
        let cleared_again =
            InputEncoder::on_pointer_button(PointerButton::Left, false, cleared);
        assert_eq!(cleared, cleared_again);
        assert!(cleared_again.is_empty());
    }

    /// The accumulated mask equals the OR of currently pressed buttons'
    /// bits regardless of interleaving order among distinct buttons.
    #[test]
    fn test_mask_accumulation_is_order_independent() {
        let presses = [
            PointerButton::Left,
            PointerButton::Middle,
            PointerButton::Right,
        ];

        let forward = presses.iter().fold(ButtonMask::EMPTY, |mask, &b| {
            InputEncoder::on_pointer_button(b, true, mask)
        });
        let backward = presses.iter().rev().fold(ButtonMask::EMPTY, |mask, &b| {
            InputEncoder::on_pointer_button(b, true, mask)
        });

        assert_eq!(forward, backward);
        assert_eq!(forward.bits(), 0b0000_0111);

        // Releasing one in the middle of a different interleaving still
        // yields the OR of what remains pressed.
        let mut mask = ButtonMask::EMPTY;
        mask = InputEncoder::on_pointer_button(PointerButton::Middle, true, mask);
        mask = InputEncoder::on_pointer_button(PointerButton::Left, true, mask);
        mask = InputEncoder::on_pointer_button(PointerButton::Middle, false, mask);
        mask = InputEncoder::on_pointer_button(PointerButton::Right, true, mask);
        assert_eq!(
            mask.bits(),
            PointerButton::Left.bit() | PointerButton::Right.bit()
        );
    }

    #[test]
    fn test_move_preserves_the_callers_mask() {
        let held = ButtonMask::from_bits(0b0000_0001);
        let event = InputEncoder::on_pointer_move(120, 45, held);
        assert_eq!(event, PointerEvent { x: 120, y: 45, buttons: held });
    }

    #[test]
    fn test_key_translation_is_a_passthrough() {
        assert_eq!(
            InputEncoder::on_key(0xFF0D, true),
            KeyEvent { keysym: 0xFF0D, down: true }
        );
        assert_eq!(
            InputEncoder::on_key(0x61, false),
            KeyEvent { keysym: 0x61, down: false }
        );
    }

    #[test]
    fn test_wheel_click_is_a_press_release_pair_over_held_buttons() {
        let held = ButtonMask::from_bits(PointerButton::Left.bit());
        let [press, release] =
            InputEncoder::wheel_click(PointerButton::WheelDown, 10, 20, held);

        assert_eq!(
            press.buttons.bits(),
            PointerButton::Left.bit() | PointerButton::WheelDown.bit()
        );
        assert_eq!(release.buttons, held);
        assert_eq!((press.x, press.y), (10, 20));
        assert_eq!((release.x, release.y), (10, 20));
    }
}
