//! Key event records
//!
//! `KeyData` mirrors the firmware key record layout: an input key (scan code
//! plus UCS-2 character) followed by the shift/toggle state. The layout is
//! fixed so queue slots always copy exactly one record.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

bitflags! {
    /// Modifier keys held when the key was produced
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShiftState: u32 {
        const RIGHT_SHIFT = 0x0000_0001;
        const LEFT_SHIFT = 0x0000_0002;
        const RIGHT_CONTROL = 0x0000_0004;
        const LEFT_CONTROL = 0x0000_0008;
        const RIGHT_ALT = 0x0000_0010;
        const LEFT_ALT = 0x0000_0020;
        const RIGHT_LOGO = 0x0000_0040;
        const LEFT_LOGO = 0x0000_0080;
        const MENU_KEY = 0x0000_0100;
        const SYS_REQ = 0x0000_0200;
        /// The other bits are meaningful
        const VALID = 0x8000_0000;
    }
}

bitflags! {
    /// Lock key state when the key was produced
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ToggleState: u8 {
        const SCROLL_LOCK = 0x01;
        const NUM_LOCK = 0x02;
        const CAPS_LOCK = 0x04;
        const KEY_STATE_EXPOSED = 0x40;
        /// The other bits are meaningful
        const VALID = 0x80;
    }
}

/// Scan code and character of a keystroke
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputKey {
    /// Scan code for non-printable keys, zero otherwise
    pub scan_code: u16,
    /// UCS-2 character, zero for non-printable keys
    pub unicode_char: u16,
}

/// Modifier and lock state attached to a keystroke
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyState {
    pub shift_state: ShiftState,
    pub toggle_state: ToggleState,
}

/// One keystroke as stored in the translated key queue
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyData {
    pub key: InputKey,
    pub key_state: KeyState,
}

const_assert_eq!(core::mem::size_of::<InputKey>(), 4);
const_assert_eq!(core::mem::size_of::<KeyState>(), 8);
const_assert_eq!(core::mem::size_of::<KeyData>(), 12);

impl KeyData {
    /// Keystroke for a printable character with no modifiers
    ///
    /// Characters outside the basic multilingual plane cannot be carried in
    /// a UCS-2 field and are stored as U+FFFD.
    pub fn from_char(c: char) -> Self {
        let unicode_char = u16::try_from(u32::from(c)).unwrap_or(0xFFFD);
        Self {
            key: InputKey {
                scan_code: 0,
                unicode_char,
            },
            key_state: KeyState::default(),
        }
    }

    /// Same keystroke with modifier state attached
    pub fn with_state(mut self, shift_state: ShiftState, toggle_state: ToggleState) -> Self {
        self.key_state = KeyState {
            shift_state: shift_state | ShiftState::VALID,
            toggle_state: toggle_state | ToggleState::VALID,
        };
        self
    }

    /// Raw UCS-2 character field
    pub fn unicode_char(&self) -> u16 {
        self.key.unicode_char
    }

    /// Character to display for this keystroke
    ///
    /// The character field is rendered as-is, including NUL for a slot that
    /// was never written. Unpaired surrogates render as U+FFFD.
    pub fn display_char(&self) -> char {
        char::from_u32(u32::from(self.key.unicode_char)).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// Raw key report from the USB transport
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UsbKey {
    /// HID keyboard usage code
    pub key_code: u8,
    /// Pressed (`true`) or released
    pub down: bool,
}

const_assert_eq!(core::mem::size_of::<UsbKey>(), 2);
