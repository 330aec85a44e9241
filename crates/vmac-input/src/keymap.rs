//! Host key code → Macintosh virtual key code translation.
//!
//! Host key codes use the handheld platform's `KeyEvent` numbering (small
//! non-negative integers). The table covers codes 0-91; everything outside
//! that range, and every code without a physical Mac counterpart (volume,
//! call, camera, navigation chrome), translates to `None`.

/// Macintosh virtual key codes (ADB positional codes).
pub mod mac {
    pub const A: u8 = 0x00;
    pub const S: u8 = 0x01;
    pub const D: u8 = 0x02;
    pub const F: u8 = 0x03;
    pub const H: u8 = 0x04;
    pub const G: u8 = 0x05;
    pub const Z: u8 = 0x06;
    pub const X: u8 = 0x07;
    pub const C: u8 = 0x08;
    pub const V: u8 = 0x09;
    pub const B: u8 = 0x0B;
    pub const Q: u8 = 0x0C;
    pub const W: u8 = 0x0D;
    pub const E: u8 = 0x0E;
    pub const R: u8 = 0x0F;
    pub const Y: u8 = 0x10;
    pub const T: u8 = 0x11;
    pub const N1: u8 = 0x12;
    pub const N2: u8 = 0x13;
    pub const N3: u8 = 0x14;
    pub const N4: u8 = 0x15;
    pub const N6: u8 = 0x16;
    pub const N5: u8 = 0x17;
    pub const EQUAL: u8 = 0x18;
    pub const N9: u8 = 0x19;
    pub const N7: u8 = 0x1A;
    pub const MINUS: u8 = 0x1B;
    pub const N8: u8 = 0x1C;
    pub const N0: u8 = 0x1D;
    pub const RIGHT_BRACKET: u8 = 0x1E;
    pub const O: u8 = 0x1F;
    pub const U: u8 = 0x20;
    pub const LEFT_BRACKET: u8 = 0x21;
    pub const I: u8 = 0x22;
    pub const P: u8 = 0x23;
    pub const RETURN: u8 = 0x24;
    pub const L: u8 = 0x25;
    pub const J: u8 = 0x26;
    pub const QUOTE: u8 = 0x27;
    pub const K: u8 = 0x28;
    pub const SEMICOLON: u8 = 0x29;
    pub const BACKSLASH: u8 = 0x2A;
    pub const COMMA: u8 = 0x2B;
    pub const SLASH: u8 = 0x2C;
    pub const N: u8 = 0x2D;
    pub const M: u8 = 0x2E;
    pub const PERIOD: u8 = 0x2F;
    pub const TAB: u8 = 0x30;
    pub const SPACE: u8 = 0x31;
    pub const GRAVE: u8 = 0x32;
    pub const BACKSPACE: u8 = 0x33;
    pub const ESCAPE: u8 = 0x35;
    pub const COMMAND: u8 = 0x37;
    pub const SHIFT: u8 = 0x38;
    pub const CAPS_LOCK: u8 = 0x39;
    pub const OPTION: u8 = 0x3A;
    pub const CONTROL: u8 = 0x3B;
    pub const KEYPAD_PLUS: u8 = 0x45;
    pub const LEFT: u8 = 0x7B;
    pub const RIGHT: u8 = 0x7C;
    pub const DOWN: u8 = 0x7D;
    pub const UP: u8 = 0x7E;
}

/// Host key codes the front-end handles itself instead of translating.
pub mod host {
    pub const BACK: i32 = 4;
    pub const DPAD_UP: i32 = 19;
    pub const DPAD_DOWN: i32 = 20;
    pub const DPAD_LEFT: i32 = 21;
    pub const DPAD_RIGHT: i32 = 22;
}

/// Table sentinel: host code has no Mac counterpart.
const __: u8 = 0xFF;

/// Translation table indexed by host key code.
#[rustfmt::skip]
const TRANSLATION: [u8; 92] = [
    // 0-6: unknown, soft keys, home, back, call, end call
    __, __, __, __, __, __, __,
    // 7-16: digits 0-9
    mac::N0, mac::N1, mac::N2, mac::N3, mac::N4,
    mac::N5, mac::N6, mac::N7, mac::N8, mac::N9,
    // 17-28: star, pound, d-pad, volume, power, camera, clear
    __, __, __, __, __, __, __, __, __, __, __, __,
    // 29-54: letters A-Z
    mac::A, mac::B, mac::C, mac::D, mac::E, mac::F, mac::G, mac::H,
    mac::I, mac::J, mac::K, mac::L, mac::M, mac::N, mac::O, mac::P,
    mac::Q, mac::R, mac::S, mac::T, mac::U, mac::V, mac::W, mac::X,
    mac::Y, mac::Z,
    // 55-56: comma, period
    mac::COMMA, mac::PERIOD,
    // 57-58: alt left/right → command
    mac::COMMAND, mac::COMMAND,
    // 59-60: shift left/right
    mac::SHIFT, mac::SHIFT,
    // 61-63: tab, space, sym → option
    mac::TAB, mac::SPACE, mac::OPTION,
    // 64-65: explorer, envelope
    __, __,
    // 66-67: enter, delete
    mac::RETURN, mac::BACKSPACE,
    // 68-76: grave, minus, equals, brackets, backslash, semicolon, apostrophe, slash
    mac::GRAVE, mac::MINUS, mac::EQUAL, mac::LEFT_BRACKET, mac::RIGHT_BRACKET,
    mac::BACKSLASH, mac::SEMICOLON, mac::QUOTE, mac::SLASH,
    // 77: at → command
    mac::COMMAND,
    // 78: num → option
    mac::OPTION,
    // 79-80: headset hook, focus
    __, __,
    // 81: plus
    mac::KEYPAD_PLUS,
    // 82-83: menu, notification
    __, __,
    // 84: search → option
    mac::OPTION,
    // 85-91: media keys, mute, page up/down
    __, __, __, __, __, __, __,
];

/// Translate a host key code to a Mac virtual key code.
///
/// Total over `i32`: negative, out-of-range and unmapped codes return `None`.
#[must_use]
pub fn translate(host_code: i32) -> Option<u8> {
    let index = usize::try_from(host_code).ok()?;
    match TRANSLATION.get(index) {
        Some(&code) if code != __ => Some(code),
        _ => None,
    }
}

/// Number of host codes covered by the table.
#[must_use]
pub const fn table_len() -> usize {
    TRANSLATION.len()
}
