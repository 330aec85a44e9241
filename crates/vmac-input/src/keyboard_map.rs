//! Desktop host keyboard → Mac key mapping.
//!
//! Maps winit physical `KeyCode` values to Mac virtual key codes for windowed
//! front-ends. Positional: the key's location on a US layout decides the Mac
//! key, not the character it produces.

use winit::keyboard::KeyCode;

use crate::keymap::mac;

/// Map a physical host key to a Mac virtual key code.
///
/// Returns `None` for unmapped keys.
#[must_use]
pub fn map_keycode(key: KeyCode) -> Option<u8> {
    match key {
        // Letters
        KeyCode::KeyA => Some(mac::A),
        KeyCode::KeyB => Some(mac::B),
        KeyCode::KeyC => Some(mac::C),
        KeyCode::KeyD => Some(mac::D),
        KeyCode::KeyE => Some(mac::E),
        KeyCode::KeyF => Some(mac::F),
        KeyCode::KeyG => Some(mac::G),
        KeyCode::KeyH => Some(mac::H),
        KeyCode::KeyI => Some(mac::I),
        KeyCode::KeyJ => Some(mac::J),
        KeyCode::KeyK => Some(mac::K),
        KeyCode::KeyL => Some(mac::L),
        KeyCode::KeyM => Some(mac::M),
        KeyCode::KeyN => Some(mac::N),
        KeyCode::KeyO => Some(mac::O),
        KeyCode::KeyP => Some(mac::P),
        KeyCode::KeyQ => Some(mac::Q),
        KeyCode::KeyR => Some(mac::R),
        KeyCode::KeyS => Some(mac::S),
        KeyCode::KeyT => Some(mac::T),
        KeyCode::KeyU => Some(mac::U),
        KeyCode::KeyV => Some(mac::V),
        KeyCode::KeyW => Some(mac::W),
        KeyCode::KeyX => Some(mac::X),
        KeyCode::KeyY => Some(mac::Y),
        KeyCode::KeyZ => Some(mac::Z),

        // Digits
        KeyCode::Digit0 => Some(mac::N0),
        KeyCode::Digit1 => Some(mac::N1),
        KeyCode::Digit2 => Some(mac::N2),
        KeyCode::Digit3 => Some(mac::N3),
        KeyCode::Digit4 => Some(mac::N4),
        KeyCode::Digit5 => Some(mac::N5),
        KeyCode::Digit6 => Some(mac::N6),
        KeyCode::Digit7 => Some(mac::N7),
        KeyCode::Digit8 => Some(mac::N8),
        KeyCode::Digit9 => Some(mac::N9),

        // Punctuation
        KeyCode::Minus => Some(mac::MINUS),
        KeyCode::Equal => Some(mac::EQUAL),
        KeyCode::BracketLeft => Some(mac::LEFT_BRACKET),
        KeyCode::BracketRight => Some(mac::RIGHT_BRACKET),
        KeyCode::Backslash => Some(mac::BACKSLASH),
        KeyCode::Semicolon => Some(mac::SEMICOLON),
        KeyCode::Quote => Some(mac::QUOTE),
        KeyCode::Comma => Some(mac::COMMA),
        KeyCode::Period => Some(mac::PERIOD),
        KeyCode::Slash => Some(mac::SLASH),
        KeyCode::Backquote => Some(mac::GRAVE),
        KeyCode::NumpadAdd => Some(mac::KEYPAD_PLUS),

        // Modifiers. Alt sits where the Mac keyboard has Command.
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(mac::SHIFT),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(mac::CONTROL),
        KeyCode::AltLeft | KeyCode::AltRight | KeyCode::SuperLeft | KeyCode::SuperRight => {
            Some(mac::COMMAND)
        }
        KeyCode::CapsLock => Some(mac::CAPS_LOCK),

        // Editing and navigation
        KeyCode::Enter | KeyCode::NumpadEnter => Some(mac::RETURN),
        KeyCode::Space => Some(mac::SPACE),
        KeyCode::Tab => Some(mac::TAB),
        KeyCode::Backspace => Some(mac::BACKSPACE),
        KeyCode::Escape => Some(mac::ESCAPE),
        KeyCode::ArrowLeft => Some(mac::LEFT),
        KeyCode::ArrowRight => Some(mac::RIGHT),
        KeyCode::ArrowDown => Some(mac::DOWN),
        KeyCode::ArrowUp => Some(mac::UP),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_use_positional_codes() {
        assert_eq!(map_keycode(KeyCode::KeyA), Some(0x00));
        assert_eq!(map_keycode(KeyCode::KeyZ), Some(0x06));
        assert_eq!(map_keycode(KeyCode::KeyQ), Some(0x0C));
    }

    #[test]
    fn alt_and_super_are_command() {
        assert_eq!(map_keycode(KeyCode::AltLeft), Some(mac::COMMAND));
        assert_eq!(map_keycode(KeyCode::SuperRight), Some(mac::COMMAND));
    }

    #[test]
    fn function_keys_are_unmapped() {
        assert_eq!(map_keycode(KeyCode::F1), None);
        assert_eq!(map_keycode(KeyCode::PrintScreen), None);
    }
}
