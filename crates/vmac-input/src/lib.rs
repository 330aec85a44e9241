//! Input layer for the Macintosh emulator front-end.
//!
//! Turns host input into Mac key events and viewport scrolls:
//! 1. `keymap`: host key codes → Mac virtual key codes.
//! 2. `soft_keyboard`: on-screen keyboard layouts and sticky modifiers.
//! 3. `scroll`: trackball and d-pad panning while the display is pannable.
//! 4. `keyboard_map` (feature `native`): desktop physical keys → Mac keys.

#[cfg(feature = "native")]
pub mod keyboard_map;
pub mod keymap;
pub mod scroll;
pub mod soft_keyboard;

pub use keymap::{host, mac, translate};
pub use scroll::{DPAD_SCROLL_STEP, PointerScrollAdapter, ScrollDirection, ScrollSink};
pub use soft_keyboard::{Key, KeySink, KeyboardLayout, LayoutKind, SoftCode, SoftKeyboard};
