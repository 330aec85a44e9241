//! On-screen keyboard state.
//!
//! Three layouts share one controller: `Primary` (letters), `Symbols`
//! (digits and punctuation) and `SymbolsShifted` (the same keys with shifted
//! legends). Modifier keys are sticky: one tap latches them, the next tap
//! releases them. The Shift latch is keyboard-wide, so switching layouts
//! never silently drops a Shift the user has engaged.
//!
//! The widget that draws the keyboard owns none of this state. It reports
//! touches in the order press → activate → release and renders whatever
//! [`SoftKeyboard::active_layout`] says.

use crate::keymap::mac;

/// Receiver of Mac key events.
///
/// Implemented by the emulator core. Calls are fire-and-forget and may
/// arrive on any thread.
pub trait KeySink {
    fn key_down(&self, code: u8);
    fn key_up(&self, code: u8);
}

/// What a soft key does when touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftCode {
    /// Sends a Mac virtual key code.
    Mac(u8),
    /// Switches between the letter and symbol layouts. Never reaches the Mac.
    ModeChange,
}

/// One key on a soft keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub code: SoftCode,
    pub label: &'static str,
    /// Latching key: stays engaged between taps.
    pub sticky: bool,
    /// Current latch state. Always false for non-sticky keys.
    pub engaged: bool,
}

impl Key {
    const fn mac(code: u8, label: &'static str) -> Self {
        Self {
            code: SoftCode::Mac(code),
            label,
            sticky: false,
            engaged: false,
        }
    }

    const fn sticky(code: u8, label: &'static str) -> Self {
        Self {
            code: SoftCode::Mac(code),
            label,
            sticky: true,
            engaged: false,
        }
    }

    const fn mode(label: &'static str) -> Self {
        Self {
            code: SoftCode::ModeChange,
            label,
            sticky: false,
            engaged: false,
        }
    }

    fn is_mac(&self, code: u8) -> bool {
        self.code == SoftCode::Mac(code)
    }
}

/// Which layout is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Primary,
    Symbols,
    SymbolsShifted,
}

/// A grid of keys, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    kind: LayoutKind,
    rows: Vec<Vec<Key>>,
}

impl KeyboardLayout {
    #[must_use]
    pub fn new(kind: LayoutKind, rows: Vec<Vec<Key>>) -> Self {
        Self { kind, rows }
    }

    #[must_use]
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Key>] {
        &self.rows
    }

    /// All keys in reading order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flatten()
    }

    /// The key sending `code`, if this layout has one.
    #[must_use]
    pub fn key(&self, code: u8) -> Option<&Key> {
        self.keys().find(|k| k.is_mac(code))
    }

    fn set_engaged(&mut self, code: u8, engaged: bool) {
        for key in self.rows.iter_mut().flatten() {
            if key.sticky && key.is_mac(code) {
                key.engaged = engaged;
            }
        }
    }

    /// Letter layout.
    #[must_use]
    pub fn primary() -> Self {
        Self::new(
            LayoutKind::Primary,
            vec![
                vec![
                    Key::mac(mac::Q, "q"),
                    Key::mac(mac::W, "w"),
                    Key::mac(mac::E, "e"),
                    Key::mac(mac::R, "r"),
                    Key::mac(mac::T, "t"),
                    Key::mac(mac::Y, "y"),
                    Key::mac(mac::U, "u"),
                    Key::mac(mac::I, "i"),
                    Key::mac(mac::O, "o"),
                    Key::mac(mac::P, "p"),
                ],
                vec![
                    Key::mac(mac::A, "a"),
                    Key::mac(mac::S, "s"),
                    Key::mac(mac::D, "d"),
                    Key::mac(mac::F, "f"),
                    Key::mac(mac::G, "g"),
                    Key::mac(mac::H, "h"),
                    Key::mac(mac::J, "j"),
                    Key::mac(mac::K, "k"),
                    Key::mac(mac::L, "l"),
                ],
                vec![
                    Key::sticky(mac::SHIFT, "shift"),
                    Key::mac(mac::Z, "z"),
                    Key::mac(mac::X, "x"),
                    Key::mac(mac::C, "c"),
                    Key::mac(mac::V, "v"),
                    Key::mac(mac::B, "b"),
                    Key::mac(mac::N, "n"),
                    Key::mac(mac::M, "m"),
                    Key::mac(mac::BACKSPACE, "del"),
                ],
                bottom_row("?123"),
            ],
        )
    }

    /// Digit and punctuation layout.
    #[must_use]
    pub fn symbols() -> Self {
        Self::new(
            LayoutKind::Symbols,
            vec![
                vec![
                    Key::mac(mac::N1, "1"),
                    Key::mac(mac::N2, "2"),
                    Key::mac(mac::N3, "3"),
                    Key::mac(mac::N4, "4"),
                    Key::mac(mac::N5, "5"),
                    Key::mac(mac::N6, "6"),
                    Key::mac(mac::N7, "7"),
                    Key::mac(mac::N8, "8"),
                    Key::mac(mac::N9, "9"),
                    Key::mac(mac::N0, "0"),
                ],
                vec![
                    Key::mac(mac::GRAVE, "`"),
                    Key::mac(mac::MINUS, "-"),
                    Key::mac(mac::EQUAL, "="),
                    Key::mac(mac::LEFT_BRACKET, "["),
                    Key::mac(mac::RIGHT_BRACKET, "]"),
                    Key::mac(mac::BACKSLASH, "\\"),
                    Key::mac(mac::SEMICOLON, ";"),
                    Key::mac(mac::QUOTE, "'"),
                    Key::mac(mac::TAB, "tab"),
                ],
                vec![
                    Key::sticky(mac::SHIFT, "shift"),
                    Key::mac(mac::COMMA, ","),
                    Key::mac(mac::PERIOD, "."),
                    Key::mac(mac::SLASH, "/"),
                    Key::mac(mac::LEFT, "←"),
                    Key::mac(mac::DOWN, "↓"),
                    Key::mac(mac::UP, "↑"),
                    Key::mac(mac::RIGHT, "→"),
                    Key::mac(mac::ESCAPE, "esc"),
                ],
                bottom_row("abc"),
            ],
        )
    }

    /// Same keys as [`KeyboardLayout::symbols`] with shifted legends.
    #[must_use]
    pub fn symbols_shifted() -> Self {
        Self::new(
            LayoutKind::SymbolsShifted,
            vec![
                vec![
                    Key::mac(mac::N1, "!"),
                    Key::mac(mac::N2, "@"),
                    Key::mac(mac::N3, "#"),
                    Key::mac(mac::N4, "$"),
                    Key::mac(mac::N5, "%"),
                    Key::mac(mac::N6, "^"),
                    Key::mac(mac::N7, "&"),
                    Key::mac(mac::N8, "*"),
                    Key::mac(mac::N9, "("),
                    Key::mac(mac::N0, ")"),
                ],
                vec![
                    Key::mac(mac::GRAVE, "~"),
                    Key::mac(mac::MINUS, "_"),
                    Key::mac(mac::EQUAL, "+"),
                    Key::mac(mac::LEFT_BRACKET, "{"),
                    Key::mac(mac::RIGHT_BRACKET, "}"),
                    Key::mac(mac::BACKSLASH, "|"),
                    Key::mac(mac::SEMICOLON, ":"),
                    Key::mac(mac::QUOTE, "\""),
                    Key::mac(mac::TAB, "tab"),
                ],
                vec![
                    Key::sticky(mac::SHIFT, "shift"),
                    Key::mac(mac::COMMA, "<"),
                    Key::mac(mac::PERIOD, ">"),
                    Key::mac(mac::SLASH, "?"),
                    Key::mac(mac::LEFT, "←"),
                    Key::mac(mac::DOWN, "↓"),
                    Key::mac(mac::UP, "↑"),
                    Key::mac(mac::RIGHT, "→"),
                    Key::mac(mac::ESCAPE, "esc"),
                ],
                bottom_row("abc"),
            ],
        )
    }
}

fn bottom_row(mode_label: &'static str) -> Vec<Key> {
    vec![
        Key::mode(mode_label),
        Key::sticky(mac::CONTROL, "ctrl"),
        Key::sticky(mac::OPTION, "opt"),
        Key::sticky(mac::COMMAND, "cmd"),
        Key::mac(mac::SPACE, "space"),
        Key::mac(mac::RETURN, "return"),
    ]
}

/// Soft keyboard controller: active layout plus the Shift latch.
#[derive(Debug, Clone)]
pub struct SoftKeyboard {
    primary: KeyboardLayout,
    symbols: KeyboardLayout,
    symbols_shifted: KeyboardLayout,
    active: LayoutKind,
    modifier_engaged: bool,
}

impl SoftKeyboard {
    /// Controller over the built-in layouts, showing `Primary`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layouts(
            KeyboardLayout::primary(),
            KeyboardLayout::symbols(),
            KeyboardLayout::symbols_shifted(),
        )
    }

    #[must_use]
    pub fn with_layouts(
        primary: KeyboardLayout,
        symbols: KeyboardLayout,
        symbols_shifted: KeyboardLayout,
    ) -> Self {
        Self {
            primary,
            symbols,
            symbols_shifted,
            active: LayoutKind::Primary,
            modifier_engaged: false,
        }
    }

    #[must_use]
    pub fn layout(&self) -> LayoutKind {
        self.active
    }

    #[must_use]
    pub fn active_layout(&self) -> &KeyboardLayout {
        match self.active {
            LayoutKind::Primary => &self.primary,
            LayoutKind::Symbols => &self.symbols,
            LayoutKind::SymbolsShifted => &self.symbols_shifted,
        }
    }

    /// Whether the Shift latch is engaged.
    #[must_use]
    pub fn is_modifier_engaged(&self) -> bool {
        self.modifier_engaged
    }

    /// The key for `code` in the active layout only.
    ///
    /// `None` is an ordinary answer: plenty of codes have no key on a given
    /// layout.
    #[must_use]
    pub fn key(&self, code: u8) -> Option<&Key> {
        self.active_layout().key(code)
    }

    /// Finger down on a key.
    pub fn press<K: KeySink + ?Sized>(&self, code: SoftCode, sink: &K) {
        if let Some(mac_code) = self.forwardable(code) {
            log::trace!("soft key down {mac_code:#04X}");
            sink.key_down(mac_code);
        }
    }

    /// Finger up from a key.
    pub fn release<K: KeySink + ?Sized>(&self, code: SoftCode, sink: &K) {
        if let Some(mac_code) = self.forwardable(code) {
            log::trace!("soft key up {mac_code:#04X}");
            sink.key_up(mac_code);
        }
    }

    /// A latched key stands for a held modifier, so its taps are not
    /// forwarded while it is engaged.
    fn forwardable(&self, code: SoftCode) -> Option<u8> {
        let SoftCode::Mac(mac_code) = code else {
            return None;
        };
        let key = self.key(mac_code)?;
        (!key.sticky || !key.engaged).then_some(mac_code)
    }

    /// A completed tap. Drives layout switching and latches.
    pub fn activate(&mut self, code: SoftCode) {
        match code {
            SoftCode::ModeChange => self.mode_change(),
            SoftCode::Mac(mac::SHIFT) => self.shift(),
            SoftCode::Mac(other) => {
                if let Some(key) = self.key(other)
                    && key.sticky
                {
                    let engaged = !key.engaged;
                    self.set_latch(other, engaged);
                }
            }
        }
    }

    fn mode_change(&mut self) {
        match self.active {
            LayoutKind::Symbols => {
                self.active = LayoutKind::Primary;
                self.set_modifier(false);
            }
            LayoutKind::SymbolsShifted => {
                self.active = LayoutKind::Primary;
                self.set_modifier(true);
            }
            LayoutKind::Primary => {
                self.active = if self.modifier_engaged {
                    LayoutKind::SymbolsShifted
                } else {
                    LayoutKind::Symbols
                };
            }
        }
        log::debug!("soft keyboard layout {:?}", self.active);
    }

    fn shift(&mut self) {
        match self.active {
            LayoutKind::Primary => {
                let engaged = !self.modifier_engaged;
                self.set_modifier(engaged);
            }
            LayoutKind::Symbols => {
                self.active = LayoutKind::SymbolsShifted;
                self.set_modifier(true);
            }
            LayoutKind::SymbolsShifted => {
                self.active = LayoutKind::Symbols;
                self.set_modifier(false);
            }
        }
    }

    fn set_modifier(&mut self, engaged: bool) {
        self.modifier_engaged = engaged;
        self.set_latch(mac::SHIFT, engaged);
    }

    /// Latches are keyboard-wide: every layout's copy of the key follows.
    fn set_latch(&mut self, code: u8, engaged: bool) {
        self.primary.set_engaged(code, engaged);
        self.symbols.set_engaged(code, engaged);
        self.symbols_shifted.set_engaged(code, engaged);
    }
}

impl Default for SoftKeyboard {
    fn default() -> Self {
        Self::new()
    }
}
