//! Trackball and d-pad panning of the rendered viewport.
//!
//! When the display is pannable the viewport is larger than the surface, and
//! relative pointer motion moves it instead of the Mac cursor. Nothing here
//! talks to the emulator.

use crate::keymap::host;

/// Scroll units per unit of trackball motion.
pub const TRACKBALL_SENSITIVITY: f32 = 8.0;

/// Scroll units per d-pad key press.
pub const DPAD_SCROLL_STEP: u32 = 8;

/// Direction to move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    /// The direction a host d-pad key scrolls, if it is a d-pad key.
    #[must_use]
    pub const fn from_host_key(code: i32) -> Option<Self> {
        match code {
            host::DPAD_UP => Some(Self::Up),
            host::DPAD_DOWN => Some(Self::Down),
            host::DPAD_LEFT => Some(Self::Left),
            host::DPAD_RIGHT => Some(Self::Right),
            _ => None,
        }
    }
}

/// Receiver of viewport scroll commands.
pub trait ScrollSink {
    fn scroll_screen(&mut self, direction: ScrollDirection, amount: u32);
}

/// Converts relative pointer motion into directional scroll commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerScrollAdapter {
    pannable: bool,
}

impl PointerScrollAdapter {
    #[must_use]
    pub const fn new(pannable: bool) -> Self {
        Self { pannable }
    }

    pub fn set_pannable(&mut self, pannable: bool) {
        self.pannable = pannable;
    }

    #[must_use]
    pub const fn is_pannable(&self) -> bool {
        self.pannable
    }

    /// Feed one relative motion sample.
    ///
    /// Each axis is handled independently: the sign picks the direction and
    /// the magnitude is scaled by [`TRACKBALL_SENSITIVITY`], truncated toward
    /// zero. Returns the number of scroll commands emitted.
    pub fn motion<S: ScrollSink + ?Sized>(&self, dx: f32, dy: f32, sink: &mut S) -> usize {
        if !self.pannable {
            return 0;
        }

        let mut emitted = 0;
        let horizontal = axis(dx, ScrollDirection::Left, ScrollDirection::Right);
        let vertical = axis(dy, ScrollDirection::Up, ScrollDirection::Down);
        for (direction, amount) in [horizontal, vertical].into_iter().flatten() {
            log::trace!("trackball scroll {direction:?} by {amount}");
            sink.scroll_screen(direction, amount);
            emitted += 1;
        }
        emitted
    }
}

/// Scale one axis. Zero (or a sub-unit sample that truncates to zero) emits
/// nothing; NaN compares false on both sides and is dropped too.
fn axis(
    delta: f32,
    negative: ScrollDirection,
    positive: ScrollDirection,
) -> Option<(ScrollDirection, u32)> {
    let direction = if delta > 0.0 {
        positive
    } else if delta < 0.0 {
        negative
    } else {
        return None;
    };
    let amount = (TRACKBALL_SENSITIVITY * delta.abs()) as u32;
    (amount > 0).then_some((direction, amount))
}
