//! The rendering and pointer surface the session drives.

use std::sync::Arc;

use vmac_input::ScrollSink;

use crate::core::Core;

/// Changed rectangle of the Mac screen, in Mac pixels. `bottom` and `right`
/// are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRegion {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl ScreenRegion {
    #[must_use]
    pub const fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Interaction surface: draws the Mac screen and owns the viewport.
///
/// Lives on the interaction thread. Every call arrives there too.
pub trait InteractionSurface: ScrollSink {
    /// Mac screen geometry, reported once the Core knows it.
    fn set_target_screen_size(&mut self, width: u32, height: u32);
    /// Blit a changed region. `pixels` covers exactly `region`.
    fn update_screen(&mut self, pixels: &[u8], region: ScreenRegion);
    /// Scale the Mac screen to fit the surface.
    fn set_scaled(&mut self, scaled: bool);
    /// Pannable viewport mode.
    fn set_scroll(&mut self, scroll: bool);
    /// Install the receiver for pointer moves and clicks on the surface.
    fn set_pointer_sink(&mut self, sink: Box<dyn PointerSink>);
}

/// Receiver of Mac pointer state.
pub trait PointerSink {
    fn pointer_moved(&self, x: i32, y: i32);
    fn pointer_button(&self, down: bool);
}

/// Pointer sink that hands events straight to the Core.
///
/// Pointer input needs no marshaling: it starts on the interaction thread and
/// the Core accepts calls from any thread.
pub struct CorePointer {
    core: Arc<dyn Core>,
}

impl CorePointer {
    #[must_use]
    pub fn new(core: Arc<dyn Core>) -> Self {
        Self { core }
    }
}

impl PointerSink for CorePointer {
    fn pointer_moved(&self, x: i32, y: i32) {
        self.core.set_mouse_position(x, y);
    }

    fn pointer_button(&self, down: bool) {
        self.core.set_mouse_button(down);
    }
}
