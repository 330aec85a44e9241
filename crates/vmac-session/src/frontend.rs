//! Host input routing.
//!
//! Sits between the host's input callbacks and the session: hardware keys,
//! trackball motion, the on-screen keyboard, and visibility changes.

use std::time::Duration;

use vmac_input::{
    DPAD_SCROLL_STEP, PointerScrollAdapter, ScrollDirection, SoftCode, SoftKeyboard, host,
    translate,
};
#[cfg(feature = "native")]
use winit::keyboard::KeyCode;

use crate::session::LifecycleCoordinator;
use crate::shell::SettingsOutcome;

/// Interaction-thread front-end: one session plus its input state.
pub struct Frontend {
    session: LifecycleCoordinator,
    keyboard: SoftKeyboard,
    keyboard_visible: bool,
    chrome_visible: bool,
}

impl Frontend {
    #[must_use]
    pub fn new(session: LifecycleCoordinator) -> Self {
        Self {
            session,
            keyboard: SoftKeyboard::new(),
            keyboard_visible: false,
            chrome_visible: true,
        }
    }

    #[must_use]
    pub fn session(&self) -> &LifecycleCoordinator {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut LifecycleCoordinator {
        &mut self.session
    }

    #[must_use]
    pub fn keyboard(&self) -> &SoftKeyboard {
        &self.keyboard
    }

    #[must_use]
    pub fn is_keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    #[must_use]
    pub fn is_chrome_visible(&self) -> bool {
        self.chrome_visible
    }

    /// Pannable mode, as last applied by the session.
    #[must_use]
    pub fn is_pannable(&self) -> bool {
        self.session.preferences().scroll
    }

    /// A hardware key went down. Returns whether it was consumed.
    pub fn host_key_down(&mut self, code: i32) -> bool {
        if self.is_pannable()
            && let Some(direction) = ScrollDirection::from_host_key(code)
        {
            self.session
                .surface_mut()
                .scroll_screen(direction, DPAD_SCROLL_STEP);
            return true;
        }

        if let Some(mac) = translate(code) {
            if let Some(core) = self.session.core() {
                core.key_down(mac);
            } else {
                log::trace!("key {mac:#04X} down before the emulator started");
            }
            return true;
        }

        if code == host::BACK {
            self.toggle_keyboard();
            return true;
        }

        log::trace!("unhandled host key {code}");
        false
    }

    /// A hardware key went up. Returns whether it was consumed.
    pub fn host_key_up(&mut self, code: i32) -> bool {
        // D-pad presses that scrolled never reached the Mac.
        if self.is_pannable() && ScrollDirection::from_host_key(code).is_some() {
            return true;
        }
        let Some(mac) = translate(code) else {
            return false;
        };
        if let Some(core) = self.session.core() {
            core.key_up(mac);
        }
        true
    }

    /// A physical key on a desktop keyboard. Returns whether it maps to a Mac
    /// key.
    #[cfg(feature = "native")]
    pub fn desktop_key(&self, key: KeyCode, pressed: bool) -> bool {
        let Some(mac) = vmac_input::keyboard_map::map_keycode(key) else {
            log::trace!("unmapped desktop key {key:?}");
            return false;
        };
        if let Some(core) = self.session.core() {
            if pressed {
                core.key_down(mac);
            } else {
                core.key_up(mac);
            }
        }
        true
    }

    /// Relative trackball motion. Pans the screen while pannable.
    pub fn trackball(&mut self, dx: f32, dy: f32) {
        let adapter = PointerScrollAdapter::new(self.is_pannable());
        let emitted = adapter.motion(dx, dy, self.session.surface_mut());
        log::trace!("trackball ({dx}, {dy}) -> {emitted} scrolls");
    }

    /// On-screen key pressed.
    pub fn soft_key_press(&self, code: SoftCode) {
        if let Some(core) = self.session.core() {
            self.keyboard.press(code, core.as_ref());
        }
    }

    /// On-screen key clicked: layout and modifier changes.
    pub fn soft_key_activate(&mut self, code: SoftCode) {
        self.keyboard.activate(code);
    }

    /// On-screen key released.
    pub fn soft_key_release(&self, code: SoftCode) {
        if let Some(core) = self.session.core() {
            self.keyboard.release(code, core.as_ref());
        }
    }

    pub fn toggle_keyboard(&mut self) {
        self.keyboard_visible = !self.keyboard_visible;
        log::debug!("soft keyboard visible: {}", self.keyboard_visible);
    }

    /// Single tap on the surface: show or hide the window chrome.
    pub fn tap(&mut self) {
        self.chrome_visible = !self.chrome_visible;
    }

    /// The surface went out of view.
    pub fn on_hidden(&mut self) {
        self.session.pause();
    }

    /// The surface is back in view.
    pub fn on_visible(&mut self) {
        self.session.resume();
    }

    /// The settings screen closed. Preferences may have changed.
    pub fn finish_settings(&mut self, outcome: SettingsOutcome) {
        self.session.finish_settings(outcome);
    }

    /// Run queued Core events.
    pub fn pump(&mut self) -> usize {
        self.session.pump()
    }

    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        self.session.pump_timeout(timeout)
    }
}
