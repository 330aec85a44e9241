//! The host application around the session: menus, dialogs, sub-screens.

use std::path::Path;

use crate::prefs::Preferences;

/// A screen that temporarily covers the emulator.
///
/// While one is open the surface is hidden on purpose and the user is
/// expected back, which matters when deciding whether pausing may power the
/// Mac off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubFlow {
    FilePicker,
    Settings,
}

/// How the settings screen was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsOutcome {
    Closed,
    Reset,
    Interrupt,
    About,
}

/// Host application services. Called on the interaction thread only.
pub trait Shell {
    /// Show the settings screen. The host reports back through
    /// `finish_settings`.
    fn open_settings(&mut self);
    /// Show a file picker. The host reports back through `finish_import`.
    fn open_file_picker(&mut self);
    /// The disk menu is stale and should be rebuilt.
    fn invalidate_menu(&mut self);
    /// Offer an ejected disk image for sharing.
    fn share_file(&mut self, path: &Path, name: &str);
    fn show_about(&mut self);
    /// Current display preferences.
    fn preferences(&self) -> Preferences;
}
