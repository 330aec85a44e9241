//! The emulator engine seam.
//!
//! The Core simulates the Mac itself. The session only starts it, feeds it
//! commands, and receives its callbacks through [`CoreEvents`].

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use thiserror::Error;
use vmac_input::KeySink;

use crate::event::UiEvent;
use crate::surface::ScreenRegion;

/// Failure reported by the Core for a command that has a result.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("could not create {size}-byte disk {name} in {}: {reason}", dir.display())]
    DiskCreation {
        size: u32,
        dir: PathBuf,
        name: String,
        reason: String,
    },
}

/// Emulator engine.
///
/// Every method except [`Core::run`] is a fire-and-forget command from the
/// interaction thread. They may race with the run loop; the Core does its own
/// synchronization.
pub trait Core: KeySink + Send + Sync {
    /// Boot from `rom` and emulate until the machine is switched off.
    ///
    /// Blocks the calling thread for the life of the session. `events` is the
    /// only route back to the interaction thread.
    fn run(&self, rom: Vec<u8>, events: CoreEvents);

    fn pause_emulation(&self);
    fn resume_emulation(&self);
    fn want_reset(&self);
    fn want_interrupt(&self);
    /// Ask the Mac to shut down cleanly. The run loop returns when it has.
    fn request_power_off(&self);

    fn set_mouse_position(&self, x: i32, y: i32);
    fn set_mouse_button(&self, down: bool);

    /// Insert a disk image. The Core rejects duplicates and full drives.
    fn insert_disk(&self, path: &Path);
    fn is_disk_inserted(&self, path: &Path) -> bool;
    fn has_disks_inserted(&self) -> bool;
    /// Create a blank disk image of `size` bytes as `dir/name`.
    fn make_new_disk(&self, size: u32, dir: &Path, name: &str) -> Result<(), CoreError>;
    /// Tell the Mac side that the disk it asked for now exists.
    fn notify_disk_created(&self);
}

/// Callback handle the Core uses from its own thread.
///
/// Every callback is queued for the interaction thread and returns at once.
/// Nothing is acknowledged; if the interaction side is gone the event is
/// dropped.
#[derive(Clone)]
pub struct CoreEvents {
    tx: Sender<UiEvent>,
}

impl CoreEvents {
    pub(crate) fn new(tx: Sender<UiEvent>) -> Self {
        Self { tx }
    }

    /// The Mac screen is `width` × `height`.
    pub fn init_screen(&self, width: u32, height: u32) {
        self.post(UiEvent::InitScreen { width, height });
    }

    /// A region of the screen changed. `pixels` covers exactly the region.
    pub fn update_screen(&self, pixels: Vec<u8>, top: u32, left: u32, bottom: u32, right: u32) {
        self.post(UiEvent::UpdateScreen {
            pixels,
            region: ScreenRegion::new(top, left, bottom, right),
        });
    }

    pub fn disk_inserted(&self, path: impl Into<PathBuf>) {
        self.post(UiEvent::DiskInserted(path.into()));
    }

    pub fn disk_ejected(&self, path: impl Into<PathBuf>) {
        self.post(UiEvent::DiskEjected(path.into()));
    }

    /// The Mac asked for a new blank disk.
    pub fn create_disk(&self, size: u32, filename: impl Into<String>) {
        self.post(UiEvent::CreateDisk {
            size,
            filename: filename.into(),
        });
    }

    fn post(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("interaction thread gone, dropping core event");
        }
    }
}
