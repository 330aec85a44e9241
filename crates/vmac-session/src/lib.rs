//! Emulation session for the Macintosh emulator front-end.
//!
//! Runs the emulator Core on a dedicated worker thread and keeps every other
//! piece of state on the single interaction thread:
//!
//! - [`LifecycleCoordinator`] starts the Core once, ties pause/resume and
//!   power-off to visibility, and drains Core callbacks in arrival order.
//! - [`Frontend`] routes hardware keys, trackball motion and the on-screen
//!   keyboard.
//! - [`Storage`], [`Shell`] and [`InteractionSurface`] are the host's side,
//!   injected at construction.

pub mod core;
pub mod disk;
pub mod error;
mod event;
pub mod frontend;
pub mod prefs;
pub mod session;
pub mod shell;
pub mod storage;
pub mod surface;

pub use crate::core::{Core, CoreError, CoreEvents};
pub use disk::{DiskHandle, DiskId, DiskMenu, DiskMenuItem};
pub use error::SessionError;
pub use frontend::Frontend;
pub use prefs::{Preferences, PrefsError};
pub use session::{
    CoreFactory, DEFAULT_ROM_NAME, LifecycleCoordinator, PowerOffPolicy, SessionConfig,
    SessionState, WORKER_NAME,
};
pub use shell::{SettingsOutcome, Shell, SubFlow};
pub use storage::{FsStorage, Storage};
pub use surface::{CorePointer, InteractionSurface, PointerSink, ScreenRegion};

pub use vmac_input;
