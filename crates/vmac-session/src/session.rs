//! Emulation lifecycle.
//!
//! One session owns one Core and the single worker thread that runs it:
//!
//! ```text
//! NotStarted ──start──▶ Starting ──run loop begins──▶ Running ⇄ Paused
//!      ▲                                                 │        │
//!      └── ROM unreadable (settings opened)              └──┬─────┘
//!                                                  run loop returns
//!                                                           ▼
//!                                                       Terminated
//! ```
//!
//! Everything here runs on the interaction thread. The worker talks back only
//! through the event queue, which [`LifecycleCoordinator::pump`] drains.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::core::{Core, CoreEvents};
use crate::disk::{self, DiskHandle, DiskId, DiskMenu};
use crate::error::SessionError;
use crate::event::{self, ExitNotice, UiEvent};
use crate::prefs::Preferences;
use crate::shell::{SettingsOutcome, Shell, SubFlow};
use crate::storage::Storage;
use crate::surface::{CorePointer, InteractionSurface};

/// Name of the emulation worker thread.
pub const WORKER_NAME: &str = "EmulationThread";

/// Default logical ROM name.
pub const DEFAULT_ROM_NAME: &str = "vMac.ROM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    NotStarted,
    Starting,
    Running,
    Paused,
    Terminated,
}

/// Decides whether a pause may also power the Mac off, given the sub-flow
/// (if any) that is covering the surface.
#[derive(Clone)]
pub struct PowerOffPolicy {
    allows: Arc<dyn Fn(Option<SubFlow>) -> bool + Send + Sync>,
}

impl PowerOffPolicy {
    pub fn new(allows: impl Fn(Option<SubFlow>) -> bool + Send + Sync + 'static) -> Self {
        Self {
            allows: Arc::new(allows),
        }
    }

    /// Never power off on pause.
    #[must_use]
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    #[must_use]
    pub fn allows(&self, sub_flow: Option<SubFlow>) -> bool {
        (self.allows)(sub_flow)
    }
}

impl Default for PowerOffPolicy {
    /// Power off only when no sub-flow is open: the user has left for good.
    fn default() -> Self {
        Self::new(|sub_flow| sub_flow.is_none())
    }
}

impl fmt::Debug for PowerOffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerOffPolicy").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Logical ROM name handed to storage.
    pub rom_name: String,
    pub power_off: PowerOffPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rom_name: DEFAULT_ROM_NAME.to_string(),
            power_off: PowerOffPolicy::default(),
        }
    }
}

/// Builds the Core when the session starts.
pub type CoreFactory = Box<dyn Fn() -> Arc<dyn Core>>;

/// Drives one emulation session from the interaction thread.
pub struct LifecycleCoordinator {
    config: SessionConfig,
    factory: CoreFactory,
    storage: Box<dyn Storage>,
    surface: Box<dyn InteractionSurface>,
    shell: Box<dyn Shell>,
    state: SessionState,
    core: Option<Arc<dyn Core>>,
    worker: Option<JoinHandle<()>>,
    tx: Sender<UiEvent>,
    rx: Receiver<UiEvent>,
    sub_flow: Option<SubFlow>,
    prefs: Preferences,
}

impl LifecycleCoordinator {
    /// Create an idle session and apply the shell's display preferences.
    pub fn new(
        config: SessionConfig,
        factory: CoreFactory,
        storage: Box<dyn Storage>,
        surface: Box<dyn InteractionSurface>,
        shell: Box<dyn Shell>,
    ) -> Self {
        let (tx, rx) = event::queue();
        let mut session = Self {
            config,
            factory,
            storage,
            surface,
            shell,
            state: SessionState::NotStarted,
            core: None,
            worker: None,
            tx,
            rx,
            sub_flow: None,
            prefs: Preferences::default(),
        };
        session.apply_preferences();
        session
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The worker has finished; the host should shut down.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// The Core, once the session has started.
    #[must_use]
    pub fn core(&self) -> Option<&Arc<dyn Core>> {
        self.core.as_ref()
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    #[must_use]
    pub fn sub_flow(&self) -> Option<SubFlow> {
        self.sub_flow
    }

    pub fn surface_mut(&mut self) -> &mut dyn InteractionSurface {
        self.surface.as_mut()
    }

    pub fn shell_mut(&mut self) -> &mut dyn Shell {
        self.shell.as_mut()
    }

    /// Load the ROM and start the Core on its worker.
    ///
    /// Ignored unless the session has never started. An unreadable ROM opens
    /// the settings screen instead and leaves the session `NotStarted`.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            log::debug!("start ignored in state {:?}", self.state);
            return Ok(());
        }

        let rom_path = self.storage.rom_path(&self.config.rom_name);
        let rom = match self.storage.read_rom(&self.config.rom_name) {
            Ok(rom) => rom,
            Err(source) => {
                log::warn!("cannot read ROM {}: {source}", rom_path.display());
                self.open_settings();
                return Err(SessionError::RomUnreadable {
                    path: rom_path,
                    source,
                });
            }
        };
        log::info!("loaded {}-byte ROM from {}", rom.len(), rom_path.display());

        let core = (self.factory)();
        self.surface
            .set_pointer_sink(Box::new(CorePointer::new(Arc::clone(&core))));
        let events = CoreEvents::new(self.tx.clone());
        let tx = self.tx.clone();
        let worker_core = Arc::clone(&core);

        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                // Exited goes out even if the run loop unwinds.
                let _notice = ExitNotice::new(tx.clone());
                let _ = tx.send(UiEvent::Started);
                worker_core.run(rom, events);
            })
            .map_err(SessionError::WorkerSpawn)?;

        self.core = Some(core);
        self.worker = Some(worker);
        self.state = SessionState::Starting;
        self.shell.invalidate_menu();
        Ok(())
    }

    /// The surface is no longer visible.
    ///
    /// Suspends the Core. With no disk inserted and nothing but the user's
    /// departure hiding the surface (per the power-off policy), also asks the
    /// Mac to shut down.
    pub fn pause(&mut self) {
        let Some(core) = self.core.as_ref() else {
            return;
        };
        match self.state {
            SessionState::Starting | SessionState::Running => {
                core.pause_emulation();
                self.state = SessionState::Paused;
                log::info!("emulation paused");
            }
            _ => return,
        }

        if !core.has_disks_inserted() && self.config.power_off.allows(self.sub_flow) {
            log::info!("no disks inserted, requesting power off");
            core.request_power_off();
        }
    }

    /// The surface is visible again.
    pub fn resume(&mut self) {
        if self.state != SessionState::Paused {
            return;
        }
        if let Some(core) = self.core.as_ref() {
            core.resume_emulation();
            self.state = SessionState::Running;
            log::info!("emulation resumed");
        }
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        self.active_core("reset")?.want_reset();
        Ok(())
    }

    pub fn interrupt(&self) -> Result<(), SessionError> {
        self.active_core("interrupt")?.want_interrupt();
        Ok(())
    }

    /// Ask the Mac to power off. The session ends when the run loop returns.
    pub fn shutdown(&self) {
        if let Some(core) = self.core.as_ref()
            && self.state != SessionState::Terminated
        {
            core.request_power_off();
        }
    }

    fn active_core(&self, what: &'static str) -> Result<&Arc<dyn Core>, SessionError> {
        match (self.state, self.core.as_ref()) {
            (SessionState::Running | SessionState::Paused, Some(core)) => Ok(core),
            _ => Err(SessionError::NotRunning(what)),
        }
    }

    /// Current disk menu. Inserted state comes straight from the Core.
    #[must_use]
    pub fn disk_menu(&self) -> DiskMenu {
        let can_import = self.storage.disks_dir().is_some();
        let core = self.core.as_ref();
        DiskMenu::build(self.storage.available_disks(), can_import, |path| {
            core.is_some_and(|core| core.is_disk_inserted(path))
        })
    }

    /// Insert the disk a menu entry refers to. Returns whether it was found.
    pub fn select_disk(&mut self, id: DiskId) -> bool {
        let Some(handle) = disk::resolve(self.storage.available_disks(), id) else {
            log::warn!("disk {:#010X} no longer available", id.value());
            return false;
        };
        match self.insert_disk(&handle) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("cannot insert {}: {e}", handle.file_name());
                false
            }
        }
    }

    /// Forward an insert request. The Core rejects duplicates itself.
    pub fn insert_disk(&self, handle: &DiskHandle) -> Result<(), SessionError> {
        let core = self
            .core
            .as_ref()
            .ok_or(SessionError::NotRunning("insert disk"))?;
        log::info!("inserting {}", handle.path().display());
        core.insert_disk(handle.path());
        Ok(())
    }

    /// Open the file picker to import a disk image.
    pub fn begin_import(&mut self) -> Result<(), SessionError> {
        if self.storage.disks_dir().is_none() {
            return Err(SessionError::NoDisksDirectory);
        }
        self.sub_flow = Some(SubFlow::FilePicker);
        self.shell.open_file_picker();
        Ok(())
    }

    /// The file picker closed with `picked` (or nothing).
    ///
    /// Copies the file into the cache, makes the copy read-only and inserts
    /// it. Failures are logged and abandon the import.
    pub fn finish_import(&mut self, picked: Option<&Path>) -> Option<DiskHandle> {
        self.sub_flow = None;
        let Some(picked) = picked else {
            log::info!("no file was selected");
            return None;
        };
        match self.import(picked) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("import failed: {e}");
                None
            }
        }
    }

    fn import(&self, picked: &Path) -> Result<DiskHandle, SessionError> {
        let mut src = self.storage.open(picked).map_err(|source| SessionError::ImportOpen {
            path: picked.to_path_buf(),
            source,
        })?;
        let name = picked
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let dst = self.storage.cache_file(name);
        let copy_err = |source| SessionError::ImportCopy {
            path: picked.to_path_buf(),
            source,
        };
        self.storage
            .copy_into(src.as_mut(), &dst)
            .map_err(copy_err)?;
        self.storage.mark_read_only(&dst).map_err(copy_err)?;

        let handle = DiskHandle::new(dst.clone()).ok_or_else(|| {
            copy_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unusable cache path {}", dst.display()),
            ))
        })?;
        self.insert_disk(&handle)?;
        Ok(handle)
    }

    /// Show the settings screen.
    pub fn open_settings(&mut self) {
        self.sub_flow = Some(SubFlow::Settings);
        self.shell.open_settings();
    }

    /// The settings screen closed.
    ///
    /// Preferences are re-read first. A session that never started
    /// (typically: no ROM) then tries again.
    pub fn finish_settings(&mut self, outcome: SettingsOutcome) {
        self.sub_flow = None;
        self.apply_preferences();

        if self.state == SessionState::NotStarted {
            if let Err(e) = self.start() {
                log::warn!("emulator still not started: {e}");
            }
            return;
        }

        let result = match outcome {
            SettingsOutcome::Reset => self.reset(),
            SettingsOutcome::Interrupt => self.interrupt(),
            SettingsOutcome::About => {
                self.shell.show_about();
                Ok(())
            }
            SettingsOutcome::Closed => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("settings action {outcome:?} dropped: {e}");
        }
        self.shell.invalidate_menu();
    }

    /// Re-read display preferences from the shell and push them to the
    /// surface.
    pub fn apply_preferences(&mut self) {
        self.prefs = self.shell.preferences();
        self.surface.set_scaled(self.prefs.scale);
        self.surface.set_scroll(self.prefs.scroll);
    }

    /// Handle every queued Core event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for a Core event, then drain the queue.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.dispatch(event);
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Pump until `done` holds or `timeout` passes without any event.
    pub fn pump_until(&mut self, timeout: Duration, mut done: impl FnMut(&Self) -> bool) -> bool {
        while !done(self) {
            if self.pump_timeout(timeout) == 0 {
                return done(self);
            }
        }
        true
    }

    fn dispatch(&mut self, event: UiEvent) {
        if let Err(e) = self.handle(event) {
            log::error!("core event failed: {e}");
        }
    }

    fn handle(&mut self, event: UiEvent) -> Result<(), SessionError> {
        match event {
            UiEvent::Started => {
                if self.state == SessionState::Starting {
                    self.state = SessionState::Running;
                    log::info!("emulation running");
                }
            }
            UiEvent::InitScreen { width, height } => {
                log::debug!("mac screen {width}x{height}");
                self.surface.set_target_screen_size(width, height);
            }
            UiEvent::UpdateScreen { pixels, region } => {
                self.surface.update_screen(&pixels, region);
            }
            UiEvent::DiskInserted(path) => {
                log::info!("disk inserted: {}", path.display());
                self.shell.invalidate_menu();
            }
            UiEvent::DiskEjected(path) => {
                log::info!("disk ejected: {}", path.display());
                self.share_if_exported(&path);
                self.shell.invalidate_menu();
            }
            UiEvent::CreateDisk { size, filename } => {
                let core = self
                    .core
                    .as_ref()
                    .ok_or(SessionError::NotRunning("disk creation"))?;
                let dir = self.storage.download_dir();
                core.make_new_disk(size, &dir, &filename)?;
                core.notify_disk_created();
                log::info!("created {size}-byte disk {filename}");
                self.shell.invalidate_menu();
            }
            UiEvent::Exited => self.terminate(),
        }
        Ok(())
    }

    fn share_if_exported(&mut self, path: &Path) {
        if !self.storage.is_in_downloads(path) {
            return;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_owned();
        self.shell.share_file(path, &name);
    }

    fn terminate(&mut self) {
        self.state = SessionState::Terminated;
        log::info!("emulation worker finished");
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::error!("emulation worker panicked");
        }
    }
}
