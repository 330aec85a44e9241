//! Test doubles shared by the integration tests.
//!
//! `FakeCore` runs on the real emulation worker and blocks in `run` until it
//! is powered off. Its `CoreEvents` handle is handed back to the test so
//! callbacks can be fired from the test thread, which is a different thread
//! from the one that drains them.

#![allow(dead_code)]

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use vmac_session::vmac_input::{KeySink, ScrollDirection, ScrollSink};
use vmac_session::{
    Core, CoreError, CoreEvents, FsStorage, InteractionSurface, LifecycleCoordinator,
    PointerSink, Preferences, ScreenRegion, SessionConfig, SessionState, Shell, Storage,
};

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const ROM: &[u8] = b"\x4E\xFA\x00\x2C fake rom";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(usize),
    Pause,
    Resume,
    Reset,
    Interrupt,
    PowerOff,
    KeyDown(u8),
    KeyUp(u8),
    MouseAt(i32, i32),
    MouseButton(bool),
    Insert(PathBuf),
    MakeDisk(u32, PathBuf, String),
    DiskCreated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Block until powered off.
    #[default]
    UntilPowerOff,
    /// Panic as soon as the run loop starts.
    Panic,
}

pub struct FakeCore {
    calls: Mutex<Vec<Call>>,
    inserted: Mutex<Vec<PathBuf>>,
    mode: RunMode,
    fail_make_disk: bool,
    off_tx: Sender<()>,
    off_rx: Receiver<()>,
    events_tx: Sender<CoreEvents>,
    events_rx: Receiver<CoreEvents>,
}

impl FakeCore {
    pub fn new(mode: RunMode, fail_make_disk: bool) -> Self {
        let (off_tx, off_rx) = crossbeam_channel::unbounded();
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        Self {
            calls: Mutex::new(Vec::new()),
            inserted: Mutex::new(Vec::new()),
            mode,
            fail_make_disk,
            off_tx,
            off_rx,
            events_tx,
            events_rx,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn runs(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Run(_)))
            .count()
    }

    /// Callback handle the run loop was given. Waits for the loop to start.
    pub fn events(&self) -> CoreEvents {
        self.events_rx
            .recv_timeout(TIMEOUT)
            .expect("run loop never started")
    }

    pub fn power_off_now(&self) {
        let _ = self.off_tx.send(());
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl KeySink for FakeCore {
    fn key_down(&self, code: u8) {
        self.record(Call::KeyDown(code));
    }

    fn key_up(&self, code: u8) {
        self.record(Call::KeyUp(code));
    }
}

impl Core for FakeCore {
    fn run(&self, rom: Vec<u8>, events: CoreEvents) {
        self.record(Call::Run(rom.len()));
        if self.mode == RunMode::Panic {
            panic!("core crashed");
        }
        let _ = self.events_tx.send(events);
        let _ = self.off_rx.recv();
    }

    fn pause_emulation(&self) {
        self.record(Call::Pause);
    }

    fn resume_emulation(&self) {
        self.record(Call::Resume);
    }

    fn want_reset(&self) {
        self.record(Call::Reset);
    }

    fn want_interrupt(&self) {
        self.record(Call::Interrupt);
    }

    fn request_power_off(&self) {
        self.record(Call::PowerOff);
        self.power_off_now();
    }

    fn set_mouse_position(&self, x: i32, y: i32) {
        self.record(Call::MouseAt(x, y));
    }

    fn set_mouse_button(&self, down: bool) {
        self.record(Call::MouseButton(down));
    }

    fn insert_disk(&self, path: &Path) {
        self.record(Call::Insert(path.to_path_buf()));
        let mut inserted = self.inserted.lock().expect("inserted lock");
        if !inserted.iter().any(|p| p == path) {
            inserted.push(path.to_path_buf());
        }
    }

    fn is_disk_inserted(&self, path: &Path) -> bool {
        self.inserted
            .lock()
            .expect("inserted lock")
            .iter()
            .any(|p| p == path)
    }

    fn has_disks_inserted(&self) -> bool {
        !self.inserted.lock().expect("inserted lock").is_empty()
    }

    fn make_new_disk(&self, size: u32, dir: &Path, name: &str) -> Result<(), CoreError> {
        self.record(Call::MakeDisk(size, dir.to_path_buf(), name.to_string()));
        if self.fail_make_disk {
            return Err(CoreError::DiskCreation {
                size,
                dir: dir.to_path_buf(),
                name: name.to_string(),
                reason: "disk full".to_string(),
            });
        }
        fs::create_dir_all(dir).expect("download dir");
        fs::write(dir.join(name), vec![0; size as usize]).expect("blank disk");
        Ok(())
    }

    fn notify_disk_created(&self) {
        self.record(Call::DiskCreated);
    }
}

#[derive(Default)]
pub struct SurfaceLog {
    pub target_size: Option<(u32, u32)>,
    pub updates: Vec<(Vec<u8>, ScreenRegion)>,
    pub scaled: Option<bool>,
    pub scroll: Option<bool>,
    pub scrolls: Vec<(ScrollDirection, u32)>,
    pub pointer: Option<Box<dyn PointerSink>>,
}

pub struct FakeSurface(pub Arc<Mutex<SurfaceLog>>);

impl ScrollSink for FakeSurface {
    fn scroll_screen(&mut self, direction: ScrollDirection, amount: u32) {
        self.0.lock().expect("surface lock").scrolls.push((direction, amount));
    }
}

impl InteractionSurface for FakeSurface {
    fn set_target_screen_size(&mut self, width: u32, height: u32) {
        self.0.lock().expect("surface lock").target_size = Some((width, height));
    }

    fn update_screen(&mut self, pixels: &[u8], region: ScreenRegion) {
        self.0
            .lock()
            .expect("surface lock")
            .updates
            .push((pixels.to_vec(), region));
    }

    fn set_scaled(&mut self, scaled: bool) {
        self.0.lock().expect("surface lock").scaled = Some(scaled);
    }

    fn set_scroll(&mut self, scroll: bool) {
        self.0.lock().expect("surface lock").scroll = Some(scroll);
    }

    fn set_pointer_sink(&mut self, sink: Box<dyn PointerSink>) {
        self.0.lock().expect("surface lock").pointer = Some(sink);
    }
}

#[derive(Debug, Default)]
pub struct ShellLog {
    pub settings_opened: usize,
    pub pickers_opened: usize,
    pub menu_invalidations: usize,
    pub shared: Vec<(PathBuf, String)>,
    pub about_shown: usize,
    pub prefs: Preferences,
}

pub struct FakeShell(pub Arc<Mutex<ShellLog>>);

impl Shell for FakeShell {
    fn open_settings(&mut self) {
        self.0.lock().expect("shell lock").settings_opened += 1;
    }

    fn open_file_picker(&mut self) {
        self.0.lock().expect("shell lock").pickers_opened += 1;
    }

    fn invalidate_menu(&mut self) {
        self.0.lock().expect("shell lock").menu_invalidations += 1;
    }

    fn share_file(&mut self, path: &Path, name: &str) {
        self.0
            .lock()
            .expect("shell lock")
            .shared
            .push((path.to_path_buf(), name.to_string()));
    }

    fn show_about(&mut self) {
        self.0.lock().expect("shell lock").about_shown += 1;
    }

    fn preferences(&self) -> Preferences {
        self.0.lock().expect("shell lock").prefs
    }
}

/// Real directories, with reads that can be made to fail.
pub struct FaultyStorage {
    inner: FsStorage,
    fail_rom_read: bool,
    fail_open: bool,
}

fn denied() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "access denied")
}

impl Storage for FaultyStorage {
    fn rom_path(&self, name: &str) -> PathBuf {
        self.inner.rom_path(name)
    }

    fn read_rom(&self, name: &str) -> io::Result<Vec<u8>> {
        if self.fail_rom_read {
            return Err(denied());
        }
        self.inner.read_rom(name)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        if self.fail_open {
            return Err(denied());
        }
        self.inner.open(path)
    }

    fn available_disks(&self) -> Vec<PathBuf> {
        self.inner.available_disks()
    }

    fn disks_dir(&self) -> Option<PathBuf> {
        self.inner.disks_dir()
    }

    fn download_dir(&self) -> PathBuf {
        self.inner.download_dir()
    }

    fn is_in_downloads(&self, path: &Path) -> bool {
        self.inner.is_in_downloads(path)
    }

    fn cache_file(&self, name: &str) -> PathBuf {
        self.inner.cache_file(name)
    }

    fn copy_into(&self, src: &mut dyn Read, dst: &Path) -> io::Result<u64> {
        self.inner.copy_into(src, dst)
    }

    fn mark_read_only(&self, path: &Path) -> io::Result<()> {
        self.inner.mark_read_only(path)
    }
}

/// Knobs for [`Rig::build`].
#[derive(Clone)]
pub struct RigOptions {
    pub with_rom: bool,
    pub with_disks_dir: bool,
    pub fail_rom_read: bool,
    pub fail_open: bool,
    pub mode: RunMode,
    pub fail_make_disk: bool,
    pub prefs: Preferences,
    pub config: SessionConfig,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            with_rom: true,
            with_disks_dir: true,
            fail_rom_read: false,
            fail_open: false,
            mode: RunMode::default(),
            fail_make_disk: false,
            prefs: Preferences::default(),
            config: SessionConfig::default(),
        }
    }
}

/// Everything a test inspects after handing the session its collaborators.
pub struct Rig {
    pub root: PathBuf,
    pub core: Arc<FakeCore>,
    pub built: Arc<AtomicUsize>,
    pub surface: Arc<Mutex<SurfaceLog>>,
    pub shell: Arc<Mutex<ShellLog>>,
}

impl Rig {
    pub fn build(name: &str, options: RigOptions) -> (LifecycleCoordinator, Self) {
        let root = std::env::temp_dir().join(format!(
            "vmac-session-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("disks")).expect("disks dir");
        fs::create_dir_all(root.join("downloads")).expect("downloads dir");
        if options.with_rom {
            fs::create_dir_all(root.join("roms")).expect("rom dir");
            fs::write(root.join("roms").join("vMac.ROM"), ROM).expect("rom");
        }

        let mut inner = FsStorage::new(&root);
        if !options.with_disks_dir {
            inner = inner.with_disks_dir(None);
        }
        let storage = FaultyStorage {
            inner,
            fail_rom_read: options.fail_rom_read,
            fail_open: options.fail_open,
        };

        let core = Arc::new(FakeCore::new(options.mode, options.fail_make_disk));
        let built = Arc::new(AtomicUsize::new(0));
        let surface = Arc::new(Mutex::new(SurfaceLog::default()));
        let shell = Arc::new(Mutex::new(ShellLog {
            prefs: options.prefs,
            ..ShellLog::default()
        }));

        let factory = {
            let core = Arc::clone(&core);
            let built = Arc::clone(&built);
            Box::new(move || {
                built.fetch_add(1, Ordering::SeqCst);
                Arc::clone(&core) as Arc<dyn Core>
            })
        };

        let session = LifecycleCoordinator::new(
            options.config,
            factory,
            Box::new(storage),
            Box::new(FakeSurface(Arc::clone(&surface))),
            Box::new(FakeShell(Arc::clone(&shell))),
        );
        let rig = Self {
            root,
            core,
            built,
            surface,
            shell,
        };
        (session, rig)
    }

    pub fn cores_built(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }

    pub fn shell(&self) -> std::sync::MutexGuard<'_, ShellLog> {
        self.shell.lock().expect("shell lock")
    }

    pub fn surface(&self) -> std::sync::MutexGuard<'_, SurfaceLog> {
        self.surface.lock().expect("surface lock")
    }

    pub fn write_disk(&self, dir: &str, name: &str) -> PathBuf {
        let path = self.root.join(dir).join(name);
        fs::write(&path, b"disk image").expect("disk image");
        path
    }
}

impl Drop for Rig {
    fn drop(&mut self) {
        self.core.power_off_now();
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Start the session and wait until the run loop is up.
pub fn start_running(session: &mut LifecycleCoordinator, rig: &Rig) -> CoreEvents {
    session.start().expect("start");
    let events = rig.core.events();
    assert!(session.pump_until(TIMEOUT, |s| s.state() == SessionState::Running));
    events
}
