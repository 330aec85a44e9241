//! Where ROMs and disk images live.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// File storage the session needs. Injected so tests can substitute it.
pub trait Storage {
    /// Location of the ROM with the given logical name.
    fn rom_path(&self, name: &str) -> PathBuf;
    /// Contents of the ROM with the given logical name.
    fn read_rom(&self, name: &str) -> io::Result<Vec<u8>>;
    /// Open a file the user picked for import.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;
    /// Disk images the user can insert, sorted by file name.
    fn available_disks(&self) -> Vec<PathBuf>;
    /// Directory picked disks are imported for, if storage is mounted.
    fn disks_dir(&self) -> Option<PathBuf>;
    /// Shared directory for new and exported disk images.
    fn download_dir(&self) -> PathBuf;
    fn is_in_downloads(&self, path: &Path) -> bool;
    /// Working copy location for an imported file called `name`.
    fn cache_file(&self, name: &str) -> PathBuf;
    /// Copy `src` to `dst`, replacing any previous copy.
    fn copy_into(&self, src: &mut dyn Read, dst: &Path) -> io::Result<u64>;
    fn mark_read_only(&self, path: &Path) -> io::Result<()>;
}

/// Storage rooted in plain directories.
#[derive(Debug, Clone)]
pub struct FsStorage {
    rom_dir: PathBuf,
    disks_dir: Option<PathBuf>,
    download_dir: PathBuf,
    cache_dir: PathBuf,
}

impl FsStorage {
    /// Conventional layout under `root`: `roms/`, `disks/`, `downloads/`,
    /// `cache/`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            rom_dir: root.join("roms"),
            disks_dir: Some(root.join("disks")),
            download_dir: root.join("downloads"),
            cache_dir: root.join("cache"),
        }
    }

    #[must_use]
    pub fn with_disks_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.disks_dir = dir;
        self
    }

    #[must_use]
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }
}

impl Storage for FsStorage {
    fn rom_path(&self, name: &str) -> PathBuf {
        self.rom_dir.join(name)
    }

    fn read_rom(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.rom_path(name))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn available_disks(&self) -> Vec<PathBuf> {
        let mut disks: Vec<PathBuf> = self
            .disks_dir
            .iter()
            .chain(std::iter::once(&self.download_dir))
            .flat_map(|dir| list_images(dir))
            .collect();
        disks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        disks.dedup();
        disks
    }

    fn disks_dir(&self) -> Option<PathBuf> {
        self.disks_dir.clone()
    }

    fn download_dir(&self) -> PathBuf {
        self.download_dir.clone()
    }

    fn is_in_downloads(&self, path: &Path) -> bool {
        path.starts_with(&self.download_dir)
    }

    fn cache_file(&self, name: &str) -> PathBuf {
        // Only the final component: a picked file's name must not escape the
        // cache directory.
        let file_name = Path::new(name)
            .file_name()
            .map_or_else(|| "disk.img".into(), |n| n.to_os_string());
        self.cache_dir.join(file_name)
    }

    fn copy_into(&self, src: &mut dyn Read, dst: &Path) -> io::Result<u64> {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        // A previous import left a read-only file here.
        if let Err(e) = fs::remove_file(dst)
            && e.kind() != io::ErrorKind::NotFound
        {
            return Err(e);
        }
        let mut out = File::create(dst)?;
        io::copy(src, &mut out)
    }

    fn mark_read_only(&self, path: &Path) -> io::Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(true);
        fs::set_permissions(path, perms)
    }
}

/// Regular, non-hidden files in `dir`. A missing directory is empty.
fn list_images(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.'))
        })
        .collect()
}
