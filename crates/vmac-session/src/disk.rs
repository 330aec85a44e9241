//! Disk images and the disk menu.
//!
//! The session never remembers which disks are inserted; the Core is the only
//! owner of that set. The menu is rebuilt from storage plus a fresh query of
//! the Core every time it is shown.

use std::path::{Path, PathBuf};

/// A disk image on external storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiskHandle {
    path: PathBuf,
    file_name: String,
}

impl DiskHandle {
    /// `None` for paths without a UTF-8 file name.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_str()?.to_owned();
        Some(Self { path, file_name })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name up to its last dot.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(0) | None => &self.file_name,
            Some(dot) => &self.file_name[..dot],
        }
    }

    #[must_use]
    pub fn id(&self) -> DiskId {
        DiskId::of(&self.file_name)
    }
}

/// Menu identity of a disk, derived from its file name.
///
/// Stable across menu rebuilds, so a selection still resolves after storage
/// has been re-enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiskId(u32);

impl DiskId {
    /// 32-bit FNV-1a of the file name.
    #[must_use]
    pub fn of(file_name: &str) -> Self {
        let mut hash: u32 = 0x811C_9DC5;
        for byte in file_name.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        Self(hash)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// One insertable disk in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskMenuItem {
    pub id: DiskId,
    pub label: String,
    /// False while the Core reports the disk inserted.
    pub enabled: bool,
    pub handle: DiskHandle,
}

/// The "insert disk" menu: an import entry followed by the known disks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskMenu {
    /// Whether the "import file" entry leads anywhere.
    pub can_import: bool,
    pub disks: Vec<DiskMenuItem>,
}

impl DiskMenu {
    /// Build the menu from `paths`. `inserted` is asked once per disk.
    pub fn build(
        paths: Vec<PathBuf>,
        can_import: bool,
        mut inserted: impl FnMut(&Path) -> bool,
    ) -> Self {
        let disks = paths
            .into_iter()
            .filter_map(DiskHandle::new)
            .map(|handle| DiskMenuItem {
                id: handle.id(),
                label: handle.display_name().to_owned(),
                enabled: !inserted(handle.path()),
                handle,
            })
            .collect();
        Self { can_import, disks }
    }

    #[must_use]
    pub fn find(&self, id: DiskId) -> Option<&DiskMenuItem> {
        self.disks.iter().find(|item| item.id == id)
    }
}

/// First disk among `paths` whose identity is `id`.
pub fn resolve(paths: Vec<PathBuf>, id: DiskId) -> Option<DiskHandle> {
    paths
        .into_iter()
        .filter_map(DiskHandle::new)
        .find(|handle| handle.id() == id)
}
