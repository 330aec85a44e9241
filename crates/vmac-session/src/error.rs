//! Session error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::CoreError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("ROM {} is unreadable: {source}", path.display())]
    RomUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to spawn emulation worker: {0}")]
    WorkerSpawn(#[source] io::Error),
    #[error("{0} needs a running emulator")]
    NotRunning(&'static str),
    #[error("unable to open file {}: {source}", path.display())]
    ImportOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to copy file {}: {source}", path.display())]
    ImportCopy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no disks directory is available")]
    NoDisksDirectory,
    #[error(transparent)]
    Core(#[from] CoreError),
}
