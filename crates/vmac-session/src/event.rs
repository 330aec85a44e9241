//! Worker → interaction thread messages.
//!
//! The worker only ever sends; the interaction thread drains the queue one
//! message at a time in arrival order. The queue is unbounded so a sender
//! never waits on the interaction thread.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};

use crate::surface::ScreenRegion;

#[derive(Debug)]
pub(crate) enum UiEvent {
    /// The Core's run loop is about to start.
    Started,
    InitScreen {
        width: u32,
        height: u32,
    },
    UpdateScreen {
        pixels: Vec<u8>,
        region: ScreenRegion,
    },
    DiskInserted(PathBuf),
    DiskEjected(PathBuf),
    CreateDisk {
        size: u32,
        filename: String,
    },
    /// The run loop returned (or the worker died). Always the last message.
    Exited,
}

pub(crate) fn queue() -> (Sender<UiEvent>, Receiver<UiEvent>) {
    crossbeam_channel::unbounded()
}

/// Sends [`UiEvent::Exited`] when dropped, so the interaction thread learns
/// about the end of the worker even if the Core panics.
pub(crate) struct ExitNotice {
    tx: Sender<UiEvent>,
}

impl ExitNotice {
    pub(crate) fn new(tx: Sender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.tx.send(UiEvent::Exited);
    }
}
