//! Build Actor - Coalescing Rebuilds
//!
//! Turns `Rebuild` requests into in-memory builds:
//! - One build in flight at a time, follow-ups coalesced by [`BuildQueue`]
//! - Success: store the bundle, then announce it to the WsActor
//! - Failure: report diagnostics, leave the store untouched
//!
//! The bundler runs on the blocking pool, so requests keep arriving (and
//! coalescing) while it works.

mod dispatch;
mod queue;
mod tasks;


pub use queue::BuildQueue;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::{BuildMsg, WsMsg};
use crate::artifact::ArtifactStore;
use crate::build::{BuildOrchestrator, BuildResult};

pub(super) type BuildTask = JoinHandle<BuildResult>;

pub struct BuildActor {
    rx: mpsc::Receiver<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    orchestrator: BuildOrchestrator,
    store: Arc<ArtifactStore>,
    queue: BuildQueue,
    /// Changes seen since the running build started
    pending_changes: Vec<PathBuf>,
    /// Re-read `[menu]` before each build
    reload_menu: bool,
}

impl BuildActor {
    pub fn new(
        rx: mpsc::Receiver<BuildMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        orchestrator: BuildOrchestrator,
        store: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            rx,
            ws_tx,
            orchestrator,
            store,
            queue: BuildQueue::default(),
            pending_changes: Vec::new(),
            reload_menu: true,
        }
    }

    /// Build with the `[menu]` loaded at start-up instead of re-reading it.
    pub fn with_fixed_menu(mut self) -> Self {
        self.reload_menu = false;
        self
    }
}
