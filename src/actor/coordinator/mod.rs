//! Actor Coordinator - Wires up the Dev Loop
//!
//! The Coordinator is a thin orchestrator that:
//! - Starts the push server (and with it the WsActor)
//! - Creates the FsActor and BuildActor and connects them
//! - Requests the initial build
//!
//! The returned [`DevSession`] owns every running piece and tears them down
//! in order when asked to stop.

mod runtime;
mod watch_paths;


use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::builder::BuildActor;
use super::fs::FsActor;
use super::messages::BuildMsg;
use crate::artifact::ArtifactStore;
use crate::build::{BuildOrchestrator, Bundler};
use crate::config::ProjectConfig;
use crate::reload::{PushServer, PushServerHandle};

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<ProjectConfig>,
    bundler: Option<Arc<dyn Bundler>>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<ProjectConfig>) -> Self {
        Self {
            config,
            bundler: None,
            shutdown_rx: None,
        }
    }

    /// Use `bundler` instead of the command from `[build]`.
    pub fn with_bundler(mut self, bundler: Arc<dyn Bundler>) -> Self {
        self.bundler = Some(bundler);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Start every actor and request the initial build.
    pub async fn start(self) -> Result<DevSession> {
        let store = Arc::new(ArtifactStore::new());
        let push = PushServer::start(self.config.dev.port, Arc::clone(&store))
            .context("failed to start push server")?;

        let (build_tx, build_rx) = mpsc::channel::<BuildMsg>(CHANNEL_BUFFER);

        let fs_actor = match FsActor::new(
            watch_paths::collect_watch_roots(&self.config),
            watch_paths::watch_scope(&self.config),
            build_tx.clone(),
        ) {
            Ok(actor) => actor,
            Err(e) => {
                push.stop().await;
                return Err(anyhow::anyhow!("watcher failed: {}", e));
            }
        };

        let orchestrator = match self.bundler {
            Some(bundler) => BuildOrchestrator::new(Arc::clone(&self.config), bundler),
            None => BuildOrchestrator::from_config(Arc::clone(&self.config)),
        };
        let build_actor = BuildActor::new(build_rx, push.sender(), orchestrator, Arc::clone(&store));

        crate::debug!("actor"; "start");
        let build_handle = tokio::spawn(build_actor.run());
        let fs_handle = tokio::spawn(fs_actor.run());

        // The watcher is already attached, so edits made during this build
        // are queued behind it rather than lost
        let _ = build_tx.send(BuildMsg::initial()).await;

        Ok(DevSession {
            store,
            push,
            build_tx,
            build_handle,
            fs_handle,
            shutdown_rx: self.shutdown_rx,
        })
    }
}

/// A running dev loop.
pub struct DevSession {
    store: Arc<ArtifactStore>,
    push: PushServerHandle,
    build_tx: mpsc::Sender<BuildMsg>,
    build_handle: JoinHandle<()>,
    fs_handle: JoinHandle<()>,
    shutdown_rx: Option<Receiver<()>>,
}

impl DevSession {
    /// Port the push server actually listens on.
    pub fn port(&self) -> u16 {
        self.push.port()
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    /// Run until the shutdown signal (or an actor exits), then stop.
    pub async fn run(self) -> Result<()> {
        runtime::run_until_shutdown(self).await
    }
}
