//! FileSystem Actor
//!
//! Watches the source tree and the config file, and asks the BuildActor for
//! a rebuild once a burst of changes has settled.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → WatchScope (filter) → BuildMsg::Rebuild
//! ```

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode};
use tokio::sync::mpsc;

use super::messages::BuildMsg;

// Pure timing and deduplication.
mod debouncer;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use debouncer::Debouncer;
use watch_roots::WatchRoots;

pub use types::WatchScope;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    /// Channel to send rebuild requests to the BuildActor
    build_tx: mpsc::Sender<BuildMsg>,
    debouncer: Debouncer,
    scope: WatchScope,
}

impl FsActor {
    /// Create the watcher and attach it right away.
    ///
    /// Events are buffered from this point on, so nothing is lost between
    /// construction and the first `run` poll (e.g. during the initial build).
    pub fn new(
        roots: Vec<(PathBuf, RecursiveMode)>,
        scope: WatchScope,
        build_tx: mpsc::Sender<BuildMsg>,
    ) -> notify::Result<Self> {
        // notify has no async API
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Missing roots are re-attached later
        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;
        crate::debug!("watch"; "watching {}", crate::utils::plural_count(watch_roots.attached_count(), "root"));

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            build_tx,
            debouncer: Debouncer::new(),
            scope,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            build_tx,
            mut debouncer,
            scope,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Bridge notify's std channel into the async world
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => match event {
                    Some(event) => debouncer.add_event(&event),
                    None => break,
                },
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    if process_changes(&mut debouncer, &build_tx, &scope).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Forward a settled batch of relevant changes.
///
/// Returns `Err(())` if the BuildActor shut down.
async fn process_changes(
    debouncer: &mut Debouncer,
    build_tx: &mpsc::Sender<BuildMsg>,
    scope: &WatchScope,
) -> Result<(), ()> {
    let Some(raw_events) = debouncer.take_if_ready() else {
        return Ok(());
    };

    let mut changed: Vec<PathBuf> = raw_events
        .into_keys()
        .filter(|path| scope.contains(path))
        .collect();
    if changed.is_empty() {
        return Ok(());
    }
    changed.sort();

    if let [path] = changed.as_slice() {
        crate::debug!("watch"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
    } else {
        crate::debug!("watch"; "{}", crate::utils::plural_count(changed.len(), "file"));
    }

    build_tx
        .send(BuildMsg::Rebuild { changed })
        .await
        .map_err(|_| ())
}
