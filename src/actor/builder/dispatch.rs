use std::time::Instant;

use super::tasks::{spawn_build, wait_task};
use super::{BuildActor, BuildTask};
use crate::actor::messages::{BuildMsg, WsMsg};
use crate::build::{BuildResult, format_size, render_diagnostics};
use crate::logger::{status_error, status_success};
use crate::utils::plural_count;

impl BuildActor {
    /// Main event loop
    pub async fn run(mut self) {
        let mut task: Option<BuildTask> = None;
        let mut started = Instant::now();

        loop {
            tokio::select! {
                // Requests first, so changes that arrived during a build are
                // folded into its follow-up before that build is started
                biased;

                msg = self.rx.recv() => match msg {
                    Some(BuildMsg::Rebuild { changed }) => {
                        if self.queue.request() {
                            self.log_trigger(&changed);
                            started = Instant::now();
                            task = Some(self.start());
                        } else {
                            crate::debug!("build"; "queued rebuild ({})", plural_count(changed.len(), "change"));
                            self.pending_changes.extend(changed);
                        }
                    }
                    Some(BuildMsg::Shutdown) | None => {
                        crate::debug!("build"; "shutting down");
                        break;
                    }
                },

                result = wait_task(&mut task) => {
                    task = None;
                    self.on_build_done(result, started).await;

                    if self.queue.complete() {
                        let changed = std::mem::take(&mut self.pending_changes);
                        self.log_trigger(&changed);
                        started = Instant::now();
                        task = Some(self.start());
                    }
                }
            }
        }

        // The bundler process cannot be interrupted; just stop waiting on it
        if let Some(task) = task {
            task.abort();
        }
    }

    fn start(&self) -> BuildTask {
        spawn_build(self.orchestrator.clone(), self.reload_menu)
    }

    async fn on_build_done(&mut self, result: BuildResult, started: Instant) {
        match result {
            BuildResult::Success(bundle) => {
                let size = format_size(bundle.len());
                let artifact = self.store.set(bundle);
                if self.ws_tx.send(WsMsg::Bundle(artifact)).await.is_err() {
                    crate::debug!("build"; "push server gone, bundle stored only");
                }
                status_success(&format!(
                    "built {} ({}) in {:.0?}",
                    self.orchestrator.config().build.bundle,
                    size,
                    started.elapsed()
                ));
            }
            BuildResult::Failure(diagnostics) => {
                let summary = format!(
                    "build failed ({})",
                    plural_count(diagnostics.len(), "error")
                );
                status_error(&summary, &render_diagnostics(&diagnostics));
            }
        }
    }

    fn log_trigger(&self, changed: &[std::path::PathBuf]) {
        let config = self.orchestrator.config();
        match changed {
            [] => crate::debug!("build"; "building"),
            [path] => crate::debug!("build"; "changed: {}", config.root_relative(path).display()),
            paths => crate::debug!("build"; "{} changed", plural_count(paths.len(), "file")),
        }
    }
}
