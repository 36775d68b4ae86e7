use crate::build::{BuildOrchestrator, BuildResult, Diagnostic, OutputTarget};

use super::BuildTask;

/// Spawn one in-memory build.
pub(super) fn spawn_build(orchestrator: BuildOrchestrator, reload_menu: bool) -> BuildTask {
    tokio::spawn(async move {
        if reload_menu {
            orchestrator.run_build_reloaded(OutputTarget::Memory).await
        } else {
            let menu = orchestrator.config().menu.clone();
            orchestrator.run_build(&menu, OutputTarget::Memory).await
        }
    })
}

/// Wait for the running build (pending forever if none).
///
/// Polls through `&mut` so the handle survives when another `select!`
/// branch wins; it is cleared by the caller only after completion.
pub(super) async fn wait_task(task: &mut Option<BuildTask>) -> BuildResult {
    match task.as_mut() {
        Some(handle) => handle
            .await
            .unwrap_or_else(|e| BuildResult::fail(Diagnostic::from_error("build task crashed", &e))),
        None => std::future::pending().await,
    }
}
