use std::time::Duration;

use anyhow::Result;

use super::DevSession;
use crate::actor::messages::BuildMsg;

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Wait for the shutdown signal, then stop actors downstream-last:
/// watcher first (no new requests), builder next, push server last.
pub(super) async fn run_until_shutdown(session: DevSession) -> Result<()> {
    let DevSession {
        store: _,
        push,
        build_tx,
        mut build_handle,
        mut fs_handle,
        shutdown_rx,
    } = session;

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            if build_handle.is_finished() || fs_handle.is_finished() {
                crate::log!("dev"; "an actor stopped unexpectedly, shutting down");
                break;
            }
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
    } else {
        tokio::select! {
            _ = &mut fs_handle => {}
            _ = &mut build_handle => {}
        }
    }

    fs_handle.abort();
    let _ = build_tx.send(BuildMsg::Shutdown).await;
    if !build_handle.is_finished() {
        let _ = tokio::time::timeout(Duration::from_millis(500), build_handle).await;
    }
    push.stop().await;

    crate::debug!("actor"; "stopped");
    Ok(())
}
