//! Process-wide shutdown routing.
//!
//! `SHUTDOWN_TX` is where Ctrl+C goes once a dev loop runs; before that the
//! handler just exits.

use std::sync::OnceLock;

use crossbeam::channel::Sender;

/// Shutdown signal sender for the actor system
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a dev loop has registered:
/// - Before `register_shutdown()`: exit immediately (nothing to clean up,
///   e.g. during a one-shot build or the init prompt)
/// - After `register_shutdown()`: graceful shutdown through the channel
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if let Some(tx) = SHUTDOWN_TX.get() {
            crate::log!("dev"; "shutting down...");
            let _ = tx.try_send(());
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Route Ctrl+C to `tx` instead of exiting the process.
///
/// Only the first registration takes effect.
pub fn register_shutdown(tx: Sender<()>) {
    let _ = SHUTDOWN_TX.set(tx);
}
