//! `chenu dev`: watch, rebuild and push every bundle to connected pages.
//!
//! The actor system runs on its own multi-thread runtime. Ctrl+C reaches it
//! through the crossbeam channel registered with the global handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;

use crate::actor::Coordinator;
use crate::config::ProjectConfig;
use crate::core::register_shutdown;
use crate::embed::serve::{HOTRELOAD_JS, HotreloadVars};
use crate::{debug, log};

/// Run `chenu dev` until Ctrl+C.
pub fn dev_menu(config: ProjectConfig) -> Result<()> {
    let config = Arc::new(config);

    let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
    register_shutdown(shutdown_tx);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async {
        let session = Coordinator::with_config(Arc::clone(&config))
            .with_shutdown_signal(shutdown_rx)
            .start()
            .await?;

        let port = session.port();
        if port != config.dev.port {
            log!("push"; "port {} in use, using {} instead", config.dev.port, port);
        }
        log!("push"; "ws://127.0.0.1:{}", port);

        deliver_snippet(&snippet(port), config.dev.clipboard);
        log!("watch"; "watching {}", config.root_relative(config.src_dir()).display());

        session.run().await
    })
}

/// Push client with the actual port baked in.
pub fn snippet(port: u16) -> String {
    HOTRELOAD_JS.render(&HotreloadVars { ws_port: port })
}

/// Copy the snippet to the clipboard, or print it when that is off or fails.
fn deliver_snippet(snippet: &str, use_clipboard: bool) {
    if use_clipboard {
        match copy_to_clipboard(snippet) {
            Ok(()) => {
                log!("dev"; "injection snippet copied to clipboard, paste it into the page console");
                return;
            }
            Err(e) => debug!("dev"; "clipboard unavailable: {}", e),
        }
    }

    log!("dev"; "paste this into the page console:");
    println!("{snippet}");
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    cli_clipboard::set_contents(text.to_owned()).map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_targets_port() {
        let js = snippet(4600);
        assert!(js.contains("127.0.0.1:4600"));
    }
}
