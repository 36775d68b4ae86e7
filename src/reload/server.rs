//! Live Push Server
//!
//! WebSocket endpoint the delivery snippet connects to. Bound to
//! `127.0.0.1` only: connections are unauthenticated and any origin is
//! accepted, which is only acceptable for a local development tool.
//!
//! ```text
//! acceptor thread --spawn--> handshake thread --AddClient--> WsActor <--Bundle-- BuildActor
//! ```

use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::actor::messages::WsMsg;
use crate::actor::ws::WsActor;
use crate::artifact::ArtifactStore;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// A browser that connects but never finishes the handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

const ACCEPT_POLL: Duration = Duration::from_millis(50);

const CHANNEL_BUFFER: usize = 32;

#[derive(Debug, Error)]
#[error("failed to bind push server on ports {first}..={last}: {source}")]
pub struct BindError {
    pub first: u16,
    pub last: u16,
    #[source]
    pub source: std::io::Error,
}

/// Running push server.
pub struct PushServerHandle {
    port: u16,
    tx: mpsc::Sender<WsMsg>,
    stop: Arc<AtomicBool>,
    actor: tokio::task::JoinHandle<()>,
}

pub struct PushServer;

impl PushServer {
    /// Bind (trying the next ports if `port` is taken), start the acceptor
    /// thread and the WebSocket actor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(port: u16, store: Arc<ArtifactStore>) -> Result<PushServerHandle, BindError> {
        let (listener, actual_port) = try_bind_port(port, MAX_PORT_RETRIES)?;
        listener
            .set_nonblocking(true)
            .map_err(|source| BindError {
                first: actual_port,
                last: actual_port,
                source,
            })?;

        let (tx, rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
        let stop = Arc::new(AtomicBool::new(false));

        let actor = tokio::spawn(WsActor::new(rx, store).run());

        let acceptor_tx = tx.clone();
        let acceptor_stop = Arc::clone(&stop);
        std::thread::spawn(move || accept_loop(&listener, &acceptor_tx, &acceptor_stop));

        crate::debug!("push"; "listening on ws://127.0.0.1:{}", actual_port);
        Ok(PushServerHandle {
            port: actual_port,
            tx,
            stop,
            actor,
        })
    }
}

impl PushServerHandle {
    /// Port actually bound (may differ from the requested one).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Sender for [`WsMsg::Bundle`] announcements.
    pub fn sender(&self) -> mpsc::Sender<WsMsg> {
        self.tx.clone()
    }

    /// Stop accepting, close every client and wait for the actor to exit.
    pub async fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.tx.send(WsMsg::Shutdown).await;
        let _ = self.actor.await;
    }
}

fn accept_loop(listener: &TcpListener, tx: &mpsc::Sender<WsMsg>, stop: &Arc<AtomicBool>) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, addr)) => {
                crate::debug!("push"; "connection from {}", addr);
                // A peer that never speaks must not hold up the next one
                let tx = tx.clone();
                let stop = Arc::clone(stop);
                std::thread::spawn(move || {
                    if let Some(ws) = handshake(stream)
                        && !stop.load(Ordering::SeqCst)
                    {
                        let _ = tx.blocking_send(WsMsg::AddClient(ws));
                    }
                });
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL);
            }
            Err(e) => {
                crate::log!("push"; "accept error: {}", e);
                std::thread::sleep(ACCEPT_POLL);
            }
        }
    }
}

/// Blocking handshake, then switch the socket to non-blocking.
fn handshake(stream: TcpStream) -> Option<tungstenite::WebSocket<TcpStream>> {
    let prepared = stream
        .set_nonblocking(false)
        .and_then(|()| stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT)));
    if let Err(e) = prepared {
        crate::log!("push"; "failed to prepare socket: {}", e);
        return None;
    }

    match tungstenite::accept(stream) {
        Ok(ws) => match ws.get_ref().set_nonblocking(true) {
            Ok(()) => Some(ws),
            Err(e) => {
                crate::log!("push"; "failed to prepare socket: {}", e);
                None
            }
        },
        Err(e) => {
            crate::log!("push"; "handshake failed: {}", e);
            None
        }
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16), BindError> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(("127.0.0.1", port)).and_then(|l| {
            let actual = l.local_addr()?.port();
            Ok((l, actual))
        }) {
            Ok(bound) => return Ok(bound),
            Err(e) => last_error = Some(e),
        }
    }

    Err(BindError {
        first: base_port,
        last: base_port.saturating_add(max_retries.saturating_sub(1)),
        source: last_error.unwrap_or_else(|| std::io::Error::other("no ports tried")),
    })
}
