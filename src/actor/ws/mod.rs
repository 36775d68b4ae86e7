//! WebSocket Actor - Bundle Broadcast
//!
//! This actor is responsible for:
//! - Registering clients handed over by the acceptor thread
//! - Sending the current artifact to each new client
//! - Broadcasting every newly stored artifact to all clients
//!
//! ```text
//! BuildActor --[Bundle]--> WsActor --[broadcast]--> Clients
//! acceptor --[AddClient]-----^
//! ```
//!
//! Sockets are non-blocking. A send that cannot complete immediately stays
//! queued in the socket's write buffer and is flushed by the reader thread,
//! so a slow browser never stalls the actor.

mod client_io;

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::artifact::{Artifact, ArtifactStore};
use crate::reload::message::PushMessage;

/// A connected browser session.
struct Client {
    ws: WebSocket<TcpStream>,
    /// Revision of the last bundle queued for this client (0 = none)
    revision: u64,
}

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    store: Arc<ArtifactStore>,
    /// Connected clients (shared with the reader thread)
    clients: Arc<Mutex<Vec<Client>>>,
    /// Stops the reader thread
    stop: Arc<AtomicBool>,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>, store: Arc<ArtifactStore>) -> Self {
        Self {
            rx,
            store,
            clients: Arc::new(Mutex::new(Vec::new())),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        let stop = Arc::clone(&self.stop);
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader, stop);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::AddClient(ws) => self.add_client(ws),
                WsMsg::Bundle(artifact) => self.broadcast(&artifact),
                WsMsg::Shutdown => {
                    crate::debug!("push"; "shutting down");
                    break;
                }
            }
        }

        self.close_all();
    }

    /// Queue `artifact` for every client that has not received it yet.
    fn broadcast(&self, artifact: &Artifact) {
        let frame = Message::text(PushMessage::bundle(artifact).to_json());
        let mut clients = self.clients.lock();

        let before = clients.len();
        clients.retain_mut(|client| {
            if client.revision >= artifact.revision {
                return true;
            }
            client.revision = artifact.revision;
            Self::send(&mut client.ws, frame.clone())
        });

        crate::debug!(
            "push";
            "revision {} -> {}",
            artifact.revision,
            crate::utils::plural_count(clients.len(), "client")
        );
        let dropped = before - clients.len();
        if dropped > 0 {
            crate::debug!("push"; "dropped {}", crate::utils::plural_count(dropped, "client"));
        }
    }

    fn close_all(&self) {
        self.stop.store(true, Ordering::SeqCst);
        let mut clients = self.clients.lock();
        for mut client in clients.drain(..) {
            let _ = client.ws.close(None);
            let _ = client.ws.flush();
        }
    }
}
