use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::reload::message::PushMessage;

use super::{Client, WsActor};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

impl WsActor {
    /// Register a client and bring it up to date.
    ///
    /// Reads the store at this instant, so a client always starts from the
    /// newest artifact, never an older one still queued for broadcast.
    pub(super) fn add_client(&self, mut ws: WebSocket<TcpStream>) {
        let peer = ws.get_ref().peer_addr().ok();

        if !Self::send(&mut ws, Message::text(PushMessage::connected().to_json())) {
            return;
        }

        let mut revision = 0;
        if let Some(artifact) = self.store.get() {
            if !Self::send(&mut ws, Message::text(PushMessage::bundle(&artifact).to_json())) {
                return;
            }
            revision = artifact.revision;
            crate::debug!(
                "push";
                "late joiner gets revision {} built {:.1?} ago",
                revision,
                artifact.bundle.built_at.elapsed().unwrap_or_default()
            );
        }

        let mut clients = self.clients.lock();
        clients.push(Client { ws, revision });
        crate::debug!(
            "push";
            "client {} connected (total: {}, revision: {})",
            peer.map(|p| p.to_string()).unwrap_or_default(),
            clients.len(),
            revision
        );
    }

    /// Send one frame. Returns `false` if the client is gone.
    ///
    /// `WouldBlock` means the frame is queued in the write buffer; the reader
    /// loop finishes it.
    pub(super) fn send(ws: &mut WebSocket<TcpStream>, frame: Message) -> bool {
        match ws.send(frame) {
            Ok(()) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
            Err(e) => {
                crate::log!("push"; "send failed, dropping client: {}", e);
                false
            }
        }
    }

    /// Background thread: service pings/closes and flush queued frames.
    pub(super) fn client_reader_loop(clients: Arc<Mutex<Vec<Client>>>, stop: Arc<AtomicBool>) {
        while !stop.load(Ordering::SeqCst) {
            std::thread::sleep(POLL_INTERVAL);

            let mut clients = clients.lock();
            let before = clients.len();
            clients.retain_mut(|client| Self::poll_client(&mut client.ws));

            if clients.len() < before {
                crate::debug!(
                    "push";
                    "{} disconnected (remaining: {})",
                    crate::utils::plural_count(before - clients.len(), "client"),
                    clients.len()
                );
            }
        }
    }

    /// Drain incoming frames and flush pending output. `false` = remove.
    fn poll_client(ws: &mut WebSocket<TcpStream>) -> bool {
        loop {
            match ws.read() {
                // Pings are answered by tungstenite; data frames are ignored
                Ok(Message::Close(_)) => return false,
                Ok(_) => continue,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => break,
                Err(_) => return false,
            }
        }

        match ws.flush() {
            Ok(()) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
            Err(_) => false,
        }
    }
}
