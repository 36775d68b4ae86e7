//! Actor Message Definitions
//!
//! ```text
//! FsActor --Rebuild--> BuildActor --Bundle--> WsActor --> browsers
//!                                                ^
//!                          acceptor --AddClient--+
//! ```

use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::Arc;

use tungstenite::WebSocket;

use crate::artifact::Artifact;

// =============================================================================
// BuildActor Messages
// =============================================================================

/// Messages to Build Actor
#[derive(Debug)]
pub enum BuildMsg {
    /// Source or config changed; build again.
    Rebuild {
        /// Paths that triggered this request (empty for the initial build)
        changed: Vec<PathBuf>,
    },
    Shutdown,
}

impl BuildMsg {
    /// The start-up build.
    pub fn initial() -> Self {
        Self::Rebuild {
            changed: Vec::new(),
        }
    }
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
pub enum WsMsg {
    /// Client that completed the WebSocket handshake
    AddClient(WebSocket<TcpStream>),
    /// Newly stored artifact; broadcast to everyone
    Bundle(Arc<Artifact>),
    /// Close all clients and stop
    Shutdown,
}

impl std::fmt::Debug for WsMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddClient(ws) => f
                .debug_tuple("AddClient")
                .field(&ws.get_ref().peer_addr().ok())
                .finish(),
            Self::Bundle(artifact) => f.debug_tuple("Bundle").field(&artifact.revision).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
