//! Live bundle push for `chenu dev`.
//!
//! ```text
//! FsActor -> BuildActor -> ArtifactStore -> WsActor -> Browser
//!  (watch)    (bundle)       (latest)     (broadcast)
//! ```
//!
//! - `message` - JSON frames sent to browsers
//! - `server` - loopback WebSocket listener and its lifecycle

pub mod message;
pub mod server;

pub use server::{BindError, PushServer, PushServerHandle};
