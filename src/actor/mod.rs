//! Actor System for `chenu dev`
//!
//! Message-passing concurrency for the live loop:
//!
//! ```text
//! FsActor --> BuildActor --> WsActor --> browsers
//! (watch)     (bundle)      (push)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `builder` - Coalescing rebuilds into the artifact store
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod builder;
pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::{Coordinator, DevSession};
