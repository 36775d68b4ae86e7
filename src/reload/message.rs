//! Live Push Message Protocol
//!
//! JSON text frames, server to client only:
//!
//! - `connected`: sent once after the handshake
//! - `bundle`: the full bundle source, sent on connect (if one exists) and
//!   after every successful build
//!
//! Clients never need to send application messages.

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushMessage {
    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    /// A complete bundle to run in place of the previous one
    Bundle {
        /// Bundle source (UTF-8)
        payload: String,
        revision: u64,
    },
}

impl PushMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn bundle(artifact: &Artifact) -> Self {
        Self::Bundle {
            payload: artifact.bundle.text().into_owned(),
            revision: artifact.revision,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"connected"}"#.to_string())
    }

    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}
