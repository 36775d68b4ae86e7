//! `[dev]` section configuration.
//!
//! ```toml
//! [dev]
//! port = 4545        # Live push WebSocket port (bound on 127.0.0.1 only)
//! clipboard = true   # Copy the injection snippet to the clipboard
//! ```
//!
//! The push server is unauthenticated and accepts any origin, so it only
//! ever listens on the loopback interface.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

pub const DEFAULT_PUSH_PORT: u16 = 4545;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    pub port: u16,
    pub clipboard: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PUSH_PORT,
            clipboard: true,
        }
    }
}

impl DevConfig {
    pub const PORT: FieldPath = FieldPath::new("dev.port");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error_with_hint(
                Self::PORT,
                "port must be a fixed, non-zero port",
                "the injected snippet connects to this port",
            );
        }
    }
}
