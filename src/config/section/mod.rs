//! Configuration sections of `cheat-menu.toml`.

mod build;
mod dev;
mod menu;

pub use build::BuildSectionConfig;
pub use dev::{DEFAULT_PUSH_PORT, DevConfig};
pub use menu::BuildConfig;
