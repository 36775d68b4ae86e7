//! Command-line interface module.

mod args;
pub mod build;
pub mod dev;
pub mod init;

pub use args::{Cli, Commands, PackageManager};
