//! Dependency installation through the chosen package manager.

use std::path::Path;

use thiserror::Error;

use crate::cli::PackageManager;
use crate::utils::exec::Cmd;
use crate::utils::plural_s;

/// Runtime library the generated entry point imports.
pub const RUNTIME_PACKAGES: &[&str] = &["chenu"];

/// Bundler used by the default `[build] bundler` command.
pub const DEV_PACKAGES: &[&str] = &["esbuild"];

#[derive(Debug, Error)]
#[error("could not install {} with {manager}", .packages.join(", "))]
pub struct InstallError {
    pub manager: &'static str,
    pub packages: Vec<String>,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl InstallError {
    /// What the user should run themselves.
    pub fn remediation(&self) -> String {
        format!(
            "please install the following package{} with a package manager of your choice: {}",
            plural_s(self.packages.len()),
            self.packages.join(", ")
        )
    }
}

/// Install `packages` into the project at `root`.
pub fn install(
    manager: PackageManager,
    root: &Path,
    packages: &[&str],
    dev: bool,
) -> Result<(), InstallError> {
    let program = manager.program();
    crate::log!("init"; "{} {}", program, manager.add_args(packages, dev).join(" "));

    Cmd::new(program)
        .args(manager.add_args(packages, dev))
        .cwd(root)
        .pty(true)
        .run()
        .map(drop)
        .map_err(|source| InstallError {
            manager: program,
            packages: packages.iter().map(ToString::to_string).collect(),
            source: source.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remediation_lists_packages() {
        let err = InstallError {
            manager: "npm",
            packages: vec!["chenu".into(), "esbuild".into()],
            source: "not found".into(),
        };
        assert_eq!(err.to_string(), "could not install chenu, esbuild with npm");
        assert!(err.remediation().contains("packages"));
        assert!(err.remediation().ends_with("chenu, esbuild"));
    }
}
