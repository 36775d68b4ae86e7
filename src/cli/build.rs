//! One-shot build: bundle once, write it to `[build] output`, optionally with
//! a bookmarklet next to it.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, bail};

use crate::build::{BuildOrchestrator, OutputTarget, format_size, render_diagnostics};
use crate::config::ProjectConfig;
use crate::utils::plural_count;
use crate::{debug, log};

/// Run `chenu build`. Any build failure is an error (exit status 1).
pub fn build_menu(config: ProjectConfig, generate_bookmarklet: bool) -> Result<()> {
    let config = Arc::new(config);
    let target = OutputTarget::disk(&config, generate_bookmarklet);
    let orchestrator = BuildOrchestrator::from_config(Arc::clone(&config));

    debug!("build"; "bundler: {}", config.build.bundler.join(" "));
    let started = Instant::now();

    let result = orchestrator.build_blocking(&config.menu, &target);
    let Some(bundle) = result.bundle() else {
        let diagnostics = result.diagnostics();
        bail!(
            "build failed ({})\n{}",
            plural_count(diagnostics.len(), "error"),
            render_diagnostics(diagnostics)
        );
    };

    let bundle_path = config.output_dir().join(&config.build.bundle);
    log!(
        "build";
        "{} ({}) in {:.2?}",
        config.root_relative(&bundle_path).display(),
        format_size(bundle.len()),
        started.elapsed()
    );
    if generate_bookmarklet {
        let path = config.output_dir().join(&config.build.bookmarklet);
        log!("build"; "bookmarklet: {}", config.root_relative(&path).display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(bundler: &str) -> (TempDir, ProjectConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/hacks")).unwrap();
        fs::write(root.join("src/index.ts"), "console.log('menu');\n").unwrap();
        let path = root.join("cheat-menu.toml");
        fs::write(
            &path,
            format!(
                "[menu]\ntitle = \"T\"\ncategories = []\n[build]\nbundler = [\"sh\", \"-c\", \"{bundler}\"]\n"
            ),
        )
        .unwrap();
        let config = ProjectConfig::from_path(&path).unwrap();
        (dir, config)
    }

    #[cfg(unix)]
    #[test]
    fn test_build_writes_bundle_and_bookmarklet() {
        let (dir, config) = project("cat");
        let output = config.output_dir();
        let bundle = output.join(&config.build.bundle);
        let bookmarklet = output.join(&config.build.bookmarklet);

        build_menu(config, true).unwrap();

        assert!(bundle.is_file());
        let link = fs::read_to_string(bookmarklet).unwrap();
        assert!(link.starts_with("javascript:(function(){"));
        drop(dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_failure_is_error() {
        let (dir, config) = project("echo '[ERROR] nope' >&2; exit 1");
        let bundle = config.output_dir().join(&config.build.bundle);

        assert!(build_menu(config, false).is_err());
        assert!(!bundle.exists());
        drop(dir);
    }
}
