//! Build orchestration.
//!
//! | Module        | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | `plan`        | Entry discovery and bundler input              |
//! | `bundler`     | `Bundler` seam and the external command driver |
//! | `result`      | `BuildResult`, `Bundle`, `Diagnostic`          |
//! | `bookmarklet` | `javascript:` encoding of a bundle             |
//!
//! [`BuildOrchestrator::run_build`] is the single entry point used by both
//! `chenu build` (disk output) and `chenu dev` (in-memory output).

pub mod bookmarklet;
mod bundler;
mod plan;
mod result;

pub use bundler::{Bundler, CommandBundler, parse_diagnostics};
pub use plan::{BundlePlan, CONFIG_DEFINE, discover_hacks};
pub use result::{BuildResult, Bundle, Diagnostic, format_size, render_diagnostics};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::{Builder as TempFileBuilder, NamedTempFile};

use crate::config::{BuildConfig, ProjectConfig};

/// Where a successful bundle goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Keep the bundle in the returned [`BuildResult`] only.
    Memory,
    /// Write `<dir>/<bundle_name>`, plus `<dir>/<bookmarklet>` when set.
    Disk {
        dir: PathBuf,
        bundle_name: String,
        bookmarklet: Option<String>,
    },
}

impl OutputTarget {
    /// Disk target from `[build]`.
    pub fn disk(config: &ProjectConfig, generate_bookmarklet: bool) -> Self {
        Self::Disk {
            dir: config.output_dir(),
            bundle_name: config.build.bundle.clone(),
            bookmarklet: generate_bookmarklet.then(|| config.build.bookmarklet.clone()),
        }
    }

    /// Persist a successful bundle. I/O problems come back as diagnostics.
    ///
    /// Every output is staged in a temp file next to its destination and
    /// only renamed into place once all of them were written, so a failure
    /// leaves the output directory as it was.
    fn persist(&self, bundle: &Bundle) -> Result<(), Diagnostic> {
        let Self::Disk {
            dir,
            bundle_name,
            bookmarklet,
        } = self
        else {
            return Ok(());
        };

        let mut outputs = Vec::with_capacity(2);
        if let Some(name) = bookmarklet {
            outputs.push((dir.join(name), bookmarklet::encode(&bundle.bytes).into_bytes()));
        }
        outputs.push((dir.join(bundle_name), bundle.bytes.clone()));

        fs::create_dir_all(dir).map_err(|e| write_failed(dir, &e))?;

        let staged = outputs
            .into_iter()
            .map(|(path, bytes)| stage(dir, &path, &bytes).map(|temp| (path, temp)))
            .collect::<Result<Vec<_>, _>>()?;

        // The bundle goes last: it only appears once the bookmarklet is in place
        let mut placed: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (path, temp) in staged {
            if let Err(e) = temp.persist(&path) {
                for done in &placed {
                    let _ = fs::remove_file(done);
                }
                return Err(write_failed(&path, &e.error));
            }
            placed.push(path);
        }
        Ok(())
    }
}

/// Write `bytes` to a temp file in `dir`, destined for `path`.
fn stage(dir: &Path, path: &Path, bytes: &[u8]) -> Result<NamedTempFile, Diagnostic> {
    let mut temp = TempFileBuilder::new()
        .prefix(".chenu_")
        .tempfile_in(dir)
        .map_err(|e| write_failed(path, &e))?;
    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| write_failed(path, &e))?;
    Ok(temp)
}

fn write_failed(path: &Path, err: &std::io::Error) -> Diagnostic {
    Diagnostic::from_error(format!("failed to write `{}`", path.display()), err)
}

/// Runs builds for one project.
///
/// Cheap to clone; the bundler is shared.
#[derive(Clone)]
pub struct BuildOrchestrator {
    config: Arc<ProjectConfig>,
    bundler: Arc<dyn Bundler>,
}

impl BuildOrchestrator {
    pub fn new(config: Arc<ProjectConfig>, bundler: Arc<dyn Bundler>) -> Self {
        Self { config, bundler }
    }

    /// Orchestrator driving the bundler command from `[build]`.
    pub fn from_config(config: Arc<ProjectConfig>) -> Self {
        let bundler = Arc::new(CommandBundler::new(config.build.bundler.clone()));
        Self::new(config, bundler)
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Build once with `menu`, sending a success to `target`.
    ///
    /// The bundler runs on the blocking pool; the calling task just awaits.
    /// Never fails: every problem is a `Failure`.
    pub async fn run_build(&self, menu: &BuildConfig, target: OutputTarget) -> BuildResult {
        let menu = menu.clone();
        self.spawn(move |this| this.build_blocking(&menu, &target)).await
    }

    /// Like [`run_build`](Self::run_build), but re-reads `[menu]` from the
    /// config file first, on the same blocking thread.
    pub async fn run_build_reloaded(&self, target: OutputTarget) -> BuildResult {
        self.spawn(move |this| match this.reload_menu() {
            Ok(menu) => this.build_blocking(&menu, &target),
            Err(diagnostic) => BuildResult::fail(diagnostic),
        })
        .await
    }

    async fn spawn<F>(&self, job: F) -> BuildResult
    where
        F: FnOnce(&Self) -> BuildResult + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || job(&this))
            .await
            .unwrap_or_else(|err| {
                BuildResult::fail(Diagnostic::from_error("build task crashed", &err))
            })
    }

    fn reload_menu(&self) -> Result<BuildConfig, Diagnostic> {
        self.config.reload_menu().map_err(|e| {
            let name = self.config.root_relative(&self.config.config_path);
            Diagnostic::from_error(format!("failed to reload `{}`", name.display()), &e)
        })
    }

    /// Synchronous build, for callers that are not on a runtime.
    pub fn build_blocking(&self, menu: &BuildConfig, target: &OutputTarget) -> BuildResult {
        let plan = match BundlePlan::collect(&self.config, menu) {
            Ok(plan) => plan,
            Err(diagnostic) => return BuildResult::fail(diagnostic),
        };

        let result = self.bundler.bundle(&plan);
        if let Some(bundle) = result.bundle()
            && let Err(diagnostic) = target.persist(bundle)
        {
            return BuildResult::fail(diagnostic);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    /// Bundler that concatenates entry file contents and the define.
    struct ConcatBundler;

    impl Bundler for ConcatBundler {
        fn bundle(&self, plan: &BundlePlan) -> BuildResult {
            let mut out = format!("var {}={};", plan.define.0, plan.define.1);
            for entry in &plan.entries {
                match fs::read_to_string(entry) {
                    Ok(src) if src.contains("syntax error") => {
                        return BuildResult::fail(Diagnostic::new(
                            "Unexpected \"error\"",
                            entry.display().to_string(),
                        ));
                    }
                    Ok(src) => out.push_str(&src),
                    Err(e) => return BuildResult::fail(Diagnostic::from_error("read", &e)),
                }
            }
            BuildResult::Success(Bundle::new(out))
        }
    }

    fn project() -> (TempDir, Arc<ProjectConfig>) {
        let temp = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.set_root(temp.path());
        fs::create_dir_all(config.hacks_dir()).unwrap();
        fs::write(config.entry_file(), "menu();").unwrap();
        fs::write(config.hacks_dir().join("speed.ts"), "speed();").unwrap();
        (temp, Arc::new(config))
    }

    #[tokio::test]
    async fn test_build_writes_bundle_to_disk() {
        let (_temp, config) = project();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator
            .run_build(&config.menu, OutputTarget::disk(&config, false))
            .await;

        assert!(result.bundle().is_some());
        let written = fs::read_to_string(config.output_dir().join("bundle.js")).unwrap();
        assert_eq!(
            written,
            r#"var CHEATMENUCONFIG={"title":"Test","categories":[]};speed();menu();"#
        );
        assert!(!config.output_dir().join("bookmarklet.txt").exists());
    }

    #[tokio::test]
    async fn test_build_writes_bookmarklet() {
        let (_temp, config) = project();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator
            .run_build(&config.menu, OutputTarget::disk(&config, true))
            .await;

        let bundle = result.bundle().unwrap();
        let bookmarklet = fs::read_to_string(config.output_dir().join("bookmarklet.txt")).unwrap();
        assert!(bookmarklet.starts_with("javascript:(function(){"));
        assert_eq!(bookmarklet::decode(&bookmarklet).unwrap(), bundle.bytes);
    }

    #[tokio::test]
    async fn test_memory_build_touches_no_disk() {
        let (_temp, config) = project();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator.run_build(&config.menu, OutputTarget::Memory).await;

        assert!(result.bundle().is_some());
        assert!(!config.output_dir().exists());
    }

    #[tokio::test]
    async fn test_failure_writes_nothing() {
        let (_temp, config) = project();
        fs::write(config.hacks_dir().join("broken.ts"), "syntax error").unwrap();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator
            .run_build(&config.menu, OutputTarget::disk(&config, true))
            .await;

        assert_eq!(result.diagnostics().len(), 1);
        assert!(!config.output_dir().exists());
    }

    #[test]
    fn test_unwritable_output_is_diagnostic() {
        let (_temp, config) = project();
        // A file where the output directory should be
        fs::write(config.output_dir(), "").unwrap();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator.build_blocking(&config.menu, &OutputTarget::disk(&config, false));
        assert!(result.diagnostics()[0].message.starts_with("failed to write"));
    }

    #[test]
    fn test_failed_bookmarklet_leaves_no_bundle() {
        let (_temp, config) = project();
        // A directory where the bookmarklet file should go
        fs::create_dir_all(config.output_dir().join("bookmarklet.txt")).unwrap();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator.build_blocking(&config.menu, &OutputTarget::disk(&config, true));

        assert!(result.bundle().is_none());
        assert!(result.diagnostics()[0].message.contains("bookmarklet.txt"));
        assert!(!config.output_dir().join("bundle.js").exists());
        let leftovers: Vec<_> = fs::read_dir(config.output_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|name| name != "bookmarklet.txt")
            .collect();
        assert!(leftovers.is_empty(), "staged files left behind: {leftovers:?}");
    }

    #[test]
    fn test_rebuild_replaces_bundle() {
        let (_temp, config) = project();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));
        let target = OutputTarget::disk(&config, false);

        orchestrator.build_blocking(&config.menu, &target);
        fs::write(config.entry_file(), "menu2();").unwrap();
        orchestrator.build_blocking(&config.menu, &target);

        let written = fs::read_to_string(config.output_dir().join("bundle.js")).unwrap();
        assert!(written.ends_with("speed();menu2();"));
    }

    #[tokio::test]
    async fn test_reloaded_build_reads_config_file() {
        let (_temp, config) = project();
        let mut config = (*config).clone();
        config.config_path = config.get_root().join("cheat-menu.toml");
        fs::write(&config.config_path, "[menu]\ntitle = \"Edited\"\n").unwrap();
        let config = Arc::new(config);
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));

        let result = orchestrator.run_build_reloaded(OutputTarget::Memory).await;
        assert!(result.bundle().unwrap().text().contains(r#""title":"Edited""#));

        fs::write(&config.config_path, "[menu\n").unwrap();
        let result = orchestrator.run_build_reloaded(OutputTarget::Memory).await;
        assert!(result.diagnostics()[0].message.starts_with("failed to reload `cheat-menu.toml`"));
    }

    #[test]
    fn test_menu_override_reaches_bundle() {
        let (_temp, config) = project();
        let orchestrator = BuildOrchestrator::new(config.clone(), Arc::new(ConcatBundler));
        let mut menu = BuildConfig::new("Renamed");
        menu.categories.push("Visuals".into());

        let result = orchestrator.build_blocking(&menu, &OutputTarget::Memory);
        assert!(result.bundle().unwrap().text().contains(r#""title":"Renamed""#));
    }
}
