//! Project configuration management for `cheat-menu.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                            |
//! |-----------|----------------------------------------------------|
//! | `[menu]`  | Title and categories baked into the bundle         |
//! | `[build]` | Source layout, bundler command, output names       |
//! | `[dev]`   | Live push server port and snippet delivery         |
//!
//! The directory containing the config file is the project root; every
//! relative path in `[build]` is resolved against it.

pub mod section;
pub mod types;
mod util;

pub use section::{BuildConfig, BuildSectionConfig, DEFAULT_PUSH_PORT, DevConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::cli::{Cli, Commands};
use crate::log;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing `cheat-menu.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub menu: BuildConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

impl ProjectConfig {
    /// Locate, parse and validate the config named on the command line.
    ///
    /// Searches upward from cwd so commands work from any project subdirectory.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&path)?;
        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file and resolve its root. Does not validate.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::read(path)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// [`from_path`](Self::from_path) without the unknown-field warning.
    fn read(path: &Path) -> Result<(Self, Vec<String>), ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        config.config_path = crate::utils::path::normalize_path(path);
        config.root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok((config, ignored))
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Re-read `[menu]` from disk.
    ///
    /// `dev` calls this before every build so edits to the config file show
    /// up in the next bundle. Unknown fields were already reported at startup.
    pub fn reload_menu(&self) -> Result<BuildConfig, ConfigError> {
        let (fresh, _) = Self::read(&self.config_path)?;
        let mut diag = ConfigDiagnostics::new();
        fresh.menu.validate(&mut diag);
        diag.into_result()?;
        Ok(fresh.menu)
    }

    /// Collect every validation problem and fail once with all of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.menu.validate(&mut diag);
        self.build.validate(&mut diag);
        self.dev.validate(&mut diag);
        diag.into_result()
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Dev { port, no_clipboard } = &cli.command {
            Self::update_option(&mut self.dev.port, port.as_ref());
            if *no_clipboard {
                self.dev.clipboard = false;
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join(&self.build.src)
    }

    pub fn hacks_dir(&self) -> PathBuf {
        self.src_dir().join(&self.build.hacks)
    }

    pub fn entry_file(&self) -> PathBuf {
        self.src_dir().join(&self.build.entry)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

/// Parse config with a minimal `[menu]` section prepended.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ProjectConfig {
    let content = format!("[menu]\ntitle = \"Test\"\ncategories = []\n{extra}");
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(&content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_toml() {
        let result = ProjectConfig::parse_with_ignored("[menu\ntitle = \"x\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_missing_menu_section() {
        let result = ProjectConfig::parse_with_ignored("[build]\nminify = false");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[menu]\ntitle = \"Test\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.menu.title, "Test");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_from_path_sets_root() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cheat-menu.toml");
        fs::write(&path, "[menu]\ntitle = \"Test\"\ncategories = [\"A\"]\n").unwrap();

        let config = ProjectConfig::from_path(&path).unwrap();
        let root = crate::utils::path::normalize_path(temp.path());
        assert_eq!(config.get_root(), root);
        assert_eq!(config.menu.categories, vec!["A"]);
        assert_eq!(config.hacks_dir(), root.join("src").join("hacks"));
        assert_eq!(config.entry_file(), root.join("src").join("index.ts"));
        assert_eq!(config.output_dir(), root.join("dist"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = ProjectConfig::from_path(&temp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_reload_menu_picks_up_edits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cheat-menu.toml");
        fs::write(&path, "[menu]\ntitle = \"Before\"\n").unwrap();
        let config = ProjectConfig::from_path(&path).unwrap();

        fs::write(&path, "[menu]\ntitle = \"After\"\ncategories = [\"X\"]\n").unwrap();
        let menu = config.reload_menu().unwrap();
        assert_eq!(menu.title, "After");
        assert_eq!(menu.categories, vec!["X"]);

        fs::write(&path, "[menu]\ntitle = \"\"\n").unwrap();
        assert!(matches!(
            config.reload_menu(),
            Err(ConfigError::Diagnostics(_))
        ));
    }

    #[test]
    fn test_reload_menu_ignores_unknown_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cheat-menu.toml");
        fs::write(&path, "[menu]\ntitle = \"Menu\"\ncolour = \"red\"\n").unwrap();
        let config = ProjectConfig::from_path(&path).unwrap();

        let (_, ignored) = ProjectConfig::read(&path).unwrap();
        assert_eq!(ignored, vec!["menu.colour"]);
        assert_eq!(config.reload_menu().unwrap().title, "Menu");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = test_parse_config("[build]\nbundler = []\n[dev]\nport = 0");
        config.menu.title.clear();
        match config.validate() {
            Err(ConfigError::Diagnostics(diag)) => assert_eq!(diag.len(), 3),
            other => panic!("expected diagnostics, got {other:?}"),
        }
    }
}
