//! Project initialization.
//!
//! # Module Structure
//!
//! - [`validate`]: Pre-initialization validation
//! - [`structure`]: Directory structure creation
//! - [`files`]: Config, `package.json` and source scaffolding
//! - [`install`]: Runtime and bundler installation

mod files;
mod install;
mod structure;
mod validate;

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cli::PackageManager;
use crate::log;
use validate::InitMode;

/// Options collected from `chenu init`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub dir: Option<PathBuf>,
    pub title: Option<String>,
    pub package_manager: PackageManager,
    pub skip_install: bool,
    /// Config file name to write
    pub config_name: PathBuf,
}

/// Scaffold a new cheat menu project.
///
/// # Steps
/// 1. Validate target directory
/// 2. Create directory structure
/// 3. Write scaffold files
/// 4. Install dependencies (failures are warnings)
pub fn new_menu(options: InitOptions) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let (root, mode) = match &options.dir {
        Some(dir) => (cwd.join(dir), InitMode::NewDir),
        None => (cwd, InitMode::CurrentDir),
    };

    validate::validate_target(&root, mode)?;

    let title = match options.title {
        Some(title) => title,
        None => prompt_title(&mut io::stdin().lock(), &default_title(&root))?,
    };

    structure::create_structure(&root)?;
    let config_name = options
        .config_name
        .file_name()
        .map_or_else(|| PathBuf::from("cheat-menu.toml"), PathBuf::from);
    files::write_files(&root, &config_name, &title)?;

    if !options.skip_install {
        install_dependencies(options.package_manager, &root);
    }

    log!("init"; "cheat menu initialized in {}", root.display());
    Ok(())
}

fn install_dependencies(manager: PackageManager, root: &Path) {
    let results = [
        install::install(manager, root, install::RUNTIME_PACKAGES, false),
        install::install(manager, root, install::DEV_PACKAGES, true),
    ];
    for err in results.into_iter().filter_map(Result::err) {
        log!("warning"; "{}: {}", err, err.source);
        log!("warning"; "{}", err.remediation());
    }
}

/// Ask for the menu title; an empty answer takes `default`.
fn prompt_title(input: &mut impl BufRead, default: &str) -> Result<String> {
    print!("Menu title [{default}]: ");
    io::stdout().flush().ok();

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read title")?;
    let answer = line.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

fn default_title(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Cheat Menu".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_title_answer() {
        let mut input = io::Cursor::new("  Speed Menu \n");
        assert_eq!(prompt_title(&mut input, "x").unwrap(), "Speed Menu");
    }

    #[test]
    fn test_prompt_title_default() {
        let mut input = io::Cursor::new("\n");
        assert_eq!(prompt_title(&mut input, "my-menu").unwrap(), "my-menu");

        let mut eof = io::Cursor::new("");
        assert_eq!(prompt_title(&mut eof, "my-menu").unwrap(), "my-menu");
    }

    #[test]
    fn test_default_title() {
        assert_eq!(default_title(Path::new("/tmp/speed")), "speed");
        assert_eq!(default_title(Path::new("/")), "Cheat Menu");
    }

    #[test]
    fn test_new_menu_skip_install() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("menu");

        new_menu(InitOptions {
            dir: Some(dir.clone()),
            title: Some("Menu".into()),
            package_manager: PackageManager::Npm,
            skip_install: true,
            config_name: PathBuf::from("cheat-menu.toml"),
        })
        .unwrap();

        assert!(dir.join("cheat-menu.toml").is_file());
        assert!(dir.join("src/index.ts").is_file());
        assert!(dir.join("src/hacks").is_dir());
    }
}
