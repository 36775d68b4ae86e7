//! Pre-initialization validation.
//!
//! Validates target directory state before scaffolding.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Initialization mode determines validation rules.
#[derive(Debug, Clone, Copy)]
pub enum InitMode {
    /// `chenu init` - initialize in current directory (must be empty)
    CurrentDir,
    /// `chenu init <dir>` - create or fill a directory (must be empty if it exists)
    NewDir,
}

/// Validate target directory for initialization.
///
/// # Rules
/// - `CurrentDir`: directory must be empty
/// - `NewDir`: directory must not exist, or be empty
pub fn validate_target(root: &Path, mode: InitMode) -> Result<()> {
    if root.exists() && !root.is_dir() {
        bail!("'{}' exists and is not a directory.", root.display());
    }
    if is_empty(root)? {
        return Ok(());
    }

    match mode {
        InitMode::CurrentDir => bail!(
            "Current directory is not empty.\n\
             Use `chenu init <dir>` to create the menu in a new subdirectory."
        ),
        InitMode::NewDir => bail!(
            "Directory '{}' is not empty.\n\
             Choose a different directory or remove its contents.",
            root.display()
        ),
    }
}

/// Check if directory is empty or doesn't exist.
fn is_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let is_empty = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory '{}'", path.display()))?
        .next()
        .is_none();
    Ok(is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_dir_current_mode() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_ok());
    }

    #[test]
    fn test_non_empty_dir_current_mode() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file.txt"), "content").unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_err());
    }

    #[test]
    fn test_empty_existing_dir_new_mode() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::NewDir).is_ok());
    }

    #[test]
    fn test_non_empty_dir_new_mode() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        assert!(validate_target(temp.path(), InitMode::NewDir).is_err());
    }

    #[test]
    fn test_file_target_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("menu");
        fs::write(&file, "").unwrap();
        assert!(validate_target(&file, InitMode::NewDir).is_err());
    }

    #[test]
    fn test_non_existing_dir_new_mode() {
        let temp = TempDir::new().unwrap();
        let new_path = temp.path().join("new_menu");
        assert!(validate_target(&new_path, InitMode::NewDir).is_ok());
    }
}
