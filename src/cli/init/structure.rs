//! Project directory structure creation.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Directories every new project starts with.
const PROJECT_DIRS: &[&str] = &["src/hacks"];

/// Create the project layout at `root`, creating `root` itself if needed.
pub fn create_structure(root: &Path) -> Result<()> {
    for dir in PROJECT_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_structure() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("my_menu");

        create_structure(&root).unwrap();

        assert!(root.join("src/hacks").is_dir());
    }

    #[test]
    fn test_create_structure_existing_root() {
        let temp = TempDir::new().unwrap();
        create_structure(temp.path()).unwrap();
        create_structure(temp.path()).unwrap();

        assert!(temp.path().join("src/hacks").is_dir());
    }
}
