use std::path::{Path, PathBuf};

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Installed packages; never part of the menu sources.
const PACKAGES_DIR: &str = "node_modules";

/// Paths whose changes warrant a rebuild.
#[derive(Debug, Clone)]
pub struct WatchScope {
    /// Everything below this directory
    pub src_dir: PathBuf,
    /// Plus this single file
    pub config_path: PathBuf,
    /// Minus everything below these (build output)
    pub excluded: Vec<PathBuf>,
}

impl WatchScope {
    pub fn contains(&self, path: &Path) -> bool {
        if path == self.config_path {
            return true;
        }
        path.starts_with(&self.src_dir)
            && !path.components().any(|c| c.as_os_str() == PACKAGES_DIR)
            && !self.excluded.iter().any(|dir| path.starts_with(dir))
    }
}
