use std::path::PathBuf;

use notify::RecursiveMode;

use crate::actor::fs::WatchScope;
use crate::config::ProjectConfig;
use crate::utils::path::normalize_path;

/// Source tree recursively, plus the project root shallowly for the config
/// file (editors often replace it with a rename, which a file watch misses).
pub(super) fn collect_watch_roots(config: &ProjectConfig) -> Vec<(PathBuf, RecursiveMode)> {
    let src = normalize_path(&config.src_dir());
    let root = config.get_root().to_path_buf();

    let mut roots = vec![(src.clone(), RecursiveMode::Recursive)];
    if src != root {
        roots.push((root, RecursiveMode::NonRecursive));
    }
    roots
}

pub(super) fn watch_scope(config: &ProjectConfig) -> WatchScope {
    WatchScope {
        src_dir: normalize_path(&config.src_dir()),
        config_path: config.config_path.clone(),
        excluded: vec![normalize_path(&config.output_dir())],
    }
}
