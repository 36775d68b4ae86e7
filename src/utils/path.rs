//! Path helpers.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`), then falls
/// back to joining relative paths onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Module specifier for `path` as seen from a file in `root`.
///
/// Always `/`-separated and `./`-prefixed, so bundlers never mistake it for
/// a package name: `root/src/hacks/a.ts` -> `./src/hacks/a.ts`.
pub fn import_specifier(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if relative.is_absolute() {
        // Outside the root: keep it absolute
        path.to_string_lossy().replace('\\', "/")
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.ts"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_import_specifier_inside_root() {
        let root = Path::new("/menu");
        assert_eq!(
            import_specifier(root, Path::new("/menu/src/hacks/speed.ts")),
            "./src/hacks/speed.ts"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_import_specifier_outside_root() {
        let root = Path::new("/menu");
        assert_eq!(
            import_specifier(root, Path::new("/elsewhere/index.ts")),
            "/elsewhere/index.ts"
        );
    }
}
