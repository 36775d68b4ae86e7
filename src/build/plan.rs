//! Bundler input derived from the project layout and `[menu]`.

use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, ProjectConfig};
use crate::utils::path::import_specifier;

use super::Diagnostic;

/// Name of the global constant that carries the serialized `[menu]`.
pub const CONFIG_DEFINE: &str = "CHEATMENUCONFIG";

/// Everything a bundler needs for one build.
#[derive(Debug, Clone)]
pub struct BundlePlan {
    /// Project root; imports and module resolution are relative to it.
    pub root: PathBuf,
    /// Hack modules (sorted) followed by the menu entry file.
    pub entries: Vec<PathBuf>,
    /// `(name, json)` constant definition.
    pub define: (String, String),
    pub output_name: String,
    pub minify: bool,
    pub extra_args: Vec<String>,
}

impl BundlePlan {
    /// Discover entries on disk.
    ///
    /// Hacks are every `*.ts`/`*.tsx` below the hacks directory; a missing
    /// hacks directory just means no hacks, a missing entry file is an error.
    pub fn collect(config: &ProjectConfig, menu: &BuildConfig) -> Result<Self, Diagnostic> {
        let entry = config.entry_file();
        if !entry.is_file() {
            return Err(Diagnostic::new(
                format!(
                    "entry file `{}` not found",
                    config.root_relative(&entry).display()
                ),
                "create it or point `build.entry` at the menu entry point",
            ));
        }

        let mut entries = discover_hacks(&config.hacks_dir());
        crate::debug!("build"; "found {}", crate::utils::plural_count(entries.len(), "hack"));
        entries.push(entry);

        Ok(Self {
            root: config.get_root().to_path_buf(),
            entries,
            define: (CONFIG_DEFINE.to_string(), menu.to_define()),
            output_name: config.build.bundle.clone(),
            minify: config.build.minify,
            extra_args: config.build.args.clone(),
        })
    }

    /// A module importing every entry in order, so the bundler sees a single
    /// entry point and emits a single artifact.
    pub fn import_shim(&self) -> String {
        self.entries
            .iter()
            .map(|path| {
                let specifier = import_specifier(&self.root, path);
                format!("import {};\n", serde_json::Value::String(specifier))
            })
            .collect()
    }
}

/// Hack sources below `dir`, sorted for a deterministic bundle order.
pub fn discover_hacks(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut hacks: Vec<PathBuf> = jwalk::WalkDir::new(dir)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| is_hack_source(path))
        .collect();
    hacks.sort();
    hacks
}

fn is_hack_source(path: &Path) -> bool {
    let is_declaration = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".d.ts"));
    let is_ts = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "tsx")
    );
    is_ts && !is_declaration
}
