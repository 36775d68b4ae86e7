//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! src = "src"                     # Source root, watched by `chenu dev`
//! hacks = "hacks"                 # Hack modules (relative to src), *.ts / *.tsx
//! entry = "index.ts"              # Menu entry point (relative to src)
//! output = "dist"                 # Output directory for `chenu build`
//! bundle = "bundle.js"            # Output bundle file name
//! bookmarklet = "bookmarklet.txt" # Bookmarklet file name (--generate-bookmarklet)
//! bundler = ["npx", "esbuild"]    # esbuild-compatible bundler command
//! args = []                       # Extra arguments passed to the bundler
//! minify = true                   # Minify the bundle
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    pub src: PathBuf,
    pub hacks: PathBuf,
    pub entry: PathBuf,
    pub output: PathBuf,
    pub bundle: String,
    pub bookmarklet: String,
    pub bundler: Vec<String>,
    pub args: Vec<String>,
    pub minify: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            src: "src".into(),
            hacks: "hacks".into(),
            entry: "index.ts".into(),
            output: "dist".into(),
            bundle: "bundle.js".into(),
            bookmarklet: "bookmarklet.txt".into(),
            bundler: vec!["npx".into(), "esbuild".into()],
            args: Vec::new(),
            minify: true,
        }
    }
}

impl BuildSectionConfig {
    pub const BUNDLER: FieldPath = FieldPath::new("build.bundler");
    pub const BUNDLE: FieldPath = FieldPath::new("build.bundle");
    pub const BOOKMARKLET: FieldPath = FieldPath::new("build.bookmarklet");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.bundler.first().is_none_or(|program| program.trim().is_empty()) {
            diag.error_with_hint(
                Self::BUNDLER,
                "bundler command must not be empty",
                "use the default: bundler = [\"npx\", \"esbuild\"]",
            );
        } else if which::which(&self.bundler[0]).is_err() {
            crate::log!("warning"; "bundler `{}` not found in PATH", self.bundler[0]);
        }

        for (field, name) in [(Self::BUNDLE, &self.bundle), (Self::BOOKMARKLET, &self.bookmarklet)] {
            if name.trim().is_empty() {
                diag.error(field, "file name must not be empty");
            } else if name.contains(['/', '\\']) {
                diag.error_with_hint(
                    field,
                    format!("`{name}` must be a plain file name"),
                    "set the directory with `build.output`",
                );
            }
        }
    }
}
