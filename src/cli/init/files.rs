//! Scaffold file generation.
//!
//! Writes the config, `package.json`, entry point and an example hack for a
//! new project.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::embed::init::{
    CONFIG_TOML, ConfigVars, EXAMPLE_HACK_TS, GITIGNORE, INDEX_TS, PACKAGE_JSON, PackageVars,
    Static,
};

/// Write every scaffold file. `config_name` is the config file name to use.
pub fn write_files(root: &Path, config_name: &Path, title: &str) -> Result<()> {
    write(root, config_name, CONFIG_TOML.render(&ConfigVars { title }))?;
    write(
        root,
        "package.json",
        PACKAGE_JSON.render(&PackageVars {
            name: &package_name(root),
        }),
    )?;
    write(root, "src/index.ts", INDEX_TS.render(&Static))?;
    write(root, "src/hacks/example.ts", EXAMPLE_HACK_TS.render(&Static))?;

    let gitignore = root.join(".gitignore");
    // Only create if doesn't exist (don't overwrite user's ignore file)
    if !gitignore.exists() {
        write(root, ".gitignore", GITIGNORE.render(&Static))?;
    }
    Ok(())
}

fn write(root: &Path, name: impl AsRef<Path>, content: String) -> Result<()> {
    let path = root.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write '{}'", path.display()))
}

/// npm package name derived from the project directory.
///
/// Lowercase, with anything outside `[a-z0-9._-]` turned into `-`.
pub fn package_name(root: &Path) -> String {
    let raw = root
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let name: String = raw
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '-',
        })
        .collect();
    let name = name.trim_matches(|c| c == '-' || c == '.' || c == '_');

    if name.is_empty() {
        "cheat-menu".to_string()
    } else {
        name.to_string()
    }
}
