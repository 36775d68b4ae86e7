//! `[menu]` section: the data baked into the bundle.
//!
//! ```toml
//! [menu]
//! title = "Speedrun Tools"
//! categories = ["Movement", "Visuals"]
//! ```
//!
//! Serialized as JSON into the `CHEATMENUCONFIG` constant of every bundle.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Title and category list of a cheat menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub title: String,

    /// Ordered, duplicate-free category names.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl BuildConfig {
    pub const TITLE: FieldPath = FieldPath::new("menu.title");
    pub const CATEGORIES: FieldPath = FieldPath::new("menu.categories");

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            categories: Vec::new(),
        }
    }

    /// JSON value for the `CHEATMENUCONFIG` define.
    pub fn to_define(&self) -> String {
        serde_json::json!({
            "title": self.title,
            "categories": self.categories,
        })
        .to_string()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error_with_hint(
                Self::TITLE,
                "title must not be empty",
                "the title is shown in the menu header",
            );
        }

        let mut seen = FxHashSet::default();
        for name in &self.categories {
            if name.trim().is_empty() {
                diag.error(Self::CATEGORIES, "category names must not be empty");
            } else if !seen.insert(name.as_str()) {
                diag.error(
                    Self::CATEGORIES,
                    format!("category `{name}` is listed more than once"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_is_json() {
        let mut config = BuildConfig::new("Test");
        config.categories = vec!["A".into(), "B \"quoted\"".into()];

        let value: serde_json::Value = serde_json::from_str(&config.to_define()).unwrap();
        assert_eq!(value["title"], "Test");
        assert_eq!(value["categories"][1], "B \"quoted\"");
    }

    #[test]
    fn test_duplicate_categories_rejected() {
        let mut config = BuildConfig::new("Test");
        config.categories = vec!["Movement".into(), "Visuals".into(), "Movement".into()];

        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("Movement"));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut diag = ConfigDiagnostics::new();
        BuildConfig::new("  ").validate(&mut diag);
        assert_eq!(diag.errors()[0].field, BuildConfig::TITLE);
    }

    #[test]
    fn test_empty_categories_allowed() {
        let mut diag = ConfigDiagnostics::new();
        BuildConfig::new("Test").validate(&mut diag);
        assert!(diag.is_empty());
    }
}
