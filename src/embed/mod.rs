//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Dev templates (hotreload.js, the delivery snippet)
//! - `init` - Project scaffolding written by `chenu init`
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{HOTRELOAD_JS, HotreloadVars};
//!
//! let js = HOTRELOAD_JS.render(&HotreloadVars { ws_port: 4545 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for hotreload.js.
    pub struct HotreloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HotreloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__CHENU_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Browser-side push client with WebSocket port injection.
    pub const HOTRELOAD_JS: Template<HotreloadVars> =
        Template::new(include_str!("serve/hotreload.js"));
}

pub mod init {
    use super::{Template, TemplateVars};

    /// Variables for the generated `cheat-menu.toml`.
    pub struct ConfigVars<'a> {
        pub title: &'a str,
    }

    impl TemplateVars for ConfigVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__VERSION__", env!("CARGO_PKG_VERSION"))
                .replace("__TITLE__", &toml_string(self.title))
        }
    }

    /// Variables for the generated `package.json`.
    pub struct PackageVars<'a> {
        pub name: &'a str,
    }

    impl TemplateVars for PackageVars<'_> {
        fn apply(&self, content: &str) -> String {
            let name = serde_json::Value::String(self.name.to_string()).to_string();
            content.replace("__NAME__", &name)
        }
    }

    /// No variables.
    pub struct Static;

    impl TemplateVars for Static {
        fn apply(&self, content: &str) -> String {
            content.to_string()
        }
    }

    pub const CONFIG_TOML: Template<ConfigVars<'static>> =
        Template::new(include_str!("init/cheat-menu.toml"));

    pub const PACKAGE_JSON: Template<PackageVars<'static>> =
        Template::new(include_str!("init/package.json"));

    pub const INDEX_TS: Template<Static> = Template::new(include_str!("init/index.ts"));

    pub const EXAMPLE_HACK_TS: Template<Static> = Template::new(include_str!("init/example.ts"));

    pub const GITIGNORE: Template<Static> = Template::new(include_str!("init/gitignore"));

    /// TOML basic string literal.
    fn toml_string(value: &str) -> String {
        toml::Value::String(value.to_string()).to_string()
    }
}
