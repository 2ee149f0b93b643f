//! Source-language plugins.
//!
//! File extensions map to parse plugins. A plugin declares its component
//! name, extension, target-language includes, library paths, a `parse`
//! entry point, and the AST hooks the pipeline calls in registered order.
//! The `transform` hook is declared but not invoked by any core pass; it is
//! an extension point.

use std::path::{Path, PathBuf};

use crate::arena::NodeId;
use crate::builder::Builder;
use crate::context::AstContext;

pub type ParseHook =
    Box<dyn Fn(&mut Builder<'_>, &str, &Path) -> Result<NodeId, String>>;
pub type AstHook = Box<dyn Fn(&mut AstContext, &PluginRegistry) -> bool>;
pub type ValidateHook = Box<dyn Fn(&mut AstContext, &PluginRegistry)>;
pub type LibraryPathsHook = Box<dyn Fn(&AstContext) -> Vec<PathBuf>>;

pub struct Plugin {
    /// Component name, used in debug output.
    pub component: String,
    /// Plugins run in ascending order.
    pub order: u32,
    /// File extension this plugin parses, including the leading dot.
    pub extension: String,
    /// Target-language headers generated code will need.
    pub cxx_includes: Vec<String>,
    /// Additional module search paths.
    pub library_paths: Option<LibraryPathsHook>,
    /// Parses a source stream into a module declaration node.
    pub parse: Option<ParseHook>,
    pub ast_build_scopes: Option<AstHook>,
    pub ast_normalize: Option<AstHook>,
    pub ast_coerce: Option<AstHook>,
    pub ast_resolve: Option<AstHook>,
    pub ast_validate_pre: Option<ValidateHook>,
    pub ast_validate_post: Option<ValidateHook>,
    /// Declared, but no core pass invokes it.
    pub ast_transform: Option<AstHook>,
}

impl Plugin {
    pub fn new(component: impl Into<String>, extension: impl Into<String>) -> Self {
        Plugin {
            component: component.into(),
            order: 10,
            extension: extension.into(),
            cxx_includes: Vec::new(),
            library_paths: None,
            parse: None,
            ast_build_scopes: None,
            ast_normalize: None,
            ast_coerce: None,
            ast_resolve: None,
            ast_validate_pre: None,
            ast_validate_post: None,
            ast_transform: None,
        }
    }
}

/// The set of registered plugins, ordered by `order`.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        PluginRegistry::default()
    }

    pub fn register(&mut self, plugin: Plugin) {
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| p.order);
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn plugin_for_extension(&self, ext: &str) -> Result<&Plugin, String> {
        self.plugins
            .iter()
            .find(|p| p.extension == ext)
            .ok_or_else(|| format!("no plugin registered for extension {ext}"))
    }
}
