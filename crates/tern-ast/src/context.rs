//! The compilation context.
//!
//! `AstContext` owns the node arena, the AST root, the module tables, and
//! the (immutable once initialized) operator registry. Modules are created
//! by parse plugins and installed under the root; the resolver triggers
//! imports through `import_module`.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use tern_common::{Id, internal_error};
use tracing::debug;

use crate::arena::{NodeArena, NodeId};
use crate::builder::Builder;
use crate::decl::{DeclKind, module_declarations};
use crate::module::ModuleUid;
use crate::node::{Meta, NodeKind};
use crate::plugin::PluginRegistry;
use crate::registry::Registry;

/// Context-wide options.
#[derive(Clone, Debug, Default)]
pub struct CompilerOptions {
    /// Global module search paths, appended after plugin- and import-local
    /// ones.
    pub library_paths: Vec<PathBuf>,
    pub skip_validation: bool,
}

pub struct AstContext {
    pub arena: NodeArena,
    /// The unique top node parenting all modules.
    pub root: NodeId,
    pub options: CompilerOptions,
    modules_by_uid: IndexMap<ModuleUid, NodeId>,
    modules_by_path: FxHashMap<PathBuf, ModuleUid>,
    modules_by_id_and_scope: FxHashMap<(Id, Option<Id>), ModuleUid>,
    operators: Option<Arc<Registry>>,
    anon_struct_counter: u64,
    synthetic_path_counter: u64,
}

impl AstContext {
    pub fn new(options: CompilerOptions) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(NodeKind::Root, Meta::default());
        arena.get_or_create_scope(root);

        AstContext {
            arena,
            root,
            options,
            modules_by_uid: IndexMap::new(),
            modules_by_path: FxHashMap::default(),
            modules_by_id_and_scope: FxHashMap::default(),
            operators: None,
            anon_struct_counter: 0,
            synthetic_path_counter: 0,
        }
    }

    pub(crate) fn next_anon_struct_id(&mut self) -> u64 {
        self.anon_struct_counter += 1;
        self.anon_struct_counter
    }

    /// Counter for synthetic module paths.
    pub fn next_synthetic_counter(&mut self) -> u64 {
        self.synthetic_path_counter += 1;
        self.synthetic_path_counter
    }

    /// Builds and initializes the operator registry. Runs once per context;
    /// the registry is immutable afterwards.
    pub fn init_operators(&mut self) {
        if self.operators.is_some() {
            return;
        }
        let mut registry = Registry::new();
        for def in crate::operators::catalog() {
            registry.register(def);
        }
        registry.init(self);
        self.operators = Some(Arc::new(registry));
    }

    /// The initialized operator registry.
    pub fn operators(&self) -> Arc<Registry> {
        match &self.operators {
            Some(r) => Arc::clone(r),
            None => internal_error!("operator registry accessed before init"),
        }
    }

    pub fn operators_initialized(&self) -> bool {
        self.operators.is_some()
    }

    // ===== Modules =====

    /// Installs a module declaration under the AST root and indexes it.
    pub fn add_module(&mut self, module: NodeId) -> ModuleUid {
        let Some(DeclKind::Module { uid, scope_path, .. }) =
            self.arena.node(module).as_decl().map(|d| d.kind.clone())
        else {
            internal_error!("add_module() called with a non-module node");
        };

        let scope = if scope_path.is_empty() {
            None
        } else {
            Some(scope_path)
        };

        self.modules_by_uid.insert(uid.clone(), module);
        self.modules_by_path.insert(uid.path.clone(), uid.clone());
        self.modules_by_id_and_scope
            .insert((uid.id.clone(), scope), uid.clone());
        self.arena.add_child(self.root, module);
        uid
    }

    pub fn module_by_uid(&self, uid: &ModuleUid) -> Option<NodeId> {
        self.modules_by_uid.get(uid).copied()
    }

    pub fn modules(&self) -> impl Iterator<Item = (&ModuleUid, NodeId)> {
        self.modules_by_uid.iter().map(|(uid, &n)| (uid, n))
    }

    /// Imports a module by id: searches the library paths for
    /// `[scope/]<lower(id)><parse_extension>`, parses it with the plugin
    /// registered for the extension, and installs it under the root.
    /// Returns the module's UID, or a diagnostic.
    pub fn import_module(
        &mut self,
        plugins: &PluginRegistry,
        id: &Id,
        scope: Option<&Id>,
        parse_extension: &str,
        process_extension: Option<&str>,
        search_dirs: &[PathBuf],
    ) -> Result<ModuleUid, String> {
        if let Some(uid) = self
            .modules_by_id_and_scope
            .get(&(id.clone(), scope.cloned()))
        {
            return Ok(uid.clone());
        }

        let plugin = plugins.plugin_for_extension(parse_extension)?;
        let Some(parse) = plugin.parse.as_ref() else {
            return Err(format!(
                "no plugin provides support for importing *{parse_extension} files"
            ));
        };

        let mut filename = format!(
            "{}{parse_extension}",
            id.as_str().to_lowercase()
        );
        if let Some(scope) = scope {
            filename = format!(
                "{}/{filename}",
                scope.as_str().replace("::", "/")
            );
        }

        let mut library_paths: Vec<PathBuf> = search_dirs.to_vec();
        if let Some(lp) = &plugin.library_paths {
            library_paths.extend(lp(self));
        }
        library_paths.extend(self.options.library_paths.iter().cloned());

        let Some(path) = library_paths
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|p| p.is_file())
        else {
            debug!(target: "compiler", "failed to find module '{filename}' in search paths");
            for p in &library_paths {
                debug!(target: "compiler", "  {}", p.display());
            }
            return Err("cannot find file".to_string());
        };

        let source = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot open source file {}: {e}", path.display()))?;

        debug!(
            target: "compiler",
            "parsing file {} as {} code",
            path.display(),
            plugin.component
        );

        let module = {
            let mut builder = Builder::new(self);
            parse(&mut builder, &source, &path)?
        };

        let module_id = match self.arena.node(module).as_decl() {
            Some(d) => d.id.clone(),
            None => {
                return Err(format!(
                    "parser for {} did not produce a module",
                    path.display()
                ));
            }
        };

        if &module_id != id {
            return Err(format!(
                "file {} does not contain expected module {id} (but {module_id})",
                path.display()
            ));
        }

        // Record the scope path and processing extension before indexing.
        if let Some(d) = self.arena.node_mut(module).as_decl_mut() {
            if let DeclKind::Module {
                uid, scope_path, ..
            } = &mut d.kind
            {
                if let Some(s) = scope {
                    *scope_path = s.clone();
                }
                if let Some(ext) = process_extension {
                    uid.process_extension = ext.to_string();
                }
            }
        }

        Ok(self.add_module(module))
    }

    /// The modules a module depends on through its import declarations.
    /// With `recursive`, computes the transitive closure over the import
    /// edges; cycles are handled.
    pub fn dependencies(&self, uid: &ModuleUid, recursive: bool) -> Vec<ModuleUid> {
        let direct = |uid: &ModuleUid| -> Vec<ModuleUid> {
            let Some(module) = self.module_by_uid(uid) else {
                return Vec::new();
            };
            match self.arena.node(module).as_decl().map(|d| &d.kind) {
                Some(DeclKind::Module { dependencies, .. }) => dependencies.clone(),
                _ => Vec::new(),
            }
        };

        if !recursive {
            return direct(uid);
        }

        let mut seen: FxHashSet<ModuleUid> = FxHashSet::default();
        let mut queue = direct(uid);
        let mut out = Vec::new();

        while let Some(next) = queue.pop() {
            if next == *uid || !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(direct(&next));
            out.push(next);
        }

        out
    }

    /// Records an import edge on a module declaration.
    pub fn add_dependency(&mut self, module: NodeId, dep: ModuleUid) {
        if let Some(d) = self.arena.node_mut(module).as_decl_mut() {
            if let DeclKind::Module { dependencies, .. } = &mut d.kind {
                if !dependencies.contains(&dep) {
                    dependencies.push(dep);
                }
            }
        }
    }

    /// All top-level declarations of every module.
    pub fn all_module_declarations(&self) -> Vec<NodeId> {
        self.modules_by_uid
            .values()
            .flat_map(|&m| module_declarations(&self.arena, m))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/context.rs"]
mod tests;
