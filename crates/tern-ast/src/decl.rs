//! Declaration nodes.
//!
//! A declaration binds a local identifier to a meaning and carries a linkage.
//! Child slot layout is fixed per variant and documented on each; null slots
//! are preserved so indices stay stable.

use std::path::PathBuf;

use tern_common::Id;

use crate::arena::{NodeArena, NodeId};
use crate::module::ModuleUid;

/// Linkage defining visibility/accessibility of a declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Linkage {
    /// Executes automatically at startup, not otherwise accessible.
    Init,
    /// Executes automatically at load time, even before the runtime library
    /// is fully set up.
    PreInit,
    /// Method bound to a record type.
    Struct,
    /// Accessible only locally.
    #[default]
    Private,
    /// Accessible across modules.
    Public,
}

impl Linkage {
    pub fn as_str(self) -> &'static str {
        match self {
            Linkage::Init => "init",
            Linkage::PreInit => "preinit",
            Linkage::Struct => "struct",
            Linkage::Private => "private",
            Linkage::Public => "public",
        }
    }
}

impl std::fmt::Display for Linkage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Passing convention of a function parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParameterKind {
    #[default]
    In,
    InOut,
    Copy,
}

/// Common declaration payload. The canonical ID is computed during AST
/// processing and is globally unique and stable across runs; side tables
/// (notably inferred `auto` parameter types) key on it.
#[derive(Clone, Debug)]
pub struct DeclData {
    pub id: Id,
    pub linkage: Linkage,
    pub canonical_id: Option<Id>,
    pub kind: DeclKind,
}

impl DeclData {
    pub fn new(id: Id, linkage: Linkage, kind: DeclKind) -> Self {
        DeclData {
            id,
            linkage,
            canonical_id: None,
            kind,
        }
    }

    /// User-facing name for the kind of object declared; used in error
    /// messages.
    pub fn display_name(&self) -> &'static str {
        match &self.kind {
            DeclKind::Constant => "constant",
            DeclKind::Expression => "expression",
            DeclKind::GlobalVariable => "global variable",
            DeclKind::LocalVariable => "local variable",
            DeclKind::Parameter { .. } => "parameter",
            DeclKind::Field => "field",
            DeclKind::Function => "function",
            DeclKind::Module { .. } => "module",
            DeclKind::ImportedModule { .. } => "imported module",
            DeclKind::Type => "type",
            DeclKind::Property => "property",
        }
    }
}

/// Declaration variants with their child slot layouts.
#[derive(Clone, Debug)]
pub enum DeclKind {
    /// Children: `[type?, value]`.
    Constant,
    /// An alias for an expression. Children: `[expr]`.
    Expression,
    /// Children: `[type?, init?]`.
    GlobalVariable,
    /// Children: `[type?, init?]`.
    LocalVariable,
    /// Children: `[type, default?]`.
    Parameter {
        kind: ParameterKind,
        is_type_param: bool,
    },
    /// Record field, possibly an inline function.
    /// Children: `[type, attributes?, default?, inline_function?]`.
    Field,
    /// Children: `[ftype, body?]` where `ftype` is a qualified function type
    /// whose parameter declarations hang off the type node.
    Function,
    /// A module. Children: `[block, declarations...]`.
    Module {
        uid: ModuleUid,
        scope_path: Id,
        /// Direct dependencies recorded when imports resolve.
        dependencies: Vec<ModuleUid>,
    },
    /// An import of another module; no children. The UID and the imported
    /// module's node are attached when the resolver performs the import.
    ImportedModule {
        scope: Option<Id>,
        parse_extension: String,
        process_extension: Option<String>,
        search_directories: Vec<PathBuf>,
        uid: Option<ModuleUid>,
        module_node: Option<NodeId>,
    },
    /// A type declaration. Children: `[type, attributes?]` where `type` is
    /// the qualified payload type.
    Type,
    /// Module property. Children: `[value?]`.
    Property,
}

// Child slot indices per variant.
pub const CONSTANT_TYPE: usize = 0;
pub const CONSTANT_VALUE: usize = 1;
pub const VARIABLE_TYPE: usize = 0;
pub const VARIABLE_INIT: usize = 1;
pub const PARAMETER_TYPE: usize = 0;
pub const PARAMETER_DEFAULT: usize = 1;
pub const FIELD_TYPE: usize = 0;
pub const FIELD_ATTRIBUTES: usize = 1;
pub const FIELD_DEFAULT: usize = 2;
pub const FIELD_INLINE_FUNCTION: usize = 3;
pub const FUNCTION_TYPE: usize = 0;
pub const FUNCTION_BODY: usize = 1;
pub const MODULE_BLOCK: usize = 0;
pub const TYPE_DECL_TYPE: usize = 0;
pub const TYPE_DECL_ATTRIBUTES: usize = 1;

/// Returns the declaration data of a node, if it is a declaration.
pub fn decl<'a>(arena: &'a NodeArena, id: NodeId) -> Option<&'a DeclData> {
    arena.node(id).as_decl()
}

/// Returns a declaration's declared/inferred qualified type node, if known.
///
/// For variables without an explicit type this falls back to the
/// initializer's type; for constants to the value's type.
pub fn decl_type(arena: &NodeArena, id: NodeId) -> Option<NodeId> {
    let d = decl(arena, id)?;
    match &d.kind {
        DeclKind::Constant => arena
            .child(id, CONSTANT_TYPE)
            .or_else(|| crate::expr::expr_type(arena, arena.child(id, CONSTANT_VALUE)?)),
        DeclKind::GlobalVariable | DeclKind::LocalVariable => arena
            .child(id, VARIABLE_TYPE)
            .or_else(|| crate::expr::expr_type(arena, arena.child(id, VARIABLE_INIT)?)),
        DeclKind::Parameter { .. } => arena.child(id, PARAMETER_TYPE),
        DeclKind::Field => arena.child(id, FIELD_TYPE),
        DeclKind::Function => arena.child(id, FUNCTION_TYPE),
        DeclKind::Expression => crate::expr::expr_type(arena, arena.child(id, 0)?),
        DeclKind::Module { .. }
        | DeclKind::ImportedModule { .. }
        | DeclKind::Type
        | DeclKind::Property => None,
    }
}

/// True if the declaration's binding is immutable.
pub fn decl_is_constant(arena: &NodeArena, id: NodeId) -> bool {
    match decl(arena, id).map(|d| &d.kind) {
        Some(DeclKind::Constant) => true,
        Some(DeclKind::Parameter { kind, .. }) => matches!(kind, ParameterKind::In),
        _ => false,
    }
}

/// Returns the module declaration enclosing a node, if any.
pub fn enclosing_module(arena: &NodeArena, id: NodeId) -> Option<NodeId> {
    arena.ancestor_where(id, |n| {
        matches!(
            n.as_decl().map(|d| &d.kind),
            Some(DeclKind::Module { .. })
        )
    })
}

/// Top-level declarations of a module node (skipping its statement block).
pub fn module_declarations(arena: &NodeArena, module: NodeId) -> Vec<NodeId> {
    arena.children(module)[1..]
        .iter()
        .copied()
        .flatten()
        .collect()
}
