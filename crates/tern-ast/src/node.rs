//! The node model.
//!
//! Every AST element is a `Node`: a kind tag with variant payload, an ordered
//! child list (null slots preserve positional indexing), a non-owning parent
//! link, metadata, an error list, and an optional lexical scope.
//!
//! Kinds use a two-level tag: the outer `NodeKind` names the category, the
//! payload struct's inner enum names the variant. Common per-category fields
//! (id, linkage, meta) sit in the outer payload; variant-specific data sits in
//! the inner one.

use smallvec::SmallVec;
use tern_common::{AstError, Location};

use crate::arena::NodeId;
use crate::attribute::AttributeData;
use crate::ctor::CtorData;
use crate::decl::DeclData;
use crate::expr::ExprData;
use crate::scope::Scope;
use crate::stmt::StmtData;
use crate::types::TypeData;

/// Per-node metadata: source location, free-form comments, and an optional
/// documentation string.
#[derive(Clone, Debug, Default)]
pub struct Meta {
    pub location: Location,
    pub comments: Vec<String>,
    pub doc: Option<String>,
}

impl Meta {
    pub fn at(location: Location) -> Self {
        Meta {
            location,
            comments: Vec::new(),
            doc: None,
        }
    }
}

/// Constness qualifier attached to a type by `QualifiedType` nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QualifiedTypeData {
    pub is_const: bool,
    /// Set for `auto`-typed placeholders that are yet to be inferred.
    pub is_auto: bool,
}

/// Outer category tag with variant payload.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// The unique top node parenting all modules.
    Root,
    Decl(DeclData),
    Stmt(StmtData),
    Expr(ExprData),
    /// A type with associated constness; child 0 is the unqualified type.
    QualifiedType(QualifiedTypeData),
    Type(TypeData),
    Ctor(CtorData),
    Attribute(AttributeData),
    /// Holds a list of `Attribute` children.
    AttributeSet,
}

impl NodeKind {
    pub fn category(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Decl(_) => "declaration",
            NodeKind::Stmt(_) => "statement",
            NodeKind::Expr(_) => "expression",
            NodeKind::QualifiedType(_) => "qualified type",
            NodeKind::Type(_) => "type",
            NodeKind::Ctor(_) => "ctor",
            NodeKind::Attribute(_) => "attribute",
            NodeKind::AttributeSet => "attribute set",
        }
    }
}

/// One AST node.
#[derive(Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) children: SmallVec<[Option<NodeId>; 4]>,
    pub(crate) parent: Option<NodeId>,
    pub meta: Meta,
    pub errors: Vec<AstError>,
    pub scope: Option<Box<Scope>>,
    /// Stops tree traversal at this node.
    pub prune_walk: bool,
    /// Whether scope lookups climb through this node; when false, lookup
    /// jumps to the enclosing module scope.
    pub inherit_scope: bool,
}

impl Node {
    pub fn new(kind: NodeKind, meta: Meta) -> Self {
        Node {
            kind,
            children: SmallVec::new(),
            parent: None,
            meta,
            errors: Vec::new(),
            scope: None,
            prune_walk: false,
            inherit_scope: true,
        }
    }

    pub fn as_decl(&self) -> Option<&DeclData> {
        match &self.kind {
            NodeKind::Decl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_decl_mut(&mut self) -> Option<&mut DeclData> {
        match &mut self.kind {
            NodeKind::Decl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_stmt(&self) -> Option<&StmtData> {
        match &self.kind {
            NodeKind::Stmt(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&ExprData> {
        match &self.kind {
            NodeKind::Expr(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_expr_mut(&mut self) -> Option<&mut ExprData> {
        match &mut self.kind {
            NodeKind::Expr(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeData> {
        match &self.kind {
            NodeKind::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_type_mut(&mut self) -> Option<&mut TypeData> {
        match &mut self.kind {
            NodeKind::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_ctor(&self) -> Option<&CtorData> {
        match &self.kind {
            NodeKind::Ctor(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_ctor_mut(&mut self) -> Option<&mut CtorData> {
        match &mut self.kind {
            NodeKind::Ctor(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_qualified_type(&self) -> Option<&QualifiedTypeData> {
        match &self.kind {
            NodeKind::QualifiedType(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }
}
