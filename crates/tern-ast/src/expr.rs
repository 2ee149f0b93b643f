//! Expression nodes.
//!
//! Expressions report a qualified type through `expr_type`; unresolved ones
//! (names without a declaration, unresolved operators) report `auto` or
//! nothing, which is what drives the resolver's fixed point: a node counts as
//! resolved once its type does.

use tern_common::Id;

use crate::arena::{NodeArena, NodeId};
use crate::ctor;
use crate::decl::{self, DeclKind};
use crate::operator;
use crate::types;

/// Keyword expressions with context-dependent meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    /// `self` inside a method.
    Self_,
    /// `$$`, the implicit argument; spelled `__dd` internally.
    DollarDollar,
    /// The current module's scope name; types as `string`.
    Scope,
    Captures,
}

/// Identifies which operator implementation a resolved operator uses.
#[derive(Clone, Debug)]
pub enum ResolvedOp {
    /// An operator from the registry.
    Registry(operator::OperatorId),
    /// A call bound to a function declaration.
    FunctionCall { decl: NodeId },
    /// A cast realized as a plain coercion.
    CastedCoercion,
}

/// Expression variants and their child slot layouts.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// An identifier reference; the resolver attaches the declaration.
    /// No children.
    Name { id: Id, decl: Option<NodeId> },
    /// A member selector (right-hand side of `.`); children: `[type]`.
    Member { id: Id },
    /// Children: `[ctor]`.
    Ctor,
    /// An operator usage not yet matched against the registry.
    /// Children: `[type(auto), operands...]`.
    UnresolvedOperator { kind: operator::Kind },
    /// A matched operator. Children: `[result_type, operands...]`.
    ResolvedOperator {
        kind: operator::Kind,
        op: ResolvedOp,
    },
    /// An expression whose value has been coerced to a new type.
    /// Children: `[type, inner]`.
    Coerced,
    /// Children: `[inner]`.
    Grouping,
    /// Children: `[condition, true_value, false_value]`.
    Ternary,
    /// Children: `[lhs, rhs]`.
    LogicalAnd,
    /// Children: `[lhs, rhs]`.
    LogicalOr,
    /// Children: `[inner]`.
    LogicalNot,
    /// Children: `[type]`.
    Keyword { keyword: Keyword },
    /// Evaluation delayed until the value is first used.
    /// Children: `[type, inner]`.
    Deferred { catches_exceptions: bool },
    /// `[expr for x in seq (if cond)]`.
    /// Children: `[type, input, output, local_decl, condition?]`.
    ListComprehension,
    /// Children: `[target, source]`.
    Assign,
    /// A type used in expression position (e.g. the target of a cast).
    /// Children: `[type]`.
    TypeExpr,
    /// Children: `[type]`.
    Void,
}

#[derive(Clone, Debug)]
pub struct ExprData {
    pub kind: ExprKind,
}

impl ExprData {
    pub fn new(kind: ExprKind) -> Self {
        ExprData { kind }
    }
}

// Child slot indices.
pub const OPERATOR_TYPE: usize = 0;
pub const OPERATOR_FIRST_OPERAND: usize = 1;
pub const COERCED_TYPE: usize = 0;
pub const COERCED_INNER: usize = 1;
pub const DEFERRED_TYPE: usize = 0;
pub const DEFERRED_INNER: usize = 1;
pub const COMPREHENSION_TYPE: usize = 0;
pub const COMPREHENSION_INPUT: usize = 1;
pub const COMPREHENSION_OUTPUT: usize = 2;
pub const COMPREHENSION_LOCAL: usize = 3;
pub const COMPREHENSION_CONDITION: usize = 4;

pub fn expr<'a>(arena: &'a NodeArena, id: NodeId) -> Option<&'a ExprData> {
    arena.node(id).as_expr()
}

/// The operand expressions of an (un)resolved operator node.
pub fn operands(arena: &NodeArena, id: NodeId) -> Vec<NodeId> {
    arena.children(id)[OPERATOR_FIRST_OPERAND.min(arena.children(id).len())..]
        .iter()
        .copied()
        .flatten()
        .collect()
}

/// The qualified type of an expression, if known.
pub fn expr_type(arena: &NodeArena, id: NodeId) -> Option<NodeId> {
    let e = expr(arena, id)?;
    match &e.kind {
        ExprKind::Name { decl, .. } => decl.and_then(|d| decl::decl_type(arena, d)),
        ExprKind::Member { .. } => arena.child(id, 0),
        ExprKind::Ctor => ctor::ctor_type(arena, arena.child(id, 0)?),
        ExprKind::UnresolvedOperator { .. } | ExprKind::ResolvedOperator { .. } => {
            arena.child(id, OPERATOR_TYPE)
        }
        ExprKind::Coerced => arena.child(id, COERCED_TYPE),
        ExprKind::Grouping | ExprKind::LogicalNot => {
            expr_type(arena, arena.child(id, 0)?)
        }
        ExprKind::Ternary => expr_type(arena, arena.child(id, 1)?),
        ExprKind::LogicalAnd | ExprKind::LogicalOr => {
            // Both sides must be bool; report the left's type (which the
            // validator checks to be bool).
            expr_type(arena, arena.child(id, 0)?)
        }
        ExprKind::Keyword { .. } => arena.child(id, 0),
        ExprKind::Deferred { .. } => arena.child(id, DEFERRED_TYPE),
        ExprKind::ListComprehension => arena.child(id, COMPREHENSION_TYPE),
        ExprKind::Assign => expr_type(arena, arena.child(id, 0)?),
        ExprKind::TypeExpr => arena.child(id, 0),
        ExprKind::Void => arena.child(id, 0),
    }
}

/// True once the expression's type is fully known.
pub fn is_resolved(arena: &NodeArena, id: NodeId) -> bool {
    let Some(e) = expr(arena, id) else {
        return false;
    };

    match &e.kind {
        ExprKind::Name { decl, .. } => match decl {
            Some(d) => match decl::decl_type(arena, *d) {
                Some(t) => types::is_resolved_qt(arena, t),
                // Names may legitimately point at declarations without a
                // value type (modules, types); those count as resolved.
                None => true,
            },
            None => false,
        },
        ExprKind::UnresolvedOperator { .. } => false,
        _ => match expr_type(arena, id) {
            Some(t) => types::is_resolved_qt(arena, t),
            None => false,
        },
    }
}

/// True if all expressions in the list are resolved.
pub fn all_resolved(arena: &NodeArena, ids: &[NodeId]) -> bool {
    ids.iter().all(|&e| is_resolved(arena, e))
}

/// True if the expression denotes an immutable value.
pub fn is_constant(arena: &NodeArena, id: NodeId) -> bool {
    let Some(e) = expr(arena, id) else {
        return false;
    };

    match &e.kind {
        ExprKind::Ctor => true,
        ExprKind::Name { decl, .. } => {
            decl.is_some_and(|d| decl::decl_is_constant(arena, d))
        }
        ExprKind::Coerced => arena
            .child(id, COERCED_INNER)
            .is_some_and(|c| is_constant(arena, c)),
        ExprKind::Grouping => {
            arena.child(id, 0).is_some_and(|c| is_constant(arena, c))
        }
        ExprKind::Member { .. } => true,
        ExprKind::TypeExpr | ExprKind::Void | ExprKind::Keyword { .. } => true,
        ExprKind::ResolvedOperator { .. } => expr_type(arena, id)
            .is_some_and(|t| types::is_constant(arena, t)),
        _ => false,
    }
}
