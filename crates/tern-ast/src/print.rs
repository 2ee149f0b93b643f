//! Compact source-like rendering of nodes.
//!
//! Used for error messages (operator prototypes, ambiguity candidate lists)
//! and the debug streams. This is not the target-language emitter; output is
//! best-effort and one line.

use crate::arena::{NodeArena, NodeId};
use crate::ctor::{self, CtorKind};
use crate::decl::DeclKind;
use crate::expr::{self, ExprKind, Keyword};
use crate::node::NodeKind;
use crate::operator;
use crate::stmt::StmtKind;
use crate::types::{self, TypeKind};

/// Renders a type node (qualified or unqualified).
pub fn type_to_string(arena: &NodeArena, id: NodeId) -> String {
    match arena.kind(id) {
        NodeKind::QualifiedType(q) => {
            let inner = match types::unqualified(arena, id) {
                Some(t) => type_to_string(arena, t),
                None => "<missing>".to_string(),
            };
            if q.is_const && !q.is_auto {
                format!("const {inner}")
            } else {
                inner
            }
        }
        NodeKind::Type(d) => {
            if let Some(tid) = &d.type_id {
                return tid.to_string();
            }

            let child = |i: usize| match arena.child(id, i) {
                Some(c) => type_to_string(arena, c),
                None => "*".to_string(),
            };

            match &d.kind {
                TypeKind::SignedInteger { width } => {
                    if d.wildcard {
                        "int<*>".to_string()
                    } else {
                        format!("int<{width}>")
                    }
                }
                TypeKind::UnsignedInteger { width } => {
                    if d.wildcard {
                        "uint<*>".to_string()
                    } else {
                        format!("uint<{width}>")
                    }
                }
                TypeKind::List => format!("list<{}>", child(0)),
                TypeKind::Set => format!("set<{}>", child(0)),
                TypeKind::Vector => format!("vector<{}>", child(0)),
                TypeKind::Map => format!("map<{}, {}>", child(0), child(1)),
                TypeKind::ListIterator => format!("iterator<list<{}>>", child(0)),
                TypeKind::SetIterator => format!("iterator<set<{}>>", child(0)),
                TypeKind::VectorIterator => format!("iterator<vector<{}>>", child(0)),
                TypeKind::MapIterator => format!("iterator<map<{}>>", child(0)),
                TypeKind::Tuple { .. } => {
                    let elems: Vec<String> = arena
                        .children(id)
                        .iter()
                        .copied()
                        .flatten()
                        .map(|c| type_to_string(arena, c))
                        .collect();
                    format!("tuple<{}>", elems.join(", "))
                }
                TypeKind::Optional => format!("optional<{}>", child(0)),
                TypeKind::Result_ => format!("result<{}>", child(0)),
                TypeKind::StrongReference => format!("strong_ref<{}>", child(0)),
                TypeKind::WeakReference => format!("weak_ref<{}>", child(0)),
                TypeKind::ValueReference => format!("value_ref<{}>", child(0)),
                TypeKind::Function { .. } => {
                    let params: Vec<String> = types::function_parameters(arena, id)
                        .iter()
                        .map(|&p| match crate::decl::decl_type(arena, p) {
                            Some(t) => type_to_string(arena, t),
                            None => "<unknown>".to_string(),
                        })
                        .collect();
                    let result = types::function_result(arena, id)
                        .map(|r| type_to_string(arena, r))
                        .unwrap_or_else(|| "void".to_string());
                    format!("function ({}) -> {result}", params.join(", "))
                }
                TypeKind::Member { id } => id.to_string(),
                TypeKind::Name { id, .. } => id.to_string(),
                TypeKind::Library { cxx_name } => format!("library<{cxx_name}>"),
                TypeKind::Type_ => format!("type<{}>", child(0)),
                TypeKind::OperandList { operands } => {
                    let ops: Vec<String> = operands
                        .iter()
                        .map(|o| {
                            let t = type_to_string(arena, o.ty);
                            match &o.id {
                                Some(name) => format!("{name}: {t}"),
                                None => t,
                            }
                        })
                        .collect();
                    format!("({})", ops.join(", "))
                }
                other => types::variant_name(other).to_string(),
            }
        }
        _ => "<not a type>".to_string(),
    }
}

/// Renders an expression node.
pub fn expr_to_string(arena: &NodeArena, id: NodeId) -> String {
    let Some(e) = expr::expr(arena, id) else {
        return "<not an expression>".to_string();
    };

    let child = |i: usize| match arena.child(id, i) {
        Some(c) => expr_to_string(arena, c),
        None => "<none>".to_string(),
    };

    match &e.kind {
        ExprKind::Name { id, .. } => id.to_string(),
        ExprKind::Member { id } => id.to_string(),
        ExprKind::Ctor => match arena.child(id, 0) {
            Some(c) => ctor_to_string(arena, c),
            None => "<ctor>".to_string(),
        },
        ExprKind::UnresolvedOperator { kind } | ExprKind::ResolvedOperator { kind, .. } => {
            operator_instance_to_string(arena, *kind, &expr::operands(arena, id))
        }
        ExprKind::Coerced => child(expr::COERCED_INNER),
        ExprKind::Grouping => format!("({})", child(0)),
        ExprKind::Ternary => format!("{} ? {} : {}", child(0), child(1), child(2)),
        ExprKind::LogicalAnd => format!("{} && {}", child(0), child(1)),
        ExprKind::LogicalOr => format!("{} || {}", child(0), child(1)),
        ExprKind::LogicalNot => format!("! {}", child(0)),
        ExprKind::Keyword { keyword } => match keyword {
            Keyword::Self_ => "self".to_string(),
            Keyword::DollarDollar => "$$".to_string(),
            Keyword::Scope => "scope".to_string(),
            Keyword::Captures => "captures".to_string(),
        },
        ExprKind::Deferred { .. } => format!(".{}", child(expr::DEFERRED_INNER)),
        ExprKind::ListComprehension => format!(
            "[{} for {} in {}]",
            child(expr::COMPREHENSION_OUTPUT),
            arena
                .child(id, expr::COMPREHENSION_LOCAL)
                .and_then(|d| crate::decl::decl(arena, d).map(|d| d.id.to_string()))
                .unwrap_or_else(|| "<local>".to_string()),
            child(expr::COMPREHENSION_INPUT)
        ),
        ExprKind::Assign => format!("{} = {}", child(0), child(1)),
        ExprKind::TypeExpr => match arena.child(id, 0) {
            Some(t) => type_to_string(arena, t),
            None => "<type>".to_string(),
        },
        ExprKind::Void => "<void expression>".to_string(),
    }
}

/// Renders a ctor node.
pub fn ctor_to_string(arena: &NodeArena, id: NodeId) -> String {
    let Some(c) = ctor::ctor(arena, id) else {
        return "<not a ctor>".to_string();
    };

    let values = |sep: &str| {
        ctor::ctor_values(arena, id)
            .iter()
            .map(|&v| expr_to_string(arena, v))
            .collect::<Vec<_>>()
            .join(sep)
    };

    match &c.kind {
        CtorKind::Bool { value } => value.to_string(),
        CtorKind::SignedInteger { value, .. } => value.to_string(),
        CtorKind::UnsignedInteger { value, .. } => value.to_string(),
        CtorKind::Real { value } => format!("{value:.6}"),
        CtorKind::String { value } => format!("\"{value}\""),
        CtorKind::Bytes { value } => format!("b\"{}\"", String::from_utf8_lossy(value)),
        CtorKind::Enum { label, .. } => label.to_string(),
        CtorKind::Null => "Null".to_string(),
        CtorKind::Optional | CtorKind::Result_ => match arena.child(id, 1) {
            Some(v) => expr_to_string(arena, v),
            None => "Null".to_string(),
        },
        CtorKind::Error { message } => format!("error(\"{message}\")"),
        CtorKind::List => format!("[{}]", values(", ")),
        CtorKind::Set => format!("set({})", values(", ")),
        CtorKind::Vector => format!("vector({})", values(", ")),
        CtorKind::Map => {
            let entries: Vec<String> = ctor::ctor_map_entries(arena, id)
                .iter()
                .map(|&(k, v)| {
                    format!(
                        "{}: {}",
                        expr_to_string(arena, k),
                        expr_to_string(arena, v)
                    )
                })
                .collect();
            format!("map({})", entries.join(", "))
        }
        CtorKind::Tuple => format!("({})", values(", ")),
        CtorKind::Struct { .. } => {
            let fields: Vec<String> = ctor::ctor_struct_fields(arena, id)
                .iter()
                .map(|(f, v)| format!("${f}={}", expr_to_string(arena, *v)))
                .collect();
            format!("[{}]", fields.join(", "))
        }
        CtorKind::StrongReference | CtorKind::WeakReference | CtorKind::ValueReference => {
            match arena.child(id, 1) {
                Some(v) => format!("new {}", expr_to_string(arena, v)),
                None => "Null".to_string(),
            }
        }
        CtorKind::Coerced => match arena.child(id, ctor::COERCED_NEW) {
            Some(n) => ctor_to_string(arena, n),
            None => "<coerced>".to_string(),
        },
        CtorKind::Default => "default".to_string(),
    }
}

/// Renders an operator usage with its concrete operands, e.g. `a + 1` or
/// `f(int<32>)` for calls.
pub fn operator_instance_to_string(
    arena: &NodeArena,
    kind: operator::Kind,
    operands: &[NodeId],
) -> String {
    let arg_types = |tuple_expr: NodeId| -> String {
        let Some(ExprKind::Ctor) = expr::expr(arena, tuple_expr).map(|e| &e.kind) else {
            return expr_to_string(arena, tuple_expr);
        };
        let Some(c) = arena.child(tuple_expr, 0) else {
            return String::new();
        };
        ctor::ctor_values(arena, c)
            .iter()
            .map(|&v| match expr::expr_type(arena, v) {
                Some(t) => type_to_string(arena, t),
                None => "<unknown>".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    match kind {
        operator::Kind::Call if operands.len() == 2 => {
            let callee = expr_to_string(arena, operands[0]);
            operator::print_operator(kind, &[callee, arg_types(operands[1])])
        }
        operator::Kind::MemberCall if operands.len() == 3 => {
            let obj = expr_to_string(arena, operands[0]);
            let member = expr_to_string(arena, operands[1]);
            operator::print_operator(kind, &[obj, member, arg_types(operands[2])])
        }
        _ => {
            let ops: Vec<String> = operands
                .iter()
                .map(|&o| expr_to_string(arena, o))
                .collect();
            operator::print_operator(kind, &ops)
        }
    }
}

/// One-line internal rendering of a node for the debug streams.
pub fn render_node(arena: &NodeArena, id: NodeId) -> String {
    let node = arena.node(id);
    let detail = match &node.kind {
        NodeKind::Root => String::new(),
        NodeKind::Decl(d) => format!(
            " {:?} \"{}\" linkage={}",
            variant_of_decl(&d.kind),
            d.id,
            d.linkage
        ),
        NodeKind::Stmt(s) => format!(" {}", variant_of_stmt(&s.kind)),
        NodeKind::Expr(_) => format!(" {}", expr_to_string(arena, id)),
        NodeKind::QualifiedType(_) | NodeKind::Type(_) => {
            format!(" {}", type_to_string(arena, id))
        }
        NodeKind::Ctor(_) => format!(" {}", ctor_to_string(arena, id)),
        NodeKind::Attribute(a) => format!(" {}", a.tag),
        NodeKind::AttributeSet => String::new(),
    };

    let loc = if node.meta.location.is_set() {
        format!(" ({})", node.meta.location)
    } else {
        String::new()
    };

    format!("{}{detail}{loc} {id}", node.kind.category())
}

fn variant_of_decl(kind: &DeclKind) -> &'static str {
    match kind {
        DeclKind::Constant => "constant",
        DeclKind::Expression => "expression",
        DeclKind::GlobalVariable => "global",
        DeclKind::LocalVariable => "local",
        DeclKind::Parameter { .. } => "parameter",
        DeclKind::Field => "field",
        DeclKind::Function => "function",
        DeclKind::Module { .. } => "module",
        DeclKind::ImportedModule { .. } => "import",
        DeclKind::Type => "type",
        DeclKind::Property => "property",
    }
}

fn variant_of_stmt(kind: &StmtKind) -> &'static str {
    match kind {
        StmtKind::Block => "block",
        StmtKind::Declaration => "declaration",
        StmtKind::Expression => "expression",
        StmtKind::If => "if",
        StmtKind::While => "while",
        StmtKind::For => "for",
        StmtKind::Return => "return",
        StmtKind::Switch => "switch",
        StmtKind::SwitchCase { .. } => "case",
        StmtKind::Try => "try",
        StmtKind::Catch => "catch",
        StmtKind::Throw => "throw",
        StmtKind::Assert { .. } => "assert",
        StmtKind::Break => "break",
        StmtKind::Continue => "continue",
    }
}
