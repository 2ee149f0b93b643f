//! The coercion pass.
//!
//! Applies coercions at the places the language fixes a target type:
//! declaration initializers, assignment sources, `if`/`while` conditions
//! (contextual bool), and `return` values. Operator operands are handled by
//! the resolver's matching instead.

use tern_ast::arena::NodeId;
use tern_ast::builder::Builder;
use tern_ast::context::AstContext;
use tern_ast::decl::{self, DeclKind};
use tern_ast::expr::{self, ExprKind};
use tern_ast::node::NodeKind;
use tern_ast::stmt::{self, StmtKind};
use tern_ast::{print, traversal, types};
use tracing::debug;

use crate::coercion::{self, CoercionStyle};

pub fn coerce(ctx: &mut AstContext) -> bool {
    let mut modified = false;

    for id in traversal::post_order(&ctx.arena, ctx.root) {
        if ctx.arena.parent(id).is_none() && id != ctx.root {
            continue;
        }

        let kind = ctx.arena.node(id).kind.clone();
        match &kind {
            NodeKind::Decl(d) => match &d.kind {
                DeclKind::Constant => {
                    modified |= coerce_slot(
                        ctx,
                        id,
                        decl::CONSTANT_TYPE,
                        decl::CONSTANT_VALUE,
                        CoercionStyle::TRY_ALL_FOR_ASSIGNMENT,
                    );
                }
                DeclKind::GlobalVariable | DeclKind::LocalVariable => {
                    modified |= coerce_slot(
                        ctx,
                        id,
                        decl::VARIABLE_TYPE,
                        decl::VARIABLE_INIT,
                        CoercionStyle::TRY_ALL_FOR_ASSIGNMENT,
                    );
                }
                _ => {}
            },

            NodeKind::Stmt(s) => match &s.kind {
                StmtKind::If => {
                    modified |= coerce_condition(ctx, id, stmt::IF_CONDITION);
                }
                StmtKind::While => {
                    modified |= coerce_condition(ctx, id, stmt::WHILE_CONDITION);
                }
                StmtKind::Return => {
                    modified |= coerce_return(ctx, id);
                }
                _ => {}
            },

            NodeKind::Expr(e) => {
                if matches!(e.kind, ExprKind::Assign) {
                    modified |= coerce_assign(ctx, id);
                }
            }

            _ => {}
        }
    }

    modified
}

/// Coerces the expression in `value_slot` to the declared type in
/// `type_slot`, replacing the child on success.
fn coerce_slot(
    ctx: &mut AstContext,
    node: NodeId,
    type_slot: usize,
    value_slot: usize,
    style: CoercionStyle,
) -> bool {
    let (Some(ty), Some(value)) = (
        ctx.arena.child(node, type_slot),
        ctx.arena.child(node, value_slot),
    ) else {
        return false;
    };

    if !types::is_resolved_qt(&ctx.arena, ty) || !expr::is_resolved(&ctx.arena, value) {
        return false;
    }

    let src = expr::expr_type(&ctx.arena, value);
    if src.is_some_and(|s| types::same_type_except_constness(&ctx.arena, s, ty)) {
        return false;
    }

    let result = {
        let mut b = Builder::new(ctx);
        coercion::coerce_expression(&mut b, value, ty, style)
    };

    match result {
        Ok(x) if x.new_expression => {
            debug!(
                target: "resolver",
                "coerced {} to {}",
                print::expr_to_string(&ctx.arena, value),
                print::type_to_string(&ctx.arena, ty)
            );
            ctx.arena.set_child(node, value_slot, Some(x.expr));
            true
        }
        Ok(_) => false,
        Err(()) => {
            let (src_s, dst_s) = (
                src.map(|s| print::type_to_string(&ctx.arena, s))
                    .unwrap_or_else(|| "<unknown>".to_string()),
                print::type_to_string(&ctx.arena, ty),
            );
            ctx.arena.add_error(
                node,
                format!("cannot coerce expression of type {src_s} to type {dst_s}"),
            );
            false
        }
    }
}

/// Conditions get contextual-bool conversion.
fn coerce_condition(ctx: &mut AstContext, node: NodeId, slot: usize) -> bool {
    let Some(cond) = ctx.arena.child(node, slot) else {
        return false;
    };
    if !expr::is_resolved(&ctx.arena, cond) {
        return false;
    }

    let already_bool = expr::expr_type(&ctx.arena, cond)
        .and_then(|qt| types::unqualified(&ctx.arena, qt))
        .and_then(|t| types::type_data(&ctx.arena, t))
        .is_some_and(|d| matches!(d.kind, types::TypeKind::Bool));
    if already_bool {
        return false;
    }

    let result = {
        let mut b = Builder::new(ctx);
        let bool_t = b.type_bool();
        let dst = b.qualified_type(bool_t, true);
        coercion::coerce_expression(
            &mut b,
            cond,
            dst,
            CoercionStyle::TRY_ALL_FOR_ASSIGNMENT | CoercionStyle::CONTEXTUAL_CONVERSION,
        )
    };

    match result {
        Ok(x) if x.new_expression => {
            ctx.arena.set_child(node, slot, Some(x.expr));
            true
        }
        Ok(_) => false,
        Err(()) => {
            ctx.arena
                .add_error(node, "condition is not convertible to bool".to_string());
            false
        }
    }
}

/// A `return e` coerces `e` to the enclosing function's result type, once
/// both are known.
fn coerce_return(ctx: &mut AstContext, node: NodeId) -> bool {
    let Some(value) = ctx.arena.child(node, 0) else {
        return false;
    };
    if !expr::is_resolved(&ctx.arena, value) {
        return false;
    }

    let func = ctx.arena.ancestor_where(node, |n| {
        matches!(
            n.as_decl().map(|d| &d.kind),
            Some(DeclKind::Function)
        )
    });
    let Some(func) = func else {
        return false;
    };

    let result_ty = ctx
        .arena
        .child(func, decl::FUNCTION_TYPE)
        .and_then(|qt| types::unqualified(&ctx.arena, qt))
        .and_then(|ft| types::function_result(&ctx.arena, ft));
    let Some(result_ty) = result_ty else {
        return false;
    };

    if !types::is_resolved_qt(&ctx.arena, result_ty) {
        return false;
    }

    let src = expr::expr_type(&ctx.arena, value);
    if src.is_some_and(|s| types::same_type_except_constness(&ctx.arena, s, result_ty)) {
        return false;
    }

    let result = {
        let mut b = Builder::new(ctx);
        coercion::coerce_expression(
            &mut b,
            value,
            result_ty,
            CoercionStyle::TRY_ALL_FOR_ASSIGNMENT,
        )
    };

    match result {
        Ok(x) if x.new_expression => {
            ctx.arena.set_child(node, 0, Some(x.expr));
            true
        }
        Ok(_) => false,
        Err(()) => {
            ctx.arena.add_error(
                node,
                "returned value is incompatible with the function's result type".to_string(),
            );
            false
        }
    }
}

/// Assignment coerces the source to the target's type.
fn coerce_assign(ctx: &mut AstContext, node: NodeId) -> bool {
    let (Some(target), Some(source)) =
        (ctx.arena.child(node, 0), ctx.arena.child(node, 1))
    else {
        return false;
    };

    if !expr::is_resolved(&ctx.arena, target) || !expr::is_resolved(&ctx.arena, source) {
        return false;
    }

    let Some(target_ty) = expr::expr_type(&ctx.arena, target) else {
        return false;
    };

    let src = expr::expr_type(&ctx.arena, source);
    if src.is_some_and(|s| types::same_type_except_constness(&ctx.arena, s, target_ty)) {
        return false;
    }

    let result = {
        let mut b = Builder::new(ctx);
        coercion::coerce_expression(
            &mut b,
            source,
            target_ty,
            CoercionStyle::TRY_ALL_FOR_ASSIGNMENT,
        )
    };

    match result {
        Ok(x) if x.new_expression => {
            ctx.arena.set_child(node, 1, Some(x.expr));
            true
        }
        Ok(_) => false,
        Err(()) => {
            ctx.arena
                .add_error(node, "cannot coerce assignment source to target type");
            false
        }
    }
}
