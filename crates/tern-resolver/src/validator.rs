//! The validator.
//!
//! Runs before and after resolution. The pre-pass enforces structural
//! invariants that need no resolution; the post-pass flags everything the
//! resolver failed to resolve. Error collection promotes priorities up the
//! tree and reports only the highest tier actually present, de-duplicated by
//! message and location.
//!
//! Completeness diagnostics from the post-pass carry low priority: when a
//! concrete cause (an unknown id, a failed import) is recorded elsewhere,
//! the generic "has not been resolved" cascade stays silent.

use tern_ast::arena::NodeId;
use tern_ast::context::AstContext;
use tern_ast::decl::{self, DeclKind, Linkage};
use tern_ast::expr::{self, ExprKind};
use tern_ast::node::NodeKind;
use tern_ast::stmt::{self, StmtKind};
use tern_ast::types::TypeKind;
use tern_ast::{print, traversal};
use tern_common::{AstError, ErrorPriority, Location};
use tracing::error;

/// Structural checks that do not require resolution.
pub fn validate_pre(ctx: &mut AstContext) {
    for id in traversal::post_order(&ctx.arena, ctx.root) {
        let kind = ctx.arena.node(id).kind.clone();

        match &kind {
            NodeKind::Stmt(s) => match &s.kind {
                StmtKind::If => {
                    check_child_decl(ctx, id, stmt::IF_INIT, is_local, "'if' init");
                }
                StmtKind::While => {
                    check_child_decl(ctx, id, stmt::WHILE_INIT, is_local, "'while' init");
                }
                StmtKind::For => {
                    check_child_decl(ctx, id, stmt::FOR_LOCAL, is_local, "'for' loop variable");
                }
                StmtKind::Switch => {
                    check_child_decl(
                        ctx,
                        id,
                        stmt::SWITCH_CONDITION,
                        is_local,
                        "'switch' condition",
                    );
                }
                StmtKind::Catch => {
                    check_child_decl(
                        ctx,
                        id,
                        stmt::CATCH_PARAMETER,
                        is_parameter,
                        "'catch' parameter",
                    );
                }
                _ => {}
            },

            NodeKind::Decl(d) => {
                if matches!(d.kind, DeclKind::Function)
                    && d.linkage == Linkage::Struct
                    && !d.id.is_qualified()
                {
                    ctx.arena.add_error_prio(
                        id,
                        "method lacks a type namespace",
                        ErrorPriority::High,
                    );
                }
            }

            _ => {}
        }
    }
}

fn is_local(kind: &DeclKind) -> bool {
    matches!(kind, DeclKind::LocalVariable)
}

fn is_parameter(kind: &DeclKind) -> bool {
    matches!(kind, DeclKind::Parameter { .. })
}

fn check_child_decl(
    ctx: &mut AstContext,
    node: NodeId,
    slot: usize,
    pred: fn(&DeclKind) -> bool,
    what: &str,
) {
    let Some(child) = ctx.arena.child(node, slot) else {
        return;
    };

    let ok = decl::decl(&ctx.arena, child).is_some_and(|d| pred(&d.kind));
    if !ok {
        ctx.arena.add_error_prio(
            node,
            format!("{what} must be a declaration of the expected kind"),
            ErrorPriority::High,
        );
    }
}

/// Resolution-completeness checks.
pub fn validate_post(ctx: &mut AstContext) {
    for id in traversal::post_order(&ctx.arena, ctx.root) {
        let kind = ctx.arena.node(id).kind.clone();

        match &kind {
            NodeKind::Expr(e) => match &e.kind {
                ExprKind::Name { decl: None, id: name } => {
                    ctx.arena.add_error_prio(
                        id,
                        format!("expression '{name}' has not been resolved"),
                        ErrorPriority::Low,
                    );
                }
                ExprKind::UnresolvedOperator { kind } => {
                    let operands = expr::operands(&ctx.arena, id);
                    ctx.arena.add_error_prio(
                        id,
                        format!(
                            "no matching operator found: {}",
                            print::operator_instance_to_string(&ctx.arena, *kind, &operands)
                        ),
                        ErrorPriority::Low,
                    );
                }
                _ => {}
            },

            NodeKind::Type(t) => {
                if let TypeKind::Name { decl: None, id: name } = &t.kind {
                    ctx.arena.add_error_prio(
                        id,
                        format!("type '{name}' has not been resolved"),
                        ErrorPriority::Low,
                    );
                }
            }

            _ => {}
        }
    }
}

/// Gathers all node errors, inheriting the closest location downward and
/// suppressing errors whose subtree already carries one of at least the same
/// priority.
pub fn collect_errors(ctx: &AstContext) -> Vec<AstError> {
    let mut errors = Vec::new();
    collect_recursive(
        ctx,
        ctx.root,
        &Location::default(),
        ErrorPriority::NoError,
        &mut errors,
    );
    errors
}

fn collect_recursive(
    ctx: &AstContext,
    id: NodeId,
    closest_location: &Location,
    prio: ErrorPriority,
    errors: &mut Vec<AstError>,
) -> ErrorPriority {
    let node = ctx.arena.node(id);

    let location = if node.meta.location.is_set() {
        node.meta.location.clone()
    } else {
        closest_location.clone()
    };

    let mut child_prio = prio;
    if !node.prune_walk {
        let inherited = prio;
        for child in ctx.arena.children(id).iter().copied().flatten() {
            child_prio = child_prio.max(collect_recursive(
                ctx, child, &location, inherited, errors,
            ));
        }
    }

    let mut nprio = child_prio;
    for err in &node.errors {
        let mut err = err.clone();
        if !err.location.is_set() && location.is_set() {
            err.location = location.clone();
        }

        if err.priority > child_prio {
            errors.push(err.clone());
        }

        nprio = nprio.max(err.priority);
    }

    nprio
}

/// Reports the errors of the highest priority tier present, de-duplicated by
/// `(message, location)`. Returns them if there were any.
pub fn report(ctx: &AstContext) -> Result<(), Vec<AstError>> {
    let errors = collect_errors(ctx);
    if errors.is_empty() {
        return Ok(());
    }

    let highest = errors
        .iter()
        .map(|e| e.priority)
        .max()
        .unwrap_or(ErrorPriority::Normal);

    let mut reported: Vec<AstError> = Vec::new();
    for e in errors {
        if e.priority != highest {
            continue;
        }
        if reported.iter().any(|r| r.dedup_key() == e.dedup_key()) {
            continue;
        }
        error!(target: "compiler", "{e}");
        reported.push(e);
    }

    Err(reported)
}

/// Runs the registered validation hooks and reports collected errors.
pub fn validate(
    ctx: &mut AstContext,
    plugins: &tern_ast::PluginRegistry,
    pre_resolve: bool,
) -> Result<(), Vec<AstError>> {
    if ctx.options.skip_validation {
        return Ok(());
    }

    for i in 0..plugins.plugins().len() {
        let plugin = &plugins.plugins()[i];
        if pre_resolve {
            if let Some(hook) = &plugin.ast_validate_pre {
                hook(ctx, plugins);
            }
        } else if let Some(hook) = &plugin.ast_validate_post {
            hook(ctx, plugins);
        }
    }

    report(ctx)
}
