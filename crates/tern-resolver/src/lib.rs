//! Resolution pipeline for the Tern compiler.
//!
//! This crate provides:
//! - `scope_builder` - Attaches and populates lexical scopes
//! - `normalize` - Canonical IDs and struct-method linkage
//! - `coercion` - The type/ctor/expression/operand coercion engine
//! - `coerce_pass` - Applies coercions where the language fixes a type
//! - `resolver` - The fixed-point name/operator resolution engine
//! - `validator` - Structural and completeness checks plus error reporting
//! - `process_ast` - The driver loop tying the passes together

pub mod coerce_pass;
pub mod coercion;
pub mod normalize;
pub mod resolver;
pub mod scope_builder;
pub mod validator;

use tern_ast::context::AstContext;
use tern_ast::plugin::{Plugin, PluginRegistry};
use tern_ast::traversal;
use tern_common::{AstError, internal_error};
use tracing::debug;

pub use coercion::{CoercedExpression, CoercionStyle};

/// Iteration cap for the resolver's fixed-point loop; exceeding it is an
/// internal error.
pub const MAX_RESOLVER_ROUNDS: u32 = 50;

/// The standard Tern plugin: wires the passes of this crate into the hook
/// surface. The parser is an external collaborator and not part of the core,
/// so `parse` stays empty; embedders fill it in.
pub fn standard_plugin() -> Plugin {
    let mut plugin = Plugin::new("Tern", ".tn");
    plugin.ast_build_scopes = Some(Box::new(|ctx, _| scope_builder::build_scopes(ctx)));
    plugin.ast_normalize = Some(Box::new(|ctx, _| normalize::normalize(ctx)));
    plugin.ast_coerce = Some(Box::new(|ctx, _| coerce_pass::coerce(ctx)));
    plugin.ast_resolve = Some(Box::new(|ctx, plugins| resolver::resolve(ctx, plugins)));
    plugin.ast_validate_pre = Some(Box::new(|ctx, _| validator::validate_pre(ctx)));
    plugin.ast_validate_post = Some(Box::new(|ctx, _| validator::validate_post(ctx)));
    plugin
}

/// Processes the AST to completion: validate-pre, resolve to a fixed point,
/// validate-post, optimize (currently a no-op), validate-post again —
/// running each plugin's hooks in registered order.
///
/// Returns the reported errors if any validation failed.
pub fn process_ast(
    ctx: &mut AstContext,
    plugins: &PluginRegistry,
) -> Result<(), Vec<AstError>> {
    if !ctx.operators_initialized() {
        ctx.init_operators();
    }

    validator::validate(ctx, plugins, true)?;
    resolve_fixed_point(ctx, plugins);
    validator::validate(ctx, plugins, false)?;
    optimize(ctx);
    validator::validate(ctx, plugins, false)?;

    Ok(())
}

fn resolve_fixed_point(ctx: &mut AstContext, plugins: &PluginRegistry) {
    debug!(target: "compiler", "resolving AST");

    let mut round: u32 = 1;
    let mut modified = true;

    while modified {
        debug!(target: "compiler", "processing AST, round {round}");

        // Start from a clean slate: errors are re-derived every round, and
        // scopes are rebuilt from scratch so late additions (imports, enum
        // labels) land in place.
        for id in traversal::pre_order(&ctx.arena, ctx.root) {
            ctx.arena.clear_errors(id);
        }

        debug!(target: "compiler", "building scopes");
        for id in traversal::pre_order(&ctx.arena, ctx.root) {
            ctx.arena.clear_scope(id);
        }
        run_hooks(ctx, plugins, |p| p.ast_build_scopes.as_ref(), "building scopes");

        modified = false;
        modified |= run_hooks(ctx, plugins, |p| p.ast_normalize.as_ref(), "normalizing");
        modified |= run_hooks(ctx, plugins, |p| p.ast_coerce.as_ref(), "coercing");
        modified |= run_hooks(ctx, plugins, |p| p.ast_resolve.as_ref(), "resolving");

        debug!(target: "ast-resolved", "AST after resolving, round {round}");
        dump_ast(ctx, "ast-dump-iterations");

        round += 1;
        if round >= MAX_RESOLVER_ROUNDS {
            internal_error!("AST resolution did not terminate, tree keeps changing");
        }
    }

    debug!(target: "compiler", "finalized AST");
    dump_ast(ctx, "ast-final");
}

fn run_hooks<'p>(
    ctx: &mut AstContext,
    plugins: &'p PluginRegistry,
    select: impl Fn(&'p Plugin) -> Option<&'p tern_ast::plugin::AstHook>,
    description: &str,
) -> bool {
    let mut modified = false;

    for plugin in plugins.plugins() {
        if let Some(hook) = select(plugin) {
            debug!(target: "compiler", "[{}] {description}", plugin.component);
            if hook(ctx, plugins) {
                modified = true;
                debug!(target: "compiler", "  -> modified");
            }
        }
    }

    modified
}

/// The optimizer slot in the pipeline; nothing to do yet.
fn optimize(_ctx: &mut AstContext) {}

fn dump_ast(ctx: &AstContext, target: &str) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }

    for (depth, id) in traversal::pre_order_with_depth(&ctx.arena, ctx.root) {
        let line = format!(
            "{}{}",
            "  ".repeat(depth),
            tern_ast::print::render_node(&ctx.arena, id)
        );
        match target {
            "ast-final" => tracing::trace!(target: "ast-final", "{line}"),
            _ => tracing::trace!(target: "ast-dump-iterations", "{line}"),
        }
    }
}
