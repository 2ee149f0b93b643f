#![allow(dead_code)]

use tern_ast::arena::NodeId;
use tern_ast::builder::Builder;
use tern_ast::context::{AstContext, CompilerOptions};
use tern_ast::expr::ExprKind;
use tern_ast::module::ModuleUid;
use tern_ast::plugin::PluginRegistry;
use tern_ast::{expr, types};
use tern_common::{AstError, Id};

/// Routes the pipeline's debug streams (`resolver`, `operator`, `compiler`,
/// ...) to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn context() -> AstContext {
    init_tracing();
    AstContext::new(CompilerOptions::default())
}

pub fn plugins() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(tern_resolver::standard_plugin());
    registry
}

/// Creates an empty module and installs it under the root.
pub fn new_module(ctx: &mut AstContext, name: &str) -> NodeId {
    let uid = ModuleUid::from_path(Id::new(name), format!("{}.tn", name.to_lowercase()));
    let mut b = Builder::new(ctx);
    let m = b.declaration_module(uid);
    ctx.add_module(m);
    m
}

pub fn add_decl(ctx: &mut AstContext, module: NodeId, decl: NodeId) {
    ctx.arena.add_child(module, decl);
}

pub fn run(ctx: &mut AstContext, plugins: &PluginRegistry) -> Result<(), Vec<AstError>> {
    tern_resolver::process_ast(ctx, plugins)
}

/// The declaration a name expression was bound to.
pub fn bound_decl(ctx: &AstContext, name_expr: NodeId) -> Option<NodeId> {
    match expr::expr(&ctx.arena, name_expr).map(|e| &e.kind) {
        Some(ExprKind::Name { decl, .. }) => *decl,
        _ => None,
    }
}

/// The signed-integer width of an expression's type, if it has one.
pub fn sint_width_of(ctx: &AstContext, e: NodeId) -> Option<u32> {
    let qt = expr::expr_type(&ctx.arena, e)?;
    let t = types::unqualified(&ctx.arena, qt)?;
    let t = types::strip_names(&ctx.arena, t);
    match types::type_data(&ctx.arena, t)?.kind {
        types::TypeKind::SignedInteger { width } => Some(width),
        _ => None,
    }
}

/// The concrete type variant name of an expression's type.
pub fn type_variant_of(ctx: &AstContext, e: NodeId) -> Option<&'static str> {
    let qt = expr::expr_type(&ctx.arena, e)?;
    let t = types::unqualified(&ctx.arena, qt)?;
    let t = types::strip_names(&ctx.arena, t);
    types::type_data(&ctx.arena, t).map(|d| types::variant_name(&d.kind))
}
