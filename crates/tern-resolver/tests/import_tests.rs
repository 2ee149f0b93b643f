//! Module import: search paths, diagnostics, dependency tracking.

mod common;

use std::io::Write;
use std::path::Path;

use tern_ast::builder::Builder;
use tern_ast::decl::Linkage;
use tern_ast::module::ModuleUid;
use tern_ast::plugin::PluginRegistry;
use tern_common::{ErrorPriority, Id};

/// A line-based test parser: `module X` starts a module, `public const n =
/// <int>` and `const n = <int>` add constants.
fn parse_lines(
    b: &mut Builder<'_>,
    source: &str,
    path: &Path,
) -> Result<tern_ast::NodeId, String> {
    let mut module = None;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix("module ") {
            let uid = ModuleUid::from_path(Id::new(name.trim()), path);
            module = Some(b.declaration_module(uid));
            continue;
        }

        let (linkage, rest) = match line.strip_prefix("public const ") {
            Some(rest) => (Linkage::Public, rest),
            None => match line.strip_prefix("const ") {
                Some(rest) => (Linkage::Private, rest),
                None => return Err(format!("cannot parse line: {line}")),
            },
        };

        let Some(m) = module else {
            return Err("declaration before module header".to_string());
        };

        let (name, value) = rest
            .split_once('=')
            .ok_or_else(|| format!("cannot parse constant: {rest}"))?;
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|e| format!("bad integer: {e}"))?;

        let c = b.ctor_sint(value, 64);
        let e = b.expression_ctor(c);
        let d = b.declaration_constant(name.trim(), None, e, linkage);
        b.arena_mut().add_child(m, d);
    }

    module.ok_or_else(|| "no module header".to_string())
}

fn plugins_with_parser() -> PluginRegistry {
    let mut plugin = tern_resolver::standard_plugin();
    plugin.parse = Some(Box::new(parse_lines));

    let mut registry = PluginRegistry::new();
    registry.register(plugin);
    registry
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

fn import_decl(ctx: &mut tern_ast::AstContext, module: tern_ast::NodeId, name: &str) {
    let mut b = Builder::new(ctx);
    let import = b.declaration_imported_module(name, ".tn", None, vec![]);
    ctx.arena.add_child(module, import);
}

#[test]
fn import_finds_and_binds_public_declarations() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "n.tn", "module N\npublic const foo = 5\n");

    let mut ctx = common::context();
    ctx.options.library_paths = vec![dir.path().to_path_buf()];
    let m = common::new_module(&mut ctx, "M");
    import_decl(&mut ctx, m, "N");

    let mut b = Builder::new(&mut ctx);
    let user = b.expression_name("N::foo");
    let a = b.declaration_global_variable("a", None, Some(user), Linkage::Private);
    common::add_decl(&mut ctx, m, a);

    let plugins = plugins_with_parser();
    common::run(&mut ctx, &plugins).unwrap();

    assert!(common::bound_decl(&ctx, user).is_some());
    assert_eq!(common::sint_width_of(&ctx, user), Some(64));

    // The import edge is recorded on the module.
    let uid = match tern_ast::decl::decl(&ctx.arena, m).map(|d| &d.kind) {
        Some(tern_ast::decl::DeclKind::Module { uid, .. }) => uid.clone(),
        _ => panic!("module expected"),
    };
    let deps = ctx.dependencies(&uid, false);
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].id, Id::new("N"));
}

#[test]
fn missing_module_reports_exactly_the_import_error() {
    let mut ctx = common::context();
    let m = common::new_module(&mut ctx, "M");
    import_decl(&mut ctx, m, "N");

    // A use of the missing module; its failure must not drown the import
    // diagnostic.
    let mut b = Builder::new(&mut ctx);
    let user = b.expression_name("N::foo");
    let a = b.declaration_global_variable("a", None, Some(user), Linkage::Private);
    common::add_decl(&mut ctx, m, a);

    let plugins = plugins_with_parser();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();

    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0]
        .message
        .contains("cannot import module 'N': cannot find file"));
    assert_eq!(errors[0].priority, ErrorPriority::Normal);
}

#[test]
fn module_name_mismatch_is_an_import_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "n.tn", "module Wrong\n");

    let mut ctx = common::context();
    ctx.options.library_paths = vec![dir.path().to_path_buf()];
    let m = common::new_module(&mut ctx, "M");
    import_decl(&mut ctx, m, "N");

    let plugins = plugins_with_parser();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();

    assert!(errors.iter().any(|e| {
        e.message.contains("does not contain expected module N (but Wrong)")
    }));
}

#[test]
fn private_declarations_stay_invisible_across_modules() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "n.tn", "module N\nconst bar = 5\n");

    let mut ctx = common::context();
    ctx.options.library_paths = vec![dir.path().to_path_buf()];
    let m = common::new_module(&mut ctx, "M");
    import_decl(&mut ctx, m, "N");

    let mut b = Builder::new(&mut ctx);
    let user = b.expression_name("N::bar");
    let a = b.declaration_global_variable("a", None, Some(user), Linkage::Private);
    common::add_decl(&mut ctx, m, a);

    let plugins = plugins_with_parser();
    let errors = common::run(&mut ctx, &plugins).unwrap_err();

    assert!(errors
        .iter()
        .any(|e| e.message.contains("has not been declared public")));
}

#[test]
fn imports_are_cached_per_id_and_scope() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "n.tn", "module N\npublic const foo = 1\n");

    let mut ctx = common::context();
    ctx.options.library_paths = vec![dir.path().to_path_buf()];
    let m1 = common::new_module(&mut ctx, "M1");
    let m2 = common::new_module(&mut ctx, "M2");
    import_decl(&mut ctx, m1, "N");
    import_decl(&mut ctx, m2, "N");

    let plugins = plugins_with_parser();
    common::run(&mut ctx, &plugins).unwrap();

    // Only one instance of N exists under the root.
    let n_count = ctx
        .modules()
        .filter(|(uid, _)| uid.id == Id::new("N"))
        .count();
    assert_eq!(n_count, 1);
}
