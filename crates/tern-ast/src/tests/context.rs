use tern_common::Id;

use super::*;
use crate::builder::Builder;
use crate::module::ModuleUid;

fn ctx() -> AstContext {
    AstContext::new(CompilerOptions::default())
}

fn add_module(ctx: &mut AstContext, name: &str) -> (ModuleUid, crate::arena::NodeId) {
    let uid = ModuleUid::from_path(Id::new(name), format!("{}.tn", name.to_lowercase()));
    let mut b = Builder::new(ctx);
    let m = b.declaration_module(uid.clone());
    ctx.add_module(m);
    (uid, m)
}

#[test]
fn modules_are_indexed_by_uid() {
    let mut ctx = ctx();
    let (uid, m) = add_module(&mut ctx, "M");

    assert_eq!(ctx.module_by_uid(&uid), Some(m));
    assert_eq!(ctx.arena.parent(m), Some(ctx.root));
}

#[test]
fn uid_text_is_stable_and_distinct() {
    let a = ModuleUid::from_path(Id::new("M"), "m.tn");
    let b = ModuleUid::from_path(Id::new("M"), "other/m.tn");

    assert_eq!(a.text(), a.text());
    assert!(a.text().starts_with("M_"));
    assert_ne!(a, b);
}

#[test]
fn synthetic_uid_paths_are_unique() {
    let a = ModuleUid::synthetic(Id::new("M"), ".tn", ".tn", 1);
    let b = ModuleUid::synthetic(Id::new("M"), ".tn", ".tn", 2);
    assert_ne!(a.path, b.path);
}

#[test]
fn direct_dependencies() {
    let mut ctx = ctx();
    let (uid_a, m_a) = add_module(&mut ctx, "A");
    let (uid_b, _) = add_module(&mut ctx, "B");

    ctx.add_dependency(m_a, uid_b.clone());
    ctx.add_dependency(m_a, uid_b.clone());

    assert_eq!(ctx.dependencies(&uid_a, false), vec![uid_b]);
}

#[test]
fn recursive_dependencies_close_transitively() {
    let mut ctx = ctx();
    let (uid_a, m_a) = add_module(&mut ctx, "A");
    let (uid_b, m_b) = add_module(&mut ctx, "B");
    let (uid_c, m_c) = add_module(&mut ctx, "C");

    ctx.add_dependency(m_a, uid_b.clone());
    ctx.add_dependency(m_b, uid_c.clone());
    // A cycle back to A must not loop.
    ctx.add_dependency(m_c, uid_a.clone());

    let mut deps = ctx.dependencies(&uid_a, true);
    deps.sort_by_key(|u| u.id.to_string());
    assert_eq!(deps, vec![uid_b, uid_c]);
}
