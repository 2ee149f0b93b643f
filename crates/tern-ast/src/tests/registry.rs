use tern_common::Id;

use super::*;
use crate::context::{AstContext, CompilerOptions};
use crate::operator::Kind;

fn initialized_ctx() -> AstContext {
    let mut ctx = AstContext::new(CompilerOptions::default());
    ctx.init_operators();
    ctx
}

#[test]
fn catalog_registers_and_initializes() {
    let ctx = initialized_ctx();
    let registry = ctx.operators();

    assert!(!registry.is_empty());
    assert!(!registry.by_kind(Kind::Sum).is_empty());
    assert!(!registry.by_kind(Kind::Equal).is_empty());
}

#[test]
fn by_kind_yields_only_that_kind() {
    let ctx = initialized_ctx();
    let registry = ctx.operators();

    for &id in registry.by_kind(Kind::Sum) {
        assert_eq!(registry.get(id).kind(), Kind::Sum);
    }
}

#[test]
fn by_method_indexes_member_calls() {
    let ctx = initialized_ctx();
    let registry = ctx.operators();

    let encode = registry.by_method(&Id::new("encode"));
    assert_eq!(encode.len(), 1);
    assert_eq!(registry.get(encode[0]).kind(), Kind::MemberCall);

    assert!(registry.by_method(&Id::new("no_such_method")).is_empty());
}

#[test]
fn signatures_are_built() {
    let ctx = initialized_ctx();
    let registry = ctx.operators();

    let sum = registry.by_kind(Kind::Sum);
    for &id in sum {
        let op = registry.get(id);
        assert_eq!(op.operands().len(), 2, "{}", op.name);
    }
}

#[test]
fn prototypes_print() {
    let ctx = initialized_ctx();
    let registry = ctx.operators();

    let id = registry.by_kind(Kind::Sum)[0];
    let proto = registry.get(id).print(&ctx.arena);
    assert!(proto.contains('+'), "{proto}");
}
