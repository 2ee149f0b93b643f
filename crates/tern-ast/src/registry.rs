//! The operator registry.
//!
//! One registry per compilation context. Definitions are registered first;
//! `init` then builds every signature against the context and indexes the
//! operators by kind and, for member calls, by method name. After `init` the
//! registry is immutable and shared behind an `Arc`.

use rustc_hash::FxHashMap;
use tern_common::{Id, internal_error};
use tracing::debug;

use crate::arena::NodeId;
use crate::builder::Builder;
use crate::context::AstContext;
use crate::operator::{Kind, Operator, OperatorDef, OperatorId};
use crate::scope;
use crate::traversal;
use crate::types::TypeKind;

#[derive(Default)]
pub struct Registry {
    pending: Vec<OperatorDef>,
    operators: Vec<Operator>,
    by_kind: FxHashMap<Kind, Vec<OperatorId>>,
    by_method: FxHashMap<Id, Vec<OperatorId>>,
    initialized: bool,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers an operator definition. Must happen before `init`.
    pub fn register(&mut self, def: OperatorDef) {
        if self.initialized {
            internal_error!("operator registered after registry initialization");
        }
        self.pending.push(def);
    }

    /// Builds all pending signatures and indexes the operators.
    pub fn init(&mut self, ctx: &mut AstContext) {
        let pending = std::mem::take(&mut self.pending);

        for def in pending {
            let spec = {
                let mut builder = Builder::new(ctx);
                (def.signature)(&mut builder)
            };

            let op = Operator::new(&def, spec);

            // Unify signature types against the root scope's type
            // declarations: signature types may name types that must exist
            // there.
            let mut sig_types: Vec<NodeId> =
                op.operands().iter().map(|o| o.ty).collect();
            sig_types.push(op.signature().result);
            for ty in sig_types {
                resolve_signature_names(ctx, ty);
            }

            let id = OperatorId(self.operators.len() as u32);

            debug!(
                target: "operator-registry",
                ns = op.signature().ns,
                kind = ?op.kind(),
                name = op.name,
                "registered operator"
            );

            self.by_kind.entry(op.kind()).or_default().push(id);
            if let Some(method) = op.method_id(&ctx.arena) {
                self.by_method.entry(method).or_default().push(id);
            }
            self.operators.push(op);
        }

        self.initialized = true;
    }

    pub fn get(&self, id: OperatorId) -> &Operator {
        &self.operators[id.0 as usize]
    }

    /// All operators of a kind.
    pub fn by_kind(&self, kind: Kind) -> &[OperatorId] {
        self.by_kind.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All member-call operators whose second operand is a type-member
    /// selector matching `id`.
    pub fn by_method(&self, id: &Id) -> &[OperatorId] {
        self.by_method.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// Resolves `Name` types inside a signature type against the root scope.
fn resolve_signature_names(ctx: &mut AstContext, ty: NodeId) {
    for n in traversal::pre_order(&ctx.arena, ty) {
        let name = match ctx.arena.node(n).as_type() {
            Some(d) => match &d.kind {
                TypeKind::Name { id, decl: None } => Some(id.clone()),
                _ => None,
            },
            None => None,
        };

        if let Some(id) = name {
            if let Ok(found) = scope::lookup_id(&ctx.arena, ctx.root, &id, "type", |d| {
                matches!(d.kind, crate::decl::DeclKind::Type)
            }) {
                if let Some(t) = ctx.arena.node_mut(n).as_type_mut() {
                    if let TypeKind::Name { decl, .. } = &mut t.kind {
                        *decl = Some(found.decl);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/registry.rs"]
mod tests;
