//! The resolver.
//!
//! A post-order pass that repeatedly rewrites the tree until a fixed point:
//! names bind to declarations, unresolved operators are matched against
//! candidates and replaced by resolved-operator nodes, container and
//! constructor literals get their types inferred, imports are followed, and
//! `auto` parameters/results are resolved from use.
//!
//! Each run reports whether it changed anything; the driver loops until a
//! full pass changes nothing.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tern_ast::arena::NodeId;
use tern_ast::builder::Builder;
use tern_ast::context::AstContext;
use tern_ast::ctor::{self, CtorKind};
use tern_ast::decl::{self, DeclKind, Linkage};
use tern_ast::expr::{self, ExprKind, Keyword, ResolvedOp};
use tern_ast::node::NodeKind;
use tern_ast::operator::{self, Kind, Operator, OperatorId, Priority, ResultSpec, Signature};
use tern_ast::plugin::PluginRegistry;
use tern_ast::registry::Registry;
use tern_ast::stmt::{self, StmtKind};
use tern_ast::types::{self, Operand, TypeKind};
use tern_ast::{attribute, print, scope, traversal};
use tern_common::{ErrorPriority, Id};
use tracing::debug;

use crate::coercion::{self, CoercionStyle};

/// Runs one full resolver pass over the AST. Returns true if anything was
/// rewritten.
pub fn resolve(ctx: &mut AstContext, plugins: &PluginRegistry) -> bool {
    let mut resolver = Resolver {
        registry: ctx.operators(),
        auto_params: FxHashMap::default(),
        modified: false,
    };

    for id in traversal::post_order(&ctx.arena, ctx.root) {
        // Nodes replaced earlier in this pass are detached; skip them.
        if ctx.arena.parent(id).is_none() && id != ctx.root {
            continue;
        }
        resolver.visit(ctx, plugins, id);
    }

    resolver.apply_auto_parameters(ctx);
    resolver.modified
}

struct Resolver {
    registry: Arc<Registry>,
    /// Inferred types for `auto` parameters, keyed by the parameter's
    /// canonical ID; applied in a second sweep and discarded afterwards.
    auto_params: FxHashMap<Id, NodeId>,
    modified: bool,
}

/// A resolution candidate: either a registry operator or a function
/// declaration turned into a synthetic call operator.
enum Candidate {
    Registry(OperatorId),
    Function { decl: NodeId, op: Operator },
}

impl Candidate {
    fn operator<'a>(&'a self, registry: &'a Registry) -> &'a Operator {
        match self {
            Candidate::Registry(id) => registry.get(*id),
            Candidate::Function { op, .. } => op,
        }
    }
}

/// A successful candidate instantiation.
struct Match {
    node: NodeId,
    decl: Option<NodeId>,
}

impl Resolver {
    fn log_change(&self, ctx: &AstContext, old: NodeId, what: &str) {
        debug!(
            target: "resolver",
            "{} -> {what} ({})",
            print::render_node(&ctx.arena, old),
            ctx.arena.location(old)
        );
    }

    fn visit(&mut self, ctx: &mut AstContext, plugins: &PluginRegistry, id: NodeId) {
        let kind = ctx.arena.node(id).kind.clone();

        match &kind {
            NodeKind::Expr(e) => match &e.kind {
                ExprKind::Name { id: name, decl: None } => {
                    self.resolve_name(ctx, id, name);
                }
                ExprKind::UnresolvedOperator { kind } => {
                    self.resolve_operator(ctx, id, *kind);
                }
                ExprKind::Deferred { .. } => self.resolve_deferred(ctx, id),
                ExprKind::Keyword { keyword } => self.resolve_keyword(ctx, id, *keyword),
                ExprKind::ListComprehension => self.resolve_comprehension(ctx, id),
                _ => {}
            },

            NodeKind::Type(t) => {
                if let TypeKind::Name { id: name, decl: None } = &t.kind {
                    self.resolve_type_name(ctx, id, name);
                } else if let TypeKind::Enum { initialized: false } = &t.kind {
                    self.resolve_enum(ctx, id);
                }
            }

            NodeKind::Ctor(c) => match &c.kind {
                CtorKind::Tuple => self.resolve_tuple_ctor(ctx, id),
                CtorKind::List | CtorKind::Set | CtorKind::Vector => {
                    self.resolve_sequence_ctor(ctx, id)
                }
                CtorKind::Map => self.resolve_map_ctor(ctx, id),
                CtorKind::Struct { .. } => self.resolve_struct_ctor(ctx, id),
                CtorKind::Optional | CtorKind::Result_ | CtorKind::ValueReference => {
                    self.resolve_wrapper_ctor(ctx, id)
                }
                _ => {}
            },

            NodeKind::Decl(d) => match &d.kind {
                DeclKind::ImportedModule { uid: None, .. } => {
                    self.resolve_import(ctx, plugins, id);
                }
                DeclKind::Type => self.resolve_type_decl(ctx, id),
                DeclKind::Function => self.resolve_auto_result(ctx, id),
                _ => {}
            },

            NodeKind::Stmt(s) => {
                if matches!(s.kind, StmtKind::For) {
                    self.resolve_for(ctx, id);
                }
            }

            _ => {}
        }
    }

    // ===== Names =====

    fn resolve_name(&mut self, ctx: &mut AstContext, id: NodeId, name: &Id) {
        match scope::lookup_id(&ctx.arena, id, name, "declaration", |_| true) {
            Ok(found) => {
                self.log_change(ctx, id, &format!("declaration {}", found.qualified));
                if let Some(e) = ctx.arena.node_mut(id).as_expr_mut() {
                    if let ExprKind::Name { decl, .. } = &mut e.kind {
                        *decl = Some(found.decl);
                    }
                }
                self.modified = true;
            }
            // An unresolved import in the path means we retry next round.
            Err(err) if err.pending => {}
            Err(err) => {
                if name.as_str() == "__dd" {
                    ctx.arena.add_error_prio(
                        id,
                        "$$ is not available in this context",
                        ErrorPriority::High,
                    );
                } else {
                    ctx.arena
                        .add_error_prio(id, err.message, ErrorPriority::High);
                }
            }
        }
    }

    fn resolve_type_name(&mut self, ctx: &mut AstContext, id: NodeId, name: &Id) {
        // Accept type declarations here even if they aren't fully resolved
        // yet; dependency cycles must be allowed.
        match scope::lookup_id(&ctx.arena, id, name, "type", |d| {
            matches!(d.kind, DeclKind::Type)
        }) {
            Ok(found) => {
                self.log_change(ctx, id, &format!("type declaration {}", found.qualified));
                if let Some(t) = ctx.arena.node_mut(id).as_type_mut() {
                    if let TypeKind::Name { decl, .. } = &mut t.kind {
                        *decl = Some(found.decl);
                    }
                    t.resolved_id = Some(found.qualified);
                }
                self.modified = true;
            }
            Err(err) if err.pending => {}
            Err(err) => {
                ctx.arena
                    .add_error_prio(id, err.message, ErrorPriority::High);
            }
        }
    }

    // ===== Type declarations =====

    /// Associates the declaration's canonical ID (and any `&cxxname`) with
    /// its payload type.
    fn resolve_type_decl(&mut self, ctx: &mut AstContext, id: NodeId) {
        let Some(qt) = ctx.arena.child(id, decl::TYPE_DECL_TYPE) else {
            return;
        };
        let Some(ty) = types::unqualified(&ctx.arena, qt) else {
            return;
        };

        if types::type_data(&ctx.arena, ty).is_none_or(|d| d.type_id.is_some()) {
            return;
        }

        let Some(canonical) = decl::decl(&ctx.arena, id).and_then(|d| d.canonical_id.clone())
        else {
            return;
        };

        let cxx = ctx
            .arena
            .child(id, decl::TYPE_DECL_ATTRIBUTES)
            .and_then(|attrs| attribute::find(&ctx.arena, attrs, attribute::CXXNAME))
            .and_then(|a| attribute::value_as_string(&ctx.arena, a).ok());

        self.log_change(ctx, id, &format!("type ID {canonical}"));
        if let Some(t) = ctx.arena.node_mut(ty).as_type_mut() {
            t.type_id = Some(canonical);
            if let Some(cxx) = cxx {
                t.cxx_id = Some(Id::new(cxx));
            }
        }
        self.modified = true;
    }

    // ===== Ctor typing =====

    fn resolve_tuple_ctor(&mut self, ctx: &mut AstContext, id: NodeId) {
        let already = ctor::ctor_type(&ctx.arena, id)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if already {
            return;
        }

        let values = ctor::ctor_values(&ctx.arena, id);
        if !expr::all_resolved(&ctx.arena, &values) {
            return;
        }

        let elem_types: Option<Vec<NodeId>> = values
            .iter()
            .map(|&v| expr::expr_type(&ctx.arena, v))
            .collect();
        let Some(elem_types) = elem_types else {
            return;
        };

        let qt = {
            let mut b = Builder::new(ctx);
            let cloned: Vec<NodeId> =
                elem_types.iter().map(|&t| b.clone_deep(t)).collect();
            let t = b.type_tuple(cloned);
            b.qualified_type(t, true)
        };

        self.log_change(ctx, id, "tuple type");
        ctx.arena.set_child(id, ctor::CTOR_TYPE, Some(qt));
        self.modified = true;
    }

    /// Infers a common element type for list/set/vector literals.
    fn resolve_sequence_ctor(&mut self, ctx: &mut AstContext, id: NodeId) {
        let Some(qt) = ctor::ctor_type(&ctx.arena, id) else {
            return;
        };
        let Some(container) = types::unqualified(&ctx.arena, qt) else {
            return;
        };
        let elem_slot = ctx.arena.child(container, types::CONTAINER_ELEMENT);
        let needs_type = match elem_slot {
            Some(e) => !types::is_resolved_qt(&ctx.arena, e),
            None => true,
        };
        if !needs_type {
            return;
        }

        let Some(common) = self.common_type(ctx, &ctor::ctor_values(&ctx.arena, id)) else {
            return;
        };

        let cloned = ctx.arena.clone_deep(common);
        self.log_change(ctx, id, "element type");
        ctx.arena
            .set_child(container, types::CONTAINER_ELEMENT, Some(cloned));
        self.modified = true;
    }

    fn resolve_map_ctor(&mut self, ctx: &mut AstContext, id: NodeId) {
        let Some(qt) = ctor::ctor_type(&ctx.arena, id) else {
            return;
        };
        let Some(container) = types::unqualified(&ctx.arena, qt) else {
            return;
        };

        let resolved = [types::MAP_KEY, types::MAP_VALUE].iter().all(|&slot| {
            ctx.arena
                .child(container, slot)
                .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t))
        });
        if resolved {
            return;
        }

        let entries = ctor::ctor_map_entries(&ctx.arena, id);
        let keys: Vec<NodeId> = entries.iter().map(|&(k, _)| k).collect();
        let values: Vec<NodeId> = entries.iter().map(|&(_, v)| v).collect();

        let (Some(key), Some(value)) =
            (self.common_type(ctx, &keys), self.common_type(ctx, &values))
        else {
            return;
        };

        let key = ctx.arena.clone_deep(key);
        let value = ctx.arena.clone_deep(value);
        self.log_change(ctx, id, "map entry types");
        ctx.arena.set_child(container, types::MAP_KEY, Some(key));
        ctx.arena
            .set_child(container, types::MAP_VALUE, Some(value));
        self.modified = true;
    }

    /// Gives an untyped struct literal an anonymous record type built from
    /// its field expressions.
    fn resolve_struct_ctor(&mut self, ctx: &mut AstContext, id: NodeId) {
        let already = ctor::ctor_type(&ctx.arena, id)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if already {
            return;
        }

        let fields = ctor::ctor_struct_fields(&ctx.arena, id);
        for (_, value) in &fields {
            if !expr::is_resolved(&ctx.arena, *value) {
                return;
            }
        }

        let qt = {
            let mut b = Builder::new(ctx);
            let mut field_decls = Vec::with_capacity(fields.len());
            for (fid, value) in &fields {
                let Some(t) = expr::expr_type(b.arena(), *value) else {
                    return;
                };
                let t = b.clone_deep(t);
                let f = b.declaration_field(fid.clone(), t, None, None, None);
                field_decls.push(f);
            }
            let s = b.type_struct(field_decls);
            b.qualified_type(s, true)
        };

        self.log_change(ctx, id, "anonymous struct type");
        ctx.arena.set_child(id, ctor::CTOR_TYPE, Some(qt));
        self.modified = true;
    }

    /// optional/result/value-ref literals adopt their payload's type.
    fn resolve_wrapper_ctor(&mut self, ctx: &mut AstContext, id: NodeId) {
        let Some(qt) = ctor::ctor_type(&ctx.arena, id) else {
            return;
        };
        let Some(wrapper) = types::unqualified(&ctx.arena, qt) else {
            return;
        };
        let inner_known = ctx
            .arena
            .child(wrapper, types::INNER)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if inner_known {
            return;
        }

        let Some(value) = ctx.arena.child(id, ctor::CTOR_FIRST_VALUE) else {
            return;
        };
        if !expr::is_resolved(&ctx.arena, value) {
            return;
        }
        let Some(t) = expr::expr_type(&ctx.arena, value) else {
            return;
        };

        let t = ctx.arena.clone_deep(t);
        self.log_change(ctx, id, "dereferenced type");
        ctx.arena.set_child(wrapper, types::INNER, Some(t));
        self.modified = true;
    }

    /// The common type of a list of expressions, or nothing if they are not
    /// all resolved or disagree.
    fn common_type(&self, ctx: &AstContext, exprs: &[NodeId]) -> Option<NodeId> {
        let mut common: Option<NodeId> = None;

        for &e in exprs {
            if !expr::is_resolved(&ctx.arena, e) {
                return None;
            }
            let t = expr::expr_type(&ctx.arena, e)?;
            match common {
                None => common = Some(t),
                Some(c) => {
                    if !types::same_type_except_constness(&ctx.arena, c, t) {
                        // Inconsistent; needs another way to resolve.
                        return None;
                    }
                }
            }
        }

        common
    }

    // ===== Enums =====

    /// Once the enum's type ID is known, its labels get their ctor types
    /// linked back to the enum (weak back-reference through the node id).
    fn resolve_enum(&mut self, ctx: &mut AstContext, id: NodeId) {
        let has_type_id = types::type_data(&ctx.arena, id)
            .is_some_and(|d| d.type_id.is_some());
        if !has_type_id {
            return;
        }

        let type_decl = ctx
            .arena
            .parent(id)
            .and_then(|qt| ctx.arena.parent(qt))
            .filter(|&d| {
                matches!(
                    decl::decl(&ctx.arena, d).map(|x| &x.kind),
                    Some(DeclKind::Type)
                )
            });

        let labels: Vec<NodeId> =
            ctx.arena.children(id).iter().copied().flatten().collect();

        for label in labels {
            let Some(value) = ctx.arena.child(label, decl::CONSTANT_VALUE) else {
                continue;
            };
            let Some(c) = ctx.arena.child(value, 0) else {
                continue;
            };

            if let Some(cd) = ctx.arena.node_mut(c).as_ctor_mut() {
                if let CtorKind::Enum { enum_type, .. } = &mut cd.kind {
                    *enum_type = Some(id);
                }
            }

            // The label's type names the enum's declaration.
            if let Some(td) = type_decl {
                let qt = {
                    let mut b = Builder::new(ctx);
                    let name = b.type_name(
                        decl::decl(b.arena(), td)
                            .map(|d| d.id.clone())
                            .unwrap_or_default(),
                    );
                    let qt = b.qualified_type(name, true);
                    if let Some(t) = b.arena_mut().node_mut(name).as_type_mut() {
                        if let TypeKind::Name { decl, .. } = &mut t.kind {
                            *decl = Some(td);
                        }
                    }
                    qt
                };
                ctx.arena.set_child(c, ctor::CTOR_TYPE, Some(qt));
            }
        }

        self.log_change(ctx, id, "enum label types");
        if let Some(t) = ctx.arena.node_mut(id).as_type_mut() {
            if let TypeKind::Enum { initialized } = &mut t.kind {
                *initialized = true;
            }
        }
        self.modified = true;
    }

    // ===== Expressions with deferred typing =====

    fn resolve_deferred(&mut self, ctx: &mut AstContext, id: NodeId) {
        let known = ctx
            .arena
            .child(id, expr::DEFERRED_TYPE)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if known {
            return;
        }

        let Some(inner) = ctx.arena.child(id, expr::DEFERRED_INNER) else {
            return;
        };
        if !expr::is_resolved(&ctx.arena, inner) {
            return;
        }
        let Some(t) = expr::expr_type(&ctx.arena, inner) else {
            return;
        };

        let t = ctx.arena.clone_deep(t);
        self.log_change(ctx, id, "deferred expression type");
        ctx.arena.set_child(id, expr::DEFERRED_TYPE, Some(t));
        self.modified = true;
    }

    fn resolve_keyword(&mut self, ctx: &mut AstContext, id: NodeId, keyword: Keyword) {
        if keyword != Keyword::Scope {
            return;
        }

        let known = ctx
            .arena
            .child(id, 0)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if known {
            return;
        }

        let qt = {
            let mut b = Builder::new(ctx);
            let t = b.type_string();
            b.qualified_type(t, true)
        };
        self.log_change(ctx, id, "string");
        ctx.arena.set_child(id, 0, Some(qt));
        self.modified = true;
    }

    fn resolve_comprehension(&mut self, ctx: &mut AstContext, id: NodeId) {
        // Element type from the output expression.
        let type_known = ctx
            .arena
            .child(id, expr::COMPREHENSION_TYPE)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));

        if !type_known {
            if let Some(output) = ctx.arena.child(id, expr::COMPREHENSION_OUTPUT) {
                if expr::is_resolved(&ctx.arena, output) {
                    if let Some(t) = expr::expr_type(&ctx.arena, output) {
                        let qt = {
                            let mut b = Builder::new(ctx);
                            let elem = b.clone_deep(t);
                            let list = b.type_list(elem);
                            b.qualified_type(list, true)
                        };
                        self.log_change(ctx, id, "list comprehension type");
                        ctx.arena.set_child(id, expr::COMPREHENSION_TYPE, Some(qt));
                        self.modified = true;
                    }
                }
            }
        }

        // Iteration variable type from the input sequence.
        let Some(local) = ctx.arena.child(id, expr::COMPREHENSION_LOCAL) else {
            return;
        };
        let local_known = decl::decl_type(&ctx.arena, local)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if local_known {
            return;
        }

        let Some(input) = ctx.arena.child(id, expr::COMPREHENSION_INPUT) else {
            return;
        };
        if !expr::is_resolved(&ctx.arena, input) {
            return;
        }

        match self.element_of(ctx, input) {
            Some(elem) => {
                let elem = ctx.arena.clone_deep(elem);
                self.log_change(ctx, id, "comprehension local type");
                ctx.arena
                    .set_child(local, decl::VARIABLE_TYPE, Some(elem));
                self.modified = true;
            }
            None => {
                ctx.arena.add_error(
                    id,
                    "right-hand side of list comprehension is not iterable",
                );
            }
        }
    }

    fn resolve_for(&mut self, ctx: &mut AstContext, id: NodeId) {
        let Some(local) = ctx.arena.child(id, stmt::FOR_LOCAL) else {
            return;
        };
        let local_known = decl::decl_type(&ctx.arena, local)
            .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
        if local_known {
            return;
        }

        let Some(seq) = ctx.arena.child(id, stmt::FOR_SEQUENCE) else {
            return;
        };
        if !expr::is_resolved(&ctx.arena, seq) {
            return;
        }

        match self.element_of(ctx, seq) {
            Some(elem) => {
                let elem = ctx.arena.clone_deep(elem);
                self.log_change(ctx, id, "loop variable type");
                ctx.arena
                    .set_child(local, decl::VARIABLE_TYPE, Some(elem));
                self.modified = true;
            }
            None => {
                ctx.arena.add_error(id, "expression is not iterable");
            }
        }
    }

    fn element_of(&self, ctx: &AstContext, e: NodeId) -> Option<NodeId> {
        let qt = expr::expr_type(&ctx.arena, e)?;
        let mut t = types::unqualified(&ctx.arena, qt)?;
        t = types::strip_names(&ctx.arena, t);
        if !types::is_iterable(&ctx.arena, t) {
            return None;
        }
        types::element_type(&ctx.arena, t)
    }

    // ===== Auto results =====

    /// A function with an `auto` result adopts the type of the first typed
    /// `return` in its body.
    fn resolve_auto_result(&mut self, ctx: &mut AstContext, id: NodeId) {
        let ftype = ctx
            .arena
            .child(id, decl::FUNCTION_TYPE)
            .and_then(|qt| types::unqualified(&ctx.arena, qt));
        let Some(ftype) = ftype else {
            return;
        };

        let Some(result) = types::function_result(&ctx.arena, ftype) else {
            return;
        };
        if !types::is_auto(&ctx.arena, result) {
            return;
        }

        let Some(body) = ctx.arena.child(id, decl::FUNCTION_BODY) else {
            return;
        };

        for n in traversal::pre_order(&ctx.arena, body) {
            let is_return = matches!(
                ctx.arena.node(n).as_stmt().map(|s| &s.kind),
                Some(StmtKind::Return)
            );
            if !is_return {
                continue;
            }

            let Some(value) = ctx.arena.child(n, 0) else {
                continue;
            };
            if !expr::is_resolved(&ctx.arena, value) {
                continue;
            }
            let Some(t) = expr::expr_type(&ctx.arena, value) else {
                continue;
            };

            let t = ctx.arena.clone_deep(t);
            self.log_change(ctx, id, "function result type");
            ctx.arena
                .set_child(ftype, types::FUNCTION_RESULT, Some(t));
            self.modified = true;
            break;
        }
    }

    // ===== Imports =====

    fn resolve_import(
        &mut self,
        ctx: &mut AstContext,
        plugins: &PluginRegistry,
        id: NodeId,
    ) {
        let Some(module) = decl::enclosing_module(&ctx.arena, id) else {
            return;
        };

        let (import_id, scope_id, parse_ext, search_dirs) =
            match decl::decl(&ctx.arena, id).map(|d| (&d.kind, d.id.clone())) {
                Some((
                    DeclKind::ImportedModule {
                        scope,
                        parse_extension,
                        search_directories,
                        ..
                    },
                    did,
                )) => (
                    did,
                    scope.clone(),
                    parse_extension.clone(),
                    search_directories.clone(),
                ),
                _ => return,
            };

        let process_ext = match decl::decl(&ctx.arena, module).map(|d| &d.kind) {
            Some(DeclKind::Module { uid, .. }) => uid.process_extension.clone(),
            _ => return,
        };

        let result = ctx.import_module(
            plugins,
            &import_id,
            scope_id.as_ref(),
            &parse_ext,
            Some(&process_ext),
            &search_dirs,
        );

        match result {
            Ok(uid) => {
                let target = ctx.module_by_uid(&uid);
                self.log_change(ctx, id, &format!("imported module {uid}"));
                if let Some(d) = ctx.arena.node_mut(id).as_decl_mut() {
                    if let DeclKind::ImportedModule {
                        uid: slot,
                        module_node,
                        ..
                    } = &mut d.kind
                    {
                        *slot = Some(uid.clone());
                        *module_node = target;
                    }
                }
                ctx.add_dependency(module, uid);
                self.modified = true;
            }
            Err(err) => {
                ctx.arena
                    .add_error(id, format!("cannot import module '{import_id}': {err}"));
            }
        }
    }

    // ===== Operators =====

    fn resolve_operator(&mut self, ctx: &mut AstContext, u: NodeId, kind: Kind) {
        if kind == Kind::Cast {
            self.resolve_cast(ctx, u);
            return;
        }

        let operands = expr::operands(&ctx.arena, u);

        let candidates: Vec<Candidate> = match kind {
            Kind::Call => {
                match self.function_call_candidates(ctx, u, &operands) {
                    Some(c) => c,
                    None => return,
                }
            }
            Kind::MemberCall => {
                let method = operands.get(1).and_then(|&m| {
                    match expr::expr(&ctx.arena, m).map(|e| &e.kind) {
                        Some(ExprKind::Member { id }) => Some(id.clone()),
                        _ => None,
                    }
                });
                match method {
                    Some(m) => self
                        .registry
                        .by_method(&m)
                        .iter()
                        .map(|&id| Candidate::Registry(id))
                        .collect(),
                    None => return,
                }
            }
            _ => self
                .registry
                .by_kind(kind)
                .iter()
                .map(|&id| Candidate::Registry(id))
                .collect(),
        };

        if candidates.is_empty() {
            return;
        }

        debug!(
            target: "operator",
            "trying to resolve: {} ({})",
            print::operator_instance_to_string(&ctx.arena, kind, &operands),
            ctx.arena.location(u)
        );

        let matches = self.match_operators(ctx, &candidates, &operands, false);

        match matches.len() {
            0 => {
                // Leave unresolved; later iterations may succeed once the
                // operand types are known.
            }
            1 => {
                let m = &matches[0];

                if m.decl.is_some() {
                    // Don't rewrite before the function's return type is
                    // known; auto parameters were recorded during matching
                    // either way.
                    let result_ok = expr::expr_type(&ctx.arena, m.node)
                        .is_some_and(|t| types::is_resolved_qt(&ctx.arena, t));
                    if !result_ok {
                        return;
                    }
                }

                self.log_change(
                    ctx,
                    u,
                    &format!(
                        "expression {}",
                        print::expr_to_string(&ctx.arena, m.node)
                    ),
                );
                if let Some(parent) = ctx.arena.parent(u) {
                    ctx.arena.replace_child(parent, u, m.node);
                    self.modified = true;
                }
            }
            _ => {
                let mut context = vec!["candidates:".to_string()];
                for m in &matches {
                    context.push(format!(
                        "- {}",
                        print::expr_to_string(&ctx.arena, m.node)
                    ));
                }
                ctx.arena.add_error_ctx(
                    u,
                    format!(
                        "operator usage is ambiguous: {}",
                        print::operator_instance_to_string(&ctx.arena, kind, &operands)
                    ),
                    context,
                );
            }
        }
    }

    /// Collects call candidates: all function declarations visible through
    /// the scope chain under the callee's name. Returns `None` when
    /// resolution must stop (error recorded) or cannot proceed yet.
    fn function_call_candidates(
        &mut self,
        ctx: &mut AstContext,
        u: NodeId,
        operands: &[NodeId],
    ) -> Option<Vec<Candidate>> {
        let [callee, args] = operands else {
            return None;
        };

        // The argument tuple must be typed before matching is meaningful.
        if !expr::is_resolved(&ctx.arena, *args) {
            return None;
        }

        let callee_id = match expr::expr(&ctx.arena, *callee).map(|e| &e.kind) {
            Some(ExprKind::Name { id, .. }) => id.clone(),
            // Matching fails silently for non-name callees; a later pass
            // flags the node.
            _ => return None,
        };

        let found: Vec<(NodeId, bool)> = if callee_id.is_qualified() {
            match scope::lookup_id(&ctx.arena, u, &callee_id, "function", |d| {
                matches!(d.kind, DeclKind::Function)
            }) {
                Ok(r) => vec![(r.decl, r.external)],
                Err(_) => Vec::new(),
            }
        } else {
            scope::lookup_all_functions(&ctx.arena, u, &callee_id)
        };

        let mut candidates = Vec::with_capacity(found.len());

        for (d, external) in found {
            let (is_function, linkage) = {
                let data = decl::decl(&ctx.arena, d)?;
                (matches!(data.kind, DeclKind::Function), data.linkage)
            };

            if !is_function {
                ctx.arena.add_error(
                    u,
                    format!(
                        "ID '{callee_id}' resolves to something other than just functions"
                    ),
                );
                return None;
            }
            if external && linkage != Linkage::Public {
                ctx.arena.add_error(
                    u,
                    format!("function has not been declared public: {callee_id}"),
                );
                return None;
            }

            let op = self.function_operator(ctx, d)?;
            candidates.push(Candidate::Function { decl: d, op });
        }

        Some(candidates)
    }

    /// Builds the synthetic call operator for a function declaration: the
    /// callee slot accepts anything (ids aren't type-matched), the argument
    /// tuple is matched against the parameter operand list.
    fn function_operator(&self, ctx: &mut AstContext, fdecl: NodeId) -> Option<Operator> {
        let ftype = ctx
            .arena
            .child(fdecl, decl::FUNCTION_TYPE)
            .and_then(|qt| types::unqualified(&ctx.arena, qt))?;
        let result = types::function_result(&ctx.arena, ftype)?;
        let params = types::function_parameters(&ctx.arena, ftype);

        let mut b = Builder::new(ctx);

        let any_t = b.type_any();
        let op0 = Operand::new(b.qualified_type(any_t, true));

        let operands: Vec<Operand> = params
            .iter()
            .filter_map(|&p| {
                let ty = decl::decl_type(b.arena(), p)?;
                let default = b.arena().child(p, decl::PARAMETER_DEFAULT);
                let id = decl::decl(b.arena(), p).map(|d| d.id.clone())?;
                Some(Operand {
                    id: Some(id),
                    ty,
                    optional: default.is_some(),
                    default,
                })
            })
            .collect();
        if operands.len() != params.len() {
            return None;
        }

        let operand_list_t = b.type_operand_list(operands);
        let op1 = Operand::new(b.qualified_type(operand_list_t, true));

        Some(Operator::from_signature(
            "function::Call",
            Signature {
                kind: Kind::Call,
                result,
                result_spec: ResultSpec::Type,
                operands: vec![op0, op1],
                priority: Priority::Normal,
                ns: "function",
                doc: "",
            },
        ))
    }

    /// The matching algorithm: a cascade of coercion styles, normal-priority
    /// candidates before low-priority ones, with an operand-swap retry for
    /// commutative kinds.
    fn match_operators(
        &mut self,
        ctx: &mut AstContext,
        candidates: &[Candidate],
        operands: &[NodeId],
        disallow_type_changes: bool,
    ) -> Vec<Match> {
        let styles = [
            CoercionStyle::OPERAND_MATCHING | CoercionStyle::TRY_EXACT_MATCH,
            CoercionStyle::OPERAND_MATCHING
                | CoercionStyle::TRY_EXACT_MATCH
                | CoercionStyle::TRY_COERCION,
            CoercionStyle::OPERAND_MATCHING
                | CoercionStyle::TRY_EXACT_MATCH
                | CoercionStyle::TRY_CONST_PROMOTION,
            CoercionStyle::OPERAND_MATCHING
                | CoercionStyle::TRY_EXACT_MATCH
                | CoercionStyle::TRY_CONST_PROMOTION
                | CoercionStyle::TRY_COERCION,
        ];

        let registry = Arc::clone(&self.registry);
        let mut resolved: Vec<Match> = Vec::new();

        for priority in [Priority::Normal, Priority::Low] {
            // A normal-priority match supersedes low-priority candidates of
            // the same operator kind.
            if priority == Priority::Low && !resolved.is_empty() {
                break;
            }

            for mut style in styles {
                if disallow_type_changes {
                    style |= CoercionStyle::DISALLOW_TYPE_CHANGES;
                }

                debug!(target: "operator", "style: {style}");

                for candidate in candidates {
                    let op = candidate.operator(&registry);
                    if op.signature().priority != priority {
                        continue;
                    }

                    debug!(target: "operator", "candidate: {}", op.print(&ctx.arena));

                    let (fdecl, resolved_op) = match candidate {
                        Candidate::Function { decl, .. } => {
                            (Some(*decl), ResolvedOp::FunctionCall { decl: *decl })
                        }
                        Candidate::Registry(id) => (None, ResolvedOp::Registry(*id)),
                    };

                    if let Some(node) = self.try_candidate(
                        ctx,
                        op,
                        resolved_op.clone(),
                        fdecl,
                        operands,
                        style,
                    ) {
                        resolved.push(Match { node, decl: fdecl });
                    } else if operator::is_commutative(op.kind()) && operands.len() == 2 {
                        // A swapped retry for commutative kinds; it only runs
                        // when the direct order failed, ranking swap-matches
                        // behind direct matches of the same style.
                        let swapped = [operands[1], operands[0]];
                        if let Some(node) = self.try_candidate(
                            ctx,
                            op,
                            resolved_op,
                            fdecl,
                            &swapped,
                            style,
                        ) {
                            resolved.push(Match { node, decl: fdecl });
                        }
                    }
                }

                if !resolved.is_empty() {
                    break;
                }
            }
        }

        resolved
    }

    /// Attempts to match and instantiate one candidate under one style.
    fn try_candidate(
        &mut self,
        ctx: &mut AstContext,
        op: &Operator,
        resolved_op: ResolvedOp,
        fdecl: Option<NodeId>,
        operands: &[NodeId],
        style: CoercionStyle,
    ) -> Option<NodeId> {
        let mut coerced = {
            let mut b = Builder::new(ctx);
            match coercion::coerce_operands(&mut b, operands, op.operands(), style) {
                Ok((_, exprs)) => exprs,
                Err(_) => return None,
            }
        };

        // Record inferred `auto` parameter types from the arguments before
        // the result check below; the check may delay the rewrite, but the
        // inference must not wait for it.
        if let Some(fd) = fdecl {
            self.record_auto_parameters(ctx, fd, operands);
        }

        // A matched call binds the callee to its declaration.
        if let Some(fd) = fdecl {
            let id = decl::decl(&ctx.arena, fd).map(|d| d.id.clone())?;
            let mut b = Builder::new(ctx);
            let callee = b.expression_name(id);
            if let Some(e) = ctx.arena.node_mut(callee).as_expr_mut() {
                if let ExprKind::Name { decl, .. } = &mut e.kind {
                    *decl = Some(fd);
                }
            }
            if !coerced.is_empty() {
                coerced[0] = callee;
            }
        }

        let mut b = Builder::new(ctx);
        let result = op.result(&mut b, &coerced)?;

        // Some operators cannot determine their type before resolution has
        // provided more information; they come back as `auto` and don't
        // match yet.
        if types::is_auto(b.arena(), result) {
            return None;
        }

        let node =
            b.expression_resolved_operator(op.kind(), resolved_op, result, coerced);

        debug!(
            target: "operator",
            "-> candidate matches, resolves to {}",
            print::expr_to_string(&ctx.arena, node)
        );

        Some(node)
    }

    // ===== Casts =====

    /// A cast can always perform any legal coercion; this forces a specific
    /// coercion to take place.
    fn resolve_cast(&mut self, ctx: &mut AstContext, u: NodeId) {
        let operands = expr::operands(&ctx.arena, u);
        let [value, target] = operands[..] else {
            return;
        };

        if !expr::is_resolved(&ctx.arena, value) {
            return;
        }

        let dst = match expr::expr(&ctx.arena, target).map(|e| &e.kind) {
            Some(ExprKind::TypeExpr) => match ctx.arena.child(target, 0) {
                Some(t) => t,
                None => return,
            },
            _ => return,
        };

        if !types::is_resolved_qt(&ctx.arena, dst) {
            return;
        }

        let style =
            CoercionStyle::TRY_ALL_FOR_MATCHING | CoercionStyle::CONTEXTUAL_CONVERSION;

        let coerced = {
            let mut b = Builder::new(ctx);
            coercion::coerce_expression(&mut b, value, dst, style)
        };

        let Ok(x) = coerced else {
            return;
        };

        let node = {
            let mut b = Builder::new(ctx);
            let result = b.clone_deep(dst);
            b.expression_resolved_operator(
                Kind::Cast,
                ResolvedOp::CastedCoercion,
                result,
                vec![x.expr, target],
            )
        };

        self.log_change(ctx, u, "casted coercion");
        if let Some(parent) = ctx.arena.parent(u) {
            ctx.arena.replace_child(parent, u, node);
            self.modified = true;
        }
    }

    // ===== Auto parameters =====

    /// Records inferred types for `auto` parameters from a matched call's
    /// arguments, keyed by the parameter's canonical ID.
    fn record_auto_parameters(
        &mut self,
        ctx: &mut AstContext,
        fdecl: NodeId,
        operands: &[NodeId],
    ) {
        let args = operands.get(1).copied();
        let Some(args) = args else {
            return;
        };

        // Arguments are a tuple ctor expression.
        let tuple = match expr::expr(&ctx.arena, args).map(|e| &e.kind) {
            Some(ExprKind::Ctor) => ctx.arena.child(args, 0),
            _ => None,
        };
        let Some(tuple) = tuple else {
            return;
        };
        let values = ctor::ctor_values(&ctx.arena, tuple);

        let params = ctx
            .arena
            .child(fdecl, decl::FUNCTION_TYPE)
            .and_then(|qt| types::unqualified(&ctx.arena, qt))
            .map(|ft| types::function_parameters(&ctx.arena, ft))
            .unwrap_or_default();

        for (i, &p) in params.iter().enumerate() {
            let is_auto = decl::decl_type(&ctx.arena, p)
                .is_some_and(|t| types::is_auto(&ctx.arena, t));
            if !is_auto {
                continue;
            }

            let Some(&arg) = values.get(i) else {
                continue;
            };
            let Some(t) = expr::expr_type(&ctx.arena, arg) else {
                continue;
            };
            if !types::is_resolved_qt(&ctx.arena, t) {
                continue;
            }

            let Some(canonical) =
                decl::decl(&ctx.arena, p).and_then(|d| d.canonical_id.clone())
            else {
                continue;
            };

            match self.auto_params.get(&canonical) {
                None => {
                    debug!(
                        target: "resolver",
                        "recording auto parameter {canonical} as of type {}",
                        print::type_to_string(&ctx.arena, t)
                    );
                    self.auto_params.insert(canonical, t);
                    self.modified = true;
                }
                Some(&prev) => {
                    if !types::same_type_except_constness(&ctx.arena, prev, t) {
                        ctx.arena.add_error(p, "mismatch for auto parameter");
                    }
                }
            }
        }
    }

    /// Second sweep: replaces each recorded `auto` parameter type.
    fn apply_auto_parameters(&mut self, ctx: &mut AstContext) {
        if self.auto_params.is_empty() {
            return;
        }

        for id in traversal::pre_order(&ctx.arena, ctx.root) {
            let is_auto_param = matches!(
                decl::decl(&ctx.arena, id).map(|d| &d.kind),
                Some(DeclKind::Parameter { .. })
            ) && decl::decl_type(&ctx.arena, id)
                .is_some_and(|t| types::is_auto(&ctx.arena, t));
            if !is_auto_param {
                continue;
            }

            let Some(canonical) =
                decl::decl(&ctx.arena, id).and_then(|d| d.canonical_id.clone())
            else {
                continue;
            };
            let Some(&t) = self.auto_params.get(&canonical) else {
                continue;
            };

            let t = ctx.arena.clone_deep(t);
            debug!(
                target: "resolver",
                "parameter {canonical} -> type {}",
                print::type_to_string(&ctx.arena, t)
            );
            ctx.arena.set_child(id, decl::PARAMETER_TYPE, Some(t));
            self.modified = true;
        }
    }
}
