//! Node factory.
//!
//! `Builder` is the construction API for AST nodes: parsers, the operator
//! catalog, the resolver's rewrites, and tests all go through it. Factories
//! allocate detached nodes; attachment happens when the node is passed as a
//! child to another factory or explicitly via the arena.

use tern_common::{Id, Location};

use crate::arena::{NodeArena, NodeId};
use crate::attribute::AttributeData;
use crate::context::AstContext;
use crate::ctor::CtorKind;
use crate::ctor::CtorData;
use crate::decl::{DeclData, DeclKind, Linkage, ParameterKind};
use crate::expr::{ExprData, ExprKind, Keyword, ResolvedOp};
use crate::module::ModuleUid;
use crate::node::{Meta, NodeKind, QualifiedTypeData};
use crate::operator;
use crate::stmt::{StmtData, StmtKind};
use crate::types::{Operand, TypeData, TypeKind};

pub struct Builder<'a> {
    ctx: &'a mut AstContext,
}

impl<'a> Builder<'a> {
    pub fn new(ctx: &'a mut AstContext) -> Self {
        Builder { ctx }
    }

    pub fn arena(&self) -> &NodeArena {
        &self.ctx.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.ctx.arena
    }

    pub fn ctx(&mut self) -> &mut AstContext {
        self.ctx
    }

    pub fn clone_deep(&mut self, id: NodeId) -> NodeId {
        self.ctx.arena.clone_deep(id)
    }

    /// Sets a node's source location, returning the node for chaining.
    pub fn at(&mut self, id: NodeId, location: Location) -> NodeId {
        self.ctx.arena.node_mut(id).meta.location = location;
        id
    }

    fn alloc(&mut self, kind: NodeKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.ctx
            .arena
            .alloc_with_children(kind, children, Meta::default())
    }

    // ===== Qualified types =====

    pub fn qualified_type(&mut self, ty: NodeId, is_const: bool) -> NodeId {
        self.alloc(
            NodeKind::QualifiedType(QualifiedTypeData {
                is_const,
                is_auto: false,
            }),
            vec![Some(ty)],
        )
    }

    /// An `auto` placeholder type, to be inferred later.
    pub fn qualified_type_auto(&mut self) -> NodeId {
        let auto = self.type_auto();
        self.alloc(
            NodeKind::QualifiedType(QualifiedTypeData {
                is_const: false,
                is_auto: true,
            }),
            vec![Some(auto)],
        )
    }

    // ===== Types =====

    fn ty(&mut self, kind: TypeKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Type(TypeData::new(kind)), children)
    }

    fn ty_wildcard(&mut self, kind: TypeKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Type(TypeData::wildcard(kind)), children)
    }

    pub fn type_bool(&mut self) -> NodeId {
        self.ty(TypeKind::Bool, vec![])
    }

    pub fn type_string(&mut self) -> NodeId {
        self.ty(TypeKind::String, vec![])
    }

    pub fn type_real(&mut self) -> NodeId {
        self.ty(TypeKind::Real, vec![])
    }

    pub fn type_void(&mut self) -> NodeId {
        self.ty(TypeKind::Void, vec![])
    }

    pub fn type_any(&mut self) -> NodeId {
        self.ty(TypeKind::Any, vec![])
    }

    pub fn type_auto(&mut self) -> NodeId {
        self.ty(TypeKind::Auto, vec![])
    }

    pub fn type_unknown(&mut self) -> NodeId {
        self.ty(TypeKind::Unknown, vec![])
    }

    pub fn type_null(&mut self) -> NodeId {
        self.ty(TypeKind::Null, vec![])
    }

    pub fn type_error(&mut self) -> NodeId {
        self.ty(TypeKind::Error, vec![])
    }

    pub fn type_address(&mut self) -> NodeId {
        self.ty(TypeKind::Address, vec![])
    }

    pub fn type_network(&mut self) -> NodeId {
        self.ty(TypeKind::Network, vec![])
    }

    pub fn type_port(&mut self) -> NodeId {
        self.ty(TypeKind::Port, vec![])
    }

    pub fn type_time(&mut self) -> NodeId {
        self.ty(TypeKind::Time, vec![])
    }

    pub fn type_interval(&mut self) -> NodeId {
        self.ty(TypeKind::Interval, vec![])
    }

    pub fn type_regexp(&mut self) -> NodeId {
        self.ty(TypeKind::RegExp, vec![])
    }

    pub fn type_exception(&mut self) -> NodeId {
        self.ty(TypeKind::Exception, vec![])
    }

    pub fn type_sint(&mut self, width: u32) -> NodeId {
        self.ty(TypeKind::SignedInteger { width }, vec![])
    }

    pub fn type_uint(&mut self, width: u32) -> NodeId {
        self.ty(TypeKind::UnsignedInteger { width }, vec![])
    }

    /// `int<*>`, matching any signed integer width.
    pub fn type_sint_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::SignedInteger { width: 64 }, vec![])
    }

    /// `uint<*>`, matching any unsigned integer width.
    pub fn type_uint_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::UnsignedInteger { width: 64 }, vec![])
    }

    fn byte_element(&mut self) -> NodeId {
        let t = self.type_uint(8);
        self.qualified_type(t, true)
    }

    pub fn type_bytes(&mut self) -> NodeId {
        let e = self.byte_element();
        self.ty(TypeKind::Bytes, vec![Some(e)])
    }

    pub fn type_bytes_iterator(&mut self) -> NodeId {
        let e = self.byte_element();
        self.ty(TypeKind::BytesIterator, vec![Some(e)])
    }

    pub fn type_stream(&mut self) -> NodeId {
        let e = self.byte_element();
        self.ty(TypeKind::Stream, vec![Some(e)])
    }

    pub fn type_stream_iterator(&mut self) -> NodeId {
        let e = self.byte_element();
        self.ty(TypeKind::StreamIterator, vec![Some(e)])
    }

    pub fn type_stream_view(&mut self) -> NodeId {
        let e = self.byte_element();
        self.ty(TypeKind::StreamView, vec![Some(e)])
    }

    pub fn type_list(&mut self, element: NodeId) -> NodeId {
        self.ty(TypeKind::List, vec![Some(element)])
    }

    pub fn type_list_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::List, vec![None])
    }

    pub fn type_set(&mut self, element: NodeId) -> NodeId {
        self.ty(TypeKind::Set, vec![Some(element)])
    }

    pub fn type_set_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Set, vec![None])
    }

    pub fn type_vector(&mut self, element: NodeId) -> NodeId {
        self.ty(TypeKind::Vector, vec![Some(element)])
    }

    pub fn type_vector_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Vector, vec![None])
    }

    pub fn type_map(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.ty(TypeKind::Map, vec![Some(key), Some(value)])
    }

    pub fn type_map_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Map, vec![None, None])
    }

    /// The iterator type matching a container type, with the element cloned.
    pub fn iterator_type_for(&mut self, container: NodeId) -> Option<NodeId> {
        let kind = match &self.arena().node(container).as_type()?.kind {
            TypeKind::List => TypeKind::ListIterator,
            TypeKind::Set => TypeKind::SetIterator,
            TypeKind::Vector => TypeKind::VectorIterator,
            TypeKind::Map => TypeKind::MapIterator,
            TypeKind::Bytes => TypeKind::BytesIterator,
            TypeKind::Stream | TypeKind::StreamView => TypeKind::StreamIterator,
            _ => return None,
        };

        let slots: Vec<Option<NodeId>> = self
            .arena()
            .children(container)
            .iter()
            .copied()
            .collect();
        let cloned: Vec<Option<NodeId>> = slots
            .into_iter()
            .map(|s| s.map(|c| self.clone_deep(c)))
            .collect();
        Some(self.ty(kind, cloned))
    }

    pub fn type_tuple(&mut self, elements: Vec<NodeId>) -> NodeId {
        let names = vec![None; elements.len()];
        self.ty(
            TypeKind::Tuple { names },
            elements.into_iter().map(Some).collect(),
        )
    }

    pub fn type_tuple_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Tuple { names: vec![] }, vec![])
    }

    pub fn type_tuple_named(
        &mut self,
        names: Vec<Option<Id>>,
        elements: Vec<NodeId>,
    ) -> NodeId {
        self.ty(
            TypeKind::Tuple { names },
            elements.into_iter().map(Some).collect(),
        )
    }

    pub fn type_optional(&mut self, inner: NodeId) -> NodeId {
        self.ty(TypeKind::Optional, vec![Some(inner)])
    }

    pub fn type_optional_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Optional, vec![None])
    }

    pub fn type_result(&mut self, inner: NodeId) -> NodeId {
        self.ty(TypeKind::Result_, vec![Some(inner)])
    }

    pub fn type_result_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Result_, vec![None])
    }

    pub fn type_strong_ref(&mut self, inner: NodeId) -> NodeId {
        self.ty(TypeKind::StrongReference, vec![Some(inner)])
    }

    pub fn type_strong_ref_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::StrongReference, vec![None])
    }

    pub fn type_weak_ref(&mut self, inner: NodeId) -> NodeId {
        self.ty(TypeKind::WeakReference, vec![Some(inner)])
    }

    pub fn type_weak_ref_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::WeakReference, vec![None])
    }

    pub fn type_value_ref(&mut self, inner: NodeId) -> NodeId {
        self.ty(TypeKind::ValueReference, vec![Some(inner)])
    }

    pub fn type_value_ref_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::ValueReference, vec![None])
    }

    pub fn type_function(&mut self, result: NodeId, parameters: Vec<NodeId>) -> NodeId {
        let mut children = vec![Some(result)];
        children.extend(parameters.into_iter().map(Some));
        self.ty(
            TypeKind::Function {
                flavor: crate::types::FunctionFlavor::Standard,
            },
            children,
        )
    }

    /// An anonymous struct type; identity comes from a fresh anonymous
    /// counter.
    pub fn type_struct(&mut self, fields: Vec<NodeId>) -> NodeId {
        let anon = self.ctx.next_anon_struct_id();
        self.alloc(
            NodeKind::Type(TypeData::new(TypeKind::Struct {
                anon_id: Some(anon),
            })),
            fields.into_iter().map(Some).collect(),
        )
    }

    pub fn type_struct_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Struct { anon_id: None }, vec![])
    }

    pub fn type_union(&mut self, fields: Vec<NodeId>) -> NodeId {
        self.ty(TypeKind::Union, fields.into_iter().map(Some).collect())
    }

    /// An enum type from `(label, explicit_value?)` pairs.
    ///
    /// Labels without a value get ascending values one past the maximum
    /// explicit one; a synthetic `Undef = -1` label is appended. A
    /// user-defined label named `Undef` (any case) is rejected.
    pub fn type_enum(
        &mut self,
        labels: Vec<(Id, Option<i64>)>,
    ) -> Result<NodeId, String> {
        let mut next = labels
            .iter()
            .filter_map(|(_, v)| *v)
            .max()
            .map(|m| m + 1)
            .unwrap_or(0);

        let enum_ty = self.ty(TypeKind::Enum { initialized: false }, vec![]);

        let mut label_values = Vec::with_capacity(labels.len() + 1);
        for (id, value) in labels {
            if id.as_str().eq_ignore_ascii_case("undef") {
                return Err("reserved enum label 'Undef' cannot be redefined".to_string());
            }
            let v = match value {
                Some(v) => v,
                None => {
                    let v = next;
                    next += 1;
                    v
                }
            };
            label_values.push((id, v));
        }
        label_values.push((Id::new("Undef"), -1));

        for (id, value) in label_values {
            let c = self.ctor_enum(id.clone(), value, None);
            let e = self.expression_ctor(c);
            let d = self.declaration_constant(id, None, e, Linkage::Private);
            self.ctx.arena.add_child(enum_ty, d);
        }

        Ok(enum_ty)
    }

    pub fn type_enum_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Enum { initialized: false }, vec![])
    }

    pub fn type_member(&mut self, id: impl Into<Id>) -> NodeId {
        self.ty(TypeKind::Member { id: id.into() }, vec![])
    }

    /// A member selector matching any member id.
    pub fn type_member_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Member { id: Id::default() }, vec![])
    }

    pub fn type_operand_list(&mut self, operands: Vec<Operand>) -> NodeId {
        self.ty(TypeKind::OperandList { operands }, vec![])
    }

    pub fn type_operand_list_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::OperandList { operands: vec![] }, vec![])
    }

    pub fn type_name(&mut self, id: impl Into<Id>) -> NodeId {
        self.ty(
            TypeKind::Name {
                id: id.into(),
                decl: None,
            },
            vec![],
        )
    }

    pub fn type_library(&mut self, cxx_name: impl Into<String>) -> NodeId {
        self.ty(
            TypeKind::Library {
                cxx_name: cxx_name.into(),
            },
            vec![],
        )
    }

    pub fn type_type(&mut self, inner: NodeId) -> NodeId {
        self.ty(TypeKind::Type_, vec![Some(inner)])
    }

    pub fn type_type_wildcard(&mut self) -> NodeId {
        self.ty_wildcard(TypeKind::Type_, vec![None])
    }

    // ===== Ctors =====

    fn ctor(&mut self, kind: CtorKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Ctor(CtorData::new(kind)), children)
    }

    pub fn ctor_bool(&mut self, value: bool) -> NodeId {
        let t = self.type_bool();
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::Bool { value }, vec![Some(qt)])
    }

    pub fn ctor_sint(&mut self, value: i64, width: u32) -> NodeId {
        let t = self.type_sint(width);
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::SignedInteger { value, width }, vec![Some(qt)])
    }

    pub fn ctor_uint(&mut self, value: u64, width: u32) -> NodeId {
        let t = self.type_uint(width);
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::UnsignedInteger { value, width }, vec![Some(qt)])
    }

    pub fn ctor_real(&mut self, value: f64) -> NodeId {
        let t = self.type_real();
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::Real { value }, vec![Some(qt)])
    }

    pub fn ctor_string(&mut self, value: impl Into<String>) -> NodeId {
        let t = self.type_string();
        let qt = self.qualified_type(t, true);
        self.ctor(
            CtorKind::String {
                value: value.into(),
            },
            vec![Some(qt)],
        )
    }

    pub fn ctor_bytes(&mut self, value: Vec<u8>) -> NodeId {
        let t = self.type_bytes();
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::Bytes { value }, vec![Some(qt)])
    }

    pub fn ctor_null(&mut self) -> NodeId {
        let t = self.type_null();
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::Null, vec![Some(qt)])
    }

    pub fn ctor_error(&mut self, message: impl Into<String>) -> NodeId {
        let t = self.type_error();
        let qt = self.qualified_type(t, true);
        self.ctor(
            CtorKind::Error {
                message: message.into(),
            },
            vec![Some(qt)],
        )
    }

    pub fn ctor_enum(
        &mut self,
        label: Id,
        value: i64,
        enum_type: Option<NodeId>,
    ) -> NodeId {
        // The ctor's type is filled in once the enum's labels are
        // initialized; the enum type itself stays a weak back-reference.
        let qt = self.qualified_type_auto();
        self.ctor(
            CtorKind::Enum {
                label,
                value,
                enum_type,
            },
            vec![Some(qt)],
        )
    }

    pub fn ctor_optional(&mut self, inner: NodeId, value: Option<NodeId>) -> NodeId {
        let t = self.type_optional(inner);
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::Optional, vec![Some(qt), value])
    }

    pub fn ctor_result(&mut self, inner: NodeId, value: Option<NodeId>) -> NodeId {
        let t = self.type_result(inner);
        let qt = self.qualified_type(t, true);
        self.ctor(CtorKind::Result_, vec![Some(qt), value])
    }

    /// A list literal; the element type starts as `auto` and is inferred by
    /// the resolver.
    pub fn ctor_list(&mut self, elements: Vec<NodeId>) -> NodeId {
        let elem = self.qualified_type_auto();
        let t = self.type_list(elem);
        let qt = self.qualified_type(t, true);
        let mut children = vec![Some(qt)];
        children.extend(elements.into_iter().map(Some));
        self.ctor(CtorKind::List, children)
    }

    pub fn ctor_list_typed(&mut self, element: NodeId, elements: Vec<NodeId>) -> NodeId {
        let t = self.type_list(element);
        let qt = self.qualified_type(t, true);
        let mut children = vec![Some(qt)];
        children.extend(elements.into_iter().map(Some));
        self.ctor(CtorKind::List, children)
    }

    pub fn ctor_set(&mut self, element: NodeId, elements: Vec<NodeId>) -> NodeId {
        let t = self.type_set(element);
        let qt = self.qualified_type(t, true);
        let mut children = vec![Some(qt)];
        children.extend(elements.into_iter().map(Some));
        self.ctor(CtorKind::Set, children)
    }

    pub fn ctor_vector(&mut self, element: NodeId, elements: Vec<NodeId>) -> NodeId {
        let t = self.type_vector(element);
        let qt = self.qualified_type(t, true);
        let mut children = vec![Some(qt)];
        children.extend(elements.into_iter().map(Some));
        self.ctor(CtorKind::Vector, children)
    }

    pub fn ctor_map(
        &mut self,
        key: NodeId,
        value: NodeId,
        entries: Vec<(NodeId, NodeId)>,
    ) -> NodeId {
        let t = self.type_map(key, value);
        let qt = self.qualified_type(t, true);
        let mut children = vec![Some(qt)];
        for (k, v) in entries {
            children.push(Some(k));
            children.push(Some(v));
        }
        self.ctor(CtorKind::Map, children)
    }

    /// A tuple literal; its type is computed once all elements resolve.
    pub fn ctor_tuple(&mut self, elements: Vec<NodeId>) -> NodeId {
        let qt = self.qualified_type_auto();
        let mut children = vec![Some(qt)];
        children.extend(elements.into_iter().map(Some));
        self.ctor(CtorKind::Tuple, children)
    }

    /// A struct literal; its type is inferred or imposed by coercion.
    pub fn ctor_struct(&mut self, fields: Vec<(Id, NodeId)>) -> NodeId {
        let qt = self.qualified_type_auto();
        let mut ids = Vec::with_capacity(fields.len());
        let mut children = vec![Some(qt)];
        for (id, value) in fields {
            ids.push(id);
            children.push(Some(value));
        }
        self.ctor(CtorKind::Struct { field_ids: ids }, children)
    }

    pub fn ctor_strong_ref(&mut self, inner: NodeId, init: Option<NodeId>) -> NodeId {
        let t = self.type_strong_ref(inner);
        let qt = self.qualified_type(t, false);
        self.ctor(CtorKind::StrongReference, vec![Some(qt), init])
    }

    pub fn ctor_weak_ref(&mut self, inner: NodeId, init: Option<NodeId>) -> NodeId {
        let t = self.type_weak_ref(inner);
        let qt = self.qualified_type(t, false);
        self.ctor(CtorKind::WeakReference, vec![Some(qt), init])
    }

    pub fn ctor_value_ref(&mut self, inner: NodeId, init: Option<NodeId>) -> NodeId {
        let t = self.type_value_ref(inner);
        let qt = self.qualified_type(t, false);
        self.ctor(CtorKind::ValueReference, vec![Some(qt), init])
    }

    pub fn ctor_coerced(&mut self, original: NodeId, coerced: NodeId) -> NodeId {
        self.ctor(CtorKind::Coerced, vec![Some(original), Some(coerced)])
    }

    pub fn ctor_default(&mut self, ty: NodeId) -> NodeId {
        self.ctor(CtorKind::Default, vec![Some(ty)])
    }

    // ===== Expressions =====

    fn expr(&mut self, kind: ExprKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Expr(ExprData::new(kind)), children)
    }

    pub fn expression_name(&mut self, id: impl Into<Id>) -> NodeId {
        self.expr(
            ExprKind::Name {
                id: id.into(),
                decl: None,
            },
            vec![],
        )
    }

    pub fn expression_member(&mut self, id: impl Into<Id>) -> NodeId {
        let id = id.into();
        let t = self.type_member(id.clone());
        let qt = self.qualified_type(t, true);
        self.expr(ExprKind::Member { id }, vec![Some(qt)])
    }

    pub fn expression_ctor(&mut self, ctor: NodeId) -> NodeId {
        self.expr(ExprKind::Ctor, vec![Some(ctor)])
    }

    pub fn expression_unresolved_operator(
        &mut self,
        kind: operator::Kind,
        operands: Vec<NodeId>,
    ) -> NodeId {
        let qt = self.qualified_type_auto();
        let mut children = vec![Some(qt)];
        children.extend(operands.into_iter().map(Some));
        self.expr(ExprKind::UnresolvedOperator { kind }, children)
    }

    pub fn expression_resolved_operator(
        &mut self,
        kind: operator::Kind,
        op: ResolvedOp,
        result: NodeId,
        operands: Vec<NodeId>,
    ) -> NodeId {
        let mut children = vec![Some(result)];
        children.extend(operands.into_iter().map(Some));
        self.expr(ExprKind::ResolvedOperator { kind, op }, children)
    }

    pub fn expression_coerced(&mut self, inner: NodeId, ty: NodeId) -> NodeId {
        self.expr(ExprKind::Coerced, vec![Some(ty), Some(inner)])
    }

    pub fn expression_grouping(&mut self, inner: NodeId) -> NodeId {
        self.expr(ExprKind::Grouping, vec![Some(inner)])
    }

    pub fn expression_ternary(
        &mut self,
        condition: NodeId,
        true_value: NodeId,
        false_value: NodeId,
    ) -> NodeId {
        self.expr(
            ExprKind::Ternary,
            vec![Some(condition), Some(true_value), Some(false_value)],
        )
    }

    pub fn expression_logical_and(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expr(ExprKind::LogicalAnd, vec![Some(lhs), Some(rhs)])
    }

    pub fn expression_logical_or(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expr(ExprKind::LogicalOr, vec![Some(lhs), Some(rhs)])
    }

    pub fn expression_logical_not(&mut self, inner: NodeId) -> NodeId {
        self.expr(ExprKind::LogicalNot, vec![Some(inner)])
    }

    pub fn expression_keyword(&mut self, keyword: Keyword) -> NodeId {
        let qt = self.qualified_type_auto();
        self.expr(ExprKind::Keyword { keyword }, vec![Some(qt)])
    }

    pub fn expression_deferred(&mut self, inner: NodeId, catches_exceptions: bool) -> NodeId {
        let qt = self.qualified_type_auto();
        self.expr(
            ExprKind::Deferred { catches_exceptions },
            vec![Some(qt), Some(inner)],
        )
    }

    pub fn expression_list_comprehension(
        &mut self,
        input: NodeId,
        output: NodeId,
        local: NodeId,
        condition: Option<NodeId>,
    ) -> NodeId {
        let qt = self.qualified_type_auto();
        self.expr(
            ExprKind::ListComprehension,
            vec![Some(qt), Some(input), Some(output), Some(local), condition],
        )
    }

    pub fn expression_assign(&mut self, target: NodeId, source: NodeId) -> NodeId {
        self.expr(ExprKind::Assign, vec![Some(target), Some(source)])
    }

    pub fn expression_type(&mut self, ty: NodeId) -> NodeId {
        self.expr(ExprKind::TypeExpr, vec![Some(ty)])
    }

    pub fn expression_void(&mut self) -> NodeId {
        let t = self.type_void();
        let qt = self.qualified_type(t, true);
        self.expr(ExprKind::Void, vec![Some(qt)])
    }

    // ===== Statements =====

    fn stmt(&mut self, kind: StmtKind, children: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Stmt(StmtData::new(kind)), children)
    }

    pub fn statement_block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.stmt(StmtKind::Block, stmts.into_iter().map(Some).collect())
    }

    pub fn statement_declaration(&mut self, decl: NodeId) -> NodeId {
        self.stmt(StmtKind::Declaration, vec![Some(decl)])
    }

    pub fn statement_expression(&mut self, expr: NodeId) -> NodeId {
        self.stmt(StmtKind::Expression, vec![Some(expr)])
    }

    pub fn statement_if(
        &mut self,
        init: Option<NodeId>,
        condition: NodeId,
        true_block: NodeId,
        else_block: Option<NodeId>,
    ) -> NodeId {
        self.stmt(
            StmtKind::If,
            vec![init, Some(condition), Some(true_block), else_block],
        )
    }

    pub fn statement_while(
        &mut self,
        init: Option<NodeId>,
        condition: NodeId,
        body: NodeId,
        else_block: Option<NodeId>,
    ) -> NodeId {
        self.stmt(
            StmtKind::While,
            vec![init, Some(condition), Some(body), else_block],
        )
    }

    pub fn statement_for(&mut self, local: NodeId, sequence: NodeId, body: NodeId) -> NodeId {
        self.stmt(
            StmtKind::For,
            vec![Some(local), Some(sequence), Some(body)],
        )
    }

    pub fn statement_return(&mut self, expr: Option<NodeId>) -> NodeId {
        self.stmt(StmtKind::Return, vec![expr])
    }

    pub fn statement_switch(&mut self, condition: NodeId, cases: Vec<NodeId>) -> NodeId {
        let mut children = vec![Some(condition)];
        children.extend(cases.into_iter().map(Some));
        self.stmt(StmtKind::Switch, children)
    }

    pub fn statement_switch_case(
        &mut self,
        default: bool,
        body: NodeId,
        expressions: Vec<NodeId>,
    ) -> NodeId {
        let mut children = vec![Some(body)];
        children.extend(expressions.into_iter().map(Some));
        self.stmt(StmtKind::SwitchCase { default }, children)
    }

    pub fn statement_try(&mut self, body: NodeId, catches: Vec<NodeId>) -> NodeId {
        let mut children = vec![Some(body)];
        children.extend(catches.into_iter().map(Some));
        self.stmt(StmtKind::Try, children)
    }

    pub fn statement_catch(&mut self, parameter: Option<NodeId>, body: NodeId) -> NodeId {
        self.stmt(StmtKind::Catch, vec![parameter, Some(body)])
    }

    pub fn statement_throw(&mut self, expr: Option<NodeId>) -> NodeId {
        self.stmt(StmtKind::Throw, vec![expr])
    }

    pub fn statement_assert(&mut self, condition: NodeId, message: Option<NodeId>) -> NodeId {
        self.stmt(
            StmtKind::Assert {
                expects_exception: false,
            },
            vec![Some(condition), message],
        )
    }

    pub fn statement_break(&mut self) -> NodeId {
        self.stmt(StmtKind::Break, vec![])
    }

    pub fn statement_continue(&mut self) -> NodeId {
        self.stmt(StmtKind::Continue, vec![])
    }

    // ===== Declarations =====

    fn decl(
        &mut self,
        id: Id,
        linkage: Linkage,
        kind: DeclKind,
        children: Vec<Option<NodeId>>,
    ) -> NodeId {
        self.alloc(NodeKind::Decl(DeclData::new(id, linkage, kind)), children)
    }

    pub fn declaration_constant(
        &mut self,
        id: impl Into<Id>,
        ty: Option<NodeId>,
        value: NodeId,
        linkage: Linkage,
    ) -> NodeId {
        self.decl(
            id.into(),
            linkage,
            DeclKind::Constant,
            vec![ty, Some(value)],
        )
    }

    pub fn declaration_expression(&mut self, id: impl Into<Id>, expr: NodeId) -> NodeId {
        self.decl(
            id.into(),
            Linkage::Private,
            DeclKind::Expression,
            vec![Some(expr)],
        )
    }

    pub fn declaration_global_variable(
        &mut self,
        id: impl Into<Id>,
        ty: Option<NodeId>,
        init: Option<NodeId>,
        linkage: Linkage,
    ) -> NodeId {
        self.decl(id.into(), linkage, DeclKind::GlobalVariable, vec![ty, init])
    }

    pub fn declaration_local_variable(
        &mut self,
        id: impl Into<Id>,
        ty: Option<NodeId>,
        init: Option<NodeId>,
    ) -> NodeId {
        self.decl(
            id.into(),
            Linkage::Private,
            DeclKind::LocalVariable,
            vec![ty, init],
        )
    }

    pub fn declaration_parameter(
        &mut self,
        id: impl Into<Id>,
        ty: NodeId,
        kind: ParameterKind,
        default: Option<NodeId>,
    ) -> NodeId {
        self.decl(
            id.into(),
            Linkage::Private,
            DeclKind::Parameter {
                kind,
                is_type_param: false,
            },
            vec![Some(ty), default],
        )
    }

    pub fn declaration_type_parameter(&mut self, id: impl Into<Id>, ty: NodeId) -> NodeId {
        self.decl(
            id.into(),
            Linkage::Private,
            DeclKind::Parameter {
                kind: ParameterKind::In,
                is_type_param: true,
            },
            vec![Some(ty), None],
        )
    }

    pub fn declaration_field(
        &mut self,
        id: impl Into<Id>,
        ty: NodeId,
        attributes: Option<NodeId>,
        default: Option<NodeId>,
        inline_function: Option<NodeId>,
    ) -> NodeId {
        self.decl(
            id.into(),
            Linkage::Struct,
            DeclKind::Field,
            vec![Some(ty), attributes, default, inline_function],
        )
    }

    pub fn declaration_function(
        &mut self,
        id: impl Into<Id>,
        ftype: NodeId,
        body: Option<NodeId>,
        linkage: Linkage,
    ) -> NodeId {
        self.decl(
            id.into(),
            linkage,
            DeclKind::Function,
            vec![Some(ftype), body],
        )
    }

    /// A module declaration with an empty statement block.
    pub fn declaration_module(&mut self, uid: ModuleUid) -> NodeId {
        let block = self.statement_block(vec![]);
        let id = uid.id.clone();
        self.decl(
            id,
            Linkage::Public,
            DeclKind::Module {
                uid,
                scope_path: Id::default(),
                dependencies: Vec::new(),
            },
            vec![Some(block)],
        )
    }

    pub fn declaration_imported_module(
        &mut self,
        id: impl Into<Id>,
        parse_extension: impl Into<String>,
        scope: Option<Id>,
        search_directories: Vec<std::path::PathBuf>,
    ) -> NodeId {
        self.decl(
            id.into(),
            Linkage::Private,
            DeclKind::ImportedModule {
                scope,
                parse_extension: parse_extension.into(),
                process_extension: None,
                search_directories,
                uid: None,
                module_node: None,
            },
            vec![],
        )
    }

    pub fn declaration_type(
        &mut self,
        id: impl Into<Id>,
        ty: NodeId,
        attributes: Option<NodeId>,
        linkage: Linkage,
    ) -> NodeId {
        self.decl(
            id.into(),
            linkage,
            DeclKind::Type,
            vec![Some(ty), attributes],
        )
    }

    pub fn declaration_property(&mut self, id: impl Into<Id>, value: Option<NodeId>) -> NodeId {
        self.decl(id.into(), Linkage::Private, DeclKind::Property, vec![value])
    }

    // ===== Attributes =====

    pub fn attribute(&mut self, tag: impl Into<String>, value: Option<NodeId>) -> NodeId {
        self.alloc(
            NodeKind::Attribute(AttributeData { tag: tag.into() }),
            vec![value],
        )
    }

    pub fn attribute_set(&mut self, attributes: Vec<NodeId>) -> NodeId {
        self.alloc(
            NodeKind::AttributeSet,
            attributes.into_iter().map(Some).collect(),
        )
    }
}
