//! The coercion engine.
//!
//! Three layers, each driven by a `CoercionStyle` bitmask:
//! - `coerce_type` decides whether one type converts into another and
//!   produces the resulting type.
//! - `coerce_ctor` rewrites a runtime literal into a literal of the
//!   destination type (range-checked integers, element-wise containers,
//!   field-wise structs).
//! - `coerce_expression` ties both together at the expression level,
//!   wrapping values into coercion nodes where a representation change is
//!   needed.
//!
//! `coerce_operands` matches an argument list against an operator/function
//! operand list, substituting defaults and enforcing the type-change budget.

use bitflags::bitflags;
use tern_ast::arena::NodeId;
use tern_ast::builder::Builder;
use tern_ast::ctor::{self, CtorKind};
use tern_ast::decl;
use tern_ast::expr::{self, ExprKind};
use tern_ast::types::{self, Operand, TypeKind};
use tern_ast::{attribute, print};
use tracing::debug;

bitflags! {
    /// Bitmask of independent flags controlling which conversions the
    /// coercer admits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CoercionStyle: u32 {
        /// Accept identical types.
        const TRY_EXACT_MATCH = 1 << 0;
        /// Allow `const T` -> `T` and vice versa (assignment semantics).
        const TRY_CONST_PROMOTION = 1 << 1;
        /// Allow variant-defined coercions (e.g. bytes->stream, int->real).
        const TRY_COERCION = 1 << 2;
        /// Destination is an lvalue target; forbids coercing into a const.
        const ASSIGNMENT = 1 << 3;
        /// Destination is a parameter slot; allows optional/result wrapping.
        const FUNCTION_CALL = 1 << 4;
        /// Destination is an operator operand; rejects const ->
        /// non-const-mutable.
        const OPERAND_MATCHING = 1 << 5;
        /// The outer operand matching has already consumed its type-change
        /// budget.
        const DISALLOW_TYPE_CHANGES = 1 << 6;
        /// Permit contextual bool (`if`, `while`, ternary).
        const CONTEXTUAL_CONVERSION = 1 << 7;
        /// Internal marker preventing infinite style widening.
        const RECURSING = 1 << 8;

        // Named combinations used throughout the resolver.
        const TRY_DIRECT_FOR_MATCHING = Self::TRY_EXACT_MATCH.bits()
            | Self::TRY_CONST_PROMOTION.bits()
            | Self::OPERAND_MATCHING.bits();
        const TRY_ALL_FOR_MATCHING = Self::TRY_DIRECT_FOR_MATCHING.bits()
            | Self::TRY_COERCION.bits();
        const TRY_DIRECT_MATCH_FOR_FUNCTION_CALL = Self::TRY_EXACT_MATCH.bits()
            | Self::TRY_CONST_PROMOTION.bits()
            | Self::FUNCTION_CALL.bits();
        const TRY_ALL_FOR_FUNCTION_CALL = Self::TRY_DIRECT_MATCH_FOR_FUNCTION_CALL.bits()
            | Self::TRY_COERCION.bits();
        const TRY_ALL_FOR_ASSIGNMENT = Self::TRY_EXACT_MATCH.bits()
            | Self::TRY_CONST_PROMOTION.bits()
            | Self::TRY_COERCION.bits()
            | Self::ASSIGNMENT.bits();
    }
}

impl std::fmt::Display for CoercionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut labels = Vec::new();
        if self.contains(CoercionStyle::TRY_EXACT_MATCH) {
            labels.push("try-exact-match");
        }
        if self.contains(CoercionStyle::TRY_CONST_PROMOTION) {
            labels.push("try-const-promotion");
        }
        if self.contains(CoercionStyle::TRY_COERCION) {
            labels.push("try-coercion");
        }
        if self.contains(CoercionStyle::ASSIGNMENT) {
            labels.push("assignment");
        }
        if self.contains(CoercionStyle::FUNCTION_CALL) {
            labels.push("function-call");
        }
        if self.contains(CoercionStyle::OPERAND_MATCHING) {
            labels.push("operand-matching");
        }
        if self.contains(CoercionStyle::DISALLOW_TYPE_CHANGES) {
            labels.push("disallow-type-changes");
        }
        if self.contains(CoercionStyle::CONTEXTUAL_CONVERSION) {
            labels.push("contextual-conversion");
        }
        f.write_str(&labels.join(","))
    }
}

/// Result of a successful expression coercion.
#[derive(Clone, Copy, Debug)]
pub struct CoercedExpression {
    /// The expression to use; the original if no rewrite was needed.
    pub expr: NodeId,
    /// True if a new expression was created.
    pub new_expression: bool,
    /// True if the argument's primary type changed; operand matching limits
    /// how many such changes an alternative may need.
    pub consider_type_changed: bool,
}

impl CoercedExpression {
    fn unchanged(expr: NodeId) -> Self {
        CoercedExpression {
            expr,
            new_expression: false,
            consider_type_changed: false,
        }
    }

    fn changed(b: &Builder<'_>, src: Option<NodeId>, expr: NodeId) -> Self {
        let type_changed = match (src, expr::expr_type(b.arena(), expr)) {
            (Some(s), Some(n)) => {
                let sv = types::unqualified(b.arena(), s)
                    .map(|t| types::type_data(b.arena(), t).map(|d| types::variant_name(&d.kind)));
                let nv = types::unqualified(b.arena(), n)
                    .map(|t| types::type_data(b.arena(), t).map(|d| types::variant_name(&d.kind)));
                sv != nv
            }
            _ => true,
        };

        CoercedExpression {
            expr,
            new_expression: true,
            consider_type_changed: type_changed,
        }
    }
}

// ===== Type coercion =====

/// Returns the resolved destination type when `src` is permitted to coerce
/// into `dst` under `style`, or nothing.
pub fn coerce_type(
    b: &mut Builder<'_>,
    src: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Option<NodeId> {
    let arena = b.arena();

    if !(types::is_resolved_qt(arena, src) && types::is_resolved_qt(arena, dst)) {
        return None;
    }

    let src_t = types::unqualified(arena, src)?;
    let dst_t = types::unqualified(arena, dst)?;

    // Matching type IDs decide immediately, both ways.
    let (src_data, dst_data) = (types::type_data(arena, src_t)?, types::type_data(arena, dst_t)?);
    if let (Some(a), Some(c)) = (&src_data.type_id, &dst_data.type_id) {
        return if a == c { Some(dst) } else { None };
    }

    if types::same_qualified_type(arena, src, dst) {
        return Some(src);
    }

    // A wildcard destination of the same variant accepts any source.
    if dst_data.wildcard
        && types::variant_name(&src_data.kind) == types::variant_name(&dst_data.kind)
    {
        return Some(src);
    }

    if style.intersects(CoercionStyle::ASSIGNMENT | CoercionStyle::FUNCTION_CALL) {
        // All types convert into a corresponding optional/result/value_ref.
        match &dst_data.kind {
            TypeKind::Optional => {
                let inner = arena.child(dst_t, types::INNER)?;
                if let Some(x) = coerce_type(b, src, inner, style) {
                    let x = b.clone_deep(x);
                    let t = b.type_optional(x);
                    return Some(b.qualified_type(t, false));
                }
            }
            TypeKind::Result_ => {
                let inner = arena.child(dst_t, types::INNER)?;
                if let Some(x) = coerce_type(b, src, inner, style) {
                    let x = b.clone_deep(x);
                    let t = b.type_result(x);
                    return Some(b.qualified_type(t, false));
                }
            }
            TypeKind::ValueReference if !types::is_reference_type(arena, src_t) => {
                let inner = arena.child(dst_t, types::INNER)?;
                if coerce_type(b, src, inner, style).is_some() {
                    return Some(dst);
                }
            }
            _ => {}
        }
    }

    if types::is_parameterized(b.arena(), src_t) && types::is_parameterized(b.arena(), dst_t) {
        if let Some(x) = coerce_parameterized_type(b, src, dst, style) {
            return Some(x);
        }
    }

    coerce_type_variant(b, src, dst, style)
}

/// Parameterized types coerce to each other only when all type parameters
/// coerce under the same style; a wildcard destination parameter accepts any
/// source parameter and the resulting type is the source.
fn coerce_parameterized_type(
    b: &mut Builder<'_>,
    src: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Option<NodeId> {
    let arena = b.arena();

    if types::same_qualified_type(arena, src, dst) {
        return Some(dst);
    }

    let src_t = types::unqualified(arena, src)?;
    let dst_t = types::unqualified(arena, dst)?;
    let (src_data, dst_data) = (types::type_data(arena, src_t)?, types::type_data(arena, dst_t)?);

    if types::variant_name(&src_data.kind) != types::variant_name(&dst_data.kind) {
        return None;
    }

    if dst_data.wildcard {
        return Some(src);
    }

    let params1: Vec<NodeId> = arena.children(src_t).iter().copied().flatten().collect();
    let params2: Vec<NodeId> = arena.children(dst_t).iter().copied().flatten().collect();

    if params1.len() != params2.len() {
        return None;
    }

    let mut have_wildcard = false;

    for (&p1, &p2) in params1.iter().zip(params2.iter()) {
        // Parameters that aren't qualified types have no generic comparison;
        // decline (identical types were handled above).
        let arena = b.arena();
        if arena.node(p1).as_qualified_type().is_none()
            || arena.node(p2).as_qualified_type().is_none()
        {
            return None;
        }

        coerce_type(b, p1, p2, style)?;

        let p2_t = types::unqualified(b.arena(), p2)?;
        if types::type_data(b.arena(), p2_t).is_some_and(|d| d.wildcard) {
            have_wildcard = true;
        }
    }

    // With a wildcard parameter we keep the source type: we have no generic
    // way to retype the destination's parameters individually.
    Some(if have_wildcard { src } else { dst })
}

/// Variant-level coercion rules.
fn coerce_type_variant(
    b: &mut Builder<'_>,
    src: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Option<NodeId> {
    let arena = b.arena();
    let src_t = types::unqualified(arena, src)?;
    let dst_t = types::unqualified(arena, dst)?;
    let src_data = types::type_data(arena, src_t)?;
    let dst_data = types::type_data(arena, dst_t)?;

    let contextual = style.contains(CoercionStyle::CONTEXTUAL_CONVERSION);
    let assign_or_call =
        style.intersects(CoercionStyle::ASSIGNMENT | CoercionStyle::FUNCTION_CALL);

    match (&src_data.kind, &dst_data.kind) {
        // Contextual bool.
        (
            TypeKind::Enum { .. }
            | TypeKind::Interval
            | TypeKind::Time
            | TypeKind::Optional
            | TypeKind::Result_
            | TypeKind::Union
            | TypeKind::StrongReference
            | TypeKind::WeakReference
            | TypeKind::ValueReference
            | TypeKind::SignedInteger { .. }
            | TypeKind::UnsignedInteger { .. },
            TypeKind::Bool,
        ) if contextual => Some(dst),

        (TypeKind::SignedInteger { width: n }, TypeKind::SignedInteger { width: m })
            if n <= m =>
        {
            Some(dst)
        }

        (TypeKind::UnsignedInteger { width: n }, TypeKind::UnsignedInteger { width: m })
            if n <= m =>
        {
            Some(dst)
        }

        // As long as the target type has more bits, unsigned coerces into
        // signed.
        (TypeKind::UnsignedInteger { width: n }, TypeKind::SignedInteger { width: m })
            if n < m =>
        {
            Some(dst)
        }

        (TypeKind::Bytes, TypeKind::Stream) if assign_or_call => Some(dst),
        (TypeKind::StreamView, TypeKind::Bytes) if assign_or_call => Some(dst),
        (TypeKind::Stream, TypeKind::StreamView) => Some(dst),

        (TypeKind::Error, TypeKind::Result_) => Some(dst),

        (
            TypeKind::Null,
            TypeKind::Optional | TypeKind::StrongReference | TypeKind::WeakReference,
        ) => Some(dst),

        (TypeKind::List, TypeKind::Set | TypeKind::Vector) => {
            let se = arena.child(src_t, types::CONTAINER_ELEMENT)?;
            let de = arena.child(dst_t, types::CONTAINER_ELEMENT)?;
            coerce_type(b, se, de, style).map(|_| dst)
        }

        // References convert into each other when the dereferenced types
        // match.
        (
            TypeKind::StrongReference | TypeKind::WeakReference | TypeKind::ValueReference,
            TypeKind::StrongReference | TypeKind::WeakReference | TypeKind::ValueReference,
        ) => {
            let si = arena.child(src_t, types::INNER)?;
            let di = arena.child(dst_t, types::INNER)?;
            if types::same_type_except_constness(arena, si, di) {
                Some(dst)
            } else {
                None
            }
        }

        // A reference matches its dereferenced type outside of assignments.
        (TypeKind::StrongReference | TypeKind::ValueReference, _)
            if !style.contains(CoercionStyle::ASSIGNMENT) =>
        {
            let si = arena.child(src_t, types::INNER)?;
            if types::same_type_except_constness(arena, si, dst) {
                Some(dst)
            } else {
                None
            }
        }

        (TypeKind::Result_, TypeKind::Optional) => {
            let si = arena.child(src_t, types::INNER)?;
            let di = arena.child(dst_t, types::INNER)?;
            if types::same_type_except_constness(arena, si, di) {
                Some(dst)
            } else {
                None
            }
        }

        // Type expressions allow only (more or less) direct matches.
        (TypeKind::Type_, TypeKind::Type_) => {
            let si = arena.child(src_t, types::INNER)?;
            let di = arena.child(dst_t, types::INNER)?;
            coerce_type(b, si, di, CoercionStyle::TRY_DIRECT_FOR_MATCHING).map(|_| dst)
        }

        _ => None,
    }
}

// ===== Ctor coercion =====

/// Coerces a runtime-literal constructor element-wise to a destination
/// analogue. Returns the new ctor node, or nothing if the literal does not
/// convert.
pub fn coerce_ctor(
    b: &mut Builder<'_>,
    c: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Option<NodeId> {
    {
        let arena = b.arena();
        let ct = ctor::ctor_type(arena, c)?;
        if !(types::is_resolved_qt(arena, ct) || is_literal_pending(arena, c))
            || !types::is_resolved_qt(arena, dst)
        {
            return None;
        }
    }

    let kind = ctor::ctor(b.arena(), c)?.kind.clone();
    let dst_t = types::unqualified(b.arena(), dst)?;
    let dst_kind = types::type_data(b.arena(), dst_t)?.kind.clone();
    let dst_wildcard = types::type_data(b.arena(), dst_t)?.wildcard;
    let contextual = style.contains(CoercionStyle::CONTEXTUAL_CONVERSION);

    match (&kind, &dst_kind) {
        (CtorKind::Enum { label, .. }, TypeKind::Bool) if contextual => {
            Some(b.ctor_bool(label.as_str() != "Undef"))
        }

        (CtorKind::SignedInteger { value, width }, TypeKind::SignedInteger { width: dw }) => {
            let v = *value;
            if dst_wildcard {
                return Some(b.ctor_sint(v, *width));
            }
            let (min, max) = types::signed_integer_range(*dw);
            (v >= min && v <= max).then(|| b.ctor_sint(v, *dw))
        }

        (CtorKind::SignedInteger { value, width }, TypeKind::UnsignedInteger { width: dw })
            if *value >= 0 =>
        {
            let v = *value as u64;
            if dst_wildcard {
                return Some(b.ctor_uint(v, *width));
            }
            let (_, max) = types::unsigned_integer_range(*dw);
            (v <= max).then(|| b.ctor_uint(v, *dw))
        }

        (CtorKind::SignedInteger { value, .. }, TypeKind::Real) => {
            let v = *value;
            ((v as f64) as i64 == v).then(|| b.ctor_real(v as f64))
        }

        (CtorKind::SignedInteger { value, .. }, TypeKind::Bool) if contextual => {
            Some(b.ctor_bool(*value != 0))
        }

        (CtorKind::UnsignedInteger { value, width }, TypeKind::UnsignedInteger { width: dw }) => {
            let v = *value;
            if dst_wildcard {
                return Some(b.ctor_uint(v, *width));
            }
            let (_, max) = types::unsigned_integer_range(*dw);
            (v <= max).then(|| b.ctor_uint(v, *dw))
        }

        (CtorKind::UnsignedInteger { value, width }, TypeKind::SignedInteger { width: dw }) => {
            let v = i64::try_from(*value).ok()?;
            if dst_wildcard {
                return Some(b.ctor_sint(v, *width));
            }
            let (min, max) = types::signed_integer_range(*dw);
            (v >= min && v <= max).then(|| b.ctor_sint(v, *dw))
        }

        (CtorKind::UnsignedInteger { value, .. }, TypeKind::Real) => {
            let v = *value;
            ((v as f64) as u64 == v).then(|| b.ctor_real(v as f64))
        }

        (CtorKind::UnsignedInteger { value, .. }, TypeKind::Bool) if contextual => {
            Some(b.ctor_bool(*value != 0))
        }

        // Conversions to integers check non-narrowing via a round-trip.
        (CtorKind::Real { value }, TypeKind::SignedInteger { width: dw }) => {
            let d = *value;
            let w = if dst_wildcard { 64 } else { *dw };
            let i = d as i64;
            let (min, max) = types::signed_integer_range(w);
            (i as f64 == d && i >= min && i <= max).then(|| b.ctor_sint(i, w))
        }

        (CtorKind::Real { value }, TypeKind::UnsignedInteger { width: dw }) => {
            let d = *value;
            let w = if dst_wildcard { 64 } else { *dw };
            if d < 0.0 {
                return None;
            }
            let u = d as u64;
            let (_, max) = types::unsigned_integer_range(w);
            (u as f64 == d && u <= max).then(|| b.ctor_uint(u, w))
        }

        (
            CtorKind::Null,
            TypeKind::Optional | TypeKind::StrongReference | TypeKind::WeakReference,
        ) => {
            let inner = b.arena().child(dst_t, types::INNER)?;
            let inner = b.clone_deep(inner);
            Some(match &dst_kind {
                TypeKind::Optional => b.ctor_optional(inner, None),
                TypeKind::StrongReference => b.ctor_strong_ref(inner, None),
                _ => b.ctor_weak_ref(inner, None),
            })
        }

        (CtorKind::List, TypeKind::List | TypeKind::Set | TypeKind::Vector)
        | (CtorKind::Set, TypeKind::Set)
        | (CtorKind::Vector, TypeKind::Vector) => {
            // List literals convert element-wise with assignment semantics;
            // same-shape literals keep the caller's style.
            let elem_style = if matches!(kind, CtorKind::List) {
                CoercionStyle::TRY_ALL_FOR_ASSIGNMENT
            } else {
                style
            };

            let src_elem = {
                let st = types::unqualified(b.arena(), ctor::ctor_type(b.arena(), c)?)?;
                b.arena().child(st, types::CONTAINER_ELEMENT)
            };
            let elem = if dst_wildcard {
                src_elem?
            } else {
                b.arena().child(dst_t, types::CONTAINER_ELEMENT)?
            };

            let values = ctor::ctor_values(b.arena(), c);
            let mut nexprs = Vec::with_capacity(values.len());
            for e in values {
                let x = coerce_expression(b, e, elem, elem_style).ok()?;
                nexprs.push(x.expr);
            }

            let elem = b.clone_deep(elem);
            Some(match &dst_kind {
                TypeKind::List => b.ctor_list_typed(elem, nexprs),
                TypeKind::Set => b.ctor_set(elem, nexprs),
                _ => b.ctor_vector(elem, nexprs),
            })
        }

        (CtorKind::Map, TypeKind::Map) => {
            let key = b.arena().child(dst_t, types::MAP_KEY)?;
            let value = b.arena().child(dst_t, types::MAP_VALUE)?;

            let entries = ctor::ctor_map_entries(b.arena(), c);
            let mut nentries = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                let nk = coerce_expression(b, k, key, style).ok()?;
                let nv = coerce_expression(b, v, value, style).ok()?;
                nentries.push((nk.expr, nv.expr));
            }

            let key = b.clone_deep(key);
            let value = b.clone_deep(value);
            Some(b.ctor_map(key, value, nentries))
        }

        (CtorKind::Tuple, TypeKind::Tuple { .. }) => {
            let elems = ctor::ctor_values(b.arena(), c);
            let dst_elems: Vec<NodeId> =
                b.arena().children(dst_t).iter().copied().flatten().collect();

            if elems.len() != dst_elems.len() {
                return None;
            }

            let mut coerced = Vec::with_capacity(elems.len());
            for (e, t) in elems.into_iter().zip(dst_elems) {
                let x =
                    coerce_expression(b, e, t, CoercionStyle::TRY_ALL_FOR_ASSIGNMENT).ok()?;
                coerced.push(x.expr);
            }

            let nc = b.ctor_tuple(coerced);
            let nt = b.clone_deep(dst);
            b.arena_mut().set_child(nc, ctor::CTOR_TYPE, Some(nt));
            Some(nc)
        }

        (CtorKind::Struct { .. }, _) => coerce_struct_ctor(b, c, dst, style),

        _ => None,
    }
}

/// Struct literals coerce to a named record type field-wise. Extra fields
/// are rejected; missing fields must be optional, internal, defaulted, or
/// function-typed.
fn coerce_struct_ctor(
    b: &mut Builder<'_>,
    c: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Option<NodeId> {
    let arena = b.arena();
    let mut dst_t = types::unqualified(arena, dst)?;
    dst_t = types::strip_names(arena, dst_t);

    // Allow coercion from value to reference type with a new instance.
    if types::is_reference_type(arena, dst_t) {
        let inner = types::dereferenced_type(arena, dst_t)?;
        dst_t = types::unqualified(arena, inner)?;
        dst_t = types::strip_names(arena, dst_t);
    }

    let dst_data = types::type_data(arena, dst_t)?;
    if !matches!(dst_data.kind, TypeKind::Struct { .. }) {
        return None;
    }

    // Wait for the destination to be named before committing.
    dst_data.type_id.as_ref()?;

    let src_fields = ctor::ctor_struct_fields(arena, c);
    let dst_fields = types::record_fields(arena, dst_t, None);

    // Fields in the ctor that the type does not have?
    for (id, _) in &src_fields {
        if !dst_fields
            .iter()
            .any(|&f| decl::decl(arena, f).is_some_and(|d| &d.id == id))
        {
            return None;
        }
    }

    // Fields the type has but the ctor leaves out must be omissible.
    for &f in &dst_fields {
        let d = decl::decl(arena, f)?;
        if src_fields.iter().any(|(id, _)| id == &d.id) {
            continue;
        }

        let attrs = arena.child(f, decl::FIELD_ATTRIBUTES);
        let omissible = attribute::find_on(arena, attrs, attribute::OPTIONAL).is_some()
            || attribute::find_on(arena, attrs, attribute::INTERNAL).is_some()
            || attribute::find_on(arena, attrs, attribute::DEFAULT).is_some()
            || arena.child(f, decl::FIELD_DEFAULT).is_some()
            || decl::decl_type(arena, f)
                .and_then(|qt| types::unqualified(arena, qt))
                .map(|t| types::strip_names(arena, t))
                .and_then(|t| types::type_data(arena, t))
                .is_some_and(|d| matches!(d.kind, TypeKind::Function { .. }));

        if !omissible {
            return None;
        }
    }

    // Coerce each present field.
    let mut nfields = Vec::with_capacity(src_fields.len());
    for (id, value) in src_fields {
        let field = *dst_fields
            .iter()
            .find(|&&f| decl::decl(b.arena(), f).is_some_and(|d| d.id == id))?;
        let field_ty = decl::decl_type(b.arena(), field)?;
        let x = coerce_expression(b, value, field_ty, style).ok()?;
        nfields.push((id, x.expr));
    }

    let nc = b.ctor_struct(nfields);
    let nt = b.clone_deep(dst);
    b.arena_mut().set_child(nc, ctor::CTOR_TYPE, Some(nt));
    Some(nc)
}

/// Literals whose own type is still being inferred (element type `auto`) can
/// still coerce by value.
fn is_literal_pending(arena: &tern_ast::NodeArena, c: NodeId) -> bool {
    matches!(
        ctor::ctor(arena, c).map(|d| &d.kind),
        Some(
            CtorKind::List
                | CtorKind::Tuple
                | CtorKind::Struct { .. }
                | CtorKind::Map
                | CtorKind::Enum { .. }
        )
    )
}

// ===== Expression coercion =====

/// Coerces an expression to a destination type, returning the original, a
/// rewritten expression, or failure.
pub fn coerce_expression(
    b: &mut Builder<'_>,
    e: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Result<CoercedExpression, ()> {
    let style = style | CoercionStyle::RECURSING;

    // Always accept an auto destination; the auto type is updated later.
    if types::is_auto(b.arena(), dst) {
        return Ok(CoercedExpression::unchanged(e));
    }

    let src = expr::expr_type(b.arena(), e).ok_or(())?;

    let result = coerce_expression_inner(b, e, src, dst, style);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let arena = b.arena();
        let outcome = match &result {
            Ok(x) => format!(
                "{} ({})",
                print::type_to_string(
                    arena,
                    expr::expr_type(arena, x.expr).unwrap_or(dst)
                ),
                if x.new_expression { "rewritten" } else { "unchanged" }
            ),
            Err(()) => "fail".to_string(),
        };
        debug!(
            target: "operator",
            "coercing {} to {} -> {} [{}]",
            print::type_to_string(arena, src),
            print::type_to_string(arena, dst),
            outcome,
            style
        );
    }

    result
}

fn coerce_expression_inner(
    b: &mut Builder<'_>,
    e: NodeId,
    src: NodeId,
    dst: NodeId,
    style: CoercionStyle,
) -> Result<CoercedExpression, ()> {
    let no_change = CoercedExpression::unchanged(e);

    let (src_t, dst_t) = {
        let arena = b.arena();
        (
            types::unqualified(arena, src).ok_or(())?,
            types::unqualified(arena, dst).ok_or(())?,
        )
    };

    let (e_is_const, dst_is_const, dst_is_mut, same_variant, dst_wildcard) = {
        let arena = b.arena();
        let src_data = types::type_data(arena, src_t);
        let dst_data = types::type_data(arena, dst_t);
        (
            expr::is_constant(arena, e),
            types::is_constant(arena, dst),
            types::is_mutable(arena, dst_t),
            match (src_data, dst_data) {
                (Some(s), Some(d)) => {
                    types::variant_name(&s.kind) == types::variant_name(&d.kind)
                }
                _ => false,
            },
            types::type_data(arena, dst_t).is_some_and(|d| d.wildcard),
        )
    };

    // Matching external or declared type identities decide immediately.
    {
        let arena = b.arena();
        let src_data = types::type_data(arena, src_t).ok_or(())?;
        let dst_data = types::type_data(arena, dst_t).ok_or(())?;

        if let (Some(a), Some(c)) = (&src_data.cxx_id, &dst_data.cxx_id) {
            if a == c {
                return Ok(no_change);
            }
        }
        if let (Some(a), Some(c)) = (&src_data.type_id, &dst_data.type_id) {
            return if a == c { Ok(no_change) } else { Err(()) };
        }
    }

    if style.contains(CoercionStyle::TRY_EXACT_MATCH) {
        let arena = b.arena();

        if types::same_type_except_constness(arena, src, dst) {
            if e_is_const == dst_is_const {
                return Ok(no_change);
            }
            if style.contains(CoercionStyle::OPERAND_MATCHING) && !dst_is_mut {
                return Ok(no_change);
            }
        }

        if e_is_const == dst_is_const && dst_wildcard && same_variant {
            return Ok(no_change);
        }
    }

    if style.contains(CoercionStyle::TRY_CONST_PROMOTION) {
        if style.intersects(CoercionStyle::OPERAND_MATCHING | CoercionStyle::FUNCTION_CALL) {
            // Don't allow a constant value to match a non-constant operand.
            if e_is_const && !dst_is_const && dst_is_mut {
                return Err(());
            }

            let arena = b.arena();
            if dst_wildcard && same_variant {
                return Ok(no_change);
            }
            if types::same_type_except_constness(arena, src, dst) {
                return Ok(no_change);
            }
        }

        if style.contains(CoercionStyle::ASSIGNMENT) {
            let arena = b.arena();
            if types::same_type_except_constness(arena, src, dst) {
                return Ok(no_change);
            }
            if dst_wildcard && same_variant {
                return Ok(no_change);
            }
        }
    } else {
        if style.intersects(CoercionStyle::ASSIGNMENT | CoercionStyle::FUNCTION_CALL) {
            // Don't allow assigning to a constant.
            if dst_is_const {
                return Err(());
            }
        }

        if style.contains(CoercionStyle::OPERAND_MATCHING) {
            // Don't allow a constant value to match a non-constant operand.
            if e_is_const && !dst_is_const && dst_is_mut {
                return Err(());
            }
        }
    }

    // `any` accepts everything without actual coercion.
    if matches!(
        types::type_data(b.arena(), dst_t).map(|d| &d.kind),
        Some(TypeKind::Any)
    ) {
        return Ok(no_change);
    }

    // Member selectors must remain member expressions; retype in place.
    if let Some(ExprKind::Member { id }) = expr::expr(b.arena(), e).map(|x| x.kind.clone()) {
        return match coerce_type(b, src, dst, style) {
            Some(t) => {
                let ne = b.expression_member(id);
                let t = b.clone_deep(t);
                b.arena_mut().set_child(ne, 0, Some(t));
                Ok(CoercedExpression::changed(b, Some(src), ne))
            }
            None => Err(()),
        };
    }

    // Matching a tuple of arguments against an operand list follows function
    // call rules.
    if let Some(TypeKind::OperandList { operands }) =
        types::type_data(b.arena(), dst_t).map(|d| d.kind.clone())
    {
        let is_tuple_ctor = {
            let arena = b.arena();
            expr::expr(arena, e)
                .map(|x| matches!(x.kind, ExprKind::Ctor))
                .unwrap_or(false)
                && arena
                    .child(e, 0)
                    .and_then(|c| ctor::ctor(arena, c))
                    .is_some_and(|c| matches!(c.kind, CtorKind::Tuple))
        };

        if !is_tuple_ctor {
            return Err(());
        }

        let function_style = if style.contains(CoercionStyle::TRY_COERCION) {
            CoercionStyle::TRY_ALL_FOR_FUNCTION_CALL
        } else {
            CoercionStyle::TRY_DIRECT_MATCH_FOR_FUNCTION_CALL
        };

        let tuple = b.arena().child(e, 0).ok_or(())?;
        let args = ctor::ctor_values(b.arena(), tuple);

        return match coerce_operands(b, &args, &operands, function_style) {
            Ok((changed, nexprs)) => {
                if changed {
                    let nc = b.ctor_tuple(nexprs);
                    let ne = b.expression_ctor(nc);
                    Ok(CoercedExpression::changed(b, Some(src), ne))
                } else {
                    Ok(no_change)
                }
            }
            Err(_) => Err(()),
        };
    }

    if style.intersects(CoercionStyle::ASSIGNMENT | CoercionStyle::FUNCTION_CALL) {
        let dst_kind = types::type_data(b.arena(), dst_t).map(|d| d.kind.clone());

        match dst_kind {
            Some(TypeKind::Optional) | Some(TypeKind::Result_) => {
                if dst_wildcard {
                    return Ok(no_change);
                }
                // All types convert into a corresponding optional/result.
                let inner = b.arena().child(dst_t, types::INNER).ok_or(())?;
                if let Ok(x) = coerce_expression(b, e, inner, style) {
                    let t = b.clone_deep(dst);
                    let ne = b.expression_coerced(x.expr, t);
                    return Ok(CoercedExpression::changed(b, Some(src), ne));
                }
            }
            Some(TypeKind::ValueReference)
                if !types::is_reference_type(b.arena(), src_t) =>
            {
                let inner = b.arena().child(dst_t, types::INNER).ok_or(())?;
                if let Ok(x) = coerce_expression(b, e, inner, style) {
                    let t = b.clone_deep(dst);
                    let ne = b.expression_coerced(x.expr, t);
                    return Ok(CoercedExpression::changed(b, Some(src), ne));
                }
            }
            _ => {}
        }
    }

    if style.contains(CoercionStyle::TRY_COERCION) {
        let ctor_node = {
            let arena = b.arena();
            match expr::expr(arena, e).map(|x| &x.kind) {
                Some(ExprKind::Ctor) => arena.child(e, 0),
                _ => None,
            }
        };

        if let Some(c) = ctor_node {
            if let Some(nc) = coerce_ctor(b, c, dst, style) {
                let coerced = b.ctor_coerced(c, nc);
                let ne = b.expression_ctor(coerced);
                return Ok(CoercedExpression::changed(b, Some(src), ne));
            }
        }

        if let Some(t) = coerce_type(b, src, dst, style) {
            // Wrap into a coercion even if the type is unchanged, so that
            // the overloader can recognize the types weren't identical.
            let t = b.clone_deep(t);
            let ne = b.expression_coerced(e, t);
            return Ok(CoercedExpression::changed(b, Some(src), ne));
        }
    }

    Err(())
}

// ===== Operand coercion =====

/// Matches expressions against an operand list pairwise.
///
/// Trailing operands without a matching expression must provide a default
/// (substituted into the result) or be optional. At most one argument may
/// change its primary type for an alternative to match, and none under
/// `DISALLOW_TYPE_CHANGES`; function calls are exempt.
pub fn coerce_operands(
    b: &mut Builder<'_>,
    exprs: &[NodeId],
    operands: &[Operand],
    style: CoercionStyle,
) -> Result<(bool, Vec<NodeId>), String> {
    if exprs.len() > operands.len() {
        return Err("more expressions than operands".to_string());
    }

    let mut num_type_changes = 0;
    let mut changed = false;
    let mut transformed = Vec::with_capacity(operands.len());

    for (i, op) in operands.iter().enumerate() {
        if i >= exprs.len() {
            // Running out of expressions: the operand must have a default or
            // be optional.
            if let Some(default) = op.default {
                let d = b.clone_deep(default);
                transformed.push(d);
                changed = true;
            } else if op.optional {
                // Leave the slot out.
            } else {
                return Err("stray operand".to_string());
            }
            continue;
        }

        let result = match coerce_expression(b, exprs[i], op.ty, style) {
            Ok(x) => x,
            Err(()) => {
                debug!(
                    target: "operator",
                    "  [param {i}] matching {} against {} -> failure",
                    print::type_to_string(
                        b.arena(),
                        expr::expr_type(b.arena(), exprs[i]).unwrap_or(op.ty)
                    ),
                    print::type_to_string(b.arena(), op.ty)
                );
                return Err("could not match coercion operands".to_string());
            }
        };

        // Only one operand may change its primary type for an alternative to
        // match.
        if result.consider_type_changed
            && !style.contains(CoercionStyle::FUNCTION_CALL)
        {
            num_type_changes += 1;
            if num_type_changes > 1 || style.contains(CoercionStyle::DISALLOW_TYPE_CHANGES) {
                return Err("no valid coercion found".to_string());
            }
        }

        if result.new_expression {
            changed = true;
        }

        transformed.push(result.expr);
    }

    Ok((changed, transformed))
}

#[cfg(test)]
#[path = "tests/coercion_unit.rs"]
mod tests;
