//! Operators.
//!
//! Operators aren't AST nodes themselves: they *define* an operation the
//! language makes available. The resolver instantiates one with concrete
//! operand expressions to create a resolved-operator expression node.
//!
//! Definitions are data: a `OperatorDef` names the kind, priority and
//! documentation, plus a function building the signature against a `Builder`
//! and a recipe for the result type. The registry turns definitions into
//! initialized `Operator`s once per compilation context.

use tern_common::Id;

use crate::arena::{NodeArena, NodeId};
use crate::builder::Builder;
use crate::print;
use crate::types::{self, Operand, TypeKind};

/// Enumeration of all operator kinds the language supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Add,
    Begin,
    BitAnd,
    BitOr,
    BitXor,
    Call,
    Cast,
    CustomAssign,
    DecrPostfix,
    DecrPrefix,
    Delete,
    Deref,
    Difference,
    DifferenceAssign,
    Division,
    DivisionAssign,
    Equal,
    End,
    Greater,
    GreaterEqual,
    HasMember,
    In,
    IncrPostfix,
    IncrPrefix,
    Index,
    IndexAssign,
    Lower,
    LowerEqual,
    Member,
    MemberCall,
    Modulo,
    Multiple,
    MultipleAssign,
    Negate,
    New,
    Pack,
    Power,
    ShiftLeft,
    ShiftRight,
    SignNeg,
    SignPos,
    Size,
    Sum,
    SumAssign,
    TryMember,
    Unequal,
    Unknown,
    Unpack,
    Unset,
}

/// Returns true for operator kinds the resolver treats as commutative.
pub const fn is_commutative(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::BitAnd
            | Kind::BitOr
            | Kind::BitXor
            | Kind::Equal
            | Kind::Unequal
            | Kind::Multiple
            | Kind::Sum
    )
}

/// A descriptive token for an operator kind, for display purposes only.
pub const fn kind_token(kind: Kind) -> &'static str {
    match kind {
        Kind::Add => "add",
        Kind::Begin => "begin",
        Kind::BitAnd => "&",
        Kind::BitOr => "|",
        Kind::BitXor => "^",
        Kind::Call => "call",
        Kind::Cast => "cast",
        Kind::CustomAssign => "=",
        Kind::DecrPostfix | Kind::DecrPrefix => "--",
        Kind::Delete => "delete",
        Kind::Deref => "*",
        Kind::Difference => "-",
        Kind::DifferenceAssign => "-=",
        Kind::Division => "/",
        Kind::DivisionAssign => "/=",
        Kind::Equal => "==",
        Kind::End => "end",
        Kind::Greater => ">",
        Kind::GreaterEqual => ">=",
        Kind::HasMember => "?.",
        Kind::In => "in",
        Kind::IncrPostfix | Kind::IncrPrefix => "++",
        Kind::Index => "index",
        Kind::IndexAssign => "index_assign",
        Kind::Lower => "<",
        Kind::LowerEqual => "<=",
        Kind::Member => ".",
        Kind::MemberCall => "method call",
        Kind::Modulo => "%",
        Kind::Multiple => "*",
        Kind::MultipleAssign => "*=",
        Kind::Negate => "~",
        Kind::New => "new",
        Kind::Pack => "pack",
        Kind::Power => "**",
        Kind::ShiftLeft => "<<",
        Kind::ShiftRight => ">>",
        Kind::SignNeg => "-",
        Kind::SignPos => "+",
        Kind::Size => "size",
        Kind::Sum => "+",
        Kind::SumAssign => "+=",
        Kind::TryMember => ".?",
        Kind::Unequal => "!=",
        Kind::Unknown => "<unknown>",
        Kind::Unpack => "unpack",
        Kind::Unset => "unset",
    }
}

/// Operator priority during resolving relative to others of the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    #[default]
    Normal,
}

/// Recipe for the result type of a resolved operator.
#[derive(Clone, Copy, Debug)]
pub enum ResultSpec {
    /// A fixed type built with the signature.
    Type,
    /// The (qualified) type of the i-th operand.
    Operand(usize),
    /// The element type of the i-th operand's type.
    ElementOf(usize),
    /// The key type of the i-th operand's (map) type.
    KeyOf(usize),
    /// The dereferenced type of the i-th operand's type.
    DereferencedOf(usize),
    /// A strong reference to the i-th operand's type.
    StrongRefOf(usize),
    /// The iterator type of the i-th operand's container type.
    IteratorOf(usize),
    /// The type of the record field that the `member`-th operand (a member
    /// selector expression) names on the `object`-th operand's record type.
    MemberOf { object: usize, member: usize },
}

/// An operator's signature: operand list, result, priority, documentation.
#[derive(Clone, Debug)]
pub struct Signature {
    pub kind: Kind,
    /// Fixed result type; consulted when `result` is `ResultSpec::Type`.
    pub result: NodeId,
    pub result_spec: ResultSpec,
    pub operands: Vec<Operand>,
    pub priority: Priority,
    /// Namespace where to document this operator.
    pub ns: &'static str,
    /// Documentation string for the autogenerated reference manual.
    pub doc: &'static str,
}

/// Signature pieces produced by a definition's `signature` function.
pub struct SignatureSpec {
    pub operands: Vec<Operand>,
    /// Fixed result type; for dynamic results, the `Void` type is customary.
    pub result: NodeId,
    pub result_spec: ResultSpec,
}

/// A data-driven operator definition.
pub struct OperatorDef {
    /// Diagnostic name, e.g. `signed_integer::Sum`.
    pub name: &'static str,
    pub kind: Kind,
    pub priority: Priority,
    pub ns: &'static str,
    pub doc: &'static str,
    /// Builds the operand list and result type in a fresh context.
    pub signature: fn(&mut Builder) -> SignatureSpec,
}

/// Handle of an operator within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperatorId(pub u32);

/// An initialized operator: definition plus its built signature.
pub struct Operator {
    pub name: &'static str,
    signature: Signature,
}

impl Operator {
    pub(crate) fn new(def: &OperatorDef, spec: SignatureSpec) -> Self {
        Operator {
            name: def.name,
            signature: Signature {
                kind: def.kind,
                result: spec.result,
                result_spec: spec.result_spec,
                operands: spec.operands,
                priority: def.priority,
                ns: def.ns,
                doc: def.doc,
            },
        }
    }

    /// For function-call candidates synthesized outside the registry.
    pub fn from_signature(name: &'static str, signature: Signature) -> Self {
        Operator { name, signature }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn kind(&self) -> Kind {
        self.signature.kind
    }

    pub fn operands(&self) -> &[Operand] {
        &self.signature.operands
    }

    /// Computes the result type for the given (already coerced) operand
    /// expressions. Returns a detached qualified-type node.
    pub fn result(&self, builder: &mut Builder<'_>, operands: &[NodeId]) -> Option<NodeId> {
        let spec = self.signature.result_spec;
        result_for(builder, spec, self.signature.result, operands)
    }

    /// The method id of a member-call operator (from its second operand's
    /// `Member` type).
    pub fn method_id(&self, arena: &NodeArena) -> Option<Id> {
        if self.signature.kind != Kind::MemberCall {
            return None;
        }
        let op1 = self.signature.operands.get(1)?;
        let ty = types::unqualified(arena, op1.ty)?;
        match &types::type_data(arena, ty)?.kind {
            TypeKind::Member { id } => Some(id.clone()),
            _ => None,
        }
    }

    /// Prints the operator's prototype, e.g. `<int<32>> + <int<32>>`.
    pub fn print(&self, arena: &NodeArena) -> String {
        let ops: Vec<String> = self
            .signature
            .operands
            .iter()
            .map(|o| format!("<{}>", print::type_to_string(arena, o.ty)))
            .collect();
        print_operator(self.signature.kind, &ops)
    }
}

/// Computes a result type from a `ResultSpec`; shared between registry
/// operators and synthesized call operators.
pub fn result_for(
    builder: &mut Builder<'_>,
    spec: ResultSpec,
    fixed: NodeId,
    operands: &[NodeId],
) -> Option<NodeId> {
    let operand_type = |builder: &Builder<'_>, i: usize| {
        operands
            .get(i)
            .and_then(|&e| crate::expr::expr_type(builder.arena(), e))
    };

    match spec {
        ResultSpec::Type => Some(builder.clone_deep(fixed)),
        ResultSpec::Operand(i) => {
            let t = operand_type(builder, i)?;
            Some(builder.clone_deep(t))
        }
        ResultSpec::ElementOf(i) => {
            let qt = operand_type(builder, i)?;
            let ty = types::unqualified(builder.arena(), qt)?;
            let elem = types::element_type(builder.arena(), ty)?;
            Some(builder.clone_deep(elem))
        }
        ResultSpec::KeyOf(i) => {
            let qt = operand_type(builder, i)?;
            let ty = types::unqualified(builder.arena(), qt)?;
            let key = types::key_type(builder.arena(), ty)?;
            Some(builder.clone_deep(key))
        }
        ResultSpec::DereferencedOf(i) => {
            let qt = operand_type(builder, i)?;
            let ty = types::unqualified(builder.arena(), qt)?;
            let inner = types::dereferenced_type(builder.arena(), ty)?;
            Some(builder.clone_deep(inner))
        }
        ResultSpec::StrongRefOf(i) => {
            let qt = operand_type(builder, i)?;
            let inner = builder.clone_deep(qt);
            let ty = builder.type_strong_ref(inner);
            Some(builder.qualified_type(ty, false))
        }
        ResultSpec::IteratorOf(i) => {
            let qt = operand_type(builder, i)?;
            let ty = types::unqualified(builder.arena(), qt)?;
            let iter = builder.iterator_type_for(ty)?;
            Some(builder.qualified_type(iter, false))
        }
        ResultSpec::MemberOf { object, member } => {
            let member_expr = *operands.get(member)?;
            let member_id = match crate::expr::expr(builder.arena(), member_expr)
                .map(|e| &e.kind)
            {
                Some(crate::expr::ExprKind::Member { id }) => id.clone(),
                _ => return None,
            };

            let qt = operand_type(builder, object)?;
            let mut ty = types::unqualified(builder.arena(), qt)?;
            ty = types::strip_names(builder.arena(), ty);
            if types::is_reference_type(builder.arena(), ty) {
                let inner = types::dereferenced_type(builder.arena(), ty)?;
                ty = types::unqualified(builder.arena(), inner)?;
            }

            let field = *types::record_fields(builder.arena(), ty, Some(&member_id))
                .first()?;
            let field_ty = crate::decl::decl_type(builder.arena(), field)?;
            Some(builder.clone_deep(field_ty))
        }
    }
}

/// Renders an operator usage for display.
pub fn print_operator(kind: Kind, ops: &[String]) -> String {
    let op = |i: usize| ops.get(i).map(String::as_str).unwrap_or("<none>");

    match kind {
        Kind::Add => format!("add {}[{}]", op(0), op(1)),
        Kind::Begin => format!("begin({})", op(0)),
        Kind::Call => format!("{}({})", op(0), op(1)),
        Kind::Cast => format!("cast<{}>({})", op(1), op(0)),
        Kind::CustomAssign => format!("{} = {}", op(0), op(1)),
        Kind::DecrPostfix => format!("{}--", op(0)),
        Kind::DecrPrefix => format!("--{}", op(0)),
        Kind::Delete => format!("delete {}[{}]", op(0), op(1)),
        Kind::Deref => format!("(*{})", op(0)),
        Kind::End => format!("end({})", op(0)),
        Kind::HasMember => format!("{}?.{}", op(0), op(1)),
        Kind::In => format!("{} in {}", op(0), op(1)),
        Kind::IncrPostfix => format!("{}++", op(0)),
        Kind::IncrPrefix => format!("++{}", op(0)),
        Kind::Index => format!("{}[{}]", op(0), op(1)),
        Kind::IndexAssign => format!("{}[{}] = {}", op(0), op(1), op(2)),
        Kind::Member => format!("{}.{}", op(0), op(1)),
        Kind::MemberCall => format!("{}.{}({})", op(0), op(1), op(2)),
        Kind::Negate => format!("~{}", op(0)),
        Kind::New => format!("new {}", op(0)),
        Kind::Pack => format!("pack{}", op(0)),
        Kind::SignNeg => format!("-{}", op(0)),
        Kind::SignPos => format!("+{}", op(0)),
        Kind::Size => format!("|{}|", op(0)),
        Kind::TryMember => format!("{}.?{}", op(0), op(1)),
        Kind::Unknown => "<unknown>".to_string(),
        Kind::Unpack => format!("unpack<{}>({})", op(0), op(1)),
        Kind::Unset => format!("unset {}", op(0)),
        // Binary infix forms.
        _ => format!("{} {} {}", op(0), kind_token(kind), op(1)),
    }
}
