//! Expression Nodes
//!
//! The value-producing part of the tree. Every variant is a struct holding an
//! [`ExprMeta`] (location, identity, resolved type, classification flags and
//! non-owning back-references) plus its own scalar fields and owned children.
//!
//! Owned single children are `Option<Box<Expression>>`: `None` is the
//! "absent" state produced by [`Expression::leafcopy`]. Back-references are
//! plain [`NodeId`]s and never own anything.

use super::location::Location;
use super::operators::{BinaryOperator, UnaryOperator};
use super::types::{PositionalParameterType, SizedType};
use bitflags::bitflags;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of an expression node. Back-references name their target by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Allocate an id no other node in this process has.
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Classification of an expression, fixed at construction so later passes
    /// can dispatch without re-matching the variant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExprFlags: u8 {
        const NONE = 0b000;
        const LITERAL = 0b001;
        const VARIABLE = 0b010;
        const MAP = 0b100;
    }
}

/// Attributes shared by every expression variant.
#[derive(Debug)]
pub struct ExprMeta {
    pub loc: Location,
    id: NodeId,
    /// Resolved type. Written by semantic analysis only.
    pub ty: SizedType,
    flags: ExprFlags,
    /// Map this expression is a key of. Written by semantic analysis only.
    pub key_for_map: Option<NodeId>,
    /// Map this expression is assigned to. Written by `AssignMapStatement`.
    pub map: Option<NodeId>,
    /// Variable this expression is assigned to. Written by `AssignVarStatement`.
    pub var: Option<NodeId>,
}

impl ExprMeta {
    fn new(loc: Location, flags: ExprFlags) -> Self {
        ExprMeta {
            loc,
            id: NodeId::fresh(),
            ty: SizedType::default(),
            flags,
            key_for_map: None,
            map: None,
            var: None,
        }
    }

    /// Copy of every attribute under a fresh identity.
    pub fn leafcopy(&self) -> Self {
        ExprMeta {
            loc: self.loc,
            id: NodeId::fresh(),
            ty: self.ty.clone(),
            flags: self.flags,
            key_for_map: self.key_for_map,
            map: self.map,
            var: self.var,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn flags(&self) -> ExprFlags {
        self.flags
    }

    pub fn is_literal(&self) -> bool {
        self.flags.contains(ExprFlags::LITERAL)
    }

    pub fn is_variable(&self) -> bool {
        self.flags.contains(ExprFlags::VARIABLE)
    }

    pub fn is_map(&self) -> bool {
        self.flags.contains(ExprFlags::MAP)
    }
}

pub type ExpressionList = Vec<Expression>;

fn boxed(expr: Expression) -> Option<Box<Expression>> {
    Some(Box::new(expr))
}

/// Integer literal, e.g. `42`.
#[derive(Debug)]
pub struct Integer {
    pub meta: ExprMeta,
    pub n: i64,
}

impl Integer {
    pub fn new(n: i64, loc: Location) -> Self {
        Integer {
            meta: ExprMeta::new(loc, ExprFlags::LITERAL),
            n,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Integer {
            meta: self.meta.leafcopy(),
            n: self.n,
        }
    }
}

/// Positional parameter, `$1` or `$#`.
#[derive(Debug)]
pub struct PositionalParameter {
    pub meta: ExprMeta,
    pub ptype: PositionalParameterType,
    pub n: i64,
    /// Set when the parameter appears inside `str()` and must be kept textual.
    pub is_in_str: bool,
}

impl PositionalParameter {
    pub fn new(ptype: PositionalParameterType, n: i64, loc: Location) -> Self {
        PositionalParameter {
            meta: ExprMeta::new(loc, ExprFlags::LITERAL),
            ptype,
            n,
            is_in_str: false,
        }
    }

    pub fn leafcopy(&self) -> Self {
        PositionalParameter {
            meta: self.meta.leafcopy(),
            ptype: self.ptype,
            n: self.n,
            is_in_str: self.is_in_str,
        }
    }
}

/// String literal, e.g. `"hello\n"`.
#[derive(Debug)]
pub struct StringLiteral {
    pub meta: ExprMeta,
    pub value: String,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>, loc: Location) -> Self {
        StringLiteral {
            meta: ExprMeta::new(loc, ExprFlags::LITERAL),
            value: value.into(),
        }
    }

    pub fn leafcopy(&self) -> Self {
        StringLiteral {
            meta: self.meta.leafcopy(),
            value: self.value.clone(),
        }
    }
}

/// Stack formatting mode literal, e.g. `perf` in `kstack(perf)`.
#[derive(Debug)]
pub struct StackMode {
    pub meta: ExprMeta,
    pub mode: String,
}

impl StackMode {
    pub fn new(mode: impl Into<String>, loc: Location) -> Self {
        StackMode {
            meta: ExprMeta::new(loc, ExprFlags::LITERAL),
            mode: mode.into(),
        }
    }

    pub fn leafcopy(&self) -> Self {
        StackMode {
            meta: self.meta.leafcopy(),
            mode: self.mode.clone(),
        }
    }
}

/// Bare identifier, e.g. a struct or enum name.
#[derive(Debug)]
pub struct Identifier {
    pub meta: ExprMeta,
    pub ident: String,
}

impl Identifier {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Identifier {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            ident: ident.into(),
        }
    }

    pub fn leafcopy(&self) -> Self {
        Identifier {
            meta: self.meta.leafcopy(),
            ident: self.ident.clone(),
        }
    }
}

/// Builtin symbol, e.g. `pid`, `comm`, `arg0`.
#[derive(Debug)]
pub struct Builtin {
    pub meta: ExprMeta,
    pub ident: String,
    /// Probe the builtin was resolved in. Written by semantic analysis.
    pub probe_id: Option<usize>,
}

impl Builtin {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Builtin {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            ident: ident.into(),
            probe_id: None,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Builtin {
            meta: self.meta.leafcopy(),
            ident: self.ident.clone(),
            probe_id: self.probe_id,
        }
    }

    /// `arg0`, `arg1`, ... and `sarg0`, `sarg1`, ...
    pub fn is_argx(&self) -> bool {
        let digits = self
            .ident
            .strip_prefix("sarg")
            .or_else(|| self.ident.strip_prefix("arg"));
        matches!(digits, Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// Function call. `vargs` is `None` for `f` without parentheses and
/// `Some(vec![])` for `f()`.
#[derive(Debug)]
pub struct Call {
    pub meta: ExprMeta,
    pub func: String,
    pub vargs: Option<ExpressionList>,
}

impl Call {
    pub fn new(func: impl Into<String>, vargs: Option<ExpressionList>, loc: Location) -> Self {
        Call {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            func: func.into(),
            vargs,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Call {
            meta: self.meta.leafcopy(),
            func: self.func.clone(),
            vargs: None,
        }
    }

    pub fn args(&self) -> &[Expression] {
        self.vargs.as_deref().unwrap_or(&[])
    }
}

/// Map reference, e.g. `@counts[pid, comm]`.
#[derive(Debug)]
pub struct Map {
    pub meta: ExprMeta,
    pub ident: String,
    pub vargs: Option<ExpressionList>,
    pub skip_key_validation: bool,
}

impl Map {
    pub fn new(ident: impl Into<String>, vargs: Option<ExpressionList>, loc: Location) -> Self {
        Map {
            meta: ExprMeta::new(loc, ExprFlags::MAP),
            ident: ident.into(),
            vargs,
            skip_key_validation: false,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Map {
            meta: self.meta.leafcopy(),
            ident: self.ident.clone(),
            vargs: None,
            skip_key_validation: self.skip_key_validation,
        }
    }

    pub fn keys(&self) -> &[Expression] {
        self.vargs.as_deref().unwrap_or(&[])
    }
}

/// Scratch variable reference, e.g. `$x`.
#[derive(Debug)]
pub struct Variable {
    pub meta: ExprMeta,
    pub ident: String,
}

impl Variable {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Variable {
            meta: ExprMeta::new(loc, ExprFlags::VARIABLE),
            ident: ident.into(),
        }
    }

    pub fn leafcopy(&self) -> Self {
        Variable {
            meta: self.meta.leafcopy(),
            ident: self.ident.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Binop {
    pub meta: ExprMeta,
    pub left: Option<Box<Expression>>,
    pub op: BinaryOperator,
    pub right: Option<Box<Expression>>,
}

impl Binop {
    pub fn new(left: Expression, op: BinaryOperator, right: Expression, loc: Location) -> Self {
        Binop {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            left: boxed(left),
            op,
            right: boxed(right),
        }
    }

    pub fn leafcopy(&self) -> Self {
        Binop {
            meta: self.meta.leafcopy(),
            left: None,
            op: self.op,
            right: None,
        }
    }

    pub fn opstr(&self) -> &'static str {
        self.op.as_str()
    }
}

#[derive(Debug)]
pub struct Unop {
    pub meta: ExprMeta,
    pub op: UnaryOperator,
    pub expr: Option<Box<Expression>>,
    /// `x++` rather than `++x`. Only meaningful for increment and decrement.
    pub is_post_op: bool,
}

impl Unop {
    pub fn new(op: UnaryOperator, expr: Expression, is_post_op: bool, loc: Location) -> Self {
        Unop {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            op,
            expr: boxed(expr),
            is_post_op,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Unop {
            meta: self.meta.leafcopy(),
            op: self.op,
            expr: None,
            is_post_op: self.is_post_op,
        }
    }

    pub fn opstr(&self) -> &'static str {
        self.op.as_str()
    }
}

/// Field access by name (`x.field`) or tuple element access (`x.0`).
#[derive(Debug)]
pub struct FieldAccess {
    pub meta: ExprMeta,
    pub expr: Option<Box<Expression>>,
    pub field: String,
    pub index: Option<usize>,
}

impl FieldAccess {
    pub fn new(expr: Expression, field: impl Into<String>, loc: Location) -> Self {
        FieldAccess {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            expr: boxed(expr),
            field: field.into(),
            index: None,
        }
    }

    pub fn indexed(expr: Expression, index: usize, loc: Location) -> Self {
        FieldAccess {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            expr: boxed(expr),
            field: String::new(),
            index: Some(index),
        }
    }

    pub fn leafcopy(&self) -> Self {
        FieldAccess {
            meta: self.meta.leafcopy(),
            expr: None,
            field: self.field.clone(),
            index: self.index,
        }
    }
}

#[derive(Debug)]
pub struct ArrayAccess {
    pub meta: ExprMeta,
    pub expr: Option<Box<Expression>>,
    pub indexpr: Option<Box<Expression>>,
}

impl ArrayAccess {
    pub fn new(expr: Expression, indexpr: Expression, loc: Location) -> Self {
        ArrayAccess {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            expr: boxed(expr),
            indexpr: boxed(indexpr),
        }
    }

    pub fn leafcopy(&self) -> Self {
        ArrayAccess {
            meta: self.meta.leafcopy(),
            expr: None,
            indexpr: None,
        }
    }
}

/// C-style cast, e.g. `(struct task_struct *)curtask`.
#[derive(Debug)]
pub struct Cast {
    pub meta: ExprMeta,
    pub cast_type: String,
    pub is_pointer: bool,
    pub is_double_pointer: bool,
    pub expr: Option<Box<Expression>>,
}

impl Cast {
    pub fn new(
        cast_type: impl Into<String>,
        is_pointer: bool,
        is_double_pointer: bool,
        expr: Expression,
        loc: Location,
    ) -> Self {
        Cast {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            cast_type: cast_type.into(),
            is_pointer,
            is_double_pointer,
            expr: boxed(expr),
        }
    }

    pub fn leafcopy(&self) -> Self {
        Cast {
            meta: self.meta.leafcopy(),
            cast_type: self.cast_type.clone(),
            is_pointer: self.is_pointer,
            is_double_pointer: self.is_double_pointer,
            expr: None,
        }
    }
}

#[derive(Debug)]
pub struct Tuple {
    pub meta: ExprMeta,
    pub elems: ExpressionList,
}

impl Tuple {
    pub fn new(elems: ExpressionList, loc: Location) -> Self {
        Tuple {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            elems,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Tuple {
            meta: self.meta.leafcopy(),
            elems: Vec::new(),
        }
    }
}

/// `cond ? left : right`
#[derive(Debug)]
pub struct Ternary {
    pub meta: ExprMeta,
    pub cond: Option<Box<Expression>>,
    pub left: Option<Box<Expression>>,
    pub right: Option<Box<Expression>>,
}

impl Ternary {
    pub fn new(cond: Expression, left: Expression, right: Expression, loc: Location) -> Self {
        Ternary {
            meta: ExprMeta::new(loc, ExprFlags::NONE),
            cond: boxed(cond),
            left: boxed(left),
            right: boxed(right),
        }
    }

    pub fn leafcopy(&self) -> Self {
        Ternary {
            meta: self.meta.leafcopy(),
            cond: None,
            left: None,
            right: None,
        }
    }
}

/// Main expression enum containing all variants
#[derive(Debug)]
pub enum Expression {
    Integer(Integer),
    PositionalParameter(PositionalParameter),
    String(StringLiteral),
    StackMode(StackMode),
    Identifier(Identifier),
    Builtin(Builtin),
    Call(Call),
    Map(Map),
    Variable(Variable),
    Binop(Binop),
    Unop(Unop),
    FieldAccess(FieldAccess),
    ArrayAccess(ArrayAccess),
    Cast(Cast),
    Tuple(Tuple),
    Ternary(Ternary),
}

impl Expression {
    pub fn meta(&self) -> &ExprMeta {
        match self {
            Expression::Integer(e) => &e.meta,
            Expression::PositionalParameter(e) => &e.meta,
            Expression::String(e) => &e.meta,
            Expression::StackMode(e) => &e.meta,
            Expression::Identifier(e) => &e.meta,
            Expression::Builtin(e) => &e.meta,
            Expression::Call(e) => &e.meta,
            Expression::Map(e) => &e.meta,
            Expression::Variable(e) => &e.meta,
            Expression::Binop(e) => &e.meta,
            Expression::Unop(e) => &e.meta,
            Expression::FieldAccess(e) => &e.meta,
            Expression::ArrayAccess(e) => &e.meta,
            Expression::Cast(e) => &e.meta,
            Expression::Tuple(e) => &e.meta,
            Expression::Ternary(e) => &e.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut ExprMeta {
        match self {
            Expression::Integer(e) => &mut e.meta,
            Expression::PositionalParameter(e) => &mut e.meta,
            Expression::String(e) => &mut e.meta,
            Expression::StackMode(e) => &mut e.meta,
            Expression::Identifier(e) => &mut e.meta,
            Expression::Builtin(e) => &mut e.meta,
            Expression::Call(e) => &mut e.meta,
            Expression::Map(e) => &mut e.meta,
            Expression::Variable(e) => &mut e.meta,
            Expression::Binop(e) => &mut e.meta,
            Expression::Unop(e) => &mut e.meta,
            Expression::FieldAccess(e) => &mut e.meta,
            Expression::ArrayAccess(e) => &mut e.meta,
            Expression::Cast(e) => &mut e.meta,
            Expression::Tuple(e) => &mut e.meta,
            Expression::Ternary(e) => &mut e.meta,
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta().id()
    }

    pub fn is_literal(&self) -> bool {
        self.meta().is_literal()
    }

    pub fn is_variable(&self) -> bool {
        self.meta().is_variable()
    }

    pub fn is_map(&self) -> bool {
        self.meta().is_map()
    }

    /// Same variant, same scalars and back-references, no children.
    pub fn leafcopy(&self) -> Expression {
        match self {
            Expression::Integer(e) => Expression::Integer(e.leafcopy()),
            Expression::PositionalParameter(e) => Expression::PositionalParameter(e.leafcopy()),
            Expression::String(e) => Expression::String(e.leafcopy()),
            Expression::StackMode(e) => Expression::StackMode(e.leafcopy()),
            Expression::Identifier(e) => Expression::Identifier(e.leafcopy()),
            Expression::Builtin(e) => Expression::Builtin(e.leafcopy()),
            Expression::Call(e) => Expression::Call(e.leafcopy()),
            Expression::Map(e) => Expression::Map(e.leafcopy()),
            Expression::Variable(e) => Expression::Variable(e.leafcopy()),
            Expression::Binop(e) => Expression::Binop(e.leafcopy()),
            Expression::Unop(e) => Expression::Unop(e.leafcopy()),
            Expression::FieldAccess(e) => Expression::FieldAccess(e.leafcopy()),
            Expression::ArrayAccess(e) => Expression::ArrayAccess(e.leafcopy()),
            Expression::Cast(e) => Expression::Cast(e.leafcopy()),
            Expression::Tuple(e) => Expression::Tuple(e.leafcopy()),
            Expression::Ternary(e) => Expression::Ternary(e.leafcopy()),
        }
    }

    /// Owned children, in traversal order.
    pub fn children(&self) -> SmallVec<[&Expression; 4]> {
        let mut out = SmallVec::new();
        match self {
            Expression::Call(e) => out.extend(e.args()),
            Expression::Map(e) => out.extend(e.keys()),
            Expression::Binop(e) => out.extend(e.left.as_deref().into_iter().chain(e.right.as_deref())),
            Expression::Unop(e) => out.extend(e.expr.as_deref()),
            Expression::FieldAccess(e) => out.extend(e.expr.as_deref()),
            Expression::ArrayAccess(e) => {
                out.extend(e.expr.as_deref().into_iter().chain(e.indexpr.as_deref()))
            }
            Expression::Cast(e) => out.extend(e.expr.as_deref()),
            Expression::Tuple(e) => out.extend(e.elems.iter()),
            Expression::Ternary(e) => out.extend(
                e.cond
                    .as_deref()
                    .into_iter()
                    .chain(e.left.as_deref())
                    .chain(e.right.as_deref()),
            ),
            Expression::Integer(_)
            | Expression::PositionalParameter(_)
            | Expression::String(_)
            | Expression::StackMode(_)
            | Expression::Identifier(_)
            | Expression::Builtin(_)
            | Expression::Variable(_) => {
                // Leaf nodes
            }
        }
        out
    }

    /// Find the map node with identity `id` in this subtree.
    pub fn find_map(&self, id: NodeId) -> Option<&Map> {
        match self {
            Expression::Map(m) if m.meta.id() == id => Some(m),
            _ => self.children().into_iter().find_map(|child| child.find_map(id)),
        }
    }

    /// Find the variable node with identity `id` in this subtree.
    pub fn find_variable(&self, id: NodeId) -> Option<&Variable> {
        match self {
            Expression::Variable(v) if v.meta.id() == id => Some(v),
            _ => self
                .children()
                .into_iter()
                .find_map(|child| child.find_variable(id)),
        }
    }

    /// Short variant name used in diagnostics and dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Integer(_) => "integer",
            Expression::PositionalParameter(_) => "param",
            Expression::String(_) => "string",
            Expression::StackMode(_) => "stack_mode",
            Expression::Identifier(_) => "identifier",
            Expression::Builtin(_) => "builtin",
            Expression::Call(_) => "call",
            Expression::Map(_) => "map",
            Expression::Variable(_) => "variable",
            Expression::Binop(_) => "binop",
            Expression::Unop(_) => "unop",
            Expression::FieldAccess(_) => "field_access",
            Expression::ArrayAccess(_) => "array_access",
            Expression::Cast(_) => "cast",
            Expression::Tuple(_) => "tuple",
            Expression::Ternary(_) => "ternary",
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(node: $ty) -> Self {
                    Expression::$variant(node)
                }
            }
        )*
    };
}

impl_from_variant! {
    Integer => Integer,
    PositionalParameter => PositionalParameter,
    String => StringLiteral,
    StackMode => StackMode,
    Identifier => Identifier,
    Builtin => Builtin,
    Call => Call,
    Map => Map,
    Variable => Variable,
    Binop => Binop,
    Unop => Unop,
    FieldAccess => FieldAccess,
    ArrayAccess => ArrayAccess,
    Cast => Cast,
    Tuple => Tuple,
    Ternary => Ternary,
}
