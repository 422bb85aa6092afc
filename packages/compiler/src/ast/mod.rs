//! Probe Language AST
//!
//! The tree every compiler pass operates on. The (external) parser builds it
//! bottom-up; passes then visit it repeatedly, annotating nodes in place.
//!
//! Ownership follows the tree: every child is owned by exactly one parent.
//! Back-references from an expression to the map or variable it is assigned to
//! (`ExprMeta::map`, `ExprMeta::var`, `ExprMeta::key_for_map`) are
//! [`NodeId`]s and own nothing.
//!
//! Every node has a `leafcopy()` that keeps its variant, scalars and
//! back-references but drops its children. Expansion passes use it as a
//! stencil when rebuilding subtrees (see [`crate::passes::rebuild`]).

pub mod expression;
pub mod location;
pub mod operators;
pub mod printer;
pub mod probe;
pub mod serializer;
pub mod statement;
pub mod types;
pub mod visitor;

pub use expression::*;
pub use location::{Location, Position};
pub use operators::{BinaryOperator, JumpKind, UnaryOperator};
pub use printer::Printer;
pub use probe::{AttachPoint, AttachPointList, Predicate, Probe, ProbeList, Program, UsdtProbeEntry};
pub use serializer::{serialize_expression, serialize_probe, serialize_program, serialize_statement};
pub use statement::*;
pub use types::{PositionalParameterType, SizedType, Type};
pub use visitor::{Node, Visitor, VisitorMut};
