//! Operators
//!
//! Operator and jump-kind codes with their canonical token spellings. The
//! same tables are used to print diagnostics, to re-serialize a tree, and to
//! map parser tokens back to codes.

use crate::error::CompileError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    LogicalAnd,
    LogicalOr,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

/// Unary operators. `Increment` and `Decrement` come in prefix and postfix
/// forms; the form is recorded on the `Unop` node, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    LogicalNot,
    BitNot,
    Minus,
    Deref,
    Increment,
    Decrement,
}

/// Control-transfer kind of a `Jump` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JumpKind {
    Return,
    Break,
    Continue,
}

static BINARY_OPERATORS: Lazy<IndexMap<&'static str, BinaryOperator>> = Lazy::new(|| {
    BinaryOperator::ALL
        .iter()
        .map(|op| (op.as_str(), *op))
        .collect()
});

static UNARY_OPERATORS: Lazy<IndexMap<&'static str, UnaryOperator>> = Lazy::new(|| {
    UnaryOperator::ALL
        .iter()
        .map(|op| (op.as_str(), *op))
        .collect()
});

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 18] = [
        BinaryOperator::Eq,
        BinaryOperator::Ne,
        BinaryOperator::Le,
        BinaryOperator::Ge,
        BinaryOperator::Lt,
        BinaryOperator::Gt,
        BinaryOperator::LogicalAnd,
        BinaryOperator::LogicalOr,
        BinaryOperator::Plus,
        BinaryOperator::Minus,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Mod,
        BinaryOperator::BitAnd,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::LeftShift,
        BinaryOperator::RightShift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Le
                | BinaryOperator::Ge
                | BinaryOperator::Lt
                | BinaryOperator::Gt
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr)
    }

    /// Operators that have a compound-assignment form (`+=`, `<<=`, ...).
    pub fn has_compound_form(&self) -> bool {
        !self.is_comparison() && !self.is_logical()
    }
}

impl UnaryOperator {
    pub const ALL: [UnaryOperator; 6] = [
        UnaryOperator::LogicalNot,
        UnaryOperator::BitNot,
        UnaryOperator::Minus,
        UnaryOperator::Deref,
        UnaryOperator::Increment,
        UnaryOperator::Decrement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::LogicalNot => "!",
            UnaryOperator::BitNot => "~",
            UnaryOperator::Minus => "-",
            UnaryOperator::Deref => "*",
            UnaryOperator::Increment => "++",
            UnaryOperator::Decrement => "--",
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, UnaryOperator::Increment | UnaryOperator::Decrement)
    }
}

impl JumpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JumpKind::Return => "return",
            JumpKind::Break => "break",
            JumpKind::Continue => "continue",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for JumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinaryOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BINARY_OPERATORS
            .get(s)
            .copied()
            .ok_or_else(|| CompileError::UnknownOperator(s.to_string()))
    }
}

impl FromStr for UnaryOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UNARY_OPERATORS
            .get(s)
            .copied()
            .ok_or_else(|| CompileError::UnknownOperator(s.to_string()))
    }
}

impl FromStr for JumpKind {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "return" => Ok(JumpKind::Return),
            "break" => Ok(JumpKind::Break),
            "continue" => Ok(JumpKind::Continue),
            other => Err(CompileError::UnknownOperator(other.to_string())),
        }
    }
}
