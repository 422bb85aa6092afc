//! Semantic Types
//!
//! The resolved type attached to every expression. The AST only stores it;
//! semantic analysis is the one pass that fills it in.

use serde::Serialize;
use std::fmt;

/// Kind of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Not yet resolved.
    #[default]
    None,
    Void,
    Integer,
    Pointer,
    Record,
    Array,
    String,
    Buffer,
    Tuple,
    Count,
    Sum,
    Min,
    Max,
    Avg,
    Stats,
    Hist,
    Lhist,
    Kstack,
    Ustack,
    Ksym,
    Usym,
    Username,
    Inet,
    StackMode,
    Probe,
    Timestamp,
}

impl Type {
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::None => "none",
            Type::Void => "void",
            Type::Integer => "integer",
            Type::Pointer => "pointer",
            Type::Record => "record",
            Type::Array => "array",
            Type::String => "string",
            Type::Buffer => "buffer",
            Type::Tuple => "tuple",
            Type::Count => "count",
            Type::Sum => "sum",
            Type::Min => "min",
            Type::Max => "max",
            Type::Avg => "avg",
            Type::Stats => "stats",
            Type::Hist => "hist",
            Type::Lhist => "lhist",
            Type::Kstack => "kstack",
            Type::Ustack => "ustack",
            Type::Ksym => "ksym",
            Type::Usym => "usym",
            Type::Username => "username",
            Type::Inet => "inet",
            Type::StackMode => "stack_mode",
            Type::Probe => "probe",
            Type::Timestamp => "timestamp",
        }
    }
}

/// A type together with its storage size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SizedType {
    pub ty: Type,
    pub size: usize,
    pub is_signed: bool,
    /// Struct name for records and pointee name for pointers.
    pub cast_type: Option<String>,
}

impl SizedType {
    pub fn new(ty: Type, size: usize) -> Self {
        SizedType {
            ty,
            size,
            is_signed: false,
            cast_type: None,
        }
    }

    pub fn integer(size: usize, is_signed: bool) -> Self {
        SizedType {
            ty: Type::Integer,
            size,
            is_signed,
            cast_type: None,
        }
    }

    pub fn string(size: usize) -> Self {
        SizedType::new(Type::String, size)
    }

    pub fn is_resolved(&self) -> bool {
        self.ty != Type::None
    }
}

impl fmt::Display for SizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.ty, &self.cast_type) {
            (Type::Integer, _) => {
                let sign = if self.is_signed { "" } else { "u" };
                write!(f, "{}int{}", sign, self.size * 8)
            }
            (Type::Record, Some(name)) => write!(f, "{}", name),
            (Type::Pointer, Some(name)) => write!(f, "{} *", name),
            (Type::String, _) => write!(f, "string[{}]", self.size),
            (ty, _) => write!(f, "{}", ty.as_str()),
        }
    }
}

/// The two spellings of a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PositionalParameterType {
    /// `$1`, `$2`, ...
    Positional,
    /// `$#`, the number of parameters supplied.
    Count,
}
