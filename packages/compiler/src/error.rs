//! Compiler Errors
//!
//! AST constructors never fail. Errors come from the passes that rewrite the
//! tree and from loading configuration.

use crate::ast::Location;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{loc}: unroll count must be a constant integer")]
    NonConstantUnroll { loc: Location },

    #[error("{loc}: unroll count {value} is outside the allowed range 1..={max}")]
    UnrollOutOfRange { loc: Location, value: i64, max: u64 },

    #[error("{loc}: positional parameter ${index} was not supplied")]
    MissingPositionalParameter { loc: Location, index: i64 },

    #[error("probe '{probe}': attach point '{pattern}' matched no symbols")]
    NoWildcardMatches { probe: String, pattern: String },

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("invalid wildcard pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid compiler configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;
