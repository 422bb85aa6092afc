//! Tree-Rewriting Passes
//!
//! Passes that duplicate or restructure the tree. Each one builds new
//! subtrees from leafcopy stencils instead of cloning.

pub mod expansion;
pub mod rebuild;
pub mod unroll;

pub use expansion::{expand_program, expand_programs, glob_to_regex, has_wildcard, StaticSymbols, SymbolResolver};
pub use rebuild::{rebuild_expression, rebuild_predicate, rebuild_probe, rebuild_statement, rebuild_statements};
pub use unroll::{resolve_unroll_counts, unroll_body};
