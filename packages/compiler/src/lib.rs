#![deny(clippy::all)]
//! Probe Compiler
//!
//! Syntax tree and tree-rewriting passes for a probe-based tracing language.

pub mod ast;
pub mod config;
pub mod error;
pub mod logging;
pub mod passes;

// Re-exports
pub use config::CompilerConfig;
pub use error::{CompileError, Result};
pub use logging::{ConsoleLogger, LogLevel, Logger, MemoryLogger, NullLogger};
