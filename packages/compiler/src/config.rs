//! Compiler Configuration
//!
//! Settings consumed by the tree-rewriting passes. Loaded from JSON, every
//! field optional.

use crate::error::Result;
use crate::logging::{ConsoleLogger, LogLevel, Logger};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_UNROLL: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Largest accepted `unroll` count.
    pub max_unroll: u64,
    /// Values for `$1`, `$2`, ... in order.
    pub positional_params: Vec<String>,
    pub log_level: LogLevel,
    /// Dump the tree after each pass.
    pub debug_ast: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            max_unroll: DEFAULT_MAX_UNROLL,
            positional_params: Vec::new(),
            log_level: LogLevel::default(),
            debug_ast: false,
        }
    }
}

impl CompilerConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let config: CompilerConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Value of positional parameter `$n` (1-based).
    pub fn positional_param(&self, n: i64) -> Option<&str> {
        let index = usize::try_from(n).ok()?.checked_sub(1)?;
        self.positional_params.get(index).map(String::as_str)
    }

    pub fn logger(&self) -> Box<dyn Logger> {
        Box::new(ConsoleLogger::new(self.log_level))
    }
}
