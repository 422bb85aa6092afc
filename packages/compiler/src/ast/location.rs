//! Source Locations
//!
//! Every node records where in the script text it came from. Locations are
//! only used for diagnostics and never drive structural decisions.

use serde::Serialize;
use std::fmt;

/// A single point in the script text. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[begin, end)` in the script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Location {
    pub begin: Position,
    pub end: Position,
}

impl Location {
    pub fn new(begin: Position, end: Position) -> Self {
        Location { begin, end }
    }

    /// Location spanning `len` columns on a single line.
    pub fn on_line(line: u32, column: u32, len: u32) -> Self {
        Location {
            begin: Position::new(line, column),
            end: Position::new(line, column + len),
        }
    }

    /// Smallest location covering both `self` and `other`.
    pub fn join(&self, other: &Location) -> Location {
        Location {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin.line == self.end.line {
            write!(f, "{}-{}", self.begin, self.end.column)
        } else {
            write!(f, "{}-{}", self.begin, self.end)
        }
    }
}
