//! Attach Points, Probes and Programs
//!
//! The structural top of the tree: what attaches where, under which predicate,
//! with which body.

use super::expression::Expression;
use super::location::Location;
use super::statement::StatementList;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// Resolved USDT probe metadata for an attach point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsdtProbeEntry {
    pub path: String,
    pub provider: String,
    pub name: String,
    pub semaphore_offset: u64,
    pub locations: Vec<u64>,
}

/// One attach specification, e.g. `kprobe:vfs_read` or `uprobe:/bin/sh:main+8`.
#[derive(Debug)]
pub struct AttachPoint {
    pub loc: Location,
    /// Unparsed user input, e.g. `kprobe:vfs_*`.
    pub raw_input: String,
    pub provider: String,
    pub target: String,
    pub ns: String,
    pub func: String,
    pub usdt: UsdtProbeEntry,
    pub freq: u64,
    /// Watchpoint width in bytes.
    pub len: u64,
    /// Watchpoint mode, e.g. `rw`.
    pub mode: String,
    /// Set for wildcard specifications that must be resolved against the
    /// available symbols before code generation.
    pub need_expansion: bool,
    pub address: u64,
    pub func_offset: u64,
    index: IndexMap<String, usize>,
}

impl AttachPoint {
    pub fn new(raw_input: impl Into<String>, loc: Location) -> Self {
        AttachPoint {
            loc,
            raw_input: raw_input.into(),
            provider: String::new(),
            target: String::new(),
            ns: String::new(),
            func: String::new(),
            usdt: UsdtProbeEntry::default(),
            freq: 0,
            len: 0,
            mode: String::new(),
            need_expansion: false,
            address: 0,
            func_offset: 0,
            index: IndexMap::new(),
        }
    }

    /// Attach points own no children, so this copies every field.
    pub fn leafcopy(&self) -> Self {
        AttachPoint {
            loc: self.loc,
            raw_input: self.raw_input.clone(),
            provider: self.provider.clone(),
            target: self.target.clone(),
            ns: self.ns.clone(),
            func: self.func.clone(),
            usdt: self.usdt.clone(),
            freq: self.freq,
            len: self.len,
            mode: self.mode.clone(),
            need_expansion: self.need_expansion,
            address: self.address,
            func_offset: self.func_offset,
            index: self.index.clone(),
        }
    }

    /// Canonical name with this attach point's own target and `attach_point`
    /// in the function position.
    pub fn name(&self, attach_point: &str) -> String {
        self.name_with_target(&self.target, attach_point)
    }

    pub fn name_with_target(&self, attach_target: &str, attach_point: &str) -> String {
        let mut n = self.provider.clone();
        if !attach_target.is_empty() {
            n.push(':');
            n.push_str(attach_target);
        }
        if !self.ns.is_empty() {
            n.push(':');
            n.push_str(&self.ns);
        }
        if !attach_point.is_empty() {
            n.push(':');
            n.push_str(attach_point);
            if self.func_offset != 0 {
                n.push_str(&format!("+{}", self.func_offset));
            }
        }
        if self.address != 0 {
            n.push_str(&format!(":{}", self.address));
        }
        if self.freq != 0 {
            n.push_str(&format!(":{}", self.freq));
        }
        if self.len != 0 {
            n.push_str(&format!(":{}", self.len));
        }
        if !self.mode.is_empty() {
            n.push(':');
            n.push_str(&self.mode);
        }
        n
    }

    /// Index recorded for `name`, or 0 when none was recorded.
    pub fn index(&self, name: &str) -> usize {
        self.index.get(name).copied().unwrap_or(0)
    }

    pub fn set_index(&mut self, name: impl Into<String>, index: usize) {
        self.index.insert(name.into(), index);
    }

    /// Index of `name`, assigning the next dense index on first sight.
    pub fn assign_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.index.get(name) {
            return *index;
        }
        let next = self.index.len();
        self.index.insert(name.to_string(), next);
        next
    }

    /// Recorded names in first-seen order.
    pub fn indexed_names(&self) -> impl Iterator<Item = (&str, usize)> {
        self.index.iter().map(|(name, index)| (name.as_str(), *index))
    }
}

pub type AttachPointList = SmallVec<[AttachPoint; 1]>;

/// Guard expression of a probe, `/expr/`.
#[derive(Debug)]
pub struct Predicate {
    pub loc: Location,
    pub expr: Option<Box<Expression>>,
}

impl Predicate {
    pub fn new(expr: Expression, loc: Location) -> Self {
        Predicate {
            loc,
            expr: Some(Box::new(expr)),
        }
    }

    pub fn leafcopy(&self) -> Self {
        Predicate {
            loc: self.loc,
            expr: None,
        }
    }
}

#[derive(Debug)]
pub struct Probe {
    pub loc: Location,
    pub attach_points: AttachPointList,
    pub pred: Option<Predicate>,
    pub stmts: StatementList,
    /// A separate program must be generated per wildcard match.
    pub need_expansion: bool,
    /// Tracepoint argument structs must be imported.
    pub need_tp_args_structs: bool,
    index: usize,
}

impl Probe {
    pub fn new(
        attach_points: AttachPointList,
        pred: Option<Predicate>,
        stmts: StatementList,
        loc: Location,
    ) -> Self {
        Probe {
            loc,
            attach_points,
            pred,
            stmts,
            need_expansion: false,
            need_tp_args_structs: false,
            index: 0,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Probe {
            loc: self.loc,
            attach_points: SmallVec::new(),
            pred: None,
            stmts: Vec::new(),
            need_expansion: self.need_expansion,
            need_tp_args_structs: self.need_tp_args_structs,
            index: self.index,
        }
    }

    /// Attach point names joined by `,`.
    pub fn name(&self) -> String {
        self.attach_points
            .iter()
            .map(|ap| ap.name(&ap.func))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn has_wildcard_attach_point(&self) -> bool {
        self.attach_points.iter().any(|ap| ap.need_expansion)
    }
}

pub type ProbeList = Vec<Probe>;

/// Root of a compilation unit.
#[derive(Debug)]
pub struct Program {
    pub loc: Location,
    /// User type and constant definitions, passed through verbatim.
    pub c_definitions: String,
    pub probes: ProbeList,
}

impl Program {
    pub fn new(c_definitions: impl Into<String>, probes: ProbeList, loc: Location) -> Self {
        Program {
            loc,
            c_definitions: c_definitions.into(),
            probes,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Program {
            loc: self.loc,
            c_definitions: self.c_definitions.clone(),
            probes: Vec::new(),
        }
    }
}
