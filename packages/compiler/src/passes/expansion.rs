//! Wildcard Expansion
//!
//! Replaces every probe whose attach points carry a glob (`kprobe:vfs_*`) with
//! one probe per concrete match. Symbol lookup is delegated to a
//! [`SymbolResolver`], so the pass never touches the running system itself.

use super::rebuild::{rebuild_predicate, rebuild_statements};
use crate::ast::{AttachPoint, Probe, ProbeList, Program};
use crate::error::{CompileError, Result};
use crate::logging::Logger;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use smallvec::smallvec;

static WILDCARD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*?]").unwrap());

/// Whether `s` contains glob characters.
pub fn has_wildcard(s: &str) -> bool {
    WILDCARD_REGEX.is_match(s)
}

/// Anchored regex for a glob: `*` matches any run, `?` any single character.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    Ok(Regex::new(&source)?)
}

/// Source of concrete symbols for wildcard attach points.
pub trait SymbolResolver {
    /// Concrete function names matching `ap.func`, in a stable order.
    fn resolve(&self, ap: &AttachPoint) -> Result<Vec<String>>;
}

/// Resolves against a fixed symbol list.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbols {
    symbols: Vec<String>,
}

impl StaticSymbols {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticSymbols {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl SymbolResolver for StaticSymbols {
    fn resolve(&self, ap: &AttachPoint) -> Result<Vec<String>> {
        let re = glob_to_regex(&ap.func)?;
        let found: IndexSet<&str> = self
            .symbols
            .iter()
            .map(String::as_str)
            .filter(|s| re.is_match(s))
            .collect();
        Ok(found.into_iter().map(str::to_string).collect())
    }
}

/// Expands every wildcard probe of `program` in place and returns the number
/// of probes generated. Every wildcard is resolved before any probe or index
/// table is touched, so on error the program is left as it was.
pub fn expand_program<R>(program: &mut Program, resolver: &R, logger: &dyn Logger) -> Result<usize>
where
    R: SymbolResolver + ?Sized,
{
    let mut resolutions: Vec<(usize, Vec<Option<Vec<String>>>)> = Vec::new();
    for (pos, probe) in program.probes.iter().enumerate() {
        if probe.has_wildcard_attach_point() {
            resolutions.push((pos, resolve_probe(probe, resolver, logger)?));
        }
    }

    let mut replacements: Vec<(usize, ProbeList)> = Vec::with_capacity(resolutions.len());
    for (pos, resolved) in resolutions {
        replacements.push((pos, expand_probe(&mut program.probes[pos], resolved)));
    }

    let generated = replacements.iter().map(|(_, probes)| probes.len()).sum();
    for (pos, probes) in replacements.into_iter().rev() {
        program.probes.splice(pos..pos + 1, probes);
    }
    Ok(generated)
}

/// Expands independent programs in parallel.
pub fn expand_programs<R>(programs: &mut [Program], resolver: &R, logger: &dyn Logger) -> Result<usize>
where
    R: SymbolResolver + Sync + ?Sized,
{
    let counts: Vec<Result<usize>> = programs
        .par_iter_mut()
        .map(|program| expand_program(program, resolver, logger))
        .collect();
    counts.into_iter().sum()
}

/// Matches for each attach point of `probe`, `None` for those without a glob.
fn resolve_probe<R>(probe: &Probe, resolver: &R, logger: &dyn Logger) -> Result<Vec<Option<Vec<String>>>>
where
    R: SymbolResolver + ?Sized,
{
    let mut resolved = Vec::with_capacity(probe.attach_points.len());
    for ap in probe.attach_points.iter() {
        if !ap.need_expansion {
            resolved.push(None);
            continue;
        }
        let matches = resolver.resolve(ap)?;
        if matches.is_empty() {
            return Err(CompileError::NoWildcardMatches {
                probe: probe.name(),
                pattern: ap.name(&ap.func),
            });
        }
        logger.debug(&format!(
            "expanding '{}' into {} probes",
            ap.name(&ap.func),
            matches.len()
        ));
        resolved.push(Some(matches));
    }
    Ok(resolved)
}

/// One probe per (attach point, match) pair. Attach points without a glob
/// yield a single probe for themselves. Each generated probe is indexed by its
/// position among the siblings; each attach point's table records its matches.
fn expand_probe(probe: &mut Probe, resolved: Vec<Option<Vec<String>>>) -> ProbeList {
    // (attach point position, concrete func)
    let mut plan: Vec<(usize, String)> = Vec::new();
    for (pos, (ap, matches)) in probe.attach_points.iter_mut().zip(resolved).enumerate() {
        match matches {
            Some(matches) => {
                for symbol in matches {
                    ap.assign_index(&symbol);
                    plan.push((pos, symbol));
                }
            }
            None => plan.push((pos, ap.func.clone())),
        }
    }

    let probe = &*probe;
    plan.into_iter()
        .enumerate()
        .map(|(index, (pos, func))| {
            let mut ap = probe.attach_points[pos].leafcopy();
            ap.func = func;
            ap.need_expansion = false;

            let mut expanded = probe.leafcopy();
            expanded.need_expansion = false;
            expanded.attach_points = smallvec![ap];
            expanded.pred = probe.pred.as_ref().map(rebuild_predicate);
            expanded.stmts = rebuild_statements(&probe.stmts);
            expanded.set_index(index);
            expanded
        })
        .collect()
}
