//! Unroll
//!
//! Resolves `unroll (N) { ... }` counts to constants and expands bodies into
//! independent copies.

use super::rebuild::rebuild_statements;
use crate::ast::visitor::{self, Node, VisitorMut};
use crate::ast::*;
use crate::config::CompilerConfig;
use crate::error::{CompileError, Result};
use crate::logging::Logger;

/// Writes the constant count of every unresolved `unroll` in `program` and
/// returns how many were resolved. Every statement is checked; the first
/// error in traversal order is returned.
pub fn resolve_unroll_counts(
    program: &mut Program,
    config: &CompilerConfig,
    logger: &dyn Logger,
) -> Result<usize> {
    let mut resolver = UnrollResolver {
        config,
        logger,
        resolved: 0,
        errors: Vec::new(),
    };
    program.accept_mut(&mut resolver);

    let UnrollResolver { resolved, errors, .. } = resolver;
    for err in &errors {
        logger.error(&err.to_string());
    }
    if let Some(err) = errors.into_iter().next() {
        return Err(err);
    }
    if config.debug_ast {
        logger.info(&Printer::new().print(program));
    }
    Ok(resolved)
}

/// `unroll.var` independent copies of the body, in order. Empty while the
/// count is unresolved.
pub fn unroll_body(unroll: &Unroll) -> StatementList {
    (0..unroll.var)
        .flat_map(|_| rebuild_statements(&unroll.stmts))
        .collect()
}

struct UnrollResolver<'a> {
    config: &'a CompilerConfig,
    logger: &'a dyn Logger,
    resolved: usize,
    errors: Vec<CompileError>,
}

impl UnrollResolver<'_> {
    fn count(&self, expr: &Expression) -> Result<u64> {
        let value = match expr {
            Expression::Integer(i) => i.n,
            Expression::PositionalParameter(p) => self.positional(p)?,
            other => {
                return Err(CompileError::NonConstantUnroll {
                    loc: other.meta().loc,
                })
            }
        };
        let max = self.config.max_unroll;
        match u64::try_from(value) {
            Ok(count) if (1..=max).contains(&count) => Ok(count),
            _ => Err(CompileError::UnrollOutOfRange {
                loc: expr.meta().loc,
                value,
                max,
            }),
        }
    }

    fn positional(&self, param: &PositionalParameter) -> Result<i64> {
        match param.ptype {
            PositionalParameterType::Count => Ok(self.config.positional_params.len() as i64),
            PositionalParameterType::Positional => {
                let raw = self.config.positional_param(param.n).ok_or_else(|| {
                    CompileError::MissingPositionalParameter {
                        loc: param.meta.loc,
                        index: param.n,
                    }
                })?;
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| CompileError::NonConstantUnroll { loc: param.meta.loc })
            }
        }
    }
}

impl VisitorMut for UnrollResolver<'_> {
    // Expressions cannot contain statements, so there is nothing to find
    // below them.
    fn visit_integer(&mut self, _node: &mut Integer) {}
    fn visit_positional_parameter(&mut self, _node: &mut PositionalParameter) {}
    fn visit_string(&mut self, _node: &mut StringLiteral) {}
    fn visit_stack_mode(&mut self, _node: &mut StackMode) {}
    fn visit_identifier(&mut self, _node: &mut Identifier) {}
    fn visit_builtin(&mut self, _node: &mut Builtin) {}
    fn visit_call(&mut self, _node: &mut Call) {}
    fn visit_map(&mut self, _node: &mut Map) {}
    fn visit_variable(&mut self, _node: &mut Variable) {}
    fn visit_binop(&mut self, _node: &mut Binop) {}
    fn visit_unop(&mut self, _node: &mut Unop) {}
    fn visit_field_access(&mut self, _node: &mut FieldAccess) {}
    fn visit_array_access(&mut self, _node: &mut ArrayAccess) {}
    fn visit_cast(&mut self, _node: &mut Cast) {}
    fn visit_tuple(&mut self, _node: &mut Tuple) {}
    fn visit_ternary(&mut self, _node: &mut Ternary) {}

    fn visit_expr_statement(&mut self, _node: &mut ExprStatement) {}
    fn visit_assign_map_statement(&mut self, _node: &mut AssignMapStatement) {}
    fn visit_assign_var_statement(&mut self, _node: &mut AssignVarStatement) {}

    fn visit_if(&mut self, node: &mut If) {
        visitor::walk_if_mut(self, node);
    }

    fn visit_unroll(&mut self, node: &mut Unroll) {
        if !node.is_resolved() {
            match node.expr.as_deref().map(|expr| self.count(expr)) {
                Some(Ok(count)) => {
                    self.logger
                        .debug(&format!("{}: unroll count resolved to {}", node.loc, count));
                    node.var = count;
                    self.resolved += 1;
                }
                Some(Err(err)) => self.errors.push(err),
                None => {}
            }
        }
        visitor::walk_unroll_mut(self, node);
    }

    fn visit_while(&mut self, node: &mut While) {
        visitor::walk_while_mut(self, node);
    }

    fn visit_jump(&mut self, _node: &mut Jump) {}
    fn visit_predicate(&mut self, _node: &mut Predicate) {}
    fn visit_attach_point(&mut self, _node: &mut AttachPoint) {}

    fn visit_probe(&mut self, node: &mut Probe) {
        visitor::walk_probe_mut(self, node);
    }

    fn visit_program(&mut self, node: &mut Program) {
        visitor::walk_program_mut(self, node);
    }
}
