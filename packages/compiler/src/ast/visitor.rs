//! Visitor Protocol
//!
//! Every node implements [`Node::accept`], which calls the visitor handler for
//! its concrete variant. Handlers are all required, so a pass that forgets a
//! variant does not compile. Handlers decide whether to descend by calling the
//! matching `walk_*` function, which visits the owned children in the order
//! fixed per variant. Absent children (in a leafcopy) are skipped.

use super::expression::*;
use super::location::Location;
use super::probe::{AttachPoint, Predicate, Probe, Program};
use super::statement::*;

/// Base trait for all AST nodes
pub trait Node {
    fn loc(&self) -> &Location;
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V);
    fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V);
}

/// Read-only visitor over the whole tree.
pub trait Visitor {
    fn visit_integer(&mut self, node: &Integer);
    fn visit_positional_parameter(&mut self, node: &PositionalParameter);
    fn visit_string(&mut self, node: &StringLiteral);
    fn visit_stack_mode(&mut self, node: &StackMode);
    fn visit_identifier(&mut self, node: &Identifier);
    fn visit_builtin(&mut self, node: &Builtin);
    fn visit_call(&mut self, node: &Call);
    fn visit_map(&mut self, node: &Map);
    fn visit_variable(&mut self, node: &Variable);
    fn visit_binop(&mut self, node: &Binop);
    fn visit_unop(&mut self, node: &Unop);
    fn visit_field_access(&mut self, node: &FieldAccess);
    fn visit_array_access(&mut self, node: &ArrayAccess);
    fn visit_cast(&mut self, node: &Cast);
    fn visit_tuple(&mut self, node: &Tuple);
    fn visit_ternary(&mut self, node: &Ternary);
    fn visit_expr_statement(&mut self, node: &ExprStatement);
    fn visit_assign_map_statement(&mut self, node: &AssignMapStatement);
    fn visit_assign_var_statement(&mut self, node: &AssignVarStatement);
    fn visit_if(&mut self, node: &If);
    fn visit_unroll(&mut self, node: &Unroll);
    fn visit_while(&mut self, node: &While);
    fn visit_jump(&mut self, node: &Jump);
    fn visit_predicate(&mut self, node: &Predicate);
    fn visit_attach_point(&mut self, node: &AttachPoint);
    fn visit_probe(&mut self, node: &Probe);
    fn visit_program(&mut self, node: &Program);
}

/// Visitor that may update node-local metadata (types, flags, resolved
/// references). It must not replace owned children of the node it is
/// visiting; structural rewrites go through leafcopy and rebuild.
pub trait VisitorMut {
    fn visit_integer(&mut self, node: &mut Integer);
    fn visit_positional_parameter(&mut self, node: &mut PositionalParameter);
    fn visit_string(&mut self, node: &mut StringLiteral);
    fn visit_stack_mode(&mut self, node: &mut StackMode);
    fn visit_identifier(&mut self, node: &mut Identifier);
    fn visit_builtin(&mut self, node: &mut Builtin);
    fn visit_call(&mut self, node: &mut Call);
    fn visit_map(&mut self, node: &mut Map);
    fn visit_variable(&mut self, node: &mut Variable);
    fn visit_binop(&mut self, node: &mut Binop);
    fn visit_unop(&mut self, node: &mut Unop);
    fn visit_field_access(&mut self, node: &mut FieldAccess);
    fn visit_array_access(&mut self, node: &mut ArrayAccess);
    fn visit_cast(&mut self, node: &mut Cast);
    fn visit_tuple(&mut self, node: &mut Tuple);
    fn visit_ternary(&mut self, node: &mut Ternary);
    fn visit_expr_statement(&mut self, node: &mut ExprStatement);
    fn visit_assign_map_statement(&mut self, node: &mut AssignMapStatement);
    fn visit_assign_var_statement(&mut self, node: &mut AssignVarStatement);
    fn visit_if(&mut self, node: &mut If);
    fn visit_unroll(&mut self, node: &mut Unroll);
    fn visit_while(&mut self, node: &mut While);
    fn visit_jump(&mut self, node: &mut Jump);
    fn visit_predicate(&mut self, node: &mut Predicate);
    fn visit_attach_point(&mut self, node: &mut AttachPoint);
    fn visit_probe(&mut self, node: &mut Probe);
    fn visit_program(&mut self, node: &mut Program);
}

macro_rules! impl_expr_node {
    ($($ty:ty => $handler:ident),* $(,)?) => {
        $(
            impl Node for $ty {
                fn loc(&self) -> &Location {
                    &self.meta.loc
                }

                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
                    visitor.$handler(self)
                }

                fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
                    visitor.$handler(self)
                }
            }
        )*
    };
}

macro_rules! impl_node {
    ($($ty:ty => $handler:ident),* $(,)?) => {
        $(
            impl Node for $ty {
                fn loc(&self) -> &Location {
                    &self.loc
                }

                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
                    visitor.$handler(self)
                }

                fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
                    visitor.$handler(self)
                }
            }
        )*
    };
}

impl_expr_node! {
    Integer => visit_integer,
    PositionalParameter => visit_positional_parameter,
    StringLiteral => visit_string,
    StackMode => visit_stack_mode,
    Identifier => visit_identifier,
    Builtin => visit_builtin,
    Call => visit_call,
    Map => visit_map,
    Variable => visit_variable,
    Binop => visit_binop,
    Unop => visit_unop,
    FieldAccess => visit_field_access,
    ArrayAccess => visit_array_access,
    Cast => visit_cast,
    Tuple => visit_tuple,
    Ternary => visit_ternary,
}

impl_node! {
    ExprStatement => visit_expr_statement,
    AssignMapStatement => visit_assign_map_statement,
    AssignVarStatement => visit_assign_var_statement,
    If => visit_if,
    Unroll => visit_unroll,
    While => visit_while,
    Jump => visit_jump,
    Predicate => visit_predicate,
    AttachPoint => visit_attach_point,
    Probe => visit_probe,
    Program => visit_program,
}

impl Node for Expression {
    fn loc(&self) -> &Location {
        &self.meta().loc
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Expression::Integer(e) => e.accept(visitor),
            Expression::PositionalParameter(e) => e.accept(visitor),
            Expression::String(e) => e.accept(visitor),
            Expression::StackMode(e) => e.accept(visitor),
            Expression::Identifier(e) => e.accept(visitor),
            Expression::Builtin(e) => e.accept(visitor),
            Expression::Call(e) => e.accept(visitor),
            Expression::Map(e) => e.accept(visitor),
            Expression::Variable(e) => e.accept(visitor),
            Expression::Binop(e) => e.accept(visitor),
            Expression::Unop(e) => e.accept(visitor),
            Expression::FieldAccess(e) => e.accept(visitor),
            Expression::ArrayAccess(e) => e.accept(visitor),
            Expression::Cast(e) => e.accept(visitor),
            Expression::Tuple(e) => e.accept(visitor),
            Expression::Ternary(e) => e.accept(visitor),
        }
    }

    fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Expression::Integer(e) => e.accept_mut(visitor),
            Expression::PositionalParameter(e) => e.accept_mut(visitor),
            Expression::String(e) => e.accept_mut(visitor),
            Expression::StackMode(e) => e.accept_mut(visitor),
            Expression::Identifier(e) => e.accept_mut(visitor),
            Expression::Builtin(e) => e.accept_mut(visitor),
            Expression::Call(e) => e.accept_mut(visitor),
            Expression::Map(e) => e.accept_mut(visitor),
            Expression::Variable(e) => e.accept_mut(visitor),
            Expression::Binop(e) => e.accept_mut(visitor),
            Expression::Unop(e) => e.accept_mut(visitor),
            Expression::FieldAccess(e) => e.accept_mut(visitor),
            Expression::ArrayAccess(e) => e.accept_mut(visitor),
            Expression::Cast(e) => e.accept_mut(visitor),
            Expression::Tuple(e) => e.accept_mut(visitor),
            Expression::Ternary(e) => e.accept_mut(visitor),
        }
    }
}

impl Node for Statement {
    fn loc(&self) -> &Location {
        Statement::loc(self)
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Statement::Expr(s) => s.accept(visitor),
            Statement::AssignMap(s) => s.accept(visitor),
            Statement::AssignVar(s) => s.accept(visitor),
            Statement::If(s) => s.accept(visitor),
            Statement::Unroll(s) => s.accept(visitor),
            Statement::While(s) => s.accept(visitor),
            Statement::Jump(s) => s.accept(visitor),
        }
    }

    fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Statement::Expr(s) => s.accept_mut(visitor),
            Statement::AssignMap(s) => s.accept_mut(visitor),
            Statement::AssignVar(s) => s.accept_mut(visitor),
            Statement::If(s) => s.accept_mut(visitor),
            Statement::Unroll(s) => s.accept_mut(visitor),
            Statement::While(s) => s.accept_mut(visitor),
            Statement::Jump(s) => s.accept_mut(visitor),
        }
    }
}

fn visit_opt<V: Visitor + ?Sized>(visitor: &mut V, expr: &Option<Box<Expression>>) {
    if let Some(expr) = expr {
        expr.accept(visitor);
    }
}

/// Visit every expression in order.
pub fn visit_expressions<V: Visitor + ?Sized>(visitor: &mut V, exprs: &[Expression]) {
    for expr in exprs {
        expr.accept(visitor);
    }
}

/// Visit every statement in order.
pub fn visit_statements<V: Visitor + ?Sized>(visitor: &mut V, stmts: &[Statement]) {
    for stmt in stmts {
        stmt.accept(visitor);
    }
}

pub fn walk_call<V: Visitor + ?Sized>(visitor: &mut V, node: &Call) {
    visit_expressions(visitor, node.args());
}

pub fn walk_map<V: Visitor + ?Sized>(visitor: &mut V, node: &Map) {
    visit_expressions(visitor, node.keys());
}

pub fn walk_binop<V: Visitor + ?Sized>(visitor: &mut V, node: &Binop) {
    visit_opt(visitor, &node.left);
    visit_opt(visitor, &node.right);
}

pub fn walk_unop<V: Visitor + ?Sized>(visitor: &mut V, node: &Unop) {
    visit_opt(visitor, &node.expr);
}

pub fn walk_field_access<V: Visitor + ?Sized>(visitor: &mut V, node: &FieldAccess) {
    visit_opt(visitor, &node.expr);
}

pub fn walk_array_access<V: Visitor + ?Sized>(visitor: &mut V, node: &ArrayAccess) {
    visit_opt(visitor, &node.expr);
    visit_opt(visitor, &node.indexpr);
}

pub fn walk_cast<V: Visitor + ?Sized>(visitor: &mut V, node: &Cast) {
    visit_opt(visitor, &node.expr);
}

pub fn walk_tuple<V: Visitor + ?Sized>(visitor: &mut V, node: &Tuple) {
    visit_expressions(visitor, &node.elems);
}

pub fn walk_ternary<V: Visitor + ?Sized>(visitor: &mut V, node: &Ternary) {
    visit_opt(visitor, &node.cond);
    visit_opt(visitor, &node.left);
    visit_opt(visitor, &node.right);
}

pub fn walk_expr_statement<V: Visitor + ?Sized>(visitor: &mut V, node: &ExprStatement) {
    visit_opt(visitor, &node.expr);
}

/// Visits the target only when the statement owns it; a compound target is
/// reached through the expression.
pub fn walk_assign_map_statement<V: Visitor + ?Sized>(visitor: &mut V, node: &AssignMapStatement) {
    if let Some(map) = node.target().owned() {
        map.accept(visitor);
    }
    visit_opt(visitor, &node.expr);
}

pub fn walk_assign_var_statement<V: Visitor + ?Sized>(visitor: &mut V, node: &AssignVarStatement) {
    if let Some(var) = node.target().owned() {
        var.accept(visitor);
    }
    visit_opt(visitor, &node.expr);
}

pub fn walk_if<V: Visitor + ?Sized>(visitor: &mut V, node: &If) {
    visit_opt(visitor, &node.cond);
    visit_statements(visitor, &node.stmts);
    if let Some(else_stmts) = &node.else_stmts {
        visit_statements(visitor, else_stmts);
    }
}

pub fn walk_unroll<V: Visitor + ?Sized>(visitor: &mut V, node: &Unroll) {
    visit_opt(visitor, &node.expr);
    visit_statements(visitor, &node.stmts);
}

pub fn walk_while<V: Visitor + ?Sized>(visitor: &mut V, node: &While) {
    visit_opt(visitor, &node.cond);
    visit_statements(visitor, &node.stmts);
}

pub fn walk_predicate<V: Visitor + ?Sized>(visitor: &mut V, node: &Predicate) {
    visit_opt(visitor, &node.expr);
}

pub fn walk_probe<V: Visitor + ?Sized>(visitor: &mut V, node: &Probe) {
    for ap in &node.attach_points {
        ap.accept(visitor);
    }
    if let Some(pred) = &node.pred {
        pred.accept(visitor);
    }
    visit_statements(visitor, &node.stmts);
}

pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, node: &Program) {
    for probe in &node.probes {
        probe.accept(visitor);
    }
}

fn visit_opt_mut<V: VisitorMut + ?Sized>(visitor: &mut V, expr: &mut Option<Box<Expression>>) {
    if let Some(expr) = expr {
        expr.accept_mut(visitor);
    }
}

pub fn visit_expressions_mut<V: VisitorMut + ?Sized>(visitor: &mut V, exprs: &mut [Expression]) {
    for expr in exprs {
        expr.accept_mut(visitor);
    }
}

pub fn visit_statements_mut<V: VisitorMut + ?Sized>(visitor: &mut V, stmts: &mut [Statement]) {
    for stmt in stmts {
        stmt.accept_mut(visitor);
    }
}

pub fn walk_call_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Call) {
    if let Some(args) = &mut node.vargs {
        visit_expressions_mut(visitor, args);
    }
}

pub fn walk_map_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Map) {
    if let Some(keys) = &mut node.vargs {
        visit_expressions_mut(visitor, keys);
    }
}

pub fn walk_binop_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Binop) {
    visit_opt_mut(visitor, &mut node.left);
    visit_opt_mut(visitor, &mut node.right);
}

pub fn walk_unop_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Unop) {
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_field_access_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut FieldAccess) {
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_array_access_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut ArrayAccess) {
    visit_opt_mut(visitor, &mut node.expr);
    visit_opt_mut(visitor, &mut node.indexpr);
}

pub fn walk_cast_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Cast) {
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_tuple_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Tuple) {
    visit_expressions_mut(visitor, &mut node.elems);
}

pub fn walk_ternary_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Ternary) {
    visit_opt_mut(visitor, &mut node.cond);
    visit_opt_mut(visitor, &mut node.left);
    visit_opt_mut(visitor, &mut node.right);
}

pub fn walk_expr_statement_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut ExprStatement) {
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_assign_map_statement_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut AssignMapStatement,
) {
    if let Some(map) = node.target_mut().owned_mut() {
        map.accept_mut(visitor);
    }
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_assign_var_statement_mut<V: VisitorMut + ?Sized>(
    visitor: &mut V,
    node: &mut AssignVarStatement,
) {
    if let Some(var) = node.target_mut().owned_mut() {
        var.accept_mut(visitor);
    }
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_if_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut If) {
    visit_opt_mut(visitor, &mut node.cond);
    visit_statements_mut(visitor, &mut node.stmts);
    if let Some(else_stmts) = &mut node.else_stmts {
        visit_statements_mut(visitor, else_stmts);
    }
}

pub fn walk_unroll_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Unroll) {
    visit_opt_mut(visitor, &mut node.expr);
    visit_statements_mut(visitor, &mut node.stmts);
}

pub fn walk_while_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut While) {
    visit_opt_mut(visitor, &mut node.cond);
    visit_statements_mut(visitor, &mut node.stmts);
}

pub fn walk_predicate_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Predicate) {
    visit_opt_mut(visitor, &mut node.expr);
}

pub fn walk_probe_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Probe) {
    for ap in node.attach_points.iter_mut() {
        ap.accept_mut(visitor);
    }
    if let Some(pred) = &mut node.pred {
        pred.accept_mut(visitor);
    }
    visit_statements_mut(visitor, &mut node.stmts);
}

pub fn walk_program_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Program) {
    for probe in node.probes.iter_mut() {
        probe.accept_mut(visitor);
    }
}
