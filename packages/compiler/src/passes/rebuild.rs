//! Rebuild
//!
//! Duplicates a subtree from leafcopy stencils. Every node of the copy has a
//! fresh identity; back-references (`map`, `var`, `key_for_map` and compound
//! assignment anchors) that pointed inside the source subtree are re-bound to
//! the matching node of the copy. References that leave the subtree are kept
//! as they are.

use crate::ast::visitor::{self, Node, VisitorMut};
use crate::ast::*;
use std::collections::HashMap;

pub fn rebuild_expression(expr: &Expression) -> Expression {
    let mut rebuilder = Rebuilder::default();
    let mut copy = rebuilder.expr(expr);
    copy.accept_mut(&mut Relinker::new(&rebuilder.remap));
    copy
}

pub fn rebuild_statement(stmt: &Statement) -> Statement {
    let mut rebuilder = Rebuilder::default();
    let mut copy = rebuilder.stmt(stmt);
    copy.accept_mut(&mut Relinker::new(&rebuilder.remap));
    copy
}

pub fn rebuild_statements(stmts: &[Statement]) -> StatementList {
    let mut rebuilder = Rebuilder::default();
    let mut copy = rebuilder.stmts(stmts);
    visitor::visit_statements_mut(&mut Relinker::new(&rebuilder.remap), &mut copy);
    copy
}

pub fn rebuild_predicate(pred: &Predicate) -> Predicate {
    let mut rebuilder = Rebuilder::default();
    let mut copy = rebuilder.predicate(pred);
    copy.accept_mut(&mut Relinker::new(&rebuilder.remap));
    copy
}

/// Rebuilds attach points, predicate and body. The probe's flags and index
/// come along with the leafcopy.
pub fn rebuild_probe(probe: &Probe) -> Probe {
    let mut rebuilder = Rebuilder::default();
    let mut copy = rebuilder.probe(probe);
    copy.accept_mut(&mut Relinker::new(&rebuilder.remap));
    copy
}

/// Builds the copy and records which new node replaced which old one.
#[derive(Default)]
struct Rebuilder {
    remap: HashMap<NodeId, NodeId>,
}

impl Rebuilder {
    fn expr(&mut self, expr: &Expression) -> Expression {
        let copy = match expr {
            Expression::Call(e) => {
                let mut c = e.leafcopy();
                c.vargs = e.vargs.as_deref().map(|args| self.list(args));
                Expression::Call(c)
            }
            Expression::Map(e) => return Expression::Map(self.map(e)),
            Expression::Variable(e) => return Expression::Variable(self.variable(e)),
            Expression::Binop(e) => {
                let mut c = e.leafcopy();
                c.left = self.opt(&e.left);
                c.right = self.opt(&e.right);
                Expression::Binop(c)
            }
            Expression::Unop(e) => {
                let mut c = e.leafcopy();
                c.expr = self.opt(&e.expr);
                Expression::Unop(c)
            }
            Expression::FieldAccess(e) => {
                let mut c = e.leafcopy();
                c.expr = self.opt(&e.expr);
                Expression::FieldAccess(c)
            }
            Expression::ArrayAccess(e) => {
                let mut c = e.leafcopy();
                c.expr = self.opt(&e.expr);
                c.indexpr = self.opt(&e.indexpr);
                Expression::ArrayAccess(c)
            }
            Expression::Cast(e) => {
                let mut c = e.leafcopy();
                c.expr = self.opt(&e.expr);
                Expression::Cast(c)
            }
            Expression::Tuple(e) => {
                let mut c = e.leafcopy();
                c.elems = self.list(&e.elems);
                Expression::Tuple(c)
            }
            Expression::Ternary(e) => {
                let mut c = e.leafcopy();
                c.cond = self.opt(&e.cond);
                c.left = self.opt(&e.left);
                c.right = self.opt(&e.right);
                Expression::Ternary(c)
            }
            Expression::Integer(_)
            | Expression::PositionalParameter(_)
            | Expression::String(_)
            | Expression::StackMode(_)
            | Expression::Identifier(_)
            | Expression::Builtin(_) => expr.leafcopy(),
        };
        self.remap.insert(expr.id(), copy.id());
        copy
    }

    fn opt(&mut self, expr: &Option<Box<Expression>>) -> Option<Box<Expression>> {
        expr.as_deref().map(|e| Box::new(self.expr(e)))
    }

    fn list(&mut self, exprs: &[Expression]) -> ExpressionList {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    fn map(&mut self, map: &Map) -> Map {
        let mut copy = map.leafcopy();
        copy.vargs = map.vargs.as_deref().map(|keys| self.list(keys));
        self.remap.insert(map.meta.id(), copy.meta.id());
        copy
    }

    fn variable(&mut self, var: &Variable) -> Variable {
        let copy = var.leafcopy();
        self.remap.insert(var.meta.id(), copy.meta.id());
        copy
    }

    fn stmt(&mut self, stmt: &Statement) -> Statement {
        match stmt {
            Statement::Expr(s) => {
                let mut c = s.leafcopy();
                c.expr = self.opt(&s.expr);
                Statement::Expr(c)
            }
            Statement::AssignMap(s) => {
                let mut c = s.leafcopy();
                if let Some(map) = s.target().owned() {
                    *c.target_mut() = Target::Owned(Some(Box::new(self.map(map))));
                }
                c.expr = self.opt(&s.expr);
                Statement::AssignMap(c)
            }
            Statement::AssignVar(s) => {
                let mut c = s.leafcopy();
                if let Some(var) = s.target().owned() {
                    *c.target_mut() = Target::Owned(Some(Box::new(self.variable(var))));
                }
                c.expr = self.opt(&s.expr);
                Statement::AssignVar(c)
            }
            Statement::If(s) => {
                let mut c = s.leafcopy();
                c.cond = self.opt(&s.cond);
                c.stmts = self.stmts(&s.stmts);
                c.else_stmts = s.else_stmts.as_deref().map(|stmts| self.stmts(stmts));
                Statement::If(c)
            }
            Statement::Unroll(s) => {
                let mut c = s.leafcopy();
                c.expr = self.opt(&s.expr);
                c.stmts = self.stmts(&s.stmts);
                Statement::Unroll(c)
            }
            Statement::While(s) => {
                let mut c = s.leafcopy();
                c.cond = self.opt(&s.cond);
                c.stmts = self.stmts(&s.stmts);
                Statement::While(c)
            }
            Statement::Jump(s) => Statement::Jump(s.leafcopy()),
        }
    }

    fn stmts(&mut self, stmts: &[Statement]) -> StatementList {
        stmts.iter().map(|s| self.stmt(s)).collect()
    }

    fn predicate(&mut self, pred: &Predicate) -> Predicate {
        let mut copy = pred.leafcopy();
        copy.expr = self.opt(&pred.expr);
        copy
    }

    fn probe(&mut self, probe: &Probe) -> Probe {
        let mut copy = probe.leafcopy();
        copy.attach_points = probe.attach_points.iter().map(AttachPoint::leafcopy).collect();
        copy.pred = probe.pred.as_ref().map(|pred| self.predicate(pred));
        copy.stmts = self.stmts(&probe.stmts);
        copy
    }
}

/// Rewrites back-references of a freshly built copy through the old -> new
/// identity table.
struct Relinker<'a> {
    remap: &'a HashMap<NodeId, NodeId>,
}

impl<'a> Relinker<'a> {
    fn new(remap: &'a HashMap<NodeId, NodeId>) -> Self {
        Relinker { remap }
    }

    fn id(&self, id: NodeId) -> NodeId {
        self.remap.get(&id).copied().unwrap_or(id)
    }

    fn relink(&self, meta: &mut ExprMeta) {
        for slot in [&mut meta.key_for_map, &mut meta.map, &mut meta.var] {
            if let Some(id) = slot {
                *id = self.id(*id);
            }
        }
    }
}

impl VisitorMut for Relinker<'_> {
    fn visit_integer(&mut self, node: &mut Integer) {
        self.relink(&mut node.meta);
    }

    fn visit_positional_parameter(&mut self, node: &mut PositionalParameter) {
        self.relink(&mut node.meta);
    }

    fn visit_string(&mut self, node: &mut StringLiteral) {
        self.relink(&mut node.meta);
    }

    fn visit_stack_mode(&mut self, node: &mut StackMode) {
        self.relink(&mut node.meta);
    }

    fn visit_identifier(&mut self, node: &mut Identifier) {
        self.relink(&mut node.meta);
    }

    fn visit_builtin(&mut self, node: &mut Builtin) {
        self.relink(&mut node.meta);
    }

    fn visit_call(&mut self, node: &mut Call) {
        self.relink(&mut node.meta);
        visitor::walk_call_mut(self, node);
    }

    fn visit_map(&mut self, node: &mut Map) {
        self.relink(&mut node.meta);
        visitor::walk_map_mut(self, node);
    }

    fn visit_variable(&mut self, node: &mut Variable) {
        self.relink(&mut node.meta);
    }

    fn visit_binop(&mut self, node: &mut Binop) {
        self.relink(&mut node.meta);
        visitor::walk_binop_mut(self, node);
    }

    fn visit_unop(&mut self, node: &mut Unop) {
        self.relink(&mut node.meta);
        visitor::walk_unop_mut(self, node);
    }

    fn visit_field_access(&mut self, node: &mut FieldAccess) {
        self.relink(&mut node.meta);
        visitor::walk_field_access_mut(self, node);
    }

    fn visit_array_access(&mut self, node: &mut ArrayAccess) {
        self.relink(&mut node.meta);
        visitor::walk_array_access_mut(self, node);
    }

    fn visit_cast(&mut self, node: &mut Cast) {
        self.relink(&mut node.meta);
        visitor::walk_cast_mut(self, node);
    }

    fn visit_tuple(&mut self, node: &mut Tuple) {
        self.relink(&mut node.meta);
        visitor::walk_tuple_mut(self, node);
    }

    fn visit_ternary(&mut self, node: &mut Ternary) {
        self.relink(&mut node.meta);
        visitor::walk_ternary_mut(self, node);
    }

    fn visit_expr_statement(&mut self, node: &mut ExprStatement) {
        visitor::walk_expr_statement_mut(self, node);
    }

    fn visit_assign_map_statement(&mut self, node: &mut AssignMapStatement) {
        if let Target::Anchored(id) = node.target_mut() {
            *id = self.id(*id);
        }
        visitor::walk_assign_map_statement_mut(self, node);
    }

    fn visit_assign_var_statement(&mut self, node: &mut AssignVarStatement) {
        if let Target::Anchored(id) = node.target_mut() {
            *id = self.id(*id);
        }
        visitor::walk_assign_var_statement_mut(self, node);
    }

    fn visit_if(&mut self, node: &mut If) {
        visitor::walk_if_mut(self, node);
    }

    fn visit_unroll(&mut self, node: &mut Unroll) {
        visitor::walk_unroll_mut(self, node);
    }

    fn visit_while(&mut self, node: &mut While) {
        visitor::walk_while_mut(self, node);
    }

    fn visit_jump(&mut self, _node: &mut Jump) {}

    fn visit_predicate(&mut self, node: &mut Predicate) {
        visitor::walk_predicate_mut(self, node);
    }

    fn visit_attach_point(&mut self, _node: &mut AttachPoint) {}

    fn visit_probe(&mut self, node: &mut Probe) {
        visitor::walk_probe_mut(self, node);
    }

    fn visit_program(&mut self, node: &mut Program) {
        visitor::walk_program_mut(self, node);
    }
}
