//! Source Serializer
//!
//! Serializes a tree back to probe-language source text. Operator tokens come
//! from the operator tables, so parsing the output yields the same codes.
//! Absent children (leafcopies) serialize as nothing.

use super::expression::*;
use super::probe::{AttachPoint, Predicate, Probe, Program};
use super::statement::*;
use super::types::PositionalParameterType;
use super::visitor::{Node, Visitor};

/// Serialize an expression to source text.
pub fn serialize_expression(expr: &Expression) -> String {
    let mut visitor = SerializeVisitor::default();
    expr.accept(&mut visitor);
    visitor.out
}

/// Serialize a statement to source text.
pub fn serialize_statement(stmt: &Statement) -> String {
    let mut visitor = SerializeVisitor::default();
    stmt.accept(&mut visitor);
    visitor.out
}

/// Serialize a probe (attach points, predicate and body) to source text.
pub fn serialize_probe(probe: &Probe) -> String {
    let mut visitor = SerializeVisitor::default();
    probe.accept(&mut visitor);
    visitor.out
}

/// Serialize a whole program, one probe per line after the definitions.
pub fn serialize_program(program: &Program) -> String {
    let mut visitor = SerializeVisitor::default();
    program.accept(&mut visitor);
    visitor.out
}

#[derive(Default)]
struct SerializeVisitor {
    out: String,
}

impl SerializeVisitor {
    fn expr(&mut self, expr: &Option<Box<Expression>>) {
        if let Some(expr) = expr {
            expr.accept(self);
        }
    }

    /// Operand of a binary or ternary operation, parenthesized when it is
    /// itself an operation so the text parses back to the same shape.
    fn operand(&mut self, expr: &Option<Box<Expression>>) {
        self.parenthesized(expr, |e| {
            matches!(e, Expression::Binop(_) | Expression::Ternary(_))
        });
    }

    /// Operand of a unary operation. Stacked operators are parenthesized so
    /// `-(-x)` does not print as the decrement `--x`.
    fn unary_operand(&mut self, expr: &Option<Box<Expression>>) {
        self.parenthesized(expr, |e| {
            matches!(
                e,
                Expression::Binop(_) | Expression::Ternary(_) | Expression::Unop(_)
            )
        });
    }

    /// Base of a field or array access, which binds tighter than every
    /// prefix or infix form.
    fn access_base(&mut self, expr: &Option<Box<Expression>>) {
        self.parenthesized(expr, |e| {
            matches!(
                e,
                Expression::Binop(_)
                    | Expression::Ternary(_)
                    | Expression::Unop(_)
                    | Expression::Cast(_)
            )
        });
    }

    fn parenthesized(&mut self, expr: &Option<Box<Expression>>, needs_parens: fn(&Expression) -> bool) {
        match expr.as_deref() {
            Some(e) if needs_parens(e) => {
                self.out.push('(');
                e.accept(self);
                self.out.push(')');
            }
            Some(e) => e.accept(self),
            None => {}
        }
    }

    fn list(&mut self, exprs: &[Expression]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            expr.accept(self);
        }
    }

    fn block(&mut self, stmts: &[Statement]) {
        if stmts.is_empty() {
            self.out.push_str("{ }");
            return;
        }
        self.out.push_str("{ ");
        for stmt in stmts {
            stmt.accept(self);
            self.out.push(' ');
        }
        self.out.push('}');
    }

    /// `target op= rhs;` for a compound assignment. Returns false when the
    /// expression does not have the compound shape.
    fn compound_assignment(&mut self, compound: bool, expr: &Option<Box<Expression>>) -> bool {
        let Some(Expression::Binop(binop)) = expr.as_deref().filter(|_| compound) else {
            return false;
        };
        self.expr(&binop.left);
        self.out.push(' ');
        self.out.push_str(binop.opstr());
        self.out.push_str("= ");
        self.operand(&binop.right);
        self.out.push(';');
        true
    }

    fn assigned_value(&mut self, expr: &Option<Box<Expression>>) {
        self.out.push_str(" = ");
        self.expr(expr);
        self.out.push(';');
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl Visitor for SerializeVisitor {
    fn visit_integer(&mut self, node: &Integer) {
        self.out.push_str(&node.n.to_string());
    }

    fn visit_positional_parameter(&mut self, node: &PositionalParameter) {
        match node.ptype {
            PositionalParameterType::Positional => self.out.push_str(&format!("${}", node.n)),
            PositionalParameterType::Count => self.out.push_str("$#"),
        }
    }

    fn visit_string(&mut self, node: &StringLiteral) {
        self.out.push('"');
        self.out.push_str(&escape(&node.value));
        self.out.push('"');
    }

    fn visit_stack_mode(&mut self, node: &StackMode) {
        self.out.push_str(&node.mode);
    }

    fn visit_identifier(&mut self, node: &Identifier) {
        self.out.push_str(&node.ident);
    }

    fn visit_builtin(&mut self, node: &Builtin) {
        self.out.push_str(&node.ident);
    }

    fn visit_call(&mut self, node: &Call) {
        self.out.push_str(&node.func);
        if let Some(args) = &node.vargs {
            self.out.push('(');
            self.list(args);
            self.out.push(')');
        }
    }

    fn visit_map(&mut self, node: &Map) {
        self.out.push_str(&node.ident);
        if let Some(keys) = &node.vargs {
            self.out.push('[');
            self.list(keys);
            self.out.push(']');
        }
    }

    fn visit_variable(&mut self, node: &Variable) {
        self.out.push_str(&node.ident);
    }

    fn visit_binop(&mut self, node: &Binop) {
        self.operand(&node.left);
        self.out.push(' ');
        self.out.push_str(node.opstr());
        self.out.push(' ');
        self.operand(&node.right);
    }

    fn visit_unop(&mut self, node: &Unop) {
        if node.is_post_op {
            self.unary_operand(&node.expr);
            self.out.push_str(node.opstr());
        } else {
            self.out.push_str(node.opstr());
            self.unary_operand(&node.expr);
        }
    }

    fn visit_field_access(&mut self, node: &FieldAccess) {
        self.access_base(&node.expr);
        self.out.push('.');
        match node.index {
            Some(index) => self.out.push_str(&index.to_string()),
            None => self.out.push_str(&node.field),
        }
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) {
        self.access_base(&node.expr);
        self.out.push('[');
        self.expr(&node.indexpr);
        self.out.push(']');
    }

    fn visit_cast(&mut self, node: &Cast) {
        self.out.push('(');
        self.out.push_str(&node.cast_type);
        if node.is_double_pointer {
            self.out.push_str(" **");
        } else if node.is_pointer {
            self.out.push_str(" *");
        }
        self.out.push(')');
        self.operand(&node.expr);
    }

    fn visit_tuple(&mut self, node: &Tuple) {
        self.out.push('(');
        self.list(&node.elems);
        self.out.push(')');
    }

    fn visit_ternary(&mut self, node: &Ternary) {
        self.operand(&node.cond);
        self.out.push_str(" ? ");
        self.operand(&node.left);
        self.out.push_str(" : ");
        self.operand(&node.right);
    }

    fn visit_expr_statement(&mut self, node: &ExprStatement) {
        self.expr(&node.expr);
        self.out.push(';');
    }

    fn visit_assign_map_statement(&mut self, node: &AssignMapStatement) {
        if self.compound_assignment(node.is_compound(), &node.expr) {
            return;
        }
        if let Some(map) = node.target().owned() {
            map.accept(self);
        }
        self.assigned_value(&node.expr);
    }

    fn visit_assign_var_statement(&mut self, node: &AssignVarStatement) {
        if self.compound_assignment(node.is_compound(), &node.expr) {
            return;
        }
        if let Some(var) = node.target().owned() {
            var.accept(self);
        }
        self.assigned_value(&node.expr);
    }

    fn visit_if(&mut self, node: &If) {
        self.out.push_str("if (");
        self.expr(&node.cond);
        self.out.push_str(") ");
        self.block(&node.stmts);
        if let Some(else_stmts) = &node.else_stmts {
            self.out.push_str(" else ");
            self.block(else_stmts);
        }
    }

    fn visit_unroll(&mut self, node: &Unroll) {
        self.out.push_str("unroll (");
        self.expr(&node.expr);
        self.out.push_str(") ");
        self.block(&node.stmts);
    }

    fn visit_while(&mut self, node: &While) {
        self.out.push_str("while (");
        self.expr(&node.cond);
        self.out.push_str(") ");
        self.block(&node.stmts);
    }

    fn visit_jump(&mut self, node: &Jump) {
        self.out.push_str(node.opstr());
        self.out.push(';');
    }

    fn visit_predicate(&mut self, node: &Predicate) {
        self.out.push('/');
        self.expr(&node.expr);
        self.out.push('/');
    }

    fn visit_attach_point(&mut self, node: &AttachPoint) {
        self.out.push_str(&node.name(&node.func));
    }

    fn visit_probe(&mut self, node: &Probe) {
        for (i, ap) in node.attach_points.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            ap.accept(self);
        }
        if let Some(pred) = &node.pred {
            self.out.push(' ');
            pred.accept(self);
        }
        self.out.push(' ');
        self.block(&node.stmts);
    }

    fn visit_program(&mut self, node: &Program) {
        if !node.c_definitions.is_empty() {
            self.out.push_str(&node.c_definitions);
            if !node.c_definitions.ends_with('\n') {
                self.out.push('\n');
            }
        }
        for probe in &node.probes {
            probe.accept(self);
            self.out.push('\n');
        }
    }
}
