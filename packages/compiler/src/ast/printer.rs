//! Tree Printer
//!
//! Debug dump of a tree, one node per line, indented one space per level.
//! Resolved types are appended as ` :: [type]` when `print_types` is set.

use super::expression::*;
use super::probe::{AttachPoint, Predicate, Probe, Program};
use super::statement::*;
use super::types::{PositionalParameterType, SizedType};
use super::visitor::{self, Node, Visitor};

pub struct Printer {
    out: String,
    depth: usize,
    print_types: bool,
}

impl Printer {
    pub fn new() -> Self {
        Printer {
            out: String::new(),
            depth: 0,
            print_types: false,
        }
    }

    pub fn with_types(mut self, print_types: bool) -> Self {
        self.print_types = print_types;
        self
    }

    pub fn print(mut self, program: &Program) -> String {
        program.accept(&mut self);
        self.out
    }

    pub fn print_statement(mut self, stmt: &Statement) -> String {
        stmt.accept(&mut self);
        self.out
    }

    pub fn print_expression(mut self, expr: &Expression) -> String {
        expr.accept(&mut self);
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn expr_line(&mut self, text: &str, ty: &SizedType) {
        if self.print_types && ty.is_resolved() {
            self.line(&format!("{} :: [{}]", text, ty));
        } else {
            self.line(text);
        }
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn statements(&mut self, stmts: &[Statement]) {
        visitor::visit_statements(self, stmts);
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('"', "\\\"")
}

impl Visitor for Printer {
    fn visit_integer(&mut self, node: &Integer) {
        self.expr_line(&format!("int: {}", node.n), &node.meta.ty);
    }

    fn visit_positional_parameter(&mut self, node: &PositionalParameter) {
        let text = match node.ptype {
            PositionalParameterType::Positional => format!("param: ${}", node.n),
            PositionalParameterType::Count => "param: $#".to_string(),
        };
        self.expr_line(&text, &node.meta.ty);
    }

    fn visit_string(&mut self, node: &StringLiteral) {
        self.expr_line(&format!("string: {}", escape(&node.value)), &node.meta.ty);
    }

    fn visit_stack_mode(&mut self, node: &StackMode) {
        self.expr_line(&format!("stack_mode: {}", node.mode), &node.meta.ty);
    }

    fn visit_identifier(&mut self, node: &Identifier) {
        self.expr_line(&format!("identifier: {}", node.ident), &node.meta.ty);
    }

    fn visit_builtin(&mut self, node: &Builtin) {
        self.expr_line(&format!("builtin: {}", node.ident), &node.meta.ty);
    }

    fn visit_call(&mut self, node: &Call) {
        self.expr_line(&format!("call: {}", node.func), &node.meta.ty);
        self.nested(|p| visitor::walk_call(p, node));
    }

    fn visit_map(&mut self, node: &Map) {
        self.expr_line(&format!("map: {}", node.ident), &node.meta.ty);
        self.nested(|p| visitor::walk_map(p, node));
    }

    fn visit_variable(&mut self, node: &Variable) {
        self.expr_line(&format!("variable: {}", node.ident), &node.meta.ty);
    }

    fn visit_binop(&mut self, node: &Binop) {
        self.expr_line(node.opstr(), &node.meta.ty);
        self.nested(|p| visitor::walk_binop(p, node));
    }

    fn visit_unop(&mut self, node: &Unop) {
        let text = if node.is_post_op {
            format!("{} (post)", node.opstr())
        } else {
            node.opstr().to_string()
        };
        self.expr_line(&text, &node.meta.ty);
        self.nested(|p| visitor::walk_unop(p, node));
    }

    fn visit_field_access(&mut self, node: &FieldAccess) {
        self.expr_line(".", &node.meta.ty);
        self.nested(|p| {
            visitor::walk_field_access(p, node);
            match node.index {
                Some(index) => p.line(&index.to_string()),
                None => p.line(&node.field),
            }
        });
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) {
        self.expr_line("[]", &node.meta.ty);
        self.nested(|p| visitor::walk_array_access(p, node));
    }

    fn visit_cast(&mut self, node: &Cast) {
        let stars = if node.is_double_pointer {
            " **"
        } else if node.is_pointer {
            " *"
        } else {
            ""
        };
        self.expr_line(&format!("({}{})", node.cast_type, stars), &node.meta.ty);
        self.nested(|p| visitor::walk_cast(p, node));
    }

    fn visit_tuple(&mut self, node: &Tuple) {
        self.expr_line("tuple:", &node.meta.ty);
        self.nested(|p| visitor::walk_tuple(p, node));
    }

    fn visit_ternary(&mut self, node: &Ternary) {
        self.expr_line("?:", &node.meta.ty);
        self.nested(|p| visitor::walk_ternary(p, node));
    }

    fn visit_expr_statement(&mut self, node: &ExprStatement) {
        visitor::walk_expr_statement(self, node);
    }

    fn visit_assign_map_statement(&mut self, node: &AssignMapStatement) {
        self.line(if node.is_compound() { "= (compound)" } else { "=" });
        self.nested(|p| visitor::walk_assign_map_statement(p, node));
    }

    fn visit_assign_var_statement(&mut self, node: &AssignVarStatement) {
        self.line(if node.is_compound() { "= (compound)" } else { "=" });
        self.nested(|p| visitor::walk_assign_var_statement(p, node));
    }

    fn visit_if(&mut self, node: &If) {
        self.line("if");
        self.nested(|p| {
            if let Some(cond) = &node.cond {
                cond.accept(p);
            }
            p.line("then");
            p.nested(|p| p.statements(&node.stmts));
            if let Some(else_stmts) = &node.else_stmts {
                p.line("else");
                p.nested(|p| p.statements(else_stmts));
            }
        });
    }

    fn visit_unroll(&mut self, node: &Unroll) {
        if node.is_resolved() {
            self.line(&format!("unroll {}", node.var));
        } else {
            self.line("unroll");
        }
        self.nested(|p| visitor::walk_unroll(p, node));
    }

    fn visit_while(&mut self, node: &While) {
        self.line("while");
        self.nested(|p| visitor::walk_while(p, node));
    }

    fn visit_jump(&mut self, node: &Jump) {
        self.line(node.opstr());
    }

    fn visit_predicate(&mut self, node: &Predicate) {
        self.line("pred");
        self.nested(|p| visitor::walk_predicate(p, node));
    }

    fn visit_attach_point(&mut self, node: &AttachPoint) {
        self.line(&node.name(&node.func));
    }

    fn visit_probe(&mut self, node: &Probe) {
        for ap in &node.attach_points {
            ap.accept(self);
        }
        self.nested(|p| {
            if let Some(pred) = &node.pred {
                pred.accept(p);
            }
            p.statements(&node.stmts);
        });
    }

    fn visit_program(&mut self, node: &Program) {
        self.line("Program");
        if !node.c_definitions.is_empty() {
            self.nested(|p| p.line("c_definitions"));
        }
        self.nested(|p| visitor::walk_program(p, node));
    }
}
