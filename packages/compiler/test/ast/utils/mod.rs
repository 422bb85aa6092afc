/**
 * Test Utilities
 *
 * Tree builders and a recording visitor shared by the AST and pass tests
 */

use probe_compiler::ast::visitor::{self, Visitor};
use probe_compiler::ast::*;
use probe_compiler::passes::has_wildcard;
use smallvec::smallvec;

pub fn loc() -> Location {
    Location::default()
}

pub fn int(n: i64) -> Expression {
    Integer::new(n, loc()).into()
}

pub fn builtin(ident: &str) -> Expression {
    Builtin::new(ident, loc()).into()
}

pub fn var(ident: &str) -> Variable {
    Variable::new(ident, loc())
}

pub fn map(ident: &str, keys: Option<Vec<Expression>>) -> Map {
    Map::new(ident, keys, loc())
}

pub fn binop(left: Expression, op: BinaryOperator, right: Expression) -> Expression {
    Binop::new(left, op, right, loc()).into()
}

pub fn call(func: &str, args: Vec<Expression>) -> Expression {
    Call::new(func, Some(args), loc()).into()
}

/// `provider:func` attach point, flagged for expansion when `func` is a glob.
pub fn attach_point(provider: &str, func: &str) -> AttachPoint {
    let mut ap = AttachPoint::new(format!("{}:{}", provider, func), loc());
    ap.provider = provider.to_string();
    ap.func = func.to_string();
    ap.need_expansion = has_wildcard(func);
    ap
}

pub fn probe(aps: Vec<AttachPoint>, pred: Option<Expression>, stmts: StatementList) -> Probe {
    let mut list: AttachPointList = smallvec![];
    list.extend(aps);
    Probe::new(list, pred.map(|e| Predicate::new(e, loc())), stmts, loc())
}

/// Labels of every visited node, in visit order.
pub fn visit_order<N: Node + ?Sized>(node: &N) -> Vec<String> {
    let mut recorder = RecordingVisitor::default();
    node.accept(&mut recorder);
    recorder.events
}

/// Records a label per visited node and always descends.
#[derive(Default)]
pub struct RecordingVisitor {
    pub events: Vec<String>,
}

impl RecordingVisitor {
    fn record(&mut self, label: impl Into<String>) {
        self.events.push(label.into());
    }
}

impl Visitor for RecordingVisitor {
    fn visit_integer(&mut self, node: &Integer) {
        self.record(format!("int {}", node.n));
    }

    fn visit_positional_parameter(&mut self, node: &PositionalParameter) {
        self.record(format!("param ${}", node.n));
    }

    fn visit_string(&mut self, node: &StringLiteral) {
        self.record(format!("string {}", node.value));
    }

    fn visit_stack_mode(&mut self, node: &StackMode) {
        self.record(format!("stack_mode {}", node.mode));
    }

    fn visit_identifier(&mut self, node: &Identifier) {
        self.record(format!("identifier {}", node.ident));
    }

    fn visit_builtin(&mut self, node: &Builtin) {
        self.record(format!("builtin {}", node.ident));
    }

    fn visit_call(&mut self, node: &Call) {
        self.record(format!("call {}", node.func));
        visitor::walk_call(self, node);
    }

    fn visit_map(&mut self, node: &Map) {
        self.record(format!("map {}", node.ident));
        visitor::walk_map(self, node);
    }

    fn visit_variable(&mut self, node: &Variable) {
        self.record(format!("variable {}", node.ident));
    }

    fn visit_binop(&mut self, node: &Binop) {
        self.record(format!("binop {}", node.opstr()));
        visitor::walk_binop(self, node);
    }

    fn visit_unop(&mut self, node: &Unop) {
        self.record(format!("unop {}", node.opstr()));
        visitor::walk_unop(self, node);
    }

    fn visit_field_access(&mut self, node: &FieldAccess) {
        self.record(format!("field .{}", node.field));
        visitor::walk_field_access(self, node);
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) {
        self.record("array_access");
        visitor::walk_array_access(self, node);
    }

    fn visit_cast(&mut self, node: &Cast) {
        self.record(format!("cast {}", node.cast_type));
        visitor::walk_cast(self, node);
    }

    fn visit_tuple(&mut self, node: &Tuple) {
        self.record("tuple");
        visitor::walk_tuple(self, node);
    }

    fn visit_ternary(&mut self, node: &Ternary) {
        self.record("ternary");
        visitor::walk_ternary(self, node);
    }

    fn visit_expr_statement(&mut self, node: &ExprStatement) {
        self.record("expr_statement");
        visitor::walk_expr_statement(self, node);
    }

    fn visit_assign_map_statement(&mut self, node: &AssignMapStatement) {
        self.record("assign_map");
        visitor::walk_assign_map_statement(self, node);
    }

    fn visit_assign_var_statement(&mut self, node: &AssignVarStatement) {
        self.record("assign_var");
        visitor::walk_assign_var_statement(self, node);
    }

    fn visit_if(&mut self, node: &If) {
        self.record(if node.has_else() { "if/else" } else { "if" });
        visitor::walk_if(self, node);
    }

    fn visit_unroll(&mut self, node: &Unroll) {
        self.record("unroll");
        visitor::walk_unroll(self, node);
    }

    fn visit_while(&mut self, node: &While) {
        self.record("while");
        visitor::walk_while(self, node);
    }

    fn visit_jump(&mut self, node: &Jump) {
        self.record(format!("jump {}", node.opstr()));
    }

    fn visit_predicate(&mut self, node: &Predicate) {
        self.record("predicate");
        visitor::walk_predicate(self, node);
    }

    fn visit_attach_point(&mut self, node: &AttachPoint) {
        self.record(format!("attach_point {}", node.name(&node.func)));
    }

    fn visit_probe(&mut self, node: &Probe) {
        self.record("probe");
        visitor::walk_probe(self, node);
    }

    fn visit_program(&mut self, node: &Program) {
        self.record("program");
        visitor::walk_program(self, node);
    }
}
