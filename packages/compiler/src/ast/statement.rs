//! Statement Nodes
//!
//! Imperative nodes composing expressions and nested statement lists.

use super::expression::{Binop, Expression, Map, NodeId, Variable};
use super::location::Location;
use super::operators::{BinaryOperator, JumpKind};

pub type StatementList = Vec<Statement>;

/// Target of an assignment.
///
/// A plain assignment owns its target. A compound assignment (`@x += 1`) moves
/// the target into the right-hand expression, so the statement only names it.
#[derive(Debug)]
pub enum Target<T> {
    /// Owned by the statement. `None` only in a leafcopy.
    Owned(Option<Box<T>>),
    /// Owned by the statement's own expression.
    Anchored(NodeId),
}

impl<T> Target<T> {
    pub fn is_anchored(&self) -> bool {
        matches!(self, Target::Anchored(_))
    }

    /// The target when the statement owns it.
    pub fn owned(&self) -> Option<&T> {
        match self {
            Target::Owned(node) => node.as_deref(),
            Target::Anchored(_) => None,
        }
    }

    pub fn owned_mut(&mut self) -> Option<&mut T> {
        match self {
            Target::Owned(node) => node.as_deref_mut(),
            Target::Anchored(_) => None,
        }
    }

    fn leafcopy(&self) -> Self {
        match self {
            Target::Owned(_) => Target::Owned(None),
            Target::Anchored(id) => Target::Anchored(*id),
        }
    }
}

/// An expression evaluated for its side effects, e.g. `printf(...)`.
#[derive(Debug)]
pub struct ExprStatement {
    pub loc: Location,
    pub expr: Option<Box<Expression>>,
}

impl ExprStatement {
    pub fn new(expr: Expression, loc: Location) -> Self {
        ExprStatement {
            loc,
            expr: Some(Box::new(expr)),
        }
    }

    pub fn leafcopy(&self) -> Self {
        ExprStatement {
            loc: self.loc,
            expr: None,
        }
    }
}

/// `@map[keys] = expr` or `@map[keys] op= expr`.
#[derive(Debug)]
pub struct AssignMapStatement {
    pub loc: Location,
    target: Target<Map>,
    pub expr: Option<Box<Expression>>,
}

impl AssignMapStatement {
    pub fn new(map: Map, mut expr: Expression, loc: Location) -> Self {
        expr.meta_mut().map = Some(map.meta.id());
        AssignMapStatement {
            loc,
            target: Target::Owned(Some(Box::new(map))),
            expr: Some(Box::new(expr)),
        }
    }

    /// `map op= rhs`, stored as `map = map op rhs` with the map owned by the
    /// binary operation.
    pub fn compound(map: Map, op: BinaryOperator, rhs: Expression, loc: Location) -> Self {
        let id = map.meta.id();
        let mut expr = Expression::Binop(Binop::new(map.into(), op, rhs, loc));
        expr.meta_mut().map = Some(id);
        AssignMapStatement {
            loc,
            target: Target::Anchored(id),
            expr: Some(Box::new(expr)),
        }
    }

    pub fn leafcopy(&self) -> Self {
        AssignMapStatement {
            loc: self.loc,
            target: self.target.leafcopy(),
            expr: None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.target.is_anchored()
    }

    pub fn target(&self) -> &Target<Map> {
        &self.target
    }

    /// Replacing the target is crate-internal: the owned/anchored split is
    /// fixed at construction.
    pub(crate) fn target_mut(&mut self) -> &mut Target<Map> {
        &mut self.target
    }

    /// Identity of the assigned map, wherever it is owned.
    pub fn map_id(&self) -> Option<NodeId> {
        match &self.target {
            Target::Owned(map) => map.as_ref().map(|m| m.meta.id()),
            Target::Anchored(id) => Some(*id),
        }
    }

    /// The assigned map, wherever it is owned.
    pub fn map(&self) -> Option<&Map> {
        match &self.target {
            Target::Owned(map) => map.as_deref(),
            Target::Anchored(id) => self.expr.as_ref()?.find_map(*id),
        }
    }

    /// Split into the owned target (absent for compound assignments) and the
    /// expression.
    pub fn into_parts(self) -> (Option<Map>, Option<Expression>) {
        let target = match self.target {
            Target::Owned(map) => map.map(|m| *m),
            Target::Anchored(_) => None,
        };
        (target, self.expr.map(|e| *e))
    }
}

/// `$var = expr` or `$var op= expr`.
#[derive(Debug)]
pub struct AssignVarStatement {
    pub loc: Location,
    target: Target<Variable>,
    pub expr: Option<Box<Expression>>,
}

impl AssignVarStatement {
    pub fn new(var: Variable, mut expr: Expression, loc: Location) -> Self {
        expr.meta_mut().var = Some(var.meta.id());
        AssignVarStatement {
            loc,
            target: Target::Owned(Some(Box::new(var))),
            expr: Some(Box::new(expr)),
        }
    }

    /// `var op= rhs`, stored as `var = var op rhs` with the variable owned by
    /// the binary operation.
    pub fn compound(var: Variable, op: BinaryOperator, rhs: Expression, loc: Location) -> Self {
        let id = var.meta.id();
        let mut expr = Expression::Binop(Binop::new(var.into(), op, rhs, loc));
        expr.meta_mut().var = Some(id);
        AssignVarStatement {
            loc,
            target: Target::Anchored(id),
            expr: Some(Box::new(expr)),
        }
    }

    pub fn leafcopy(&self) -> Self {
        AssignVarStatement {
            loc: self.loc,
            target: self.target.leafcopy(),
            expr: None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.target.is_anchored()
    }

    pub fn target(&self) -> &Target<Variable> {
        &self.target
    }

    /// Replacing the target is crate-internal: the owned/anchored split is
    /// fixed at construction.
    pub(crate) fn target_mut(&mut self) -> &mut Target<Variable> {
        &mut self.target
    }

    pub fn var_id(&self) -> Option<NodeId> {
        match &self.target {
            Target::Owned(var) => var.as_ref().map(|v| v.meta.id()),
            Target::Anchored(id) => Some(*id),
        }
    }

    pub fn var(&self) -> Option<&Variable> {
        match &self.target {
            Target::Owned(var) => var.as_deref(),
            Target::Anchored(id) => self.expr.as_ref()?.find_variable(*id),
        }
    }

    pub fn into_parts(self) -> (Option<Variable>, Option<Expression>) {
        let target = match self.target {
            Target::Owned(var) => var.map(|v| *v),
            Target::Anchored(_) => None,
        };
        (target, self.expr.map(|e| *e))
    }
}

/// `if (cond) { stmts } else { else_stmts }`
///
/// `else_stmts` is `None` when there is no `else` at all, which later passes
/// treat differently from an empty `else {}`.
#[derive(Debug)]
pub struct If {
    pub loc: Location,
    pub cond: Option<Box<Expression>>,
    pub stmts: StatementList,
    pub else_stmts: Option<StatementList>,
}

impl If {
    pub fn new(
        cond: Expression,
        stmts: StatementList,
        else_stmts: Option<StatementList>,
        loc: Location,
    ) -> Self {
        If {
            loc,
            cond: Some(Box::new(cond)),
            stmts,
            else_stmts,
        }
    }

    pub fn leafcopy(&self) -> Self {
        If {
            loc: self.loc,
            cond: None,
            stmts: Vec::new(),
            else_stmts: None,
        }
    }

    /// True for both `else {}` and a non-empty `else`.
    pub fn has_else(&self) -> bool {
        self.else_stmts.is_some()
    }
}

/// `unroll (expr) { stmts }`
#[derive(Debug)]
pub struct Unroll {
    pub loc: Location,
    /// Resolved unroll count. Zero until the count expression is resolved.
    pub var: u64,
    pub expr: Option<Box<Expression>>,
    pub stmts: StatementList,
}

impl Unroll {
    pub fn new(expr: Expression, stmts: StatementList, loc: Location) -> Self {
        Unroll {
            loc,
            var: 0,
            expr: Some(Box::new(expr)),
            stmts,
        }
    }

    pub fn leafcopy(&self) -> Self {
        Unroll {
            loc: self.loc,
            var: self.var,
            expr: None,
            stmts: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.var != 0
    }
}

/// `while (cond) { stmts }`
#[derive(Debug)]
pub struct While {
    pub loc: Location,
    pub cond: Option<Box<Expression>>,
    pub stmts: StatementList,
}

impl While {
    pub fn new(cond: Expression, stmts: StatementList, loc: Location) -> Self {
        While {
            loc,
            cond: Some(Box::new(cond)),
            stmts,
        }
    }

    pub fn leafcopy(&self) -> Self {
        While {
            loc: self.loc,
            cond: None,
            stmts: Vec::new(),
        }
    }
}

/// `return`, `break` or `continue`.
#[derive(Debug)]
pub struct Jump {
    pub loc: Location,
    pub ident: JumpKind,
}

impl Jump {
    pub fn new(ident: JumpKind, loc: Location) -> Self {
        Jump { loc, ident }
    }

    pub fn leafcopy(&self) -> Self {
        Jump {
            loc: self.loc,
            ident: self.ident,
        }
    }

    pub fn opstr(&self) -> &'static str {
        self.ident.as_str()
    }
}

#[derive(Debug)]
pub enum Statement {
    Expr(ExprStatement),
    AssignMap(AssignMapStatement),
    AssignVar(AssignVarStatement),
    If(If),
    Unroll(Unroll),
    While(While),
    Jump(Jump),
}

impl Statement {
    pub fn loc(&self) -> &Location {
        match self {
            Statement::Expr(s) => &s.loc,
            Statement::AssignMap(s) => &s.loc,
            Statement::AssignVar(s) => &s.loc,
            Statement::If(s) => &s.loc,
            Statement::Unroll(s) => &s.loc,
            Statement::While(s) => &s.loc,
            Statement::Jump(s) => &s.loc,
        }
    }

    pub fn leafcopy(&self) -> Statement {
        match self {
            Statement::Expr(s) => Statement::Expr(s.leafcopy()),
            Statement::AssignMap(s) => Statement::AssignMap(s.leafcopy()),
            Statement::AssignVar(s) => Statement::AssignVar(s.leafcopy()),
            Statement::If(s) => Statement::If(s.leafcopy()),
            Statement::Unroll(s) => Statement::Unroll(s.leafcopy()),
            Statement::While(s) => Statement::While(s.leafcopy()),
            Statement::Jump(s) => Statement::Jump(s.leafcopy()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Expr(_) => "expr_statement",
            Statement::AssignMap(_) => "assign_map",
            Statement::AssignVar(_) => "assign_var",
            Statement::If(_) => "if",
            Statement::Unroll(_) => "unroll",
            Statement::While(_) => "while",
            Statement::Jump(_) => "jump",
        }
    }
}

impl From<ExprStatement> for Statement {
    fn from(s: ExprStatement) -> Self {
        Statement::Expr(s)
    }
}

impl From<AssignMapStatement> for Statement {
    fn from(s: AssignMapStatement) -> Self {
        Statement::AssignMap(s)
    }
}

impl From<AssignVarStatement> for Statement {
    fn from(s: AssignVarStatement) -> Self {
        Statement::AssignVar(s)
    }
}

impl From<If> for Statement {
    fn from(s: If) -> Self {
        Statement::If(s)
    }
}

impl From<Unroll> for Statement {
    fn from(s: Unroll) -> Self {
        Statement::Unroll(s)
    }
}

impl From<While> for Statement {
    fn from(s: While) -> Self {
        Statement::While(s)
    }
}

impl From<Jump> for Statement {
    fn from(s: Jump) -> Self {
        Statement::Jump(s)
    }
}
