/**
 * Leafcopy Tests
 *
 * A leafcopy keeps variant, scalars and back-references and drops every
 * owned child
 */

#[path = "utils/mod.rs"]
#[allow(dead_code)]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use probe_compiler::ast::*;

    #[test]
    fn should_clear_binop_operands_and_keep_operator() {
        let mut expr = binop(int(1), BinaryOperator::Plus, builtin("pid"));
        expr.meta_mut().ty = SizedType::integer(8, true);

        let copy = expr.leafcopy();
        let Expression::Binop(b) = &copy else {
            panic!("leafcopy changed the variant");
        };
        assert_eq!(b.op, BinaryOperator::Plus);
        assert!(b.left.is_none());
        assert!(b.right.is_none());
        assert_eq!(copy.meta().ty, expr.meta().ty);
        assert_eq!(copy.meta().loc, expr.meta().loc);
    }

    #[test]
    fn should_copy_back_references_as_identities() {
        let target = map("@m", None);
        let target_id = target.meta.id();
        let stmt = AssignMapStatement::new(target, int(1), loc());

        let value = stmt.expr.as_deref().expect("value");
        let copy = value.leafcopy();
        assert_eq!(copy.meta().map, Some(target_id));
        assert_ne!(copy.id(), value.id());
    }

    #[test]
    fn should_keep_absent_and_empty_argument_lists_apart() {
        let absent: Expression = Call::new("exit", None, loc()).into();
        let empty: Expression = Call::new("exit", Some(Vec::new()), loc()).into();
        let full = call("printf", vec![int(1)]);

        let Expression::Call(c) = absent.leafcopy() else { panic!() };
        assert!(c.vargs.is_none());
        let Expression::Call(c) = empty.leafcopy() else { panic!() };
        assert!(c.vargs.is_none());
        let Expression::Call(c) = full.leafcopy() else { panic!() };
        assert_eq!(c.func, "printf");
        assert!(c.vargs.is_none());
    }

    #[test]
    fn should_keep_flags_and_scalars_of_leaves() {
        let mut param = PositionalParameter::new(PositionalParameterType::Positional, 2, loc());
        param.is_in_str = true;
        let copy = param.leafcopy();
        assert_eq!(copy.n, 2);
        assert!(copy.is_in_str);
        assert!(copy.meta.is_literal());

        let mut b = Builtin::new("arg0", loc());
        b.probe_id = Some(3);
        let copy = b.leafcopy();
        assert_eq!(copy.probe_id, Some(3));
        assert!(copy.is_argx());
    }

    #[test]
    fn should_clear_cast_operand_and_keep_pointer_flags() {
        let cast = Cast::new("struct task_struct", true, false, builtin("curtask"), loc());
        let copy = cast.leafcopy();
        assert_eq!(copy.cast_type, "struct task_struct");
        assert!(copy.is_pointer);
        assert!(!copy.is_double_pointer);
        assert!(copy.expr.is_none());
    }

    #[test]
    fn should_clear_if_branches_including_else() {
        let stmt = If::new(
            int(1),
            vec![Jump::new(JumpKind::Return, loc()).into()],
            Some(Vec::new()),
            loc(),
        );
        let copy = stmt.leafcopy();
        assert!(copy.cond.is_none());
        assert!(copy.stmts.is_empty());
        assert!(!copy.has_else());
    }

    #[test]
    fn should_keep_unroll_count() {
        let mut unroll = Unroll::new(int(4), Vec::new(), loc());
        unroll.var = 4;
        let copy = unroll.leafcopy();
        assert_eq!(copy.var, 4);
        assert!(copy.expr.is_none());
    }

    #[test]
    fn should_keep_assignment_kind() {
        let plain = AssignVarStatement::new(var("$x"), int(1), loc());
        let compound = AssignVarStatement::compound(var("$x"), BinaryOperator::Plus, int(1), loc());

        let plain_copy = plain.leafcopy();
        assert!(!plain_copy.is_compound());
        assert!(plain_copy.var().is_none());
        assert!(plain_copy.expr.is_none());

        let compound_copy = compound.leafcopy();
        assert!(compound_copy.is_compound());
        assert_eq!(compound_copy.var_id(), compound.var_id());
    }

    #[test]
    fn should_keep_probe_flags_and_index() {
        let mut p = probe(vec![attach_point("kprobe", "vfs_read")], Some(int(1)), Vec::new());
        p.need_expansion = true;
        p.set_index(7);
        let copy = p.leafcopy();
        assert!(copy.need_expansion);
        assert_eq!(copy.index(), 7);
        assert!(copy.attach_points.is_empty());
        assert!(copy.pred.is_none());
    }

    #[test]
    fn should_copy_attach_point_index_table() {
        let mut ap = attach_point("kprobe", "vfs_*");
        ap.set_index("vfs_read", 0);
        ap.set_index("vfs_write", 1);
        let copy = ap.leafcopy();
        assert_eq!(copy.index("vfs_write"), 1);
        assert_eq!(copy.func, "vfs_*");
        assert!(copy.need_expansion);
    }

    #[test]
    fn should_leave_original_intact_after_copy_is_dropped() {
        let expr = binop(int(1), BinaryOperator::Mul, int(2));
        drop(expr.leafcopy());
        assert_eq!(expr.children().len(), 2);
    }

    /// One node of every expression variant that can own children, each
    /// with its children filled in and back-references set.
    fn expressions_with_children() -> Vec<Expression> {
        let mut keyed = map("@latency", Some(vec![builtin("pid"), builtin("comm")]));
        keyed.skip_key_validation = true;
        let mut exprs: Vec<Expression> = vec![
            call("printf", vec![int(1), int(2)]),
            keyed.into(),
            binop(int(1), BinaryOperator::Plus, int(2)),
            Unop::new(UnaryOperator::Increment, var("$i").into(), true, loc()).into(),
            FieldAccess::new(builtin("curtask"), "pid", loc()).into(),
            FieldAccess::indexed(var("$t").into(), 1, loc()).into(),
            ArrayAccess::new(var("$a").into(), int(0), loc()).into(),
            Cast::new("struct file", true, true, builtin("arg0"), loc()).into(),
            Tuple::new(vec![int(1), builtin("pid")], loc()).into(),
            Ternary::new(int(1), int(2), int(3), loc()).into(),
        ];
        let anchor = map("@owner", None).meta.id();
        for (line, expr) in exprs.iter_mut().enumerate() {
            let meta = expr.meta_mut();
            meta.loc = Location::on_line(line as u32 + 1, 4, 6);
            meta.ty = SizedType::integer(8, false);
            meta.key_for_map = Some(anchor);
            meta.map = Some(anchor);
            meta.var = Some(anchor);
        }
        exprs
    }

    #[test]
    fn should_drop_children_of_every_expression_variant() {
        for expr in expressions_with_children() {
            assert!(!expr.children().is_empty(), "{:?} built without children", expr);

            let copy = expr.leafcopy();
            assert_eq!(
                std::mem::discriminant(&copy),
                std::mem::discriminant(&expr),
                "variant changed for {:?}",
                expr
            );
            assert!(copy.children().is_empty(), "children kept in {:?}", copy);

            let (orig, meta) = (expr.meta(), copy.meta());
            assert_ne!(meta.id(), orig.id());
            assert_eq!(meta.loc, orig.loc);
            assert_eq!(meta.ty, orig.ty);
            assert_eq!(meta.flags(), orig.flags());
            assert_eq!(meta.key_for_map, orig.key_for_map);
            assert_eq!(meta.map, orig.map);
            assert_eq!(meta.var, orig.var);
        }
    }

    #[test]
    fn should_keep_scalars_of_every_expression_variant() {
        for expr in expressions_with_children() {
            match (&expr, &expr.leafcopy()) {
                (Expression::Call(a), Expression::Call(b)) => {
                    assert_eq!(b.func, a.func);
                    assert!(b.vargs.is_none());
                }
                (Expression::Map(a), Expression::Map(b)) => {
                    assert_eq!(b.ident, a.ident);
                    assert!(b.skip_key_validation);
                    assert!(b.vargs.is_none());
                }
                (Expression::Binop(a), Expression::Binop(b)) => assert_eq!(b.op, a.op),
                (Expression::Unop(a), Expression::Unop(b)) => {
                    assert_eq!(b.op, a.op);
                    assert!(b.is_post_op);
                    assert!(b.expr.is_none());
                }
                (Expression::FieldAccess(a), Expression::FieldAccess(b)) => {
                    assert_eq!(b.field, a.field);
                    assert_eq!(b.index, a.index);
                    assert!(b.expr.is_none());
                }
                (Expression::ArrayAccess(_), Expression::ArrayAccess(b)) => {
                    assert!(b.expr.is_none());
                    assert!(b.indexpr.is_none());
                }
                (Expression::Cast(a), Expression::Cast(b)) => {
                    assert_eq!(b.cast_type, a.cast_type);
                    assert!(b.is_pointer);
                    assert!(b.is_double_pointer);
                }
                (Expression::Tuple(_), Expression::Tuple(b)) => assert!(b.elems.is_empty()),
                (Expression::Ternary(_), Expression::Ternary(b)) => {
                    assert!(b.cond.is_none());
                    assert!(b.left.is_none());
                    assert!(b.right.is_none());
                }
                (a, b) => panic!("leafcopy turned {:?} into {:?}", a, b),
            }
        }
    }

    fn statement_is_bare(stmt: &Statement) -> bool {
        match stmt {
            Statement::Expr(s) => s.expr.is_none(),
            Statement::AssignMap(s) => s.expr.is_none() && s.map().is_none(),
            Statement::AssignVar(s) => s.expr.is_none() && s.var().is_none(),
            Statement::If(s) => s.cond.is_none() && s.stmts.is_empty() && s.else_stmts.is_none(),
            Statement::Unroll(s) => s.expr.is_none() && s.stmts.is_empty(),
            Statement::While(s) => s.cond.is_none() && s.stmts.is_empty(),
            Statement::Jump(_) => true,
        }
    }

    #[test]
    fn should_drop_bodies_of_every_statement_variant() {
        let body = || -> StatementList { vec![Jump::new(JumpKind::Break, loc()).into()] };
        let stmts: Vec<Statement> = vec![
            ExprStatement::new(call("exit", Vec::new()), loc()).into(),
            AssignMapStatement::new(map("@m", Some(vec![int(1)])), int(2), loc()).into(),
            AssignMapStatement::compound(map("@m", None), BinaryOperator::Plus, int(1), loc()).into(),
            AssignVarStatement::new(var("$x"), int(1), loc()).into(),
            If::new(int(1), body(), Some(body()), loc()).into(),
            Unroll::new(int(2), body(), loc()).into(),
            While::new(int(1), body(), loc()).into(),
            Jump::new(JumpKind::Return, loc()).into(),
        ];

        for (line, mut stmt) in stmts.into_iter().enumerate() {
            let at = Location::on_line(line as u32 + 1, 1, 10);
            match &mut stmt {
                Statement::Expr(s) => s.loc = at,
                Statement::AssignMap(s) => s.loc = at,
                Statement::AssignVar(s) => s.loc = at,
                Statement::If(s) => s.loc = at,
                Statement::Unroll(s) => s.loc = at,
                Statement::While(s) => s.loc = at,
                Statement::Jump(s) => s.loc = at,
            }

            let copy = stmt.leafcopy();
            assert_eq!(copy.kind_name(), stmt.kind_name());
            assert_eq!(copy.loc(), stmt.loc());
            assert!(statement_is_bare(&copy), "{} kept a child", copy.kind_name());

            match (&stmt, &copy) {
                (Statement::AssignMap(a), Statement::AssignMap(b)) => {
                    assert_eq!(b.is_compound(), a.is_compound());
                    if a.is_compound() {
                        assert_eq!(b.map_id(), a.map_id());
                    }
                }
                (Statement::Jump(a), Statement::Jump(b)) => assert_eq!(b.ident, a.ident),
                _ => {}
            }
        }
    }

    #[test]
    fn should_clear_predicate_and_program() {
        let pred = Predicate::new(binop(builtin("pid"), BinaryOperator::Eq, int(1)), Location::on_line(2, 1, 12));
        let copy = pred.leafcopy();
        assert!(copy.expr.is_none());
        assert_eq!(copy.loc, pred.loc);

        let p = probe(vec![attach_point("kprobe", "vfs_read")], None, Vec::new());
        let program = Program::new("struct foo { int x; }", vec![p], Location::on_line(1, 1, 30));
        let copy = program.leafcopy();
        assert!(copy.probes.is_empty());
        assert_eq!(copy.c_definitions, program.c_definitions);
        assert_eq!(copy.loc, program.loc);
    }
}

