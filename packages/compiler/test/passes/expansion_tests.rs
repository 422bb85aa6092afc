/**
 * Expansion Tests
 *
 * Wildcard probes expanded into one concrete probe per matching symbol
 */

#[path = "../ast/utils/mod.rs"]
#[allow(dead_code)]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use probe_compiler::ast::*;
    use probe_compiler::logging::{LogLevel, MemoryLogger, NullLogger};
    use probe_compiler::passes::{expand_program, expand_programs, StaticSymbols, SymbolResolver};
    use probe_compiler::{CompileError, Result};

    fn counting_probe(func: &str) -> Probe {
        probe(
            vec![attach_point("kprobe", func)],
            Some(binop(builtin("pid"), BinaryOperator::Ne, int(0))),
            vec![AssignMapStatement::new(map("@calls", Some(vec![builtin("func")])), call("count", Vec::new()), loc()).into()],
        )
    }

    #[test]
    fn should_expand_wildcard_into_one_probe_per_match() {
        let mut program = Program::new("", vec![counting_probe("vfs_*")], loc());
        let symbols = StaticSymbols::new(["vfs_read", "tcp_sendmsg", "vfs_write"]);

        let generated = expand_program(&mut program, &symbols, &NullLogger::new()).unwrap();

        assert_eq!(generated, 2);
        let names: Vec<String> = program.probes.iter().map(Probe::name).collect();
        assert_eq!(names, vec!["kprobe:vfs_read", "kprobe:vfs_write"]);
        let bodies: Vec<String> = program
            .probes
            .iter()
            .map(|p| serialize_statement(&p.stmts[0]))
            .collect();
        assert_eq!(bodies[0], bodies[1]);
        for (i, p) in program.probes.iter().enumerate() {
            assert_eq!(p.index(), i);
            assert!(!p.has_wildcard_attach_point());
            assert!(p.pred.is_some());
        }
    }

    #[test]
    fn should_give_generated_bodies_independent_identities() {
        let mut program = Program::new("", vec![counting_probe("vfs_*")], loc());
        let symbols = StaticSymbols::new(["vfs_read", "vfs_write"]);
        expand_program(&mut program, &symbols, &NullLogger::new()).unwrap();

        let ids: Vec<_> = program
            .probes
            .iter()
            .map(|p| match &p.stmts[0] {
                Statement::AssignMap(s) => {
                    let id = s.map_id().expect("target");
                    assert_eq!(s.expr.as_deref().and_then(|e| e.meta().map), Some(id));
                    id
                }
                other => panic!("unexpected {}", other.kind_name()),
            })
            .collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn should_keep_concrete_probes_in_place() {
        let mut program = Program::new(
            "",
            vec![
                counting_probe("do_exit"),
                counting_probe("vfs_*"),
                counting_probe("tcp_sendmsg"),
            ],
            loc(),
        );
        let symbols = StaticSymbols::new(["vfs_read", "vfs_write"]);
        expand_program(&mut program, &symbols, &NullLogger::new()).unwrap();

        let names: Vec<String> = program.probes.iter().map(Probe::name).collect();
        assert_eq!(
            names,
            vec!["kprobe:do_exit", "kprobe:vfs_read", "kprobe:vfs_write", "kprobe:tcp_sendmsg"]
        );
    }

    #[test]
    fn should_split_mixed_attach_points() {
        let p = probe(
            vec![attach_point("kprobe", "vfs_re?d"), attach_point("kretprobe", "do_exit")],
            None,
            Vec::new(),
        );
        let mut program = Program::new("", vec![p], loc());
        let symbols = StaticSymbols::new(["vfs_read", "vfs_readv"]);
        expand_program(&mut program, &symbols, &NullLogger::new()).unwrap();

        let names: Vec<String> = program.probes.iter().map(Probe::name).collect();
        assert_eq!(names, vec!["kprobe:vfs_read", "kretprobe:do_exit"]);
    }

    #[test]
    fn should_report_probe_without_matches() {
        let mut program = Program::new("", vec![counting_probe("nothing_*")], loc());
        let err = expand_program(&mut program, &StaticSymbols::new(["vfs_read"]), &NullLogger::new())
            .unwrap_err();
        match err {
            CompileError::NoWildcardMatches { probe, pattern } => {
                assert_eq!(probe, "kprobe:nothing_*");
                assert_eq!(pattern, "kprobe:nothing_*");
            }
            other => panic!("unexpected error {}", other),
        }
        assert_eq!(program.probes.len(), 1);
    }

    #[test]
    fn should_index_generated_probes_across_all_attach_points() {
        let p = probe(
            vec![attach_point("kprobe", "vfs_*"), attach_point("kretprobe", "vfs_*")],
            None,
            Vec::new(),
        );
        let mut program = Program::new("", vec![p], loc());
        let symbols = StaticSymbols::new(["vfs_read", "vfs_write"]);
        expand_program(&mut program, &symbols, &NullLogger::new()).unwrap();

        let generated: Vec<(String, usize)> = program.probes.iter().map(|p| (p.name(), p.index())).collect();
        assert_eq!(
            generated,
            vec![
                ("kprobe:vfs_read".to_string(), 0),
                ("kprobe:vfs_write".to_string(), 1),
                ("kretprobe:vfs_read".to_string(), 2),
                ("kretprobe:vfs_write".to_string(), 3),
            ]
        );
        let ap = &program.probes[3].attach_points[0];
        assert_eq!(ap.index("vfs_read"), 0);
        assert_eq!(ap.index("vfs_write"), 1);
    }

    #[test]
    fn should_index_mixed_attach_points_by_position() {
        let p = probe(
            vec![attach_point("kprobe", "vfs_re?d"), attach_point("kretprobe", "do_exit")],
            None,
            Vec::new(),
        );
        let mut program = Program::new("", vec![p], loc());
        expand_program(&mut program, &StaticSymbols::new(["vfs_read"]), &NullLogger::new()).unwrap();

        let indices: Vec<usize> = program.probes.iter().map(Probe::index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn should_leave_earlier_probes_untouched_when_a_later_one_fails() {
        let mut program = Program::new("", vec![counting_probe("vfs_*"), counting_probe("zzz_*")], loc());
        let err = expand_program(&mut program, &StaticSymbols::new(["vfs_read"]), &NullLogger::new())
            .unwrap_err();

        assert!(matches!(err, CompileError::NoWildcardMatches { .. }));
        assert_eq!(program.probes.len(), 2);
        assert_eq!(program.probes[0].attach_points[0].indexed_names().count(), 0);
        assert!(program.probes[0].has_wildcard_attach_point());

        // the same program expands cleanly once the symbol shows up
        let symbols = StaticSymbols::new(["vfs_read", "zzz_exit"]);
        expand_program(&mut program, &symbols, &NullLogger::new()).unwrap();
        let indices: Vec<usize> = program.probes.iter().map(Probe::index).collect();
        assert_eq!(indices, vec![0, 0]);
    }

    /// Reverses whatever it is given, to check the resolver's order is kept.
    struct Reversed(Vec<&'static str>);

    impl SymbolResolver for Reversed {
        fn resolve(&self, _ap: &AttachPoint) -> Result<Vec<String>> {
            Ok(self.0.iter().rev().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn should_follow_resolver_order() {
        let mut program = Program::new("", vec![counting_probe("sys_*")], loc());
        expand_program(&mut program, &Reversed(vec!["sys_a", "sys_b"]), &NullLogger::new()).unwrap();
        let names: Vec<String> = program.probes.iter().map(Probe::name).collect();
        assert_eq!(names, vec!["kprobe:sys_b", "kprobe:sys_a"]);
    }

    #[test]
    fn should_expand_independent_programs_in_parallel() {
        let mut programs: Vec<Program> = (0..4)
            .map(|_| Program::new("", vec![counting_probe("vfs_*")], loc()))
            .collect();
        let symbols = StaticSymbols::new(["vfs_read", "vfs_write", "vfs_open"]);
        let generated = expand_programs(&mut programs, &symbols, &NullLogger::new()).unwrap();
        assert_eq!(generated, 12);
        assert!(programs.iter().all(|p| p.probes.len() == 3));
    }

    #[test]
    fn should_log_each_expansion_at_debug_level() {
        let mut program = Program::new("", vec![counting_probe("vfs_*")], loc());
        let logger = MemoryLogger::new(LogLevel::Debug);
        expand_program(&mut program, &StaticSymbols::new(["vfs_read", "vfs_write"]), &logger).unwrap();
        assert_eq!(
            logger.records(),
            vec![(LogLevel::Debug, "expanding 'kprobe:vfs_*' into 2 probes".to_string())]
        );
    }
}
