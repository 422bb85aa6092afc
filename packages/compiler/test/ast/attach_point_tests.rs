/**
 * Attach Point Tests
 *
 * Canonical names and the per-attach-point index table
 */

#[path = "utils/mod.rs"]
#[allow(dead_code)]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::*;
    use probe_compiler::ast::*;

    #[test]
    fn should_name_plain_kprobe() {
        let ap = attach_point("kprobe", "vfs_read");
        assert_eq!(ap.name(&ap.func), "kprobe:vfs_read");
    }

    #[test]
    fn should_name_uprobe_with_target_and_offset() {
        let mut ap = attach_point("uprobe", "main");
        ap.target = "/bin/sh".to_string();
        ap.func_offset = 8;
        assert_eq!(ap.name(&ap.func), "uprobe:/bin/sh:main+8");
        assert_eq!(ap.name_with_target("/bin/bash", "main"), "uprobe:/bin/bash:main+8");
    }

    #[test]
    fn should_name_watchpoint() {
        let mut ap = AttachPoint::new("watchpoint:0x1000:8:rw", loc());
        ap.provider = "watchpoint".to_string();
        ap.address = 4096;
        ap.len = 8;
        ap.mode = "rw".to_string();
        assert_eq!(ap.name(""), "watchpoint:4096:8:rw");
    }

    #[test]
    fn should_name_profile_with_frequency() {
        let mut ap = AttachPoint::new("profile:hz:99", loc());
        ap.provider = "profile".to_string();
        ap.target = "hz".to_string();
        ap.freq = 99;
        assert_eq!(ap.name(""), "profile:hz:99");
    }

    #[test]
    fn should_name_usdt_with_namespace() {
        let mut ap = attach_point("usdt", "query__start");
        ap.target = "/usr/bin/mysqld".to_string();
        ap.ns = "mysql".to_string();
        assert_eq!(ap.name(&ap.func), "usdt:/usr/bin/mysqld:mysql:query__start");
    }

    #[test]
    fn should_return_zero_for_unknown_index() {
        let ap = attach_point("kprobe", "vfs_*");
        assert_eq!(ap.index("vfs_read"), 0);
    }

    #[test]
    fn should_keep_set_index_stable_and_overwrite() {
        let mut ap = attach_point("kprobe", "vfs_*");
        ap.set_index("vfs_read", 3);
        assert_eq!(ap.index("vfs_read"), 3);
        assert_eq!(ap.index("vfs_read"), 3);
        ap.set_index("vfs_read", 5);
        assert_eq!(ap.index("vfs_read"), 5);
    }

    #[test]
    fn should_assign_dense_indices_in_first_seen_order() {
        let mut ap = attach_point("kprobe", "vfs_*");
        assert_eq!(ap.assign_index("vfs_write"), 0);
        assert_eq!(ap.assign_index("vfs_read"), 1);
        assert_eq!(ap.assign_index("vfs_write"), 0);
        let names: Vec<(&str, usize)> = ap.indexed_names().collect();
        assert_eq!(names, vec![("vfs_write", 0), ("vfs_read", 1)]);
    }

    #[test]
    fn should_join_probe_name_over_attach_points() {
        let p = probe(
            vec![attach_point("kprobe", "vfs_read"), attach_point("kretprobe", "vfs_read")],
            None,
            Vec::new(),
        );
        assert_eq!(p.name(), "kprobe:vfs_read,kretprobe:vfs_read");
    }

    #[test]
    fn should_keep_probe_index() {
        let mut p = probe(vec![attach_point("kprobe", "vfs_read")], None, Vec::new());
        assert_eq!(p.index(), 0);
        p.set_index(2);
        assert_eq!(p.index(), 2);
        assert!(!p.has_wildcard_attach_point());
    }
}
