//! One-file-system enforcement during a walk.

use std::path::Path;
use std::sync::Arc;

use rampart_test::prelude::*;

fn local_device(path: &Path) -> DeviceId {
    let entry = CandidateEntry::probe(path).unwrap();
    entry.device
}

#[test]
fn test_walk_on_one_device_keeps_everything() {
    let tree = TestTree::new()
        .file("data/a", "")
        .file("data/sub/b", "")
        .file("other/c", "");
    let map = DeviceBoundaryMap::from_roots([tree.path("data"), tree.path("other")]).unwrap();
    let guard = DeviceBoundaryGuard::new(Arc::new(map));

    let report = scan_targets(&[tree.path("data"), tree.path("other")], &guard).unwrap();

    assert!(report.excluded.is_empty());
    assert!(report.is_included(&tree.path("data/sub/b")));
    assert!(report.is_included(&tree.path("other/c")));
}

#[test]
fn test_foreign_mount_keeps_mountpoint_and_drops_contents() {
    setup_test_logging("rampart_boundary=debug");
    let tree = TestTree::new()
        .file("data/a", "")
        .file("data/mnt/inner", "")
        .file("data/mnt/deeper/file", "");
    let local = local_device(tree.root());
    let foreign = DeviceId::new(local.get().wrapping_add(1));

    // data/mnt is registered as if another filesystem were mounted there
    let map =
        DeviceBoundaryMap::build([(tree.path("data"), local), (tree.path("data/mnt"), foreign)])
            .unwrap();
    let sink = RecordingSink::shared();
    let guard = DeviceBoundaryGuard::new(Arc::new(map)).with_sink(sink.clone());

    let report = scan_tree(&tree.path("data"), &guard).unwrap();

    assert!(report.is_included(&tree.path("data/a")));
    assert!(report.is_included(&tree.path("data/mnt")));
    assert!(report.is_excluded(&tree.path("data/mnt/inner")));
    assert!(report.is_excluded(&tree.path("data/mnt/deeper")));
    assert!(!report.was_visited(&tree.path("data/mnt/deeper/file")));

    let items = sink.items_from(GuardKind::DeviceBoundary);
    assert_eq!(
        items,
        vec![tree.path("data/mnt/deeper"), tree.path("data/mnt/inner")]
    );
    for record in sink.records() {
        assert_eq!(
            record.reason,
            RejectReason::DeviceMismatch {
                expected: Some(foreign.get()),
                actual: local.get(),
            }
        );
    }
}

#[test]
fn test_entries_outside_every_root_are_excluded() {
    let tree = TestTree::new().file("data/a", "").file("stray/b", "");
    let map = DeviceBoundaryMap::from_roots([tree.path("data")]).unwrap();
    let sink = RecordingSink::shared();
    let guard = DeviceBoundaryGuard::new(Arc::new(map)).with_sink(sink.clone());

    let entry = CandidateEntry::probe(tree.path("stray/b")).unwrap();
    assert!(guard.should_exclude(&entry));
    assert_eq!(
        sink.records()[0].reason,
        RejectReason::DeviceMismatch {
            expected: None,
            actual: entry.device.get(),
        }
    );
}

#[test]
fn test_scope_and_device_guards_compose() {
    let tree = TestTree::new().file("data/a", "").file("data/mnt/inner", "");
    let local = local_device(tree.root());
    let foreign = DeviceId::new(local.get().wrapping_add(1));
    let sink = RecordingSink::shared();

    let map =
        DeviceBoundaryMap::build([(tree.path("data"), local), (tree.path("data/mnt"), foreign)])
            .unwrap();
    let set = RejectSet::new()
        .with(
            BackupScopeGuard::from_path(tree.path("data"))
                .unwrap()
                .with_sink(sink.clone()),
        )
        .with(DeviceBoundaryGuard::new(Arc::new(map)).with_sink(sink.clone()));

    let report = scan_tree(&tree.path("data"), &set).unwrap();

    assert_eq!(report.excluded, vec![tree.path("data/mnt/inner")]);
    assert!(sink.items_from(GuardKind::BackupScope).is_empty());
    assert_eq!(sink.count(), 1);
}
