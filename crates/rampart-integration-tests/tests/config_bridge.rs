//! From a config file on disk to running guards.

use std::path::Path;
use std::sync::Arc;

use rampart_boundary::bridge::{backup_rejector, restore_filter};
use rampart_config::merge::ConfigLayer;
use rampart_config::{Config, ConfigError, ShowFormat};
use rampart_telemetry::{LogConfig, LogFormat};
use rampart_test::prelude::*;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("rampart.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_config_file_drives_guards_and_logging() {
    let tree = TestTree::new()
        .file("data/keep", "")
        .file("outside/secret", "")
        .dir("home");
    let config_path = write_config(
        tree.root(),
        &format!(
            r#"
[backup]
scope_symlinks = '{data}'
one_file_system = true

[restore]
scope_symlinks = '{restore}'

[logging]
level = "debug"
format = "json"
directives = ["rampart_boundary=trace"]
"#,
            data = tree.path("data").display(),
            restore = tree.path("restore").display(),
        ),
    );

    let resolved =
        Config::load_with_home(Some(config_path.as_path()), &tree.path("home")).unwrap();
    assert!(matches!(
        resolved.source_of("backup.scope_symlinks"),
        Some(ConfigLayer::File(path)) if path == &config_path
    ));

    let sink = RecordingSink::shared();
    let dyn_sink: Arc<dyn DiagnosticSink> = sink.clone();

    let rejector = backup_rejector(&resolved.config.backup, &[tree.root()], &dyn_sink).unwrap();
    assert_eq!(rejector.len(), 2);
    let report = scan_targets(&[tree.path("data"), tree.path("outside")], &rejector).unwrap();
    assert!(report.is_included(&tree.path("data/keep")));
    assert!(report.is_excluded(&tree.path("outside")));
    assert!(!report.was_visited(&tree.path("outside/secret")));

    let filter = restore_filter(&resolved.config.restore, &dyn_sink).unwrap();
    assert!(filter.allows(&tree.path("restore/file"), &RestoreNode::file()));
    assert!(!filter.allows(&tree.path("restore/link"), &RestoreNode::symlink("/etc")));

    assert_eq!(
        sink.items_from(GuardKind::BackupScope),
        vec![tree.path("outside")]
    );
    assert_eq!(
        sink.items_from(GuardKind::RestoreScope),
        vec![tree.path("restore/link")]
    );
    assert!(!sink.to_json_lines().is_empty());

    let log = LogConfig::from(&resolved.config.logging);
    assert_eq!(log.level, "debug");
    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.directives, vec!["rampart_boundary=trace"]);
}

#[test]
fn test_defaults_install_no_guards() {
    let tree = TestTree::new().dir("home");
    let resolved = Config::load_with_home(None, &tree.path("home")).unwrap();
    let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);

    let rejector = backup_rejector(&resolved.config.backup, &[tree.root()], &sink).unwrap();
    let filter = restore_filter(&resolved.config.restore, &sink).unwrap();

    assert!(rejector.is_empty());
    assert!(filter.is_empty());
}

#[test]
fn test_rendered_config_names_its_source() {
    let tree = TestTree::new().dir("home");
    let config_path = write_config(tree.root(), "[backup]\none_file_system = true\n");

    let resolved =
        Config::load_with_home(Some(config_path.as_path()), &tree.path("home")).unwrap();
    let rendered = resolved.render(ShowFormat::Toml).unwrap();

    assert!(rendered.contains("one_file_system = true"));
    assert!(rendered.contains("# Sources:"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let tree = TestTree::new().dir("home");
    let missing = tree.path("absent.toml");
    let result = Config::load_with_home(Some(missing.as_path()), &tree.path("home"));

    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn test_missing_scope_directory_fails_backup_setup() {
    let tree = TestTree::new().dir("home");
    let config_path = write_config(
        tree.root(),
        &format!(
            "[backup]\nscope_symlinks = '{}'\n",
            tree.path("nowhere").display()
        ),
    );

    let resolved =
        Config::load_with_home(Some(config_path.as_path()), &tree.path("home")).unwrap();
    let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
    let none: [&Path; 0] = [];

    assert!(matches!(
        backup_rejector(&resolved.config.backup, &none, &sink),
        Err(BoundaryError::ScopeUnresolvable { .. })
    ));
}
