//! Restore-time symlink scope guard.
//!
//! A restore recreates nodes top-down, so by the time a node is considered
//! its parent directory has usually been materialized already. That parent
//! may itself be a symlink created earlier in the same restore, planted to
//! redirect everything below it. The guard therefore resolves the parent on
//! disk before deciding, then checks the node's own target lexically (a
//! symlink's target does not exist yet and must not be followed).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, GuardKind, RejectReason, Rejection, TracingSink};
use crate::entry::{FileKind, RestoreNode};
use crate::error::BoundaryResult;
use crate::guard::NodeFilter;
use crate::path::{self, Resolution};
use crate::scope::ScopeRoot;

/// Refuses to recreate nodes that would land outside a scope.
#[derive(Debug, Clone)]
pub struct RestoreScopeGuard {
    scope: ScopeRoot,
    sink: Arc<dyn DiagnosticSink>,
}

impl RestoreScopeGuard {
    /// Create a guard for a scope root.
    #[must_use]
    pub fn new(scope: ScopeRoot) -> Self {
        Self {
            scope,
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a guard from a scope path that may not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing part of the path cannot be resolved.
    pub fn from_path(scope: impl AsRef<Path>) -> BoundaryResult<Self> {
        ScopeRoot::prospective(scope).map(Self::new)
    }

    /// Route rejection records to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The scope this guard enforces.
    #[must_use]
    pub fn scope(&self) -> &ScopeRoot {
        &self.scope
    }

    /// Returns `true` if `node` may be created at `item`.
    #[must_use]
    pub fn allows(&self, item: &Path, node: &RestoreNode) -> bool {
        match self.check(item, node) {
            Ok(()) => true,
            Err(rejection) => {
                self.sink.record(&rejection.with_scope(self.scope.as_path()));
                false
            },
        }
    }

    fn check(&self, item: &Path, node: &RestoreNode) -> Result<(), Rejection> {
        let scope = self.scope.as_path();
        let item = path::lexical_clean(item);
        let dest_dir = item
            .parent()
            .map_or_else(|| item.clone(), Path::to_path_buf);

        let effective_dir = self.effective_dir(&item, dest_dir)?;

        if node.kind == FileKind::Symlink {
            let Some(link_target) = node.link_target.as_deref() else {
                return Err(Rejection::new(
                    GuardKind::RestoreScope,
                    &item,
                    RejectReason::MissingLinkTarget,
                ));
            };

            let mut target = path::lexical_clean(link_target);
            if target.is_relative() {
                target = path::lexical_clean(&effective_dir.join(&target));
            }
            if !path::is_within(&target, scope) {
                return Err(Rejection::new(
                    GuardKind::RestoreScope,
                    &item,
                    RejectReason::OutsideScope,
                )
                .with_target(target));
            }
        } else {
            let target = match item.file_name() {
                Some(name) => effective_dir.join(name),
                None => effective_dir,
            };
            if !path::is_compatible(&target, scope) {
                return Err(Rejection::new(
                    GuardKind::RestoreScope,
                    &item,
                    RejectReason::OutsideScope,
                )
                .with_target(target));
            }
        }

        Ok(())
    }

    /// Resolve the destination directory as it exists on disk right now.
    fn effective_dir(&self, item: &Path, dest_dir: PathBuf) -> Result<PathBuf, Rejection> {
        match path::resolve_existing(&dest_dir) {
            Resolution::Resolved(resolved) => {
                if resolved != dest_dir && !path::is_compatible(&resolved, self.scope.as_path()) {
                    return Err(Rejection::new(
                        GuardKind::RestoreScope,
                        item,
                        RejectReason::AncestorOutsideScope,
                    )
                    .with_target(resolved));
                }
                Ok(resolved)
            },
            Resolution::Indeterminate(e) => Err(Rejection::new(
                GuardKind::RestoreScope,
                item,
                RejectReason::Unresolvable {
                    error: e.to_string(),
                },
            )
            .with_target(dest_dir)),
        }
    }
}

impl NodeFilter for RestoreScopeGuard {
    fn allows(&self, item: &Path, node: &RestoreNode) -> bool {
        RestoreScopeGuard::allows(self, item, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, RestoreScopeGuard) {
        let dir = TempDir::new().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let guard = RestoreScopeGuard::from_path(base.join("target/data/scope")).unwrap();
        (dir, base, guard)
    }

    #[test]
    fn test_scope_ancestors_and_scope_are_allowed() {
        let (_dir, base, guard) = setup();

        assert!(guard.allows(&base.join("target"), &RestoreNode::dir()));
        assert!(guard.allows(&base.join("target/data"), &RestoreNode::dir()));
        assert!(guard.allows(&base.join("target/data/scope"), &RestoreNode::dir()));
        assert!(guard.allows(&base.join("target/data/scope/file"), &RestoreNode::file()));
    }

    #[test]
    fn test_siblings_outside_scope_are_rejected() {
        let (_dir, base, guard) = setup();

        assert!(!guard.allows(&base.join("target/data/file"), &RestoreNode::file()));
        assert!(!guard.allows(&base.join("target/data/scope2"), &RestoreNode::dir()));
    }

    #[test]
    fn test_symlink_targets_are_normalized() {
        let (_dir, base, guard) = setup();
        let scope = base.join("target/data/scope");

        // relative, resolved against the destination directory
        assert!(guard.allows(&scope.join("a/link"), &RestoreNode::symlink("../b")));
        assert!(!guard.allows(&scope.join("link"), &RestoreNode::symlink("./..")));
        assert!(!guard.allows(&scope.join("link"), &RestoreNode::symlink("sub/../../x")));

        // absolute
        assert!(guard.allows(&scope.join("link"), &RestoreNode::symlink(scope.join("x/y"))));
        assert!(guard.allows(&scope.join("link"), &RestoreNode::symlink(&scope)));
        assert!(!guard.allows(&scope.join("link"), &RestoreNode::symlink("/")));
        assert!(!guard.allows(&scope.join("link"), &RestoreNode::symlink("/var")));
        assert!(!guard.allows(
            &scope.join("link"),
            &RestoreNode::symlink(scope.join("../../..")),
        ));
    }

    #[test]
    fn test_symlink_to_scope_ancestor_is_rejected() {
        let (_dir, base, guard) = setup();

        // the non-symlink test is bidirectional, the symlink test is not
        assert!(!guard.allows(
            &base.join("target/data/link"),
            &RestoreNode::symlink(base.join("target/data")),
        ));
    }

    #[test]
    fn test_symlink_without_target_is_rejected() {
        let (_dir, base, guard) = setup();
        let node = RestoreNode {
            kind: FileKind::Symlink,
            link_target: None,
        };

        assert!(!guard.allows(&base.join("target/data/scope/link"), &node));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_ancestor_outside_scope_rejects_descendants() {
        let (_dir, base, guard) = setup();
        let scope = base.join("target/data/scope");
        std::fs::create_dir_all(&scope).unwrap();
        std::fs::create_dir_all(base.join("elsewhere")).unwrap();
        // a previously restored symlink that redirects its children
        std::os::unix::fs::symlink(base.join("elsewhere"), scope.join("trap")).unwrap();

        assert!(!guard.allows(&scope.join("trap/file"), &RestoreNode::file()));
        assert!(!guard.allows(&scope.join("trap/dir"), &RestoreNode::dir()));
        assert!(!guard.allows(&scope.join("trap/dir/deeper"), &RestoreNode::file()));
        assert!(!guard.allows(&scope.join("trap/link"), &RestoreNode::symlink("x")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_ancestor_inside_scope_is_followed() {
        let (_dir, base, guard) = setup();
        let scope = base.join("target/data/scope");
        std::fs::create_dir_all(scope.join("real")).unwrap();
        std::os::unix::fs::symlink(scope.join("real"), scope.join("alias")).unwrap();

        assert!(guard.allows(&scope.join("alias/file"), &RestoreNode::file()));
        // relative target is resolved against the real directory
        assert!(guard.allows(&scope.join("alias/link"), &RestoreNode::symlink("../x")));
        assert!(!guard.allows(&scope.join("alias/link"), &RestoreNode::symlink("../../x")));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_ancestor_is_rejected() {
        let (_dir, base, guard) = setup();
        let scope = base.join("target/data/scope");
        std::fs::create_dir_all(&scope).unwrap();
        std::os::unix::fs::symlink(scope.join("gone"), scope.join("broken")).unwrap();

        assert!(!guard.allows(&scope.join("broken/file"), &RestoreNode::file()));
    }

    #[cfg(unix)]
    #[test]
    fn test_decisions_are_idempotent() {
        let (_dir, base, guard) = setup();
        let scope = base.join("target/data/scope");
        std::fs::create_dir_all(&scope).unwrap();
        std::fs::create_dir_all(base.join("elsewhere")).unwrap();
        std::os::unix::fs::symlink(base.join("elsewhere"), scope.join("trap")).unwrap();

        let cases = [
            (scope.join("file"), RestoreNode::file()),
            (base.join("target/data/file"), RestoreNode::file()),
            (scope.join("link"), RestoreNode::symlink("./..")),
            (scope.join("link"), RestoreNode::symlink("x/y")),
            (scope.join("trap/file"), RestoreNode::file()),
            (scope.join("trap/link"), RestoreNode::symlink("x")),
        ];
        for (item, node) in &cases {
            let first = guard.allows(item, node);
            assert_eq!(guard.allows(item, node), first, "{}", item.display());
        }
        assert!(!guard.allows(&scope.join("trap/file"), &RestoreNode::file()));
    }

    #[test]
    fn test_filter_trait_delegates() {
        let (_dir, base, guard) = setup();
        let filter: &dyn NodeFilter = &guard;

        assert!(filter.allows(&base.join("target/data/scope/f"), &RestoreNode::file()));
        assert!(!filter.allows(&base.join("f"), &RestoreNode::file()));
    }
}
