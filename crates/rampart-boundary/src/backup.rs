//! Backup-time symlink scope guard.

use std::path::Path;
use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, GuardKind, RejectReason, Rejection, TracingSink};
use crate::entry::CandidateEntry;
use crate::error::BoundaryResult;
use crate::guard::Reject;
use crate::path::Containment;
use crate::scope::ScopeRoot;

/// Excludes live entries whose fully resolved location is outside a scope.
///
/// Resolution walks the whole ancestor chain, so this covers both an entry
/// that is itself a symlink pointing outside and an entry reached through
/// a symlinked ancestor directory. Entries that cannot be resolved are
/// excluded.
#[derive(Debug, Clone)]
pub struct BackupScopeGuard {
    scope: ScopeRoot,
    sink: Arc<dyn DiagnosticSink>,
}

impl BackupScopeGuard {
    /// Create a guard for a scope root.
    #[must_use]
    pub fn new(scope: ScopeRoot) -> Self {
        Self {
            scope,
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a guard from a scope path, resolving it first.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not resolve to a directory.
    pub fn from_path(scope: impl AsRef<Path>) -> BoundaryResult<Self> {
        ScopeRoot::canonical(scope).map(Self::new)
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

    /// Returns `true` if the entry at `path` must be excluded.
    #[must_use]
    pub fn excludes(&self, path: &Path) -> bool {
        match self.scope.contains(path) {
            Containment::Inside(_) => false,
            Containment::Outside(resolved) => {
                self.sink.record(
                    &Rejection::new(GuardKind::BackupScope, path, RejectReason::OutsideScope)
                        .with_target(resolved)
                        .with_scope(self.scope.as_path()),
                );
                true
            },
            Containment::Indeterminate(e) => {
                self.sink.record(
                    &Rejection::new(
                        GuardKind::BackupScope,
                        path,
                        RejectReason::Unresolvable {
                            error: e.to_string(),
                        },
                    )
                    .with_scope(self.scope.as_path()),
                );
                true
            },
        }
    }
}

impl Reject for BackupScopeGuard {
    fn should_exclude(&self, entry: &CandidateEntry) -> bool {
        self.excludes(&entry.path)
    }
}
