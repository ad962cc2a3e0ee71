//! Rejection diagnostics.
//!
//! Every guard reports each rejection exactly once through a
//! [`DiagnosticSink`]. Sinks are purely observational: what they do with a
//! record has no effect on the decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which guard produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    /// Backup-time symlink scope guard.
    BackupScope,
    /// Restore-time symlink scope guard.
    RestoreScope,
    /// Device boundary guard.
    DeviceBoundary,
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackupScope => write!(f, "backup_scope"),
            Self::RestoreScope => write!(f, "restore_scope"),
            Self::DeviceBoundary => write!(f, "device_boundary"),
        }
    }
}

/// Why an entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// The entry's location could not be determined.
    Unresolvable {
        /// Resolution error message.
        error: String,
    },
    /// The entry resolves outside the scope.
    OutsideScope,
    /// An already-materialized ancestor is a symlink leading out of scope.
    AncestorOutsideScope,
    /// A symlink node carried no link target.
    MissingLinkTarget,
    /// The entry lives on a device that is not allowed at its location.
    DeviceMismatch {
        /// Device expected at the nearest registered ancestor, if any.
        expected: Option<u64>,
        /// Device the entry actually lives on.
        actual: u64,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolvable { error } => write!(f, "unresolvable: {error}"),
            Self::OutsideScope => write!(f, "outside scope"),
            Self::AncestorOutsideScope => write!(f, "ancestor outside scope"),
            Self::MissingLinkTarget => write!(f, "symlink without target"),
            Self::DeviceMismatch {
                expected: Some(expected),
                actual,
            } => write!(f, "device {actual} where {expected} was expected"),
            Self::DeviceMismatch {
                expected: None,
                actual,
            } => write!(f, "device {actual} below no registered boundary"),
        }
    }
}

/// One rejection decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Guard that rejected the entry.
    pub guard: GuardKind,
    /// Item path as handed to the guard.
    pub item: PathBuf,
    /// Resolved or computed target, when one was determined.
    #[serde(default)]
    pub target: Option<PathBuf>,
    /// Active scope, for scope guards.
    #[serde(default)]
    pub scope: Option<PathBuf>,
    /// Reason for the rejection.
    pub reason: RejectReason,
}

impl Rejection {
    /// Create a rejection record.
    #[must_use]
    pub fn new(guard: GuardKind, item: impl Into<PathBuf>, reason: RejectReason) -> Self {
        Self {
            guard,
            item: item.into(),
            target: None,
            scope: None,
            reason,
        }
    }

    /// Set the resolved target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the active scope.
    #[must_use]
    pub fn with_scope(mut self, scope: &Path) -> Self {
        self.scope = Some(scope.to_path_buf());
        self
    }
}

/// Receiver for rejection records.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    /// Record one rejection.
    fn record(&self, rejection: &Rejection);
}

/// Default sink: one `debug` event per rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, rejection: &Rejection) {
        let resolved = rejection.target.as_ref().map(|p| p.display().to_string());
        let scope = rejection.scope.as_ref().map(|p| p.display().to_string());
        debug!(
            guard = %rejection.guard,
            item = %rejection.item.display(),
            resolved = resolved.as_deref(),
            scope = scope.as_deref(),
            reason = %rejection.reason,
            "entry rejected"
        );
    }
}
