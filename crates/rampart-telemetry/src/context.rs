//! Per-run context for correlating guard diagnostics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Which kind of walk a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Reading a live tree into a backup.
    Backup,
    /// Writing archived nodes back to disk.
    Restore,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backup => write!(f, "backup"),
            Self::Restore => write!(f, "restore"),
        }
    }
}

/// Context for one backup or restore invocation.
///
/// Every rejection logged inside [`RunContext::span`] carries the run id,
/// so diagnostics from concurrent walkers can be told apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Operation being performed.
    pub operation: Operation,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Active scope, if a scope guard is installed.
    pub scope: Option<PathBuf>,
}

impl RunContext {
    /// Create a context for a new run.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            operation,
            started_at: Utc::now(),
            scope: None,
        }
    }

    /// Record the active scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<PathBuf>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Time elapsed since the run started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.started_at)
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// Create a tracing span carrying this context.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        let scope = self.scope.as_ref().map(|p| p.display().to_string());
        tracing::info_span!(
            "run",
            run_id = %self.short_id(),
            operation = %self.operation,
            scope = scope.as_deref(),
        )
    }

    /// First eight hex digits of the run id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.run_id.simple().to_string().chars().take(8).collect()
    }
}

/// Keeps a run's span entered and logs when the run ends.
pub struct RunGuard {
    context: RunContext,
    _span: tracing::span::EnteredSpan,
}

impl RunGuard {
    /// Enter the run's span.
    #[must_use]
    pub fn new(context: RunContext) -> Self {
        let span = context.span().entered();
        tracing::info!("run started");
        Self {
            context,
            _span: span,
        }
    }

    /// The run context.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        tracing::info!(elapsed_ms = self.context.elapsed_ms(), "run completed");
    }
}

impl fmt::Debug for RunGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunGuard")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_context_creation() {
        let ctx = RunContext::new(Operation::Restore).with_scope("/restore/data");
        assert_eq!(ctx.operation, Operation::Restore);
        assert_eq!(ctx.scope, Some(PathBuf::from("/restore/data")));
        assert_ne!(ctx.run_id, RunContext::new(Operation::Restore).run_id);
    }

    #[test]
    fn test_elapsed() {
        let ctx = RunContext::new(Operation::Backup);
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed_ms() >= 10);
    }

    #[test]
    fn test_short_id() {
        let ctx = RunContext::new(Operation::Backup);
        let short = ctx.short_id();
        assert_eq!(short.len(), 8);
        assert!(ctx.run_id.simple().to_string().starts_with(&short));
    }

    #[test]
    fn test_serialization() {
        let ctx = RunContext::new(Operation::Backup).with_scope("/srv/data");

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"operation\":\"backup\""));
        assert!(json.contains("\"scope\":\"/srv/data\""));

        let parsed: RunContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, ctx.run_id);
    }

    #[test]
    fn test_guard_exposes_context() {
        let guard = RunGuard::new(RunContext::new(Operation::Backup));
        assert_eq!(guard.context().operation, Operation::Backup);
        assert!(format!("{guard:?}").starts_with("RunGuard"));
    }
}
