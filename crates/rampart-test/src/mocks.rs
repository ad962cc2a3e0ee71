//! Mock implementations for testing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rampart_boundary::{DiagnosticSink, GuardKind, Rejection};

/// Diagnostics sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Rejection>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sink behind an `Arc`, ready to hand to a guard.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of every record so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn records(&self) -> Vec<Rejection> {
        self.records.lock().expect("sink lock poisoned").clone()
    }

    /// Number of records so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records().len()
    }

    /// Item paths of every record produced by `guard`.
    #[must_use]
    pub fn items_from(&self, guard: GuardKind) -> Vec<PathBuf> {
        self.records()
            .into_iter()
            .filter(|r| r.guard == guard)
            .map(|r| r.item)
            .collect()
    }

    /// Render every record as one JSON object per line.
    ///
    /// # Panics
    ///
    /// Panics if a record cannot be serialized.
    #[must_use]
    pub fn to_json_lines(&self) -> String {
        self.records()
            .iter()
            .map(|r| serde_json::to_string(r).expect("rejection serializes"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop every record.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn clear(&self) {
        self.records.lock().expect("sink lock poisoned").clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, rejection: &Rejection) {
        self.records
            .lock()
            .expect("sink lock poisoned")
            .push(rejection.clone());
    }
}
