//! Configuration types for rampart.
//!
//! Every struct implements [`Default`] so that a bare `[section]` header in
//! TOML produces a working configuration. Scope paths are optional: a guard
//! is only installed when its scope is configured.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backup-time boundaries.
    pub backup: BackupSection,
    /// Restore-time boundaries.
    pub restore: RestoreSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// BackupSection
// ---------------------------------------------------------------------------

/// Backup-time boundary settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSection {
    /// Exclude every entry that resolves outside this directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_symlinks: Option<PathBuf>,
    /// Stay on the devices of the backup targets.
    pub one_file_system: bool,
    /// Extra roots whose devices are also allowed when `one_file_system` is
    /// set.
    pub allow_devices: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// RestoreSection
// ---------------------------------------------------------------------------

/// Restore-time boundary settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreSection {
    /// Refuse to create anything that would land outside this directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_symlinks: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["rampart_boundary=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
        }
    }
}
