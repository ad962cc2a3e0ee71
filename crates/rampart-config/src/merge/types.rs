use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// System-wide configuration (`/etc/rampart/config.toml`).
    System,
    /// User-level configuration (`~/.rampart/config.toml`).
    User,
    /// A file named explicitly by the caller.
    File(PathBuf),
    /// Environment variable fallback.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::System => write!(f, "system (/etc/rampart/config.toml)"),
            Self::User => write!(f, "user (~/.rampart/config.toml)"),
            Self::File(path) => write!(f, "file ({})", path.display()),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value.
pub type FieldSources = HashMap<String, ConfigLayer>;
