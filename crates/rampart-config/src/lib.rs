#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Layered configuration for rampart.
//!
//! A single [`Config`] type carries the backup scope, the one-file-system
//! switch, the restore scope and the logging setup.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rampart_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! if let Some(scope) = &resolved.config.backup.scope_symlinks {
//!     println!("backup scope: {}", scope.display());
//! }
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** passed by the caller
//! 2. **User** (`~/.rampart/config.toml`)
//! 3. **System** (`/etc/rampart/config.toml`)
//! 4. **Environment variables** (`RAMPART_*`), fallback only
//! 5. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! # Design
//!
//! This crate has no dependencies on other internal rampart crates. Guards
//! are built from these types by the `config` feature of
//! `rampart-boundary`.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with source tracking.
pub mod merge;
/// Resolved configuration display and serialization.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(config_file: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(config_file, None)
    }

    /// Load configuration with an explicit rampart home directory.
    ///
    /// The user layer is read from `{rampart_home}/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        config_file: Option<&std::path::Path>,
        rampart_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(config_file, Some(rampart_home))
    }

    /// Load a single file without layering.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed or
    /// validated.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
