//! Boundary construction errors.
//!
//! Per-entry outcomes are never errors: an entry that cannot be resolved is
//! simply rejected. These variants cover setup-time failures that must abort
//! the run before any entry is walked.

use thiserror::Error;

/// Errors raised while building scope roots or device registries.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The scope path was empty.
    #[error("scope path is empty")]
    EmptyScope,

    /// The scope path could not be made absolute.
    #[error("cannot make scope path absolute: {path}")]
    ScopeNotAbsolute {
        /// The offending scope path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The scope path (or its existing ancestor) could not be resolved.
    #[error("cannot resolve scope root {path}: {source}")]
    ScopeUnresolvable {
        /// The scope path as given
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The scope path resolved to something other than a directory.
    #[error("scope root is not a directory: {path}")]
    ScopeNotDirectory {
        /// The resolved scope path
        path: String,
    },

    /// No device boundaries were registered.
    #[error("device registry is empty")]
    EmptyDeviceMap,

    /// A device boundary path was relative.
    #[error("device boundary path must be absolute: {path}")]
    RelativeDevicePath {
        /// The relative path
        path: String,
    },

    /// The same path was registered with two different device ids.
    #[error("conflicting device ids for {path}: {first} and {second}")]
    ConflictingDevice {
        /// The registered path
        path: String,
        /// First device id seen
        first: u64,
        /// Second device id seen
        second: u64,
    },

    /// A device boundary root could not be inspected.
    #[error("cannot stat device boundary root {path}: {source}")]
    DeviceProbe {
        /// The root path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for boundary construction.
pub type BoundaryResult<T> = Result<T, BoundaryError>;
