//! Rampart Telemetry - Logging and run correlation for backup and restore.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats and targets
//! - A per-run context whose span tags every guard diagnostic
//!
//! # Example
//!
//! ```rust,no_run
//! use rampart_telemetry::{LogConfig, LogFormat, Operation, RunContext, RunGuard, setup_logging};
//!
//! # fn main() -> Result<(), rampart_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("rampart_boundary=debug");
//!
//! setup_logging(&config)?;
//!
//! let _run = RunGuard::new(RunContext::new(Operation::Backup).with_scope("/srv/data"));
//! tracing::info!("walking");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

#[cfg(feature = "config")]
mod bridge;
mod context;
mod error;
mod logging;

pub use context::{Operation, RunContext, RunGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
