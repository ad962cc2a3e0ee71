//! Prelude module - commonly used types for convenient import.
//!
//! Use `use rampart_boundary::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use rampart_boundary::prelude::*;
//!
//! # fn main() -> BoundaryResult<()> {
//! let guard = RestoreScopeGuard::new(ScopeRoot::prospective("/restore/data")?);
//! let allowed = guard.allows(
//!     std::path::Path::new("/restore/data/link"),
//!     &RestoreNode::symlink("../outside"),
//! );
//! assert!(!allowed);
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{BoundaryError, BoundaryResult};

// Scope and entries
pub use crate::{CandidateEntry, FileKind, RestoreNode, ScopeRoot};

// Guards
pub use crate::{BackupScopeGuard, DeviceBoundaryGuard, RestoreScopeGuard};

// Predicate traits and composition
pub use crate::{NodeFilter, NodeFilterSet, Reject, RejectSet};

// Device registry
pub use crate::{DeviceBoundaryMap, DeviceId};

// Diagnostics
pub use crate::{DiagnosticSink, GuardKind, RejectReason, Rejection, TracingSink};
