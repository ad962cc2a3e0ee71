//! Rampart Boundary - Scope and device guards for backup/restore walks.
//!
//! A tree walker consults these predicates once per entry to decide whether
//! the entry may be read into a backup or written out during a restore.
//! Decisions are made on the *effective* on-disk location of an entry, so a
//! symlink (or a symlinked ancestor directory) cannot smuggle data from
//! outside the configured scope, and a traversal cannot wander onto a
//! device that was never registered.
//!
//! # Key Concepts
//!
//! - **Scope root**: a canonical directory nothing may resolve outside of
//! - **Backup guard**: excludes live entries that resolve outside the scope
//! - **Restore guard**: refuses to recreate nodes that would land outside it
//! - **Device map**: longest-prefix registry of allowed device ids
//!
//! # Example
//!
//! ```rust,no_run
//! use rampart_boundary::{BackupScopeGuard, CandidateEntry, Reject, ScopeRoot};
//!
//! # fn main() -> rampart_boundary::BoundaryResult<()> {
//! let scope = ScopeRoot::canonical("/srv/data")?;
//! let guard = BackupScopeGuard::new(scope);
//!
//! let entry = CandidateEntry::probe("/srv/data/link").expect("entry exists");
//! if guard.should_exclude(&entry) {
//!     println!("skipping {}", entry.path.display());
//! }
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

pub mod backup;
pub mod device;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod guard;
pub mod path;
pub mod restore;
pub mod scope;

#[cfg(feature = "config")]
pub mod bridge;

pub use backup::BackupScopeGuard;
pub use device::{DeviceBoundaryGuard, DeviceBoundaryMap, DeviceId};
pub use diagnostics::{DiagnosticSink, GuardKind, RejectReason, Rejection, TracingSink};
pub use entry::{CandidateEntry, FileKind, RestoreNode};
pub use error::{BoundaryError, BoundaryResult};
pub use guard::{NodeFilter, NodeFilterSet, Reject, RejectSet};
pub use path::{Containment, Resolution};
pub use restore::RestoreScopeGuard;
pub use scope::ScopeRoot;
