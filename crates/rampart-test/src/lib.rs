//! Rampart Test - Shared test utilities for the boundary guards.
//!
//! This crate provides on-disk tree fixtures, a recording diagnostics sink
//! and small backup/restore walkers that drive the guards the way a real
//! walker would.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! rampart-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use rampart_test::prelude::*;
//!
//! #[test]
//! fn test_escape_is_excluded() {
//!     let tree = TestTree::new().dir("scope").symlink("scope/up", "..");
//!     let sink = RecordingSink::shared();
//!     let guard = BackupScopeGuard::from_path(tree.path("scope"))
//!         .unwrap()
//!         .with_sink(sink.clone());
//!
//!     let report = scan_tree(&tree.path("scope"), &guard).unwrap();
//!     assert!(report.is_excluded(&tree.path("scope/up")));
//!     assert_eq!(sink.count(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
