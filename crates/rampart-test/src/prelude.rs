//! Prelude module - test helpers plus the boundary types they drive.

pub use crate::{
    RecordingSink, RestoreReport, ScanReport, TestTree, materialize, scan_targets, scan_tree,
    setup_test_logging,
};

pub use rampart_boundary::prelude::*;
