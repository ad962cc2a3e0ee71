//! Guard construction from loaded configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rampart_config::{BackupSection, RestoreSection};
use tracing::info;

use crate::backup::BackupScopeGuard;
use crate::device::{DeviceBoundaryGuard, DeviceBoundaryMap};
use crate::diagnostics::DiagnosticSink;
use crate::error::BoundaryResult;
use crate::guard::{NodeFilterSet, RejectSet};
use crate::restore::RestoreScopeGuard;

/// Build the backup rejection set described by `section`.
///
/// `targets` are the paths being backed up; with `one_file_system` set their
/// devices, plus those of `allow_devices`, form the device registry. The
/// scope guard runs first.
///
/// # Errors
///
/// Returns an error if the scope cannot be resolved or a device root cannot
/// be inspected.
pub fn backup_rejector<P: AsRef<Path>>(
    section: &BackupSection,
    targets: &[P],
    sink: &Arc<dyn DiagnosticSink>,
) -> BoundaryResult<RejectSet> {
    let mut set = RejectSet::new();

    if let Some(scope) = &section.scope_symlinks {
        let guard = BackupScopeGuard::from_path(scope)?.with_sink(Arc::clone(sink));
        info!(scope = %guard.scope(), "backup scope guard enabled");
        set.push(guard);
    }

    if section.one_file_system {
        let roots = targets
            .iter()
            .map(AsRef::<Path>::as_ref)
            .chain(section.allow_devices.iter().map(PathBuf::as_path));
        let map = DeviceBoundaryMap::from_roots(roots)?;
        info!(checkpoints = map.len(), "device boundary guard enabled");
        set.push(DeviceBoundaryGuard::new(Arc::new(map)).with_sink(Arc::clone(sink)));
    }

    Ok(set)
}

/// Build the restore node filter described by `section`.
///
/// # Errors
///
/// Returns an error if an existing part of the scope cannot be resolved.
pub fn restore_filter(
    section: &RestoreSection,
    sink: &Arc<dyn DiagnosticSink>,
) -> BoundaryResult<NodeFilterSet> {
    let mut set = NodeFilterSet::new();

    if let Some(scope) = &section.scope_symlinks {
        let guard = RestoreScopeGuard::from_path(scope)?.with_sink(Arc::clone(sink));
        info!(scope = %guard.scope(), "restore scope guard enabled");
        set.push(guard);
    }

    Ok(set)
}
