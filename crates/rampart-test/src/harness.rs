//! Walk harnesses and logging setup.
//!
//! [`scan_tree`] and [`scan_targets`] mimic a backup walker: every entry is
//! offered to a [`Reject`] before it is taken, and an excluded directory's
//! subtree is never entered. [`materialize`] mimics a restore walker that
//! recreates archived nodes top-down, asking a [`NodeFilter`] first.

use std::io;
use std::path::{Path, PathBuf};

use rampart_boundary::{CandidateEntry, FileKind, NodeFilter, Reject, RestoreNode};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Set up test logging with the given filter.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Outcome of a simulated backup walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Entries taken into the backup, in walk order.
    pub included: Vec<PathBuf>,
    /// Entries the rejector excluded, in walk order.
    pub excluded: Vec<PathBuf>,
}

impl ScanReport {
    /// Whether `path` was taken.
    #[must_use]
    pub fn is_included(&self, path: &Path) -> bool {
        self.included.iter().any(|p| p == path)
    }

    /// Whether `path` was offered and excluded.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|p| p == path)
    }

    /// Whether `path` was offered at all.
    #[must_use]
    pub fn was_visited(&self, path: &Path) -> bool {
        self.is_included(path) || self.is_excluded(path)
    }
}

/// Walk `root` without following symlinks, consulting `rejector` per entry.
///
/// # Errors
///
/// Returns an error if the walk cannot read a directory or an entry.
pub fn scan_tree(root: &Path, rejector: &dyn Reject) -> io::Result<ScanReport> {
    let mut report = ScanReport::default();
    scan_into(root, rejector, &mut report)?;
    Ok(report)
}

/// Walk each target in turn, the way a backup of several paths does.
///
/// # Errors
///
/// Returns an error if the walk cannot read a directory or an entry.
pub fn scan_targets<P: AsRef<Path>>(
    targets: &[P],
    rejector: &dyn Reject,
) -> io::Result<ScanReport> {
    let mut report = ScanReport::default();
    for target in targets {
        scan_into(target.as_ref(), rejector, &mut report)?;
    }
    Ok(report)
}

fn scan_into(root: &Path, rejector: &dyn Reject, report: &mut ScanReport) -> io::Result<()> {
    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(io::Error::other)?;
        let metadata = entry.metadata().map_err(io::Error::other)?;

        let mut candidate = CandidateEntry::from_metadata(entry.path(), &metadata);
        if candidate.kind == FileKind::Symlink {
            candidate.link_target = Some(std::fs::read_link(entry.path())?);
        }

        if rejector.should_exclude(&candidate) {
            report.excluded.push(candidate.path);
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
        } else {
            report.included.push(candidate.path);
        }
    }

    Ok(())
}

/// Outcome of a simulated restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Nodes written to disk, in order.
    pub created: Vec<PathBuf>,
    /// Nodes the filter refused, in order.
    pub skipped: Vec<PathBuf>,
}

/// Recreate `nodes` in order, skipping whatever `filter` refuses.
///
/// Nodes must be listed parents first. Regular files are written empty,
/// directories are created with their parents, and symlinks are created
/// with their recorded target verbatim.
///
/// # Errors
///
/// Returns an error if an allowed node cannot be created.
pub fn materialize(
    nodes: &[(PathBuf, RestoreNode)],
    filter: &dyn NodeFilter,
) -> io::Result<RestoreReport> {
    let mut report = RestoreReport::default();

    for (path, node) in nodes {
        if !filter.allows(path, node) {
            report.skipped.push(path.clone());
            continue;
        }

        match node.kind {
            FileKind::Directory => std::fs::create_dir_all(path)?,
            FileKind::Symlink => create_symlink(path, node.link_target.as_deref())?,
            FileKind::Regular | FileKind::Other => std::fs::write(path, b"")?,
        }
        report.created.push(path.clone());
    }

    Ok(report)
}

#[cfg(unix)]
fn create_symlink(path: &Path, target: Option<&Path>) -> io::Result<()> {
    let target = target.ok_or_else(|| io::Error::other("symlink node without target"))?;
    std::os::unix::fs::symlink(target, path)
}

#[cfg(not(unix))]
fn create_symlink(_path: &Path, _target: Option<&Path>) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only restored on unix",
    ))
}
