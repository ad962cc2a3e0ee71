//! Device boundary registry and one-file-system guard.
//!
//! The registry maps checkpoint directories to the device id expected at
//! and below them. A lookup consults the longest registered ancestor of a
//! path, so a nested mount anywhere under a checkpoint is caught even
//! though it was never registered itself.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::diagnostics::{DiagnosticSink, GuardKind, RejectReason, Rejection, TracingSink};
use crate::entry::{CandidateEntry, device_of};
use crate::error::{BoundaryError, BoundaryResult};
use crate::guard::Reject;
use crate::path;

/// Opaque identifier of the filesystem holding an entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Wrap a raw device number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw device number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for DeviceId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable longest-prefix registry of allowed device ids.
///
/// Keys are stored as component sequences sorted lexicographically, so
/// every ancestor prefix of a query can be looked up with a binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBoundaryMap {
    entries: Vec<(Vec<OsString>, DeviceId)>,
}

impl DeviceBoundaryMap {
    /// Build a registry from `(path, device)` pairs.
    ///
    /// Paths are cleaned lexically. Registering the same path twice with the
    /// same id is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if no pairs are given, a path is relative, or one
    /// path is registered with two different ids.
    pub fn build<I, P>(pairs: I) -> BoundaryResult<Self>
    where
        I: IntoIterator<Item = (P, DeviceId)>,
        P: AsRef<Path>,
    {
        let mut entries = Vec::new();
        for (path, device) in pairs {
            let path = path.as_ref();
            if !path.is_absolute() {
                return Err(BoundaryError::RelativeDevicePath {
                    path: path.display().to_string(),
                });
            }
            entries.push((components(&path::lexical_clean(path)), device));
        }
        if entries.is_empty() {
            return Err(BoundaryError::EmptyDeviceMap);
        }

        entries.sort();
        for pair in entries.windows(2) {
            let [(a, first), (b, second)] = pair else {
                continue;
            };
            if a == b && first != second {
                return Err(BoundaryError::ConflictingDevice {
                    path: join(a).display().to_string(),
                    first: first.get(),
                    second: second.get(),
                });
            }
        }
        entries.dedup();

        debug!(checkpoints = entries.len(), "built device boundary map");
        Ok(Self { entries })
    }

    /// Build a registry by inspecting each root on disk.
    ///
    /// Relative roots are made absolute against the current working
    /// directory. The device id is taken from `lstat`, so a root that is
    /// itself a symlink records the device holding the link.
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be inspected or `roots` is empty.
    pub fn from_roots<I, P>(roots: I) -> BoundaryResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut pairs = Vec::new();
        for root in roots {
            let root = root.as_ref();
            let absolute = std::path::absolute(root)
                .map(|p| path::lexical_clean(&p))
                .map_err(|source| BoundaryError::DeviceProbe {
                    path: root.display().to_string(),
                    source,
                })?;
            let metadata = std::fs::symlink_metadata(&absolute).map_err(|source| {
                BoundaryError::DeviceProbe {
                    path: absolute.display().to_string(),
                    source,
                }
            })?;
            pairs.push((absolute, device_of(&metadata)));
        }
        Self::build(pairs)
    }

    /// Device id recorded at the longest registered ancestor of `item`.
    #[must_use]
    pub fn expected_device(&self, item: &Path) -> Option<DeviceId> {
        let query = components(&path::lexical_clean(item));
        (1..=query.len()).rev().find_map(|len| {
            let prefix = &query[..len];
            self.entries
                .binary_search_by(|(key, _)| key.as_slice().cmp(prefix))
                .ok()
                .and_then(|idx| self.entries.get(idx))
                .map(|(_, device)| *device)
        })
    }

    /// Whether an entry at `item` on `device` stays within the registered
    /// boundaries.
    ///
    /// A path below no registered checkpoint is never allowed. The lookup
    /// emits no events; rejections are reported by the guard's sink.
    #[must_use]
    pub fn is_allowed(&self, item: &Path, device: DeviceId) -> bool {
        self.expected_device(item) == Some(device)
    }

    /// Number of registered checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a successfully built registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered checkpoints in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (PathBuf, DeviceId)> + '_ {
        self.entries.iter().map(|(key, device)| (join(key), *device))
    }
}

fn components(path: &Path) -> Vec<OsString> {
    path.components()
        .map(|c| c.as_os_str().to_os_string())
        .collect()
}

fn join(parts: &[OsString]) -> PathBuf {
    parts.iter().collect()
}

/// Excludes entries that live on an unregistered device.
///
/// A directory on a foreign device whose parent is still on an allowed
/// device is a mountpoint: the directory itself is kept, and its children
/// are excluded when the walker reaches them.
#[derive(Debug, Clone)]
pub struct DeviceBoundaryGuard {
    map: Arc<DeviceBoundaryMap>,
    sink: Arc<dyn DiagnosticSink>,
}

impl DeviceBoundaryGuard {
    /// Create a guard over a shared registry.
    #[must_use]
    pub fn new(map: Arc<DeviceBoundaryMap>) -> Self {
        Self {
            map,
            sink: Arc::new(TracingSink),
        }
    }

    /// Route rejection records to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The registry this guard consults.
    #[must_use]
    pub fn map(&self) -> &DeviceBoundaryMap {
        &self.map
    }

    fn is_mountpoint(&self, item: &Path) -> Result<bool, Rejection> {
        let Some(parent) = item.parent() else {
            return Ok(false);
        };
        match std::fs::symlink_metadata(parent) {
            Ok(metadata) => Ok(self.map.is_allowed(parent, device_of(&metadata))),
            Err(e) => Err(Rejection::new(
                GuardKind::DeviceBoundary,
                item,
                RejectReason::Unresolvable {
                    error: e.to_string(),
                },
            )
            .with_target(parent)),
        }
    }
}

impl Reject for DeviceBoundaryGuard {
    fn should_exclude(&self, entry: &CandidateEntry) -> bool {
        let item = path::lexical_clean(&entry.path);
        if self.map.is_allowed(&item, entry.device) {
            return false;
        }

        if entry.kind.is_dir() {
            match self.is_mountpoint(&item) {
                Ok(true) => return false,
                Ok(false) => {},
                Err(rejection) => {
                    self.sink.record(&rejection);
                    return true;
                },
            }
        }

        self.sink.record(&Rejection::new(
            GuardKind::DeviceBoundary,
            &entry.path,
            RejectReason::DeviceMismatch {
                expected: self.map.expected_device(&item).map(DeviceId::get),
                actual: entry.device.get(),
            },
        ));
        true
    }
}
