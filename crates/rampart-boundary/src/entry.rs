//! Entries handed to the guards by a tree walker.

use serde::{Deserialize, Serialize};
use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};

use crate::device::DeviceId;

/// Kind of filesystem entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Anything else (fifo, socket, device node, ...).
    Other,
}

impl FileKind {
    /// Classify a file type obtained from `lstat`.
    #[must_use]
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::Regular
        } else {
            Self::Other
        }
    }

    /// Whether this is a directory.
    #[must_use]
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Whether this is a symbolic link.
    #[must_use]
    pub fn is_symlink(self) -> bool {
        matches!(self, Self::Symlink)
    }
}

/// A live filesystem entry visited during a backup scan.
///
/// Built fresh for every call; nothing about it is remembered by the guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: FileKind,
    /// Raw link target, only meaningful for symlinks.
    #[serde(default)]
    pub link_target: Option<PathBuf>,
    /// Device the entry lives on.
    pub device: DeviceId,
}

impl CandidateEntry {
    /// Create an entry with no link target on device `0`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
            link_target: None,
            device: DeviceId::default(),
        }
    }

    /// Set the link target.
    #[must_use]
    pub fn with_link_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    /// Set the device id.
    #[must_use]
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = device;
        self
    }

    /// Build an entry from `lstat` metadata the walker already holds.
    ///
    /// The link target is not read; use [`CandidateEntry::probe`] when it
    /// is needed.
    #[must_use]
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::from_file_type(metadata.file_type()),
            link_target: None,
            device: device_of(metadata),
        }
    }

    /// Inspect `path` on disk without following a final symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be `lstat`ed or its link target
    /// cannot be read.
    pub fn probe(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::symlink_metadata(path)?;
        let mut entry = Self::from_metadata(path, &metadata);
        if entry.kind.is_symlink() {
            entry.link_target = Some(std::fs::read_link(path)?);
        }
        Ok(entry)
    }
}

/// An archived node about to be recreated on disk during a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreNode {
    /// Node kind.
    pub kind: FileKind,
    /// Recorded link target for symlink nodes.
    #[serde(default)]
    pub link_target: Option<PathBuf>,
}

impl RestoreNode {
    /// A regular file node.
    #[must_use]
    pub fn file() -> Self {
        Self {
            kind: FileKind::Regular,
            link_target: None,
        }
    }

    /// A directory node.
    #[must_use]
    pub fn dir() -> Self {
        Self {
            kind: FileKind::Directory,
            link_target: None,
        }
    }

    /// A symlink node with its recorded target.
    #[must_use]
    pub fn symlink(target: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileKind::Symlink,
            link_target: Some(target.into()),
        }
    }
}

/// Device id of the filesystem holding an entry.
#[cfg(unix)]
pub(crate) fn device_of(metadata: &Metadata) -> DeviceId {
    use std::os::unix::fs::MetadataExt;
    DeviceId::new(metadata.dev())
}

/// Device id of the filesystem holding an entry.
///
/// No portable device id is exposed here; every entry reports device `0`.
#[cfg(not(unix))]
pub(crate) fn device_of(_metadata: &Metadata) -> DeviceId {
    DeviceId::default()
}
