//! On-disk tree fixtures.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree built up with chained calls.
///
/// Paths handed to the builder are relative to [`TestTree::root`], which is
/// already canonical so that expectations can be compared against resolved
/// paths directly.
#[derive(Debug)]
pub struct TestTree {
    _dir: TempDir,
    root: PathBuf,
}

impl TestTree {
    /// Create an empty tree.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or resolved.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = dir
            .path()
            .canonicalize()
            .expect("Failed to resolve temp directory");
        Self { _dir: dir, root }
    }

    /// Canonical root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `rel` inside the tree.
    #[must_use]
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Create a directory and its parents.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn dir(self, rel: impl AsRef<Path>) -> Self {
        std::fs::create_dir_all(self.path(rel)).expect("Failed to create directory");
        self
    }

    /// Create a file with `content`, creating parents as needed.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn file(self, rel: impl AsRef<Path>, content: &str) -> Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        self
    }

    /// Create a symlink at `rel` pointing at `target` verbatim.
    ///
    /// `target` may be relative (resolved by the OS against the link's
    /// directory) or absolute.
    ///
    /// # Panics
    ///
    /// Panics if the link cannot be created.
    #[cfg(unix)]
    #[must_use]
    pub fn symlink(self, rel: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::os::unix::fs::symlink(target, &path).expect("Failed to create symlink");
        self
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
