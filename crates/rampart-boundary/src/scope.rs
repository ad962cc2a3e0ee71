//! Canonical scope roots.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{BoundaryError, BoundaryResult};
use crate::path::{self, Containment, Resolution};

/// An absolute directory path with every existing symlink resolved.
///
/// Built once per backup or restore invocation and never re-resolved. Both
/// guards consume this type, so neither has to trust its caller to have
/// canonicalized the scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScopeRoot(PathBuf);

impl ScopeRoot {
    /// Build a scope root from an existing directory.
    ///
    /// Relative paths are made absolute against the current working
    /// directory before resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, cannot be resolved, or does
    /// not resolve to a directory.
    pub fn canonical(path: impl AsRef<Path>) -> BoundaryResult<Self> {
        let path = path.as_ref();
        let absolute = absolutize(path)?;

        let resolved =
            std::fs::canonicalize(&absolute).map_err(|source| BoundaryError::ScopeUnresolvable {
                path: path.display().to_string(),
                source,
            })?;
        let metadata =
            std::fs::metadata(&resolved).map_err(|source| BoundaryError::ScopeUnresolvable {
                path: path.display().to_string(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(BoundaryError::ScopeNotDirectory {
                path: resolved.display().to_string(),
            });
        }

        debug!(scope = %resolved.display(), "resolved scope root");
        Ok(Self(resolved))
    }

    /// Build a scope root that may not exist yet.
    ///
    /// A restore usually starts before its scope directory has been
    /// materialized. The deepest existing ancestor is resolved and the
    /// missing components are appended after lexical cleaning.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, an existing ancestor cannot be
    /// resolved, or the path already exists as something other than a
    /// directory.
    pub fn prospective(path: impl AsRef<Path>) -> BoundaryResult<Self> {
        let path = path.as_ref();
        let absolute = path::lexical_clean(&absolutize(path)?);

        let resolved = match path::resolve_existing(&absolute) {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Indeterminate(source) => {
                return Err(BoundaryError::ScopeUnresolvable {
                    path: path.display().to_string(),
                    source,
                });
            },
        };

        if let Ok(metadata) = std::fs::metadata(&resolved)
            && !metadata.is_dir()
        {
            return Err(BoundaryError::ScopeNotDirectory {
                path: resolved.display().to_string(),
            });
        }

        debug!(scope = %resolved.display(), "resolved prospective scope root");
        Ok(Self(resolved))
    }

    /// The canonical scope path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Test whether `candidate` resolves to a location inside this scope.
    pub fn contains(&self, candidate: &Path) -> Containment {
        path::contains(self, candidate)
    }
}

impl AsRef<Path> for ScopeRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ScopeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn absolutize(path: &Path) -> BoundaryResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(BoundaryError::EmptyScope);
    }
    std::path::absolute(path).map_err(|source| BoundaryError::ScopeNotAbsolute {
        path: path.display().to_string(),
        source,
    })
}
