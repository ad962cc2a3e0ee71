//! Path resolution and component-wise containment.
//!
//! Containment is always decided on whole path components: `/foodir` is an
//! ancestor of `/foodir/x` but not of `/foodir2/x`.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::scope::ScopeRoot;

/// Outcome of resolving every symlink in a path.
///
/// Resolution failures are kept distinct from resolved paths so that guards
/// have to decide what an undeterminable location means for them.
#[derive(Debug)]
#[must_use]
pub enum Resolution {
    /// The fully resolved, canonical path.
    Resolved(PathBuf),
    /// The path could not be resolved (dangling link, missing component,
    /// permission denied, ...).
    Indeterminate(io::Error),
}

impl Resolution {
    /// The resolved path, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<&Path> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Indeterminate(_) => None,
        }
    }
}

/// Outcome of testing a candidate against a scope root.
#[derive(Debug)]
#[must_use]
pub enum Containment {
    /// The candidate resolves to a path at or below the scope root.
    Inside(PathBuf),
    /// The candidate resolves to a path outside the scope root.
    Outside(PathBuf),
    /// The candidate could not be resolved.
    Indeterminate(io::Error),
}

impl Containment {
    /// Whether the candidate was positively determined to be inside.
    #[must_use]
    pub fn is_contained(&self) -> bool {
        matches!(self, Self::Inside(_))
    }
}

/// Resolve every symlink in `path`, including all ancestors.
///
/// Every component must exist on disk.
pub fn resolve(path: &Path) -> Resolution {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Resolution::Resolved(resolved),
        Err(e) => Resolution::Indeterminate(e),
    }
}

/// Resolve the deepest existing ancestor of `path` and re-append the rest.
///
/// `path` must be absolute and lexically clean. The missing tail is taken
/// verbatim, so it contains no `..` that could climb back out of the
/// resolved ancestor. An ancestor that exists but cannot be resolved (a
/// dangling symlink, a permission error) yields `Indeterminate`.
pub fn resolve_existing(path: &Path) -> Resolution {
    for ancestor in path.ancestors() {
        match std::fs::symlink_metadata(ancestor) {
            Ok(_) => {},
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Resolution::Indeterminate(e),
        }

        let resolved = match std::fs::canonicalize(ancestor) {
            Ok(resolved) => resolved,
            Err(e) => return Resolution::Indeterminate(e),
        };
        return match path.strip_prefix(ancestor) {
            Ok(tail) if tail.as_os_str().is_empty() => Resolution::Resolved(resolved),
            Ok(tail) => Resolution::Resolved(resolved.join(tail)),
            Err(_) => Resolution::Indeterminate(io::Error::other(format!(
                "{} is not an ancestor of {}",
                ancestor.display(),
                path.display()
            ))),
        };
    }

    Resolution::Indeterminate(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no existing ancestor of {}", path.display()),
    ))
}

/// Test whether `candidate` resolves to a location inside `root`.
pub fn contains(root: &ScopeRoot, candidate: &Path) -> Containment {
    match resolve(candidate) {
        Resolution::Resolved(resolved) if is_within(&resolved, root.as_path()) => {
            Containment::Inside(resolved)
        },
        Resolution::Resolved(resolved) => Containment::Outside(resolved),
        Resolution::Indeterminate(e) => Containment::Indeterminate(e),
    }
}

/// One-directional test: `candidate` is `root` or lies below it.
#[must_use]
pub fn is_within(candidate: &Path, root: &Path) -> bool {
    candidate.starts_with(root)
}

/// Bidirectional test: one path is an ancestor of (or equal to) the other.
#[must_use]
pub fn is_compatible(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Collapse `.` and `..` segments without touching the filesystem.
///
/// A `..` directly below the root stays at the root (`/..` is `/`). Leading
/// `..` segments of a relative path are kept. An empty result becomes `.`.
#[must_use]
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                Some(Component::ParentDir | Component::CurDir) | None => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lexical_clean() {
        assert_eq!(lexical_clean(Path::new("/var/test/target/next/..")), Path::new("/var/test/target"));
        assert_eq!(lexical_clean(Path::new("./test/target")), Path::new("test/target"));
        assert_eq!(lexical_clean(Path::new("./var/../../target")), Path::new("../target"));
        assert_eq!(lexical_clean(Path::new("/restore/test/../target")), Path::new("/restore/target"));
        assert_eq!(lexical_clean(Path::new("/../..")), Path::new("/"));
        assert_eq!(lexical_clean(Path::new("a/..")), Path::new("."));
        assert_eq!(lexical_clean(Path::new("")), Path::new("."));
        assert_eq!(lexical_clean(Path::new("../../x")), Path::new("../../x"));
    }

    #[test]
    fn test_component_containment() {
        assert!(is_within(Path::new("/foodir/x"), Path::new("/foodir")));
        assert!(is_within(Path::new("/foodir"), Path::new("/foodir")));
        assert!(!is_within(Path::new("/foodir2/x"), Path::new("/foodir")));
        assert!(!is_within(Path::new("/"), Path::new("/foodir")));
    }

    #[test]
    fn test_compatible_is_symmetric() {
        assert!(is_compatible(Path::new("/a/b"), Path::new("/a/b/c")));
        assert!(is_compatible(Path::new("/a/b/c"), Path::new("/a/b")));
        assert!(is_compatible(Path::new("/a/b"), Path::new("/a/b")));
        assert!(!is_compatible(Path::new("/a/bc"), Path::new("/a/b")));
        assert!(!is_compatible(Path::new("/a/b"), Path::new("/a/c")));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_dangling_link_is_indeterminate() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("missing"), &link).unwrap();

        assert!(matches!(resolve(&link), Resolution::Indeterminate(_)));
        assert!(resolve(dir.path()).resolved().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_existing_appends_missing_tail() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().canonicalize().unwrap();
        std::fs::create_dir(base.join("real")).unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("alias")).unwrap();

        let resolved = resolve_existing(&base.join("alias/not/yet"));
        assert_eq!(resolved.resolved(), Some(base.join("real/not/yet").as_path()));

        let resolved = resolve_existing(&base.join("real"));
        assert_eq!(resolved.resolved(), Some(base.join("real").as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_existing_through_dangling_ancestor() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(base.join("gone"), base.join("broken")).unwrap();

        let resolved = resolve_existing(&base.join("broken/child"));
        assert!(matches!(resolved, Resolution::Indeterminate(_)));
    }

    #[test]
    fn test_contains() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().canonicalize().unwrap();
        std::fs::create_dir_all(base.join("scope/inner")).unwrap();
        std::fs::create_dir_all(base.join("scope2")).unwrap();
        let root = ScopeRoot::canonical(base.join("scope")).unwrap();

        assert!(contains(&root, &base.join("scope/inner")).is_contained());
        assert!(contains(&root, &base.join("scope")).is_contained());
        assert!(matches!(
            contains(&root, &base.join("scope2")),
            Containment::Outside(_)
        ));
        assert!(matches!(
            contains(&root, &base.join("scope/missing")),
            Containment::Indeterminate(_)
        ));
    }
}
