//! Predicate traits consumed by tree walkers.
//!
//! A backup walker asks a [`Reject`] whether to skip each live entry (and,
//! for directories, the whole subtree). A restore walker asks a
//! [`NodeFilter`] whether it may create each archived node.

use std::fmt;
use std::path::Path;

use crate::entry::{CandidateEntry, RestoreNode};

/// Backup-time rejection predicate.
pub trait Reject: Send + Sync {
    /// Returns `true` if the entry must be left out of the backup.
    fn should_exclude(&self, entry: &CandidateEntry) -> bool;
}

impl<F> Reject for F
where
    F: Fn(&CandidateEntry) -> bool + Send + Sync,
{
    fn should_exclude(&self, entry: &CandidateEntry) -> bool {
        self(entry)
    }
}

/// Restore-time node filter.
pub trait NodeFilter: Send + Sync {
    /// Returns `true` if `node` may be created at `item`.
    fn allows(&self, item: &Path, node: &RestoreNode) -> bool;
}

impl<F> NodeFilter for F
where
    F: Fn(&Path, &RestoreNode) -> bool + Send + Sync,
{
    fn allows(&self, item: &Path, node: &RestoreNode) -> bool {
        self(item, node)
    }
}

/// A set of rejection predicates; an entry is excluded if any member
/// excludes it.
///
/// Members are consulted in insertion order and evaluation stops at the
/// first exclusion, so each rejection is reported once.
#[derive(Default)]
pub struct RejectSet {
    rejectors: Vec<Box<dyn Reject>>,
}

impl RejectSet {
    /// Create an empty set that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    #[must_use]
    pub fn with(mut self, rejector: impl Reject + 'static) -> Self {
        self.push(rejector);
        self
    }

    /// Add a predicate in place.
    pub fn push(&mut self, rejector: impl Reject + 'static) {
        self.rejectors.push(Box::new(rejector));
    }

    /// Number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rejectors.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rejectors.is_empty()
    }
}

impl Reject for RejectSet {
    fn should_exclude(&self, entry: &CandidateEntry) -> bool {
        self.rejectors.iter().any(|r| r.should_exclude(entry))
    }
}

impl fmt::Debug for RejectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectSet")
            .field("rejectors", &self.rejectors.len())
            .finish()
    }
}

/// A set of node filters; a node is allowed only if every member allows it.
#[derive(Default)]
pub struct NodeFilterSet {
    filters: Vec<Box<dyn NodeFilter>>,
}

impl NodeFilterSet {
    /// Create an empty set that allows everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    #[must_use]
    pub fn with(mut self, filter: impl NodeFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    /// Add a filter in place.
    pub fn push(&mut self, filter: impl NodeFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl NodeFilter for NodeFilterSet {
    fn allows(&self, item: &Path, node: &RestoreNode) -> bool {
        self.filters.iter().all(|f| f.allows(item, node))
    }
}

impl fmt::Debug for NodeFilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeFilterSet")
            .field("filters", &self.filters.len())
            .finish()
    }
}
