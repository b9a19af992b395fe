//! Ancestry query and result types.
//!
//! An [`AncestryQuery`] names one snapshot and the edges wanted around it.
//! The backend answers with an [`EdgeCursor`] yielding [`AncestryEntry`]
//! values in its own stable order.

use std::fmt;

use serde::{Deserialize, Serialize};

use cpl_types::{DependencyFilter, DependencyType, Direction, ProvId, Snapshot, Version};

use crate::error::BackendResult;

/// Lazily produced edges of one query.
///
/// The cursor is owned so it can outlive the lock or borrow that produced it.
/// A yielded `Err` is terminal for the query.
pub type EdgeCursor = Box<dyn Iterator<Item = BackendResult<AncestryEntry>> + Send>;

/// Which way an edge points relative to the queried snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// The other snapshot is an input of the queried one.
    Ancestor,
    /// The other snapshot is an output of the queried one.
    Descendant,
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ancestor => write!(f, "ancestor"),
            Self::Descendant => write!(f, "descendant"),
        }
    }
}

/// A request for the edges around one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestryQuery {
    pub snapshot: Snapshot,
    pub direction: Direction,
    pub filter: DependencyFilter,
}

impl AncestryQuery {
    pub fn new(snapshot: Snapshot, direction: Direction, filter: DependencyFilter) -> Self {
        Self {
            snapshot,
            direction,
            filter,
        }
    }

    /// All inputs of `snapshot`, any dependency type.
    pub fn ancestors(snapshot: Snapshot) -> Self {
        Self::new(snapshot, Direction::Ancestors, DependencyFilter::All)
    }

    /// All outputs of `snapshot`, any dependency type.
    pub fn descendants(snapshot: Snapshot) -> Self {
        Self::new(snapshot, Direction::Descendants, DependencyFilter::All)
    }

    pub fn with_filter(mut self, filter: DependencyFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// One dependency edge delivered by a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AncestryEntry {
    /// The snapshot the query was issued for.
    pub query: Snapshot,
    /// The snapshot at the other end of the edge.
    pub other: Snapshot,
    pub dependency: DependencyType,
    pub direction: EdgeDirection,
}

impl AncestryEntry {
    pub fn query_object_id(&self) -> ProvId {
        self.query.id
    }

    pub fn query_version(&self) -> Version {
        self.query.version
    }

    pub fn other_object_id(&self) -> ProvId {
        self.other.id
    }

    pub fn other_version(&self) -> Version {
        self.other.version
    }
}

impl fmt::Display for AncestryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            EdgeDirection::Ancestor => "<-",
            EdgeDirection::Descendant => "->",
        };
        write!(f, "{} {} {} [{}]", self.query, arrow, self.other, self.dependency)
    }
}
