//! Transitive lineage over single-hop ancestry queries.
//!
//! [`SessionSlot::lineage`] walks the provenance graph breadth-first from a
//! root snapshot, issuing one [`get_ancestry`](SessionSlot::get_ancestry)
//! per reached snapshot. A [`SnapshotSet`] sized from [`IndexHints`] records
//! what has been reached, so every snapshot is expanded at most once even
//! when the graph has diamonds.
//!
//! # Invariants
//!
//! - The root is never part of its own lineage.
//! - Steps are ordered by depth; within a depth, by backend delivery order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cpl_backend::AncestryEntry;
use cpl_types::{DependencyFilter, Direction, IndexHints, Snapshot, SnapshotSet};

use crate::error::CplResult;
use crate::session::SessionSlot;

/// Bounds and sizing for a lineage walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineageOptions {
    /// Maximum hops from the root. `None` walks to the graph's edge.
    pub max_depth: Option<usize>,
    pub hints: IndexHints,
}

impl LineageOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// One edge reached during a lineage walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageStep {
    pub entry: AncestryEntry,
    /// Hops from the root; direct edges are depth 1.
    pub depth: usize,
}

/// Result of a lineage walk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Lineage {
    pub root: Snapshot,
    /// Every edge reached, in traversal order.
    pub steps: Vec<LineageStep>,
    /// Every distinct snapshot reached, in discovery order.
    pub reached: Vec<Snapshot>,
    /// `reached` plus the root, for constant-time membership.
    #[serde(skip)]
    visited: SnapshotSet,
}

impl Lineage {
    fn new(root: Snapshot, mut visited: SnapshotSet) -> Self {
        visited.insert(root);
        Self {
            root,
            steps: Vec::new(),
            reached: Vec::new(),
            visited,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Deepest hop reached.
    pub fn depth(&self) -> usize {
        self.steps.iter().map(|s| s.depth).max().unwrap_or(0)
    }

    /// Whether `snapshot` was reached. The root never is.
    pub fn contains(&self, snapshot: &Snapshot) -> bool {
        *snapshot != self.root && self.visited.contains(snapshot)
    }
}

impl SessionSlot {
    /// Breadth-first transitive closure of the edges around `root`.
    pub fn lineage(
        &self,
        root: Snapshot,
        direction: Direction,
        filter: DependencyFilter,
        options: &LineageOptions,
    ) -> CplResult<Lineage> {
        let mut lineage = Lineage::new(root, options.hints.new_snapshot_set(0));
        let mut queue: VecDeque<(Snapshot, usize)> = VecDeque::new();
        queue.push_back((root, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if options.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            let next_depth = depth + 1;
            self.get_ancestry(
                current.id,
                current.version,
                direction,
                filter,
                &mut |entry: &AncestryEntry| -> CplResult<()> {
                    lineage.steps.push(LineageStep {
                        entry: *entry,
                        depth: next_depth,
                    });
                    if lineage.visited.insert(entry.other) {
                        lineage.reached.push(entry.other);
                        queue.push_back((entry.other, next_depth));
                    }
                    Ok(())
                },
            )?;
        }

        debug!(
            root = %root,
            steps = lineage.steps.len(),
            reached = lineage.reached.len(),
            "lineage walk complete"
        );
        Ok(lineage)
    }
}
