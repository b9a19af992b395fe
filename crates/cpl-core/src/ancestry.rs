//! Callback-driven ancestry queries.
//!
//! [`SessionSlot::get_ancestry`] asks the attached backend for the edges
//! around one snapshot and hands each to an [`AncestryCallback`], serially,
//! on the calling thread. Returning `Err` from the callback stops the
//! traversal and the same error becomes the result of the query. Entries
//! delivered before the abort stay valid.

use std::collections::VecDeque;

use tracing::debug;

use cpl_backend::{AncestryEntry, AncestryQuery};
use cpl_types::{DependencyFilter, Direction, ProvId, Snapshot, Version};

use crate::collect::{ListCollector, VectorCollector};
use crate::error::{CplError, CplResult};
use crate::iter::AncestryIter;
use crate::session::SessionSlot;

/// Receives the entries of one ancestry query.
pub trait AncestryCallback {
    /// Handle one entry. `Err` aborts the traversal.
    fn on_entry(&mut self, entry: &AncestryEntry) -> CplResult<()>;
}

impl<F> AncestryCallback for F
where
    F: FnMut(&AncestryEntry) -> CplResult<()>,
{
    fn on_entry(&mut self, entry: &AncestryEntry) -> CplResult<()> {
        self(entry)
    }
}

/// Adapts a callback that reports raw status codes.
///
/// `0` continues the traversal; any other code aborts it, and the query
/// returns that exact code (see [`CplError::code`]).
pub struct StatusCallback<F>(pub F);

impl<F> AncestryCallback for StatusCallback<F>
where
    F: FnMut(&AncestryEntry) -> u64,
{
    fn on_entry(&mut self, entry: &AncestryEntry) -> CplResult<()> {
        match CplError::from_code((self.0)(entry)) {
            None => Ok(()),
            Some(abort) => Err(abort),
        }
    }
}

impl SessionSlot {
    /// Lazily iterate the edges around `id` at `version`.
    pub fn ancestry_iter(
        &self,
        id: ProvId,
        version: Version,
        direction: Direction,
        filter: DependencyFilter,
    ) -> CplResult<AncestryIter> {
        let query = AncestryQuery::new(Snapshot::new(id, version), direction, filter);
        AncestryIter::new(self.backend()?, query)
    }

    /// Deliver every edge around `id` at `version` to `callback`.
    ///
    /// An object with no matching edges invokes the callback zero times and
    /// succeeds. Backend failures are returned without invoking the callback
    /// for the failed step.
    pub fn get_ancestry<C>(
        &self,
        id: ProvId,
        version: Version,
        direction: Direction,
        filter: DependencyFilter,
        callback: &mut C,
    ) -> CplResult<()>
    where
        C: AncestryCallback + ?Sized,
    {
        let iter = self.ancestry_iter(id, version, direction, filter)?;
        let mut delivered = 0usize;
        for entry in iter {
            let entry = entry?;
            if let Err(abort) = callback.on_entry(&entry) {
                debug!(
                    object = %id,
                    %version,
                    delivered,
                    code = abort.code(),
                    "ancestry traversal aborted by callback"
                );
                return Err(abort);
            }
            delivered += 1;
        }
        debug!(object = %id, %version, delivered, "ancestry traversal complete");
        Ok(())
    }

    /// Collect the edges into a [`ListCollector`] sequence.
    pub fn ancestry_list(
        &self,
        id: ProvId,
        version: Version,
        direction: Direction,
        filter: DependencyFilter,
    ) -> CplResult<VecDeque<AncestryEntry>> {
        let mut collector = ListCollector::new();
        self.get_ancestry(id, version, direction, filter, &mut collector)?;
        Ok(collector.into_inner())
    }

    /// Collect the edges into a [`VectorCollector`] sequence.
    pub fn ancestry_vec(
        &self,
        id: ProvId,
        version: Version,
        direction: Direction,
        filter: DependencyFilter,
    ) -> CplResult<Vec<AncestryEntry>> {
        let mut collector = VectorCollector::new();
        self.get_ancestry(id, version, direction, filter, &mut collector)?;
        Ok(collector.into_inner())
    }
}
