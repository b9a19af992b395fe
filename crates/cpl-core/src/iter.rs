//! Lazy ancestry iteration.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::warn;

use cpl_backend::{AncestryEntry, AncestryQuery, Backend, EdgeCursor};

use crate::error::{CplError, CplResult};

/// A finite, restartable sequence of the edges matching one query.
///
/// Entries are pulled from the backend on demand. Dropping the iterator
/// early is the way to stop a traversal. A backend failure is yielded once as
/// an `Err` and ends the sequence.
pub struct AncestryIter {
    backend: Arc<dyn Backend>,
    query: AncestryQuery,
    cursor: Option<EdgeCursor>,
    delivered: usize,
}

impl AncestryIter {
    /// Issue `query` against `backend`.
    ///
    /// The snapshot is validated up front, so an unknown object or version
    /// fails here rather than on the first `next`.
    pub fn new(backend: Arc<dyn Backend>, query: AncestryQuery) -> CplResult<Self> {
        let cursor = backend.ancestry(&query)?;
        Ok(Self {
            backend,
            query,
            cursor: Some(cursor),
            delivered: 0,
        })
    }

    pub fn query(&self) -> &AncestryQuery {
        &self.query
    }

    /// Entries yielded since the last (re)start.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Re-issue the query from the beginning.
    ///
    /// Against an unchanged graph the same entries come back in the same
    /// order.
    pub fn restart(&mut self) -> CplResult<()> {
        self.cursor = None;
        self.delivered = 0;
        self.cursor = Some(self.backend.ancestry(&self.query)?);
        Ok(())
    }
}

impl Iterator for AncestryIter {
    type Item = CplResult<AncestryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        match cursor.next() {
            Some(Ok(entry)) => {
                self.delivered += 1;
                Some(Ok(entry))
            }
            Some(Err(e)) => {
                warn!(
                    snapshot = %self.query.snapshot,
                    delivered = self.delivered,
                    error = %e,
                    "ancestry enumeration failed"
                );
                self.cursor = None;
                Some(Err(CplError::from(e)))
            }
            None => {
                self.cursor = None;
                None
            }
        }
    }
}

impl FusedIterator for AncestryIter {}

impl fmt::Debug for AncestryIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AncestryIter")
            .field("backend", &self.backend.name())
            .field("query", &self.query)
            .field("delivered", &self.delivered)
            .field("finished", &self.cursor.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fan_in, InstrumentedBackend};
    use cpl_types::{Snapshot, Status, Version};

    #[test]
    fn yields_every_edge_then_none() {
        let backend = InstrumentedBackend::new("iter");
        backend.open().unwrap();
        let (output, inputs) = fan_in(backend.as_ref(), 3);

        let mut iter = AncestryIter::new(
            backend.clone(),
            AncestryQuery::ancestors(Snapshot::new(output, Version::INITIAL)),
        )
        .unwrap();
        let others: Vec<_> = iter.by_ref().map(|e| e.unwrap().other.id).collect();
        assert_eq!(others, inputs);
        assert_eq!(iter.delivered(), 3);
        assert!(iter.next().is_none());
    }

    #[test]
    fn dropping_early_stops_enumeration() {
        let backend = InstrumentedBackend::new("early");
        backend.open().unwrap();
        let (output, _) = fan_in(backend.as_ref(), 5);

        let iter = AncestryIter::new(
            backend.clone(),
            AncestryQuery::ancestors(Snapshot::new(output, Version::INITIAL)),
        )
        .unwrap();
        let first_two: Vec<_> = iter.take(2).collect::<CplResult<_>>().unwrap();
        assert_eq!(first_two.len(), 2);
    }

    #[test]
    fn restart_replays_the_same_sequence() {
        let backend = InstrumentedBackend::new("restart");
        backend.open().unwrap();
        let (output, _) = fan_in(backend.as_ref(), 4);

        let mut iter = AncestryIter::new(
            backend.clone(),
            AncestryQuery::ancestors(Snapshot::new(output, Version::INITIAL)),
        )
        .unwrap();
        let first: Vec<_> = iter.by_ref().collect::<CplResult<_>>().unwrap();
        iter.restart().unwrap();
        let second: Vec<_> = iter.by_ref().collect::<CplResult<_>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.ancestry_calls(), 2);
    }

    #[test]
    fn backend_failure_is_terminal() {
        let backend = InstrumentedBackend::failing_after("flaky", 2);
        backend.open().unwrap();
        let (output, _) = fan_in(backend.as_ref(), 5);

        let mut iter = AncestryIter::new(
            backend.clone(),
            AncestryQuery::ancestors(Snapshot::new(output, Version::INITIAL)),
        )
        .unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err.status(), Some(Status::StorageError));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn unknown_snapshot_fails_at_construction() {
        let backend = InstrumentedBackend::new("validate");
        backend.open().unwrap();
        let (output, _) = fan_in(backend.as_ref(), 1);

        let err = AncestryIter::new(
            backend.clone(),
            AncestryQuery::ancestors(Snapshot::new(output, Version::new(7))),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidArgument));
    }
}
