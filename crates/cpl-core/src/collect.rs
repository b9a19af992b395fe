//! Standard ancestry collectors.
//!
//! Both collectors append entries in delivery order and never abort, so for
//! the same query they produce sequences of identical length and order. Pick
//! [`ListCollector`] when the result will be consumed from either end and
//! [`VectorCollector`] when it will be indexed.

use std::collections::VecDeque;

use cpl_backend::AncestryEntry;

use crate::ancestry::AncestryCallback;
use crate::error::CplResult;

/// Collects entries into a double-ended queue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListCollector {
    entries: VecDeque<AncestryEntry>,
}

impl ListCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &VecDeque<AncestryEntry> {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AncestryEntry> {
        self.entries.iter()
    }

    pub fn into_inner(self) -> VecDeque<AncestryEntry> {
        self.entries
    }
}

impl AncestryCallback for ListCollector {
    fn on_entry(&mut self, entry: &AncestryEntry) -> CplResult<()> {
        self.entries.push_back(*entry);
        Ok(())
    }
}

/// Collects entries into a contiguous vector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VectorCollector {
    entries: Vec<AncestryEntry>,
}

impl VectorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AncestryEntry] {
        &self.entries
    }

    pub fn into_inner(self) -> Vec<AncestryEntry> {
        self.entries
    }
}

impl AncestryCallback for VectorCollector {
    fn on_entry(&mut self, entry: &AncestryEntry) -> CplResult<()> {
        self.entries.push(*entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpl_backend::EdgeDirection;
    use cpl_types::{DependencyType, ProvId, Snapshot, Version};
    use proptest::prelude::*;

    fn entry(lo: u64, dependency: DependencyType) -> AncestryEntry {
        AncestryEntry {
            query: Snapshot::new(ProvId::from_parts(0, 1), Version::INITIAL),
            other: Snapshot::new(ProvId::from_parts(1, lo), Version::new(lo as u32 % 3)),
            dependency,
            direction: EdgeDirection::Ancestor,
        }
    }

    #[test]
    fn collectors_start_empty() {
        assert!(ListCollector::new().is_empty());
        assert!(VectorCollector::with_capacity(8).is_empty());
    }

    #[test]
    fn list_keeps_delivery_order() {
        let mut list = ListCollector::new();
        for i in 0..3 {
            list.on_entry(&entry(i, DependencyType::DataInput)).unwrap();
        }
        let lows: Vec<u64> = list.iter().map(|e| e.other.id.lo()).collect();
        assert_eq!(lows, vec![0, 1, 2]);
    }

    proptest! {
        #[test]
        fn list_and_vector_match(lows in proptest::collection::vec(any::<u64>(), 0..64), control in any::<bool>()) {
            let dependency = if control { DependencyType::ControlOp } else { DependencyType::DataCopy };
            let mut list = ListCollector::new();
            let mut vector = VectorCollector::new();
            for lo in &lows {
                let e = entry(*lo, dependency);
                prop_assert!(list.on_entry(&e).is_ok());
                prop_assert!(vector.on_entry(&e).is_ok());
            }
            prop_assert_eq!(list.len(), lows.len());
            prop_assert_eq!(vector.len(), lows.len());
            prop_assert!(list.entries().iter().eq(vector.entries().iter()));
        }
    }
}
