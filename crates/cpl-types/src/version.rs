use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ProvId;

/// Version counter scoped to a single object.
///
/// Every object starts at [`Version::INITIAL`] and moves strictly upward each
/// time its provenance-relevant state changes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Version(u32);

impl Version {
    /// The version every object is created with.
    pub const INITIAL: Version = Version(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The following version, or `None` once the counter is exhausted.
    pub fn next(&self) -> Option<Version> {
        self.0.checked_add(1).map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for Version {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One immutable point in an object's provenance history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: ProvId,
    pub version: Version,
}

impl Snapshot {
    pub const fn new(id: ProvId, version: Version) -> Self {
        Self { id, version }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_greater() {
        let v = Version::INITIAL;
        let n = v.next().unwrap();
        assert!(n > v);
        assert_eq!(n.get(), 1);
    }

    #[test]
    fn next_saturates_at_max() {
        assert_eq!(Version::new(u32::MAX).next(), None);
    }

    #[test]
    fn snapshot_orders_by_id_then_version() {
        let id = ProvId::from_parts(1, 1);
        let a = Snapshot::new(id, Version::new(3));
        let b = Snapshot::new(id, Version::new(4));
        let c = Snapshot::new(ProvId::from_parts(1, 2), Version::INITIAL);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn snapshot_display() {
        let s = Snapshot::new(ProvId::from_parts(0xa, 0xb), Version::new(2));
        assert_eq!(s.to_string(), "a:b@v2");
    }
}
