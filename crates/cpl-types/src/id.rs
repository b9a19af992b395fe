use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Globally unique identifier of a provenance object.
///
/// A `ProvId` is an opaque pair of 64-bit words issued by a backend. Ids are
/// totally ordered by the high word, then the low word, and two ids are equal
/// only when both words match. Callers never synthesize ids for live objects;
/// the constructors exist for backends and for decoding stored values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvId {
    hi: u64,
    lo: u64,
}

impl ProvId {
    /// The null identifier. Represents "no object".
    pub const NONE: ProvId = ProvId { hi: 0, lo: 0 };

    /// Assemble an id from its two words.
    pub const fn from_parts(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Issue a fresh id from a time-ordered UUID (v7).
    pub fn generate() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }

    /// The high word.
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// The low word.
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Returns `true` if this is [`ProvId::NONE`].
    pub const fn is_none(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    /// Three-way comparison: high word first, then low word.
    pub fn compare(&self, other: &ProvId) -> Ordering {
        self.hi.cmp(&other.hi).then(self.lo.cmp(&other.lo))
    }

    /// Deterministic hash of both words.
    ///
    /// Equal ids always produce equal values. This is the same function the
    /// identifier-keyed containers in [`crate::index`] use.
    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Big-endian 16-byte encoding (`hi` then `lo`).
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    /// Fixed-width hex encoding of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse the fixed-width form produced by [`to_hex`](Self::to_hex).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 16] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::MalformedId(s.to_string()))?;
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(&arr[..8]);
        lo.copy_from_slice(&arr[8..]);
        Ok(Self::from_parts(u64::from_be_bytes(hi), u64::from_be_bytes(lo)))
    }

    /// Short form for log lines (low word only).
    pub fn short_hex(&self) -> String {
        format!("{:x}", self.lo)
    }
}

impl Ord for ProvId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for ProvId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for ProvId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for ProvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProvId({:x}:{:x})", self.hi, self.lo)
    }
}

impl fmt::Display for ProvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}:{:x}", self.hi, self.lo)
    }
}

impl FromStr for ProvId {
    type Err = TypeError;

    /// Parse the `<hi>:<lo>` hex form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hi, lo) = s
            .split_once(':')
            .ok_or_else(|| TypeError::MalformedId(s.to_string()))?;
        let parse = |word: &str| {
            u64::from_str_radix(word, 16).map_err(|e| TypeError::InvalidHex(e.to_string()))
        };
        Ok(Self::from_parts(parse(hi)?, parse(lo)?))
    }
}

impl From<uuid::Uuid> for ProvId {
    fn from(uuid: uuid::Uuid) -> Self {
        let (hi, lo) = uuid.as_u64_pair();
        Self::from_parts(hi, lo)
    }
}

impl From<ProvId> for uuid::Uuid {
    fn from(id: ProvId) -> Self {
        uuid::Uuid::from_u64_pair(id.hi, id.lo)
    }
}
