//! Foundation types for the Core Provenance Library (CPL).
//!
//! This crate provides the identifier, version, and status types shared by
//! every other CPL crate. Nothing here performs I/O or allocates on the hot
//! path; identifiers and versions are plain `Copy` values.
//!
//! # Key Types
//!
//! - [`ProvId`] -- 128-bit backend-issued object identifier, totally ordered
//! - [`Version`] -- Per-object version counter
//! - [`Snapshot`] -- An `(object, version)` pair naming one immutable state
//! - [`DependencyType`] -- Data or control dependency, with subtype
//! - [`IndexHints`] -- Bucket sizing hints for identifier-keyed containers
//! - [`Status`] -- Fixed status-code taxonomy, see [`error_string`]

pub mod dependency;
pub mod error;
pub mod id;
pub mod index;
pub mod status;
pub mod version;

pub use dependency::{DependencyCategory, DependencyFilter, DependencyType, Direction};
pub use error::TypeError;
pub use id::ProvId;
pub use index::{IdBuildHasher, IdHashMap, IdHashSet, IndexHints, SnapshotMap, SnapshotSet};
pub use status::{error_string, Status};
pub use version::{Snapshot, Version};
