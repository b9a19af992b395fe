//! Storage backend contract for the Core Provenance Library.
//!
//! A backend is the persistent store that owns objects, versions, and
//! dependency edges. The core never mutates provenance data itself; it asks
//! the attached backend to create or query it through the [`Backend`] trait.
//!
//! # Storage Backends
//!
//! - [`InMemoryBackend`] -- `HashMap`-based reference backend for tests and
//!   embedding. Data survives `close`/`open` cycles but not the process.
//!
//! Persistent backends (relational, embedded key-value) live outside this
//! workspace and implement the same trait.
//!
//! # Contract
//!
//! 1. Identifiers are issued by the backend and never reused.
//! 2. Versions of one object strictly increase.
//! 3. Edges are immutable facts; recording an identical edge twice is a no-op.
//! 4. Ancestry enumeration order is backend-defined but stable for an
//!    unchanged graph.
//! 5. All storage failures are reported, never silently ignored.

pub mod error;
pub mod memory;
pub mod object;
pub mod query;
pub mod traits;

pub use error::{BackendError, BackendResult};
pub use memory::InMemoryBackend;
pub use object::{ObjectInfo, ObjectKey};
pub use query::{AncestryEntry, AncestryQuery, EdgeCursor, EdgeDirection};
pub use traits::Backend;
