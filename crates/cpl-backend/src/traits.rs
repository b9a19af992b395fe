use cpl_types::{DependencyType, ProvId, Snapshot, Version};

use crate::error::{BackendError, BackendResult};
use crate::object::{ObjectInfo, ObjectKey};
use crate::query::{AncestryQuery, EdgeCursor};

/// A provenance storage backend.
///
/// All implementations must satisfy these invariants:
/// - `open` is called once per attach, before any other operation; `close`
///   is called once per successful `open` and must not fail.
/// - Identifiers are issued here and never reused.
/// - Recording an edge that already exists is a no-op reported as `false`.
/// - `ancestry` validates the queried snapshot up front and enumerates edges
///   in an order that is stable for an unchanged graph.
/// - All I/O errors are propagated, never silently ignored.
pub trait Backend: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Establish the connection or storage.
    fn open(&self) -> BackendResult<()>;

    /// Release the connection. Infallible; problems are logged.
    fn close(&self);

    /// Register a new object at [`Version::INITIAL`] and return its id.
    fn create_object(&self, key: &ObjectKey, container: Option<Snapshot>)
        -> BackendResult<ProvId>;

    /// Find the object registered under `key`.
    ///
    /// Returns [`BackendError::NotFound`] if there is none.
    fn lookup_object(&self, key: &ObjectKey) -> BackendResult<ProvId>;

    fn object_info(&self, id: &ProvId) -> BackendResult<ObjectInfo>;

    /// Every registered object, ordered by id.
    ///
    /// Backends that cannot enumerate cheaply may leave this unimplemented.
    fn all_objects(&self) -> BackendResult<Vec<ObjectInfo>> {
        Err(BackendError::NotImplemented("all_objects"))
    }

    /// Advance the object to its next version and return it.
    fn new_version(&self, id: &ProvId) -> BackendResult<Version>;

    fn current_version(&self, id: &ProvId) -> BackendResult<Version> {
        self.object_info(id).map(|info| info.version)
    }

    /// Record that `dest` (at its current version) depends on `source` (at
    /// its current version). Returns `false` if the edge already existed.
    fn add_dependency(
        &self,
        dest: &ProvId,
        source: &ProvId,
        dependency: DependencyType,
    ) -> BackendResult<bool>;

    /// Enumerate the edges matching `query`.
    fn ancestry(&self, query: &AncestryQuery) -> BackendResult<EdgeCursor>;
}
