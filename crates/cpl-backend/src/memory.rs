use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, warn};

use cpl_types::{DependencyType, IdHashMap, IndexHints, ProvId, Snapshot, SnapshotMap, Version};

use crate::error::{BackendError, BackendResult};
use crate::object::{ObjectInfo, ObjectKey};
use crate::query::{AncestryEntry, AncestryQuery, EdgeCursor, EdgeDirection};
use crate::traits::Backend;

/// In-memory, HashMap-based provenance backend.
///
/// Intended for tests and embedding. State lives behind a `RwLock` and
/// survives `close`/`open` cycles, so a detached and re-attached session sees
/// the same graph. Edges are enumerated in recording order.
pub struct InMemoryBackend {
    name: String,
    open: AtomicBool,
    state: RwLock<MemoryState>,
}

struct MemoryState {
    objects: IdHashMap<ObjectInfo>,
    keys: HashMap<ObjectKey, ProvId>,
    edges: Vec<Edge>,
    /// dest snapshot -> indices into `edges`
    inputs: SnapshotMap<Vec<usize>>,
    /// source snapshot -> indices into `edges`
    outputs: SnapshotMap<Vec<usize>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Edge {
    dest: Snapshot,
    source: Snapshot,
    dependency: DependencyType,
}

impl MemoryState {
    fn with_hints(hints: &IndexHints) -> Self {
        Self {
            objects: hints.new_id_map(0),
            keys: HashMap::new(),
            edges: Vec::new(),
            inputs: SnapshotMap::default(),
            outputs: SnapshotMap::default(),
        }
    }

    fn info(&self, id: &ProvId) -> BackendResult<&ObjectInfo> {
        self.objects.get(id).ok_or(BackendError::UnknownObject(*id))
    }

    fn check_snapshot(&self, snapshot: &Snapshot) -> BackendResult<()> {
        let info = self.info(&snapshot.id)?;
        if snapshot.version > info.version {
            return Err(BackendError::UnknownVersion(*snapshot));
        }
        Ok(())
    }
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hints(name, IndexHints::default())
    }

    /// Create a new empty backend, sizing the object index from `hints`.
    pub fn with_hints(name: impl Into<String>, hints: IndexHints) -> Self {
        Self {
            name: name.into(),
            open: AtomicBool::new(false),
            state: RwLock::new(MemoryState::with_hints(&hints)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.state.read().expect("lock poisoned").objects.len()
    }

    /// Returns `true` if no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded dependency edges.
    pub fn edge_count(&self) -> usize {
        self.state.read().expect("lock poisoned").edges.len()
    }

    fn ensure_open(&self) -> BackendResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(BackendError::NotOpen)
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl Backend for InMemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> BackendResult<()> {
        if self.open.swap(true, Ordering::AcqRel) {
            return Err(BackendError::Init(format!(
                "backend {:?} is already open",
                self.name
            )));
        }
        debug!(backend = %self.name, "in-memory backend opened");
        Ok(())
    }

    fn close(&self) {
        if !self.open.swap(false, Ordering::AcqRel) {
            warn!(backend = %self.name, "close called on a backend that is not open");
            return;
        }
        debug!(backend = %self.name, "in-memory backend closed");
    }

    fn create_object(
        &self,
        key: &ObjectKey,
        container: Option<Snapshot>,
    ) -> BackendResult<ProvId> {
        self.ensure_open()?;
        if key.has_empty_component() {
            return Err(BackendError::InvalidArgument(format!(
                "object key {key} has an empty component"
            )));
        }

        let mut state = self.state.write().expect("lock poisoned");
        if let Some(container) = &container {
            state.check_snapshot(container)?;
        }
        if state.keys.contains_key(key) {
            return Err(BackendError::AlreadyExists(key.to_string()));
        }

        let mut id = ProvId::generate();
        while id.is_none() || state.objects.contains_key(&id) {
            id = ProvId::generate();
        }

        let info = ObjectInfo {
            id,
            version: Version::INITIAL,
            created_at: Utc::now(),
            key: key.clone(),
            container,
        };
        debug!(object = %info.summary(), "created object");
        state.keys.insert(key.clone(), id);
        state.objects.insert(id, info);
        Ok(id)
    }

    fn lookup_object(&self, key: &ObjectKey) -> BackendResult<ProvId> {
        self.ensure_open()?;
        let state = self.state.read().expect("lock poisoned");
        state
            .keys
            .get(key)
            .copied()
            .ok_or_else(|| BackendError::NotFound(key.to_string()))
    }

    fn object_info(&self, id: &ProvId) -> BackendResult<ObjectInfo> {
        self.ensure_open()?;
        let state = self.state.read().expect("lock poisoned");
        state.info(id).cloned()
    }

    fn all_objects(&self) -> BackendResult<Vec<ObjectInfo>> {
        self.ensure_open()?;
        let state = self.state.read().expect("lock poisoned");
        let mut all: Vec<ObjectInfo> = state.objects.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    fn new_version(&self, id: &ProvId) -> BackendResult<Version> {
        self.ensure_open()?;
        let mut state = self.state.write().expect("lock poisoned");
        let info = state
            .objects
            .get_mut(id)
            .ok_or(BackendError::UnknownObject(*id))?;
        let next = info.version.next().ok_or_else(|| {
            BackendError::Internal(format!("version counter exhausted for {id}"))
        })?;
        info.version = next;
        debug!(object = %info.summary(), "new version");
        Ok(next)
    }

    fn add_dependency(
        &self,
        dest: &ProvId,
        source: &ProvId,
        dependency: DependencyType,
    ) -> BackendResult<bool> {
        self.ensure_open()?;
        if dest == source {
            return Err(BackendError::InvalidArgument(format!(
                "object {dest} cannot depend on itself"
            )));
        }

        let mut state = self.state.write().expect("lock poisoned");
        let edge = Edge {
            dest: state.info(dest)?.current(),
            source: state.info(source)?.current(),
            dependency,
        };

        let duplicate = state
            .inputs
            .get(&edge.dest)
            .is_some_and(|indices| indices.iter().any(|&i| state.edges[i] == edge));
        if duplicate {
            debug!(dest = %edge.dest, source = %edge.source, "duplicate dependency ignored");
            return Ok(false);
        }

        let index = state.edges.len();
        state.edges.push(edge);
        state.inputs.entry(edge.dest).or_default().push(index);
        state.outputs.entry(edge.source).or_default().push(index);
        debug!(
            dest = %edge.dest,
            source = %edge.source,
            dependency = %dependency,
            "recorded dependency"
        );
        Ok(true)
    }

    fn ancestry(&self, query: &AncestryQuery) -> BackendResult<EdgeCursor> {
        self.ensure_open()?;
        let state = self.state.read().expect("lock poisoned");
        state.check_snapshot(&query.snapshot)?;

        let mut entries = Vec::new();
        let mut collect = |index: &SnapshotMap<Vec<usize>>, direction: EdgeDirection| {
            let Some(indices) = index.get(&query.snapshot) else {
                return;
            };
            for &i in indices {
                let edge = state.edges[i];
                if !query.filter.accepts(edge.dependency) {
                    continue;
                }
                let other = match direction {
                    EdgeDirection::Ancestor => edge.source,
                    EdgeDirection::Descendant => edge.dest,
                };
                entries.push(AncestryEntry {
                    query: query.snapshot,
                    other,
                    dependency: edge.dependency,
                    direction,
                });
            }
        };

        if query.direction.includes_ancestors() {
            collect(&state.inputs, EdgeDirection::Ancestor);
        }
        if query.direction.includes_descendants() {
            collect(&state.outputs, EdgeDirection::Descendant);
        }

        Ok(Box::new(entries.into_iter().map(Ok::<_, BackendError>)))
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .field("object_count", &self.len())
            .field("edge_count", &self.edge_count())
            .finish()
    }
}
