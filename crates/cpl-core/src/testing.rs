//! Test support: an instrumented backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpl_backend::{
    AncestryQuery, Backend, BackendError, BackendResult, EdgeCursor, InMemoryBackend, ObjectInfo,
    ObjectKey,
};
use cpl_types::{DependencyType, ProvId, Snapshot, Version};

/// Wraps [`InMemoryBackend`], counting lifecycle calls and injecting failures.
pub(crate) struct InstrumentedBackend {
    inner: InMemoryBackend,
    opens: AtomicUsize,
    closes: AtomicUsize,
    ancestry_calls: AtomicUsize,
    fail_open: bool,
    /// Cursor yields a storage error after this many entries.
    fail_after: Option<usize>,
}

impl InstrumentedBackend {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self::build(name, false, None))
    }

    pub(crate) fn failing_open(name: &str) -> Arc<Self> {
        Arc::new(Self::build(name, true, None))
    }

    pub(crate) fn failing_after(name: &str, entries: usize) -> Arc<Self> {
        Arc::new(Self::build(name, false, Some(entries)))
    }

    fn build(name: &str, fail_open: bool, fail_after: Option<usize>) -> Self {
        Self {
            inner: InMemoryBackend::new(name),
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            ancestry_calls: AtomicUsize::new(0),
            fail_open,
            fail_after,
        }
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn ancestry_calls(&self) -> usize {
        self.ancestry_calls.load(Ordering::SeqCst)
    }
}

impl Backend for InstrumentedBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn open(&self) -> BackendResult<()> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(BackendError::Init("connection refused".into()));
        }
        self.inner.open()
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close();
    }

    fn create_object(
        &self,
        key: &ObjectKey,
        container: Option<Snapshot>,
    ) -> BackendResult<ProvId> {
        self.inner.create_object(key, container)
    }

    fn lookup_object(&self, key: &ObjectKey) -> BackendResult<ProvId> {
        self.inner.lookup_object(key)
    }

    fn object_info(&self, id: &ProvId) -> BackendResult<ObjectInfo> {
        self.inner.object_info(id)
    }

    fn all_objects(&self) -> BackendResult<Vec<ObjectInfo>> {
        self.inner.all_objects()
    }

    fn new_version(&self, id: &ProvId) -> BackendResult<Version> {
        self.inner.new_version(id)
    }

    fn add_dependency(
        &self,
        dest: &ProvId,
        source: &ProvId,
        dependency: DependencyType,
    ) -> BackendResult<bool> {
        self.inner.add_dependency(dest, source, dependency)
    }

    fn ancestry(&self, query: &AncestryQuery) -> BackendResult<EdgeCursor> {
        self.ancestry_calls.fetch_add(1, Ordering::SeqCst);
        let cursor = self.inner.ancestry(query)?;
        let Some(limit) = self.fail_after else {
            return Ok(cursor);
        };
        let failing = cursor.take(limit).chain(std::iter::once(Err(BackendError::Storage(
            "read failed mid-scan".into(),
        ))));
        Ok(Box::new(failing))
    }
}

/// Register `count` inputs of a fresh `output` object, returning both.
pub(crate) fn fan_in(backend: &dyn Backend, count: usize) -> (ProvId, Vec<ProvId>) {
    let output = backend
        .create_object(&ObjectKey::new("tests", "output", "file"), None)
        .unwrap();
    let inputs = (0..count)
        .map(|i| {
            let input = backend
                .create_object(&ObjectKey::new("tests", format!("input-{i}"), "file"), None)
                .unwrap();
            backend
                .add_dependency(&output, &input, DependencyType::DataInput)
                .unwrap();
            input
        })
        .collect();
    (output, inputs)
}
