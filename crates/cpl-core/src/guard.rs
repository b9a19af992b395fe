//! Scoped attach/detach.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use cpl_backend::Backend;

use crate::error::{CplError, CplResult};
use crate::global;
use crate::session::{SessionId, SessionSlot};

/// Holds a session attached for the lifetime of the guard.
///
/// The backend is detached exactly once when the guard is dropped, whether
/// the scope ends normally, through `?`, or by unwinding. The guard owns only
/// the session it started: if that session was detached inside the scope,
/// dropping the guard leaves the slot alone, even when the same backend has
/// been attached again since.
///
/// ```ignore
/// let session = SessionGuard::attach(&slot, backend)?;
/// let edges = session.ancestry_vec(id, Version::INITIAL, Direction::Ancestors, DependencyFilter::All)?;
/// ```
#[must_use = "the session is detached as soon as the guard is dropped"]
pub struct SessionGuard<'a> {
    slot: &'a SessionSlot,
    backend: Arc<dyn Backend>,
    session: SessionId,
}

impl<'a> SessionGuard<'a> {
    /// Attach `backend` to `slot`.
    pub fn attach(slot: &'a SessionSlot, backend: Arc<dyn Backend>) -> CplResult<Self> {
        let session = slot.attach_session(Arc::clone(&backend)).map_err(|e| {
            CplError::BackendInitFailure(format!(
                "failed to initialize the Core Provenance Library: {e}"
            ))
        })?;
        Ok(Self {
            slot,
            backend,
            session,
        })
    }

    pub fn slot(&self) -> &'a SessionSlot {
        self.slot
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// The session this guard started.
    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl SessionGuard<'static> {
    /// Attach `backend` to the process-wide session.
    pub fn global(backend: Arc<dyn Backend>) -> CplResult<Self> {
        Self::attach(global::session(), backend)
    }
}

impl Deref for SessionGuard<'_> {
    type Target = SessionSlot;

    fn deref(&self) -> &SessionSlot {
        self.slot
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.slot.detach_session(self.session);
    }
}

impl fmt::Debug for SessionGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("backend", &self.backend.name())
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InstrumentedBackend;
    use cpl_types::Status;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn detaches_once_at_scope_end() {
        let slot = SessionSlot::new();
        let backend = InstrumentedBackend::new("scoped");
        {
            let guard = SessionGuard::attach(&slot, backend.clone()).unwrap();
            assert!(guard.is_attached());
            guard.create_object("org", "x", "file", None).unwrap();
        }
        assert!(!slot.is_attached());
        assert_eq!(backend.opens(), 1);
        assert_eq!(backend.closes(), 1);
    }

    #[test]
    fn detaches_on_early_return() {
        fn work(slot: &SessionSlot, backend: Arc<dyn Backend>) -> CplResult<()> {
            let session = SessionGuard::attach(slot, backend)?;
            session.lookup_object("org", "absent", "file")?;
            Ok(())
        }

        let slot = SessionSlot::new();
        let backend = InstrumentedBackend::new("early");
        let err = work(&slot, backend.clone()).unwrap_err();
        assert_eq!(err.status(), Some(Status::NotFound));
        assert!(!slot.is_attached());
        assert_eq!(backend.closes(), 1);
    }

    #[test]
    fn detaches_on_panic() {
        let slot = SessionSlot::new();
        let backend = InstrumentedBackend::new("panicky");
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _session = SessionGuard::attach(&slot, backend.clone()).unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!slot.is_attached());
        assert_eq!(backend.closes(), 1);
    }

    #[test]
    fn failed_init_never_detaches() {
        let slot = SessionSlot::new();
        let broken = InstrumentedBackend::failing_open("broken");
        let err = SessionGuard::attach(&slot, broken.clone()).unwrap_err();
        assert_eq!(err.status(), Some(Status::BackendInitFailure));
        assert!(err
            .to_string()
            .contains("failed to initialize the Core Provenance Library"));
        assert!(!slot.is_attached());
        assert_eq!(broken.closes(), 0);
    }

    #[test]
    fn existing_session_survives_a_rejected_guard() {
        let slot = SessionSlot::new();
        let first = InstrumentedBackend::new("first");
        slot.attach(first.clone()).unwrap();

        let second = InstrumentedBackend::new("second");
        assert!(SessionGuard::attach(&slot, second.clone()).is_err());
        assert_eq!(slot.backend_name().as_deref(), Some("first"));
        assert_eq!(first.closes(), 0);
        assert_eq!(second.opens(), 0);
    }

    #[test]
    fn manual_detach_inside_scope_is_not_repeated() {
        let slot = SessionSlot::new();
        let backend = InstrumentedBackend::new("manual");
        {
            let guard = SessionGuard::attach(&slot, backend.clone()).unwrap();
            guard.detach();
        }
        assert_eq!(backend.closes(), 1);
    }

    #[test]
    fn reattached_backend_outlives_the_guard() {
        let slot = SessionSlot::new();
        let backend = InstrumentedBackend::new("reattached");
        {
            let guard = SessionGuard::attach(&slot, backend.clone()).unwrap();
            guard.detach();
            slot.attach(backend.clone()).unwrap();
            assert_ne!(slot.session_id(), Some(guard.session()));
        }
        assert!(slot.is_attached());
        assert_eq!(backend.closes(), 1);

        slot.detach();
        assert_eq!(backend.closes(), 2);
    }
}
