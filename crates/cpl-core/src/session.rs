//! Backend session lifecycle.
//!
//! A [`SessionSlot`] binds the engine to at most one [`Backend`]. It starts
//! `Detached`; [`attach`](SessionSlot::attach) opens a backend and moves to
//! `Attached`; [`detach`](SessionSlot::detach) closes it and moves back. The
//! state check and the transition happen under one write lock, so concurrent
//! attach attempts are serialized and exactly one of them can win.
//!
//! Every successful attach starts a new session, numbered by a per-slot
//! generation counter. [`detach_session`](SessionSlot::detach_session) ends a
//! session only if it is still the current one, even when the same backend
//! has since been detached and attached again.
//!
//! The process-wide session used by the free functions in [`crate::global`]
//! is a `static` slot; tests and embedders can create their own slots.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use cpl_backend::Backend;
use cpl_types::Status;

use crate::error::{CplError, CplResult};

/// Observable lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Detached,
    Attached,
}

/// Identifies one attach of a [`SessionSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

struct Attached {
    backend: Arc<dyn Backend>,
    session: SessionId,
}

/// A session holding at most one attached backend.
pub struct SessionSlot {
    current: RwLock<Option<Attached>>,
    generation: AtomicU64,
}

impl SessionSlot {
    /// A detached slot.
    pub const fn new() -> Self {
        Self {
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.is_attached() {
            SessionState::Attached
        } else {
            SessionState::Detached
        }
    }

    pub fn is_attached(&self) -> bool {
        self.current.read().expect("lock poisoned").is_some()
    }

    /// Name of the attached backend, if any.
    pub fn backend_name(&self) -> Option<String> {
        self.current
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map(|a| a.backend.name().to_string())
    }

    /// The current session, if attached.
    pub fn session_id(&self) -> Option<SessionId> {
        self.current
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map(|a| a.session)
    }

    /// Attach `backend` to this session.
    ///
    /// Fails with [`CplError::AlreadyAttached`] if a backend is already
    /// attached; the existing session is left untouched and `backend` is
    /// never opened. Any failure of [`Backend::open`] is reported as
    /// [`CplError::BackendInitFailure`] and the slot stays detached.
    pub fn attach(&self, backend: Arc<dyn Backend>) -> CplResult<()> {
        self.attach_session(backend).map(|_| ())
    }

    /// [`attach`](Self::attach), returning the id of the new session.
    pub fn attach_session(&self, backend: Arc<dyn Backend>) -> CplResult<SessionId> {
        let mut current = self.current.write().expect("lock poisoned");
        if let Some(attached) = current.as_ref() {
            warn!(
                current = attached.backend.name(),
                requested = backend.name(),
                "attach rejected: session already attached"
            );
            return Err(CplError::AlreadyAttached(attached.backend.name().to_string()));
        }

        if let Err(e) = backend.open() {
            warn!(backend = backend.name(), error = %e, "backend failed to initialize");
            return Err(CplError::BackendInitFailure(format!(
                "backend {:?} failed to initialize: {e}",
                backend.name()
            )));
        }

        let session = SessionId(self.generation.fetch_add(1, Ordering::Relaxed) + 1);
        info!(backend = backend.name(), %session, "session attached");
        *current = Some(Attached { backend, session });
        Ok(session)
    }

    /// [`attach`](Self::attach), reduced to a status code.
    pub fn attach_status(&self, backend: Arc<dyn Backend>) -> Status {
        match self.attach(backend) {
            Ok(()) => Status::Success,
            Err(e) => e.status().unwrap_or(Status::InternalError),
        }
    }

    /// Close the attached backend and return to `Detached`.
    ///
    /// Never fails. Calling it on a detached slot does nothing.
    pub fn detach(&self) {
        let mut current = self.current.write().expect("lock poisoned");
        match current.take() {
            Some(attached) => close(attached),
            None => debug!("detach on a detached session ignored"),
        }
    }

    /// Detach only if `session` is still the current session.
    ///
    /// Returns `true` if it was and its backend has now been closed.
    pub fn detach_session(&self, session: SessionId) -> bool {
        let mut current = self.current.write().expect("lock poisoned");
        let matches = current.as_ref().is_some_and(|a| a.session == session);
        if !matches {
            debug!(%session, "stale session detach ignored");
            return false;
        }
        if let Some(attached) = current.take() {
            close(attached);
        }
        true
    }

    /// The attached backend.
    ///
    /// The returned handle is independent of the slot's lock, so callers may
    /// use it while other threads attach or detach; a backend closed in the
    /// meantime reports its own "not open" error.
    pub fn backend(&self) -> CplResult<Arc<dyn Backend>> {
        self.current
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map(|a| Arc::clone(&a.backend))
            .ok_or(CplError::NotAttached)
    }
}

fn close(attached: Attached) {
    attached.backend.close();
    info!(
        backend = attached.backend.name(),
        session = %attached.session,
        "session detached"
    );
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        let current = self.current.get_mut().map(Option::take);
        if let Ok(Some(attached)) = current {
            attached.backend.close();
            debug!(
                backend = attached.backend.name(),
                "session dropped while attached; backend closed"
            );
        }
    }
}

impl fmt::Debug for SessionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSlot")
            .field("backend", &self.backend_name())
            .field("session", &self.session_id())
            .finish()
    }
}
