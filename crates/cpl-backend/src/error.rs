use cpl_types::{ProvId, Snapshot, Status};

/// Errors reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend could not establish its connection or storage.
    #[error("backend initialization failed: {0}")]
    Init(String),

    /// The backend is not open (never opened, or already closed).
    #[error("backend is not open")]
    NotOpen,

    /// A referenced object does not exist.
    #[error("unknown object: {0}")]
    UnknownObject(ProvId),

    /// A referenced object exists but not at the requested version.
    #[error("unknown version: {0}")]
    UnknownVersion(Snapshot),

    /// Any other malformed request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The object being created is already registered.
    #[error("object already exists: {0}")]
    AlreadyExists(String),

    /// The underlying store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error from the underlying store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend does not support this operation.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Invariant violated inside the backend.
    #[error("internal backend error: {0}")]
    Internal(String),
}

impl BackendError {
    /// The status code this error reports.
    pub fn status(&self) -> Status {
        match self {
            Self::Init(_) => Status::BackendInitFailure,
            Self::NotOpen => Status::NotAttached,
            Self::UnknownObject(_) | Self::UnknownVersion(_) | Self::InvalidArgument(_) => {
                Status::InvalidArgument
            }
            Self::NotFound(_) => Status::NotFound,
            Self::AlreadyExists(_) => Status::AlreadyExists,
            Self::Storage(_) | Self::Io(_) => Status::StorageError,
            Self::NotImplemented(_) => Status::NotImplemented,
            Self::Internal(_) => Status::InternalError,
        }
    }
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
