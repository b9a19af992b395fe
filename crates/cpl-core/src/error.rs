//! Error type for engine operations.

use cpl_backend::BackendError;
use cpl_types::{error_string, Status, TypeError};

/// Errors returned by the session and query engine.
///
/// Every variant reduces to a numeric code via [`CplError::code`]. Codes
/// outside the [`Status`] enumeration survive unchanged in
/// [`CplError::Unknown`], so an abort code returned by a callback reaches the
/// caller verbatim.
#[derive(Debug, thiserror::Error)]
pub enum CplError {
    /// A session is already attached; carries the attached backend's name.
    #[error("a backend is already attached: {0}")]
    AlreadyAttached(String),

    /// No session is attached.
    #[error("no backend is attached")]
    NotAttached,

    #[error("{0}")]
    BackendInitFailure(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A status code outside the enumeration.
    #[error("{}", unknown_message(.0))]
    Unknown(u64),
}

impl CplError {
    /// The enumerated status, or `None` for [`CplError::Unknown`].
    pub fn status(&self) -> Option<Status> {
        let status = match self {
            Self::AlreadyAttached(_) => Status::AlreadyAttached,
            Self::NotAttached => Status::NotAttached,
            Self::BackendInitFailure(_) => Status::BackendInitFailure,
            Self::InvalidArgument(_) | Self::Config(_) => Status::InvalidArgument,
            Self::NotFound(_) => Status::NotFound,
            Self::AlreadyExists(_) => Status::AlreadyExists,
            Self::Storage(_) => Status::StorageError,
            Self::NotImplemented(_) => Status::NotImplemented,
            Self::Internal(_) => Status::InternalError,
            Self::Unknown(_) => return None,
        };
        Some(status)
    }

    /// The numeric status code.
    pub fn code(&self) -> u64 {
        match self {
            Self::Unknown(code) => *code,
            other => other.status().map_or(Status::InternalError.code(), |s| s.code()),
        }
    }

    /// Rebuild an error from a raw status code. `None` for success.
    pub fn from_code(code: u64) -> Option<CplError> {
        let Some(status) = Status::from_code(code) else {
            return Some(Self::Unknown(code));
        };
        let message = status.message().to_string();
        let err = match status {
            Status::Success => return None,
            Status::AlreadyAttached => Self::AlreadyAttached(message),
            Status::NotAttached => Self::NotAttached,
            Status::BackendInitFailure => Self::BackendInitFailure(message),
            Status::InvalidArgument => Self::InvalidArgument(message),
            Status::NotFound => Self::NotFound(message),
            Status::AlreadyExists => Self::AlreadyExists(message),
            Status::StorageError => Self::Storage(message),
            Status::NotImplemented => Self::NotImplemented(message),
            Status::InternalError => Self::Internal(message),
        };
        Some(err)
    }
}

impl From<BackendError> for CplError {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err.status() {
            Status::Success => Self::Internal(message),
            Status::AlreadyAttached => Self::AlreadyAttached(message),
            Status::NotAttached => Self::NotAttached,
            Status::BackendInitFailure => Self::BackendInitFailure(message),
            Status::InvalidArgument => Self::InvalidArgument(message),
            Status::NotFound => Self::NotFound(message),
            Status::AlreadyExists => Self::AlreadyExists(message),
            Status::StorageError => Self::Storage(message),
            Status::NotImplemented => Self::NotImplemented(message),
            Status::InternalError => Self::Internal(message),
        }
    }
}

impl From<TypeError> for CplError {
    fn from(err: TypeError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

fn unknown_message(code: &u64) -> String {
    error_string(*code).into_owned()
}

/// Result alias for engine operations.
pub type CplResult<T> = Result<T, CplError>;
