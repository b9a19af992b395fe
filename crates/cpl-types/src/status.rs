//! Status codes and their human-readable messages.
//!
//! Every fallible CPL operation can be reduced to a [`Status`]. The numeric
//! domain is `u64`; values outside the enumeration are reported as unknown
//! but remain printable through [`error_string`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed status taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    AlreadyAttached,
    BackendInitFailure,
    InvalidArgument,
    NotFound,
    StorageError,
    InternalError,
    NotAttached,
    AlreadyExists,
    NotImplemented,
}

impl Status {
    pub const ALL: [Status; 10] = [
        Self::Success,
        Self::AlreadyAttached,
        Self::BackendInitFailure,
        Self::InvalidArgument,
        Self::NotFound,
        Self::StorageError,
        Self::InternalError,
        Self::NotAttached,
        Self::AlreadyExists,
        Self::NotImplemented,
    ];

    pub const fn code(&self) -> u64 {
        match self {
            Self::Success => 0,
            Self::AlreadyAttached => 1,
            Self::BackendInitFailure => 2,
            Self::InvalidArgument => 3,
            Self::NotFound => 4,
            Self::StorageError => 5,
            Self::InternalError => 6,
            Self::NotAttached => 7,
            Self::AlreadyExists => 8,
            Self::NotImplemented => 9,
        }
    }

    /// `None` for codes outside the enumeration.
    pub const fn from_code(code: u64) -> Option<Status> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::AlreadyAttached),
            2 => Some(Self::BackendInitFailure),
            3 => Some(Self::InvalidArgument),
            4 => Some(Self::NotFound),
            5 => Some(Self::StorageError),
            6 => Some(Self::InternalError),
            7 => Some(Self::NotAttached),
            8 => Some(Self::AlreadyExists),
            9 => Some(Self::NotImplemented),
            _ => None,
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AlreadyAttached => "a backend is already attached to the session",
            Self::BackendInitFailure => "the backend failed to initialize",
            Self::InvalidArgument => "invalid argument: unknown object or version reference",
            Self::NotFound => "the requested object was not found",
            Self::StorageError => "the storage backend reported an error",
            Self::InternalError => "internal error",
            Self::NotAttached => "no backend is attached to the session",
            Self::AlreadyExists => "the object already exists",
            Self::NotImplemented => "the operation is not implemented by the backend",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Status> for u64 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

/// Message for any status code.
///
/// Total over the whole `u64` domain: unknown codes yield a message naming
/// the code instead of failing.
pub fn error_string(code: u64) -> Cow<'static, str> {
    match Status::from_code(code) {
        Some(status) => Cow::Borrowed(status.message()),
        None => Cow::Owned(format!("unrecognized error code {code} ({code:#x})")),
    }
}
