use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("malformed identifier {0:?}: expected <hi>:<lo>")]
    MalformedId(String),

    #[error("unknown dependency type code: {0:#x}")]
    UnknownDependencyType(u16),

    #[error("invalid index hints: {0}")]
    InvalidIndexHints(String),
}
