//! Error types for tree file system operations.

use thiserror::Error;

/// Failures reported by [`FsBackend`](crate::FsBackend) operations.
///
/// Every variant is recoverable: an operation that returns an error has left the tree
/// exactly as it found it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("{0}: already exists")]
    NameCollision(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: is a directory")]
    NotAFile(String),

    #[error("{0}: directory not empty")]
    NonEmptyDirectory(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
