//! An in-memory hierarchical file system for Rust.
//! Models files and directories as a tree kept entirely in process memory and drives it with
//! shell-style operations. Ideal for teaching, testing and sandboxed experiments.
//!
//! ### Overview
//!
//! `treefs-kit` lets you work with a filesystem-like structure without touching the actual
//! disk. It defines the generic `FsBackend` trait and provides the `TreeFS` implementation.
//!
//! **Key ideas**:
//! - **One resolver**: absolute paths, relative paths, `.`/`..` segments and repeated slashes
//!   are handled the same way by every operation.
//! - **Atomicity**: an operation either applies one complete edit or fails with an
//!   [`FsError`] and leaves the tree untouched.
//! - **Determinism**: children keep insertion order, so listings and `find` results are stable.
//! - **Observability**: mutations emit `tracing` events; install any subscriber to see them.

mod core;
mod error;
mod vfs;

pub use crate::core::{FsBackend, Result, WriteMode};
pub use error::FsError;
pub use vfs::{EntryType, Metadata, TreeFS};
