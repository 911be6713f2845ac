//! Filesystem abstraction for the Quill site engine.
//!
//! The build pipeline never touches `std::fs` directly; everything goes
//! through the [`Storage`] trait so the engine can run against the real
//! filesystem ([`FsStorage`]) or an in-memory tree ([`MockStorage`], behind
//! the `mock` feature) in tests.

mod fs;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
