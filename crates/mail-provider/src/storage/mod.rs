//! Storage layer for the message provider
//!
//! [`LocalStore`] owns a per-account SQLite database; [`LockableDatabase`]
//! guards access to it and is the only serialization point in the crate.

mod lockable;
mod store;

pub use lockable::{Access, LockableDatabase, StorageError};
pub use store::LocalStore;
