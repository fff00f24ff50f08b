//! Vega Mail message provider - URI-addressed read access to the local message store
//!
//! This crate exposes the per-account message database to other
//! application components through a uniform, URI-addressed query
//! interface:
//! - URI matching for `content://org.vegamail.provider.email/account/<uuid>/messages`
//! - Account resolution through an injected registry
//! - An implicit filter excluding soft-deleted and placeholder rows,
//!   forced onto every query
//! - A cursor wrapper exposing the `id` primary key under the `_id`
//!   alias that generic list-display callers bind to
//!
//! The provider is read-only in this revision: insert, update, delete,
//! and type resolution all fail with [`ProviderError::Unsupported`].
//! Writes to the message store belong to the mail-sync subsystem.

pub mod columns;
pub mod cursor;
pub mod models;
pub mod notify;
pub mod provider;
pub mod storage;

pub use cursor::{Cursor, IdAliasCursor, RowCursor, UnknownColumn};
pub use models::{Account, AccountRegistry, Accounts};
pub use notify::{ChangeNotifier, NotificationHub};
pub use provider::uri::{AUTHORITY, SCHEME, UriMatch, match_uri, messages_uri};
pub use provider::{EmailProvider, MessageCursor, ProviderError, RowValues};
pub use storage::{Access, LocalStore, LockableDatabase, StorageError};
