//! The message query adapter
//!
//! [`EmailProvider`] routes `content://` addresses to read-only queries
//! against the addressed account's local message store. Every query gets
//! the implicit not-deleted, not-placeholder filter appended, and every
//! returned cursor is wrapped so `_id` lookups resolve the store's `id`
//! primary key.

pub mod uri;

use std::sync::Arc;

use rusqlite::types::Value;

use crate::columns;
use crate::cursor::{IdAliasCursor, RowCursor};
use crate::models::AccountRegistry;
use crate::notify::ChangeNotifier;
use crate::storage::{Access, StorageError};

use self::uri::{UriMatch, match_uri};

/// Table served by the provider.
const MESSAGES_TABLE: &str = "messages";

/// Cursor type returned by [`EmailProvider::query`].
pub type MessageCursor = IdAliasCursor<RowCursor>;

/// Column/value pairs for an insert or update request. Present so the
/// write signatures match the content interface; writes are unsupported
/// in this revision.
pub type RowValues<'a> = &'a [(&'a str, Value)];

/// Failures surfaced by the provider.
///
/// Invalid requests (URI shape, unknown account, unsupported operation)
/// are distinct from backend failures so callers can tell a contract
/// violation apart from a store that went away.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown URI: {uri}")]
    InvalidUri { uri: String },

    #[error("unknown account: {uuid}")]
    UnknownAccount { uuid: String },

    #[error("{operation} is not supported by this provider")]
    Unsupported { operation: &'static str },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Read-only query access to per-account message stores.
///
/// The registry and notifier are injected at construction; the provider
/// holds no other state and caches nothing across calls.
pub struct EmailProvider {
    registry: Arc<dyn AccountRegistry>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl EmailProvider {
    pub fn new(registry: Arc<dyn AccountRegistry>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { registry, notifier }
    }

    /// Query the collection addressed by `uri`.
    ///
    /// `projection` is the ordered list of requested columns (empty means
    /// the full table). `selection` is an optional SQL boolean expression
    /// with positional `?` parameters bound from `selection_args`;
    /// `sort_order` is an optional ORDER BY body. Both clauses are
    /// store-native SQL text from in-process callers; the provider
    /// parenthesizes the selection so its operators cannot widen the
    /// implicit filter, but performs no other sanitization.
    ///
    /// Returns a cursor over the matching rows, registered for change
    /// notifications under `uri`, with `_id` lookups aliased to `id`.
    /// Rows with `deleted = 1` or `empty = 1` are never returned.
    pub fn query(
        &self,
        uri: &str,
        projection: &[&str],
        selection: Option<&str>,
        selection_args: &[Value],
        sort_order: Option<&str>,
    ) -> Result<MessageCursor, ProviderError> {
        match match_uri(uri)? {
            UriMatch::Messages { account_uuid } => {
                log::debug!("message query for account {account_uuid}");

                let mut cursor = self.messages(
                    &account_uuid,
                    projection,
                    selection,
                    selection_args,
                    sort_order,
                )?;

                cursor.set_notification_uri(uri);
                self.notifier.register(uri);

                Ok(IdAliasCursor::new(cursor))
            }
        }
    }

    /// Resolve the type of the collection addressed by `uri`.
    pub fn resolve_type(&self, _uri: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unsupported {
            operation: "type resolution",
        })
    }

    /// Insert a row into the collection addressed by `uri`.
    pub fn insert(&self, _uri: &str, _values: RowValues<'_>) -> Result<String, ProviderError> {
        Err(ProviderError::Unsupported {
            operation: "insert",
        })
    }

    /// Update rows in the collection addressed by `uri`.
    pub fn update(
        &self,
        _uri: &str,
        _values: RowValues<'_>,
        _selection: Option<&str>,
        _selection_args: &[Value],
    ) -> Result<usize, ProviderError> {
        Err(ProviderError::Unsupported {
            operation: "update",
        })
    }

    /// Delete rows from the collection addressed by `uri`.
    pub fn delete(
        &self,
        _uri: &str,
        _selection: Option<&str>,
        _selection_args: &[Value],
    ) -> Result<usize, ProviderError> {
        Err(ProviderError::Unsupported {
            operation: "delete",
        })
    }

    fn messages(
        &self,
        account_uuid: &str,
        projection: &[&str],
        selection: Option<&str>,
        selection_args: &[Value],
        sort_order: Option<&str>,
    ) -> Result<RowCursor, ProviderError> {
        let account =
            self.registry
                .account(account_uuid)
                .ok_or_else(|| ProviderError::UnknownAccount {
                    uuid: account_uuid.to_string(),
                })?;

        let store = account.local_store()?;
        let database = store.database();

        let where_clause = effective_selection(selection);
        let sql = build_select(MESSAGES_TABLE, projection, &where_clause, sort_order);

        let cursor = database.execute(Access::Shared, |conn| {
            RowCursor::fetch(conn, &sql, selection_args).map_err(StorageError::from)
        })?;

        Ok(cursor)
    }
}

/// Compose the caller's selection with the mandatory implicit filter.
///
/// The caller's expression is parenthesized so that its internal
/// operators (`OR` in particular) cannot change what the appended
/// `AND` terms apply to.
fn effective_selection(selection: Option<&str>) -> String {
    let implicit = format!(
        "{deleted} = 0 AND {empty} != 1",
        deleted = columns::internal::DELETED,
        empty = columns::internal::EMPTY,
    );

    match selection {
        Some(selection) if !selection.trim().is_empty() => {
            format!("({selection}) AND {implicit}")
        }
        _ => implicit,
    }
}

/// Assemble the SELECT for a projection, WHERE clause, and sort order.
fn build_select(
    table: &str,
    projection: &[&str],
    where_clause: &str,
    sort_order: Option<&str>,
) -> String {
    let columns = if projection.is_empty() {
        "*".to_string()
    } else {
        projection.join(", ")
    };

    let mut sql = format!("SELECT {columns} FROM {table} WHERE {where_clause}");

    if let Some(order) = sort_order {
        if !order.trim().is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
    }

    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_selection_without_caller_filter() {
        assert_eq!(effective_selection(None), "deleted = 0 AND empty != 1");
        assert_eq!(effective_selection(Some("")), "deleted = 0 AND empty != 1");
        assert_eq!(
            effective_selection(Some("   ")),
            "deleted = 0 AND empty != 1"
        );
    }

    #[test]
    fn test_effective_selection_parenthesizes_caller_filter() {
        assert_eq!(
            effective_selection(Some("folder_id = ?")),
            "(folder_id = ?) AND deleted = 0 AND empty != 1"
        );
        // An OR filter must not be able to widen the implicit terms.
        assert_eq!(
            effective_selection(Some("folder_id = ? OR flags LIKE ?")),
            "(folder_id = ? OR flags LIKE ?) AND deleted = 0 AND empty != 1"
        );
    }

    #[test]
    fn test_build_select_default_projection() {
        assert_eq!(
            build_select("messages", &[], "deleted = 0", None),
            "SELECT * FROM messages WHERE deleted = 0"
        );
    }

    #[test]
    fn test_build_select_projection_and_order() {
        assert_eq!(
            build_select(
                "messages",
                &["id", "subject"],
                "deleted = 0",
                Some("date DESC")
            ),
            "SELECT id, subject FROM messages WHERE deleted = 0 ORDER BY date DESC"
        );
    }

    #[test]
    fn test_build_select_ignores_blank_order() {
        assert_eq!(
            build_select("messages", &["id"], "deleted = 0", Some("  ")),
            "SELECT id FROM messages WHERE deleted = 0"
        );
    }
}
