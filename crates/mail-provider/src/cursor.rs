//! Row cursors returned by the message provider
//!
//! A [`Cursor`] is a forward-iterable, closable row sequence. Queries
//! produce a materialized [`RowCursor`]; the provider hands it back
//! wrapped in an [`IdAliasCursor`] so callers that bind the conventional
//! `_id` column name resolve the store's real `id` column.

use rusqlite::Connection;
use rusqlite::types::Value;

use crate::columns;

/// A column name that does not exist in the result set.
#[derive(Debug, thiserror::Error)]
#[error("no such column: {0}")]
pub struct UnknownColumn(pub String);

/// Forward-iterable, closable row sequence.
///
/// The cursor starts positioned before the first row; call
/// [`Cursor::move_to_next`] to advance. Values are read by column index
/// for the current row. Both name-lookup modes are provided because
/// callers rely on both: an optional lookup for probing and a failing
/// lookup for columns the caller requires.
pub trait Cursor {
    /// Advance to the next row. Returns false once the end is reached.
    fn move_to_next(&mut self) -> bool;

    /// Total number of rows in the result.
    fn count(&self) -> usize;

    /// Column names of the result, in projection order.
    fn column_names(&self) -> &[String];

    /// Resolve a column name to its index, or None if absent.
    fn column_index(&self, name: &str) -> Option<usize>;

    /// Resolve a column name to its index, failing if absent.
    fn column_index_or_err(&self, name: &str) -> Result<usize, UnknownColumn>;

    /// Value at `index` in the current row. None before the first row,
    /// after the last, or for an out-of-range index.
    fn value(&self, index: usize) -> Option<&Value>;

    /// Release the result. Subsequent navigation returns false.
    fn close(&mut self);

    /// Whether [`Cursor::close`] has been called.
    fn is_closed(&self) -> bool;

    /// URI this cursor was registered under for change notifications.
    fn notification_uri(&self) -> Option<&str>;

    /// Integer value at `index` in the current row, if present.
    fn get_i64(&self, index: usize) -> Option<i64> {
        match self.value(index) {
            Some(Value::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    /// Text value at `index` in the current row, if present.
    fn get_str(&self, index: usize) -> Option<&str> {
        match self.value(index) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Materialized query result.
///
/// Rows are decoded eagerly so the cursor outlives the database lock the
/// query ran under.
#[derive(Debug)]
pub struct RowCursor {
    column_names: Vec<String>,
    rows: Vec<Vec<Value>>,
    current: Option<usize>,
    closed: bool,
    notification_uri: Option<String>,
}

impl RowCursor {
    /// Execute `sql` with positional `params` and materialize the result.
    pub fn fetch(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<Self> {
        let mut stmt = conn.prepare(sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|s| s.to_string()).collect();
        let column_count = column_names.len();

        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter().cloned()), |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(row.get::<_, Value>(i)?);
                }
                Ok(values)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            column_names,
            rows,
            current: None,
            closed: false,
            notification_uri: None,
        })
    }

    /// Stamp the URI this cursor is registered under.
    pub fn set_notification_uri(&mut self, uri: &str) {
        self.notification_uri = Some(uri.to_string());
    }

    #[cfg(test)]
    fn from_parts(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            column_names,
            rows,
            current: None,
            closed: false,
            notification_uri: None,
        }
    }
}

impl Cursor for RowCursor {
    fn move_to_next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let next = match self.current {
            None => 0,
            Some(i) => i.saturating_add(1),
        };
        if next < self.rows.len() {
            self.current = Some(next);
            true
        } else {
            self.current = Some(self.rows.len());
            false
        }
    }

    fn count(&self) -> usize {
        self.rows.len()
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|n| n == name)
    }

    fn column_index_or_err(&self, name: &str) -> Result<usize, UnknownColumn> {
        self.column_index(name)
            .ok_or_else(|| UnknownColumn(name.to_string()))
    }

    fn value(&self, index: usize) -> Option<&Value> {
        if self.closed {
            return None;
        }
        self.current
            .and_then(|i| self.rows.get(i))
            .and_then(|row| row.get(index))
    }

    fn close(&mut self) {
        self.closed = true;
        self.rows.clear();
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn notification_uri(&self) -> Option<&str> {
        self.notification_uri.as_deref()
    }
}

/// Cursor decorator mapping the `_id` primary-key alias to `id`.
///
/// List-display callers expect a stable id under the column name `_id`,
/// while the store uses `id` as its primary key in all tables. This
/// wrapper redirects name-based lookups for `_id` to `id`; every other
/// name, and all row data, pass through unchanged. Note this only
/// applies to the returned cursor: projections and filters handed to the
/// provider still use [`columns::ID`].
#[derive(Debug)]
pub struct IdAliasCursor<C: Cursor> {
    inner: C,
}

impl<C: Cursor> IdAliasCursor<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    fn resolve<'a>(name: &'a str) -> &'a str {
        if name == columns::PK_ALIAS {
            columns::ID
        } else {
            name
        }
    }
}

impl<C: Cursor> Cursor for IdAliasCursor<C> {
    fn move_to_next(&mut self) -> bool {
        self.inner.move_to_next()
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn column_names(&self) -> &[String] {
        self.inner.column_names()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.inner.column_index(Self::resolve(name))
    }

    fn column_index_or_err(&self, name: &str) -> Result<usize, UnknownColumn> {
        self.inner.column_index_or_err(Self::resolve(name))
    }

    fn value(&self, index: usize) -> Option<&Value> {
        self.inner.value(index)
    }

    fn close(&mut self) {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn notification_uri(&self) -> Option<&str> {
        self.inner.notification_uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cursor() -> RowCursor {
        RowCursor::from_parts(
            vec!["id".to_string(), "uid".to_string(), "subject".to_string()],
            vec![
                vec![
                    Value::Integer(1),
                    Value::Text("uid-1".to_string()),
                    Value::Text("hello".to_string()),
                ],
                vec![
                    Value::Integer(2),
                    Value::Text("uid-2".to_string()),
                    Value::Text("world".to_string()),
                ],
            ],
        )
    }

    #[test]
    fn test_navigation() {
        let mut cursor = sample_cursor();
        assert_eq!(cursor.count(), 2);
        assert!(cursor.value(0).is_none()); // before first row

        assert!(cursor.move_to_next());
        assert_eq!(cursor.get_i64(0), Some(1));
        assert!(cursor.move_to_next());
        assert_eq!(cursor.get_i64(0), Some(2));
        assert!(!cursor.move_to_next());
        assert!(cursor.value(0).is_none()); // past the end
    }

    #[test]
    fn test_column_lookup() {
        let cursor = sample_cursor();
        assert_eq!(cursor.column_index("uid"), Some(1));
        assert_eq!(cursor.column_index("nope"), None);
        assert!(cursor.column_index_or_err("subject").is_ok());
        let err = cursor.column_index_or_err("nope").unwrap_err();
        assert_eq!(err.to_string(), "no such column: nope");
    }

    #[test]
    fn test_close() {
        let mut cursor = sample_cursor();
        assert!(cursor.move_to_next());
        cursor.close();
        assert!(cursor.is_closed());
        assert!(cursor.value(0).is_none());
        assert!(!cursor.move_to_next());
    }

    #[test]
    fn test_id_alias_lookup() {
        let mut cursor = IdAliasCursor::new(sample_cursor());

        // _id resolves to the same index as id, in both lookup modes
        assert_eq!(cursor.column_index("_id"), cursor.column_index("id"));
        assert_eq!(
            cursor.column_index_or_err("_id").unwrap(),
            cursor.column_index_or_err("id").unwrap()
        );

        // other names are unaffected
        assert_eq!(cursor.column_index("uid"), Some(1));
        assert_eq!(cursor.column_index("nope"), None);
        assert!(cursor.column_index_or_err("nope").is_err());

        // row data is untouched by the alias
        assert!(cursor.move_to_next());
        let idx = cursor.column_index("_id").unwrap();
        assert_eq!(cursor.get_i64(idx), Some(1));
    }

    #[test]
    fn test_alias_always_rewrites_the_lookup() {
        // The rewrite is unconditional: even if a projection aliased some
        // column to `_id` itself, a `_id` lookup still resolves `id` and
        // fails when the result has no such column.
        let cursor = IdAliasCursor::new(RowCursor::from_parts(
            vec!["_id".to_string()],
            vec![vec![Value::Integer(7)]],
        ));
        assert_eq!(cursor.column_index("_id"), None);
        assert!(cursor.column_index_or_err("_id").is_err());
    }
}
