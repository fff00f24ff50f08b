//! Availability-guarding lock around a SQLite connection

use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use rusqlite::Connection;

/// Storage-level failures surfaced to the provider.
///
/// Unavailability is a distinct condition: it means the database has
/// been closed (or never opened) and is not the same as a failed
/// statement. The provider surfaces it as a hard error, never as an
/// empty result.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("could not determine the application data directory")]
    NoDataDir,

    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to migrate database schema: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Lock mode requested for a database callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read access. Shared holders proceed concurrently against the
    /// availability state; the provider always queries in this mode.
    Shared,
    /// Fences out all other holders. Used by writers (mail sync) and by
    /// anything that swaps or reworks the store underneath readers.
    Exclusive,
}

/// A SQLite connection behind an availability lock.
///
/// The outer RwLock guards whether the database is open at all: shared
/// access takes the read side, exclusive access the write side, and
/// [`LockableDatabase::close`] revokes the connection so later callers
/// fail with [`StorageError::Unavailable`] instead of touching a dead
/// handle. The inner mutex serializes statement execution; rusqlite
/// connections are not Sync.
#[derive(Debug)]
pub struct LockableDatabase {
    state: RwLock<Option<Mutex<Connection>>>,
}

impl LockableDatabase {
    pub fn new(conn: Connection) -> Self {
        Self {
            state: RwLock::new(Some(Mutex::new(conn))),
        }
    }

    /// Run `f` against the open connection under the requested lock mode.
    pub fn execute<T>(
        &self,
        access: Access,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        match access {
            Access::Shared => {
                let state = self.state.read().unwrap();
                let slot = state.as_ref().ok_or(StorageError::Unavailable)?;
                let conn = slot.lock().unwrap();
                f(&conn)
            }
            Access::Exclusive => {
                let state = self.state.write().unwrap();
                let slot = state.as_ref().ok_or(StorageError::Unavailable)?;
                let conn = slot.lock().unwrap();
                f(&conn)
            }
        }
    }

    /// Close the database. Every call after this fails with
    /// [`StorageError::Unavailable`] until the store is reopened.
    pub fn close(&self) {
        let mut state = self.state.write().unwrap();
        if state.take().is_some() {
            log::warn!("local message database closed; queries will fail until reopened");
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.read().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db() -> LockableDatabase {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (n INTEGER)").unwrap();
        LockableDatabase::new(conn)
    }

    #[test]
    fn test_shared_execute() {
        let db = open_db();
        let n: i64 = db
            .execute(Access::Shared, |conn| {
                conn.query_row("SELECT 41 + 1", [], |row| row.get(0))
                    .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(n, 42);
    }

    #[test]
    fn test_exclusive_execute() {
        let db = open_db();
        db.execute(Access::Exclusive, |conn| {
            conn.execute("INSERT INTO t (n) VALUES (1)", [])
                .map_err(StorageError::from)?;
            Ok(())
        })
        .unwrap();

        let count: i64 = db
            .execute(Access::Shared, |conn| {
                conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
                    .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_closed_database_is_unavailable() {
        let db = open_db();
        assert!(db.is_open());
        db.close();
        assert!(!db.is_open());

        let result = db.execute(Access::Shared, |_conn| Ok(()));
        assert!(matches!(result, Err(StorageError::Unavailable)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let db = open_db();
        db.close();
        db.close();
        assert!(!db.is_open());
    }
}
