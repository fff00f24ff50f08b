//! Per-account local message store

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

use super::lockable::{LockableDatabase, StorageError};

/// Database migrations
///
/// Each migration is applied in order. The user_version pragma tracks
/// which migrations have been applied.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // Migration 1: messages table
        M::up(
            r#"
            -- One row per message, including soft-deleted rows and
            -- placeholder rows known only by UID. The provider filters
            -- both out of every result it returns.
            CREATE TABLE messages (
                id INTEGER PRIMARY KEY,
                deleted INTEGER NOT NULL DEFAULT 0,
                folder_id INTEGER,
                uid TEXT,
                subject TEXT,
                date INTEGER,
                internal_date INTEGER,
                flags TEXT,
                sender_list TEXT,
                to_list TEXT,
                cc_list TEXT,
                bcc_list TEXT,
                reply_to_list TEXT,
                message_id TEXT,
                preview TEXT,
                mime_type TEXT,
                attachment_count INTEGER NOT NULL DEFAULT 0,
                thread_root INTEGER,
                thread_parent INTEGER,
                empty INTEGER NOT NULL DEFAULT 0,
                text_content TEXT,
                html_content TEXT
            );

            CREATE INDEX idx_messages_folder_id ON messages(folder_id);
            CREATE INDEX idx_messages_date ON messages(date DESC);
            CREATE INDEX idx_messages_thread_root ON messages(thread_root);
            CREATE INDEX idx_messages_thread_parent ON messages(thread_parent);
            "#,
        ),
    ])
}

/// An account's local message database.
///
/// Opens the SQLite file on construction, applies pragmas and schema
/// migrations, and hands out the [`LockableDatabase`] all access goes
/// through. The provider only reads; writers (the mail-sync subsystem)
/// share the same handle.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    database: Arc<LockableDatabase>,
}

impl LocalStore {
    /// Open (creating if necessary) the message database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut conn = Connection::open(&path).map_err(|source| StorageError::Open {
            path: path.clone(),
            source,
        })?;

        // WAL keeps readers unblocked during sync writes; NORMAL sync is
        // safe under WAL.
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;

        migrations().to_latest(&mut conn)?;

        log::debug!("opened local message store at {}", path.display());

        Ok(Self {
            path,
            database: Arc::new(LockableDatabase::new(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lockable database handle all queries run against.
    pub fn database(&self) -> Arc<LockableDatabase> {
        Arc::clone(&self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Access;

    #[test]
    fn test_open_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.db")).unwrap();

        let count: i64 = store
            .database()
            .execute(Access::Shared, |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'messages'",
                    [],
                    |row| row.get(0),
                )
                .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("accounts").join("a").join("store.db");
        let store = LocalStore::open(&nested).unwrap();
        assert_eq!(store.path(), nested.as_path());
        assert!(nested.exists());
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        drop(LocalStore::open(&path).unwrap());
        // Migrations must not reapply on an already-migrated database.
        let store = LocalStore::open(&path).unwrap();
        assert!(store.database().is_open());
    }
}
