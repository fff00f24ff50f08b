//! Account model

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::storage::{LocalStore, StorageError};

/// A configured mail account.
///
/// Identified by a stable opaque UUID. Each account owns exactly one
/// local message store, opened on first use and cached for the lifetime
/// of the account. The open is guarded by a mutex so concurrent first
/// use opens the store once.
#[derive(Debug, Serialize, Deserialize)]
pub struct Account {
    /// Stable opaque identifier.
    pub uuid: String,
    /// Email address of the account.
    pub email: String,
    /// Display name shown in account pickers.
    pub display_name: Option<String>,
    /// Path to the account's message database. Defaults to
    /// `<data dir>/<uuid>.db` when absent.
    pub database: Option<PathBuf>,
    #[serde(skip)]
    store: Mutex<Option<Arc<LocalStore>>>,
}

impl Account {
    pub fn new(uuid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            email: email.into(),
            display_name: None,
            database: None,
            store: Mutex::new(None),
        }
    }

    /// Set display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set an explicit message-database path
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    /// The account's local message store, opened on first use.
    pub fn local_store(&self) -> Result<Arc<LocalStore>, StorageError> {
        let mut slot = self.store.lock().unwrap();
        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }

        let path = match &self.database {
            Some(path) => path.clone(),
            None => config::data_dir()
                .ok_or(StorageError::NoDataDir)?
                .join(format!("{}.db", self.uuid)),
        };

        let store = Arc::new(LocalStore::open(path)?);
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }
}
