//! Account registry

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::account::Account;

/// Registry file name inside the Vega config directory.
const ACCOUNTS_FILE: &str = "accounts.json";

/// Resolves an opaque account UUID to account configuration.
///
/// The provider takes its registry by injection; there is no process-wide
/// registry state.
pub trait AccountRegistry: Send + Sync {
    /// Look up an account. None means the UUID is unknown.
    fn account(&self, uuid: &str) -> Option<Arc<Account>>;
}

/// On-disk registry format (`accounts.json`).
#[derive(Deserialize)]
struct AccountsFile {
    accounts: Vec<Account>,
}

/// Registry over a fixed set of configured accounts.
pub struct Accounts {
    by_uuid: HashMap<String, Arc<Account>>,
}

impl Accounts {
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        let by_uuid = accounts
            .into_iter()
            .map(|account| (account.uuid.clone(), Arc::new(account)))
            .collect();
        Self { by_uuid }
    }

    /// Load the registry from `accounts.json` in the Vega config directory.
    pub fn load() -> Result<Self> {
        let file: AccountsFile =
            config::load_json(ACCOUNTS_FILE).context("Failed to load account registry")?;
        Ok(Self::new(file.accounts))
    }

    /// Load the registry from an arbitrary path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let file: AccountsFile =
            config::load_json_file(path).context("Failed to load account registry")?;
        Ok(Self::new(file.accounts))
    }

    pub fn len(&self) -> usize {
        self.by_uuid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uuid.is_empty()
    }
}

impl AccountRegistry for Accounts {
    fn account(&self, uuid: &str) -> Option<Arc<Account>> {
        self.by_uuid.get(uuid).map(Arc::clone)
    }
}
