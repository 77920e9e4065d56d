//! Where the account directory is persisted.
//!
//! The registry keeps the directory in memory and hands the whole list to
//! an [`AccountStore`] after every successful registration. Stores are
//! synchronous: the list is small and saves are rare.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{AccountRecord, StoreError};

/// Loads and saves the full list of accounts.
pub trait AccountStore: Send + Sync + 'static {
    /// Returns every stored account, in stored order.
    fn load(&self) -> Result<Vec<AccountRecord>, StoreError>;

    /// Replaces the stored accounts with `accounts`.
    fn save(&self, accounts: &[AccountRecord]) -> Result<(), StoreError>;
}

impl AccountStore for Box<dyn AccountStore> {
    fn load(&self) -> Result<Vec<AccountRecord>, StoreError> {
        (**self).load()
    }

    fn save(&self, accounts: &[AccountRecord]) -> Result<(), StoreError> {
        (**self).save(accounts)
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// On-disk layout: `{"users": [{"username": ..., "password_hash": ...}]}`.
#[derive(Serialize, Deserialize)]
struct UsersFile {
    users: Vec<AccountRecord>,
}

/// Accounts kept in a pretty-printed JSON file.
///
/// A missing file loads as an empty directory. Saves write a sibling
/// temp file and rename it over the target, so a crash mid-save leaves
/// the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccountStore for JsonFileStore {
    fn load(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.path.display(),
                    "no account file yet, starting empty"
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let file: UsersFile = serde_json::from_slice(&bytes)?;
        Ok(file.users)
    }

    fn save(&self, accounts: &[AccountRecord]) -> Result<(), StoreError> {
        let file = UsersFile {
            users: accounts.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&file)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Accounts that live only as long as the process. Used by tests and by
/// servers started without an account file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<AccountRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `accounts`.
    pub fn with_accounts(accounts: Vec<AccountRecord>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
        }
    }

    /// What was last saved.
    pub fn snapshot(&self) -> Vec<AccountRecord> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AccountStore for MemoryStore {
    fn load(&self) -> Result<Vec<AccountRecord>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, accounts: &[AccountRecord]) -> Result<(), StoreError> {
        *self.accounts.lock().unwrap_or_else(PoisonError::into_inner) =
            accounts.to_vec();
        Ok(())
    }
}
