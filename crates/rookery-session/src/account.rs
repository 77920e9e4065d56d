//! Account records and password digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One registered user as stored on disk.
///
/// The digest is unsalted SHA-256 so existing account files keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    pub password_hash: String,
}

impl AccountRecord {
    /// Builds a record from a plain-text password.
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_password(password),
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }
}

/// Lower-case hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
