//! Error types for the session layer.
//!
//! The `Display` text of the login and registration variants is exactly
//! the `reason` string clients are shown, so keep them short and stable.

use rookery_protocol::SessionId;

/// Errors from the player registry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    BadPassword,

    /// Another session is already bound to this username.
    #[error("Already logged in")]
    AlreadyOnline,

    /// This session is already bound to a username.
    #[error("Session already logged in")]
    AlreadyLoggedIn,

    #[error("{0}")]
    InvalidUsername(String),

    #[error("Password must not be empty")]
    EmptyPassword,

    /// The session table is at `max_sessions`.
    #[error("Server full")]
    Full,

    /// The account directory is at `max_accounts`.
    #[error("Server full")]
    DirectoryFull,

    /// The session has not logged in yet.
    #[error("Not logged in")]
    NotLoggedIn,

    /// No such session, e.g. it already disconnected.
    #[error("session {0} not found")]
    UnknownSession(SessionId),

    /// A player is already in a match or otherwise not free to start one.
    #[error("{0} is not available")]
    Unavailable(String),

    /// A session tried to pair with itself.
    #[error("cannot pair a session with itself")]
    SamePlayer,

    /// Persisting the account directory failed. The directory was rolled
    /// back, so the account does not exist.
    #[error("Could not save account")]
    Store(#[from] StoreError),
}

/// Errors reading or writing persisted accounts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("account file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
