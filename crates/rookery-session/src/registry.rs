//! The player registry: sessions, presence and accounts behind one API.
//!
//! # Locking
//!
//! Two `std::sync::Mutex`es, never held across an `.await`:
//!
//! - `sessions` guards the session table (who is connected, who they
//!   logged in as, whether they are free to play).
//! - `accounts` guards the account directory.
//!
//! Any operation that needs both takes `sessions` first. The match layer
//! runs its own table updates *inside* [`PlayerRegistry::claim_pair`] and
//! [`PlayerRegistry::release_pair`], so its lock always nests under
//! `sessions` as well.
//!
//! A poisoned lock is recovered rather than propagated: every mutation
//! here leaves the tables consistent at each step, so the data behind a
//! poisoned guard is still valid.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;
use rookery_protocol::{PlayerEntry, PlayerStatus, SessionId, SessionToken};

use crate::{AccountRecord, AccountStore, SessionError};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Limits for the registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Connected sessions at once, logged in or not. Default: 100.
    pub max_sessions: usize,

    /// Registered accounts. Default: 1000.
    pub max_accounts: usize,

    /// Longest accepted username, in bytes. Default: 31.
    pub max_username_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            max_accounts: 1000,
            max_username_len: 31,
        }
    }
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// Where a session stands.
///
/// ```text
///   Offline ──login──→ Available ──claim_pair──→ InMatch
///                          ↑                        │
///                          └──────release_pair──────┘
/// ```
///
/// `Offline` means connected but not logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Offline,
    Available,
    InMatch,
}

impl Presence {
    /// How other players see this presence, or `None` if they don't.
    pub fn status(self) -> Option<PlayerStatus> {
        match self {
            Self::Offline => None,
            Self::Available => Some(PlayerStatus::Online),
            Self::InMatch => Some(PlayerStatus::InMatch),
        }
    }
}

/// A logged-in session, as handed to [`PlayerRegistry::claim_pair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub session_id: SessionId,
    pub username: String,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SessionEntry {
    username: Option<String>,
    presence: Presence,
}

#[derive(Debug, Default)]
struct SessionTable {
    /// Ordered by id, which is connect order.
    entries: BTreeMap<SessionId, SessionEntry>,
    /// Username → the session bound to it.
    bound: HashMap<String, SessionId>,
}

impl SessionTable {
    /// The logged-in player behind `id`, if it is free to start a match.
    fn available_player(&self, id: SessionId) -> Result<Player, SessionError> {
        let entry = self
            .entries
            .get(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        let username =
            entry.username.clone().ok_or(SessionError::NotLoggedIn)?;
        if entry.presence != Presence::Available {
            return Err(SessionError::Unavailable(username));
        }
        Ok(Player {
            session_id: id,
            username,
        })
    }
}

/// Finds `username` and checks `password` against it.
fn check_credentials(
    accounts: &[AccountRecord],
    username: &str,
    password: &str,
) -> Result<(), SessionError> {
    let record = accounts
        .iter()
        .find(|a| a.username == username)
        .ok_or(SessionError::UserNotFound)?;
    if !record.verify(password) {
        return Err(SessionError::BadPassword);
    }
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// PlayerRegistry
// ---------------------------------------------------------------------------

/// Shared registry of connected sessions and registered accounts.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct PlayerRegistry {
    config: RegistryConfig,
    store: Box<dyn AccountStore>,
    sessions: Mutex<SessionTable>,
    accounts: Mutex<Vec<AccountRecord>>,
    next_session: AtomicU64,
}

impl PlayerRegistry {
    /// Creates a registry and loads the account directory from `store`.
    ///
    /// Accounts beyond `max_accounts` are ignored with a warning.
    ///
    /// # Errors
    /// Returns [`SessionError::Store`] if the store cannot be read.
    pub fn new(
        config: RegistryConfig,
        store: impl AccountStore,
    ) -> Result<Self, SessionError> {
        let mut accounts = store.load()?;
        if accounts.len() > config.max_accounts {
            tracing::warn!(
                loaded = accounts.len(),
                max = config.max_accounts,
                "account file exceeds capacity, ignoring the rest"
            );
            accounts.truncate(config.max_accounts);
        }
        tracing::info!(accounts = accounts.len(), "account directory loaded");

        Ok(Self {
            config,
            store: Box::new(store),
            sessions: Mutex::new(SessionTable::default()),
            accounts: Mutex::new(accounts),
            next_session: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -- Connection lifecycle ---------------------------------------------

    /// Opens a session for a new connection. It starts `Offline`.
    ///
    /// # Errors
    /// [`SessionError::Full`] if `max_sessions` sessions are connected.
    pub fn connect(&self) -> Result<SessionId, SessionError> {
        let mut table = lock(&self.sessions);
        if table.entries.len() >= self.config.max_sessions {
            return Err(SessionError::Full);
        }
        let id =
            SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        table.entries.insert(
            id,
            SessionEntry {
                username: None,
                presence: Presence::Offline,
            },
        );
        tracing::info!(session_id = %id, "session opened");
        Ok(id)
    }

    /// Closes a session and frees its username. Returns the username it
    /// was bound to, if any.
    ///
    /// Matches the session was playing in are left alone.
    pub fn disconnect(&self, id: SessionId) -> Option<String> {
        let mut table = lock(&self.sessions);
        let entry = table.entries.remove(&id)?;
        if let Some(name) = &entry.username {
            table.bound.remove(name);
        }
        tracing::info!(
            session_id = %id,
            username = entry.username.as_deref().unwrap_or("-"),
            "session closed"
        );
        entry.username
    }

    // -- Accounts ---------------------------------------------------------

    /// Creates an account and persists the directory.
    ///
    /// # Errors
    /// - [`SessionError::InvalidUsername`] / [`SessionError::EmptyPassword`]
    /// - [`SessionError::UsernameTaken`]
    /// - [`SessionError::DirectoryFull`]
    /// - [`SessionError::Store`] if saving fails; the account is not kept.
    pub fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        self.validate_username(username)?;
        if password.is_empty() {
            return Err(SessionError::EmptyPassword);
        }

        let mut accounts = lock(&self.accounts);
        if accounts.iter().any(|a| a.username == username) {
            return Err(SessionError::UsernameTaken);
        }
        if accounts.len() >= self.config.max_accounts {
            return Err(SessionError::DirectoryFull);
        }

        accounts.push(AccountRecord::new(username, password));
        if let Err(e) = self.store.save(&accounts) {
            accounts.pop();
            tracing::error!(username, error = %e, "failed to persist account");
            return Err(e.into());
        }
        tracing::info!(username, "account registered");
        Ok(())
    }

    /// Checks credentials and issues a session token.
    ///
    /// Checks run in order: unknown user, wrong password, name already in
    /// use by another session.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, SessionError> {
        let table = lock(&self.sessions);
        check_credentials(&lock(&self.accounts), username, password)?;
        if table.bound.contains_key(username) {
            return Err(SessionError::AlreadyOnline);
        }
        Ok(generate_token())
    }

    /// Binds `username` to session `id` and makes it `Available`.
    ///
    /// Does not check a password; see [`login`](Self::login).
    pub fn bind_session(
        &self,
        id: SessionId,
        username: &str,
    ) -> Result<(), SessionError> {
        let mut table = lock(&self.sessions);
        bind_locked(&mut table, id, username)
    }

    /// [`authenticate`](Self::authenticate) and
    /// [`bind_session`](Self::bind_session) in one step, with no window in
    /// which another session could take the name in between.
    pub fn login(
        &self,
        id: SessionId,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, SessionError> {
        let mut table = lock(&self.sessions);
        check_credentials(&lock(&self.accounts), username, password)?;
        bind_locked(&mut table, id, username)?;
        tracing::info!(session_id = %id, username, "logged in");
        Ok(generate_token())
    }

    fn validate_username(&self, username: &str) -> Result<(), SessionError> {
        if username.is_empty() {
            return Err(SessionError::InvalidUsername(
                "Username must not be empty".into(),
            ));
        }
        if username.len() > self.config.max_username_len {
            return Err(SessionError::InvalidUsername(format!(
                "Username must be at most {} bytes",
                self.config.max_username_len
            )));
        }
        Ok(())
    }

    // -- Presence ---------------------------------------------------------

    pub fn set_presence(
        &self,
        id: SessionId,
        presence: Presence,
    ) -> Result<(), SessionError> {
        let mut table = lock(&self.sessions);
        let entry = table
            .entries
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        entry.presence = presence;
        Ok(())
    }

    pub fn presence_of(&self, id: SessionId) -> Option<Presence> {
        lock(&self.sessions).entries.get(&id).map(|e| e.presence)
    }

    pub fn username_of(&self, id: SessionId) -> Option<String> {
        lock(&self.sessions)
            .entries
            .get(&id)
            .and_then(|e| e.username.clone())
    }

    /// The session currently logged in as `username`.
    pub fn lookup_by_username(&self, username: &str) -> Option<SessionId> {
        lock(&self.sessions).bound.get(username).copied()
    }

    /// Logged-in players other than `excluding`, in connect order.
    pub fn list_online(&self, excluding: SessionId) -> Vec<PlayerEntry> {
        let table = lock(&self.sessions);
        table
            .entries
            .iter()
            .filter(|(id, _)| **id != excluding)
            .filter_map(|(_, entry)| {
                let username = entry.username.clone()?;
                let status = entry.presence.status()?;
                Some(PlayerEntry { username, status })
            })
            .collect()
    }

    /// Number of logged-in sessions.
    pub fn online_count(&self) -> usize {
        lock(&self.sessions).bound.len()
    }

    /// Number of connected sessions, logged in or not.
    pub fn session_count(&self) -> usize {
        lock(&self.sessions).entries.len()
    }

    // -- Pairing ----------------------------------------------------------

    /// Atomically moves two available players into a match.
    ///
    /// With the session table locked: checks that `a` and `b` are distinct,
    /// logged in and `Available`, runs `allocate`, and only if it succeeds
    /// marks both `InMatch`. If any check or `allocate` fails, nothing
    /// changes.
    ///
    /// `allocate` runs under the session lock. It may take locks of its
    /// own but must not call back into this registry.
    pub fn claim_pair<T, E, F>(
        &self,
        a: SessionId,
        b: SessionId,
        allocate: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&Player, &Player) -> Result<T, E>,
        E: From<SessionError>,
    {
        if a == b {
            return Err(SessionError::SamePlayer.into());
        }
        let mut table = lock(&self.sessions);
        let first = table.available_player(a)?;
        let second = table.available_player(b)?;

        let value = allocate(&first, &second)?;

        for id in [a, b] {
            if let Some(entry) = table.entries.get_mut(&id) {
                entry.presence = Presence::InMatch;
            }
        }
        Ok(value)
    }

    /// Runs `free` under the session lock, then returns whichever of `a`
    /// and `b` are still connected and `InMatch` to `Available`.
    pub fn release_pair<R>(
        &self,
        a: SessionId,
        b: SessionId,
        free: impl FnOnce() -> R,
    ) -> R {
        let mut table = lock(&self.sessions);
        let result = free();
        for id in [a, b] {
            if let Some(entry) = table.entries.get_mut(&id) {
                if entry.presence == Presence::InMatch {
                    entry.presence = Presence::Available;
                }
            }
        }
        result
    }
}

fn bind_locked(
    table: &mut SessionTable,
    id: SessionId,
    username: &str,
) -> Result<(), SessionError> {
    let entry = table
        .entries
        .get(&id)
        .ok_or(SessionError::UnknownSession(id))?;
    if entry.username.is_some() {
        return Err(SessionError::AlreadyLoggedIn);
    }
    if table.bound.contains_key(username) {
        return Err(SessionError::AlreadyOnline);
    }

    table.bound.insert(username.to_string(), id);
    if let Some(entry) = table.entries.get_mut(&id) {
        entry.username = Some(username.to_string());
        entry.presence = Presence::Available;
    }
    Ok(())
}

/// 16 random lower-case hex characters.
fn generate_token() -> SessionToken {
    let bytes: [u8; 8] = rand::rng().random();
    SessionToken::new(
        bytes.iter().map(|b| format!("{b:02x}")).collect::<String>(),
    )
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `PlayerRegistry`, named
    //! `test_{function}_{scenario}_{expected}`.

    use super::*;
    use crate::{MemoryStore, StoreError};

    // -- Helpers ----------------------------------------------------------

    fn registry() -> PlayerRegistry {
        PlayerRegistry::new(RegistryConfig::default(), MemoryStore::new())
            .unwrap()
    }

    fn registry_with(config: RegistryConfig) -> PlayerRegistry {
        PlayerRegistry::new(config, MemoryStore::new()).unwrap()
    }

    /// Registers `name` (password = name) and logs a fresh session in.
    fn online(reg: &PlayerRegistry, name: &str) -> SessionId {
        reg.register(name, name).unwrap();
        let id = reg.connect().unwrap();
        reg.login(id, name, name).unwrap();
        id
    }

    /// A store whose saves always fail.
    struct BrokenStore;

    impl AccountStore for BrokenStore {
        fn load(&self) -> Result<Vec<AccountRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn save(&self, _: &[AccountRecord]) -> Result<(), StoreError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    // =====================================================================
    // connect() / disconnect()
    // =====================================================================

    #[test]
    fn test_connect_issues_increasing_ids_offline() {
        let reg = registry();
        let a = reg.connect().unwrap();
        let b = reg.connect().unwrap();
        assert!(a < b);
        assert_eq!(reg.presence_of(a), Some(Presence::Offline));
        assert_eq!(reg.username_of(a), None);
        assert_eq!(reg.session_count(), 2);
    }

    #[test]
    fn test_connect_at_capacity_returns_full() {
        let reg = registry_with(RegistryConfig {
            max_sessions: 2,
            ..Default::default()
        });
        let first = reg.connect().unwrap();
        reg.connect().unwrap();
        assert!(matches!(reg.connect(), Err(SessionError::Full)));

        reg.disconnect(first);
        assert!(reg.connect().is_ok(), "freed slot should be reusable");
    }

    #[test]
    fn test_disconnect_frees_username() {
        let reg = registry();
        let id = online(&reg, "ana");

        assert_eq!(reg.disconnect(id), Some("ana".into()));
        assert_eq!(reg.lookup_by_username("ana"), None);
        assert_eq!(reg.presence_of(id), None);

        let again = reg.connect().unwrap();
        assert!(reg.login(again, "ana", "ana").is_ok());
    }

    #[test]
    fn test_disconnect_unknown_session_returns_none() {
        assert_eq!(registry().disconnect(SessionId(99)), None);
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_new_user_persists() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let reg = PlayerRegistry::new(
            RegistryConfig::default(),
            SharedStore(std::sync::Arc::clone(&store)),
        )
        .unwrap();

        reg.register("ana", "pw").unwrap();

        let saved = store.snapshot();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].username, "ana");
        assert!(saved[0].verify("pw"));
    }

    /// Lets a test keep a handle on the store it gave away.
    struct SharedStore(std::sync::Arc<MemoryStore>);

    impl AccountStore for SharedStore {
        fn load(&self) -> Result<Vec<AccountRecord>, StoreError> {
            self.0.load()
        }

        fn save(&self, accounts: &[AccountRecord]) -> Result<(), StoreError> {
            self.0.save(accounts)
        }
    }

    #[test]
    fn test_register_duplicate_returns_username_taken() {
        let reg = registry();
        reg.register("ana", "pw").unwrap();
        assert!(matches!(
            reg.register("ana", "other"),
            Err(SessionError::UsernameTaken)
        ));
    }

    #[test]
    fn test_register_invalid_input_rejected() {
        let reg = registry();
        assert!(matches!(
            reg.register("", "pw"),
            Err(SessionError::InvalidUsername(_))
        ));
        assert!(matches!(
            reg.register(&"x".repeat(32), "pw"),
            Err(SessionError::InvalidUsername(_))
        ));
        assert!(reg.register(&"x".repeat(31), "pw").is_ok());
        assert!(matches!(
            reg.register("ana", ""),
            Err(SessionError::EmptyPassword)
        ));
    }

    #[test]
    fn test_register_directory_full_returns_error() {
        let reg = registry_with(RegistryConfig {
            max_accounts: 1,
            ..Default::default()
        });
        reg.register("ana", "pw").unwrap();
        assert!(matches!(
            reg.register("ben", "pw"),
            Err(SessionError::DirectoryFull)
        ));
    }

    #[test]
    fn test_register_store_failure_rolls_back() {
        let reg =
            PlayerRegistry::new(RegistryConfig::default(), BrokenStore).unwrap();

        let result = reg.register("ana", "pw");
        assert!(matches!(result, Err(SessionError::Store(_))));

        let id = reg.connect().unwrap();
        assert!(matches!(
            reg.login(id, "ana", "pw"),
            Err(SessionError::UserNotFound)
        ));
    }

    #[test]
    fn test_new_loads_existing_accounts() {
        let store =
            MemoryStore::with_accounts(vec![AccountRecord::new("old", "pw")]);
        let reg = PlayerRegistry::new(RegistryConfig::default(), store).unwrap();
        assert!(matches!(
            reg.register("old", "x"),
            Err(SessionError::UsernameTaken)
        ));
        assert!(reg.authenticate("old", "pw").is_ok());
    }

    // =====================================================================
    // authenticate() / login() / bind_session()
    // =====================================================================

    #[test]
    fn test_authenticate_failures_in_order() {
        let reg = registry();
        assert!(matches!(
            reg.authenticate("ghost", "pw"),
            Err(SessionError::UserNotFound)
        ));

        online(&reg, "ana");
        // Wrong password wins over "already online".
        assert!(matches!(
            reg.authenticate("ana", "wrong"),
            Err(SessionError::BadPassword)
        ));
        assert!(matches!(
            reg.authenticate("ana", "ana"),
            Err(SessionError::AlreadyOnline)
        ));
    }

    #[test]
    fn test_authenticate_returns_16_hex_token() {
        let reg = registry();
        reg.register("ana", "pw").unwrap();
        let token = reg.authenticate("ana", "pw").unwrap();
        assert_eq!(token.as_str().len(), 16);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_login_binds_and_sets_available() {
        let reg = registry();
        let id = online(&reg, "ana");
        assert_eq!(reg.username_of(id), Some("ana".into()));
        assert_eq!(reg.presence_of(id), Some(Presence::Available));
        assert_eq!(reg.lookup_by_username("ana"), Some(id));
        assert_eq!(reg.online_count(), 1);
    }

    #[test]
    fn test_login_second_session_same_name_returns_already_online() {
        let reg = registry();
        online(&reg, "ana");
        let other = reg.connect().unwrap();

        assert!(matches!(
            reg.login(other, "ana", "ana"),
            Err(SessionError::AlreadyOnline)
        ));
        assert_eq!(reg.presence_of(other), Some(Presence::Offline));
    }

    #[test]
    fn test_login_twice_on_same_session_returns_already_logged_in() {
        let reg = registry();
        let id = online(&reg, "ana");
        reg.register("ben", "ben").unwrap();

        assert!(matches!(
            reg.login(id, "ben", "ben"),
            Err(SessionError::AlreadyLoggedIn)
        ));
        assert_eq!(reg.lookup_by_username("ben"), None);
    }

    #[test]
    fn test_bind_session_unknown_session_rejected() {
        let reg = registry();
        assert!(matches!(
            reg.bind_session(SessionId(7), "ana"),
            Err(SessionError::UnknownSession(SessionId(7)))
        ));
    }

    #[test]
    fn test_login_concurrent_same_name_exactly_one_wins() {
        let reg = std::sync::Arc::new(registry());
        reg.register("ana", "pw").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = std::sync::Arc::clone(&reg);
                std::thread::spawn(move || {
                    let id = reg.connect().unwrap();
                    reg.login(id, "ana", "pw").is_ok()
                })
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(reg.online_count(), 1);
    }

    // =====================================================================
    // list_online()
    // =====================================================================

    #[test]
    fn test_list_online_excludes_requester_and_anonymous() {
        let reg = registry();
        let ana = online(&reg, "ana");
        let _anon = reg.connect().unwrap();
        let ben = online(&reg, "ben");
        let cat = online(&reg, "cat");
        reg.set_presence(cat, Presence::InMatch).unwrap();

        let list = reg.list_online(ben);
        assert_eq!(
            list,
            vec![
                PlayerEntry {
                    username: "ana".into(),
                    status: PlayerStatus::Online,
                },
                PlayerEntry {
                    username: "cat".into(),
                    status: PlayerStatus::InMatch,
                },
            ]
        );
        assert_eq!(reg.list_online(ana).len(), 2);
    }

    // =====================================================================
    // claim_pair() / release_pair()
    // =====================================================================

    #[test]
    fn test_claim_pair_success_marks_both_in_match() {
        let reg = registry();
        let a = online(&reg, "ana");
        let b = online(&reg, "ben");

        let names: Result<_, SessionError> = reg.claim_pair(a, b, |x, y| {
            Ok((x.username.clone(), y.username.clone()))
        });

        assert_eq!(names.unwrap(), ("ana".to_string(), "ben".to_string()));
        assert_eq!(reg.presence_of(a), Some(Presence::InMatch));
        assert_eq!(reg.presence_of(b), Some(Presence::InMatch));
    }

    #[test]
    fn test_claim_pair_allocate_failure_changes_nothing() {
        let reg = registry();
        let a = online(&reg, "ana");
        let b = online(&reg, "ben");

        let result: Result<(), SessionError> =
            reg.claim_pair(a, b, |_, _| Err(SessionError::Full));

        assert!(result.is_err());
        assert_eq!(reg.presence_of(a), Some(Presence::Available));
        assert_eq!(reg.presence_of(b), Some(Presence::Available));
    }

    #[test]
    fn test_claim_pair_unavailable_player_rejected_before_allocate() {
        let reg = registry();
        let a = online(&reg, "ana");
        let b = online(&reg, "ben");
        reg.set_presence(b, Presence::InMatch).unwrap();

        let mut called = false;
        let result: Result<(), SessionError> = reg.claim_pair(a, b, |_, _| {
            called = true;
            Ok(())
        });

        assert!(matches!(result, Err(SessionError::Unavailable(name)) if name == "ben"));
        assert!(!called);
        assert_eq!(reg.presence_of(a), Some(Presence::Available));
    }

    #[test]
    fn test_claim_pair_rejects_self_and_anonymous() {
        let reg = registry();
        let a = online(&reg, "ana");
        let anon = reg.connect().unwrap();

        let same: Result<(), SessionError> = reg.claim_pair(a, a, |_, _| Ok(()));
        assert!(matches!(same, Err(SessionError::SamePlayer)));

        let anon_pair: Result<(), SessionError> =
            reg.claim_pair(a, anon, |_, _| Ok(()));
        assert!(matches!(anon_pair, Err(SessionError::NotLoggedIn)));
    }

    #[test]
    fn test_release_pair_restores_connected_players_only() {
        let reg = registry();
        let a = online(&reg, "ana");
        let b = online(&reg, "ben");
        let _: Result<(), SessionError> = reg.claim_pair(a, b, |_, _| Ok(()));
        reg.disconnect(b);

        let freed = reg.release_pair(a, b, || "freed");

        assert_eq!(freed, "freed");
        assert_eq!(reg.presence_of(a), Some(Presence::Available));
        assert_eq!(reg.presence_of(b), None);
    }
}
