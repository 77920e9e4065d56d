//! Who is connected, who they are, and whether they are free to play.
//!
//! This crate owns two pieces of shared state:
//!
//! 1. **The session table**: one entry per live connection, carrying the
//!    username it logged in as (if any) and its [`Presence`].
//! 2. **The account directory**: every registered username with its
//!    password digest, persisted through an [`AccountStore`].
//!
//! Both live inside [`PlayerRegistry`], each behind its own lock. Whenever
//! both are needed, the session table is locked first.
//!
//! ```text
//! Match layer (above)   ← claims and releases pairs of players
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below) ← SessionId, SessionToken, PlayerEntry
//! ```

mod account;
mod error;
mod registry;
mod store;

pub use account::{AccountRecord, hash_password};
pub use error::{SessionError, StoreError};
pub use registry::{Player, PlayerRegistry, Presence, RegistryConfig};
pub use store::{AccountStore, JsonFileStore, MemoryStore};
