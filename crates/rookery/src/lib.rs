//! # Rookery
//!
//! A multiplayer chess server. Players connect over WebSocket, register
//! and log in, challenge each other by name, and play rule-checked games
//! to checkmate, stalemate or a dead draw.
//!
//! The crates underneath, leaves first:
//!
//! - [`rookery_rules`] — board, move legality, check and game results
//! - [`rookery_protocol`] — wire commands and events, JSON codec
//! - [`rookery_transport`] — WebSocket connections
//! - [`rookery_session`] — sessions, presence, accounts
//! - [`rookery_match`] — match table, challenges, move processing
//!
//! This crate wires them into a running server.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rookery::prelude::*;
//!
//! # async fn run() -> Result<(), RookeryError> {
//! let server = RookeryServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .account_store(JsonFileStore::new("users.json"))
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod dispatch;
mod error;
mod handler;
mod server;

pub use dispatch::Dispatcher;
pub use error::RookeryError;
pub use server::{RookeryServer, RookeryServerBuilder};

pub mod prelude {
    //! Everything needed to start a server or drive the dispatcher.

    pub use crate::{Dispatcher, RookeryError, RookeryServer, RookeryServerBuilder};
    pub use rookery_match::{MatchConfig, MatchRegistry, Matchmaker, MoveProcessor};
    pub use rookery_protocol::{
        Codec, Command, Event, JsonCodec, MatchId, Outbound, SessionId,
    };
    pub use rookery_session::{
        AccountStore, JsonFileStore, MemoryStore, PlayerRegistry,
        RegistryConfig,
    };
}
