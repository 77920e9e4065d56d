//! Wire protocol for Rookery.
//!
//! Everything a chess client and the server say to each other lives here:
//!
//! - **Types** ([`Command`], [`Event`], [`Outbound`]) — inbound requests,
//!   outbound notifications and the address a notification goes to.
//! - **Identifiers** ([`SessionId`], [`SessionToken`], [`MatchId`]).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — bytes in, bytes out.
//! - **Errors** ([`ProtocolError`]).
//!
//! On the wire every message is one JSON object:
//!
//! ```text
//! {"action": "MOVE", "data": {"matchId": "M4K2Q9ZXA", "from": "E2", "to": "E4"}}
//! ```
//!
//! The protocol crate knows nothing about boards, sessions or sockets. It
//! only turns these shapes into bytes and back.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Command, Event, MatchId, Outbound, PlayerEntry, PlayerStatus, SessionId,
    SessionToken,
};
