//! Message and identifier types that travel on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// One connected client, from accept to disconnect.
///
/// Issued by the player registry in connect order, so sorting by
/// `SessionId` is sorting by who connected first. Never reused while the
/// server runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// The opaque token handed to a client in `LOGIN_SUCCESS`.
///
/// Clients may keep it for display or correlation; the server never asks
/// for it back, because the connection itself identifies the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one match, e.g. `M4K2Q9ZXA`.
///
/// Unique among matches that are currently active. Once a match ends its
/// id may be handed out again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Player list
// ---------------------------------------------------------------------------

/// Presence as shown to other players. Sessions that have not logged in
/// never appear in a player list, so there is no "offline" status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Online,
    InMatch,
}

/// One row of a `PLAYER_LIST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub username: String,
    pub status: PlayerStatus,
}

// ---------------------------------------------------------------------------
// Command — client to server
// ---------------------------------------------------------------------------

/// A request from a client.
///
/// Adjacently tagged: the variant name goes in `action`, the fields in
/// `data`. Commands with no arguments still carry an empty `data` object.
///
/// ```text
/// {"action":"CHALLENGE","data":{"from":"ana","to":"ben"}}
/// {"action":"PING","data":{}}
/// ```
///
/// Square notation in `MOVE` is kept as the raw strings the client sent;
/// parsing them is the rule engine's job, so that a bad square becomes a
/// `MOVE_INVALID` rather than a protocol error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "data",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    Register { username: String, password: String },
    Login { username: String, password: String },
    RequestPlayerList {},
    /// `from` must be the sender's own username; `to` is the target.
    Challenge { from: String, to: String },
    /// `from` is the acceptor, `to` names the challenger.
    Accept { from: String, to: String },
    /// `from` is the decliner, `to` names the challenger.
    Decline { from: String, to: String },
    Move {
        match_id: MatchId,
        from: String,
        to: String,
    },
    Ping {},
}

impl Command {
    /// The wire name of this command, for logs.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Register { .. } => "REGISTER",
            Self::Login { .. } => "LOGIN",
            Self::RequestPlayerList {} => "REQUEST_PLAYER_LIST",
            Self::Challenge { .. } => "CHALLENGE",
            Self::Accept { .. } => "ACCEPT",
            Self::Decline { .. } => "DECLINE",
            Self::Move { .. } => "MOVE",
            Self::Ping {} => "PING",
        }
    }
}

// ---------------------------------------------------------------------------
// Event — server to client
// ---------------------------------------------------------------------------

/// A notification from the server. Same framing as [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "data",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Event {
    RegisterSuccess { message: String },
    RegisterFail { reason: String },
    LoginSuccess {
        session_id: SessionToken,
        username: String,
    },
    LoginFail { reason: String },
    PlayerList { players: Vec<PlayerEntry> },
    IncomingChallenge { from: String },
    ChallengeDeclined { from: String },
    StartGame {
        match_id: MatchId,
        white: String,
        black: String,
    },
    MoveOk { from: String, to: String },
    OpponentMove { from: String, to: String },
    MoveInvalid { reason: String },
    /// `winner` is a username or `DRAW`.
    GameResult { winner: String, reason: String },
    Error { reason: String },
    Pong {},
}

impl Event {
    /// Shorthand for the catch-all `ERROR` event.
    pub fn error(reason: impl fmt::Display) -> Self {
        Self::Error {
            reason: reason.to_string(),
        }
    }
}

/// An event addressed to one session.
///
/// Every operation in the server answers with a list of these; the
/// connection layer routes each one to the mailbox of `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: SessionId,
    pub event: Event,
}

impl Outbound {
    pub fn new(to: SessionId, event: Event) -> Self {
        Self { to, event }
    }
}

// =========================================================================
// Tests
// =========================================================================
