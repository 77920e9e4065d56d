//! Matches between two logged-in players.
//!
//! # Key types
//!
//! - [`MatchRegistry`] — the table of active matches, one lock per match
//! - [`Matchmaker`] — challenge, accept and decline by username
//! - [`MoveProcessor`] — validates and applies one move, end to end
//! - [`Match`] — a single game: seats, board, side to move
//! - [`MatchConfig`] — capacity limits
//!
//! Every operation answers with a list of
//! [`Outbound`](rookery_protocol::Outbound) events or a typed error; none
//! of them touch the network.

mod config;
mod error;
mod game;
mod matchmaking;
mod processor;
mod registry;

pub use config::MatchConfig;
pub use error::{ChallengeError, MatchError, MoveError};
pub use game::Match;
pub use matchmaking::Matchmaker;
pub use processor::{MoveProcessor, MoveReport};
pub use registry::{MatchRegistry, MatchStart};
