//! Direct challenges between players, by username.
//!
//! ```text
//!   Idle ──CHALLENGE──→ Challenged ──ACCEPT──→ match created
//!                            │
//!                            └──DECLINE──→ Idle
//! ```
//!
//! No challenge record is kept between the steps. An `ACCEPT` simply asks
//! for a match with the named challenger, and the registry's allocation
//! check (both players logged in and available) is what turns away stale
//! or repeated accepts.

use std::sync::Arc;

use rookery_protocol::{Event, Outbound, SessionId};
use rookery_session::{PlayerRegistry, Presence};

use crate::{ChallengeError, MatchRegistry};

/// Handles challenge, accept and decline.
#[derive(Clone)]
pub struct Matchmaker {
    players: Arc<PlayerRegistry>,
    matches: Arc<MatchRegistry>,
}

impl Matchmaker {
    pub fn new(matches: Arc<MatchRegistry>) -> Self {
        Self {
            players: Arc::clone(matches.players()),
            matches,
        }
    }

    /// `session` (logged in as `from`) challenges the player named `to`.
    ///
    /// Sends `INCOMING_CHALLENGE` to the target. Nothing is reserved: the
    /// target's availability is checked again when they accept.
    pub fn challenge(
        &self,
        session: SessionId,
        from: &str,
        to: &str,
    ) -> Result<Vec<Outbound>, ChallengeError> {
        let username = self.own_username(session)?;
        if from != username {
            return Err(ChallengeError::UsernameMismatch);
        }
        let target = self
            .players
            .lookup_by_username(to)
            .ok_or(ChallengeError::OpponentNotFound)?;
        if target == session {
            return Err(ChallengeError::SelfChallenge);
        }
        if self.players.presence_of(target) != Some(Presence::Available) {
            return Err(ChallengeError::OpponentUnavailable);
        }

        tracing::info!(from = %username, to, "challenge sent");
        Ok(vec![Outbound::new(
            target,
            Event::IncomingChallenge { from: username },
        )])
    }

    /// `session` accepts a challenge from the player named `challenger`.
    ///
    /// Starts the match and sends `START_GAME` to both players, challenger
    /// first. `_from` is the acceptor's claimed name; the session's own
    /// login is what counts.
    pub fn accept(
        &self,
        session: SessionId,
        _from: &str,
        challenger: &str,
    ) -> Result<Vec<Outbound>, ChallengeError> {
        self.own_username(session)?;
        let challenger_id = self
            .players
            .lookup_by_username(challenger)
            .ok_or(ChallengeError::ChallengerNotFound)?;

        let start = self.matches.allocate(challenger_id, session)?;

        let event = Event::StartGame {
            match_id: start.match_id,
            white: start.white.username,
            black: start.black.username,
        };
        Ok(vec![
            Outbound::new(challenger_id, event.clone()),
            Outbound::new(session, event),
        ])
    }

    /// `session` turns down a challenge from `challenger`.
    ///
    /// Sends `CHALLENGE_DECLINED` to the challenger if they are still
    /// online; otherwise there is nobody to tell.
    pub fn decline(
        &self,
        session: SessionId,
        _from: &str,
        challenger: &str,
    ) -> Result<Vec<Outbound>, ChallengeError> {
        let username = self.own_username(session)?;
        tracing::info!(from = %username, to = challenger, "challenge declined");
        Ok(self
            .players
            .lookup_by_username(challenger)
            .map(|id| {
                Outbound::new(id, Event::ChallengeDeclined { from: username })
            })
            .into_iter()
            .collect())
    }

    fn own_username(&self, session: SessionId) -> Result<String, ChallengeError> {
        self.players
            .username_of(session)
            .ok_or(ChallengeError::NotLoggedIn)
    }
}
