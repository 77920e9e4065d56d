//! Turning one decoded command into the events it causes.
//!
//! The dispatcher is the whole server minus the network: it owns the
//! registries, calls the right component for each [`Command`], and turns
//! every outcome, success or rejection, into addressed [`Outbound`]
//! events. Rejections always go back to the session that sent the
//! command and to nobody else.

use std::sync::Arc;

use rookery_match::{MatchConfig, MatchRegistry, Matchmaker, MoveProcessor};
use rookery_protocol::{Command, Event, Outbound, SessionId};
use rookery_session::{PlayerRegistry, SessionError};

/// Routes commands to the player registry, matchmaker and move processor.
#[derive(Clone)]
pub struct Dispatcher {
    players: Arc<PlayerRegistry>,
    matches: Arc<MatchRegistry>,
    matchmaker: Matchmaker,
    processor: MoveProcessor,
}

impl Dispatcher {
    pub fn new(players: Arc<PlayerRegistry>, match_config: MatchConfig) -> Self {
        let matches =
            Arc::new(MatchRegistry::new(match_config, Arc::clone(&players)));
        Self {
            matchmaker: Matchmaker::new(Arc::clone(&matches)),
            processor: MoveProcessor::new(Arc::clone(&matches)),
            players,
            matches,
        }
    }

    pub fn players(&self) -> &Arc<PlayerRegistry> {
        &self.players
    }

    pub fn matches(&self) -> &Arc<MatchRegistry> {
        &self.matches
    }

    /// Handles `command` from `session`.
    pub fn dispatch(&self, session: SessionId, command: Command) -> Vec<Outbound> {
        let action = command.action();
        let reply = |event| vec![Outbound::new(session, event)];

        let result = match command {
            Command::Register { username, password } => {
                return reply(self.register(&username, &password));
            }
            Command::Login { username, password } => {
                return reply(self.login(session, &username, &password));
            }
            Command::RequestPlayerList {} => {
                return reply(Event::PlayerList {
                    players: self.players.list_online(session),
                });
            }
            Command::Ping {} => return reply(Event::Pong {}),

            Command::Challenge { from, to } => self
                .matchmaker
                .challenge(session, &from, &to)
                .map_err(Event::error),
            Command::Accept { from, to } => self
                .matchmaker
                .accept(session, &from, &to)
                .map_err(Event::error),
            Command::Decline { from, to } => self
                .matchmaker
                .decline(session, &from, &to)
                .map_err(Event::error),
            Command::Move { match_id, from, to } => self
                .processor
                .submit_move(session, &match_id, &from, &to)
                .map(|report| report.into_events())
                .map_err(|e| Event::MoveInvalid {
                    reason: e.to_string(),
                }),
        };

        result.unwrap_or_else(|event| {
            tracing::debug!(session_id = %session, action, ?event, "command rejected");
            reply(event)
        })
    }

    fn register(&self, username: &str, password: &str) -> Event {
        match self.players.register(username, password) {
            Ok(()) => Event::RegisterSuccess {
                message: "Account created".into(),
            },
            Err(e @ SessionError::DirectoryFull) => Event::error(e),
            Err(e) => {
                tracing::debug!(username, error = %e, "registration refused");
                Event::RegisterFail {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn login(&self, session: SessionId, username: &str, password: &str) -> Event {
        match self.players.login(session, username, password) {
            Ok(token) => Event::LoginSuccess {
                session_id: token,
                username: username.to_string(),
            },
            Err(e) => {
                tracing::debug!(
                    session_id = %session,
                    username,
                    error = %e,
                    "login refused"
                );
                Event::LoginFail {
                    reason: e.to_string(),
                }
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
