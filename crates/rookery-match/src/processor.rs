//! Processing one submitted move, from lookup to result.

use std::sync::Arc;

use rookery_protocol::{Event, MatchId, Outbound, SessionId};
use rookery_rules::{Outcome, Square, evaluate_terminal, is_fully_legal, parse_square};

use crate::registry::lock;
use crate::{MatchRegistry, MoveError};

/// The effect of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub match_id: MatchId,
    pub mover: SessionId,
    pub opponent: SessionId,
    pub from: Square,
    pub to: Square,
    /// Set if this move ended the game.
    pub outcome: Option<Outcome>,
}

impl MoveReport {
    /// The notifications this move produces: `MOVE_OK` to the mover,
    /// `OPPONENT_MOVE` to the other player, then `GAME_RESULT` to both if
    /// the game is over.
    pub fn into_events(self) -> Vec<Outbound> {
        let from = self.from.to_string();
        let to = self.to.to_string();
        let mut events = vec![
            Outbound::new(
                self.mover,
                Event::MoveOk {
                    from: from.clone(),
                    to: to.clone(),
                },
            ),
            Outbound::new(self.opponent, Event::OpponentMove { from, to }),
        ];
        if let Some(outcome) = self.outcome {
            let result = Event::GameResult {
                winner: outcome.winner.to_string(),
                reason: outcome.reason.to_string(),
            };
            events.push(Outbound::new(self.mover, result.clone()));
            events.push(Outbound::new(self.opponent, result));
        }
        events
    }
}

/// Validates and applies moves against the shared match table.
#[derive(Clone)]
pub struct MoveProcessor {
    matches: Arc<MatchRegistry>,
}

impl MoveProcessor {
    pub fn new(matches: Arc<MatchRegistry>) -> Self {
        Self { matches }
    }

    /// Submits `from`-`to` on behalf of `session` in `match_id`.
    ///
    /// Everything from the turn check to terminal detection happens with
    /// the match locked, so two moves in the same match never interleave.
    /// A move that ends the game marks the match inactive before the lock
    /// is released; the slot itself is freed afterwards.
    ///
    /// Checks, in order: the match is active, `session` plays in it, it is
    /// that player's turn, both squares parse, the move is legal and does
    /// not leave the mover's king in check.
    pub fn submit_move(
        &self,
        session: SessionId,
        match_id: &MatchId,
        from: &str,
        to: &str,
    ) -> Result<MoveReport, MoveError> {
        let slot = self
            .matches
            .slot(match_id)
            .ok_or(MoveError::MatchNotFound)?;

        let report = {
            let mut game = lock(&slot);
            if !game.is_active() {
                return Err(MoveError::MatchNotFound);
            }
            let color = game.color_of(session).ok_or(MoveError::NotParticipant)?;
            if game.turn() != color {
                return Err(MoveError::NotYourTurn);
            }
            let from = parse_square(from).map_err(|_| MoveError::BadNotation)?;
            let to = parse_square(to).map_err(|_| MoveError::BadNotation)?;
            if !is_fully_legal(game.board(), from, to, color) {
                return Err(MoveError::IllegalMove);
            }

            game.apply_move(from, to);
            let outcome = evaluate_terminal(
                game.board(),
                game.turn(),
                &game.white().username,
                &game.black().username,
            );
            if outcome.is_some() {
                game.finish();
            }

            MoveReport {
                match_id: match_id.clone(),
                mover: session,
                opponent: game.seat(color.opponent()).session_id,
                from,
                to,
                outcome,
            }
        };

        tracing::debug!(
            %match_id,
            session_id = %session,
            from = %report.from,
            to = %report.to,
            "move applied"
        );
        if let Some(outcome) = &report.outcome {
            self.matches.deactivate(match_id, outcome);
        }
        Ok(report)
    }
}
