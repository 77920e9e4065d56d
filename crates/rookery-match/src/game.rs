//! A single game between two seated players.

use rookery_protocol::{MatchId, SessionId};
use rookery_rules::{Board, Color, Square};
use rookery_session::Player;

/// One match: who plays which colour, the board, and whose move it is.
///
/// Lives behind its own mutex in the [`MatchRegistry`](crate::MatchRegistry).
/// A `Match` returned by [`lookup`](crate::MatchRegistry::lookup) is a
/// detached copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    id: MatchId,
    white: Player,
    black: Player,
    board: Board,
    turn: Color,
    active: bool,
}

impl Match {
    /// A fresh game from the starting position, White to move.
    pub fn new(id: MatchId, white: Player, black: Player) -> Self {
        Self {
            id,
            white,
            black,
            board: Board::starting(),
            turn: Color::White,
            active: true,
        }
    }

    pub fn id(&self) -> &MatchId {
        &self.id
    }

    pub fn white(&self) -> &Player {
        &self.white
    }

    pub fn black(&self) -> &Player {
        &self.black
    }

    pub fn seat(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// `false` once a result has been reached. An inactive match accepts
    /// no more moves.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Which colour `session` plays here, if it plays at all.
    pub fn color_of(&self, session: SessionId) -> Option<Color> {
        if self.white.session_id == session {
            Some(Color::White)
        } else if self.black.session_id == session {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Moves a piece and hands the turn to the other side.
    ///
    /// Legality must already have been checked.
    pub fn apply_move(&mut self, from: Square, to: Square) {
        self.board.apply_move(from, to);
        self.turn = self.turn.opponent();
    }

    pub(crate) fn finish(&mut self) {
        self.active = false;
    }
}
