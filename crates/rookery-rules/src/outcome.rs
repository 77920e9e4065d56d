//! Game results and terminal-state evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Board, Color, has_any_legal_move, is_in_check, is_insufficient_material,
};

/// Who won. Rendered as the player's name, or `DRAW`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(String),
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(name) => write!(f, "{name}"),
            Self::Draw => write!(f, "DRAW"),
        }
    }
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate => write!(f, "Checkmate"),
            Self::Stalemate => write!(f, "Stalemate"),
            Self::InsufficientMaterial => write!(f, "Insufficient material"),
        }
    }
}

/// The result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Winner,
    pub reason: EndReason,
}

impl Outcome {
    pub fn draw(reason: EndReason) -> Self {
        Self {
            winner: Winner::Draw,
            reason,
        }
    }
}

/// Decides whether the game is over with `side_to_move` about to play.
///
/// Order matters: insufficient material is checked first, so a bare-kings
/// position is a draw even if it would also be a stalemate.
pub fn evaluate_terminal(
    board: &Board,
    side_to_move: Color,
    white_name: &str,
    black_name: &str,
) -> Option<Outcome> {
    if is_insufficient_material(board) {
        return Some(Outcome::draw(EndReason::InsufficientMaterial));
    }
    if has_any_legal_move(board, side_to_move) {
        return None;
    }
    if is_in_check(board, side_to_move) {
        let winner = match side_to_move {
            Color::White => black_name,
            Color::Black => white_name,
        };
        Some(Outcome {
            winner: Winner::Player(winner.to_string()),
            reason: EndReason::Checkmate,
        })
    } else {
        Some(Outcome::draw(EndReason::Stalemate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [&str; 8]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_evaluate_terminal_starting_position_is_none() {
        let b = Board::starting();
        assert_eq!(evaluate_terminal(&b, Color::White, "w", "b"), None);
        assert_eq!(evaluate_terminal(&b, Color::Black, "w", "b"), None);
    }

    #[test]
    fn test_evaluate_terminal_back_rank_mate_names_white() {
        let b = board([
            "R.....k.", ".....ppp", "........", "........", "........",
            "........", "........", "....K...",
        ]);
        let outcome = evaluate_terminal(&b, Color::Black, "alice", "bob");
        assert_eq!(
            outcome,
            Some(Outcome {
                winner: Winner::Player("alice".into()),
                reason: EndReason::Checkmate,
            })
        );
    }

    #[test]
    fn test_evaluate_terminal_stalemate_is_draw() {
        let b = board([
            "k.......", "..Q.....", ".K......", "........", "........",
            "........", "........", "........",
        ]);
        let outcome = evaluate_terminal(&b, Color::Black, "alice", "bob");
        assert_eq!(outcome, Some(Outcome::draw(EndReason::Stalemate)));
    }

    #[test]
    fn test_evaluate_terminal_insufficient_material_checked_first() {
        let b = board([
            "k.......", "........", ".K......", "........", "........",
            "........", "........", "........",
        ]);
        let outcome = evaluate_terminal(&b, Color::Black, "alice", "bob");
        assert_eq!(
            outcome,
            Some(Outcome::draw(EndReason::InsufficientMaterial))
        );
    }

    #[test]
    fn test_evaluate_terminal_check_with_escape_is_none() {
        let b = board([
            "....k...", "........", "........", "........", "........",
            "........", "........", "....R..K",
        ]);
        assert_eq!(evaluate_terminal(&b, Color::Black, "w", "b"), None);
    }

    #[test]
    fn test_winner_and_reason_wire_text() {
        assert_eq!(Winner::Draw.to_string(), "DRAW");
        assert_eq!(Winner::Player("carol".into()).to_string(), "carol");
        assert_eq!(EndReason::Checkmate.to_string(), "Checkmate");
        assert_eq!(EndReason::Stalemate.to_string(), "Stalemate");
        assert_eq!(
            EndReason::InsufficientMaterial.to_string(),
            "Insufficient material"
        );
    }
}
