//! Error types for the match layer.
//!
//! `Display` strings double as the `reason` text sent to clients.

use rookery_protocol::MatchId;
use rookery_session::SessionError;

/// Errors from the match table.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Every match slot is taken.
    #[error("No available match slots")]
    Capacity,

    /// No active match has this id.
    #[error("Match not found")]
    NotFound(MatchId),

    /// One of the players could not be claimed: not logged in, gone, or
    /// already playing.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Why a submitted move was rejected. Only the submitter hears about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Match not found")]
    MatchNotFound,

    #[error("You are not in this match")]
    NotParticipant,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid notation")]
    BadNotation,

    #[error("Illegal move")]
    IllegalMove,
}

/// Why a challenge, accept or decline was refused.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("Not logged in")]
    NotLoggedIn,

    /// `from` was not the sender's own username.
    #[error("Username mismatch")]
    UsernameMismatch,

    #[error("Opponent not found or offline")]
    OpponentNotFound,

    #[error("Cannot challenge yourself")]
    SelfChallenge,

    #[error("Opponent is not available")]
    OpponentUnavailable,

    #[error("Challenger not found")]
    ChallengerNotFound,

    /// The match could not be created.
    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_reasons_are_wire_text() {
        assert_eq!(MoveError::MatchNotFound.to_string(), "Match not found");
        assert_eq!(
            MoveError::NotParticipant.to_string(),
            "You are not in this match"
        );
        assert_eq!(MoveError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(MoveError::BadNotation.to_string(), "Invalid notation");
        assert_eq!(MoveError::IllegalMove.to_string(), "Illegal move");
    }

    #[test]
    fn test_challenge_error_wraps_match_error_text() {
        let err = ChallengeError::from(MatchError::Capacity);
        assert_eq!(err.to_string(), "No available match slots");

        let err = ChallengeError::from(MatchError::from(
            SessionError::Unavailable("ben".into()),
        ));
        assert_eq!(err.to_string(), "ben is not available");
    }
}
