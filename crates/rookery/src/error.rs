//! Unified error type for the server.

use rookery_match::MatchError;
use rookery_protocol::ProtocolError;
use rookery_session::SessionError;
use rookery_transport::TransportError;

/// Top-level error wrapping each layer's error type.
///
/// Most errors never reach this type: rejected commands become events for
/// the client. What is left is startup failures and a connection that
/// cannot be written to.
#[derive(Debug, thiserror::Error)]
pub enum RookeryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        let err: RookeryError = err.into();
        assert!(matches!(err, RookeryError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: RookeryError = ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, RookeryError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error_keeps_reason() {
        let err: RookeryError = SessionError::Full.into();
        assert!(matches!(err, RookeryError::Session(_)));
        assert_eq!(err.to_string(), "Server full");
    }

    #[test]
    fn test_from_match_error() {
        let err: RookeryError = MatchError::Capacity.into();
        assert_eq!(err.to_string(), "No available match slots");
    }
}
