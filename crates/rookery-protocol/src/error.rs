//! Error types for the protocol layer.

/// Errors that can occur while turning messages into bytes or back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes were not a message we understand: malformed JSON, an
    /// unknown `action`, or a missing/mistyped field in `data`.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but cannot be used, e.g. it was not UTF-8 text.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl ProtocolError {
    /// The `reason` shown to a client whose frame could not be used.
    ///
    /// Syntax errors become `Invalid JSON`; well-formed JSON with the wrong
    /// shape keeps serde's description, which names the unknown action or
    /// the missing field.
    pub fn client_reason(&self) -> String {
        match self {
            #[cfg(feature = "json")]
            Self::Decode(e) => match e.classify() {
                serde_json::error::Category::Data => {
                    format!("Invalid message: {e}")
                }
                _ => "Invalid JSON".to_string(),
            },
            #[cfg(feature = "json")]
            Self::Encode(_) => "Internal error".to_string(),
            Self::InvalidMessage(reason) => format!("Invalid message: {reason}"),
        }
    }
}
