//! Codec trait and the JSON implementation.
//!
//! The server only ever needs two things from a wire format: turn an
//! [`Event`](crate::Event) into bytes, and turn bytes into a
//! [`Command`](crate::Command). [`Codec`] is that seam; [`JsonCodec`] is
//! the one format clients speak today.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because a single codec is shared by every
/// connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do not
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`. Enabled by the `json` feature.
///
/// ```rust
/// use rookery_protocol::{Codec, Command, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = br#"{"action":"LOGIN","data":{"username":"ana","password":"pw"}}"#;
/// let command: Command = codec.decode(bytes).unwrap();
/// assert_eq!(
///     command,
///     Command::Login { username: "ana".into(), password: "pw".into() }
/// );
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
