//! Codec trait and the JSON implementation.
//!
//! The connection handler only needs something that implements [`Codec`];
//! it never touches `serde_json` directly.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because a single codec instance is shared by
/// every connection task for the life of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`. Browser clients speak JSON, so
/// this is the only codec the server ships with.
///
/// ```rust
/// use gridduel_protocol::{ClientMessage, Codec, Envelope, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame = Envelope::new(1, 0, ClientMessage::RerollCards);
///
/// let bytes = codec.encode(&frame).unwrap();
/// let decoded: Envelope<ClientMessage> = codec.decode(&bytes).unwrap();
/// assert_eq!(frame, decoded);
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

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Envelope, ServerMessage};

    #[test]
    fn test_json_codec_decodes_text_frames() {
        let codec = JsonCodec;
        let env: Envelope<ServerMessage> = codec
            .decode(br#"{"seq":2,"timestamp":10,"payload":{"type":"Unwait"}}"#)
            .unwrap();
        assert_eq!(env.payload, ServerMessage::Unwait);
    }

    #[test]
    fn test_json_codec_reports_decode_errors() {
        let codec = JsonCodec;
        let result: Result<Envelope<ServerMessage>, _> =
            codec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
