//! Error types for the protocol layer.

/// Errors that can occur while turning frames into bytes and back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, an
    /// unknown message tag or character type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but makes no sense at the protocol level.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
