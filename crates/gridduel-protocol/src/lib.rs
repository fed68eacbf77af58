//! Wire protocol for Grid Duel.
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`RoomSnapshot`],
//!   [`Envelope`]) describe every frame exchanged with a client.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) turns frames into bytes.
//! - **Errors** ([`ProtocolError`]) cover encode/decode failures.
//!
//! The protocol crate knows nothing about sockets or rooms. The room
//! engine builds `ServerMessage`s, the server wraps and encodes them.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ActionActor, ActionCard, CardAction, CardKind, Cell, CharacterType,
    ClientMessage, Envelope, PlayerId, PlayerSnapshot, RoomId, RoomSnapshot,
    RoomStatus, ServerMessage,
};
