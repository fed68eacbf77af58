//! # Grid Duel
//!
//! Authoritative server for a 1-vs-1 turn-based tactical card battle on
//! a 7×3 grid.
//!
//! Clients connect over WebSocket and speak JSON [`Envelope`]s. Each
//! room is an isolated actor that seats two players, deals hands, and
//! resolves rounds of alternating card plays; the server only decodes
//! intents, routes them through the [`RoomRegistry`], and writes the
//! room's events back to the socket.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridduel::prelude::*;
//!
//! # async fn start() -> Result<(), GridDuelError> {
//! let server = GridDuelServer::builder().bind("0.0.0.0:3000").build().await?;
//! server.run().await
//! # }
//! ```
//!
//! [`Envelope`]: gridduel_protocol::Envelope
//! [`RoomRegistry`]: gridduel_room::RoomRegistry

mod error;
mod handler;
mod server;

pub use error::GridDuelError;
pub use server::{GridDuelServer, GridDuelServerBuilder};

pub mod prelude {
    pub use crate::{GridDuelError, GridDuelServer, GridDuelServerBuilder};
    pub use gridduel_protocol::{
        CardKind, Cell, CharacterType, ClientMessage, Codec, Envelope, JsonCodec, PlayerId,
        RoomId, RoomSnapshot, ServerMessage,
    };
    pub use gridduel_room::{Pacing, RoomConfig, RoomState};
}
